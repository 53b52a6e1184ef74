use crate::errors::RuntimeError;
use crate::exports::{ExportError, Exportable};
use crate::externals::Extern;
use crate::store::Store;
use crate::types::{GlobalType, Mutability, Val};
use std::fmt;

/// A WebAssembly `global` instance.
///
/// A global instance is the runtime representation of a global
/// variable. It consists of an individual value and a flag indicating
/// whether it is mutable.
///
/// Spec: <https://webassembly.github.io/spec/core/exec/runtime.html#global-instances>
#[derive(Clone, Copy)]
pub struct Global {
    pub(crate) handle: wasmi::Global,
}

impl Global {
    /// Create a new immutable `Global` with the initial [`Val`].
    ///
    /// # Example
    ///
    /// ```
    /// # use wasmbind::{Global, Mutability, Store, Val};
    /// # let mut store = Store::default();
    /// #
    /// let g = Global::new(&mut store, Val::I32(1));
    ///
    /// assert_eq!(g.get(&store).i32(), Some(1));
    /// assert_eq!(g.ty(&store).mutability(), Mutability::Const);
    /// ```
    pub fn new(store: &mut Store, val: Val) -> Self {
        Self::from_value(store, val, Mutability::Const)
    }

    /// Create a mutable `Global` with the initial [`Val`].
    ///
    /// # Example
    ///
    /// ```
    /// # use wasmbind::{Global, Mutability, Store, Val};
    /// # let mut store = Store::default();
    /// #
    /// let g = Global::new_mut(&mut store, Val::I32(1));
    ///
    /// assert_eq!(g.ty(&store).mutability(), Mutability::Var);
    /// ```
    pub fn new_mut(store: &mut Store, val: Val) -> Self {
        Self::from_value(store, val, Mutability::Var)
    }

    /// Create a `Global` with the initial [`Val`] and the provided
    /// [`Mutability`].
    fn from_value(store: &mut Store, val: Val, mutability: Mutability) -> Self {
        let handle = wasmi::Global::new(&mut store.inner, val, mutability);

        Self { handle }
    }

    /// Returns the [`GlobalType`] of the `Global`.
    pub fn ty(&self, store: &Store) -> GlobalType {
        self.handle.ty(&store.inner)
    }

    /// Retrieves the current value [`Val`] that the `Global` has.
    pub fn get(&self, store: &Store) -> Val {
        self.handle.get(&store.inner)
    }

    /// Sets a custom value [`Val`] to the runtime `Global`.
    ///
    /// # Errors
    ///
    /// Trying to mutate an immutable global, or to set a value of an
    /// incompatible type, raises a [`RuntimeError`].
    pub fn set(&self, store: &mut Store, val: Val) -> Result<(), RuntimeError> {
        self.handle
            .set(&mut store.inner, val)
            .map_err(|e| RuntimeError::new(e.to_string()))
    }

    pub(crate) fn from_vm_extern(handle: wasmi::Global) -> Self {
        Self { handle }
    }
}

impl fmt::Debug for Global {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Global").finish()
    }
}

impl<'a> Exportable<'a> for Global {
    fn get_self_from_extern(_extern: &'a Extern) -> Result<&'a Self, ExportError> {
        match _extern {
            Extern::Global(global) => Ok(global),
            _ => Err(ExportError::IncompatibleType),
        }
    }
}
