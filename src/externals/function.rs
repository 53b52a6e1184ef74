use crate::errors::RuntimeError;
use crate::exports::{ExportError, Exportable};
use crate::externals::Extern;
use crate::store::Store;
use crate::types::{FuncType, Val};
use std::fmt;

/// A WebAssembly `function` instance.
///
/// A function instance is the runtime representation of a function.
/// It effectively is a closure of the original function (defined in
/// either the host or the WebAssembly module) over the runtime
/// [`Instance`] of its originating [`Module`].
///
/// The module instance is used to resolve references to other
/// definitions during execution of the function.
///
/// Spec: <https://webassembly.github.io/spec/core/exec/runtime.html#function-instances>
///
/// [`Instance`]: crate::Instance
/// [`Module`]: crate::Module
#[derive(Clone, Copy)]
pub struct Function {
    pub(crate) handle: wasmi::Func,
}

impl Function {
    /// Creates a new host `Function` (dynamic) with the provided
    /// signature.
    ///
    /// The host closure receives the call arguments and returns the
    /// results; returning a [`RuntimeError`] surfaces as a trap in the
    /// calling WebAssembly code.
    ///
    /// # Example
    ///
    /// ```
    /// use wasmbind::{Function, FuncType, Store, Val, ValType};
    ///
    /// let mut store = Store::default();
    /// let signature = FuncType::new([ValType::I32, ValType::I32], [ValType::I32]);
    ///
    /// let f = Function::new(&mut store, signature, |args| {
    ///     let sum = args[0].i32().unwrap() + args[1].i32().unwrap();
    ///     Ok(vec![Val::I32(sum)])
    /// });
    ///
    /// assert_eq!(f.param_arity(&store), 2);
    /// assert_eq!(f.result_arity(&store), 1);
    /// ```
    pub fn new<F>(store: &mut Store, ty: FuncType, func: F) -> Self
    where
        F: Fn(&[Val]) -> Result<Vec<Val>, RuntimeError> + Send + Sync + 'static,
    {
        let handle = wasmi::Func::new(
            &mut store.inner,
            ty,
            move |_caller: wasmi::Caller<'_, ()>, args: &[Val], results: &mut [Val]| {
                let returned = func(args).map_err(|e| wasmi::Error::new(e.message()))?;
                for (slot, value) in results.iter_mut().zip(returned) {
                    *slot = value;
                }
                Ok(())
            },
        );

        Self { handle }
    }

    /// Returns the [`FuncType`] of the `Function`.
    pub fn ty(&self, store: &Store) -> FuncType {
        self.handle.ty(&store.inner)
    }

    /// Returns the number of parameters that this function takes.
    pub fn param_arity(&self, store: &Store) -> usize {
        self.ty(store).params().len()
    }

    /// Returns the number of results this function produces.
    pub fn result_arity(&self, store: &Store) -> usize {
        self.ty(store).results().len()
    }

    /// Call the `Function` function.
    ///
    /// Depending on where the Function is defined, it will call the
    /// trampoline for the function defined in a WebAssembly module, or
    /// the host closure directly.
    ///
    /// Any trap raised while executing, including a parameter
    /// count/type mismatch, surfaces synchronously as a
    /// [`RuntimeError`] without corrupting the instance.
    ///
    /// # Example
    ///
    /// ```
    /// # use wasmbind::{imports, Instance, Module, Store, Val};
    /// # fn main() -> anyhow::Result<()> {
    /// # let mut store = Store::default();
    /// # let module = Module::new(&store, r#"
    /// # (module
    /// #   (func (export "sum") (param i32 i32) (result i32)
    /// #     local.get 0
    /// #     local.get 1
    /// #     i32.add))
    /// # "#)?;
    /// # let instance = Instance::new(&mut store, &module, &imports! {})?;
    /// #
    /// let sum = instance.exports.get_function("sum")?;
    ///
    /// let results = sum.call(&mut store, &[Val::I32(1), Val::I32(2)])?;
    /// assert_eq!(results[0].i32(), Some(3));
    /// # Ok(())
    /// # }
    /// ```
    pub fn call(&self, store: &mut Store, params: &[Val]) -> Result<Box<[Val]>, RuntimeError> {
        let ty = self.handle.ty(&store.inner);
        let mut results = ty
            .results()
            .iter()
            .map(|ty| Val::default(*ty))
            .collect::<Vec<_>>();

        self.handle
            .call(&mut store.inner, params, &mut results)
            .map_err(RuntimeError::from)?;

        Ok(results.into_boxed_slice())
    }

    pub(crate) fn from_vm_extern(handle: wasmi::Func) -> Self {
        Self { handle }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function").finish()
    }
}

impl<'a> Exportable<'a> for Function {
    fn get_self_from_extern(_extern: &'a Extern) -> Result<&'a Self, ExportError> {
        match _extern {
            Extern::Function(function) => Ok(function),
            _ => Err(ExportError::IncompatibleType),
        }
    }
}
