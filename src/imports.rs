//! The import module contains the implementation data structures and
//! helper functions used to manipulate and access a wasm module's
//! imports including memories, tables, globals, and functions.

use crate::errors::{ImportError, LinkError};
use crate::exports::Exports;
use crate::externals::Extern;
use crate::module::Module;
use crate::store::Store;
use crate::types::ExternType;
use std::collections::HashMap;
use std::fmt;

/// All of the import data used when instantiating.
///
/// It's suggested that you use the [`imports!`] macro
/// instead of creating an `Imports` by hand.
///
/// [`imports!`]: crate::imports!
///
/// # Usage:
/// ```
/// use wasmbind::{imports, Global, Imports, Store, Val};
///
/// let mut store = Store::default();
/// let import_object: Imports = imports! {
///     "env" => {
///         "counter" => Global::new_mut(&mut store, Val::I32(0)),
///     },
/// };
/// ```
#[derive(Clone, Default)]
pub struct Imports {
    pub(crate) map: HashMap<(String, String), Extern>,
}

impl Imports {
    /// Create a new `Imports`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets an export given a module and a name.
    pub fn get_export(&self, module: &str, name: &str) -> Option<Extern> {
        if self.exists(module, name) {
            let ext = &self.map[&(module.to_string(), name.to_string())];
            return Some(ext.clone());
        }
        None
    }

    /// Returns if an export exist for a given module and name.
    pub fn exists(&self, module: &str, name: &str) -> bool {
        self.map
            .contains_key(&(module.to_string(), name.to_string()))
    }

    /// Returns true if the `Imports` contains namespace with the
    /// provided name.
    pub fn contains_namespace(&self, name: &str) -> bool {
        self.map.keys().any(|(k, _)| (k == name))
    }

    /// Register a list of externs into a namespace.
    ///
    /// # Usage:
    /// ```no_run
    /// # use wasmbind::{Imports, Exports, Memory};
    /// # fn foo_test(memory: Memory) {
    /// let mut exports = Exports::new();
    /// exports.insert("memory", memory);
    ///
    /// let mut import_object = Imports::new();
    /// import_object.register_namespace("env", exports);
    /// // ...
    /// # }
    /// ```
    pub fn register_namespace(
        &mut self,
        ns: &str,
        contents: impl IntoIterator<Item = (String, Extern)>,
    ) {
        for (name, extern_) in contents.into_iter() {
            self.map.insert((ns.to_string(), name.clone()), extern_);
        }
    }

    /// Add a single import with a namespace `ns` and name `name`.
    pub fn define(&mut self, ns: &str, name: &str, val: impl Into<Extern>) {
        self.map
            .insert((ns.to_string(), name.to_string()), val.into());
    }

    /// Returns the contents of a namespace as an `Exports`.
    ///
    /// Returns `None` if the namespace doesn't exist.
    pub fn get_namespace_exports(&self, name: &str) -> Option<Exports> {
        let ret: Exports = self
            .map
            .iter()
            .filter(|((ns, _), _)| ns == name)
            .map(|((_, name), e)| (name.clone(), e.clone()))
            .collect();
        if ret.is_empty() {
            None
        } else {
            Some(ret)
        }
    }

    /// Resolve and return a vector of imports in the order they are
    /// defined in the `module`'s source code.
    ///
    /// Resolution fails with a [`LinkError`] when a required import is
    /// missing, or when the provided extern is of a different kind
    /// than the module declares.
    #[allow(clippy::result_large_err)]
    pub fn imports_for_module(
        &self,
        store: &Store,
        module: &Module,
    ) -> Result<Vec<Extern>, LinkError> {
        let mut ret = vec![];
        for import in module.imports() {
            match self.get_export(import.module(), import.name()) {
                Some(imp) => {
                    let found = imp.ty(store);
                    if !kinds_match(import.ty(), &found) {
                        return Err(LinkError::Import(
                            import.module().to_string(),
                            import.name().to_string(),
                            ImportError::IncompatibleType(import.ty().clone(), found),
                        ));
                    }
                    ret.push(imp);
                }
                None => {
                    return Err(LinkError::Import(
                        import.module().to_string(),
                        import.name().to_string(),
                        ImportError::UnknownImport(import.ty().clone()),
                    ));
                }
            }
        }
        Ok(ret)
    }

    /// Iterates through all the imports in this structure.
    pub fn iter(&self) -> ImportsIterator<'_> {
        ImportsIterator::new(self)
    }
}

/// Whether two extern types are of the same kind (function, global,
/// table or memory). Full signature compatibility is the execution
/// engine's call to make.
pub(crate) fn kinds_match(expected: &ExternType, found: &ExternType) -> bool {
    matches!(
        (expected, found),
        (ExternType::Func(_), ExternType::Func(_))
            | (ExternType::Global(_), ExternType::Global(_))
            | (ExternType::Table(_), ExternType::Table(_))
            | (ExternType::Memory(_), ExternType::Memory(_))
    )
}

/// An iterator over imports.
pub struct ImportsIterator<'a> {
    iter: std::collections::hash_map::Iter<'a, (String, String), Extern>,
}

impl<'a> ImportsIterator<'a> {
    pub(crate) fn new(imports: &'a Imports) -> Self {
        let iter = imports.map.iter();
        Self { iter }
    }
}

impl<'a> Iterator for ImportsIterator<'a> {
    type Item = (&'a str, &'a str, &'a Extern);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .next()
            .map(|(k, v)| (k.0.as_str(), k.1.as_str(), v))
    }
}

impl IntoIterator for &Imports {
    type IntoIter = std::collections::hash_map::IntoIter<(String, String), Extern>;
    type Item = ((String, String), Extern);

    fn into_iter(self) -> Self::IntoIter {
        self.map.clone().into_iter()
    }
}

impl Extend<((String, String), Extern)> for Imports {
    fn extend<T: IntoIterator<Item = ((String, String), Extern)>>(&mut self, iter: T) {
        for ((ns, name), ext) in iter.into_iter() {
            self.define(&ns, &name, ext);
        }
    }
}

impl fmt::Debug for Imports {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        enum SecretMap {
            Empty,
            Some(usize),
        }

        impl SecretMap {
            fn new(len: usize) -> Self {
                if len == 0 {
                    Self::Empty
                } else {
                    Self::Some(len)
                }
            }
        }

        impl fmt::Debug for SecretMap {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self {
                    Self::Empty => write!(f, "(empty)"),
                    Self::Some(len) => write!(f, "(... {len} item(s) ...)"),
                }
            }
        }

        f.debug_struct("Imports")
            .field("map", &SecretMap::new(self.map.len()))
            .finish()
    }
}

/// Generate an [`Imports`] easily with the `imports!` macro.
///
/// [`Imports`]: crate::Imports
///
/// # Usage
///
/// ```
/// use wasmbind::{imports, Global, Store, Val};
///
/// let mut store = Store::default();
///
/// let import_object = imports! {
///     "env" => {
///         "var" => Global::new(&mut store, Val::I32(2)),
///     },
/// };
/// ```
#[macro_export]
macro_rules! imports {
    ( $( $ns_name:expr => $ns:tt ),* $(,)? ) => {
        {
            #[allow(unused_mut)]
            let mut import_object = $crate::Imports::new();

            $({
                let namespace = $crate::import_namespace!($ns);

                import_object.register_namespace($ns_name, namespace);
            })*

            import_object
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! namespace {
    ($( $import_name:expr => $import_item:expr ),* $(,)? ) => {
        $crate::import_namespace!( { $( $import_name => $import_item, )* } )
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! import_namespace {
    ( { $( $import_name:expr => $import_item:expr ),* $(,)? } ) => {{
        let mut namespace = $crate::Exports::new();

        $(
            namespace.insert($import_name, $import_item);
        )*

        namespace
    }};

    ( $namespace:ident ) => {
        $namespace
    };
}
