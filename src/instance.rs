use crate::errors::{InstantiationError, LinkError, RuntimeError};
use crate::exports::Exports;
use crate::externals::Extern;
use crate::imports::Imports;
use crate::module::Module;
use crate::store::Store;
use std::collections::HashSet;

/// A WebAssembly Instance is a stateful, executable
/// instance of a WebAssembly [`Module`].
///
/// Instance objects contain all the exported WebAssembly
/// functions, memories, tables and globals that allow
/// interacting with WebAssembly.
///
/// Spec: <https://webassembly.github.io/spec/core/exec/runtime.html#module-instances>
#[derive(Clone)]
pub struct Instance {
    _inner: wasmi::Instance,
    module: Module,
    /// The exports for an instance.
    ///
    /// The export table is immutable after instantiation: its names,
    /// kinds and order are exactly those of the module's export
    /// descriptors. Reading this field repeatedly (or cloning the
    /// instance) hands out equal views onto the same table.
    pub exports: Exports,
}

impl Instance {
    /// Creates a new `Instance` from a WebAssembly [`Module`] and a
    /// set of imports using [`Imports`] or the [`imports!`] macro
    /// helper.
    ///
    /// [`imports!`]: crate::imports!
    ///
    /// ```
    /// # use wasmbind::{imports, Store, Module, Global, Val, Instance};
    /// # fn main() -> anyhow::Result<()> {
    /// let mut store = Store::default();
    /// let module = Module::new(&store, "(module)")?;
    /// let imports = imports! {
    ///   "host" => {
    ///     "var" => Global::new(&mut store, Val::I32(2))
    ///   }
    /// };
    /// let instance = Instance::new(&mut store, &module, &imports)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// ## Errors
    ///
    /// The function can return [`InstantiationError`]s.
    ///
    /// Those are, as defined by the spec:
    ///  * Link errors that happen when plugging the imports into the
    ///    instance
    ///  * Runtime errors that happen when running the module `start`
    ///    function.
    ///
    /// Instantiation is atomic: on any failure no `Instance` is
    /// produced.
    #[allow(clippy::result_large_err)]
    pub fn new(
        store: &mut Store,
        module: &Module,
        imports: &Imports,
    ) -> Result<Self, InstantiationError> {
        let resolved = imports
            .imports_for_module(store, module)
            .map_err(InstantiationError::Link)?;

        let mut linker = <wasmi::Linker<()>>::new(store.engine());
        let mut defined = HashSet::new();
        for (import, extern_) in module.imports().zip(resolved.iter()) {
            // A module may declare the same (namespace, name) pair
            // more than once; the linker accepts one definition.
            if !defined.insert((import.module().to_string(), import.name().to_string())) {
                continue;
            }
            linker
                .define(import.module(), import.name(), extern_.to_vm_extern())
                .map_err(|e| InstantiationError::Link(LinkError::Resource(e.to_string())))?;
        }

        let handle = linker
            .instantiate(&mut store.inner, &module.inner)
            .map_err(|e| InstantiationError::Link(LinkError::Trap(RuntimeError::from(e))))?
            .start(&mut store.inner)
            .map_err(|e| InstantiationError::Start(RuntimeError::from(e)))?;

        // Bind every declared export, in declaration order, to the
        // runtime object the engine materialized for it.
        let exports = module
            .exports()
            .map(|export| {
                let name = export.name().to_string();
                let extern_ = handle
                    .get_export(&store.inner, &name)
                    .ok_or_else(|| InstantiationError::NotInExports(name.clone()))?;
                Ok((name, Extern::from_vm_extern(extern_)))
            })
            .collect::<Result<Exports, InstantiationError>>()?;

        tracing::trace!(exports = exports.len(), "module instantiated");

        Ok(Self {
            _inner: handle,
            module: module.clone(),
            exports,
        })
    }

    /// Gets the [`Module`] associated with this instance.
    pub fn module(&self) -> &Module {
        &self.module
    }
}

/// Two instances compare equal when they share the same export table,
/// which only happens for clones of one instantiation.
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.exports == other.exports
    }
}

impl Eq for Instance {}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("exports", &self.exports)
            .finish()
    }
}
