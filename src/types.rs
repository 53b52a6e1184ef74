//! The descriptor types for a module's import and export surface.
//!
//! The value and signature vocabulary ([`ExternType`], [`FuncType`],
//! [`GlobalType`], [`TableType`], [`MemoryType`], [`ValType`],
//! [`Val`], [`Mutability`]) is the execution engine's own; this layer
//! re-exports it rather than mirroring it.

pub use wasmi::core::ValType;
pub use wasmi::{ExternType, FuncType, GlobalType, MemoryType, Mutability, TableType, Val};

/// A descriptor for an exported WebAssembly value.
///
/// This type is primarily accessed from the [`Module::exports`]
/// accessor and describes what names are exported from a wasm module
/// and the type of the item that is exported.
///
/// Export descriptors are immutable once the module is constructed,
/// and their order is the module's declaration order.
///
/// [`Module::exports`]: crate::Module::exports
#[derive(Debug, Clone, PartialEq)]
pub struct ExportType<T = ExternType> {
    name: String,
    ty: T,
}

impl<T> ExportType<T> {
    /// Creates a new export which is exported with the given `name`
    /// and has the given `ty`.
    pub fn new(name: &str, ty: T) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }

    /// Returns the name by which this export is known by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of this export.
    pub fn ty(&self) -> &T {
        &self.ty
    }
}

/// A descriptor for an imported value into a wasm module.
///
/// This type is primarily accessed from the [`Module::imports`]
/// accessor and describes what names are imported by a wasm module
/// and the type of the item that is imported.
///
/// [`Module::imports`]: crate::Module::imports
#[derive(Debug, Clone, PartialEq)]
pub struct ImportType<T = ExternType> {
    module: String,
    name: String,
    ty: T,
}

impl<T> ImportType<T> {
    /// Creates a new import descriptor which comes from `module` and
    /// `name` and is of type `ty`.
    pub fn new(module: &str, name: &str, ty: T) -> Self {
        Self {
            module: module.to_owned(),
            name: name.to_owned(),
            ty,
        }
    }

    /// Returns the module name that this import is expected to come from.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the field name of the module that this import is
    /// expected to come from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the expected type of this import.
    pub fn ty(&self) -> &T {
        &self.ty
    }
}
