use crate::exports::{ExportError, Exportable};
use crate::externals::Extern;
use crate::store::Store;
use crate::types::TableType;
use std::fmt;

/// A WebAssembly `table` instance.
///
/// The `Table` struct is an array-like structure representing a
/// WebAssembly Table, which stores function references.
///
/// A table created by the host or in WebAssembly code will be accessible
/// and mutable from both host and WebAssembly. Element mutation itself
/// is an execution-engine concern; this layer only exposes the typed
/// view over an exported table.
///
/// Spec: <https://webassembly.github.io/spec/core/exec/runtime.html#table-instances>
#[derive(Clone, Copy)]
pub struct Table {
    pub(crate) handle: wasmi::Table,
}

impl Table {
    /// Returns the [`TableType`] of the `Table`.
    pub fn ty(&self, store: &Store) -> TableType {
        self.handle.ty(&store.inner)
    }

    /// Returns the current size of the `Table`.
    pub fn size(&self, store: &Store) -> u64 {
        self.handle.size(&store.inner).into()
    }

    pub(crate) fn from_vm_extern(handle: wasmi::Table) -> Self {
        Self { handle }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Table").finish()
    }
}

impl<'a> Exportable<'a> for Table {
    fn get_self_from_extern(_extern: &'a Extern) -> Result<&'a Self, ExportError> {
        match _extern {
            Extern::Table(table) => Ok(table),
            _ => Err(ExportError::IncompatibleType),
        }
    }
}
