use crate::exports::{ExportError, Exportable};
use crate::externals::Extern;
use crate::store::Store;
use crate::types::MemoryType;
use std::fmt;

/// A WebAssembly `memory` instance.
///
/// A memory instance is the runtime representation of a linear memory.
/// It consists of a vector of bytes and an optional maximum size.
///
/// The bytes of the memory can be mutated and grown from both host and
/// WebAssembly; allocation and growth semantics belong to the
/// execution engine. This layer exposes the typed view over an
/// exported memory.
///
/// Spec: <https://webassembly.github.io/spec/core/exec/runtime.html#memory-instances>
#[derive(Clone, Copy)]
pub struct Memory {
    pub(crate) handle: wasmi::Memory,
}

impl Memory {
    /// Returns the [`MemoryType`] of the `Memory`.
    pub fn ty(&self, store: &Store) -> MemoryType {
        self.handle.ty(&store.inner)
    }

    /// Returns the size (in pages) of the `Memory`.
    pub fn size(&self, store: &Store) -> u64 {
        self.handle.size(&store.inner).into()
    }

    /// Returns the size (in bytes) of the `Memory`.
    pub fn data_size(&self, store: &Store) -> usize {
        self.handle.data(&store.inner).len()
    }

    pub(crate) fn from_vm_extern(handle: wasmi::Memory) -> Self {
        Self { handle }
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Memory").finish()
    }
}

impl<'a> Exportable<'a> for Memory {
    fn get_self_from_extern(_extern: &'a Extern) -> Result<&'a Self, ExportError> {
        match _extern {
            Extern::Memory(memory) => Ok(memory),
            _ => Err(ExportError::IncompatibleType),
        }
    }
}
