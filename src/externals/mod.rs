//! The runtime representation of the four external item kinds a
//! module can export or import: functions, globals, tables and
//! memories.

mod function;
mod global;
mod memory;
mod table;

pub use self::function::Function;
pub use self::global::Global;
pub use self::memory::Memory;
pub use self::table::Table;

use crate::exports::{ExportError, Exportable};
use crate::store::Store;
use crate::types::ExternType;
use std::fmt;

/// An `Extern` is the runtime representation of an entity that
/// can be imported or exported.
///
/// Each variant wraps an engine-native runtime object together with
/// access to its static type signature. Externs are lightweight
/// store-keyed handles: they do not own the underlying object and
/// must only be used with the [`Store`] that produced them.
///
/// Spec: <https://webassembly.github.io/spec/core/exec/runtime.html#external-values>
#[derive(Clone)]
pub enum Extern {
    /// An external [`Function`].
    Function(Function),
    /// An external [`Global`].
    Global(Global),
    /// An external [`Table`].
    Table(Table),
    /// An external [`Memory`].
    Memory(Memory),
}

impl Extern {
    /// Return the underlying type of the inner `Extern`.
    pub fn ty(&self, store: &Store) -> ExternType {
        match self {
            Self::Function(function) => ExternType::Func(function.ty(store)),
            Self::Global(global) => ExternType::Global(global.ty(store)),
            Self::Table(table) => ExternType::Table(table.ty(store)),
            Self::Memory(memory) => ExternType::Memory(memory.ty(store)),
        }
    }

    /// Create an `Extern` from an engine-native external value.
    pub(crate) fn from_vm_extern(vm_extern: wasmi::Extern) -> Self {
        match vm_extern {
            wasmi::Extern::Func(f) => Self::Function(Function::from_vm_extern(f)),
            wasmi::Extern::Global(g) => Self::Global(Global::from_vm_extern(g)),
            wasmi::Extern::Table(t) => Self::Table(Table::from_vm_extern(t)),
            wasmi::Extern::Memory(m) => Self::Memory(Memory::from_vm_extern(m)),
        }
    }

    /// Convert back into the engine-native external value.
    pub(crate) fn to_vm_extern(&self) -> wasmi::Extern {
        match self {
            Self::Function(f) => wasmi::Extern::Func(f.handle),
            Self::Global(g) => wasmi::Extern::Global(g.handle),
            Self::Table(t) => wasmi::Extern::Table(t.handle),
            Self::Memory(m) => wasmi::Extern::Memory(m.handle),
        }
    }
}

impl<'a> Exportable<'a> for Extern {
    fn get_self_from_extern(_extern: &'a Extern) -> Result<&'a Self, ExportError> {
        // Since this is already an extern, we can just return it.
        Ok(_extern)
    }
}

impl fmt::Debug for Extern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Function(_) => "Function(...)",
                Self::Global(_) => "Global(...)",
                Self::Table(_) => "Table(...)",
                Self::Memory(_) => "Memory(...)",
            }
        )
    }
}

impl From<Function> for Extern {
    fn from(r: Function) -> Self {
        Self::Function(r)
    }
}

impl From<Global> for Extern {
    fn from(r: Global) -> Self {
        Self::Global(r)
    }
}

impl From<Table> for Extern {
    fn from(r: Table) -> Self {
        Self::Table(r)
    }
}

impl From<Memory> for Extern {
    fn from(r: Memory) -> Self {
        Self::Memory(r)
    }
}
