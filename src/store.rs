//! The store holds the engine and every runtime object created
//! during the lifetime of the abstract machine.

use wasmi::Engine;

/// The store represents all global state that can be manipulated by
/// WebAssembly programs. It consists of the runtime representation
/// of all instances of functions, tables, memories, and globals that
/// have been allocated during the lifetime of the abstract machine.
///
/// The `Store` holds the engine (that is used to compile the Wasm
/// bytes into a valid module artifact and to execute it).
///
/// Spec: <https://webassembly.github.io/spec/core/exec/runtime.html#store>
///
/// Runtime objects ([`Function`], [`Global`], [`Table`], [`Memory`])
/// are keyed into the store that created them and must only be used
/// with that store. The layer is fully synchronous: no operation on a
/// store suspends or blocks.
///
/// [`Function`]: crate::Function
/// [`Global`]: crate::Global
/// [`Table`]: crate::Table
/// [`Memory`]: crate::Memory
#[derive(Debug)]
pub struct Store {
    pub(crate) inner: wasmi::Store<()>,
}

impl Store {
    /// Creates a new `Store` with a default execution engine.
    pub fn new() -> Self {
        let engine = Engine::default();

        Self {
            inner: wasmi::Store::new(&engine, ()),
        }
    }

    /// Returns the [`Engine`] used by this store.
    pub fn engine(&self) -> &Engine {
        self.inner.engine()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
