//! The error taxonomy of the binding layer.
//!
//! Every failure is synchronous and carried through `Result`; nothing
//! is retried or swallowed. The taxonomy separates compile-time
//! failures ([`CompileError`]), import resolution and linking failures
//! ([`LinkError`]), instantiation failures ([`InstantiationError`])
//! and execution traps ([`RuntimeError`]).

use crate::types::ExternType;
use std::fmt;
use thiserror::Error;

/// The WebAssembly.CompileError object indicates an error during
/// WebAssembly decoding or validation.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    /// A Wasm translation error occurred.
    #[error("WebAssembly translation error: {0}")]
    Wasm(#[from] WasmError),

    /// The module did not pass validation.
    #[error("Validation error: {0}")]
    Validate(String),
}

/// A WebAssembly translation error.
///
/// When a WebAssembly function can't be translated, one of these error
/// codes will be returned to describe the failure.
#[derive(Error, Debug, Clone)]
pub enum WasmError {
    /// The input WebAssembly code is invalid.
    ///
    /// This error code is used by a WebAssembly translator when it
    /// encounters invalid WebAssembly code. This should never happen
    /// for validated WebAssembly code.
    #[error("Invalid input WebAssembly code at offset {offset}: {message}")]
    InvalidWebAssembly {
        /// A string describing the validation error.
        message: String,
        /// The bytecode offset where the error occurred.
        offset: usize,
    },

    /// A generic error.
    #[error("{0}")]
    Generic(String),
}

/// An ImportError.
#[derive(Error, Debug, Clone)]
pub enum ImportError {
    /// An incompatible import type: the module declared one extern
    /// kind or signature and the resolved import has another.
    #[error("incompatible import type. Expected {0:?} but received {1:?}")]
    IncompatibleType(ExternType, ExternType),

    /// A module declares an import the resolution table does not
    /// provide.
    #[error("unknown import. Expected {0:?}")]
    UnknownImport(ExternType),
}

/// The WebAssembly.LinkError object indicates an error during
/// module instantiation (besides traps from the start function).
#[derive(Error, Debug, Clone)]
pub enum LinkError {
    /// An error occurred when checking the import types.
    #[error("Error while importing {0:?}.{1:?}: {2}")]
    Import(String, String, ImportError),

    /// A trap occurred during linking.
    #[error("RuntimeError: \n{0}")]
    Trap(#[source] RuntimeError),

    /// Insufficient resources available for linking.
    #[error("Insufficient resources: {0}")]
    Resource(String),
}

/// An error while instantiating a module.
///
/// Instantiation is atomic: whichever variant is raised, no `Instance`
/// has been produced and the store holds no half-initialized state
/// observable through this crate.
#[derive(Error, Debug)]
pub enum InstantiationError {
    /// A linking error occurred.
    ///
    /// This happens when an import is missing, when the kind of the
    /// provided extern does not match the module's declaration, or
    /// when the engine rejects a definition.
    #[error(transparent)]
    Link(LinkError),

    /// The module's start function trapped.
    #[error(transparent)]
    Start(RuntimeError),

    /// The engine did not materialize a runtime object for a declared
    /// export. Unreachable through a validated module.
    #[error("Export `{0}` was declared by the module but not produced by the engine")]
    NotInExports(String),
}

/// A trap raised while executing WebAssembly code or a host function.
///
/// Traps surface synchronously from [`Function::call`] and from a
/// failing start function. A trap never corrupts the store or an
/// instance's export table; both remain usable afterwards.
///
/// [`Function::call`]: crate::Function::call
#[derive(Clone)]
pub struct RuntimeError {
    message: String,
}

impl RuntimeError {
    /// Creates a new user `RuntimeError` with the given message.
    ///
    /// ```
    /// let trap = wasmbind::RuntimeError::new("unexpected error");
    /// assert_eq!("unexpected error", trap.message());
    /// ```
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns a reference to the description of this trap.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RuntimeError: {}", self.message)
    }
}

impl fmt::Debug for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RuntimeError")
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for RuntimeError {}

impl From<wasmi::Error> for RuntimeError {
    fn from(error: wasmi::Error) -> Self {
        Self::new(error.to_string())
    }
}
