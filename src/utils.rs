use crate::errors::{CompileError, WasmError};
use std::borrow::Cow;

/// Parses in-memory bytes as either the WebAssembly Text format, or a
/// binary WebAssembly module.
///
/// Binary input is passed through unchanged, so callers can feed
/// either encoding without sniffing it first.
///
/// # Example
///
/// ```
/// use wasmbind::wat2wasm;
///
/// let wasm_bytes = wat2wasm(b"(module)").unwrap();
/// assert_eq!(&wasm_bytes[..], b"\0asm\x01\0\0\0");
/// ```
pub fn wat2wasm(bytes: &[u8]) -> Result<Cow<'_, [u8]>, CompileError> {
    wat::parse_bytes(bytes)
        .map_err(|e| CompileError::Wasm(WasmError::Generic(format!("Error when converting wat: {e}"))))
}
