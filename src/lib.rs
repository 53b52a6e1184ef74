#![deny(trivial_numeric_casts, unused_extern_crates)]
#![warn(missing_docs, unused_import_braces)]
#![allow(clippy::new_without_default)]

//! `wasmbind` is the instantiation and export-binding layer of a
//! WebAssembly host embedding: given a compiled module and a runtime
//! store, it produces a live [`Instance`] whose externally visible
//! items (functions, globals, tables and memories) are exposed through
//! a typed, name-addressable, order-preserving [`Exports`] view.
//!
//! Parsing, validation and execution of WebAssembly code are delegated
//! to the [`wasmi`] execution engine; this crate binds the module's
//! statically declared export schema to the runtime objects the engine
//! materializes, preserving declaration order for iteration and
//! providing O(1) name lookup with predictable failures.
//!
//! # Usage
//!
//! Here is a small example of running a WebAssembly module written
//! with its WAT format (textual format):
//!
//! ```rust
//! use wasmbind::{imports, Instance, Module, Store, Val};
//!
//! fn main() -> anyhow::Result<()> {
//!     let module_wat = r#"
//!     (module
//!       (type $t0 (func (param i32) (result i32)))
//!       (func $add_one (export "add_one") (type $t0) (param $p0 i32) (result i32)
//!         local.get $p0
//!         i32.const 1
//!         i32.add))
//!     "#;
//!
//!     let mut store = Store::default();
//!     let module = Module::new(&store, module_wat)?;
//!     // The module doesn't import anything, so we create an empty
//!     // import object.
//!     let import_object = imports! {};
//!     let instance = Instance::new(&mut store, &module, &import_object)?;
//!
//!     let add_one = instance.exports.get_function("add_one")?;
//!     let result = add_one.call(&mut store, &[Val::I32(42)])?;
//!     assert_eq!(result[0].i32(), Some(43));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Overview
//!
//! * The basic elements are [`Module`] and [`Instance`];
//! * Exports of an instance are represented by the [`Exports`] object,
//!   iterable in declaration order through [`ExportsIterator`];
//! * Modules that declare imports are instantiated with an [`Imports`]
//!   resolution table, most easily built with the [`imports!`] macro;
//! * The four external kinds are [`Function`], [`Global`], [`Table`]
//!   and [`Memory`], united under the [`Extern`] tagged union.

mod errors;
mod exports;
mod externals;
mod imports;
mod instance;
mod module;
mod store;
mod types;
mod utils;

pub use crate::errors::{
    CompileError, ImportError, InstantiationError, LinkError, RuntimeError, WasmError,
};
pub use crate::exports::{ExportError, Exportable, Exports, ExportsIterator};
pub use crate::externals::{Extern, Function, Global, Memory, Table};
pub use crate::imports::{Imports, ImportsIterator};
pub use crate::instance::Instance;
pub use crate::module::Module;
pub use crate::store::Store;
pub use crate::types::{
    ExportType, ExternType, FuncType, GlobalType, ImportType, MemoryType, Mutability, TableType,
    Val, ValType,
};
pub use crate::utils::wat2wasm;
