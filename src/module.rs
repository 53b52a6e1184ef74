use crate::errors::{CompileError, WasmError};
use crate::store::Store;
use crate::types::{ExportType, ExternType, ImportType};
use crate::utils::wat2wasm;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

/// A WebAssembly Module contains stateless WebAssembly
/// code that has already been compiled and can be instantiated
/// multiple times.
///
/// A module is the parsed, validated description of a WebAssembly
/// binary: it exposes the ordered list of export descriptors and the
/// import requirements, but holds no runtime objects itself. Cloning
/// a module is cheap.
///
/// Spec: <https://webassembly.github.io/spec/core/exec/runtime.html#module-instances>
#[derive(Clone)]
pub struct Module {
    pub(crate) inner: wasmi::Module,
    info: Arc<ModuleInfo>,
    name: Option<Arc<str>>,
}

/// The module's import and export descriptors, in declaration order.
///
/// The engine reports descriptors name sorted, so the order is
/// recovered from the binary's own import and export sections and the
/// engine's types are re-keyed onto it at construction.
struct ModuleInfo {
    exports: Vec<ExportType>,
    imports: Vec<ImportType>,
}

impl Module {
    /// Creates a new WebAssembly Module given the configuration
    /// in the store.
    ///
    /// If the provided bytes are not WebAssembly-like (start with
    /// b"\0asm"), this function will try to parse it as the
    /// WebAssembly text format, which the execution engine's parser
    /// accepts as an alternate input encoding.
    ///
    /// On malformed or invalid input, compilation fails with a
    /// [`CompileError`] carrying the engine's diagnostic; no partial
    /// module is ever returned.
    ///
    /// # Example
    ///
    /// ```
    /// use wasmbind::{Module, Store};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let store = Store::default();
    /// let module = Module::new(&store, "(module)")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(store: &Store, bytes: impl AsRef<[u8]>) -> Result<Self, CompileError> {
        let bytes = wat2wasm(bytes.as_ref())?;

        Self::from_binary(store, &bytes)
    }

    /// Creates a new WebAssembly module from a binary.
    ///
    /// Parsing and validation are delegated to the execution engine;
    /// the declared import and export order is taken from the binary
    /// itself.
    pub fn from_binary(store: &Store, binary: &[u8]) -> Result<Self, CompileError> {
        tracing::trace!(bytes = binary.len(), "compiling module");

        let (export_names, import_names) = declared_order(binary)?;

        let inner = wasmi::Module::new(store.engine(), binary)
            .map_err(|e| CompileError::Validate(e.to_string()))?;

        let info = bind_descriptors(&inner, export_names, import_names)?;

        Ok(Self {
            inner,
            info: Arc::new(info),
            name: None,
        })
    }

    /// Validates a new WebAssembly Module given the configuration
    /// in the [`Store`].
    ///
    /// This validation is normally pretty fast and checks the enabled
    /// WebAssembly features in the Store engine to assure deterministic
    /// validation of the Module.
    pub fn validate(store: &Store, binary: &[u8]) -> Result<(), CompileError> {
        Self::from_binary(store, binary).map(|_| ())
    }

    /// Returns the name of the current module.
    ///
    /// The name is an optional debugging aid; it is not part of the
    /// export surface.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the name of the current module.
    pub fn set_name(&mut self, name: &str) -> bool {
        self.name = Some(Arc::from(name));
        true
    }

    /// Returns an iterator over the exported types in the Module.
    ///
    /// The order of the exports is the declaration order of the
    /// module, which is also the order in which an [`Instance`]'s
    /// exports will be bound and iterated.
    ///
    /// [`Instance`]: crate::Instance
    ///
    /// # Example
    ///
    /// ```
    /// use wasmbind::{Module, Store};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let store = Store::default();
    /// let wat = r#"(module
    ///     (func (export "namedfunc"))
    ///     (memory (export "namedmemory") 1)
    /// )"#;
    /// let module = Module::new(&store, wat)?;
    /// for export in module.exports() {
    ///     println!("{}: {:?}", export.name(), export.ty());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn exports(&self) -> impl Iterator<Item = ExportType> + '_ {
        self.info.exports.iter().cloned()
    }

    /// Returns an iterator over the imported types in the Module.
    ///
    /// The order of the imports is the order in the original
    /// WebAssembly module.
    pub fn imports(&self) -> impl Iterator<Item = ImportType> + '_ {
        self.info.imports.iter().cloned()
    }
}

/// Scans the binary's import and export sections and returns the
/// declared names in section order.
fn declared_order(binary: &[u8]) -> Result<(Vec<String>, Vec<(String, String)>), CompileError> {
    let mut exports = Vec::new();
    let mut imports = Vec::new();

    for payload in wasmparser::Parser::new(0).parse_all(binary) {
        match payload.map_err(invalid_wasm)? {
            wasmparser::Payload::ImportSection(section) => {
                for import in section {
                    let import = import.map_err(invalid_wasm)?;
                    imports.push((import.module.to_string(), import.name.to_string()));
                }
            }
            wasmparser::Payload::ExportSection(section) => {
                for export in section {
                    let export = export.map_err(invalid_wasm)?;
                    exports.push(export.name.to_string());
                }
            }
            _ => {}
        }
    }

    Ok((exports, imports))
}

fn invalid_wasm(error: wasmparser::BinaryReaderError) -> CompileError {
    CompileError::Wasm(WasmError::InvalidWebAssembly {
        message: error.message().to_string(),
        offset: error.offset(),
    })
}

/// Re-keys the engine's (name sorted) descriptor types onto the
/// declared order.
fn bind_descriptors(
    module: &wasmi::Module,
    export_names: Vec<String>,
    import_names: Vec<(String, String)>,
) -> Result<ModuleInfo, CompileError> {
    let mut export_types: HashMap<String, ExternType> = module
        .exports()
        .map(|export| (export.name().to_string(), export.ty().clone()))
        .collect();

    let exports = export_names
        .into_iter()
        .map(|name| {
            let ty = export_types
                .remove(&name)
                .ok_or_else(|| CompileError::Validate(format!("export `{name}` has no type")))?;
            Ok(ExportType::new(&name, ty))
        })
        .collect::<Result<Vec<_>, CompileError>>()?;

    // A module may declare the same (namespace, name) pair more than
    // once, so the types queue up per pair.
    let mut import_types: HashMap<(String, String), VecDeque<ExternType>> = HashMap::new();
    for import in module.imports() {
        import_types
            .entry((import.module().to_string(), import.name().to_string()))
            .or_default()
            .push_back(import.ty().clone());
    }

    let imports = import_names
        .into_iter()
        .map(|(ns, name)| {
            let ty = import_types
                .get_mut(&(ns.clone(), name.clone()))
                .and_then(|types| types.pop_front())
                .ok_or_else(|| {
                    CompileError::Validate(format!("import `{ns}.{name}` has no type"))
                })?;
            Ok(ImportType::new(&ns, &name, ty))
        })
        .collect::<Result<Vec<_>, CompileError>>()?;

    Ok(ModuleInfo { exports, imports })
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name())
            .finish()
    }
}
