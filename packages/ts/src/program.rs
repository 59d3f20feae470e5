use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::host::CompilerHost;
use crate::source_file::SourceFile;
use crate::type_checker::TypeChecker;
use crate::{Diagnostic, ScriptTarget};

/// Diagnostic code for a root file the host could not supply.
pub const FILE_NOT_FOUND_CODE: i32 = 6053;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ScriptTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_emit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_emit_on_error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_lib: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_resolve: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    /// Plugin entries, kept raw: the same array configures unrelated compiler
    /// features alongside transformers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Value>,
    /// Options this layer does not model, preserved as written.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl CompilerOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn script_target(&self) -> ScriptTarget {
        self.target.unwrap_or_default()
    }

    pub fn with_plugins(mut self, plugins: Vec<Value>) -> Self {
        self.plugins = plugins;
        self
    }
}

pub fn get_default_compiler_options() -> CompilerOptions {
    CompilerOptions {
        target: Some(ScriptTarget::ES5),
        ..CompilerOptions::default()
    }
}

static NEXT_PROGRAM_ID: AtomicU32 = AtomicU32::new(1);

/// Opaque identity of one [`Program`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(u32);

impl ProgramId {
    fn next() -> Self {
        ProgramId(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program#{}", self.0)
    }
}

/// An immutable set of source files compiled together.
///
/// Programs are replaced, never mutated: a transform that changes the file
/// set produces a new `Program` with a fresh [`ProgramId`].
#[derive(Debug)]
pub struct Program {
    id: ProgramId,
    root_names: Vec<String>,
    options: Rc<CompilerOptions>,
    source_files: IndexMap<String, SourceFile>,
    diagnostics: Vec<Diagnostic>,
}

impl Program {
    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn get_root_file_names(&self) -> &[String] {
        &self.root_names
    }

    pub fn get_compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn compiler_options_rc(&self) -> Rc<CompilerOptions> {
        Rc::clone(&self.options)
    }

    pub fn get_source_file(&self, file_name: &str) -> Option<&SourceFile> {
        self.source_files.get(file_name)
    }

    pub fn get_source_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.source_files.values()
    }

    /// Diagnostics produced while building the program (missing files and the like).
    pub fn get_global_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn get_type_checker(&self) -> TypeChecker {
        TypeChecker::new(self.id, self.source_files.keys().cloned().collect())
    }
}

/// Builds a program from root file names, reading each through `host`.
///
/// Imports are never followed; roots the host cannot supply are reported as
/// diagnostics rather than failing the call.
pub fn create_program(
    root_names: &[String],
    options: &CompilerOptions,
    host: &dyn CompilerHost,
) -> Program {
    let target = options.script_target();
    let mut source_files = IndexMap::new();
    let mut diagnostics = Vec::new();

    for name in root_names {
        if source_files.contains_key(name) {
            continue;
        }
        match host.get_source_file(name, target) {
            Some(file) => {
                source_files.insert(name.clone(), file);
            }
            None => diagnostics.push(Diagnostic::error(
                FILE_NOT_FOUND_CODE,
                format!("File '{}' not found.", name),
            )),
        }
    }

    Program {
        id: ProgramId::next(),
        root_names: root_names.to_vec(),
        options: Rc::new(options.clone()),
        source_files,
        diagnostics,
    }
}
