// Plugin Descriptor
//
// Uniform representation of one configured transformer plugin.

use std::fmt;

use serde_json::Value;

/// Export name read when an entry does not name one.
pub const DEFAULT_EXPORT: &str = "default";

/// Calling convention used to invoke a loaded transform export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PluginKind {
    /// Factory taking the transformation context.
    #[default]
    Plain,
    /// Factory taking the context and the plugin's own config object.
    Config,
    /// Transformer factory handed to emit as-is.
    Raw,
    /// Whole-program transform applied before emit.
    Program,
    /// Factory taking the context, the type checker and the config.
    Checker,
    /// Factory taking the context, the compiler options and the config.
    CompilerOptions,
}

impl PluginKind {
    /// Parses the `type` field of a plugin entry.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "plain" => Some(PluginKind::Plain),
            "config" => Some(PluginKind::Config),
            "raw" => Some(PluginKind::Raw),
            "program" => Some(PluginKind::Program),
            "checker" => Some(PluginKind::Checker),
            "compilerOptions" => Some(PluginKind::CompilerOptions),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Plain => "plain",
            PluginKind::Config => "config",
            PluginKind::Raw => "raw",
            PluginKind::Program => "program",
            PluginKind::Checker => "checker",
            PluginKind::CompilerOptions => "compilerOptions",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emission stage a transformer runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformPhase {
    #[default]
    Before,
    After,
    AfterDeclarations,
}

impl TransformPhase {
    pub const ALL: [TransformPhase; 3] = [
        TransformPhase::Before,
        TransformPhase::After,
        TransformPhase::AfterDeclarations,
    ];
}

impl fmt::Display for TransformPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransformPhase::Before => "before",
            TransformPhase::After => "after",
            TransformPhase::AfterDeclarations => "afterDeclarations",
        })
    }
}

/// Key under which a transform is cached and tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformIdentity {
    pub module: String,
    pub import_name: Option<String>,
    pub kind: PluginKind,
}

impl fmt::Display for TransformIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} ({})",
            self.module,
            self.import_name.as_deref().unwrap_or(DEFAULT_EXPORT),
            self.kind
        )
    }
}

/// One normalized plugin declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginDescriptor {
    /// Module specifier the transform is loaded from.
    pub transform_module: String,
    /// Named export to read; `None` selects the default export.
    pub import_name: Option<String>,
    pub kind: PluginKind,
    pub phase: TransformPhase,
    /// Set for program-level transforms, which run against the Program before emit.
    pub before_emit: bool,
    /// The plugin entry as written, handed to config-aware kinds.
    pub config: Value,
}

impl PluginDescriptor {
    pub fn new(transform_module: impl Into<String>) -> Self {
        Self {
            transform_module: transform_module.into(),
            import_name: None,
            kind: PluginKind::Plain,
            phase: TransformPhase::Before,
            before_emit: false,
            config: Value::Object(Default::default()),
        }
    }

    pub fn with_import(mut self, import_name: impl Into<String>) -> Self {
        self.import_name = Some(import_name.into());
        self
    }

    pub fn with_kind(mut self, kind: PluginKind) -> Self {
        self.kind = kind;
        self.before_emit = kind == PluginKind::Program;
        self
    }

    pub fn with_phase(mut self, phase: TransformPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    pub fn identity(&self) -> TransformIdentity {
        TransformIdentity {
            module: self.transform_module.clone(),
            import_name: self.import_name.clone(),
            kind: self.kind,
        }
    }

    pub fn export_name(&self) -> &str {
        self.import_name.as_deref().unwrap_or(DEFAULT_EXPORT)
    }

    /// Whether this plugin is routed through the program-transform applier.
    pub fn is_program_transform(&self) -> bool {
        self.kind == PluginKind::Program
    }
}
