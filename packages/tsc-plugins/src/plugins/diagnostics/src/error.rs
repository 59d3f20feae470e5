// Plugin Errors
//
// Failures raised while resolving or running configured transformer plugins.

use thiserror::Error;

use crate::plugins::config::PluginKind;

#[derive(Debug, Error)]
pub enum PluginError {
    /// The module reference could not be resolved.
    #[error("Cannot load transform module '{module}'")]
    TransformLoad { module: String },

    /// The module resolved but does not have the requested export.
    #[error("Transform module '{module}' has no export named '{export}'")]
    TransformExport { module: String, export: String },

    /// The export exists but cannot be called with the declared kind's convention.
    #[error("Export '{export}' of transform module '{module}' cannot be used as a '{kind}' transformer")]
    IncompatibleExport {
        module: String,
        export: String,
        kind: PluginKind,
    },

    /// A transform entry that is recognisably a transform entry but cannot be read.
    #[error("Malformed plugin entry at index {index}: {reason}")]
    MalformedPluginConfig { index: usize, reason: String },

    /// Compiler options JSON could not be parsed.
    #[error("Invalid compiler options: {0}")]
    Options(#[from] serde_json::Error),

    /// Error returned by a program transformer, passed through as-is.
    #[error(transparent)]
    Transformer(anyhow::Error),
}

impl PluginError {
    /// Module specifier the error is about, when there is one.
    pub fn module(&self) -> Option<&str> {
        match self {
            PluginError::TransformLoad { module }
            | PluginError::TransformExport { module, .. }
            | PluginError::IncompatibleExport { module, .. } => Some(module),
            _ => None,
        }
    }
}
