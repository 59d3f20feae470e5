// Transformer plugin engine
//
// compilerOptions.plugins -> config -> loader -> merger / program_transform
// -> host emit -> diagnostics

pub mod config;
pub mod diagnostics;
pub mod loader;
pub mod merger;
pub mod patched;
pub mod program_transform;

pub use config::{normalize_plugins, PluginDescriptor, PluginKind, TransformIdentity, TransformPhase};
pub use diagnostics::{merge_diagnostics, PluginError};
pub use loader::{ModuleRegistry, ModuleResolver, TransformExport, TransformModule, TransformModuleLoader};
pub use merger::{merge_transformers, TransformerGroup};
pub use patched::PatchedCompiler;
pub use program_transform::{ProgramTransformApplier, ProgramTransformContext, ProgramTransformRecord};
