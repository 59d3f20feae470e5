#![deny(clippy::all)]

/**
 * Transformer plugin engine for a TypeScript-compatible compiler
 *
 * Reads transformer plugins from compilerOptions.plugins and runs them
 * through transpile, program creation and emit.
 */
// The host compiler surfaces plugins are written against
pub use ts;

pub mod plugins;
pub mod tracing_config;

pub use plugins::*;

/// Engine version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
