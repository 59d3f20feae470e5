// Diagnostic Merger
//
// Folds diagnostics reported by plugins into an emit result.

use tracing::trace;
use ts::{Diagnostic, EmitResult};

/// Appends `plugin_diagnostics` after the diagnostics already in `result`.
///
/// Both sides are kept as reported, in order. A plugin reporting the same
/// diagnostic for two files shows up twice.
pub fn merge_diagnostics(
    mut result: EmitResult,
    plugin_diagnostics: impl IntoIterator<Item = Diagnostic>,
) -> EmitResult {
    let built_in = result.diagnostics.len();
    result.diagnostics.extend(plugin_diagnostics);
    trace!(
        built_in,
        plugin = result.diagnostics.len() - built_in,
        "merged emit diagnostics"
    );
    result
}
