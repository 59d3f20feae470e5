// Plugin Declaration Normalizer
//
// Reads the `plugins` array of compiler options into plugin descriptors.
// The same array configures unrelated compiler features (language service
// plugins and the like), so anything that is not a transform entry is skipped.

use std::path::{Component, Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::descriptor::{PluginDescriptor, PluginKind, TransformPhase};
use crate::plugins::diagnostics::PluginError;

const LEGACY_KEY: &str = "customTransformers";
const TRANSFORM_KEY: &str = "transform";

/// Normalizes plugin entries in array order.
///
/// Relative module paths (`./`, `../`) are resolved against `base_dir` when
/// one is given.
pub fn normalize_plugins(
    entries: &[Value],
    base_dir: Option<&Path>,
) -> Result<Vec<PluginDescriptor>, PluginError> {
    let mut descriptors = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let Some(object) = entry.as_object() else {
            debug!(index, "skipping non-object plugin entry");
            continue;
        };

        let is_legacy = object.contains_key(LEGACY_KEY);
        // A null `transform` reads as an absent key.
        let is_modern = object.get(TRANSFORM_KEY).is_some_and(|v| !v.is_null());
        if !is_legacy && !is_modern {
            let name = object.get("name").and_then(Value::as_str).unwrap_or("");
            debug!(index, name, "skipping plugin entry without a transform");
            continue;
        }

        if is_legacy {
            normalize_legacy(index, object, base_dir, &mut descriptors)?;
        }
        if is_modern {
            descriptors.push(normalize_modern(index, object, base_dir)?);
        }
    }

    trace!(count = descriptors.len(), "normalized plugin entries");
    Ok(descriptors)
}

/// `{ customTransformers: { before: [...], after: [...] } }`
fn normalize_legacy(
    index: usize,
    object: &Map<String, Value>,
    base_dir: Option<&Path>,
    out: &mut Vec<PluginDescriptor>,
) -> Result<(), PluginError> {
    let Some(groups) = object.get(LEGACY_KEY).and_then(Value::as_object) else {
        return Err(malformed(index, "`customTransformers` must be an object"));
    };

    for (key, phase) in [("before", TransformPhase::Before), ("after", TransformPhase::After)] {
        let Some(paths) = groups.get(key) else {
            continue;
        };
        let Some(paths) = paths.as_array() else {
            return Err(malformed(
                index,
                format!("`customTransformers.{}` must be an array of module paths", key),
            ));
        };
        for path in paths {
            let Some(path) = path.as_str() else {
                return Err(malformed(
                    index,
                    format!("`customTransformers.{}` entries must be strings", key),
                ));
            };
            out.push(
                PluginDescriptor::new(resolve_module_specifier(path, base_dir))
                    .with_phase(phase)
                    .with_config(Value::Object(object.clone())),
            );
        }
    }
    Ok(())
}

/// `{ transform, import?, type?, after?, afterDeclarations?, beforeEmit?, ...config }`
fn normalize_modern(
    index: usize,
    object: &Map<String, Value>,
    base_dir: Option<&Path>,
) -> Result<PluginDescriptor, PluginError> {
    let Some(module) = object.get(TRANSFORM_KEY).and_then(Value::as_str) else {
        return Err(malformed(index, "`transform` must be a module path string"));
    };

    let import_name = match object.get("import") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name.clone()),
        Some(_) => return Err(malformed(index, "`import` must be a string")),
    };

    let mut kind = match object.get("type") {
        None | Some(Value::Null) => PluginKind::default(),
        Some(Value::String(name)) => PluginKind::from_type_name(name)
            .ok_or_else(|| malformed(index, format!("unknown transformer type '{}'", name)))?,
        Some(_) => return Err(malformed(index, "`type` must be a string")),
    };

    // `beforeEmit` and `transformProgram` both mark a program transform.
    if flag(object, "beforeEmit") || flag(object, "transformProgram") {
        kind = PluginKind::Program;
    }

    let phase = if flag(object, "afterDeclarations") {
        TransformPhase::AfterDeclarations
    } else if flag(object, "after") {
        TransformPhase::After
    } else {
        TransformPhase::Before
    };

    let mut descriptor = PluginDescriptor::new(resolve_module_specifier(module, base_dir))
        .with_kind(kind)
        .with_phase(phase)
        .with_config(Value::Object(object.clone()));
    descriptor.import_name = import_name;
    Ok(descriptor)
}

fn flag(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn malformed(index: usize, reason: impl Into<String>) -> PluginError {
    PluginError::MalformedPluginConfig {
        index,
        reason: reason.into(),
    }
}

/// Resolves `./` and `../` specifiers against `base_dir`; package specifiers
/// and absolute paths are returned untouched.
pub fn resolve_module_specifier(specifier: &str, base_dir: Option<&Path>) -> String {
    let is_relative = specifier.starts_with("./") || specifier.starts_with("../");
    match base_dir {
        Some(base) if is_relative => normalize_path(&base.join(specifier))
            .to_string_lossy()
            .into_owned(),
        _ => specifier.to_string(),
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
