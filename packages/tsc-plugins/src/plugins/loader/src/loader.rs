// Transform Module Loader
//
// Resolves plugin descriptors to their exports, evaluating each module once
// per compilation session.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use super::module::{ModuleResolver, TransformExport, TransformModule};
use crate::plugins::config::{PluginDescriptor, TransformIdentity};
use crate::plugins::diagnostics::PluginError;

/// A descriptor paired with the export it resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedTransform {
    pub descriptor: PluginDescriptor,
    pub export: TransformExport,
}

impl ResolvedTransform {
    pub fn identity(&self) -> TransformIdentity {
        self.descriptor.identity()
    }
}

pub struct TransformModuleLoader {
    resolver: Rc<dyn ModuleResolver>,
    /// Evaluated modules by specifier.
    modules: RefCell<HashMap<String, Rc<TransformModule>>>,
    /// Selected exports by identity.
    exports: RefCell<HashMap<TransformIdentity, TransformExport>>,
}

impl TransformModuleLoader {
    pub fn new(resolver: Rc<dyn ModuleResolver>) -> Self {
        Self {
            resolver,
            modules: RefCell::new(HashMap::new()),
            exports: RefCell::new(HashMap::new()),
        }
    }

    /// Loads one descriptor.
    ///
    /// Repeated loads of the same identity return the same export.
    pub fn load(&self, descriptor: &PluginDescriptor) -> Result<ResolvedTransform, PluginError> {
        let identity = descriptor.identity();
        if let Some(export) = self.exports.borrow().get(&identity) {
            trace!(%identity, "transform export cache hit");
            return Ok(ResolvedTransform {
                descriptor: descriptor.clone(),
                export: export.clone(),
            });
        }

        let module = self.load_module(&descriptor.transform_module)?;
        let export = module
            .resolve_export(descriptor.import_name.as_deref())
            .cloned()
            .ok_or_else(|| PluginError::TransformExport {
                module: descriptor.transform_module.clone(),
                export: descriptor.export_name().to_string(),
            })?;

        if !export.supports(descriptor.kind) {
            return Err(PluginError::IncompatibleExport {
                module: descriptor.transform_module.clone(),
                export: descriptor.export_name().to_string(),
                kind: descriptor.kind,
            });
        }

        debug!(%identity, ?export, "loaded transform");
        self.exports.borrow_mut().insert(identity, export.clone());
        Ok(ResolvedTransform {
            descriptor: descriptor.clone(),
            export,
        })
    }

    /// Loads every descriptor in order, stopping at the first failure.
    pub fn load_all(
        &self,
        descriptors: &[PluginDescriptor],
    ) -> Result<Vec<ResolvedTransform>, PluginError> {
        descriptors.iter().map(|d| self.load(d)).collect()
    }

    pub fn loaded_module_count(&self) -> usize {
        self.modules.borrow().len()
    }

    fn load_module(&self, specifier: &str) -> Result<Rc<TransformModule>, PluginError> {
        if let Some(module) = self.modules.borrow().get(specifier) {
            return Ok(Rc::clone(module));
        }

        let module = self
            .resolver
            .resolve(specifier)
            .ok_or_else(|| PluginError::TransformLoad {
                module: specifier.to_string(),
            })?;
        debug!(
            specifier,
            exports = ?module.export_names().collect::<Vec<_>>(),
            "evaluated transform module"
        );
        self.modules
            .borrow_mut()
            .insert(specifier.to_string(), Rc::clone(&module));
        Ok(module)
    }
}
