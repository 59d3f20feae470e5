// Program Transform Applier
//
// Runs program-level plugins against a Program before it reaches emit.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, debug_span};
use ts::{CompilerHost, InMemoryCompilerHost, Program};

use super::context::ProgramTransformContext;
use super::record::ProgramTransformRecord;
use crate::plugins::diagnostics::PluginError;
use crate::plugins::loader::{ResolvedTransform, TransformExport};

pub struct ProgramTransformApplier<'a> {
    transforms: Vec<ResolvedTransform>,
    pub(super) record: &'a RefCell<ProgramTransformRecord>,
    /// Overlay receiving files injected by transforms.
    pub(super) host: Rc<InMemoryCompilerHost>,
}

impl<'a> ProgramTransformApplier<'a> {
    /// Keeps the program-level transforms of `resolved`, in configuration order.
    pub fn new(
        resolved: &[ResolvedTransform],
        record: &'a RefCell<ProgramTransformRecord>,
        host: Rc<dyn CompilerHost>,
    ) -> Self {
        let transforms = resolved
            .iter()
            .filter(|t| t.descriptor.is_program_transform())
            .cloned()
            .collect();
        Self {
            transforms,
            record,
            host: Rc::new(InMemoryCompilerHost::overlay(host)),
        }
    }

    pub fn has_transforms(&self) -> bool {
        !self.transforms.is_empty()
    }

    pub fn host(&self) -> &InMemoryCompilerHost {
        &self.host
    }

    /// Applies every transform not yet recorded for `program`'s lineage.
    ///
    /// Each applied transform replaces the working Program with its result,
    /// and the result inherits the lineage plus the transform's identity.
    pub fn apply(&self, program: Rc<Program>) -> Result<Rc<Program>, PluginError> {
        let mut working = program;

        for resolved in &self.transforms {
            let identity = resolved.identity();
            if self.record.borrow().is_applied(working.id(), &identity) {
                debug!(%identity, program = %working.id(), "program transform already applied");
                continue;
            }
            let TransformExport::Program(transform) = &resolved.export else {
                continue;
            };

            let _span = debug_span!("program_transform", %identity, input = %working.id()).entered();
            let mut ctx = ProgramTransformContext::new(self, Rc::clone(&working), identity.clone());
            let next = transform(Rc::clone(&working), &mut ctx, &resolved.descriptor.config)
                .map_err(PluginError::Transformer)?;
            let reported = ctx.into_diagnostics();

            let mut record = self.record.borrow_mut();
            record.inherit(&working, &next, [identity]);
            for diagnostic in reported {
                record.add_diagnostic(&next, diagnostic);
            }
            debug!(
                output = %next.id(),
                applied = record.applied_count(next.id()),
                "program transform applied"
            );
            working = next;
        }

        Ok(working)
    }
}
