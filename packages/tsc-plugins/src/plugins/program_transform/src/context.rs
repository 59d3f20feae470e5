// Program Transform Context
//
// What a program transform can do besides reading the Program it was given.

use std::rc::Rc;

use ts::{create_program, CompilerOptions, Diagnostic, InMemoryCompilerHost, Program};

use super::applier::ProgramTransformApplier;
use crate::plugins::config::TransformIdentity;
use crate::plugins::diagnostics::PluginError;

pub struct ProgramTransformContext<'a> {
    applier: &'a ProgramTransformApplier<'a>,
    program: Rc<Program>,
    identity: TransformIdentity,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ProgramTransformContext<'a> {
    pub(super) fn new(
        applier: &'a ProgramTransformApplier<'a>,
        program: Rc<Program>,
        identity: TransformIdentity,
    ) -> Self {
        Self {
            applier,
            program,
            identity,
            diagnostics: Vec::new(),
        }
    }

    /// Identity of the transform being run.
    pub fn identity(&self) -> &TransformIdentity {
        &self.identity
    }

    pub fn compiler_options(&self) -> &CompilerOptions {
        self.program.get_compiler_options()
    }

    /// Root names of the Program this lineage started from.
    pub fn original_root_names(&self) -> Vec<String> {
        self.applier
            .record
            .borrow()
            .origin_root_names(&self.program)
            .to_vec()
    }

    /// Host the derived programs read from, including injected files.
    pub fn host(&self) -> &InMemoryCompilerHost {
        self.applier.host()
    }

    /// Makes a synthetic file available to programs created from this context.
    pub fn add_source_file(&self, file_name: &str, text: &str) {
        self.applier.host().write_file(file_name, text);
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Creates a Program derived from the one being transformed.
    ///
    /// The new Program joins the current lineage with this transform already
    /// recorded, then gets the remaining unapplied transforms.
    pub fn create_program(&self, root_names: &[String]) -> Result<Rc<Program>, PluginError> {
        let created = Rc::new(create_program(
            root_names,
            self.program.get_compiler_options(),
            self.applier.host(),
        ));
        self.applier
            .record
            .borrow_mut()
            .inherit(&self.program, &created, [self.identity.clone()]);
        self.applier.apply(created)
    }

    pub(super) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
