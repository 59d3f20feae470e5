use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::program::CompilerOptions;
use crate::source_file::SourceFile;
use crate::Diagnostic;

/// Per-file transformer produced by a factory for one emit.
pub type Transformer = Box<dyn FnMut(SourceFile) -> SourceFile>;

/// Factory invoked once per emit with that emit's context.
pub type TransformerFactory = Rc<dyn Fn(&TransformationContext) -> Transformer>;

/// Wraps a closure as a [`TransformerFactory`].
pub fn transformer_factory<F>(factory: F) -> TransformerFactory
where
    F: Fn(&TransformationContext) -> Transformer + 'static,
{
    Rc::new(factory)
}

/// Shared, append-only collection of diagnostics reported during a transform.
#[derive(Clone, Default)]
pub struct DiagnosticSink {
    entries: Rc<RefCell<Vec<Diagnostic>>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drains everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("len", &self.len())
            .finish()
    }
}

/// State handed to every transformer factory during one emit.
#[derive(Debug, Clone)]
pub struct TransformationContext {
    options: Rc<CompilerOptions>,
    diagnostics: DiagnosticSink,
}

impl TransformationContext {
    pub fn new(options: Rc<CompilerOptions>) -> Self {
        Self::with_diagnostics(options, DiagnosticSink::new())
    }

    pub fn with_diagnostics(options: Rc<CompilerOptions>, diagnostics: DiagnosticSink) -> Self {
        Self {
            options,
            diagnostics,
        }
    }

    pub fn get_compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn add_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }
}

/// Transformers passed to emit, grouped by phase.
#[derive(Clone, Default)]
pub struct CustomTransformers {
    pub before: Vec<TransformerFactory>,
    pub after: Vec<TransformerFactory>,
    pub after_declarations: Vec<TransformerFactory>,
}

impl CustomTransformers {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.after_declarations.is_empty()
    }
}

impl fmt::Debug for CustomTransformers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTransformers")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .field("after_declarations", &self.after_declarations.len())
            .finish()
    }
}
