// Transform Modules
//
// What a resolved transform module exposes, and where modules come from.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;
use ts::{CompilerOptions, Program, TransformationContext, Transformer, TransformerFactory, TypeChecker};

use crate::plugins::config::{PluginKind, DEFAULT_EXPORT};
use crate::plugins::program_transform::ProgramTransformContext;

pub type ConfigFactory = Rc<dyn Fn(&TransformationContext, &Value) -> Transformer>;
pub type CheckerFactory = Rc<dyn Fn(&TransformationContext, &TypeChecker, &Value) -> Transformer>;
pub type CompilerOptionsFactory =
    Rc<dyn Fn(&TransformationContext, &CompilerOptions, &Value) -> Transformer>;
pub type ProgramTransformer = Rc<
    dyn Fn(Rc<Program>, &mut ProgramTransformContext<'_>, &Value) -> anyhow::Result<Rc<Program>>,
>;

/// A value exported by a transform module, tagged by call shape.
#[derive(Clone)]
pub enum TransformExport {
    Factory(TransformerFactory),
    ConfigFactory(ConfigFactory),
    CheckerFactory(CheckerFactory),
    CompilerOptionsFactory(CompilerOptionsFactory),
    Program(ProgramTransformer),
}

impl TransformExport {
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&TransformationContext) -> Transformer + 'static,
    {
        TransformExport::Factory(Rc::new(f))
    }

    pub fn config_factory<F>(f: F) -> Self
    where
        F: Fn(&TransformationContext, &Value) -> Transformer + 'static,
    {
        TransformExport::ConfigFactory(Rc::new(f))
    }

    pub fn checker_factory<F>(f: F) -> Self
    where
        F: Fn(&TransformationContext, &TypeChecker, &Value) -> Transformer + 'static,
    {
        TransformExport::CheckerFactory(Rc::new(f))
    }

    pub fn compiler_options_factory<F>(f: F) -> Self
    where
        F: Fn(&TransformationContext, &CompilerOptions, &Value) -> Transformer + 'static,
    {
        TransformExport::CompilerOptionsFactory(Rc::new(f))
    }

    pub fn program<F>(f: F) -> Self
    where
        F: Fn(Rc<Program>, &mut ProgramTransformContext<'_>, &Value) -> anyhow::Result<Rc<Program>>
            + 'static,
    {
        TransformExport::Program(Rc::new(f))
    }

    /// Whether this export can be invoked with `kind`'s calling convention.
    pub fn supports(&self, kind: PluginKind) -> bool {
        matches!(
            (kind, self),
            (PluginKind::Plain | PluginKind::Raw, TransformExport::Factory(_))
                | (PluginKind::Config, TransformExport::ConfigFactory(_))
                | (PluginKind::Checker, TransformExport::CheckerFactory(_))
                | (PluginKind::CompilerOptions, TransformExport::CompilerOptionsFactory(_))
                | (PluginKind::Program, TransformExport::Program(_))
        )
    }

    fn shape(&self) -> &'static str {
        match self {
            TransformExport::Factory(_) => "Factory",
            TransformExport::ConfigFactory(_) => "ConfigFactory",
            TransformExport::CheckerFactory(_) => "CheckerFactory",
            TransformExport::CompilerOptionsFactory(_) => "CompilerOptionsFactory",
            TransformExport::Program(_) => "Program",
        }
    }
}

impl fmt::Debug for TransformExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransformExport::{}", self.shape())
    }
}

/// A loaded transform module: an optional main value plus named exports.
#[derive(Debug, Clone, Default)]
pub struct TransformModule {
    main: Option<TransformExport>,
    exports: IndexMap<String, TransformExport>,
}

impl TransformModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value the module itself evaluates to.
    pub fn with_main(mut self, export: TransformExport) -> Self {
        self.main = Some(export);
        self
    }

    pub fn with_export(mut self, name: &str, export: TransformExport) -> Self {
        self.exports.insert(name.to_string(), export);
        self
    }

    /// Selects the export for an import name.
    ///
    /// Without an import name the `default` export is used, falling back to
    /// the module's main value.
    pub fn resolve_export(&self, import_name: Option<&str>) -> Option<&TransformExport> {
        match import_name {
            Some(name) => self.exports.get(name),
            None => self.exports.get(DEFAULT_EXPORT).or(self.main.as_ref()),
        }
    }

    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }
}

/// Source of transform modules.
pub trait ModuleResolver {
    /// Resolves and evaluates the module named by `specifier`.
    fn resolve(&self, specifier: &str) -> Option<Rc<TransformModule>>;
}

type ModuleBuilder = Box<dyn Fn() -> TransformModule>;

/// In-memory resolver mapping specifiers to modules.
///
/// Modules registered with [`ModuleRegistry::register_lazy`] are built on
/// every resolution, so caching is observable through [`ModuleRegistry::evaluations`].
#[derive(Default)]
pub struct ModuleRegistry {
    modules: RefCell<IndexMap<String, ModuleBuilder>>,
    evaluations: Cell<usize>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, specifier: &str, module: TransformModule) {
        let module = Rc::new(module);
        self.modules.borrow_mut().insert(
            specifier.to_string(),
            Box::new(move || TransformModule::clone(&module)),
        );
    }

    pub fn register_lazy<F>(&self, specifier: &str, builder: F)
    where
        F: Fn() -> TransformModule + 'static,
    {
        self.modules
            .borrow_mut()
            .insert(specifier.to_string(), Box::new(builder));
    }

    pub fn with_module(self, specifier: &str, module: TransformModule) -> Self {
        self.register(specifier, module);
        self
    }

    /// Number of module evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }
}

impl ModuleResolver for ModuleRegistry {
    fn resolve(&self, specifier: &str) -> Option<Rc<TransformModule>> {
        let modules = self.modules.borrow();
        let builder = modules.get(specifier)?;
        self.evaluations.set(self.evaluations.get() + 1);
        Some(Rc::new(builder()))
    }
}
