// Transformer Merger
//
// Builds the transformer group for one emit call from configured plugins and
// the transformers the caller passed in.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{trace, warn};
use ts::{
    CompilerOptions, CustomTransformers, Program, TransformationContext, TransformerFactory,
    TypeChecker,
};

use crate::plugins::config::{PluginKind, TransformPhase};
use crate::plugins::loader::{ResolvedTransform, TransformExport};

/// Final, ordered transformers handed to emit.
#[derive(Clone, Default)]
pub struct TransformerGroup {
    pub before: Vec<TransformerFactory>,
    pub after: Vec<TransformerFactory>,
    pub after_declarations: Vec<TransformerFactory>,
}

impl TransformerGroup {
    pub fn phase(&self, phase: TransformPhase) -> &[TransformerFactory] {
        match phase {
            TransformPhase::Before => &self.before,
            TransformPhase::After => &self.after,
            TransformPhase::AfterDeclarations => &self.after_declarations,
        }
    }

    fn phase_mut(&mut self, phase: TransformPhase) -> &mut Vec<TransformerFactory> {
        match phase {
            TransformPhase::Before => &mut self.before,
            TransformPhase::After => &mut self.after,
            TransformPhase::AfterDeclarations => &mut self.after_declarations,
        }
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len() + self.after_declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<TransformerGroup> for CustomTransformers {
    fn from(group: TransformerGroup) -> Self {
        CustomTransformers {
            before: group.before,
            after: group.after,
            after_declarations: group.after_declarations,
        }
    }
}

impl fmt::Debug for TransformerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerGroup")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .field("after_declarations", &self.after_declarations.len())
            .finish()
    }
}

/// What an emit offers to checker- and options-aware factories.
#[derive(Debug, Clone)]
pub struct MergeEnvironment {
    pub checker: TypeChecker,
    pub compiler_options: Rc<CompilerOptions>,
}

impl MergeEnvironment {
    pub fn from_program(program: &Program) -> Self {
        Self {
            checker: program.get_type_checker(),
            compiler_options: program.compiler_options_rc(),
        }
    }
}

/// Merges configured transforms with caller transformers.
///
/// Per phase: configured transforms in configuration order, then the caller's
/// transformers in the order given. Program transforms are not part of the
/// group; they run before emit.
pub fn merge_transformers(
    configured: &[ResolvedTransform],
    caller: &CustomTransformers,
    env: &MergeEnvironment,
) -> TransformerGroup {
    let mut group = TransformerGroup::default();
    let mut seen = HashSet::new();

    for resolved in configured {
        let descriptor = &resolved.descriptor;
        if descriptor.is_program_transform() {
            continue;
        }
        if !seen.insert((resolved.identity(), descriptor.phase)) {
            warn!(
                identity = %resolved.identity(),
                phase = %descriptor.phase,
                "transform configured twice for the same phase; keeping the first"
            );
            continue;
        }
        if let Some(factory) = instantiate(resolved, env) {
            trace!(identity = %resolved.identity(), phase = %descriptor.phase, "adding configured transformer");
            group.phase_mut(descriptor.phase).push(factory);
        }
    }

    for phase in TransformPhase::ALL {
        let supplied = match phase {
            TransformPhase::Before => &caller.before,
            TransformPhase::After => &caller.after,
            TransformPhase::AfterDeclarations => &caller.after_declarations,
        };
        group.phase_mut(phase).extend(supplied.iter().cloned());
    }

    group
}

/// Wraps a resolved export into a factory using its kind's calling convention.
fn instantiate(resolved: &ResolvedTransform, env: &MergeEnvironment) -> Option<TransformerFactory> {
    let config: Rc<Value> = Rc::new(resolved.descriptor.config.clone());

    match (resolved.descriptor.kind, &resolved.export) {
        (PluginKind::Raw, TransformExport::Factory(factory)) => Some(Rc::clone(factory)),
        (PluginKind::Plain, TransformExport::Factory(factory)) => {
            let factory = Rc::clone(factory);
            Some(Rc::new(move |ctx: &TransformationContext| factory(ctx)))
        }
        (PluginKind::Config, TransformExport::ConfigFactory(factory)) => {
            let factory = Rc::clone(factory);
            Some(Rc::new(move |ctx: &TransformationContext| factory(ctx, &config)))
        }
        (PluginKind::Checker, TransformExport::CheckerFactory(factory)) => {
            let factory = Rc::clone(factory);
            let checker = env.checker.clone();
            Some(Rc::new(move |ctx: &TransformationContext| factory(ctx, &checker, &config)))
        }
        (PluginKind::CompilerOptions, TransformExport::CompilerOptionsFactory(factory)) => {
            let factory = Rc::clone(factory);
            let options = Rc::clone(&env.compiler_options);
            Some(Rc::new(move |ctx: &TransformationContext| factory(ctx, &options, &config)))
        }
        // Program transforms, and shapes the loader already rejected.
        _ => None,
    }
}
