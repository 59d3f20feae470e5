// Patched Compiler
//
// Wraps transpile, program creation and emit so configured plugins take part.
// One PatchedCompiler is one compilation session: modules are evaluated once
// and program-transform lineage is tracked for as long as it lives.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, debug_span, trace};
use ts::{
    create_program, create_transpile_program, transpile_program, CompilerHost, CompilerOptions,
    CustomTransformers, DiagnosticSink, EmitResult, Program, SourceFile, TransformationContext,
    TranspileOptions, TranspileOutput, WriteFileCallback,
};

use crate::plugins::config::normalize_plugins;
use crate::plugins::diagnostics::{merge_diagnostics, PluginError};
use crate::plugins::loader::{ModuleResolver, ResolvedTransform, TransformModuleLoader};
use crate::plugins::merger::{merge_transformers, MergeEnvironment};
use crate::plugins::program_transform::{ProgramTransformApplier, ProgramTransformRecord};

pub struct PatchedCompiler {
    loader: TransformModuleLoader,
    record: RefCell<ProgramTransformRecord>,
    /// Directory relative transform paths are resolved against.
    base_dir: Option<PathBuf>,
}

impl PatchedCompiler {
    pub fn new(resolver: Rc<dyn ModuleResolver>) -> Self {
        Self {
            loader: TransformModuleLoader::new(resolver),
            record: RefCell::new(ProgramTransformRecord::new()),
            base_dir: None,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn loader(&self) -> &TransformModuleLoader {
        &self.loader
    }

    /// Number of program transforms recorded for `program`'s lineage.
    pub fn applied_transform_count(&self, program: &Program) -> usize {
        self.record.borrow().applied_count(program.id())
    }

    /// Transpiles a single module with configured per-file plugins.
    ///
    /// Program transforms do not run here; there is no Program lineage to
    /// attach them to.
    pub fn transpile_module(
        &self,
        input: &str,
        options: &TranspileOptions,
    ) -> Result<TranspileOutput, PluginError> {
        let resolved = self.resolve_plugins(&options.compiler_options)?;
        let program = create_transpile_program(input, options);
        let _span = debug_span!("transpile_module", program = %program.id()).entered();

        let group = merge_transformers(
            &resolved,
            &options.transformers,
            &MergeEnvironment::from_program(&program),
        );
        debug!(?group, "transpiling with merged transformers");

        let sink = DiagnosticSink::new();
        let context = TransformationContext::with_diagnostics(program.compiler_options_rc(), sink.clone());
        let (mut output, result) = transpile_program(&program, &group.into(), &context);
        output.diagnostics = merge_diagnostics(result, sink.take()).diagnostics;
        Ok(output)
    }

    /// Creates a Program and runs the configured program transforms over it.
    pub fn create_program(
        &self,
        root_names: &[String],
        options: &CompilerOptions,
        host: Rc<dyn CompilerHost>,
    ) -> Result<Rc<Program>, PluginError> {
        let resolved = self.resolve_plugins(options)?;
        let program = Rc::new(create_program(root_names, options, host.as_ref()));
        let _span = debug_span!("create_program", program = %program.id()).entered();

        let applier = ProgramTransformApplier::new(&resolved, &self.record, host);
        if !applier.has_transforms() {
            return Ok(program);
        }

        let pruned = self.record.borrow_mut().prune();
        if pruned > 0 {
            trace!(pruned, "dropped lineage of released programs");
        }
        applier.apply(program)
    }

    /// Emits `program` with configured plugins ahead of `transformers`.
    pub fn emit(
        &self,
        program: &Program,
        target_source_file: Option<&SourceFile>,
        write_file: WriteFileCallback<'_>,
        transformers: &CustomTransformers,
    ) -> Result<EmitResult, PluginError> {
        let resolved = self.resolve_plugins(program.get_compiler_options())?;
        let _span = debug_span!("emit", program = %program.id()).entered();

        let group = merge_transformers(&resolved, transformers, &MergeEnvironment::from_program(program));
        debug!(?group, "emitting with merged transformers");

        let sink = DiagnosticSink::new();
        let context = TransformationContext::with_diagnostics(program.compiler_options_rc(), sink.clone());
        let result = program.emit_with_context(target_source_file, write_file, &group.into(), &context);

        let mut reported = self.record.borrow().diagnostics(program.id()).to_vec();
        reported.extend(sink.take());
        Ok(merge_diagnostics(result, reported))
    }

    fn resolve_plugins(&self, options: &CompilerOptions) -> Result<Vec<ResolvedTransform>, PluginError> {
        let descriptors = normalize_plugins(&options.plugins, self.base_dir.as_deref())?;
        self.loader.load_all(&descriptors)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    compiler_options: CompilerOptions,
}

/// Parses compiler options from a JSON object string.
pub fn options_from_json(json: &str) -> Result<CompilerOptions, PluginError> {
    Ok(CompilerOptions::from_json(json)?)
}

/// Reads the `compilerOptions` of a tsconfig-style JSON file.
///
/// Returns the options together with the file's directory, which is where
/// relative transform paths in the file are resolved from.
pub fn load_compiler_options(path: &Path) -> anyhow::Result<(CompilerOptions, PathBuf)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: ConfigFile = serde_json::from_str(&content)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok((config.compiler_options, base_dir))
}
