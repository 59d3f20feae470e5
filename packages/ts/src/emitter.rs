// Emitter
//
// Runs the transformer phases over a program's files and writes the output.
// Code generation itself belongs to the host compiler: the printed output is
// the transformed source text under its output file name.

use crate::host::InMemoryCompilerHost;
use crate::program::{create_program, CompilerOptions, Program};
use crate::source_file::SourceFile;
use crate::transformer::{CustomTransformers, TransformationContext, Transformer};
use crate::Diagnostic;

/// Result of emit operation.
#[derive(Debug, Clone, Default)]
pub struct EmitResult {
    /// Whether emit was skipped.
    pub emit_skipped: bool,
    /// Diagnostics from emit.
    pub diagnostics: Vec<Diagnostic>,
    /// Emitted files.
    pub emitted_files: Vec<String>,
}

/// Callback receiving `(file_name, text)` for every emitted file.
pub type WriteFileCallback<'a> = &'a mut dyn FnMut(&str, &str);

impl Program {
    pub fn emit(
        &self,
        target_source_file: Option<&SourceFile>,
        write_file: WriteFileCallback<'_>,
        transformers: &CustomTransformers,
    ) -> EmitResult {
        let context = TransformationContext::new(self.compiler_options_rc());
        self.emit_with_context(target_source_file, write_file, transformers, &context)
    }

    /// Emits with a caller-provided context.
    ///
    /// Diagnostics reported into the context are left there; only the
    /// program's own diagnostics appear in the result.
    pub fn emit_with_context(
        &self,
        target_source_file: Option<&SourceFile>,
        write_file: WriteFileCallback<'_>,
        transformers: &CustomTransformers,
        context: &TransformationContext,
    ) -> EmitResult {
        let options = self.get_compiler_options();
        let diagnostics = self.get_global_diagnostics().to_vec();

        let has_errors = !diagnostics.is_empty();
        if options.no_emit == Some(true) || (options.no_emit_on_error == Some(true) && has_errors)
        {
            return EmitResult {
                emit_skipped: true,
                diagnostics,
                emitted_files: Vec::new(),
            };
        }

        // Factories run once per emit, phase by phase.
        let mut before = instantiate(&transformers.before, context);
        let mut after = instantiate(&transformers.after, context);
        let mut after_declarations = instantiate(&transformers.after_declarations, context);

        let files: Vec<&SourceFile> = match target_source_file {
            Some(file) => vec![file],
            None => self
                .get_source_files()
                .filter(|file| !file.is_declaration_file())
                .collect(),
        };

        let mut emitted_files = Vec::new();
        let emit_declarations = options.declaration == Some(true);
        for file in files {
            let transformed = run_phase(&mut before, file.clone());

            let js_name = output_file_name(file.file_name(), options.out_dir.as_deref(), false);
            let js = run_phase(&mut after, transformed.with_file_name(js_name));
            write_file(js.file_name(), &print(js.text()));
            emitted_files.push(js.file_name().to_string());

            if emit_declarations {
                let dts_name = output_file_name(file.file_name(), options.out_dir.as_deref(), true);
                let dts = run_phase(&mut after_declarations, transformed.with_file_name(dts_name));
                write_file(dts.file_name(), &print(dts.text()));
                emitted_files.push(dts.file_name().to_string());
            }
        }

        EmitResult {
            emit_skipped: false,
            diagnostics,
            emitted_files,
        }
    }
}

fn instantiate(
    factories: &[crate::transformer::TransformerFactory],
    context: &TransformationContext,
) -> Vec<Transformer> {
    factories.iter().map(|factory| factory(context)).collect()
}

fn run_phase(transformers: &mut [Transformer], file: SourceFile) -> SourceFile {
    transformers
        .iter_mut()
        .fold(file, |current, transformer| transformer(current))
}

fn print(text: &str) -> String {
    let mut out = text.trim_end().to_string();
    out.push('\n');
    out
}

/// Maps a source file name to its JavaScript or declaration output name.
pub fn output_file_name(file_name: &str, out_dir: Option<&str>, declaration: bool) -> String {
    const EXTENSIONS: [(&str, &str, &str); 6] = [
        (".tsx", ".jsx", ".d.ts"),
        (".mts", ".mjs", ".d.mts"),
        (".cts", ".cjs", ".d.cts"),
        (".ts", ".js", ".d.ts"),
        (".jsx", ".jsx", ".d.ts"),
        (".js", ".js", ".d.ts"),
    ];

    let (stem, js_ext, dts_ext) = EXTENSIONS
        .iter()
        .find_map(|(src, js, dts)| file_name.strip_suffix(src).map(|stem| (stem, *js, *dts)))
        .unwrap_or((file_name, ".js", ".d.ts"));
    let ext = if declaration { dts_ext } else { js_ext };

    match out_dir {
        Some(dir) => {
            let base = stem.rsplit('/').next().unwrap_or(stem);
            format!("{}/{}{}", dir.trim_end_matches('/'), base, ext)
        }
        None => format!("{}{}", stem, ext),
    }
}

// --- Single-file transpilation ---

#[derive(Debug, Clone, Default)]
pub struct TranspileOptions {
    pub compiler_options: CompilerOptions,
    pub file_name: Option<String>,
    pub transformers: CustomTransformers,
}

#[derive(Debug, Clone, Default)]
pub struct TranspileOutput {
    pub output_text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Default name of the in-memory file used by [`transpile_module`].
pub const TRANSPILE_FILE_NAME: &str = "module.ts";

/// Builds the one-file program [`transpile_module`] compiles.
pub fn create_transpile_program(input: &str, options: &TranspileOptions) -> Program {
    let file_name = options
        .file_name
        .clone()
        .unwrap_or_else(|| TRANSPILE_FILE_NAME.to_string());

    let mut compiler_options = options.compiler_options.clone();
    compiler_options.no_resolve = Some(true);
    compiler_options.no_lib = Some(true);
    compiler_options.declaration = None;
    compiler_options.no_emit = None;
    compiler_options.no_emit_on_error = None;

    let host = InMemoryCompilerHost::new("/").with_file(&file_name, input);
    create_program(&[file_name], &compiler_options, &host)
}

/// Emits a transpile program, capturing the JavaScript output.
pub fn transpile_program(
    program: &Program,
    transformers: &CustomTransformers,
    context: &TransformationContext,
) -> (TranspileOutput, EmitResult) {
    let mut output_text = String::new();
    // Declarations are off for transpile programs; only maps need skipping.
    let mut write_file = |name: &str, text: &str| {
        if !name.ends_with(".map") {
            output_text = text.to_string();
        }
    };
    let result = program.emit_with_context(None, &mut write_file, transformers, context);
    let output = TranspileOutput {
        output_text,
        diagnostics: result.diagnostics.clone(),
    };
    (output, result)
}

/// Transpiles one module without plugins.
pub fn transpile_module(input: &str, options: &TranspileOptions) -> TranspileOutput {
    let program = create_transpile_program(input, options);
    let context = TransformationContext::new(program.compiler_options_rc());
    transpile_program(&program, &options.transformers, &context).0
}
