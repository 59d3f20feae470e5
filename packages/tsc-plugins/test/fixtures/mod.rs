//! Transform modules shared by the integration tests.
//!
//! Each module stands in for a transformer package that would be loaded from
//! disk; they are registered under the specifiers the tests configure.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use tsc_plugins::loader::{ModuleRegistry, TransformExport, TransformModule};
use tsc_plugins::ts::{Diagnostic, SourceFile, TransformationContext, Transformer};

pub const TRANSFORMS_DIR: &str = "/fixtures/transforms";
pub const SAFELY: &str = "/fixtures/transforms/safely.ts";
pub const ALTER_DIAGNOSTICS: &str = "/fixtures/transforms/alter-diagnostics.ts";
pub const DEPRECATED_API: &str = "/fixtures/transforms/deprecated-api.ts";
pub const PROGRAM_TRANSFORMER: &str = "/fixtures/transforms/program-transformer.ts";

/// Files injected by the two program transformers, in order.
pub const NEW_FILES: [&str; 2] = ["/fixtures/assets/new-file-1.ts", "/fixtures/assets/new-file-2.ts"];

pub const SAFELY_FILE: &str = "/fixtures/assets/safely-code.ts";
pub const SAFELY_CODE: &str = "var a = { b: 1 };
function abc() {
    var c = safely(a.b);
}
console.log(abc.toString());
";

pub static SAFELY_EXPECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^var a = \{ b: 1 \};*[\s\r\n]*function abc\(\) \{[\s\r\n]*var c = a && a\.b;*[\s\r\n]*\}[\s\r\n]*console\.log\(abc\.toString\(\)\);*$",
    )
    .unwrap()
});

pub const BASIC_CODE: &str = "var a = 1";
pub static BASIC_EXPECTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[\s\r\n]*var a = 1;*[\s\r\n]*$").unwrap());

static SAFELY_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"safely\((\w+)\.(\w+)\)").unwrap());

/// Rewrites `safely(x.y)` to `x && x.y`.
fn safely(_ctx: &TransformationContext) -> Transformer {
    Box::new(|file: SourceFile| {
        let text = SAFELY_CALL.replace_all(file.text(), "$1 && $1.$2").into_owned();
        file.update(text)
    })
}

/// Reports diagnostic 1337 for every file it sees.
fn alter_diagnostics(ctx: &TransformationContext) -> Transformer {
    let ctx = ctx.clone();
    Box::new(move |file: SourceFile| {
        ctx.add_diagnostic(Diagnostic::error(1337, "Custom diagnostic").with_file(file.file_name()));
        file
    })
}

/// Reports the same file-less diagnostic for every file it sees.
fn deprecated_api(ctx: &TransformationContext) -> Transformer {
    let ctx = ctx.clone();
    Box::new(move |file: SourceFile| {
        ctx.add_diagnostic(Diagnostic::error(1338, "deprecated api"));
        file
    })
}

fn pass_through(_ctx: &TransformationContext) -> Transformer {
    Box::new(|file: SourceFile| file)
}

/// Program transform injecting `file` into a Program rebuilt from the original roots.
fn program_transformer(file: &'static str) -> TransformExport {
    TransformExport::program(move |_program, ctx, _config| {
        ctx.add_source_file(file, "export const injected = true;\n");
        let mut roots = ctx.original_root_names();
        roots.push(file.to_string());
        Ok(ctx.create_program(&roots)?)
    })
}

pub fn registry() -> ModuleRegistry {
    let registry = ModuleRegistry::new()
        .with_module(
            SAFELY,
            TransformModule::new().with_export("default", TransformExport::factory(safely)),
        )
        .with_module(
            ALTER_DIAGNOSTICS,
            TransformModule::new().with_export("default", TransformExport::factory(alter_diagnostics)),
        )
        .with_module(
            DEPRECATED_API,
            TransformModule::new().with_export("default", TransformExport::factory(deprecated_api)),
        )
        .with_module(
            PROGRAM_TRANSFORMER,
            TransformModule::new()
                .with_export("progTransformer1", program_transformer(NEW_FILES[0]))
                .with_export("progTransformer2", program_transformer(NEW_FILES[1])),
        );
    register_third_party(&registry);
    registry
}

/// Stand-ins for published transformer packages, one per calling convention.
fn register_third_party(registry: &ModuleRegistry) {
    for plain in [
        "ts-transformer-keys/transformer",
        "ts-transformer-enumerate/transformer",
        "ts-transform-graphql-tag/dist/transformer",
    ] {
        registry.register(
            plain,
            TransformModule::new().with_export("default", TransformExport::factory(pass_through)),
        );
    }
    for config in ["ts-transform-img/dist/transform", "ts-transform-css-modules/dist/transform"] {
        registry.register(
            config,
            TransformModule::new().with_export(
                "default",
                TransformExport::config_factory(|_ctx, _config| Box::new(|file: SourceFile| file)),
            ),
        );
    }
    registry.register(
        "ts-transform-react-intl/dist/transform",
        TransformModule::new().with_export(
            "transform",
            TransformExport::config_factory(|_ctx, _config| Box::new(|file: SourceFile| file)),
        ),
    );
    registry.register(
        "ts-nameof",
        TransformModule::new().with_main(TransformExport::factory(pass_through)),
    );
}

/// Caller transformer factory counting how often its transformer runs.
pub fn counting_transformer(calls: Rc<Cell<usize>>) -> tsc_plugins::ts::TransformerFactory {
    tsc_plugins::ts::transformer_factory(move |_ctx: &TransformationContext| {
        let calls = Rc::clone(&calls);
        Box::new(move |file: SourceFile| {
            calls.set(calls.get() + 1);
            file
        })
    })
}
