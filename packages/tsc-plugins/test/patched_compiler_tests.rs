//! Patched Compiler Tests
//!
//! transpile_module, create_program and emit with configured transformer plugins.

#[path = "fixtures/mod.rs"]
mod fixtures;

use std::cell::Cell;
use std::rc::Rc;

use fixtures::*;
use serde_json::json;
use tsc_plugins::ts::{
    create_source_file, CompilerHost, CompilerOptions, CustomTransformers, InMemoryCompilerHost,
    ScriptTarget, TranspileOptions,
};
use tsc_plugins::{PatchedCompiler, PluginError, PluginKind};

fn compiler() -> PatchedCompiler {
    PatchedCompiler::new(Rc::new(registry()))
}

fn transpile_options(plugins: serde_json::Value) -> TranspileOptions {
    TranspileOptions {
        compiler_options: CompilerOptions::from_json(&json!({ "plugins": plugins }).to_string()).unwrap(),
        ..TranspileOptions::default()
    }
}

#[test]
fn applies_transformer_from_legacy_config() {
    let output = compiler()
        .transpile_module(
            SAFELY_CODE,
            &transpile_options(json!([{ "customTransformers": { "before": [SAFELY] } }])),
        )
        .unwrap();

    assert!(SAFELY_EXPECTED.is_match(&output.output_text), "{}", output.output_text);
}

#[test]
fn applies_transformer_from_default_config() {
    let output = compiler()
        .transpile_module(SAFELY_CODE, &transpile_options(json!([{ "transform": SAFELY }])))
        .unwrap();

    assert!(SAFELY_EXPECTED.is_match(&output.output_text), "{}", output.output_text);
}

#[test]
fn resolves_relative_transform_paths() {
    let compiler = compiler().with_base_dir(TRANSFORMS_DIR);
    let output = compiler
        .transpile_module(SAFELY_CODE, &transpile_options(json!([{ "transform": "./safely.ts" }])))
        .unwrap();

    assert!(SAFELY_EXPECTED.is_match(&output.output_text));
}

#[test]
fn merges_transformers() {
    let calls = Rc::new(Cell::new(0));
    let mut options = transpile_options(json!([{ "transform": SAFELY }]));
    options.transformers = CustomTransformers {
        before: vec![counting_transformer(calls.clone())],
        ..CustomTransformers::default()
    };

    let output = compiler().transpile_module(SAFELY_CODE, &options).unwrap();

    assert!(SAFELY_EXPECTED.is_match(&output.output_text));
    assert_eq!(calls.get(), 1);
}

#[test]
fn merges_custom_diagnostics_into_emit_result() {
    let compiler = compiler();
    let options = CompilerOptions {
        target: Some(ScriptTarget::ES5),
        ..CompilerOptions::default()
    }
    .with_plugins(vec![json!({ "transform": ALTER_DIAGNOSTICS })]);
    let host: Rc<dyn CompilerHost> = Rc::new(InMemoryCompilerHost::new("/"));

    let program = compiler.create_program(&[], &options, host).unwrap();
    let file = create_source_file("a", "", ScriptTarget::ES5);
    let result = compiler
        .emit(&program, Some(&file), &mut |_: &str, _: &str| {}, &CustomTransformers::default())
        .unwrap();

    assert!(result.diagnostics.iter().any(|d| d.code == 1337));
}

#[test]
fn keeps_repeated_plugin_diagnostics() {
    let compiler = compiler();
    let options = CompilerOptions::default().with_plugins(vec![json!({ "transform": DEPRECATED_API })]);
    let host: Rc<dyn CompilerHost> = Rc::new(
        InMemoryCompilerHost::new("/")
            .with_file("a.ts", "let a = 1;")
            .with_file("b.ts", "let b = 2;"),
    );

    let program = compiler
        .create_program(&["a.ts".to_string(), "b.ts".to_string()], &options, host)
        .unwrap();
    let result = compiler
        .emit(&program, None, &mut |_: &str, _: &str| {}, &CustomTransformers::default())
        .unwrap();

    assert_eq!(result.diagnostics.iter().filter(|d| d.code == 1338).count(), 2);
}

#[test]
fn runs_third_party_transformers() {
    let output = compiler()
        .transpile_module(
            BASIC_CODE,
            &transpile_options(json!([
                { "transform": "ts-transformer-keys/transformer" },
                { "transform": "ts-transformer-enumerate/transformer" },
                { "transform": "ts-transform-graphql-tag/dist/transformer" },
                { "transform": "ts-transform-img/dist/transform", "type": "config" },
                { "transform": "ts-transform-css-modules/dist/transform", "type": "config" },
                { "transform": "ts-transform-react-intl/dist/transform", "type": "config", "import": "transform" },
                { "transform": "ts-nameof", "type": "raw" },
            ])),
        )
        .unwrap();

    assert!(BASIC_EXPECTED.is_match(&output.output_text));
}

#[test]
fn skips_ts_plugin_without_errors() {
    let output = compiler()
        .transpile_module(BASIC_CODE, &transpile_options(json!([{ "name": "foobar" }])))
        .unwrap();

    assert!(BASIC_EXPECTED.is_match(&output.output_text));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn rejects_export_that_does_not_fit_kind() {
    let err = compiler()
        .transpile_module(
            BASIC_CODE,
            &transpile_options(json!([{ "transform": "ts-nameof", "type": "checker" }])),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        PluginError::IncompatibleExport { kind: PluginKind::Checker, .. }
    ));
}

#[test]
fn rejects_unknown_transform_module() {
    let err = compiler()
        .transpile_module(BASIC_CODE, &transpile_options(json!([{ "transform": "not-installed" }])))
        .unwrap_err();

    assert_eq!(err.to_string(), "Cannot load transform module 'not-installed'");
}
