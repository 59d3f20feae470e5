// Plugin Configuration Tests

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use crate::plugins::config::*;
    use crate::plugins::diagnostics::PluginError;

    mod descriptor_tests {
        use super::*;

        #[test]
        fn should_default_to_plain_before() {
            let descriptor = PluginDescriptor::new("./safely");
            assert_eq!(descriptor.kind, PluginKind::Plain);
            assert_eq!(descriptor.phase, TransformPhase::Before);
            assert!(!descriptor.before_emit);
            assert_eq!(descriptor.export_name(), DEFAULT_EXPORT);
        }

        #[test]
        fn should_mark_program_kind_before_emit() {
            let descriptor = PluginDescriptor::new("prog").with_kind(PluginKind::Program);
            assert!(descriptor.before_emit);
            assert!(descriptor.is_program_transform());
        }

        #[test]
        fn should_distinguish_identity_by_import_and_kind() {
            let a = PluginDescriptor::new("m").with_import("x").identity();
            let b = PluginDescriptor::new("m").with_import("y").identity();
            let c = PluginDescriptor::new("m")
                .with_import("x")
                .with_kind(PluginKind::Raw)
                .identity();
            assert_ne!(a, b);
            assert_ne!(a, c);
            assert_eq!(a, PluginDescriptor::new("m").with_import("x").identity());
        }

        #[test]
        fn should_format_identity() {
            let identity = PluginDescriptor::new("ts-nameof")
                .with_kind(PluginKind::Raw)
                .identity();
            assert_eq!(identity.to_string(), "ts-nameof#default (raw)");
        }

        #[test]
        fn should_parse_type_names() {
            assert_eq!(PluginKind::from_type_name("config"), Some(PluginKind::Config));
            assert_eq!(
                PluginKind::from_type_name("compilerOptions"),
                Some(PluginKind::CompilerOptions)
            );
            assert_eq!(PluginKind::from_type_name("Config"), None);
            for kind in [
                PluginKind::Plain,
                PluginKind::Config,
                PluginKind::Raw,
                PluginKind::Program,
                PluginKind::Checker,
                PluginKind::CompilerOptions,
            ] {
                assert_eq!(PluginKind::from_type_name(kind.as_str()), Some(kind));
            }
        }
    }

    mod normalizer_tests {
        use super::*;

        #[test]
        fn should_expand_legacy_entries_before_then_after() {
            let entries = vec![json!({
                "customTransformers": { "after": ["c"], "before": ["a", "b"] }
            })];

            let descriptors = normalize_plugins(&entries, None).unwrap();

            let summary: Vec<_> = descriptors
                .iter()
                .map(|d| (d.transform_module.as_str(), d.phase, d.kind))
                .collect();
            assert_eq!(
                summary,
                vec![
                    ("a", TransformPhase::Before, PluginKind::Plain),
                    ("b", TransformPhase::Before, PluginKind::Plain),
                    ("c", TransformPhase::After, PluginKind::Plain),
                ]
            );
        }

        #[test]
        fn should_read_modern_entry() {
            let entries = vec![json!({
                "transform": "ts-transform-react-intl/dist/transform",
                "type": "config",
                "import": "transform",
                "prefix": "app"
            })];

            let descriptors = normalize_plugins(&entries, None).unwrap();

            assert_eq!(descriptors.len(), 1);
            let descriptor = &descriptors[0];
            assert_eq!(descriptor.transform_module, "ts-transform-react-intl/dist/transform");
            assert_eq!(descriptor.import_name.as_deref(), Some("transform"));
            assert_eq!(descriptor.kind, PluginKind::Config);
            assert_eq!(descriptor.phase, TransformPhase::Before);
            assert_eq!(descriptor.config["prefix"], "app");
        }

        #[test]
        fn should_prefer_after_declarations_over_after() {
            let entries = vec![
                json!({ "transform": "a", "after": true }),
                json!({ "transform": "b", "after": true, "afterDeclarations": true }),
            ];

            let descriptors = normalize_plugins(&entries, None).unwrap();

            assert_eq!(descriptors[0].phase, TransformPhase::After);
            assert_eq!(descriptors[1].phase, TransformPhase::AfterDeclarations);
        }

        #[test]
        fn should_treat_before_emit_and_transform_program_as_program_kind() {
            let entries = vec![
                json!({ "transform": "p", "beforeEmit": true, "import": "one" }),
                json!({ "transform": "p", "transformProgram": true, "import": "two" }),
                json!({ "transform": "p", "type": "program", "import": "three" }),
            ];

            let descriptors = normalize_plugins(&entries, None).unwrap();

            assert!(descriptors
                .iter()
                .all(|d| d.kind == PluginKind::Program && d.before_emit));
        }

        #[test]
        fn should_skip_unrelated_entries() {
            let entries = vec![
                json!({ "name": "foobar" }),
                json!("typescript-plugin-css-modules"),
                json!(42),
                json!(null),
                json!({ "transform": "kept" }),
            ];

            let descriptors = normalize_plugins(&entries, None).unwrap();

            assert_eq!(descriptors.len(), 1);
            assert_eq!(descriptors[0].transform_module, "kept");
        }

        #[test]
        fn should_reject_unknown_type() {
            let entries = vec![json!({ "name": "x" }), json!({ "transform": "a", "type": "magic" })];

            let err = normalize_plugins(&entries, None).unwrap_err();

            match err {
                PluginError::MalformedPluginConfig { index, reason } => {
                    assert_eq!(index, 1);
                    assert!(reason.contains("magic"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn should_skip_null_transform() {
            let entries = vec![
                json!({ "name": "lint", "transform": null }),
                json!({ "transform": "kept", "import": null, "type": null }),
            ];

            let descriptors = normalize_plugins(&entries, None).unwrap();

            assert_eq!(descriptors.len(), 1);
            assert_eq!(descriptors[0].transform_module, "kept");
            assert_eq!(descriptors[0].kind, PluginKind::Plain);
        }

        #[test]
        fn should_reject_non_string_transform() {
            let entries = vec![json!({ "transform": 7 })];
            assert!(matches!(
                normalize_plugins(&entries, None),
                Err(PluginError::MalformedPluginConfig { index: 0, .. })
            ));
        }

        #[test]
        fn should_reject_malformed_legacy_entry() {
            let entries = vec![json!({ "customTransformers": { "before": "a" } })];
            assert!(matches!(
                normalize_plugins(&entries, None),
                Err(PluginError::MalformedPluginConfig { index: 0, .. })
            ));
        }

        #[test]
        fn should_resolve_relative_paths_against_base_dir() {
            let entries = vec![
                json!({ "transform": "./transforms/safely.ts" }),
                json!({ "transform": "../shared/keys.ts" }),
                json!({ "transform": "ts-nameof" }),
            ];

            let descriptors = normalize_plugins(&entries, Some(Path::new("/project/src"))).unwrap();

            assert_eq!(descriptors[0].transform_module, "/project/src/transforms/safely.ts");
            assert_eq!(descriptors[1].transform_module, "/project/shared/keys.ts");
            assert_eq!(descriptors[2].transform_module, "ts-nameof");
        }

        #[test]
        fn should_leave_relative_paths_without_base_dir() {
            assert_eq!(resolve_module_specifier("./a.ts", None), "./a.ts");
        }
    }
}
