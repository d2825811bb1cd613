//! Integration tests for turning an `api-surface.json` on disk into an
//! `ExtractorConfig`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use apisurface_config::{
    ConfigLoader, DefaultConfig, Error, ExtractorConfig, PrepareOptions, ReportVariant,
};
use apisurface_core::{NewlineKind, ReleaseTag};
use serde_json::{Value, json};
use tempfile::TempDir;

/// A throwaway project with a package.json, tsconfig.json and entry point.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let project = Self { dir };
        project.write("package.json", r#"{ "name": "@acme/widgets", "version": "1.4.0", "types": "lib/index.d.ts" }"#);
        project.write("tsconfig.json", "{}");
        project.write("lib/index.d.ts", "export declare const x: number;\n");
        project
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().expect("has parent")).expect("Failed to create folder");
        fs::write(path, content).expect("Failed to write file");
    }

    fn write_config(&self, relative: &str, config: Value) -> PathBuf {
        self.write(relative, &serde_json::to_string_pretty(&config).expect("valid json"));
        self.path(relative)
    }

    fn prepare(&self, config: Value) -> apisurface_config::Result<ExtractorConfig> {
        let path = self.write_config("api-surface.json", config);
        let defaults = DefaultConfig::load().expect("Failed to load defaults");
        ExtractorConfig::load_file_and_prepare(&path, &defaults)
    }
}

fn base_config() -> Value {
    json!({ "mainEntryPointFilePath": "<projectFolder>/lib/index.d.ts" })
}

fn with(mut config: Value, patch: Value) -> Value {
    apisurface_config::merge_overwriting_arrays(&mut config, patch);
    config
}

#[test]
fn test_prepare_with_defaults() {
    let project = Project::new();
    let config = project.prepare(base_config()).expect("Failed to prepare");

    assert_eq!(config.project_folder(), project.root());
    assert_eq!(config.main_entry_point().file_path, project.path("lib/index.d.ts"));
    assert_eq!(config.tsconfig_file_path(), Some(project.path("tsconfig.json").as_path()));
    assert_eq!(config.newline_kind(), NewlineKind::Crlf);
    assert!(!config.api_report_enabled());
    assert_eq!(config.report_configs().len(), 1);
    assert_eq!(config.report_configs()[0].file_name, "widgets.api.md");
    assert_eq!(
        config.release_tags_to_trim().iter().copied().collect::<Vec<_>>(),
        [ReleaseTag::Internal]
    );
    // tsdocMetadata is on by default and found next to "types".
    assert!(config.tsdoc_metadata_enabled());
    assert_eq!(
        config.tsdoc_metadata_file_path(),
        Some(project.path("lib/tsdoc-metadata.json").as_path())
    );
    assert_eq!(config.tags_to_report().get("@sealed"), Some(&true));
}

#[test]
fn test_report_variants() {
    let project = Project::new();
    let config = project
        .prepare(with(
            base_config(),
            json!({
                "apiReport": {
                    "enabled": true,
                    "reportFileName": "<unscopedPackageName>.api.md",
                    "reportVariants": ["public", "beta", "complete"]
                }
            }),
        ))
        .expect("Failed to prepare");

    let names: Vec<_> = config
        .report_configs()
        .iter()
        .map(|r| (r.variant, r.file_name.as_str()))
        .collect();
    assert_eq!(
        names,
        [
            (ReportVariant::Public, "widgets.public.api.md"),
            (ReportVariant::Beta, "widgets.beta.api.md"),
            (ReportVariant::Complete, "widgets.api.md"),
        ]
    );
    let complete = &config.report_configs()[2];
    assert_eq!(config.report_file_path(complete), project.path("etc/widgets.api.md"));
    assert_eq!(config.report_temp_file_path(complete), project.path("temp/widgets.api.md"));
}

#[test]
fn test_report_file_name_with_slash() {
    let project = Project::new();
    let err = project
        .prepare(with(base_config(), json!({ "apiReport": { "reportFileName": "<packageName>" } })))
        .unwrap_err();
    assert!(err.to_string().contains("contains invalid characters: \"@acme/widgets\""));
}

#[test]
fn test_lookup_walks_up_to_tsconfig() {
    let project = Project::new();
    let path = project.write_config("config/api-surface.json", base_config());
    let defaults = DefaultConfig::load().unwrap();

    let config = ExtractorConfig::load_file_and_prepare(&path, &defaults).unwrap();
    assert_eq!(config.project_folder(), project.root());
    assert_eq!(config.config_file_path(), Some(path.as_path()));
}

#[test]
fn test_lookup_without_tsconfig_fails() {
    let project = Project::new();
    fs::remove_file(project.path("tsconfig.json")).unwrap();
    let err = project.prepare(base_config()).unwrap_err();
    assert!(err.to_string().contains("a tsconfig.json file cannot be found"));
}

#[test]
fn test_lookup_token_override() {
    let project = Project::new();
    let defaults = DefaultConfig::load().unwrap();
    let path = project.write_config("api-surface.json", base_config());
    let config_object = ConfigLoader::new(&defaults).load_file(&path).unwrap();

    let config = ExtractorConfig::prepare(PrepareOptions {
        config_object: config_object.clone(),
        project_folder_lookup_token: Some(project.root().to_path_buf()),
        package_json_full_path: Some(project.path("package.json")),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(config.project_folder(), project.root());

    let err = ExtractorConfig::prepare(PrepareOptions {
        config_object,
        project_folder_lookup_token: Some(project.path("nowhere")),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().starts_with("Error parsing the configuration object:"));
}

#[test]
fn test_project_folder_token_must_be_prefix() {
    let project = Project::new();
    let err = project
        .prepare(json!({ "mainEntryPointFilePath": "lib/<projectFolder>/index.d.ts" }))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with(&format!(
        "Error parsing {}:",
        project.path("api-surface.json").display()
    )));
    assert!(message.contains("must appear at the start of the string"));
}

#[test]
fn test_entry_point_must_be_declaration() {
    let project = Project::new();
    project.write("src/index.ts", "export const x = 1;\n");
    let err = project
        .prepare(json!({ "mainEntryPointFilePath": "<projectFolder>/src/index.ts" }))
        .unwrap_err();
    assert!(err.to_string().contains("is not a declaration file"));
}

#[test]
fn test_missing_entry_point() {
    let project = Project::new();
    let config = json!({ "mainEntryPointFilePath": "<projectFolder>/lib/missing.d.ts" });
    let err = project.prepare(config.clone()).unwrap_err();
    assert!(err.to_string().contains("path does not exist"));

    let defaults = DefaultConfig::load().unwrap();
    let path = project.write_config("api-surface.json", config);
    let config_object = ConfigLoader::new(&defaults).load_file(&path).unwrap();
    let prepared = ExtractorConfig::prepare(PrepareOptions {
        config_object,
        config_object_full_path: Some(path),
        package_json_full_path: Some(project.path("package.json")),
        ignore_missing_entry_point: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(prepared.main_entry_point().file_path, project.path("lib/missing.d.ts"));
}

#[test]
fn test_additional_entry_points() {
    let project = Project::new();
    project.write("lib/extra.d.ts", "export {};\n");
    let config = project
        .prepare(with(
            base_config(),
            json!({ "additionalEntryPoints": [{ "modulePath": "extra", "filePath": "lib/extra.d.ts" }] }),
        ))
        .unwrap();

    let entry_points: Vec<_> = config.entry_points().map(|e| e.module_path.as_str()).collect();
    assert_eq!(entry_points, ["", "extra"]);
    assert_eq!(config.additional_entry_points()[0].file_path, project.path("lib/extra.d.ts"));
}

#[test]
fn test_rollup_with_multiple_entry_points() {
    let project = Project::new();
    project.write("lib/extra.d.ts", "export {};\n");
    let err = project
        .prepare(with(
            base_config(),
            json!({
                "additionalEntryPoints": [{ "modulePath": "extra", "filePath": "lib/extra.d.ts" }],
                "dtsRollup": { "enabled": true }
            }),
        ))
        .unwrap_err();
    assert!(err.to_string().contains("\"dtsRollup.enabled\""));

    let config = project
        .prepare(with(
            base_config(),
            json!({ "dtsRollup": { "enabled": true, "publicTrimmedFilePath": "<projectFolder>/dist/public.d.ts" } }),
        ))
        .unwrap();
    assert!(config.rollup_enabled());
    assert_eq!(config.untrimmed_file_path(), Some(project.path("dist/widgets.d.ts").as_path()));
    assert_eq!(config.public_trimmed_file_path(), Some(project.path("dist/public.d.ts").as_path()));
    assert_eq!(config.beta_trimmed_file_path(), None);
}

#[test]
fn test_invalid_bundled_package() {
    let project = Project::new();
    let err = project
        .prepare(with(base_config(), json!({ "bundledPackages": ["ok-package", "Not Valid"] })))
        .unwrap_err();
    assert!(err.to_string().contains("invalid package name: \"Not Valid\""));
}

#[test]
fn test_reserved_tags_are_collected() {
    let project = Project::new();
    let err = project
        .prepare(with(
            base_config(),
            json!({ "apiReport": { "tagsToReport": { "@public": true, "@alpha": false, "sealed": true } } }),
        ))
        .unwrap_err();

    match *err {
        Error::InvalidTags { ref violations, .. } => assert_eq!(violations.len(), 3),
        ref other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_release_tags_to_trim() {
    let project = Project::new();
    let config = project
        .prepare(with(base_config(), json!({ "docModel": { "releaseTagsToTrim": ["@beta", "@alpha"] } })))
        .unwrap();
    assert_eq!(
        config.release_tags_to_trim().iter().copied().collect::<Vec<_>>(),
        [ReleaseTag::Alpha, ReleaseTag::Beta]
    );

    let err = project
        .prepare(with(base_config(), json!({ "docModel": { "releaseTagsToTrim": ["@gamma"] } })))
        .unwrap_err();
    assert!(err.to_string().contains("unrecognized release tag \"@gamma\""));
}

#[test]
fn test_missing_tsconfig() {
    let project = Project::new();
    let err = project
        .prepare(with(base_config(), json!({ "compiler": { "tsconfigFilePath": "./nope.json" } })))
        .unwrap_err();
    assert!(err.to_string().contains("\"tsconfigFilePath\" does not exist"));

    let config = project
        .prepare(with(
            base_config(),
            json!({ "compiler": { "tsconfigFilePath": "./nope.json", "overrideTsconfig": { "compilerOptions": {} } } }),
        ))
        .unwrap();
    assert!(config.override_tsconfig().is_some());
}

#[test]
fn test_invalid_message_table() {
    let project = Project::new();
    let err = project
        .prepare(with(
            base_config(),
            json!({ "messages": { "extractorMessageReporting": { "ae-not-a-thing": { "logLevel": "error" } } } }),
        ))
        .unwrap_err();
    assert!(err.to_string().contains("unrecognized identifier \"ae-not-a-thing\""));
}

#[test]
fn test_metadata_lookup_needs_manifest() {
    let project = Project::new();
    fs::remove_file(project.path("package.json")).unwrap();
    let err = project.prepare(base_config()).unwrap_err();
    assert!(err.to_string().contains("\"<lookup>\" token cannot be used"));

    let config = project
        .prepare(with(base_config(), json!({ "tsdocMetadata": { "enabled": false } })))
        .unwrap();
    assert_eq!(config.report_configs()[0].file_name, "unknown-package.api.md");
}

#[test]
fn test_prepare_rejects_extends() {
    let err = ExtractorConfig::prepare(PrepareOptions {
        config_object: json!({ "extends": "./base.json" }),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("must be expanded"));
}

#[test]
fn test_prepare_requires_compiler_section() {
    let project = Project::new();
    let err = ExtractorConfig::prepare(PrepareOptions {
        config_object: json!({
            "projectFolder": project.root(),
            "mainEntryPointFilePath": project.path("lib/index.d.ts")
        }),
        ..Default::default()
    })
    .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r###"
    Error parsing the configuration object:
    The "compiler" section is missing
    "###);
}

#[test]
fn test_short_file_path_and_dump() {
    let project = Project::new();
    let config = project.prepare(base_config()).unwrap();
    assert_eq!(config.short_file_path(&project.path("temp/widgets.api.md")), "temp/widgets.api.md");
    assert_eq!(config.short_file_path(Path::new("/elsewhere/x")), "/elsewhere/x");

    let dump: Value = serde_json::from_str(&config.diagnostic_dump()).unwrap();
    assert_eq!(dump["newlineKind"], "crlf");
    assert_eq!(dump["mainEntryPoint"]["modulePath"], "");
}

#[test]
fn test_custom_tsdoc_config() {
    let project = Project::new();
    project.write(
        "tsdoc.json",
        r#"{ "tagDefinitions": [{ "tagName": "@team", "syntaxKind": "block" }], "supportForTags": { "@team": true } }"#,
    );
    let config = project.prepare(base_config()).unwrap();
    assert_eq!(config.tsdoc_config().file_path(), Some(project.path("tsdoc.json").as_path()));
    assert!(config.tsdoc_config().is_tag_supported("@team"));
}
