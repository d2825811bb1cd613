//! End-to-end runs of the extraction pipeline against a scripted toolchain.

use std::{
    fs,
    sync::{Arc, Mutex},
};

use apisurface_core::LogLevel;
use apisurface_pipeline::{
    Extractor, ExtractorResult, InvokeOptions, SourceLocation,
    testing::{ScriptedIssue, ScriptedToolchain, TestProject},
};
use serde_json::{Value, json};

const REPORT: &str = "export declare const x: number;\n";

fn invoke(project: &TestProject, config: Value, toolchain: &ScriptedToolchain, options: InvokeOptions) -> ExtractorResult {
    let config = project.config(config).expect("Failed to prepare config");
    Extractor::invoke(config, toolchain, options).expect("Failed to invoke")
}

fn report_enabled() -> Value {
    json!({ "apiReport": { "enabled": true } })
}

fn missing_release_tag(project: &TestProject) -> ScriptedIssue {
    ScriptedIssue::new(
        "ae-missing-release-tag",
        "\"x\" is part of the package's API, but it is missing a release tag",
        SourceLocation::new(project.path("lib/index.d.ts"), 1, 22),
    )
}

/// Record the id of every message the router handles.
fn capture_ids(options: InvokeOptions) -> (InvokeOptions, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = options.message_callback(move |message| {
        sink.lock().expect("Failed to lock").push(message.message_id().to_string());
    });
    (options, seen)
}

#[test]
fn test_stage_order() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();
    let config = json!({
        "apiReport": { "enabled": true },
        "docModel": { "enabled": true },
        "dtsRollup": {
            "enabled": true,
            "publicTrimmedFilePath": "<projectFolder>/dist/public.d.ts"
        }
    });

    invoke(&project, config, &toolchain, InvokeOptions::new().local_build(true));

    assert_eq!(
        toolchain.calls(),
        ["collect", "doc-comments", "validation", "model", "report", "rollup", "rollup"]
    );
}

#[test]
fn test_program_roots_come_from_tsconfig() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();

    let result = invoke(&project, json!({}), &toolchain, InvokeOptions::new());

    let roots = result.analysis_state().program().root_file_names();
    assert_eq!(roots.len(), 1);
    assert!(roots[0].ends_with("lib/index.d.ts"));
}

#[test]
fn test_report_unchanged() {
    for local_build in [false, true] {
        let project = TestProject::new().expect("Failed to create project");
        project.write("etc/widgets.api.md", REPORT).expect("Failed to write baseline");
        let toolchain = ScriptedToolchain::new().with_report(REPORT);

        let result = invoke(&project, report_enabled(), &toolchain, InvokeOptions::new().local_build(local_build));

        assert!(result.succeeded());
        assert!(!result.api_report_changed());
        assert_eq!(result.warning_count(), 0);
        assert!(project.exists("temp/widgets.api.md"));
        assert_eq!(project.read("etc/widgets.api.md").expect("Failed to read baseline"), REPORT);
    }
}

#[test]
fn test_report_ignores_line_endings() {
    let project = TestProject::new().expect("Failed to create project");
    project
        .write("etc/widgets.api.md", "export declare const x: number;\r\n\r\n")
        .expect("Failed to write baseline");
    let toolchain = ScriptedToolchain::new().with_report(REPORT);

    let result = invoke(&project, report_enabled(), &toolchain, InvokeOptions::new());

    assert!(result.succeeded());
    assert!(!result.api_report_changed());
}

#[test]
fn test_report_changed_in_ci() {
    let project = TestProject::new().expect("Failed to create project");
    project
        .write("etc/widgets.api.md", "export declare const y: string;\n")
        .expect("Failed to write baseline");
    let toolchain = ScriptedToolchain::new().with_report(REPORT);
    let (options, seen) = capture_ids(InvokeOptions::new());

    let result = invoke(&project, report_enabled(), &toolchain, options);

    assert!(!result.succeeded());
    assert!(result.api_report_changed());
    assert_eq!(result.warning_count(), 1);
    assert!(seen.lock().expect("Failed to lock").contains(&"console-api-report-not-copied".to_string()));
    assert_eq!(
        project.read("etc/widgets.api.md").expect("Failed to read baseline"),
        "export declare const y: string;\n"
    );
    assert!(
        project
            .read("temp/widgets.api.md")
            .expect("Failed to read staged report")
            .contains("const x")
    );
}

#[test]
fn test_report_changed_in_local_build() {
    let project = TestProject::new().expect("Failed to create project");
    project
        .write("etc/widgets.api.md", "export declare const y: string;\n")
        .expect("Failed to write baseline");
    let toolchain = ScriptedToolchain::new().with_report(REPORT);
    let (options, seen) = capture_ids(InvokeOptions::new().local_build(true));

    let result = invoke(&project, report_enabled(), &toolchain, options);

    assert!(result.succeeded());
    assert!(result.api_report_changed());
    assert_eq!(result.warning_count(), 1);
    assert!(seen.lock().expect("Failed to lock").contains(&"console-api-report-copied".to_string()));
    assert_eq!(
        project.read("etc/widgets.api.md").expect("Failed to read baseline"),
        "export declare const x: number;\r\n"
    );
}

#[test]
fn test_missing_baseline_is_created_in_local_build() {
    let project = TestProject::new().expect("Failed to create project");
    fs::create_dir_all(project.path("etc")).expect("Failed to create etc");
    let toolchain = ScriptedToolchain::new().with_report(REPORT);
    let (options, seen) = capture_ids(InvokeOptions::new().local_build(true));

    let result = invoke(&project, report_enabled(), &toolchain, options);

    assert!(result.succeeded());
    assert!(result.api_report_changed());
    assert!(project.exists("etc/widgets.api.md"));
    assert!(seen.lock().expect("Failed to lock").contains(&"console-api-report-created".to_string()));
}

#[test]
fn test_missing_baseline_folder_is_an_error() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new().with_report(REPORT);
    let (options, seen) = capture_ids(InvokeOptions::new().local_build(true));

    let result = invoke(&project, report_enabled(), &toolchain, options);

    assert!(!result.succeeded());
    assert!(result.api_report_changed());
    assert_eq!(result.error_count(), 1);
    assert!(!project.exists("etc"));
    assert!(
        seen.lock()
            .expect("Failed to lock")
            .contains(&"console-api-report-folder-missing".to_string())
    );
}

#[test]
fn test_missing_baseline_in_ci() {
    let project = TestProject::new().expect("Failed to create project");
    fs::create_dir_all(project.path("etc")).expect("Failed to create etc");
    let toolchain = ScriptedToolchain::new().with_report(REPORT);

    let result = invoke(&project, report_enabled(), &toolchain, InvokeOptions::new());

    assert!(!result.succeeded());
    assert!(result.api_report_changed());
    assert_eq!(result.warning_count(), 1);
    assert!(!project.exists("etc/widgets.api.md"));
    assert!(project.exists("temp/widgets.api.md"));
}

#[test]
fn test_each_report_variant_is_reconciled() {
    let project = TestProject::new().expect("Failed to create project");
    fs::create_dir_all(project.path("etc")).expect("Failed to create etc");
    let toolchain = ScriptedToolchain::new().with_report(REPORT);
    let config = json!({ "apiReport": { "enabled": true, "reportVariants": ["public", "complete"] } });

    invoke(&project, config, &toolchain, InvokeOptions::new().local_build(true));

    assert!(project.exists("etc/widgets.public.api.md"));
    assert!(project.exists("etc/widgets.api.md"));
    assert_eq!(toolchain.calls().iter().filter(|call| **call == "report").count(), 2);
}

#[test]
fn test_warnings_fail_only_ci_builds() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new().with_issue(missing_release_tag(&project));

    let ci = invoke(&project, json!({}), &toolchain, InvokeOptions::new());
    assert!(!ci.succeeded());
    assert_eq!(ci.warning_count(), 1);
    assert_eq!(ci.error_count(), 0);

    let local = invoke(&project, json!({}), &toolchain, InvokeOptions::new().local_build(true));
    assert!(local.succeeded());
    assert_eq!(local.warning_count(), 1);
}

#[test]
fn test_report_claims_associated_findings() {
    let project = TestProject::new().expect("Failed to create project");
    fs::create_dir_all(project.path("etc")).expect("Failed to create etc");
    let toolchain = ScriptedToolchain::new()
        .with_report(REPORT)
        .with_issue(missing_release_tag(&project).on("x"));

    let result = invoke(&project, report_enabled(), &toolchain, InvokeOptions::new().local_build(true));

    let report = project.read("etc/widgets.api.md").expect("Failed to read report");
    assert!(report.contains("// Warning: (ae-missing-release-tag)"));
    // Only the "report created" notice is counted; the finding went into the report.
    assert_eq!(result.warning_count(), 1);
}

#[test]
fn test_callback_can_change_severity() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new().with_issue(missing_release_tag(&project));

    let options = InvokeOptions::new().local_build(true).message_callback(|message| {
        if message.message_id() == "ae-missing-release-tag" {
            message.set_log_level(LogLevel::Error);
        }
    });
    let result = invoke(&project, json!({}), &toolchain, options);

    assert!(!result.succeeded());
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.warning_count(), 0);
}

#[test]
fn test_callback_can_silence_findings() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new().with_issue(missing_release_tag(&project));

    let options = InvokeOptions::new().message_callback(|message| {
        if message.message_id() == "ae-missing-release-tag" {
            message.set_log_level(LogLevel::None);
        }
    });
    let result = invoke(&project, json!({}), &toolchain, options);

    assert!(result.succeeded());
    assert_eq!(result.warning_count(), 0);
}

#[test]
fn test_configured_rule_sets_level() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new().with_issue(missing_release_tag(&project));
    let config = json!({
        "messages": {
            "extractorMessageReporting": {
                "ae-missing-release-tag": { "logLevel": "error" }
            }
        }
    });

    let result = invoke(&project, config, &toolchain, InvokeOptions::new().local_build(true));

    assert!(!result.succeeded());
    assert_eq!(result.error_count(), 1);
}

#[test]
fn test_rollups_skip_empty_paths() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();
    let config = json!({
        "dtsRollup": {
            "enabled": true,
            "publicTrimmedFilePath": "<projectFolder>/dist/widgets-public.d.ts",
            "betaTrimmedFilePath": ""
        }
    });

    invoke(&project, config, &toolchain, InvokeOptions::new());

    let public = project.read("dist/widgets-public.d.ts").expect("Failed to read public rollup");
    assert!(public.starts_with("// public rollup"));
    let untrimmed = project.read("dist/widgets.d.ts").expect("Failed to read untrimmed rollup");
    assert!(untrimmed.starts_with("// untrimmed rollup"));
    assert_eq!(toolchain.calls().iter().filter(|call| **call == "rollup").count(), 2);
}

#[test]
fn test_doc_model_is_written() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();
    let config = json!({ "docModel": { "enabled": true }, "testMode": true, "newlineKind": "lf" });

    invoke(&project, config, &toolchain, InvokeOptions::new());

    let content = project.read("temp/widgets.api.json").expect("Failed to read doc model");
    let model: Value = serde_json::from_str(&content).expect("Failed to parse doc model");
    assert_eq!(model["metadata"]["toolPackage"], json!("apisurface"));
    assert_eq!(model["metadata"]["toolVersion"], json!("[test mode]"));
    assert_eq!(model["kind"], json!("Package"));
    assert!(content.lines().count() > 1);
}

#[test]
fn test_doc_model_minify() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();
    let config = json!({ "docModel": { "enabled": true }, "newlineKind": "lf" });

    invoke(&project, config, &toolchain, InvokeOptions::new().doc_model_minify(true));

    let content = project.read("temp/widgets.api.json").expect("Failed to read doc model");
    assert_eq!(content.lines().count(), 1);
    assert!(content.ends_with('\n'));
}

#[test]
fn test_tsdoc_metadata_is_written_next_to_typings() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();

    invoke(&project, json!({}), &toolchain, InvokeOptions::new());

    let content = project.read("lib/tsdoc-metadata.json").expect("Failed to read metadata");
    assert!(content.starts_with("// This file is read by tools"));
    assert!(content.contains("\"tsdocVersion\": \"0.12\""));
}

#[test]
fn test_disabled_outputs_are_not_written() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();

    invoke(&project, json!({ "tsdocMetadata": { "enabled": false } }), &toolchain, InvokeOptions::new());

    assert!(!project.exists("lib/tsdoc-metadata.json"));
    assert!(!project.exists("temp"));
    assert!(!project.exists("dist"));
    assert_eq!(toolchain.calls(), ["collect", "doc-comments", "validation", "model"]);
}

#[test]
fn test_analysis_state_is_reused() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();

    let first = invoke(&project, json!({}), &toolchain, InvokeOptions::new());
    let state = first.analysis_state().clone();
    let second = invoke(&project, json!({}), &toolchain, InvokeOptions::new().analysis_state(state));

    assert!(Arc::ptr_eq(
        first.analysis_state().program(),
        second.analysis_state().program()
    ));
}

#[test]
fn test_diagnostics_are_dumped_only_on_request() {
    let project = TestProject::new().expect("Failed to create project");
    let toolchain = ScriptedToolchain::new();

    let (options, seen) = capture_ids(InvokeOptions::new());
    invoke(&project, json!({}), &toolchain, options);
    assert!(!seen.lock().expect("Failed to lock").contains(&"console-diagnostics".to_string()));

    let (options, seen) = capture_ids(InvokeOptions::new().show_diagnostics(true));
    invoke(&project, json!({}), &toolchain, options);
    let seen = seen.lock().expect("Failed to lock");
    assert!(seen.contains(&"console-diagnostics".to_string()));
    assert_eq!(seen.first().map(String::as_str), Some("console-preamble"));
}

#[test]
fn test_newer_project_engine_is_noticed() {
    let project = TestProject::new().expect("Failed to create project");
    project
        .write(
            "node_modules/typescript/package.json",
            r#"{ "name": "typescript", "version": "9.1.0" }"#,
        )
        .expect("Failed to write engine manifest");
    let toolchain = ScriptedToolchain::new().with_engine_version("5.4.2");

    let (options, seen) = capture_ids(InvokeOptions::new());
    let result = invoke(&project, json!({}), &toolchain, options);

    assert!(
        seen.lock()
            .expect("Failed to lock")
            .contains(&"console-compiler-version-notice".to_string())
    );
    assert!(result.succeeded());
}
