//! Test doubles for the pipeline.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    any::Any,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use apisurface_config::{DefaultConfig, ExtractorConfig, ReportConfig, merge_overwriting_arrays};
use apisurface_host::{
    AnalysisEngine, AnalysisState, CompilerHost, CompilerOptions, ParsedCommandLine, Program,
};
use eyre::{Context, Result};
use serde_json::{Map, Value, json};
use tempfile::TempDir;

use crate::{MessageProperties, MessageRouter, RollupTier, SourceLocation, Toolchain};

/// A program that only remembers what it was built from.
#[derive(Debug)]
pub struct FakeProgram {
    roots: Vec<PathBuf>,
    options: CompilerOptions,
}

impl Program for FakeProgram {
    fn root_file_names(&self) -> &[PathBuf] {
        &self.roots
    }

    fn options(&self) -> &CompilerOptions {
        &self.options
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An engine that understands the `files` and `compilerOptions` fields of a
/// compiler configuration and nothing else.
#[derive(Debug, Clone)]
pub struct FakeEngine {
    version: String,
}

impl FakeEngine {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new("5.4.2")
    }
}

impl AnalysisEngine for FakeEngine {
    fn version(&self) -> &str {
        &self.version
    }

    fn default_host(&self, _options: &CompilerOptions) -> CompilerHost {
        CompilerHost::system("/", "/engine/lib")
    }

    fn parse_config(&self, config: &Value, base_folder: &Path) -> ParsedCommandLine {
        let file_names = config["files"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(|name| base_folder.join(name))
            .collect();
        let options = config["compilerOptions"].as_object().cloned().unwrap_or_default();
        ParsedCommandLine {
            file_names,
            options,
            errors: Vec::new(),
        }
    }

    fn create_program(
        &self,
        root_names: &[PathBuf],
        options: &CompilerOptions,
        _host: CompilerHost,
    ) -> apisurface_host::Result<Arc<dyn Program>> {
        Ok(Arc::new(FakeProgram {
            roots: root_names.to_vec(),
            options: options.clone(),
        }))
    }
}

/// A finding [`ScriptedToolchain`] raises during validation.
#[derive(Debug, Clone)]
pub struct ScriptedIssue {
    pub message_id: String,
    pub text: String,
    pub location: SourceLocation,
    /// Declaration the finding is attached to, if any.
    pub declaration: Option<String>,
}

impl ScriptedIssue {
    pub fn new(message_id: &str, text: &str, location: SourceLocation) -> Self {
        Self {
            message_id: message_id.to_string(),
            text: text.to_string(),
            location,
            declaration: None,
        }
    }

    pub fn on(mut self, declaration: &str) -> Self {
        self.declaration = Some(declaration.to_string());
        self
    }
}

/// What [`ScriptedToolchain`] collects: the program's root files and which
/// enhancers have run.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCollection {
    pub root_files: Vec<PathBuf>,
    pub doc_comments: bool,
    pub validated: bool,
}

/// A toolchain with canned output that records the order of its calls.
#[derive(Debug, Default)]
pub struct ScriptedToolchain {
    engine: FakeEngine,
    report: String,
    issues: Vec<ScriptedIssue>,
    calls: Mutex<Vec<&'static str>>,
}

impl ScriptedToolchain {
    pub fn new() -> Self {
        Self::default().with_report("export declare const x: number;\n")
    }

    /// Report text rendered for every variant.
    pub fn with_report(mut self, report: &str) -> Self {
        self.report = report.to_string();
        self
    }

    pub fn with_issue(mut self, issue: ScriptedIssue) -> Self {
        self.issues.push(issue);
        self
    }

    pub fn with_engine_version(mut self, version: &str) -> Self {
        self.engine = FakeEngine::new(version);
        self
    }

    /// Names of the toolchain methods called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, call: &'static str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Toolchain for ScriptedToolchain {
    type Collection = ScriptedCollection;

    fn engine(&self) -> &dyn AnalysisEngine {
        &self.engine
    }

    fn collect(
        &self,
        _config: &ExtractorConfig,
        state: &AnalysisState,
        _router: &mut MessageRouter,
    ) -> Result<ScriptedCollection> {
        self.record("collect");
        Ok(ScriptedCollection {
            root_files: state.program().root_file_names().to_vec(),
            ..Default::default()
        })
    }

    fn enhance_doc_comments(&self, collection: &mut ScriptedCollection, _router: &mut MessageRouter) -> Result<()> {
        self.record("doc-comments");
        collection.doc_comments = true;
        Ok(())
    }

    fn enhance_validation(&self, collection: &mut ScriptedCollection, router: &mut MessageRouter) -> Result<()> {
        self.record("validation");
        for issue in &self.issues {
            match &issue.declaration {
                Some(declaration) => router.add_analyzer_issue(
                    &issue.message_id,
                    issue.text.clone(),
                    issue.location.clone(),
                    declaration,
                    MessageProperties::default(),
                ),
                None => router.add_analyzer_issue_for_position(
                    &issue.message_id,
                    issue.text.clone(),
                    issue.location.clone(),
                    MessageProperties::default(),
                ),
            }
        }
        collection.validated = true;
        Ok(())
    }

    fn build_model(&self, collection: &ScriptedCollection) -> Result<Map<String, Value>> {
        self.record("model");
        let entry_points: Vec<String> = collection
            .root_files
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        let mut model = Map::new();
        model.insert("kind".to_string(), json!("Package"));
        model.insert("entryPoints".to_string(), json!(entry_points));
        Ok(model)
    }

    fn generate_report(
        &self,
        _collection: &ScriptedCollection,
        _report: &ReportConfig,
        router: &mut MessageRouter,
    ) -> Result<String> {
        self.record("report");
        let mut content = self.report.clone();
        for declaration in self.issues.iter().filter_map(|issue| issue.declaration.as_deref()) {
            for message in router.fetch_associated_messages_for_review_file(declaration) {
                content.push_str(&format!("// Warning: {}\n", message.format_without_location()));
            }
        }
        for message in router.fetch_unassociated_messages_for_review_file() {
            content.push_str(&format!("// Warning: {}\n", message.format_without_location()));
        }
        Ok(content)
    }

    fn generate_rollup(&self, _collection: &ScriptedCollection, tier: RollupTier) -> Result<String> {
        self.record("rollup");
        Ok(format!("// {tier} rollup\nexport {{}};\n"))
    }
}

/// A throwaway project: `package.json` for `@acme/widgets`, a
/// `tsconfig.json` listing `lib/index.d.ts`, and that entry point.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().wrap_err("Failed to create temp dir")?;
        let project = Self { dir };
        project.write(
            "package.json",
            r#"{ "name": "@acme/widgets", "version": "1.0.0", "types": "lib/index.d.ts" }"#,
        )?;
        project.write("tsconfig.json", r#"{ "files": ["lib/index.d.ts"] }"#)?;
        project.write("lib/index.d.ts", "export declare const x: number;\n")?;
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn write(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        fs::read_to_string(&path).wrap_err_with(|| format!("Failed to read {}", path.display()))
    }

    /// Write `api-surface.json` with `overrides` applied to a minimal config
    /// and prepare it.
    pub fn config(&self, overrides: Value) -> Result<ExtractorConfig> {
        let mut config = json!({ "mainEntryPointFilePath": "<projectFolder>/lib/index.d.ts" });
        merge_overwriting_arrays(&mut config, overrides);
        self.write("api-surface.json", &serde_json::to_string_pretty(&config)?)?;

        let defaults = DefaultConfig::load()?;
        let config = ExtractorConfig::load_file_and_prepare(&self.path("api-surface.json"), &defaults)?;
        Ok(config)
    }
}
