//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// An output file the configuration will produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: String,
    /// Path relative to the project folder when it lies under it.
    pub path: String,
}

impl Artifact {
    pub fn new(kind: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            path: path.into(),
        }
    }
}

/// Summary of a prepared configuration.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file, if it came from one.
    pub config_path: Option<PathBuf>,
    pub project_folder: PathBuf,
    pub package_name: Option<String>,
    pub tsconfig: Option<String>,
    /// Module path (or `(main)`) and declaration file of each entry point.
    pub entry_points: Vec<(String, String)>,
    pub artifacts: Vec<Artifact>,
    /// Resolved configuration as JSON, when requested.
    pub diagnostic_dump: Option<String>,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        let source = self
            .config_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "configuration".to_string());
        out.preformatted(&format!("✓ {} is valid", source));
        out.newline();

        out.key_value("Project folder", &self.project_folder.display().to_string());
        if let Some(name) = &self.package_name {
            out.key_value("Package", name);
        }
        if let Some(tsconfig) = &self.tsconfig {
            out.key_value("Compiler config", tsconfig);
        }
        out.newline();

        out.section("Entry points");
        for (name, path) in &self.entry_points {
            out.list_item(&format!("{name} -> {path}"));
        }
        out.newline();

        out.section("Outputs");
        if self.artifacts.is_empty() {
            out.list_item("(none enabled)");
        }
        for artifact in &self.artifacts {
            out.key_value_indented(&artifact.kind, &artifact.path);
        }

        if let Some(dump) = &self.diagnostic_dump {
            out.newline();
            out.divider("Resolved configuration");
            out.preformatted(dump);
        }
    }
}
