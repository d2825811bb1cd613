//! Check operation - summarize a prepared configuration.

use apisurface_config::ExtractorConfig;
use apisurface_pipeline::RollupTier;

use crate::reports::{Artifact, CheckReport};

/// Collect what a prepared configuration will produce.
pub fn check(config: &ExtractorConfig, diagnostics: bool) -> CheckReport {
    let short = |path: &std::path::Path| config.short_file_path(path);

    let entry_points = config
        .entry_points()
        .map(|entry| {
            let name = if entry.module_path.is_empty() {
                "(main)".to_string()
            } else {
                entry.module_path.clone()
            };
            (name, short(&entry.file_path))
        })
        .collect();

    let mut artifacts = Vec::new();
    if config.api_report_enabled() {
        for report in config.report_configs() {
            artifacts.push(Artifact::new(
                format!("API report ({})", report.variant),
                short(&config.report_file_path(report)),
            ));
        }
    }
    if let Some(path) = config.api_json_file_path().filter(|_| config.doc_model_enabled()) {
        artifacts.push(Artifact::new("doc model", short(path)));
    }
    if config.rollup_enabled() {
        for tier in RollupTier::ALL {
            if let Some(path) = tier.output_path(config) {
                artifacts.push(Artifact::new(format!("{tier} rollup"), short(path)));
            }
        }
    }
    if let Some(path) = config.tsdoc_metadata_file_path().filter(|_| config.tsdoc_metadata_enabled()) {
        artifacts.push(Artifact::new("tsdoc metadata", short(path)));
    }

    CheckReport {
        config_path: config.config_file_path().map(|path| path.to_path_buf()),
        project_folder: config.project_folder().to_path_buf(),
        package_name: config.package_json().map(|package| package.name.clone()),
        tsconfig: config.tsconfig_file_path().map(short),
        entry_points,
        artifacts,
        diagnostic_dump: diagnostics.then(|| config.diagnostic_dump()),
    }
}
