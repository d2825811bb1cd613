//! Init operation - write a starter configuration.

use std::path::{Path, PathBuf};

use apisurface_config::CONFIG_FILENAME;
use apisurface_core::{NewlineKind, WriteOptions, write_text_file};
use eyre::Result;
use serde_json::json;

/// What [`init`] did to the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    Replaced(PathBuf),
}

/// Starter `api-surface.json`: the report, doc model and typings rollup
/// enabled with their default locations.
pub fn template() -> String {
    let document = json!({
        "mainEntryPointFilePath": "<projectFolder>/lib/index.d.ts",
        "apiReport": {
            "enabled": true,
            "reportFolder": "<projectFolder>/etc/"
        },
        "docModel": {
            "enabled": true
        },
        "dtsRollup": {
            "enabled": true,
            "untrimmedFilePath": "<projectFolder>/dist/<unscopedPackageName>.d.ts"
        },
        "tsdocMetadata": {
            "enabled": true
        }
    });
    // `json!` output is always serializable.
    format!("{}\n", serde_json::to_string_pretty(&document).unwrap_or_default())
}

/// Write the starter configuration into `folder`, replacing any existing one.
pub fn init(folder: &Path) -> Result<InitOutcome> {
    let path = folder.join(CONFIG_FILENAME);
    let existed = path.exists();

    write_text_file(&path, &template(), &WriteOptions::with_newline(NewlineKind::Lf))?;
    tracing::info!(path = %path.display(), "wrote starter configuration");

    Ok(if existed {
        InitOutcome::Replaced(path)
    } else {
        InitOutcome::Created(path)
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use apisurface_config::{ConfigLoader, DefaultConfig};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_template_passes_loading() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let outcome = init(dir.path()).expect("Failed to write template");
        let path = dir.path().join(CONFIG_FILENAME);
        assert_eq!(outcome, InitOutcome::Created(path.clone()));

        let defaults = DefaultConfig::load().expect("Failed to load defaults");
        let loaded = ConfigLoader::new(&defaults)
            .load_file(&path)
            .expect("Failed to load template");
        assert_eq!(loaded["apiReport"]["enabled"], json!(true));
        assert_eq!(loaded["docModel"]["enabled"], json!(true));
    }

    #[test]
    fn test_existing_file_is_replaced() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "{}").expect("Failed to write config");

        let outcome = init(dir.path()).expect("Failed to write template");

        assert_eq!(outcome, InitOutcome::Replaced(path.clone()));
        assert_eq!(fs::read_to_string(&path).expect("Failed to read config"), template());
    }
}
