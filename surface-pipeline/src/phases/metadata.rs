use apisurface_config::ExtractorConfig;
use apisurface_core::{WriteOptions, write_text_file};
use eyre::{Context, Result, eyre};
use serde_json::json;
use tracing::info;

use crate::{Extractor, InvocationContext, Phase, Toolchain};

/// Version of the doc-comment standard the metadata file declares.
pub const TSDOC_VERSION: &str = "0.12";

/// Phase that writes `tsdoc-metadata.json` for the package.
pub struct MetadataPhase;

impl<T: Toolchain> Phase<T> for MetadataPhase {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn description(&self) -> &'static str {
        "Write tsdoc-metadata.json"
    }

    fn enabled(&self, config: &ExtractorConfig) -> bool {
        config.tsdoc_metadata_enabled()
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let config = ctx.config;
        let path = config
            .tsdoc_metadata_file_path()
            .ok_or_else(|| eyre!("tsdocMetadata is enabled but tsdocMetadataFilePath is not set"))?;

        let content = tsdoc_metadata_content(Extractor::package_name(), Extractor::version())?;
        write_text_file(path, &content, &WriteOptions::with_newline(config.newline_kind()))
            .wrap_err_with(|| format!("Unable to write {}", path.display()))?;
        info!(path = %path.display(), "wrote tsdoc metadata");
        Ok(())
    }
}

/// Contents of `tsdoc-metadata.json`: two comment lines, then the JSON body.
pub fn tsdoc_metadata_content(tool_package: &str, tool_version: &str) -> Result<String> {
    let body = json!({
        "tsdocVersion": TSDOC_VERSION,
        "toolPackages": [
            {
                "packageName": tool_package,
                "packageVersion": tool_version,
            }
        ]
    });

    Ok(format!(
        "// This file is read by tools that parse documentation comments conforming to the TSDoc standard.\n\
         // It should be published with your NPM package.  It should not be tracked by Git.\n\
         {}\n",
        serde_json::to_string_pretty(&body)?
    ))
}
