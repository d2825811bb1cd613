use apisurface_config::ExtractorConfig;
use apisurface_core::{WriteOptions, write_text_file};
use eyre::{Context, Result, eyre};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::{ConsoleMessageId, Extractor, InvocationContext, Phase, Toolchain};

/// Phase that builds the API surface model from the enhanced collection.
pub struct ModelPhase;

impl<T: Toolchain> Phase<T> for ModelPhase {
    fn name(&self) -> &'static str {
        "model"
    }

    fn description(&self) -> &'static str {
        "Build the API surface model"
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let model = ctx.toolchain.build_model(ctx.collection()?)?;
        ctx.model = Some(model);

        // Separate any diagnostics output from what follows.
        ctx.router.log_diagnostic("");
        Ok(())
    }
}

/// Phase that writes the doc model file.
pub struct PersistModelPhase;

impl<T: Toolchain> Phase<T> for PersistModelPhase {
    fn name(&self) -> &'static str {
        "persist-model"
    }

    fn description(&self) -> &'static str {
        "Write the doc model file"
    }

    fn enabled(&self, config: &ExtractorConfig) -> bool {
        config.doc_model_enabled()
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let config = ctx.config;
        let path = config
            .api_json_file_path()
            .ok_or_else(|| eyre!("docModel is enabled but apiJsonFilePath is not set"))?;
        let model = ctx
            .model
            .as_ref()
            .ok_or_else(|| eyre!("model not set - did the model phase run?"))?;

        ctx.router.log_verbose(
            ConsoleMessageId::WritingDocModelFile,
            format!("Writing: {}", path.display()),
        );

        let document = doc_model_document(model, config.test_mode());
        let mut content = if ctx.flags.doc_model_minify {
            serde_json::to_string(&document)?
        } else {
            serde_json::to_string_pretty(&document)?
        };
        content.push('\n');

        write_text_file(path, &content, &WriteOptions::with_newline(config.newline_kind()))
            .wrap_err_with(|| format!("Unable to write the doc model file {}", path.display()))?;
        info!(path = %path.display(), "wrote doc model");
        Ok(())
    }
}

/// The doc model file contents: tool metadata followed by the model.
///
/// In test mode the tool version is masked so output stays stable across
/// releases.
pub fn doc_model_document(model: &Map<String, Value>, test_mode: bool) -> Value {
    let tool_version = if test_mode {
        "[test mode]"
    } else {
        Extractor::version()
    };

    let mut document = Map::new();
    document.insert(
        "metadata".to_string(),
        json!({
            "toolPackage": Extractor::package_name(),
            "toolVersion": tool_version,
        }),
    );
    for (key, value) in model {
        if key != "metadata" {
            document.insert(key.clone(), value.clone());
        }
    }
    Value::Object(document)
}
