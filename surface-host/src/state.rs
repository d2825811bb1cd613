use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use apisurface_config::ExtractorConfig;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    AnalysisEngine, HostError, ParsedCommandLine, Program, Result, collect_input_files,
    patch_host,
};

/// Caller overrides for [`AnalysisState::create`].
#[derive(Debug, Clone, Default)]
pub struct AnalysisStateOptions {
    /// Extra entry points analyzed in addition to the configured ones.
    pub additional_entry_points: Vec<PathBuf>,
    /// An alternate engine installation whose `lib` folder supplies the
    /// standard library declarations.
    pub typescript_compiler_folder: Option<PathBuf>,
}

/// The analyzed program an invocation works on.
///
/// Cloning is cheap and shares the program; a state may be reused across
/// invocations that analyze the same inputs.
#[derive(Clone, Debug)]
pub struct AnalysisState {
    program: Arc<dyn Program>,
}

impl AnalysisState {
    /// Build a program for `config` with `engine`.
    #[instrument(skip_all, fields(project = %config.project_folder().display()))]
    pub fn create(
        config: &ExtractorConfig,
        engine: &dyn AnalysisEngine,
        options: &AnalysisStateOptions,
    ) -> Result<Self> {
        let mut command_line = parse_compiler_config(config, engine)?;

        if config.skip_lib_check() && command_line.options.get("skipLibCheck") != Some(&Value::Bool(true)) {
            command_line.options.insert("skipLibCheck".to_string(), Value::Bool(true));
            warn!(
                "API Surface was invoked with skipLibCheck. This is not recommended and may cause \
                 API Surface to produce incomplete or incorrect declarations."
            );
        }

        if let Some(first) = command_line.errors.first() {
            return Err(HostError::ConfigParse(first.clone()));
        }

        let candidates = command_line
            .file_names
            .iter()
            .cloned()
            .chain(config.entry_points().map(|entry| entry.file_path.clone()))
            .chain(options.additional_entry_points.iter().cloned());
        let root_names = collect_input_files(candidates)?;
        debug!(count = root_names.len(), "collected input files");

        let default_host = engine.default_host(&command_line.options);
        let host = patch_host(&default_host, options.typescript_compiler_folder.as_deref());
        let program = engine.create_program(&root_names, &command_line.options, host)?;

        Ok(Self { program })
    }

    /// Wrap a program built elsewhere.
    pub fn from_program(program: Arc<dyn Program>) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Arc<dyn Program> {
        &self.program
    }
}

fn parse_compiler_config(
    config: &ExtractorConfig,
    engine: &dyn AnalysisEngine,
) -> Result<ParsedCommandLine> {
    if let Some(inline) = config.override_tsconfig() {
        let document = Value::Object(inline.clone());
        return Ok(engine.parse_config(&document, config.project_folder()));
    }

    let path = config.tsconfig_file_path().ok_or(HostError::MissingCompilerConfig)?;
    let document = engine.read_config_file(path)?;
    let base_folder = path.parent().unwrap_or(Path::new("/"));
    debug!(tsconfig = %path.display(), "parsed compiler configuration");
    Ok(engine.parse_config(&document, base_folder))
}
