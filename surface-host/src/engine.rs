use std::{
    any::Any,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde_json::{Map, Value};

use crate::{CompilerHost, HostError, Result};

/// Compiler options as produced by the engine's configuration parser.
pub type CompilerOptions = Map<String, Value>;

/// A compiler configuration after the engine has parsed it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCommandLine {
    /// Source files named by the configuration, as absolute paths.
    pub file_names: Vec<PathBuf>,
    pub options: CompilerOptions,
    /// Human-readable problems found while parsing.
    pub errors: Vec<String>,
}

/// Opaque handle to an analyzed program.
pub trait Program: fmt::Debug + Send + Sync {
    /// The files the program was created from.
    fn root_file_names(&self) -> &[PathBuf];

    fn options(&self) -> &CompilerOptions;

    /// Access the engine-specific type behind the handle.
    fn as_any(&self) -> &dyn Any;
}

/// The semantic analysis engine.
pub trait AnalysisEngine: Send + Sync {
    /// Version of the engine, e.g. `5.4.2`.
    fn version(&self) -> &str;

    /// The engine's unpatched compiler host for `options`.
    fn default_host(&self, options: &CompilerOptions) -> CompilerHost;

    /// Read a compiler configuration file.
    fn read_config_file(&self, path: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(path).map_err(|e| HostError::ReadConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| HostError::ReadConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse a configuration document, resolving relative paths against
    /// `base_folder`.
    fn parse_config(&self, config: &Value, base_folder: &Path) -> ParsedCommandLine;

    /// Build a program from `root_names`.
    fn create_program(
        &self,
        root_names: &[PathBuf],
        options: &CompilerOptions,
        host: CompilerHost,
    ) -> Result<Arc<dyn Program>>;
}
