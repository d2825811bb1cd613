use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The compiler configuration file could not be read or is not JSON.
    #[error("Error reading {}: {message}", .path.display())]
    ReadConfig { path: PathBuf, message: String },

    /// The engine reported problems with the compiler configuration.
    #[error("Error parsing tsconfig.json content: {0}")]
    ConfigParse(String),

    #[error("Input file is not an absolute path: {}", .0.display())]
    RelativeInput(PathBuf),

    #[error("Either the \"tsconfigFilePath\" or \"overrideTsconfig\" setting must be specified")]
    MissingCompilerConfig,

    /// The engine failed to construct a program.
    #[error("Unable to create the analysis program: {0}")]
    Program(String),
}
