//! Turns a resolved configuration into an analyzed program.
//!
//! The semantic engine is reached only through [`AnalysisEngine`]. This crate
//! decides which files the engine sees and how it sees the file system.

mod engine;
mod error;
mod host;
mod inputs;
mod state;

pub use engine::{AnalysisEngine, CompilerOptions, ParsedCommandLine, Program};
pub use error::{HostError, Result};
pub use host::{
    CompilerHost, DefaultLibLocationFn, FileExistsFn, ReadFileFn, patch_host, sibling_declaration,
};
pub use inputs::collect_input_files;
pub use state::{AnalysisState, AnalysisStateOptions};
