//! Orchestration of an API surface extraction.
//!
//! [`Extractor::invoke`] takes a prepared [`ExtractorConfig`] and runs the
//! [`Pipeline`]: collection, doc-comment and validation passes, the API model,
//! then the artifacts the configuration enables. Report drift is reconciled
//! against checked-in baselines, and the run succeeds or fails according to
//! the error and warning counts of the [`MessageRouter`].
//!
//! The analysis itself is done by the components behind [`Toolchain`].
//!
//! [`ExtractorConfig`]: apisurface_config::ExtractorConfig

mod compat;
mod console;
mod context;
mod extractor;
mod message;
mod phase;
pub mod phases;
mod router;
mod runner;
mod toolchain;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use compat::check_compiler_compatibility;
pub use console::ConsoleMessageId;
pub use context::{InvocationContext, InvocationFlags};
pub use extractor::{Extractor, ExtractorResult, InvokeOptions};
pub use message::{
    CompilerDiagnostic, DiagnosticCategory, ExtractorMessage, HandledReset, MessageCategory,
    MessageProperties, SourceLocation,
};
pub use phase::Phase;
pub use router::{DIAGNOSTICS_LINE, MessageCallback, MessageRouter};
pub use runner::Pipeline;
pub use toolchain::{RollupTier, Toolchain, reports_equivalent};
