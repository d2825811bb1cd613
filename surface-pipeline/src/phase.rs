//! Pipeline phase trait.

use apisurface_config::ExtractorConfig;
use eyre::Result;

use crate::{InvocationContext, Toolchain};

/// A stage of the extraction pipeline.
///
/// Phases run in a fixed order. A fatal problem is returned as an error and
/// ends the invocation; findings about the analyzed code go through the
/// context's router instead.
pub trait Phase<T: Toolchain> {
    /// The name of this phase, used in logs.
    fn name(&self) -> &'static str;

    /// A human-readable description of what this phase does.
    fn description(&self) -> &'static str;

    /// Whether the configuration asks for this phase at all.
    fn enabled(&self, _config: &ExtractorConfig) -> bool {
        true
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()>;
}
