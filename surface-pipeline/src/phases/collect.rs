use eyre::Result;
use tracing::debug;

use crate::{InvocationContext, Phase, Toolchain};

/// Phase that enumerates the exported symbols of the entry points.
pub struct CollectPhase;

impl<T: Toolchain> Phase<T> for CollectPhase {
    fn name(&self) -> &'static str {
        "collect"
    }

    fn description(&self) -> &'static str {
        "Enumerate exported symbols from the entry points"
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let toolchain = ctx.toolchain;
        let collection = toolchain.collect(ctx.config, ctx.state, &mut ctx.router)?;
        debug!(messages = ctx.router.messages().len(), "collected symbols");
        ctx.collection = Some(collection);
        Ok(())
    }
}
