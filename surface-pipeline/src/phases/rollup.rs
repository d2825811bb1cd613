use apisurface_config::ExtractorConfig;
use apisurface_core::{WriteOptions, write_text_file};
use eyre::{Context, Result};
use tracing::debug;

use crate::{ConsoleMessageId, InvocationContext, Phase, RollupTier, Toolchain};

/// Phase that writes one declaration rollup per configured tier.
///
/// Tiers are written public first, then beta, alpha and untrimmed. A tier
/// with an empty output path is skipped silently.
pub struct RollupPhase;

impl<T: Toolchain> Phase<T> for RollupPhase {
    fn name(&self) -> &'static str {
        "rollup"
    }

    fn description(&self) -> &'static str {
        "Write trimmed declaration rollups"
    }

    fn enabled(&self, config: &ExtractorConfig) -> bool {
        config.rollup_enabled()
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let config = ctx.config;
        let write_options = WriteOptions::with_newline(config.newline_kind());

        for tier in RollupTier::ALL {
            let Some(path) = tier.output_path(config) else {
                debug!(%tier, "no output path, skipping rollup");
                continue;
            };

            ctx.router.log_verbose(
                ConsoleMessageId::WritingDtsRollup,
                format!("Writing package typings: {}", path.display()),
            );
            let content = ctx.toolchain.generate_rollup(ctx.collection()?, tier)?;
            write_text_file(path, &content, &write_options)
                .wrap_err_with(|| format!("Unable to write the {tier} rollup {}", path.display()))?;
        }
        Ok(())
    }
}
