use eyre::Result;

use crate::{
    ConsoleMessageId, InvocationContext, Phase, Toolchain, compat::check_compiler_compatibility,
};

/// Phase that runs before analysis: notes a custom `tsdoc.json`, checks the
/// engine version and, in diagnostics mode, dumps the prepared settings.
pub struct PreamblePhase;

impl<T: Toolchain> Phase<T> for PreamblePhase {
    fn name(&self) -> &'static str {
        "preamble"
    }

    fn description(&self) -> &'static str {
        "Report the engine version and dump diagnostics"
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let config = ctx.config;

        if let Some(path) = config.tsdoc_config().file_path() {
            ctx.router.log_verbose(
                ConsoleMessageId::UsingCustomTsdocConfig,
                format!("Using custom TSDoc config from {}", path.display()),
            );
        }

        check_compiler_compatibility(
            config.project_folder(),
            ctx.toolchain.engine().version(),
            &mut ctx.router,
        );

        if ctx.router.show_diagnostics() {
            let router = &mut ctx.router;
            router.log_diagnostic("");
            router.log_diagnostic_header("Final prepared ExtractorConfig");
            router.log_diagnostic(&config.diagnostic_dump());
            router.log_diagnostic_footer();

            router.log_diagnostic_header("Compiler options");
            router.log_diagnostic(&serde_json::to_string_pretty(ctx.state.program().options())?);
            router.log_diagnostic_footer();

            router.log_diagnostic_header("TSDoc configuration");
            router.log_diagnostic(&serde_json::to_string_pretty(config.tsdoc_config())?);
            router.log_diagnostic_footer();
        }

        Ok(())
    }
}
