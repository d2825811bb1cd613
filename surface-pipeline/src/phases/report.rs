use apisurface_config::{ExtractorConfig, ReportConfig};
use apisurface_core::{WriteOptions, read_text_file, write_text_file};
use eyre::{Context, Result};
use tracing::{debug, instrument};

use crate::{ConsoleMessageId, InvocationContext, Phase, Toolchain};

/// What reconciling one API report against its baseline did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The baseline matches the generated report.
    Unchanged,
    /// The baseline differed and a local build overwrote it.
    Updated,
    /// The baseline differs or is missing and was left alone.
    NotUpdated,
    /// There was no baseline and a local build wrote one.
    Created,
    /// There was no baseline and its folder does not exist.
    CreateFailed,
}

impl ReportOutcome {
    /// Whether the API surface drifted from the baseline.
    pub fn changed(&self) -> bool {
        !matches!(self, ReportOutcome::Unchanged)
    }
}

/// Phase that generates each configured API report and reconciles it with
/// the checked-in baseline.
pub struct ReportPhase;

impl<T: Toolchain> Phase<T> for ReportPhase {
    fn name(&self) -> &'static str {
        "report"
    }

    fn description(&self) -> &'static str {
        "Reconcile API reports against their baselines"
    }

    fn enabled(&self, config: &ExtractorConfig) -> bool {
        config.api_report_enabled()
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let config = ctx.config;
        for report in config.report_configs() {
            let outcome = reconcile_report(ctx, report)?;
            debug!(report = %report.file_name, ?outcome, "reconciled API report");
            ctx.api_report_changed |= outcome.changed();
        }
        Ok(())
    }
}

/// Generate one report, stage it, and compare it with the baseline.
///
/// A local build writes drift back to the baseline. Other builds only warn,
/// so the change has to be committed deliberately.
#[instrument(skip_all, fields(report = %report.file_name))]
pub fn reconcile_report<T: Toolchain>(
    ctx: &mut InvocationContext<'_, T>,
    report: &ReportConfig,
) -> Result<ReportOutcome> {
    let config = ctx.config;
    let toolchain = ctx.toolchain;
    let local_build = ctx.flags.local_build;
    let write_options = WriteOptions::with_newline(config.newline_kind());

    let actual_path = config.report_temp_file_path(report);
    let actual_short_path = config.short_file_path(&actual_path);
    let expected_path = config.report_file_path(report);
    let expected_short_path = config.short_file_path(&expected_path);

    let actual = {
        let (collection, router) = ctx.collection_and_router()?;
        toolchain.generate_report(collection, report, router)?
    };
    write_text_file(&actual_path, &actual, &write_options)
        .wrap_err_with(|| format!("Unable to write the API report {}", actual_path.display()))?;

    let router = &mut ctx.router;

    if expected_path.is_file() {
        let expected = read_text_file(&expected_path)?;
        if toolchain.reports_equivalent(&actual, &expected) {
            router.log_verbose(
                ConsoleMessageId::ApiReportUnchanged,
                format!("The API report is up to date: {actual_short_path}"),
            );
            return Ok(ReportOutcome::Unchanged);
        }

        if local_build {
            router.log_warning(
                ConsoleMessageId::ApiReportCopied,
                format!(
                    "You have changed the public API signature for this project. Updating {expected_short_path}"
                ),
            );
            write_text_file(&expected_path, &actual, &write_options)
                .wrap_err_with(|| format!("Unable to update the API report {}", expected_path.display()))?;
            return Ok(ReportOutcome::Updated);
        }

        router.log_warning(
            ConsoleMessageId::ApiReportNotCopied,
            format!(
                "You have changed the public API signature for this project. Please copy the file \
                 \"{actual_short_path}\" to \"{expected_short_path}\", or perform a local build (which \
                 does this automatically). See the Git repo documentation for more info."
            ),
        );
        return Ok(ReportOutcome::NotUpdated);
    }

    if !local_build {
        router.log_warning(
            ConsoleMessageId::ApiReportNotCopied,
            format!(
                "The API report file is missing. Please copy the file \"{actual_short_path}\" to \
                 \"{expected_short_path}\", or perform a local build (which does this automatically). \
                 See the Git repo documentation for more info."
            ),
        );
        return Ok(ReportOutcome::NotUpdated);
    }

    // The baseline folder is never created here.
    let expected_folder = config.report_folder();
    if !expected_folder.is_dir() {
        router.log_error(
            ConsoleMessageId::ApiReportFolderMissing,
            format!(
                "Unable to create the API report file. Please make sure the target folder exists:\n{}",
                expected_folder.display()
            ),
        );
        return Ok(ReportOutcome::CreateFailed);
    }

    write_text_file(&expected_path, &actual, &write_options.without_creating_folders())
        .wrap_err_with(|| format!("Unable to create the API report {}", expected_path.display()))?;
    router.log_warning(
        ConsoleMessageId::ApiReportCreated,
        format!(
            "The API report file was missing, so a new file was created. Please add this file to Git:\n{}",
            expected_path.display()
        ),
    );
    Ok(ReportOutcome::Created)
}
