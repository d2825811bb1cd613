use std::fmt;

/// Identifiers of the progress messages the pipeline logs itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleMessageId {
    /// "Analysis will use the bundled engine version ..."
    Preamble,
    /// The project depends on a newer engine than the bundled one.
    CompilerVersionNotice,
    /// Output of diagnostics mode.
    Diagnostics,
    ApiReportUnchanged,
    /// A local build overwrote the API report.
    ApiReportCopied,
    /// A CI build found a changed or missing API report.
    ApiReportNotCopied,
    ApiReportCreated,
    ApiReportFolderMissing,
    WritingDocModelFile,
    WritingDtsRollup,
    UsingCustomTsdocConfig,
}

impl ConsoleMessageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleMessageId::Preamble => "console-preamble",
            ConsoleMessageId::CompilerVersionNotice => "console-compiler-version-notice",
            ConsoleMessageId::Diagnostics => "console-diagnostics",
            ConsoleMessageId::ApiReportUnchanged => "console-api-report-unchanged",
            ConsoleMessageId::ApiReportCopied => "console-api-report-copied",
            ConsoleMessageId::ApiReportNotCopied => "console-api-report-not-copied",
            ConsoleMessageId::ApiReportCreated => "console-api-report-created",
            ConsoleMessageId::ApiReportFolderMissing => "console-api-report-folder-missing",
            ConsoleMessageId::WritingDocModelFile => "console-writing-doc-model-file",
            ConsoleMessageId::WritingDtsRollup => "console-writing-dts-rollup",
            ConsoleMessageId::UsingCustomTsdocConfig => "console-using-custom-tsdoc-config",
        }
    }
}

impl fmt::Display for ConsoleMessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
