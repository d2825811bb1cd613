//! Messages produced while analyzing a project.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use apisurface_core::{
    LogLevel,
    path::{relative_to, to_slashes},
};
use serde::Serialize;

/// Where a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    /// A diagnostic from the analysis engine, id `TS<code>`.
    Compiler,
    /// Progress output from the pipeline itself, id `console-*`.
    Console,
    /// A finding from analysis, id `ae-*`.
    Extractor,
    /// A doc-comment parser finding, id `tsdoc-*`.
    Tsdoc,
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageCategory::Compiler => write!(f, "compiler"),
            MessageCategory::Console => write!(f, "console"),
            MessageCategory::Extractor => write!(f, "extractor"),
            MessageCategory::Tsdoc => write!(f, "tsdoc"),
        }
    }
}

/// A position in a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file_path: PathBuf,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// `path:line:column`, with the path relative to `working_folder` when it
    /// lies inside it.
    pub fn format(&self, working_folder: Option<&Path>) -> String {
        let mut result = working_folder
            .and_then(|folder| relative_to(&self.file_path, folder))
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(|relative| to_slashes(&relative))
            .unwrap_or_else(|| self.file_path.display().to_string());

        if let Some(line) = self.line {
            result.push_str(&format!(":{line}"));
            if let Some(column) = self.column {
                result.push_str(&format!(":{column}"));
            }
        }
        result
    }
}

/// Extra structured data attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageProperties {
    /// The exported name the message is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("Once a message has been marked as handled, the \"handled\" property cannot be set to false")]
pub struct HandledReset;

/// A message routed to the caller's callback and the console.
///
/// A message callback may change the log level or mark the message handled to
/// suppress default display. Handling is one-way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorMessage {
    category: MessageCategory,
    message_id: String,
    text: String,
    location: Option<SourceLocation>,
    properties: MessageProperties,
    log_level: LogLevel,
    handled: bool,
}

impl ExtractorMessage {
    pub fn new(category: MessageCategory, message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category,
            message_id: message_id.into(),
            text: text.into(),
            location: None,
            properties: MessageProperties::default(),
            log_level: LogLevel::None,
            handled: false,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_properties(mut self, properties: MessageProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn category(&self) -> MessageCategory {
        self.category
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub fn properties(&self) -> &MessageProperties {
        &self.properties
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn handled(&self) -> bool {
        self.handled
    }

    /// Mark the message handled, or fail when trying to clear the flag.
    pub fn set_handled(&mut self, handled: bool) -> Result<(), HandledReset> {
        if self.handled && !handled {
            return Err(HandledReset);
        }
        self.handled = handled;
        Ok(())
    }

    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    /// `(<id>) <text>`
    pub fn format_without_location(&self) -> String {
        format!("({}) {}", self.message_id, self.text)
    }

    /// `<file>:<line>:<column> - (<id>) <text>`
    pub fn format_with_location(&self, working_folder: Option<&Path>) -> String {
        match &self.location {
            Some(location) => format!(
                "{} - {}",
                location.format(working_folder),
                self.format_without_location()
            ),
            None => self.format_without_location(),
        }
    }
}

/// Severity of an engine diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
    Message,
}

/// A diagnostic reported by the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub text: String,
    pub location: Option<SourceLocation>,
}
