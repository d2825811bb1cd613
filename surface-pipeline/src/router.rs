//! Routing of messages to the caller's callback and the console.

use std::{collections::HashMap, fmt, path::PathBuf};

use apisurface_config::{DEFAULT_RULE_KEY, MessageRule, MessageTable, MessagesConfig};
use apisurface_core::LogLevel;

use crate::{
    ConsoleMessageId,
    message::{
        CompilerDiagnostic, DiagnosticCategory, ExtractorMessage, MessageCategory,
        MessageProperties, SourceLocation,
    },
};

/// Receives every message before default display.
pub type MessageCallback = Box<dyn FnMut(&mut ExtractorMessage) + Send>;

/// Frames the sections printed in diagnostics mode.
pub const DIAGNOSTICS_LINE: &str = "============================================================";

/// Collects messages during analysis and decides how each is reported.
///
/// Non-console messages are held until [`handle_remaining_non_console_messages`]
/// so the report generator can claim the ones configured with
/// `addToApiReportFile`. Console messages are dispatched immediately.
///
/// [`handle_remaining_non_console_messages`]: MessageRouter::handle_remaining_non_console_messages
pub struct MessageRouter {
    working_package_folder: Option<PathBuf>,
    callback: Option<MessageCallback>,
    messages: Vec<ExtractorMessage>,
    /// Indices into `messages`, per declaration key.
    associated: HashMap<String, Vec<usize>>,
    rules_by_id: HashMap<String, MessageRule>,
    compiler_default: MessageRule,
    extractor_default: MessageRule,
    tsdoc_default: MessageRule,
    error_count: usize,
    warning_count: usize,
    show_verbose_messages: bool,
    show_diagnostics: bool,
}

impl MessageRouter {
    /// A router applying the reporting rules of `config`.
    ///
    /// The tables are expected to have passed [`MessagesConfig::validate`].
    pub fn new(config: &MessagesConfig) -> Self {
        let mut router = Self {
            working_package_folder: None,
            callback: None,
            messages: Vec::new(),
            associated: HashMap::new(),
            rules_by_id: HashMap::new(),
            compiler_default: MessageRule::default(),
            extractor_default: MessageRule::default(),
            tsdoc_default: MessageRule::default(),
            error_count: 0,
            warning_count: 0,
            show_verbose_messages: false,
            show_diagnostics: false,
        };
        router.compiler_default = router.apply_table(&config.compiler_message_reporting);
        router.extractor_default = router.apply_table(&config.extractor_message_reporting);
        router.tsdoc_default = router.apply_table(&config.tsdoc_message_reporting);
        router
    }

    /// Store the per-id rules of `table` and return its default rule.
    fn apply_table(&mut self, table: &MessageTable) -> MessageRule {
        let mut default = MessageRule::default();
        for (message_id, rule) in table {
            if message_id == DEFAULT_RULE_KEY {
                default = *rule;
            } else {
                self.rules_by_id.insert(message_id.clone(), *rule);
            }
        }
        default
    }

    /// Locations under this folder are shown relative to it.
    pub fn with_working_package_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.working_package_folder = folder;
        self
    }

    pub fn with_callback(mut self, callback: Option<MessageCallback>) -> Self {
        self.callback = callback;
        self
    }

    /// Diagnostics mode implies verbose output.
    pub fn with_display(mut self, show_verbose_messages: bool, show_diagnostics: bool) -> Self {
        self.show_verbose_messages = show_verbose_messages || show_diagnostics;
        self.show_diagnostics = show_diagnostics;
        self
    }

    pub fn show_verbose_messages(&self) -> bool {
        self.show_verbose_messages
    }

    pub fn show_diagnostics(&self) -> bool {
        self.show_diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Every non-console message collected so far.
    pub fn messages(&self) -> &[ExtractorMessage] {
        &self.messages
    }

    /// Record an engine diagnostic. Suggestions and plain messages are ignored.
    pub fn add_compiler_diagnostic(&mut self, diagnostic: CompilerDiagnostic) {
        if matches!(
            diagnostic.category,
            DiagnosticCategory::Suggestion | DiagnosticCategory::Message
        ) {
            return;
        }

        let mut message = ExtractorMessage::new(
            MessageCategory::Compiler,
            format!("TS{}", diagnostic.code),
            diagnostic.text,
        );
        if let Some(location) = diagnostic.location {
            message = message.with_location(location);
        }
        self.messages.push(message);
    }

    /// Record an analysis finding about the declaration identified by
    /// `declaration`.
    pub fn add_analyzer_issue(
        &mut self,
        message_id: &str,
        text: impl Into<String>,
        location: SourceLocation,
        declaration: &str,
        properties: MessageProperties,
    ) {
        let index = self.push_analyzer_issue(message_id, text, location, properties);
        self.associate(index, declaration);
    }

    /// Record an analysis finding that is not tied to a declaration.
    pub fn add_analyzer_issue_for_position(
        &mut self,
        message_id: &str,
        text: impl Into<String>,
        location: SourceLocation,
        properties: MessageProperties,
    ) {
        self.push_analyzer_issue(message_id, text, location, properties);
    }

    fn push_analyzer_issue(
        &mut self,
        message_id: &str,
        text: impl Into<String>,
        location: SourceLocation,
        properties: MessageProperties,
    ) -> usize {
        let message = ExtractorMessage::new(MessageCategory::Extractor, message_id, text)
            .with_location(location)
            .with_properties(properties);
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Record a doc-comment parser message.
    pub fn add_tsdoc_message(
        &mut self,
        message_id: &str,
        text: impl Into<String>,
        location: SourceLocation,
        declaration: Option<&str>,
    ) {
        let message = ExtractorMessage::new(MessageCategory::Tsdoc, message_id, text).with_location(location);
        self.messages.push(message);
        if let Some(declaration) = declaration {
            self.associate(self.messages.len() - 1, declaration);
        }
    }

    fn associate(&mut self, index: usize, declaration: &str) {
        self.associated
            .entry(declaration.to_string())
            .or_default()
            .push(index);
    }

    /// Claim the messages about `declaration` that belong in the API report.
    ///
    /// Claimed messages are marked handled and will not be displayed or
    /// counted later.
    pub fn fetch_associated_messages_for_review_file(&mut self, declaration: &str) -> Vec<ExtractorMessage> {
        let indices = self.associated.get(declaration).cloned().unwrap_or_default();
        self.claim_for_review_file(indices)
    }

    /// Claim every remaining message that belongs in the API report.
    pub fn fetch_unassociated_messages_for_review_file(&mut self) -> Vec<ExtractorMessage> {
        let indices = (0..self.messages.len()).collect();
        self.claim_for_review_file(indices)
    }

    fn claim_for_review_file(&mut self, indices: Vec<usize>) -> Vec<ExtractorMessage> {
        let mut claimed = Vec::new();
        for index in indices {
            let rule = self.rule_for(&self.messages[index]);
            let message = &mut self.messages[index];
            if !message.handled() && rule.add_to_api_report_file {
                message.mark_handled();
                claimed.push(message.clone());
            }
        }
        sort_for_output(&mut claimed);
        claimed
    }

    /// Display and count every message nobody has handled yet, sorted by
    /// file, line and id.
    pub fn handle_remaining_non_console_messages(&mut self) {
        let mut pending: Vec<usize> = (0..self.messages.len())
            .filter(|&index| !self.messages[index].handled())
            .collect();
        pending.sort_by(|&a, &b| compare_for_output(&self.messages[a], &self.messages[b]));

        for index in pending {
            let mut message = self.messages[index].clone();
            self.handle_message(&mut message);
            self.messages[index] = message;
        }
    }

    pub fn log_error(&mut self, message_id: ConsoleMessageId, text: impl Into<String>) {
        self.log(message_id, text, LogLevel::Error);
    }

    pub fn log_warning(&mut self, message_id: ConsoleMessageId, text: impl Into<String>) {
        self.log(message_id, text, LogLevel::Warning);
    }

    pub fn log_info(&mut self, message_id: ConsoleMessageId, text: impl Into<String>) {
        self.log(message_id, text, LogLevel::Info);
    }

    pub fn log_verbose(&mut self, message_id: ConsoleMessageId, text: impl Into<String>) {
        self.log(message_id, text, LogLevel::Verbose);
    }

    fn log(&mut self, message_id: ConsoleMessageId, text: impl Into<String>, level: LogLevel) {
        let mut message =
            ExtractorMessage::new(MessageCategory::Console, message_id.as_str(), text).with_log_level(level);
        self.handle_message(&mut message);
    }

    pub fn log_diagnostic_header(&mut self, title: &str) {
        self.log_diagnostic(DIAGNOSTICS_LINE);
        self.log_diagnostic(&format!("DIAGNOSTIC: {title}"));
        self.log_diagnostic(DIAGNOSTICS_LINE);
    }

    pub fn log_diagnostic_footer(&mut self) {
        self.log_diagnostic(&format!("{DIAGNOSTICS_LINE}\n"));
    }

    /// Verbose output shown only in diagnostics mode.
    pub fn log_diagnostic(&mut self, text: &str) {
        if self.show_diagnostics {
            self.log_verbose(ConsoleMessageId::Diagnostics, text);
        }
    }

    fn rule_for(&self, message: &ExtractorMessage) -> MessageRule {
        if let Some(rule) = self.rules_by_id.get(message.message_id()) {
            return *rule;
        }
        match message.category() {
            MessageCategory::Compiler => self.compiler_default,
            MessageCategory::Extractor => self.extractor_default,
            MessageCategory::Tsdoc => self.tsdoc_default,
            MessageCategory::Console => MessageRule::default(),
        }
    }

    fn handle_message(&mut self, message: &mut ExtractorMessage) {
        if message.handled() {
            return;
        }

        // Console messages carry their level from the log_* call.
        if message.category() != MessageCategory::Console {
            let rule = self.rule_for(message);
            message.set_log_level(rule.log_level);
        }

        if let Some(callback) = self.callback.as_mut() {
            callback(message);
        }

        match message.log_level() {
            LogLevel::Error => self.error_count += 1,
            LogLevel::Warning => self.warning_count += 1,
            _ => {}
        }

        if message.handled() {
            return;
        }
        message.mark_handled();

        let text = if message.category() == MessageCategory::Console {
            message.text().to_string()
        } else {
            message.format_with_location(self.working_package_folder.as_deref())
        };

        match message.log_level() {
            LogLevel::Error => eprintln!("Error: {text}"),
            LogLevel::Warning => eprintln!("Warning: {text}"),
            LogLevel::Info => println!("{text}"),
            LogLevel::Verbose => {
                if self.show_verbose_messages {
                    println!("{text}");
                }
            }
            LogLevel::None => {}
        }
    }
}

impl fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRouter")
            .field("messages", &self.messages.len())
            .field("error_count", &self.error_count)
            .field("warning_count", &self.warning_count)
            .field("show_verbose_messages", &self.show_verbose_messages)
            .field("show_diagnostics", &self.show_diagnostics)
            .finish_non_exhaustive()
    }
}

fn compare_for_output(a: &ExtractorMessage, b: &ExtractorMessage) -> std::cmp::Ordering {
    let file = |m: &ExtractorMessage| m.location().map(|l| l.file_path.clone());
    let line = |m: &ExtractorMessage| m.location().and_then(|l| l.line);
    file(a)
        .cmp(&file(b))
        .then_with(|| line(a).cmp(&line(b)))
        .then_with(|| a.message_id().cmp(b.message_id()))
}

fn sort_for_output(messages: &mut [ExtractorMessage]) {
    messages.sort_by(compare_for_output);
}
