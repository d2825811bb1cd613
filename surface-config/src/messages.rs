use apisurface_core::LogLevel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::validate::is_compiler_message_id;

/// Every message id the extractor itself can report.
pub const EXTRACTOR_MESSAGE_IDS: &[&str] = &[
    "ae-extra-release-tag",
    "ae-undocumented",
    "ae-different-release-tags",
    "ae-incompatible-release-tags",
    "ae-missing-release-tag",
    "ae-misplaced-package-tag",
    "ae-forgotten-export",
    "ae-internal-missing-underscore",
    "ae-internal-mixed-release-tag",
    "ae-preapproved-unsupported-type",
    "ae-preapproved-bad-release-tag",
    "ae-unresolved-inheritdoc-reference",
    "ae-unresolved-inheritdoc-base",
    "ae-cyclic-inherit-doc",
    "ae-unresolved-link",
    "ae-setter-with-docs",
    "ae-missing-getter",
    "ae-wrong-input-file-type",
];

/// Key that applies to every message not listed explicitly.
pub const DEFAULT_RULE_KEY: &str = "default";

pub fn is_known_extractor_message_id(id: &str) -> bool {
    EXTRACTOR_MESSAGE_IDS.contains(&id)
}

/// How a single message id is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MessageRule {
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub add_to_api_report_file: bool,
}

/// Message id to rule, in document order.
pub type MessageTable = IndexMap<String, MessageRule>;

/// The `messages` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MessagesConfig {
    #[serde(default)]
    pub compiler_message_reporting: MessageTable,
    #[serde(default)]
    pub extractor_message_reporting: MessageTable,
    #[serde(default)]
    pub tsdoc_message_reporting: MessageTable,
}

impl MessagesConfig {
    /// Check every key of the three routing tables.
    ///
    /// Returns the first problem found as a human-readable message.
    pub fn validate(&self) -> Result<(), String> {
        for id in self.compiler_message_reporting.keys() {
            if id != DEFAULT_RULE_KEY && !is_compiler_message_id(id) {
                return Err(format!(
                    "The messages.compilerMessageReporting table contains an invalid entry \"{id}\". \
                     The identifier format is \"TS\" followed by an integer."
                ));
            }
        }

        for id in self.extractor_message_reporting.keys() {
            if id == DEFAULT_RULE_KEY {
                continue;
            }
            if !id.starts_with("ae-") {
                return Err(format!(
                    "The messages.extractorMessageReporting table contains an invalid entry \"{id}\". \
                     The name should begin with the \"ae-\" prefix."
                ));
            }
            if !is_known_extractor_message_id(id) {
                return Err(format!(
                    "The messages.extractorMessageReporting table contains an unrecognized identifier \"{id}\". \
                     Is it spelled correctly?"
                ));
            }
        }

        for id in self.tsdoc_message_reporting.keys() {
            if id != DEFAULT_RULE_KEY && !id.starts_with("tsdoc-") {
                return Err(format!(
                    "The messages.tsdocMessageReporting table contains an invalid entry \"{id}\". \
                     The identifier format is \"tsdoc-\" followed by the name of a TSDoc message."
                ));
            }
        }

        Ok(())
    }
}
