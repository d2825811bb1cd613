//! Loading and preparation of `api-surface.json`.
//!
//! Configuration is handled in two steps. [`ConfigLoader::load_file`] reads a
//! document, follows its `extends` chain, merges the built-in defaults
//! underneath and validates the result, producing a loosely typed
//! `serde_json::Value` that callers may still adjust. [`ExtractorConfig::prepare`]
//! then substitutes tokens, checks every setting and freezes the result.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod defaults;
mod error;
mod extractor_config;
mod file;
mod load;
mod merge;
mod messages;
mod prepare;
mod report;
mod schema;
pub mod tokens;
mod tsdoc;
mod validate;

pub use defaults::DefaultConfig;
pub use error::{Error, PrepareContext, Result, SourceContext, Stage};
pub use extractor_config::{EntryPoint, ExtractorConfig};
pub use file::{
    AdditionalEntryPoint, ApiReportSection, CompilerSection, ConfigFile, DocModelSection,
    DtsRollupSection, EnumMemberOrder, TsdocMetadataSection,
};
pub use load::{CONFIG_FILENAME, ConfigLoader};
pub use merge::merge_overwriting_arrays;
pub use messages::{
    DEFAULT_RULE_KEY, EXTRACTOR_MESSAGE_IDS, MessageRule, MessageTable, MessagesConfig,
    is_known_extractor_message_id,
};
pub use prepare::{PrepareOptions, TSCONFIG_FILENAME};
pub use report::{
    DEFAULT_TAGS_TO_REPORT, REPORT_FILE_SUFFIX, ReportConfig, ReportVariant, report_file_name,
};
pub use schema::{BuiltinSchema, SchemaValidator};
pub use tsdoc::{
    TSDOC_CONFIG_FILENAME, TSDOC_METADATA_FILENAME, TagDefinition, TagSyntaxKind, TsdocConfig,
    resolve_tsdoc_metadata_path,
};
pub use validate::is_valid_tag_name;
