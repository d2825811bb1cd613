use apisurface_core::NewlineKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{messages::MessagesConfig, report::ReportVariant};

/// Typed view of an `api-surface.json` document.
///
/// Produced only by schema validation; loading and merging work on the raw
/// `serde_json::Value` because folder context and partial documents do not
/// fit a typed shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default)]
    pub project_folder: Option<String>,
    #[serde(default)]
    pub main_entry_point_file_path: Option<String>,
    #[serde(default)]
    pub additional_entry_points: Vec<AdditionalEntryPoint>,
    #[serde(default)]
    pub bundled_packages: Vec<String>,
    #[serde(default)]
    pub compiler: Option<CompilerSection>,
    #[serde(default)]
    pub api_report: Option<ApiReportSection>,
    #[serde(default)]
    pub doc_model: Option<DocModelSection>,
    #[serde(default)]
    pub dts_rollup: Option<DtsRollupSection>,
    #[serde(default)]
    pub tsdoc_metadata: Option<TsdocMetadataSection>,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub newline_kind: Option<NewlineKind>,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub enum_member_order: Option<EnumMemberOrder>,
}

/// An extra entry point exposed under a sub-path of the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdditionalEntryPoint {
    pub module_path: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerSection {
    #[serde(default)]
    pub tsconfig_file_path: Option<String>,
    #[serde(default)]
    pub override_tsconfig: Option<Map<String, Value>>,
    #[serde(default)]
    pub skip_lib_check: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiReportSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub report_file_name: Option<String>,
    #[serde(default)]
    pub report_folder: Option<String>,
    #[serde(default)]
    pub report_temp_folder: Option<String>,
    #[serde(default)]
    pub report_variants: Option<Vec<ReportVariant>>,
    #[serde(default)]
    pub include_forgotten_exports: bool,
    #[serde(default)]
    pub tags_to_report: IndexMap<String, bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocModelSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_json_file_path: Option<String>,
    #[serde(default)]
    pub include_forgotten_exports: bool,
    #[serde(default)]
    pub project_folder_url: Option<String>,
    #[serde(default)]
    pub release_tags_to_trim: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DtsRollupSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub untrimmed_file_path: Option<String>,
    #[serde(default)]
    pub alpha_trimmed_file_path: Option<String>,
    #[serde(default)]
    pub beta_trimmed_file_path: Option<String>,
    #[serde(default)]
    pub public_trimmed_file_path: Option<String>,
    #[serde(default)]
    pub omit_trimming_comments: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TsdocMetadataSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub tsdoc_metadata_file_path: Option<String>,
}

/// Order in which enum members are listed in generated artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumMemberOrder {
    #[default]
    ByName,
    Preserve,
}
