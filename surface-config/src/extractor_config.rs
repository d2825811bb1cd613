use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use apisurface_core::{
    NewlineKind, PackageJson, ReleaseTag,
    path::{relative_to, to_slashes},
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    file::EnumMemberOrder,
    messages::MessagesConfig,
    report::ReportConfig,
    tsdoc::TsdocConfig,
};

/// A declaration file from which exported symbols are enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    /// Import sub-path; empty for the package's main entry point.
    pub module_path: String,
    /// Absolute path to the declaration file.
    pub file_path: PathBuf,
}

/// Fully resolved, immutable extractor configuration.
///
/// Built by [`ExtractorConfig::prepare`]; every path is absolute and every
/// token has been substituted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorConfig {
    pub(crate) config_file_path: Option<PathBuf>,
    pub(crate) project_folder: PathBuf,
    #[serde(skip)]
    pub(crate) package_json: Option<PackageJson>,
    pub(crate) package_folder: Option<PathBuf>,
    pub(crate) main_entry_point: EntryPoint,
    pub(crate) additional_entry_points: Vec<EntryPoint>,
    pub(crate) bundled_packages: Vec<String>,
    pub(crate) tsconfig_file_path: Option<PathBuf>,
    pub(crate) override_tsconfig: Option<Map<String, Value>>,
    pub(crate) skip_lib_check: bool,

    pub(crate) api_report_enabled: bool,
    pub(crate) report_configs: Vec<ReportConfig>,
    pub(crate) report_folder: PathBuf,
    pub(crate) report_temp_folder: PathBuf,
    pub(crate) api_report_include_forgotten_exports: bool,
    pub(crate) tags_to_report: IndexMap<String, bool>,

    pub(crate) doc_model_enabled: bool,
    pub(crate) api_json_file_path: Option<PathBuf>,
    pub(crate) doc_model_include_forgotten_exports: bool,
    pub(crate) project_folder_url: Option<String>,
    pub(crate) release_tags_to_trim: BTreeSet<ReleaseTag>,

    pub(crate) rollup_enabled: bool,
    pub(crate) untrimmed_file_path: Option<PathBuf>,
    pub(crate) alpha_trimmed_file_path: Option<PathBuf>,
    pub(crate) beta_trimmed_file_path: Option<PathBuf>,
    pub(crate) public_trimmed_file_path: Option<PathBuf>,
    pub(crate) omit_trimming_comments: bool,

    pub(crate) tsdoc_metadata_enabled: bool,
    pub(crate) tsdoc_metadata_file_path: Option<PathBuf>,

    pub(crate) messages: MessagesConfig,
    pub(crate) newline_kind: NewlineKind,
    pub(crate) test_mode: bool,
    pub(crate) enum_member_order: EnumMemberOrder,
    pub(crate) tsdoc_config: TsdocConfig,
}

impl ExtractorConfig {
    /// The file this configuration was loaded from, if any.
    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    pub fn project_folder(&self) -> &Path {
        &self.project_folder
    }

    pub fn package_json(&self) -> Option<&PackageJson> {
        self.package_json.as_ref()
    }

    pub fn package_folder(&self) -> Option<&Path> {
        self.package_folder.as_deref()
    }

    pub fn main_entry_point(&self) -> &EntryPoint {
        &self.main_entry_point
    }

    pub fn additional_entry_points(&self) -> &[EntryPoint] {
        &self.additional_entry_points
    }

    /// The main entry point followed by the additional ones.
    pub fn entry_points(&self) -> impl Iterator<Item = &EntryPoint> {
        std::iter::once(&self.main_entry_point).chain(&self.additional_entry_points)
    }

    pub fn bundled_packages(&self) -> &[String] {
        &self.bundled_packages
    }

    pub fn tsconfig_file_path(&self) -> Option<&Path> {
        self.tsconfig_file_path.as_deref()
    }

    pub fn override_tsconfig(&self) -> Option<&Map<String, Value>> {
        self.override_tsconfig.as_ref()
    }

    pub fn skip_lib_check(&self) -> bool {
        self.skip_lib_check
    }

    pub fn api_report_enabled(&self) -> bool {
        self.api_report_enabled
    }

    pub fn report_configs(&self) -> &[ReportConfig] {
        &self.report_configs
    }

    pub fn report_folder(&self) -> &Path {
        &self.report_folder
    }

    pub fn report_temp_folder(&self) -> &Path {
        &self.report_temp_folder
    }

    /// Path of the checked-in report for `report`.
    pub fn report_file_path(&self, report: &ReportConfig) -> PathBuf {
        self.report_folder.join(&report.file_name)
    }

    /// Path the freshly generated report for `report` is staged at.
    pub fn report_temp_file_path(&self, report: &ReportConfig) -> PathBuf {
        self.report_temp_folder.join(&report.file_name)
    }

    pub fn api_report_include_forgotten_exports(&self) -> bool {
        self.api_report_include_forgotten_exports
    }

    pub fn tags_to_report(&self) -> &IndexMap<String, bool> {
        &self.tags_to_report
    }

    pub fn doc_model_enabled(&self) -> bool {
        self.doc_model_enabled
    }

    pub fn api_json_file_path(&self) -> Option<&Path> {
        self.api_json_file_path.as_deref()
    }

    pub fn doc_model_include_forgotten_exports(&self) -> bool {
        self.doc_model_include_forgotten_exports
    }

    pub fn project_folder_url(&self) -> Option<&str> {
        self.project_folder_url.as_deref()
    }

    pub fn release_tags_to_trim(&self) -> &BTreeSet<ReleaseTag> {
        &self.release_tags_to_trim
    }

    pub fn rollup_enabled(&self) -> bool {
        self.rollup_enabled
    }

    pub fn untrimmed_file_path(&self) -> Option<&Path> {
        self.untrimmed_file_path.as_deref()
    }

    pub fn alpha_trimmed_file_path(&self) -> Option<&Path> {
        self.alpha_trimmed_file_path.as_deref()
    }

    pub fn beta_trimmed_file_path(&self) -> Option<&Path> {
        self.beta_trimmed_file_path.as_deref()
    }

    pub fn public_trimmed_file_path(&self) -> Option<&Path> {
        self.public_trimmed_file_path.as_deref()
    }

    pub fn omit_trimming_comments(&self) -> bool {
        self.omit_trimming_comments
    }

    pub fn tsdoc_metadata_enabled(&self) -> bool {
        self.tsdoc_metadata_enabled
    }

    pub fn tsdoc_metadata_file_path(&self) -> Option<&Path> {
        self.tsdoc_metadata_file_path.as_deref()
    }

    pub fn messages(&self) -> &MessagesConfig {
        &self.messages
    }

    pub fn newline_kind(&self) -> NewlineKind {
        self.newline_kind
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn enum_member_order(&self) -> EnumMemberOrder {
        self.enum_member_order
    }

    pub fn tsdoc_config(&self) -> &TsdocConfig {
        &self.tsdoc_config
    }

    /// Pretty JSON of the resolved configuration, for troubleshooting.
    pub fn diagnostic_dump(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unable to serialize: {e}>"))
    }

    /// `path` relative to the project folder with forward slashes, or
    /// unchanged if it lies elsewhere.
    pub fn short_file_path(&self, path: &Path) -> String {
        match relative_to(path, &self.project_folder) {
            Some(relative) if !relative.as_os_str().is_empty() => to_slashes(&relative),
            _ => path.display().to_string(),
        }
    }
}
