use std::fmt;

use apisurface_core::ReleaseTag;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::validate::validate_tag_name;

/// Suffix shared by every API report file.
pub const REPORT_FILE_SUFFIX: &str = ".api.md";

/// Which slice of the API surface a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportVariant {
    Public,
    Beta,
    Alpha,
    /// Everything, including untagged and `@internal` items.
    Complete,
}

impl ReportVariant {
    /// Least public release tag an item needs to appear in this report.
    pub fn minimum_release_tag(&self) -> ReleaseTag {
        match self {
            ReportVariant::Public => ReleaseTag::Public,
            ReportVariant::Beta => ReleaseTag::Beta,
            ReportVariant::Alpha => ReleaseTag::Alpha,
            ReportVariant::Complete => ReleaseTag::None,
        }
    }
}

impl fmt::Display for ReportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportVariant::Public => write!(f, "public"),
            ReportVariant::Beta => write!(f, "beta"),
            ReportVariant::Alpha => write!(f, "alpha"),
            ReportVariant::Complete => write!(f, "complete"),
        }
    }
}

/// One report to produce: the variant and the bare file name it is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    pub variant: ReportVariant,
    pub file_name: String,
}

impl ReportConfig {
    pub fn new(base_name: &str, variant: ReportVariant) -> Self {
        Self {
            variant,
            file_name: report_file_name(base_name, variant),
        }
    }
}

/// `<base>.api.md` for the complete variant, `<base>.<variant>.api.md` otherwise.
pub fn report_file_name(base_name: &str, variant: ReportVariant) -> String {
    match variant {
        ReportVariant::Complete => format!("{base_name}{REPORT_FILE_SUFFIX}"),
        other => format!("{base_name}.{other}{REPORT_FILE_SUFFIX}"),
    }
}

/// Tags reported out of the box, before user overrides are applied.
pub const DEFAULT_TAGS_TO_REPORT: &[(&str, bool)] = &[
    ("@sealed", true),
    ("@virtual", true),
    ("@override", true),
    ("@eventProperty", true),
    ("@deprecated", true),
];

/// Built-in tag table overlaid with `overrides`.
pub fn tags_to_report_with_defaults(overrides: &IndexMap<String, bool>) -> IndexMap<String, bool> {
    let mut tags: IndexMap<String, bool> = DEFAULT_TAGS_TO_REPORT
        .iter()
        .map(|(name, enabled)| (name.to_string(), *enabled))
        .collect();
    for (name, enabled) in overrides {
        tags.insert(name.clone(), *enabled);
    }
    tags
}

/// Collect every problem with the configured `tagsToReport` keys.
pub fn validate_tags_to_report(tags: &IndexMap<String, bool>) -> Vec<String> {
    let mut violations = Vec::new();
    for name in tags.keys() {
        if ReleaseTag::is_reserved_tag_name(name) {
            violations.push(format!(
                "\"{name}\" is a release tag; release tags are always reported and may not be specified"
            ));
        }
        if let Some(reason) = validate_tag_name(name) {
            violations.push(format!("\"{name}\" is not a valid tag name: {reason}"));
        }
    }
    violations
}
