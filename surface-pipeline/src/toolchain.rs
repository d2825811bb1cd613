//! The external collaborators the pipeline drives.

use std::{fmt, path::Path};

use apisurface_config::{ExtractorConfig, ReportConfig};
use apisurface_core::ReleaseTag;
use apisurface_host::{AnalysisEngine, AnalysisState};
use eyre::Result;
use serde_json::{Map, Value};

use crate::MessageRouter;

/// A trimmed declaration rollup, from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollupTier {
    Public,
    Beta,
    Alpha,
    /// Everything, with no trimming.
    Untrimmed,
}

impl RollupTier {
    /// The order rollups are generated in.
    pub const ALL: [RollupTier; 4] = [
        RollupTier::Public,
        RollupTier::Beta,
        RollupTier::Alpha,
        RollupTier::Untrimmed,
    ];

    /// Least public release tag an item needs to stay in this rollup.
    pub fn minimum_release_tag(&self) -> ReleaseTag {
        match self {
            RollupTier::Public => ReleaseTag::Public,
            RollupTier::Beta => ReleaseTag::Beta,
            RollupTier::Alpha => ReleaseTag::Alpha,
            RollupTier::Untrimmed => ReleaseTag::None,
        }
    }

    /// Where `config` wants this tier written, if anywhere.
    pub fn output_path(self, config: &ExtractorConfig) -> Option<&Path> {
        let path = match self {
            RollupTier::Public => config.public_trimmed_file_path(),
            RollupTier::Beta => config.beta_trimmed_file_path(),
            RollupTier::Alpha => config.alpha_trimmed_file_path(),
            RollupTier::Untrimmed => config.untrimmed_file_path(),
        };
        path.filter(|path| !path.as_os_str().is_empty())
    }
}

impl fmt::Display for RollupTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollupTier::Public => write!(f, "public"),
            RollupTier::Beta => write!(f, "beta"),
            RollupTier::Alpha => write!(f, "alpha"),
            RollupTier::Untrimmed => write!(f, "untrimmed"),
        }
    }
}

/// The analysis, generation and rendering components behind the pipeline.
///
/// `Collection` is whatever the collector produces; it is threaded through
/// the enhancers and generators untouched by the pipeline.
pub trait Toolchain {
    type Collection;

    /// The engine programs are built with.
    fn engine(&self) -> &dyn AnalysisEngine;

    /// Enumerate the exported symbols reachable from the entry points.
    fn collect(
        &self,
        config: &ExtractorConfig,
        state: &AnalysisState,
        router: &mut MessageRouter,
    ) -> Result<Self::Collection>;

    /// Parse doc comments and attach them to the collected declarations.
    fn enhance_doc_comments(&self, collection: &mut Self::Collection, router: &mut MessageRouter) -> Result<()>;

    /// Check release tags, forgotten exports and other API conventions.
    fn enhance_validation(&self, collection: &mut Self::Collection, router: &mut MessageRouter) -> Result<()>;

    /// The API surface model as a JSON object, without tool metadata.
    fn build_model(&self, collection: &Self::Collection) -> Result<Map<String, Value>>;

    /// Render the API report text for one variant.
    fn generate_report(
        &self,
        collection: &Self::Collection,
        report: &ReportConfig,
        router: &mut MessageRouter,
    ) -> Result<String>;

    /// Whether two report texts describe the same API surface.
    fn reports_equivalent(&self, actual: &str, expected: &str) -> bool {
        reports_equivalent(actual, expected)
    }

    /// Render the declaration rollup for one tier.
    fn generate_rollup(&self, collection: &Self::Collection, tier: RollupTier) -> Result<String>;
}

/// Compare report texts ignoring line endings, trailing spaces and trailing
/// blank lines.
pub fn reports_equivalent(actual: &str, expected: &str) -> bool {
    fn lines(text: &str) -> Vec<&str> {
        let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines
    }
    lines(actual) == lines(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_equivalent() {
        assert!(reports_equivalent("a\nb\n", "a\r\nb\r\n"));
        assert!(reports_equivalent("a  \nb", "a\nb\n\n"));
        assert!(!reports_equivalent("a\nb", "a\nc"));
        assert!(!reports_equivalent("a\n\nb", "a\nb"));
        assert!(!reports_equivalent("  a", "a"));
    }

    #[test]
    fn test_tier_order() {
        let names: Vec<String> = RollupTier::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["public", "beta", "alpha", "untrimmed"]);
        assert_eq!(RollupTier::Untrimmed.minimum_release_tag(), ReleaseTag::None);
    }
}
