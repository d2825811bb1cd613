use std::fmt;

use serde::Serialize;

/// Release stage of an API item, ordered from least to most public.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseTag {
    /// No tag was applied.
    #[default]
    None,
    Internal,
    Alpha,
    Beta,
    Public,
}

impl ReleaseTag {
    /// Every tag that can be written in a doc comment, most restrictive first.
    pub const ALL: [ReleaseTag; 4] = [
        ReleaseTag::Internal,
        ReleaseTag::Alpha,
        ReleaseTag::Beta,
        ReleaseTag::Public,
    ];

    /// Map a doc-comment tag name such as `@beta`.
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            "@internal" => Some(ReleaseTag::Internal),
            "@alpha" => Some(ReleaseTag::Alpha),
            "@beta" => Some(ReleaseTag::Beta),
            "@public" => Some(ReleaseTag::Public),
            _ => None,
        }
    }

    /// The doc-comment spelling, or `None` for [`ReleaseTag::None`].
    pub fn tag_name(&self) -> Option<&'static str> {
        match self {
            ReleaseTag::None => None,
            ReleaseTag::Internal => Some("@internal"),
            ReleaseTag::Alpha => Some("@alpha"),
            ReleaseTag::Beta => Some("@beta"),
            ReleaseTag::Public => Some("@public"),
        }
    }

    /// True for names that are always reported and may not be configured.
    pub fn is_reserved_tag_name(name: &str) -> bool {
        Self::from_tag_name(name).is_some()
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseTag::None => write!(f, "none"),
            ReleaseTag::Internal => write!(f, "internal"),
            ReleaseTag::Alpha => write!(f, "alpha"),
            ReleaseTag::Beta => write!(f, "beta"),
            ReleaseTag::Public => write!(f, "public"),
        }
    }
}
