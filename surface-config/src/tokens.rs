//! Token substitution for path-shaped configuration fields.
//!
//! Recognized tokens:
//! - `<unscopedPackageName>` and `<packageName>`: replaced anywhere
//! - `<projectFolder>`: replaced only at the start of the value
//! - `<lookup>`: only valid as the whole value of `projectFolder` or
//!   `tsdocMetadataFilePath`, which handle it before expansion

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use apisurface_core::{path::resolve, unscoped_package_name};
use regex::Regex;

pub const PROJECT_FOLDER_TOKEN: &str = "<projectFolder>";
pub const PACKAGE_NAME_TOKEN: &str = "<packageName>";
pub const UNSCOPED_PACKAGE_NAME_TOKEN: &str = "<unscopedPackageName>";
pub const LOOKUP_TOKEN: &str = "<lookup>";

/// Package name used when no manifest is available.
pub const UNKNOWN_PACKAGE_NAME: &str = "unknown-package";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<]*?>").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error(
        "The \"{field}\" value incorrectly uses the \"<projectFolder>\" token. It must appear at the start of the string."
    )]
    MisplacedProjectFolder { field: String },

    #[error("The \"{field}\" value incorrectly uses the \"<lookup>\" token")]
    Lookup { field: String },

    #[error("The \"{field}\" value contains an unrecognized token \"{token}\"")]
    Unrecognized { field: String, token: String },

    #[error("The \"{field}\" value contains extra token characters (\"<\" or \">\"): {value}")]
    ExtraCharacters { field: String, value: String },
}

/// Values available for substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenContext {
    project_folder: PathBuf,
    package_name: String,
    unscoped_package_name: String,
}

impl TokenContext {
    /// Context for `project_folder`, taking names from `package_name` when known.
    pub fn new(project_folder: impl Into<PathBuf>, package_name: Option<&str>) -> Self {
        let (package_name, unscoped) = match package_name {
            Some(name) => (name.to_string(), unscoped_package_name(name).to_string()),
            None => (
                UNKNOWN_PACKAGE_NAME.to_string(),
                UNKNOWN_PACKAGE_NAME.to_string(),
            ),
        };
        Self {
            project_folder: project_folder.into(),
            package_name,
            unscoped_package_name: unscoped,
        }
    }

    pub fn project_folder(&self) -> &Path {
        &self.project_folder
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn unscoped_package_name(&self) -> &str {
        &self.unscoped_package_name
    }

    /// Substitute tokens in `value`; an empty or blank value stays empty.
    pub fn expand(&self, field: &str, value: Option<&str>) -> Result<String, TokenError> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Ok(String::new());
        }

        let mut value = value
            .replace(UNSCOPED_PACKAGE_NAME_TOKEN, &self.unscoped_package_name)
            .replace(PACKAGE_NAME_TOKEN, &self.package_name);

        if let Some(rest) = value.strip_prefix(PROJECT_FOLDER_TOKEN) {
            let rest = rest.trim_start_matches(['/', '\\']);
            value = resolve(&self.project_folder, rest)
                .to_string_lossy()
                .into_owned();
        }

        if value.contains(PROJECT_FOLDER_TOKEN) {
            return Err(TokenError::MisplacedProjectFolder {
                field: field.to_string(),
            });
        }
        if value.contains(LOOKUP_TOKEN) {
            return Err(TokenError::Lookup {
                field: field.to_string(),
            });
        }

        reject_tokens(field, &value)?;
        tracing::trace!(field, value = %value, "expanded tokens");
        Ok(value)
    }

    /// Expand `value` and resolve it against the project folder.
    ///
    /// Returns `None` when the value is missing or blank.
    pub fn resolve_path(&self, field: &str, value: Option<&str>) -> Result<Option<PathBuf>, TokenError> {
        let expanded = self.expand(field, value)?;
        if expanded.is_empty() {
            return Ok(None);
        }
        Ok(Some(resolve(&self.project_folder, expanded)))
    }
}

/// Fail if anything that looks like a token is left in `value`.
pub fn reject_tokens(field: &str, value: &str) -> Result<(), TokenError> {
    if !value.contains(['<', '>']) {
        return Ok(());
    }
    match TOKEN_RE.find(value) {
        Some(token) => Err(TokenError::Unrecognized {
            field: field.to_string(),
            token: token.as_str().to_string(),
        }),
        None => Err(TokenError::ExtraCharacters {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}
