use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

pub const PACKAGE_JSON_FILENAME: &str = "package.json";

/// The subset of a `package.json` manifest consulted by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub typings: Option<String>,
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub tsdoc_metadata: Option<String>,
}

impl PackageJson {
    /// `typings`, falling back to `types`.
    pub fn typings_path(&self) -> Option<&str> {
        self.typings
            .as_deref()
            .or(self.types.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Walk up from `starting_folder` looking for the nearest `package.json`.
pub fn find_package_json(starting_folder: &Path) -> Option<PathBuf> {
    starting_folder
        .ancestors()
        .map(|folder| folder.join(PACKAGE_JSON_FILENAME))
        .find(|candidate| candidate.is_file())
}

/// Read and parse a `package.json` file.
pub fn load_package_json(path: &Path) -> Result<PackageJson> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::json(path, e))
}

const MAX_PACKAGE_NAME_LENGTH: usize = 214;

/// Check package-name syntax.
/// Returns None if valid, Some(reason) if invalid.
///
/// Accepts `name` and `@scope/name`. Each part may contain ASCII letters,
/// digits, `-`, `_` and `.`, but may not start with `.` or `_`.
pub fn validate_package_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("package name cannot be empty");
    }
    if name.len() > MAX_PACKAGE_NAME_LENGTH {
        return Some("package name cannot be longer than 214 characters");
    }

    let unscoped = match name.strip_prefix('@') {
        Some(rest) => {
            let Some((scope, unscoped)) = rest.split_once('/') else {
                return Some("scoped package name must have the form '@scope/name'");
            };
            if scope.is_empty() {
                return Some("package scope cannot be empty");
            }
            if let Some(reason) = validate_name_part(scope) {
                return Some(reason);
            }
            unscoped
        }
        None => name,
    };

    if unscoped.is_empty() {
        return Some("unscoped part of package name cannot be empty");
    }
    validate_name_part(unscoped)
}

fn validate_name_part(part: &str) -> Option<&'static str> {
    if part.starts_with('.') || part.starts_with('_') {
        return Some("package name cannot start with '.' or '_'");
    }
    if !part
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Some("package name must contain only letters, numbers, '-', '_' and '.'");
    }
    None
}

pub fn is_valid_package_name(name: &str) -> bool {
    validate_package_name(name).is_none()
}

/// Strip an `@scope/` prefix, if any.
pub fn unscoped_package_name(name: &str) -> &str {
    match name.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        Some((_, unscoped)) => unscoped,
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_valid_package_names() {
        assert!(is_valid_package_name("lodash"));
        assert!(is_valid_package_name("my-lib.core"));
        assert!(is_valid_package_name("@scope/pkg"));
        assert!(is_valid_package_name("@my-org/my_pkg2"));
    }

    #[test]
    fn test_invalid_package_names() {
        assert_eq!(validate_package_name(""), Some("package name cannot be empty"));
        assert!(!is_valid_package_name("@scope"));
        assert!(!is_valid_package_name("@/pkg"));
        assert!(!is_valid_package_name("@scope/"));
        assert!(!is_valid_package_name(".hidden"));
        assert!(!is_valid_package_name("_private"));
        assert!(!is_valid_package_name("has space"));
        assert!(!is_valid_package_name("a/b"));
        assert!(!is_valid_package_name(&"x".repeat(215)));
    }

    #[test]
    fn test_unscoped_package_name() {
        assert_eq!(unscoped_package_name("@scope/pkg"), "pkg");
        assert_eq!(unscoped_package_name("pkg"), "pkg");
    }

    #[test]
    fn test_find_package_json_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name":"demo"}"#).unwrap();

        let found = find_package_json(&nested).unwrap();
        assert_eq!(found, temp.path().join("package.json"));
    }

    #[test]
    fn test_load_package_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        fs::write(
            &path,
            r#"{"name":"@acme/widgets","version":"1.0.0","types":"dist/index.d.ts","scripts":{}}"#,
        )
        .unwrap();

        let package = load_package_json(&path).unwrap();
        assert_eq!(package.name, "@acme/widgets");
        assert_eq!(package.typings_path(), Some("dist/index.d.ts"));
        assert_eq!(package.tsdoc_metadata, None);
    }

    #[test]
    fn test_load_package_json_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_package_json(&path), Err(Error::Json { .. })));
    }
}
