use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

/// A `major.minor.patch` version as found in package manifests.
///
/// Prerelease and build suffixes (`-beta.1`, `+sha`) are accepted on input
/// and dropped; they never take part in comparisons here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

impl TryFrom<String> for Version {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// True when `self` is ahead of `other` by major, or by minor within the
    /// same major. Patch differences are ignored.
    pub fn is_newer_minor_than(&self, other: &Version) -> bool {
        self.major > other.major || (self.major == other.major && self.minor > other.minor)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let core = trimmed
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(format!("invalid version '{}', expected 'X.Y.Z'", s));
        }
        Ok(Self {
            major: parts[0].parse().map_err(|_| "invalid major")?,
            minor: parts[1].parse().map_err(|_| "invalid minor")?,
            patch: parts[2].parse().map_err(|_| "invalid patch")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(Version::default().to_string(), "0.0.0");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("1.2.3".parse::<Version>().unwrap(), Version::new(1, 2, 3));
        assert_eq!("v5.4.2".parse::<Version>().unwrap(), Version::new(5, 4, 2));
        assert_eq!(
            "5.5.0-beta.1".parse::<Version>().unwrap(),
            Version::new(5, 5, 0)
        );
        assert_eq!(
            "10.20.30+build.7".parse::<Version>().unwrap(),
            Version::new(10, 20, 30)
        );
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("1.2".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("^1.2.3".parse::<Version>().is_err());
        assert!("1.2.x".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Version::new(1, 0, 0) < Version::new(1, 0, 1));
        assert!(Version::new(1, 9, 9) < Version::new(2, 0, 0));
        assert_eq!(
            Version::new(3, 1, 0).cmp(&Version::new(3, 1, 0)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_is_newer_minor_than() {
        let bundled = Version::new(5, 4, 2);
        assert!(Version::new(6, 0, 0).is_newer_minor_than(&bundled));
        assert!(Version::new(5, 5, 0).is_newer_minor_than(&bundled));
        assert!(!Version::new(5, 4, 9).is_newer_minor_than(&bundled));
        assert!(!Version::new(5, 3, 0).is_newer_minor_than(&bundled));
        assert!(!Version::new(4, 9, 0).is_newer_minor_than(&bundled));
    }

    #[test]
    fn test_serde() {
        #[derive(Serialize, Deserialize)]
        struct Manifest {
            version: Version,
        }
        let manifest: Manifest = serde_json::from_str(r#"{"version":"1.2.3"}"#).unwrap();
        assert_eq!(manifest.version, Version::new(1, 2, 3));
        assert_eq!(
            serde_json::to_string(&manifest).unwrap(),
            r#"{"version":"1.2.3"}"#
        );
        assert!(serde_json::from_str::<Manifest>(r#"{"version":"latest"}"#).is_err());
    }
}
