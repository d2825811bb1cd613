use std::path::Path;

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};

/// Line ending style used when writing output files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineKind {
    /// Windows-style `\r\n`
    #[default]
    Crlf,
    /// Unix-style `\n`
    Lf,
    /// Whatever the current platform uses
    Os,
}

impl NewlineKind {
    /// The literal line terminator for this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            NewlineKind::Crlf => "\r\n",
            NewlineKind::Lf => "\n",
            NewlineKind::Os => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }

    /// Rewrite every line ending in `text` to this style.
    pub fn convert(&self, text: &str) -> String {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        match self.as_str() {
            "\n" => normalized,
            eol => normalized.replace('\n', eol),
        }
    }
}

impl std::fmt::Display for NewlineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewlineKind::Crlf => write!(f, "crlf"),
            NewlineKind::Lf => write!(f, "lf"),
            NewlineKind::Os => write!(f, "os"),
        }
    }
}

/// Rules that determine how a text file is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Convert line endings before writing.
    pub newline: Option<NewlineKind>,
    /// Create missing parent folders instead of failing.
    pub ensure_folder_exists: bool,
}

impl WriteOptions {
    /// Convert line endings and create parent folders.
    pub fn with_newline(newline: NewlineKind) -> Self {
        Self {
            newline: Some(newline),
            ensure_folder_exists: true,
        }
    }

    /// Do not create missing parent folders.
    pub fn without_creating_folders(mut self) -> Self {
        self.ensure_folder_exists = false;
        self
    }
}

/// Write `content` to `path` according to `options`.
pub fn write_text_file(path: &Path, content: &str, options: &WriteOptions) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if options.ensure_folder_exists {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create folder {}", parent.display()))?;
        } else if !parent.is_dir() {
            return Err(eyre!("folder does not exist: {}", parent.display()));
        }
    }

    let converted;
    let content = match options.newline {
        Some(newline) => {
            converted = newline.convert(content);
            converted.as_str()
        }
        None => content,
    };

    std::fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    tracing::trace!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Read a UTF-8 text file.
pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("test.txt");

        write_text_file(&path, "nested", &WriteOptions::with_newline(NewlineKind::Lf)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_write_without_folder_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("test.txt");

        let options = WriteOptions::with_newline(NewlineKind::Lf).without_creating_folders();
        assert!(write_text_file(&path, "x", &options).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");

        write_text_file(&path, "first", &WriteOptions::default()).unwrap();
        write_text_file(&path, "second", &WriteOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_converts_newlines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("crlf.txt");

        write_text_file(&path, "a\nb\r\nc", &WriteOptions::with_newline(NewlineKind::Crlf))
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\r\nb\r\nc");
    }

    #[test]
    fn test_convert() {
        assert_eq!(NewlineKind::Lf.convert("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(NewlineKind::Crlf.convert("a\nb"), "a\r\nb");
        assert_eq!(NewlineKind::Crlf.convert("a\r\nb"), "a\r\nb");
    }

    #[test]
    fn test_newline_kind_deserialize() {
        let kind: NewlineKind = serde_json::from_str("\"lf\"").unwrap();
        assert_eq!(kind, NewlineKind::Lf);
        assert!(serde_json::from_str::<NewlineKind>("\"cr\"").is_err());
    }
}
