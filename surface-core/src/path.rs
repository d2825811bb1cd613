//! Lexical path helpers.
//!
//! None of these touch the filesystem; symlinks are not resolved.

use std::path::{Component, Path, PathBuf};

/// Suffixes that identify an emitted declaration file, compared case-insensitively.
pub const DECLARATION_SUFFIXES: [&str; 3] = [".d.ts", ".d.mts", ".d.cts"];

/// True if `path` names a declaration file (`.d.ts`, `.d.mts`, `.d.cts`).
pub fn is_declaration_file(path: impl AsRef<Path>) -> bool {
    let lower = path.as_ref().to_string_lossy().to_lowercase();
    DECLARATION_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
}

/// Collapse `.` and `..` components without consulting the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolve `value` against `base` unless it is already absolute.
pub fn resolve(base: &Path, value: impl AsRef<Path>) -> PathBuf {
    let value = value.as_ref();
    if value.is_absolute() {
        normalize(value)
    } else {
        normalize(&base.join(value))
    }
}

/// True when `child` is `parent` or lies somewhere beneath it.
pub fn is_under_or_equal(child: &Path, parent: &Path) -> bool {
    normalize(child).starts_with(normalize(parent))
}

/// `path` relative to `base`, if it lies under `base`.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    normalize(path)
        .strip_prefix(normalize(base))
        .ok()
        .map(Path::to_path_buf)
}

/// Render a path with forward slashes regardless of platform.
pub fn to_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
