use std::{collections::HashSet, path::PathBuf};

use apisurface_core::path::is_declaration_file;
use tracing::trace;

use crate::{HostError, Result};

/// Reduce candidate input files to the set handed to the engine.
///
/// Candidates are deduplicated ignoring case while keeping first-seen order
/// and original casing. Every survivor must be absolute. Only declaration
/// files are kept; the engine analyzes emitted declarations, not sources.
pub fn collect_input_files<I>(candidates: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for candidate in candidates {
        let key = candidate.to_string_lossy().to_uppercase();
        if seen.insert(key) {
            unique.push(candidate);
        }
    }

    let mut inputs = Vec::with_capacity(unique.len());
    for path in unique {
        if !path.is_absolute() {
            return Err(HostError::RelativeInput(path));
        }
        if is_declaration_file(&path) {
            inputs.push(path);
        } else {
            trace!(path = %path.display(), "dropping non-declaration input");
        }
    }
    Ok(inputs)
}
