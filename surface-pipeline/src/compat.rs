use std::path::{Path, PathBuf};

use apisurface_core::{Version, load_package_json};
use tracing::trace;

use crate::{ConsoleMessageId, MessageRouter};

/// Note the bundled engine version, and point out when the project itself
/// depends on a newer one.
///
/// Finding the project's engine is a heuristic that fails in many layouts;
/// failures produce no message.
pub fn check_compiler_compatibility(project_folder: &Path, engine_version: &str, router: &mut MessageRouter) {
    router.log_info(
        ConsoleMessageId::Preamble,
        format!("Analysis will use the bundled TypeScript version {engine_version}"),
    );

    let Some(theirs) = project_engine_version(project_folder) else {
        trace!("project engine version not found");
        return;
    };
    let Ok(ours) = engine_version.parse::<Version>() else {
        return;
    };

    if theirs.is_newer_minor_than(&ours) {
        router.log_info(
            ConsoleMessageId::CompilerVersionNotice,
            format!(
                "*** The target project appears to use TypeScript {theirs} which is newer than the \
                 bundled compiler engine; consider upgrading API Surface."
            ),
        );
    }
}

fn project_engine_version(project_folder: &Path) -> Option<Version> {
    let manifest = find_engine_manifest(project_folder)?;
    let package = load_package_json(&manifest).ok()?;
    package.version?.parse().ok()
}

/// `node_modules/typescript/package.json` in `start` or the nearest ancestor.
fn find_engine_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|folder| folder.join("node_modules").join("typescript").join("package.json"))
        .find(|candidate| candidate.is_file())
}
