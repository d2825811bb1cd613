//! Init command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Result of writing the starter configuration.
#[derive(Debug)]
pub struct InitReport {
    pub path: PathBuf,
    /// An existing file was overwritten.
    pub replaced: bool,
}

impl Report for InitReport {
    fn render(&self, out: &mut dyn Output) {
        let verb = if self.replaced { "Replaced" } else { "Created" };
        out.title(&format!("{verb} API Surface configuration"));
        out.added_item(&self.path.display().to_string());
        out.newline();
        out.section("Next steps");
        out.list_item("point mainEntryPointFilePath at your package's declaration entry point");
        out.list_item("create the apiReport.reportFolder folder and commit it");
        out.list_item("run `surface check` to see what will be produced");
    }
}
