use std::path::PathBuf;

use apisurface_config::{ConfigLoader, DefaultConfig, ExtractorConfig};
use clap::Args;
use eyre::{Context, Result, eyre};

use super::UnwrapOrExit;
use crate::reports::{Report, TerminalOutput};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to api-surface.json (defaults to searching from the current folder)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the fully resolved configuration as JSON
    #[arg(long)]
    pub diagnostics: bool,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let defaults = DefaultConfig::load().unwrap_or_exit();

        let config = match &self.config {
            Some(path) => ExtractorConfig::load_file_and_prepare(path, &defaults).unwrap_or_exit(),
            None => {
                let cwd = std::env::current_dir().wrap_err("Failed to get current directory")?;
                let options = ConfigLoader::new(&defaults)
                    .try_load_for_folder(&cwd)
                    .unwrap_or_exit()
                    .ok_or_else(|| eyre!("Unable to find an api-surface.json file in {}", cwd.display()))?;
                ExtractorConfig::prepare(options).unwrap_or_exit()
            }
        };

        let report = crate::ops::check(&config, self.diagnostics);
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
