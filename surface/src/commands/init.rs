use std::path::PathBuf;

use apisurface_config::CONFIG_FILENAME;
use clap::Args;
use dialoguer::{Confirm, theme::ColorfulTheme};
use eyre::{Context, Result};

use crate::{
    ops::{self, InitOutcome},
    reports::{InitReport, Report, TerminalOutput},
};

#[derive(Args)]
pub struct InitCommand {
    /// Folder to write api-surface.json into (defaults to the current folder)
    #[arg(default_value = ".")]
    pub folder: PathBuf,

    /// Replace an existing api-surface.json without asking
    #[arg(short, long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self) -> Result<()> {
        let path = self.folder.join(CONFIG_FILENAME);
        if path.exists() && !self.force && !Self::confirm_replace(&path)? {
            println!("Left {} unchanged", path.display());
            return Ok(());
        }

        let outcome = ops::init(&self.folder)?;
        let report = match outcome {
            InitOutcome::Created(path) => InitReport { path, replaced: false },
            InitOutcome::Replaced(path) => InitReport { path, replaced: true },
        };
        report.render(&mut TerminalOutput::new());
        Ok(())
    }

    fn confirm_replace(path: &std::path::Path) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} already exists. Replace it?", path.display()))
            .default(false)
            .interact()
            .wrap_err("Failed to get confirmation")
    }
}
