//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod check;
mod init;
mod output;

pub use check::{Artifact, CheckReport};
pub use init::InitReport;
pub use output::{Report, TerminalOutput};
