//! Core operations.
//!
//! This module contains the business logic for surface commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod init;

pub use check::check;
pub use init::{InitOutcome, init};
