//! Core utilities and types for the apisurface extractor.
//!
//! This crate provides the filesystem, path, and package-manifest helpers
//! shared by the configuration resolver, the compiler-host adapter, and the
//! pipeline orchestrator.

mod error;
mod file;
mod log_level;
mod package;
pub mod path;
mod release;
mod version;

pub use error::{Error, Result};
// File operations
pub use file::{NewlineKind, WriteOptions, read_text_file, write_text_file};
pub use log_level::LogLevel;
// Package manifests
pub use package::{
    PACKAGE_JSON_FILENAME, PackageJson, find_package_json, is_valid_package_name,
    load_package_json, unscoped_package_name, validate_package_name,
};
pub use release::ReleaseTag;
pub use version::Version;
