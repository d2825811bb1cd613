//! Built-in pipeline phases, in the order they run:
//!
//! - [`PreamblePhase`] - engine version notice and diagnostics dump
//! - [`CollectPhase`] - enumerate exported symbols
//! - [`DocCommentPhase`] - attach parsed doc comments
//! - [`ValidationPhase`] - check API conventions
//! - [`ModelPhase`] - build the API surface model
//! - [`PersistModelPhase`] - write the doc model file
//! - [`ReportPhase`] - reconcile API reports against their baselines
//! - [`RollupPhase`] - write trimmed declaration rollups
//! - [`MetadataPhase`] - write `tsdoc-metadata.json`

mod collect;
mod enhance;
mod metadata;
mod model;
mod preamble;
mod report;
mod rollup;

pub use collect::CollectPhase;
pub use enhance::{DocCommentPhase, ValidationPhase};
pub use metadata::{MetadataPhase, TSDOC_VERSION, tsdoc_metadata_content};
pub use model::{ModelPhase, PersistModelPhase, doc_model_document};
pub use preamble::PreamblePhase;
pub use report::{ReportOutcome, ReportPhase, reconcile_report};
pub use rollup::RollupPhase;
