//! State threaded through the pipeline phases of one invocation.

use apisurface_config::ExtractorConfig;
use apisurface_host::AnalysisState;
use eyre::{Result, eyre};
use serde_json::{Map, Value};

use crate::{MessageRouter, Toolchain};

/// Flags of an invocation that phases consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvocationFlags {
    /// Reconcile drift automatically and tolerate warnings.
    pub local_build: bool,
    /// Write the doc model without indentation.
    pub doc_model_minify: bool,
}

/// Context passed through all pipeline phases.
///
/// Phases fill in the collection and model as they run; the router
/// accumulates diagnostics along the way.
pub struct InvocationContext<'a, T: Toolchain> {
    pub config: &'a ExtractorConfig,
    pub state: &'a AnalysisState,
    pub toolchain: &'a T,
    pub flags: InvocationFlags,
    pub router: MessageRouter,
    /// Populated by the collect phase.
    pub collection: Option<T::Collection>,
    /// Populated by the model phase.
    pub model: Option<Map<String, Value>>,
    /// Set when any API report differed from its baseline or was missing.
    pub api_report_changed: bool,
}

impl<'a, T: Toolchain> InvocationContext<'a, T> {
    pub fn new(
        config: &'a ExtractorConfig,
        state: &'a AnalysisState,
        toolchain: &'a T,
        flags: InvocationFlags,
        router: MessageRouter,
    ) -> Self {
        Self {
            config,
            state,
            toolchain,
            flags,
            router,
            collection: None,
            model: None,
            api_report_changed: false,
        }
    }

    pub fn collection(&self) -> Result<&T::Collection> {
        self.collection
            .as_ref()
            .ok_or_else(|| eyre!("collection not set - did the collect phase run?"))
    }

    /// The collection alongside the router, for phases that report while
    /// reading it.
    pub fn collection_and_router(&mut self) -> Result<(&mut T::Collection, &mut MessageRouter)> {
        let collection = self
            .collection
            .as_mut()
            .ok_or_else(|| eyre!("collection not set - did the collect phase run?"))?;
        Ok((collection, &mut self.router))
    }

    /// Pass/fail for the invocation.
    ///
    /// Local builds fail only on errors. Other builds also fail on warnings,
    /// so CI gates on any drift.
    pub fn succeeded(&self) -> bool {
        let errors = self.router.error_count();
        let warnings = self.router.warning_count();
        if self.flags.local_build {
            errors == 0
        } else {
            errors == 0 && warnings == 0
        }
    }
}
