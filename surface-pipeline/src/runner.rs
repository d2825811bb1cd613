//! Pipeline orchestrator.

use eyre::Result;
use tracing::{debug, info_span};

use crate::{
    InvocationContext, Phase, Toolchain,
    phases::{
        CollectPhase, DocCommentPhase, MetadataPhase, ModelPhase, PersistModelPhase,
        PreamblePhase, ReportPhase, RollupPhase, ValidationPhase,
    },
};

/// The extraction pipeline.
///
/// Runs the built-in phases in a fixed order, then any added phases, then
/// flushes the messages nobody has handled yet. Phases whose feature is
/// disabled in the configuration are skipped. The first fatal error ends the
/// run.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new().phase(MyCustomPhase);
/// pipeline.run(&mut ctx)?;
/// ```
pub struct Pipeline<T: Toolchain> {
    phases: Vec<Box<dyn Phase<T>>>,
}

impl<T: Toolchain> Pipeline<T> {
    pub fn new() -> Self {
        Self {
            phases: vec![
                Box::new(PreamblePhase),
                Box::new(CollectPhase),
                Box::new(DocCommentPhase),
                Box::new(ValidationPhase),
                Box::new(ModelPhase),
                Box::new(PersistModelPhase),
                Box::new(ReportPhase),
                Box::new(RollupPhase),
                Box::new(MetadataPhase),
            ],
        }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase<T> + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Names of the phases, in execution order.
    pub fn phase_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|phase| phase.name()).collect()
    }

    pub fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        for phase in &self.phases {
            if !phase.enabled(ctx.config) {
                debug!(phase = phase.name(), "phase disabled");
                continue;
            }

            let _span = info_span!("phase", name = phase.name()).entered();
            debug!(description = phase.description(), "running phase");
            phase.run(ctx)?;
        }

        ctx.router.handle_remaining_non_console_messages();
        Ok(())
    }
}

impl<T: Toolchain> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
