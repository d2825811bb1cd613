use eyre::Result;

use crate::{InvocationContext, Phase, Toolchain};

/// Phase that parses doc comments for the collected declarations.
pub struct DocCommentPhase;

impl<T: Toolchain> Phase<T> for DocCommentPhase {
    fn name(&self) -> &'static str {
        "doc-comments"
    }

    fn description(&self) -> &'static str {
        "Parse and attach doc comments"
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let toolchain = ctx.toolchain;
        let (collection, router) = ctx.collection_and_router()?;
        toolchain.enhance_doc_comments(collection, router)
    }
}

/// Phase that checks release tags, forgotten exports and similar rules.
pub struct ValidationPhase;

impl<T: Toolchain> Phase<T> for ValidationPhase {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn description(&self) -> &'static str {
        "Check API conventions"
    }

    fn run(&self, ctx: &mut InvocationContext<'_, T>) -> Result<()> {
        let toolchain = ctx.toolchain;
        let (collection, router) = ctx.collection_and_router()?;
        toolchain.enhance_validation(collection, router)
    }
}
