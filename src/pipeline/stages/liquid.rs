//! Liquid tag processing stage.

use crate::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that resolves `{% %}` and `{{ }}` tags in document content.
///
/// The first document that fails to render aborts the stage.
pub struct LiquidStage;

impl Stage for LiquidStage {
    fn name(&self) -> &'static str {
        "liquid"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            doc.content = ctx
                .liquid
                .render(&doc.content, ctx.variables, &doc.origin())?;
            doc.rendered = true;
        }
        Ok(())
    }
}
