//! File writing stage.

use tracing::info;

use crate::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that writes rendered documents to the output directory.
///
/// Creates parent directories as needed. Does nothing when the context has
/// no output directory.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let Some(output_dir) = ctx.output_dir else {
            return Ok(());
        };

        for doc in docs {
            if !doc.rendered {
                return Err(PipelineError::stage(
                    "write",
                    format!(
                        "document '{}' was not rendered (was the liquid stage run?)",
                        doc.origin()
                    ),
                ));
            }

            let output_path = output_dir.join(doc.output_path());
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, &doc.content)?;
            info!(source = %doc.source_path.display(), output = %output_path.display(), "wrote document");
        }

        Ok(())
    }
}
