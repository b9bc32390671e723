//! Pipeline context for sharing state across stages.

use std::path::Path;

use crate::liquid::{Liquid, Variables};

/// Shared context for pipeline stages.
pub struct PipelineContext<'a> {
    /// Configured engine (settings and filters).
    pub liquid: &'a Liquid,

    /// Variables every document is rendered against.
    pub variables: &'a Variables,

    /// Directory where output files are written, if any.
    pub output_dir: Option<&'a Path>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(liquid: &'a Liquid, variables: &'a Variables, output_dir: Option<&'a Path>) -> Self {
        Self {
            liquid,
            variables,
            output_dir,
        }
    }
}
