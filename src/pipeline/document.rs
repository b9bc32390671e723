//! Document types for pipeline processing.

use std::path::{Component, Path, PathBuf};

/// A document being processed through the pipeline.
///
/// `content` starts as the raw source and is replaced by each stage that
/// transforms it.
#[derive(Debug, Clone)]
pub struct ProcessingDocument {
    /// Path the document was read from.
    pub source_path: PathBuf,

    /// Content being processed.
    pub content: String,

    /// Set once the liquid stage has rendered the document.
    pub rendered: bool,
}

impl ProcessingDocument {
    pub fn new(source_path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            source_path: source_path.into(),
            content,
            rendered: false,
        }
    }

    /// Identifier used in error messages.
    pub fn origin(&self) -> String {
        self.source_path.display().to_string()
    }

    /// Path of the output file relative to the output directory.
    ///
    /// Relative inputs keep their directory structure (minus any `..` or
    /// `.` components); absolute inputs keep only their file name.
    pub fn output_path(&self) -> PathBuf {
        if self.source_path.is_absolute() {
            return self
                .source_path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_default();
        }
        self.source_path
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect()
    }

    /// Read a document from disk.
    pub async fn load(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::new(path, content))
    }
}
