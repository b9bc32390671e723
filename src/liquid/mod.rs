//! Liquid-style template tags for documentation sources.
//!
//! Documents are processed in four steps:
//!
//! 1. [`fence`] marks which lines sit inside fenced code blocks.
//! 2. [`scanner`] splits the source into text and tags, deciding which tags
//!    occupy a line of their own.
//! 3. [`parser`] nests `for` and `if` blocks into a tree.
//! 4. [`renderer`] walks the tree against the variables.
//!
//! The quickest way in is [`render`]:
//!
//! ```ignore
//! let mut vars = Variables::new();
//! vars.insert("users", vec!["alice", "ivan"]);
//! let out = render("{% for u in users %} {{ u | capitalize }} {% endfor %}", &vars, "", &Settings::default())?;
//! assert_eq!(out, "Alice Ivan");
//! ```

pub mod ast;
pub mod error;
pub mod fence;
pub mod filters;
pub mod parser;
pub mod renderer;
pub mod scanner;
pub mod settings;
pub mod value;

use tracing::debug;

pub use ast::Node;
pub use error::{LiquidError, StructureProblem};
pub use fence::{FenceMap, Location};
pub use filters::{Filter, FilterRegistry};
pub use settings::Settings;
pub use value::{Value, Variables};

use parser::Parser;
use renderer::Renderer;

/// Render `source` with the built-in filters.
///
/// `origin` identifies the document in error messages and may be empty.
pub fn render(
    source: &str,
    variables: &Variables,
    origin: &str,
    settings: &Settings,
) -> Result<String, LiquidError> {
    Liquid::new(*settings).render(source, variables, origin)
}

/// A configured template engine.
///
/// Holds the settings and, optionally, a custom filter registry. Without
/// one, the process-wide built-in registry is used.
#[derive(Default)]
pub struct Liquid {
    settings: Settings,
    filters: Option<FilterRegistry>,
}

impl Liquid {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            filters: None,
        }
    }

    /// Use `filters` instead of the built-in registry.
    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn filters(&self) -> &FilterRegistry {
        self.filters.as_ref().unwrap_or_else(|| FilterRegistry::global())
    }

    /// Scan and parse a document without rendering it.
    ///
    /// Surfaces scan and structure errors. Unknown filters are only
    /// detected when an interpolation is rendered.
    pub fn parse(&self, source: &str, origin: &str) -> Result<Template, LiquidError> {
        let fences = FenceMap::new(source);
        let tokens = scanner::scan(source, &fences, &self.settings, origin)?;
        let nodes = Parser::new(source, &fences, origin).parse(tokens)?;
        Ok(Template {
            nodes,
            origin: origin.to_string(),
        })
    }

    /// Parse and render a document.
    pub fn render(
        &self,
        source: &str,
        variables: &Variables,
        origin: &str,
    ) -> Result<String, LiquidError> {
        debug!(origin, bytes = source.len(), "rendering document");
        let output = self.parse(source, origin)?.render(variables, self.filters())?;
        debug!(origin, bytes = output.len(), "rendered document");
        Ok(output)
    }
}

/// A parsed document, reusable across renders.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
    origin: String,
}

impl Template {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn render(
        &self,
        variables: &Variables,
        filters: &FilterRegistry,
    ) -> Result<String, LiquidError> {
        Renderer::new(variables, filters, &self.origin).render(&self.nodes)
    }
}
