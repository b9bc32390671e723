//! Parsed document tree.

use std::fmt;

use super::fence::Location;

/// A dotted variable path such as `project.commentsByPage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse a dotted path. Every segment must be a non-empty run of ASCII
    /// letters, digits, `_` or `-`.
    pub fn parse(text: &str) -> Option<Self> {
        let segments = text
            .split('.')
            .map(|segment| is_path_segment(segment).then(|| segment.to_string()))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { segments })
    }

    /// The variable name the path starts from.
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// Segments after the head.
    pub fn tail(&self) -> impl Iterator<Item = &str> {
        self.segments[1..].iter().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Whether `name` can be a loop variable or filter name.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// How the iterations of a loop are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopLayout {
    /// The opening tag has its own line: iterations stack line by line.
    Block,
    /// The opening tag shares its line with other content: iterations are
    /// joined keeping only the whitespace they produce themselves.
    Inline,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Interpolation(Interpolation),
    For(ForLoop),
    If(Conditional),
}

/// `{{ path | filter | ... }}`
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    pub path: Path,
    pub filters: Vec<String>,
    /// The tag as written, for error messages.
    pub raw: String,
    pub location: Location,
}

/// `{% for variable in iterable %} body {% endfor %}`
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub variable: String,
    pub iterable: Path,
    pub body: Vec<Node>,
    pub layout: LoopLayout,
}

/// `{% if condition %} then {% else %} else {% endif %}`
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Path,
    pub then_body: Vec<Node>,
    /// Empty when there is no `{% else %}`.
    pub else_body: Vec<Node>,
}
