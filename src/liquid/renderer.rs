//! Tree renderer.
//!
//! Walks the parsed nodes against the variables. Loop variables live on a
//! binding stack that is pushed for each iteration and popped right after,
//! so names resolve innermost-first and an inner loop can shadow an outer
//! one without affecting it after the inner loop ends.

use std::cmp::Ordering;

use tracing::{debug, trace};

use super::ast::{ForLoop, Interpolation, LoopLayout, Node, Path};
use super::error::{LiquidError, origin_label};
use super::filters::FilterRegistry;
use super::value::{Value, Variables};

/// Renders one document tree.
pub struct Renderer<'r> {
    variables: &'r Variables,
    filters: &'r FilterRegistry,
    origin: &'r str,
    /// Loop bindings, innermost last.
    scope: Vec<(&'r str, &'r Value)>,
}

impl<'r> Renderer<'r> {
    pub fn new(variables: &'r Variables, filters: &'r FilterRegistry, origin: &'r str) -> Self {
        Self {
            variables,
            filters,
            origin,
            scope: Vec::new(),
        }
    }

    /// Render a node sequence to text.
    pub fn render(mut self, nodes: &'r [Node]) -> Result<String, LiquidError> {
        let mut out = String::new();
        self.render_nodes(nodes, &mut out)?;
        Ok(out)
    }

    fn render_nodes(&mut self, nodes: &'r [Node], out: &mut String) -> Result<(), LiquidError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Interpolation(interpolation) => {
                    out.push_str(&self.interpolate(interpolation)?);
                }
                Node::For(for_loop) => self.render_loop(for_loop, out)?,
                Node::If(conditional) => {
                    let branch = if self.is_truthy(&conditional.condition) {
                        &conditional.then_body
                    } else {
                        &conditional.else_body
                    };
                    self.render_nodes(branch, out)?;
                }
            }
        }
        Ok(())
    }

    fn interpolate(&self, interpolation: &Interpolation) -> Result<String, LiquidError> {
        let text = self
            .resolve(&interpolation.path)
            .map(Value::render_to_string)
            .unwrap_or_default();

        self.filters
            .apply_all(text, &interpolation.filters)
            .map_err(|name| LiquidError::UnknownFilter {
                origin: origin_label(self.origin),
                location: interpolation.location,
                name: name.to_string(),
                tag: interpolation.raw.clone(),
                available: self.filters.names(),
            })
    }

    fn render_loop(&mut self, for_loop: &'r ForLoop, out: &mut String) -> Result<(), LiquidError> {
        let items = match self.resolve(&for_loop.iterable) {
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                debug!(
                    origin = self.origin,
                    path = %for_loop.iterable,
                    found = other.type_name(),
                    "loop target is not a sequence, skipping"
                );
                return Ok(());
            }
            None => return Ok(()),
        };

        let mut pieces = Vec::with_capacity(items.len());
        for item in items {
            self.scope.push((for_loop.variable.as_str(), item));
            let mut iteration = String::new();
            let result = self.render_nodes(&for_loop.body, &mut iteration);
            self.scope.pop();
            result?;
            pieces.push(iteration);
        }

        match for_loop.layout {
            LoopLayout::Block => {
                for piece in &pieces {
                    out.push_str(drop_trailing_blank_lines(piece));
                }
            }
            LoopLayout::Inline => out.push_str(&join_inline(&pieces)),
        }
        Ok(())
    }

    fn is_truthy(&self, path: &Path) -> bool {
        self.resolve(path).is_some_and(Value::is_truthy)
    }

    /// Resolve a path against the loop bindings, then the root variables.
    fn resolve(&self, path: &Path) -> Option<&'r Value> {
        let head = path.head();
        let start = self
            .scope
            .iter()
            .rev()
            .find(|(name, _)| *name == head)
            .map(|(_, value)| *value)
            .or_else(|| self.variables.get(head));

        let resolved = start.and_then(|value| value.lookup(path.tail()));
        if resolved.is_none() {
            trace!(origin = self.origin, path = %path, "path did not resolve");
        }
        resolved
    }
}

/// Cut an iteration's output after the terminator of its last non-blank
/// line. An iteration with no visible content renders as nothing.
fn drop_trailing_blank_lines(text: &str) -> &str {
    let content_end = text.trim_end().len();
    if content_end == 0 {
        return "";
    }
    match text[content_end..].find('\n') {
        Some(newline) => &text[..content_end + newline + 1],
        None => text,
    }
}

/// Join the iterations of a loop whose opening tag shares its line.
///
/// Whitespace is only ever taken from the iterations themselves. Between
/// two iterations, the wider of the facing whitespace runs is kept (more
/// line breaks wins, then more characters), so ` x ` bodies join with one
/// space and `\n- x\n` bodies keep one line per item. At the outer edges
/// a run is kept only if it holds a line break; spaces there would double
/// the spacing of the text around the tags. Iterations with no visible
/// content are skipped.
fn join_inline(pieces: &[String]) -> String {
    let visible: Vec<(&str, &str, &str)> =
        pieces.iter().filter_map(|piece| split_edges(piece)).collect();

    let mut out = String::new();
    let mut previous_trail: Option<&str> = None;
    for &(lead, content, trail) in &visible {
        match previous_trail {
            Some(before) => out.push_str(wider_gap(before, lead)),
            None if has_line_break(lead) => out.push_str(lead),
            None => {}
        }
        out.push_str(content);
        previous_trail = Some(trail);
    }
    if let Some(trail) = previous_trail.filter(|trail| has_line_break(trail)) {
        out.push_str(trail);
    }
    out
}

/// Split text into leading whitespace, content and trailing whitespace.
/// `None` when there is no content.
fn split_edges(text: &str) -> Option<(&str, &str, &str)> {
    let content = text.trim();
    if content.is_empty() {
        return None;
    }
    let start = text.len() - text.trim_start().len();
    let end = start + content.len();
    Some((&text[..start], content, &text[end..]))
}

fn has_line_break(run: &str) -> bool {
    run.contains('\n')
}

fn wider_gap<'s>(before: &'s str, after: &'s str) -> &'s str {
    let breaks = |run: &str| run.matches('\n').count();
    match breaks(before).cmp(&breaks(after)) {
        Ordering::Greater => before,
        Ordering::Less => after,
        Ordering::Equal if after.len() > before.len() => after,
        Ordering::Equal => before,
    }
}
