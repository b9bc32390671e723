//! Block structure parser.
//!
//! Turns the flat token stream into a tree. Open `for` and `if` blocks live
//! on an explicit stack; closing tags pop the stack and attach the finished
//! node to the enclosing body, so nesting depth never grows the call stack.

use super::ast::{Conditional, ForLoop, Interpolation, LoopLayout, Node, Path, is_identifier};
use super::error::{LiquidError, StructureProblem, origin_label};
use super::fence::{FenceMap, Location};
use super::scanner::{Tag, TagKind, Token};

const FOR_SYNTAX: &str = "for <name> in <path>";
const IF_SYNTAX: &str = "if <path>";

/// A block that has been opened but not yet closed.
enum Frame {
    For {
        variable: String,
        iterable: Path,
        layout: LoopLayout,
        body: Vec<Node>,
        tag: String,
        location: Location,
    },
    If {
        condition: Path,
        then_body: Vec<Node>,
        else_body: Option<Vec<Node>>,
        tag: String,
        location: Location,
    },
}

impl Frame {
    /// The body new nodes are appended to.
    fn active_body(&mut self) -> &mut Vec<Node> {
        match self {
            Frame::For { body, .. } => body,
            Frame::If {
                then_body,
                else_body,
                ..
            } => else_body.as_mut().unwrap_or(then_body),
        }
    }
}

/// Builds the node tree for one document.
pub struct Parser<'a> {
    source: &'a str,
    fences: &'a FenceMap,
    origin: &'a str,
    root: Vec<Node>,
    stack: Vec<Frame>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, fences: &'a FenceMap, origin: &'a str) -> Self {
        Self {
            source,
            fences,
            origin,
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Consume the tokens and return the root node sequence.
    pub fn parse(mut self, tokens: Vec<Token<'_>>) -> Result<Vec<Node>, LiquidError> {
        for token in tokens {
            match token {
                Token::Text(text) => self.push_text(text),
                Token::Escaped { literal, .. } => self.push_text(literal),
                Token::Tag(tag) => self.handle_tag(&tag)?,
            }
        }

        // Report the innermost block that was left open.
        if let Some(frame) = self.stack.pop() {
            let (tag, location, problem) = match frame {
                Frame::For { tag, location, .. } => (tag, location, StructureProblem::UnclosedFor),
                Frame::If { tag, location, .. } => (tag, location, StructureProblem::UnclosedIf),
            };
            return Err(self.structure_error(tag, location, problem));
        }

        Ok(self.root)
    }

    fn current_body(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => frame.active_body(),
            None => &mut self.root,
        }
    }

    fn push_node(&mut self, node: Node) {
        self.current_body().push(node);
    }

    /// Append literal text, merging with a preceding text node.
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let body = self.current_body();
        if let Some(Node::Text(previous)) = body.last_mut() {
            previous.push_str(text);
        } else {
            body.push(Node::Text(text.to_string()));
        }
    }

    fn handle_tag(&mut self, tag: &Tag<'_>) -> Result<(), LiquidError> {
        match tag.kind {
            TagKind::Interpolation => {
                self.interpolation(tag);
                Ok(())
            }
            TagKind::For => self.open_for(tag),
            TagKind::If => self.open_if(tag),
            TagKind::Else => self.else_branch(tag),
            TagKind::EndFor => self.close_for(tag),
            TagKind::EndIf => self.close_if(tag),
        }
    }

    fn interpolation(&mut self, tag: &Tag<'_>) {
        match parse_pipeline(tag.content) {
            Some((path, filters)) => {
                let location = self.location(tag);
                self.push_node(Node::Interpolation(Interpolation {
                    path,
                    filters,
                    raw: tag.raw.to_string(),
                    location,
                }));
            }
            // Not an expression we evaluate; leave it for later processors.
            None => self.push_text(tag.raw),
        }
    }

    fn open_for(&mut self, tag: &Tag<'_>) -> Result<(), LiquidError> {
        let words: Vec<&str> = tag.content.split_whitespace().collect();
        let parsed = match words.as_slice() {
            ["for", variable, "in", iterable] if is_identifier(variable) => {
                Path::parse(iterable).map(|path| (variable.to_string(), path))
            }
            _ => None,
        };
        let Some((variable, iterable)) = parsed else {
            return Err(self.malformed(tag, "for", FOR_SYNTAX));
        };

        let layout = if tag.line_isolated {
            LoopLayout::Block
        } else {
            LoopLayout::Inline
        };
        let location = self.location(tag);
        self.stack.push(Frame::For {
            variable,
            iterable,
            layout,
            body: Vec::new(),
            tag: tag.raw.to_string(),
            location,
        });
        Ok(())
    }

    fn open_if(&mut self, tag: &Tag<'_>) -> Result<(), LiquidError> {
        let words: Vec<&str> = tag.content.split_whitespace().collect();
        let condition = match words.as_slice() {
            ["if", condition] => Path::parse(condition),
            _ => None,
        };
        let Some(condition) = condition else {
            return Err(self.malformed(tag, "if", IF_SYNTAX));
        };

        let location = self.location(tag);
        self.stack.push(Frame::If {
            condition,
            then_body: Vec::new(),
            else_body: None,
            tag: tag.raw.to_string(),
            location,
        });
        Ok(())
    }

    fn else_branch(&mut self, tag: &Tag<'_>) -> Result<(), LiquidError> {
        self.expect_bare(tag, "else")?;
        let problem = match self.stack.last_mut() {
            Some(Frame::If { else_body, .. }) => {
                if else_body.is_some() {
                    Some(StructureProblem::DuplicateElse)
                } else {
                    *else_body = Some(Vec::new());
                    None
                }
            }
            _ => Some(StructureProblem::UnmatchedElse),
        };
        match problem {
            Some(problem) => Err(self.tag_error(tag, problem)),
            None => Ok(()),
        }
    }

    fn close_for(&mut self, tag: &Tag<'_>) -> Result<(), LiquidError> {
        self.expect_bare(tag, "endfor")?;
        match self.stack.pop() {
            Some(Frame::For {
                variable,
                iterable,
                layout,
                body,
                ..
            }) => {
                self.push_node(Node::For(ForLoop {
                    variable,
                    iterable,
                    body,
                    layout,
                }));
                Ok(())
            }
            other => {
                self.stack.extend(other);
                Err(self.tag_error(tag, StructureProblem::UnmatchedEndFor))
            }
        }
    }

    fn close_if(&mut self, tag: &Tag<'_>) -> Result<(), LiquidError> {
        self.expect_bare(tag, "endif")?;
        match self.stack.pop() {
            Some(Frame::If {
                condition,
                then_body,
                else_body,
                ..
            }) => {
                self.push_node(Node::If(Conditional {
                    condition,
                    then_body,
                    else_body: else_body.unwrap_or_default(),
                }));
                Ok(())
            }
            other => {
                self.stack.extend(other);
                Err(self.tag_error(tag, StructureProblem::UnmatchedEndIf))
            }
        }
    }

    /// `else`, `endfor` and `endif` take no payload.
    fn expect_bare(&self, tag: &Tag<'_>, keyword: &'static str) -> Result<(), LiquidError> {
        if tag.content == keyword {
            Ok(())
        } else {
            Err(self.malformed(tag, keyword, keyword))
        }
    }

    fn location(&self, tag: &Tag<'_>) -> Location {
        self.fences.location(self.source, tag.span.start)
    }

    fn malformed(&self, tag: &Tag<'_>, keyword: &'static str, expected: &'static str) -> LiquidError {
        self.tag_error(tag, StructureProblem::Malformed { keyword, expected })
    }

    fn tag_error(&self, tag: &Tag<'_>, problem: StructureProblem) -> LiquidError {
        self.structure_error(tag.raw.to_string(), self.location(tag), problem)
    }

    fn structure_error(
        &self,
        tag: String,
        location: Location,
        problem: StructureProblem,
    ) -> LiquidError {
        LiquidError::Structure {
            origin: origin_label(self.origin),
            location,
            tag,
            problem,
        }
    }
}

/// Split `path | filter | filter` into its parts.
fn parse_pipeline(content: &str) -> Option<(Path, Vec<String>)> {
    let mut parts = content.split('|');
    let path = Path::parse(parts.next()?.trim())?;
    let filters = parts
        .map(|part| {
            let name = part.trim();
            is_identifier(name).then(|| name.to_string())
        })
        .collect::<Option<Vec<_>>>()?;
    Some((path, filters))
}
