//! Tag scanner.
//!
//! Splits a document into literal text and tags. Recognized tags are
//! `{% ... %}` statements with one of the five control keywords and
//! `{{ ... }}` interpolations; anything else that merely looks like a tag
//! (unknown statements, disabled features, suppressed code fences) stays in
//! the text. The tokens cover the source exactly: concatenating every text
//! token with the consumed range of every tag gives back the input.

use std::ops::Range;

use super::error::{LiquidError, origin_label};
use super::fence::FenceMap;
use super::settings::Settings;

const STATEMENT_OPEN: &str = "{%";
const STATEMENT_CLOSE: &str = "%}";
const INTERPOLATION_OPEN: &str = "{{";
const INTERPOLATION_CLOSE: &str = "}}";

/// Prefix that turns an interpolation into literal text.
const NOT_VAR: &str = "not_var";

/// Maximum number of characters quoted from the source in scan errors.
const EXCERPT_LEN: usize = 32;

/// The kind of a recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    For,
    If,
    Else,
    EndFor,
    EndIf,
    Interpolation,
}

impl TagKind {
    /// Statement tags are the ones eligible for whole-line elision.
    pub fn is_statement(self) -> bool {
        !matches!(self, TagKind::Interpolation)
    }

    /// The keyword that introduces this tag.
    pub fn keyword(self) -> &'static str {
        match self {
            TagKind::For => "for",
            TagKind::If => "if",
            TagKind::Else => "else",
            TagKind::EndFor => "endfor",
            TagKind::EndIf => "endif",
            TagKind::Interpolation => "{{",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "for" => Some(TagKind::For),
            "if" => Some(TagKind::If),
            "else" => Some(TagKind::Else),
            "endfor" => Some(TagKind::EndFor),
            "endif" => Some(TagKind::EndIf),
            _ => None,
        }
    }

    fn is_enabled(self, settings: &Settings) -> bool {
        match self {
            TagKind::For | TagKind::EndFor => settings.cycles,
            TagKind::If | TagKind::Else | TagKind::EndIf => settings.conditions,
            TagKind::Interpolation => settings.substitutions,
        }
    }
}

/// A recognized tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    /// Text between the delimiters, trimmed. Statement tags also lose
    /// their whitespace-control dashes (`{%- ... -%}`).
    pub content: &'a str,
    /// The tag exactly as written, delimiters included.
    pub raw: &'a str,
    /// Byte range of `raw` in the source.
    pub span: Range<usize>,
    /// Byte range dropped from the output. Equal to `span` unless the tag
    /// is line-isolated, in which case it also covers the surrounding
    /// horizontal whitespace and the line terminator.
    pub consumed: Range<usize>,
    pub line_isolated: bool,
    pub inside_fence: bool,
}

/// A unit of scanned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text, emitted unchanged.
    Text(&'a str),
    /// A tag to be interpreted by the parser.
    Tag(Tag<'a>),
    /// An interpolation written as `not_var{{ ... }}`: `literal` is emitted
    /// as-is and the `not_var` prefix is dropped.
    Escaped { prefix: &'a str, literal: &'a str },
}

/// Scan `source` into tokens.
///
/// `origin` only appears in error messages.
pub fn scan<'a>(
    source: &'a str,
    fences: &FenceMap,
    settings: &Settings,
    origin: &str,
) -> Result<Vec<Token<'a>>, LiquidError> {
    let mut found = find_tags(source, fences, settings, origin)?;
    mark_isolated(source, &mut found);
    Ok(weave_text(source, found))
}

/// A tag or escape located in the source, before text is filled in.
enum Found<'a> {
    Tag(Tag<'a>),
    Escaped { span: Range<usize>, prefix_len: usize },
}

impl Found<'_> {
    fn consumed(&self) -> Range<usize> {
        match self {
            Found::Tag(tag) => tag.consumed.clone(),
            Found::Escaped { span, .. } => span.clone(),
        }
    }
}

fn find_tags<'a>(
    source: &'a str,
    fences: &FenceMap,
    settings: &Settings,
    origin: &str,
) -> Result<Vec<Found<'a>>, LiquidError> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(start) = next_opener(source, cursor) {
        let is_statement = source[start..].starts_with(STATEMENT_OPEN);
        let (opener, closer) = if is_statement {
            (STATEMENT_OPEN, STATEMENT_CLOSE)
        } else {
            (INTERPOLATION_OPEN, INTERPOLATION_CLOSE)
        };

        let inside_fence = fences.is_inside(start);
        let body_start = start + opener.len();

        // Fenced text is literal: step over the opener and keep looking.
        if inside_fence && !settings.conditions_in_code {
            cursor = body_start;
            continue;
        }

        let Some(close) = source[body_start..].find(closer) else {
            return Err(LiquidError::Scan {
                origin: origin_label(origin),
                location: fences.location(source, start),
                opener,
                closer,
                excerpt: excerpt(&source[start..]),
            });
        };
        let body_end = body_start + close;
        let end = body_end + closer.len();
        cursor = end;

        let inner = &source[body_start..body_end];
        let raw = &source[start..end];
        let kind_and_content = if is_statement {
            classify_statement(inner)
        } else {
            Some((TagKind::Interpolation, inner.trim()))
        };
        let Some((kind, content)) = kind_and_content else {
            continue;
        };
        if !kind.is_enabled(settings) {
            continue;
        }

        if kind == TagKind::Interpolation && source[..start].ends_with(NOT_VAR) {
            if !settings.keep_not_var {
                found.push(Found::Escaped {
                    span: start - NOT_VAR.len()..end,
                    prefix_len: NOT_VAR.len(),
                });
            }
            continue;
        }

        found.push(Found::Tag(Tag {
            kind,
            content,
            raw,
            span: start..end,
            consumed: start..end,
            line_isolated: false,
            inside_fence,
        }));
    }

    Ok(found)
}

/// Position of the next `{%` or `{{` at or after `from`.
fn next_opener(source: &str, from: usize) -> Option<usize> {
    let rest = &source[from..];
    let statement = rest.find(STATEMENT_OPEN);
    let interpolation = rest.find(INTERPOLATION_OPEN);
    let relative = match (statement, interpolation) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    Some(from + relative)
}

/// Identify a statement by its first word. Unknown keywords yield `None`
/// and are left in the text for later processors.
fn classify_statement(inner: &str) -> Option<(TagKind, &str)> {
    let content = inner.trim();
    let content = content.strip_prefix('-').unwrap_or(content);
    let content = content.strip_suffix('-').unwrap_or(content).trim();
    let keyword = content.split_whitespace().next()?;
    TagKind::from_keyword(keyword).map(|kind| (kind, content))
}

fn is_horizontal_space(text: &str) -> bool {
    text.chars().all(|c| c == ' ' || c == '\t')
}

/// Mark statement tags that sit alone on their line and widen their
/// consumed range to cover the whole line.
///
/// Statement tags separated only by horizontal whitespace form a run; a run
/// that is the only content of its line is elided as a whole, so two
/// statements sharing a line disappear together.
fn mark_isolated(source: &str, found: &mut [Found<'_>]) {
    let statement_span = |item: &Found<'_>| match item {
        Found::Tag(tag) if tag.kind.is_statement() => Some(tag.span.clone()),
        _ => None,
    };

    let mut i = 0;
    while i < found.len() {
        let Some(first) = statement_span(&found[i]) else {
            i += 1;
            continue;
        };

        let mut j = i;
        let mut last = first.clone();
        while let Some(next) = found.get(j + 1).and_then(statement_span) {
            if !is_horizontal_space(&source[last.end..next.start]) {
                break;
            }
            j += 1;
            last = next;
        }

        let line_start = source[..first.start].rfind('\n').map_or(0, |p| p + 1);
        let rest = &source[last.end..];
        let newline = rest.find('\n');
        let line_rest = &rest[..newline.unwrap_or(rest.len())];
        let line_rest = line_rest.strip_suffix('\r').unwrap_or(line_rest);

        if is_horizontal_space(&source[line_start..first.start]) && is_horizontal_space(line_rest)
        {
            let line_end = last.end + newline.map_or(rest.len(), |p| p + 1);
            let mut previous_end = line_start;
            for (k, item) in found[i..=j].iter_mut().enumerate() {
                if let Found::Tag(tag) = item {
                    let end = if i + k == j { line_end } else { tag.span.end };
                    tag.consumed = previous_end..end;
                    tag.line_isolated = true;
                    previous_end = tag.span.end;
                }
            }
        }

        i = j + 1;
    }
}

/// Fill the gaps between found tags with text tokens.
fn weave_text<'a>(source: &'a str, found: Vec<Found<'a>>) -> Vec<Token<'a>> {
    let mut tokens = Vec::with_capacity(found.len() * 2 + 1);
    let mut cursor = 0;

    for item in found {
        let consumed = item.consumed();
        if consumed.start > cursor {
            tokens.push(Token::Text(&source[cursor..consumed.start]));
        }
        cursor = consumed.end;

        tokens.push(match item {
            Found::Tag(tag) => Token::Tag(tag),
            Found::Escaped { span, prefix_len } => {
                let split = span.start + prefix_len;
                Token::Escaped {
                    prefix: &source[span.start..split],
                    literal: &source[split..span.end],
                }
            }
        });
    }

    if cursor < source.len() {
        tokens.push(Token::Text(&source[cursor..]));
    }
    tokens
}

fn excerpt(text: &str) -> String {
    let line = text.split('\n').next().unwrap_or(text);
    line.chars().take(EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_with(source: &str, settings: Settings) -> Vec<Token<'_>> {
        let fences = FenceMap::new(source);
        scan(source, &fences, &settings, "test.md").unwrap()
    }

    fn scan_default(source: &str) -> Vec<Token<'_>> {
        scan_with(source, Settings::default())
    }

    fn tags<'a>(tokens: &'a [Token<'a>]) -> Vec<&'a Tag<'a>> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Tag(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }

    /// Rebuild the source from the tokens.
    fn reconstruct(source: &str, tokens: &[Token<'_>]) -> String {
        tokens
            .iter()
            .map(|t| match t {
                Token::Text(text) => text.to_string(),
                Token::Tag(tag) => source[tag.consumed.clone()].to_string(),
                Token::Escaped { prefix, literal } => format!("{prefix}{literal}"),
            })
            .collect()
    }

    #[test]
    fn test_plain_text_is_one_token() {
        let tokens = scan_default("no tags here\n");
        assert_eq!(tokens, vec![Token::Text("no tags here\n")]);
    }

    #[test]
    fn test_inline_tags() {
        let source = "Prefix {% for user in users %} {{ user | capitalize }} {% endfor %} Postfix";
        let tokens = scan_default(source);
        let found = tags(&tokens);

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].kind, TagKind::For);
        assert_eq!(found[0].content, "for user in users");
        assert_eq!(found[1].kind, TagKind::Interpolation);
        assert_eq!(found[1].content, "user | capitalize");
        assert_eq!(found[2].kind, TagKind::EndFor);
        assert!(found.iter().all(|t| !t.line_isolated));
        assert_eq!(reconstruct(source, &tokens), source);
    }

    #[test]
    fn test_isolated_tag_consumes_line() {
        let source = "Prefix\n  {% for user in users %}  \n{{user}}\n{% endfor %}\nPostfix";
        let tokens = scan_default(source);
        let found = tags(&tokens);

        assert!(found[0].line_isolated);
        assert_eq!(&source[found[0].consumed.clone()], "  {% for user in users %}  \n");
        assert!(!found[1].line_isolated);
        assert!(found[2].line_isolated);
        assert_eq!(&source[found[2].consumed.clone()], "{% endfor %}\n");
        assert_eq!(tokens[0], Token::Text("Prefix\n"));
        assert_eq!(reconstruct(source, &tokens), source);
    }

    #[test]
    fn test_isolated_tag_with_crlf() {
        let source = "a\r\n{% if x %}\r\nb\r\n{% endif %}\r\nc";
        let tokens = scan_default(source);
        let found = tags(&tokens);
        assert_eq!(&source[found[0].consumed.clone()], "{% if x %}\r\n");
        assert_eq!(&source[found[1].consumed.clone()], "{% endif %}\r\n");
    }

    #[test]
    fn test_isolated_tag_at_end_of_input() {
        let source = "body\n{% endfor %}  ";
        let tokens = scan_default(source);
        let found = tags(&tokens);
        assert!(found[0].line_isolated);
        assert_eq!(found[0].consumed.end, source.len());
    }

    #[test]
    fn test_interpolation_is_never_isolated() {
        let tokens = scan_default("a\n{{ x }}\nb");
        assert!(!tags(&tokens)[0].line_isolated);
    }

    #[test]
    fn test_statement_run_on_one_line() {
        let source = "a\n{% endif %} {% endfor %}\nb";
        let tokens = scan_default(source);
        let found = tags(&tokens);
        assert!(found[0].line_isolated && found[1].line_isolated);
        assert_eq!(&source[found[0].consumed.clone()], "{% endif %}");
        assert_eq!(&source[found[1].consumed.clone()], " {% endfor %}\n");
        assert_eq!(tokens, {
            let mut expected = vec![Token::Text("a\n")];
            expected.push(Token::Tag(found[0].clone()));
            expected.push(Token::Tag(found[1].clone()));
            expected.push(Token::Text("b"));
            expected
        });
    }

    #[test]
    fn test_statement_sharing_line_with_text_is_inline() {
        let tokens = scan_default("{% if x %}text\n");
        assert!(!tags(&tokens)[0].line_isolated);
    }

    #[test]
    fn test_unknown_statement_stays_text() {
        let source = "{% note info %}\nhello\n{% endnote %}";
        assert_eq!(scan_default(source), vec![Token::Text(source)]);
    }

    #[test]
    fn test_whitespace_control_dashes() {
        let tokens = scan_default("{%- if x -%}y{%- endif -%}");
        let found = tags(&tokens);
        assert_eq!(found[0].kind, TagKind::If);
        assert_eq!(found[0].content, "if x");
        assert_eq!(found[1].kind, TagKind::EndIf);
    }

    #[test]
    fn test_fence_suppresses_tags_by_default() {
        let source = "```\n{% for user in users %} {{user}} {% endfor %}\n```";
        assert_eq!(scan_default(source), vec![Token::Text(source)]);
    }

    #[test]
    fn test_fence_tags_recognized_when_enabled() {
        let source = "```\n{% for user in users %} {{user}} {% endfor %}\n```";
        let settings = Settings {
            conditions_in_code: true,
            ..Settings::default()
        };
        let tokens = scan_with(source, settings);
        let found = tags(&tokens);
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|t| t.inside_fence));
    }

    #[test]
    fn test_unclosed_opener_in_suppressed_fence_is_text() {
        let source = "```\nfn main() { let x = {{;\n```";
        assert_eq!(scan_default(source), vec![Token::Text(source)]);
    }

    #[test]
    fn test_unclosed_tag_is_scan_error() {
        let source = "line one\nsome {{ broken";
        let fences = FenceMap::new(source);
        let err = scan(source, &fences, &Settings::default(), "doc.md").unwrap_err();
        match err {
            LiquidError::Scan {
                origin,
                location,
                opener,
                closer,
                excerpt,
            } => {
                assert_eq!(origin, "doc.md");
                assert_eq!(location.line, 2);
                assert_eq!(location.column, 6);
                assert_eq!(opener, "{{");
                assert_eq!(closer, "}}");
                assert_eq!(excerpt, "{{ broken");
            }
            other => panic!("expected scan error, got {other:?}"),
        }
    }

    #[test]
    fn test_disabled_features_stay_text() {
        let source = "{% if x %}{{ y }}{% endif %}";
        let settings = Settings {
            conditions: false,
            substitutions: false,
            ..Settings::default()
        };
        assert_eq!(scan_with(source, settings), vec![Token::Text(source)]);
    }

    #[test]
    fn test_not_var_escape() {
        let source = "use not_var{{ name }} here";
        let tokens = scan_default(source);
        assert_eq!(
            tokens,
            vec![
                Token::Text("use "),
                Token::Escaped {
                    prefix: "not_var",
                    literal: "{{ name }}",
                },
                Token::Text(" here"),
            ]
        );
        assert_eq!(reconstruct(source, &tokens), source);
    }

    #[test]
    fn test_not_var_kept_when_configured() {
        let source = "not_var{{ name }}";
        let settings = Settings {
            keep_not_var: true,
            ..Settings::default()
        };
        assert_eq!(scan_with(source, settings), vec![Token::Text(source)]);
    }
}
