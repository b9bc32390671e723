//! Code fence tracking and line bookkeeping.
//!
//! Tag recognition inside fenced code blocks is optional, so the scanner
//! needs to know, for any byte offset, whether it falls on a line that
//! belongs to a fence. The same line table also turns offsets into
//! human-readable locations for error messages.

use std::fmt;

/// Marker that opens and closes a fenced code block.
const FENCE_DELIMITER: &str = "```";

/// A 1-based line/column position in a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Per-line fence classification of a document.
///
/// Built once per scan. A delimiter line counts as inside the fence it
/// opens or closes, there is no nesting (a second delimiter always closes),
/// and an unterminated fence extends to the end of the document.
#[derive(Debug, Clone)]
pub struct FenceMap {
    /// Byte offset at which each line starts.
    line_starts: Vec<usize>,
    /// Whether each line is inside a fence.
    inside: Vec<bool>,
}

impl FenceMap {
    /// Classify every line of `source`.
    pub fn new(source: &str) -> Self {
        let mut line_starts = Vec::new();
        let mut inside = Vec::new();
        let mut in_fence = false;
        let mut start = 0;

        for line in source.split('\n') {
            let is_delimiter = line.trim_start().starts_with(FENCE_DELIMITER);
            if is_delimiter {
                // The delimiter line itself belongs to the fence either way.
                inside.push(true);
                in_fence = !in_fence;
            } else {
                inside.push(in_fence);
            }
            line_starts.push(start);
            start += line.len() + 1;
        }

        Self {
            line_starts,
            inside,
        }
    }

    /// Number of lines in the document (a trailing newline starts an empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based index of the line containing `offset`.
    pub fn line_index(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }

    /// Whether the line containing `offset` is inside a code fence.
    pub fn is_inside(&self, offset: usize) -> bool {
        self.inside
            .get(self.line_index(offset))
            .copied()
            .unwrap_or(false)
    }

    /// Whether the zero-based line `index` is inside a code fence.
    pub fn is_line_inside(&self, index: usize) -> bool {
        self.inside.get(index).copied().unwrap_or(false)
    }

    /// Translate a byte offset into a 1-based location.
    ///
    /// Columns count characters, not bytes.
    pub fn location(&self, source: &str, offset: usize) -> Location {
        let index = self.line_index(offset);
        let line_start = self.line_starts[index];
        let column = source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        Location {
            line: index + 1,
            column: column + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(source: &str) -> Vec<bool> {
        let map = FenceMap::new(source);
        (0..map.line_count()).map(|i| map.is_line_inside(i)).collect()
    }

    #[test]
    fn test_no_fences() {
        assert_eq!(classify("a\nb\nc"), vec![false, false, false]);
    }

    #[test]
    fn test_delimiter_lines_are_inside() {
        assert_eq!(
            classify("before\n```\ncode\n```\nafter"),
            vec![false, true, true, true, false]
        );
    }

    #[test]
    fn test_fence_with_language_and_indent() {
        assert_eq!(
            classify("  ```rust\nlet x = 1;\n  ````\ntext"),
            vec![true, true, true, false]
        );
    }

    #[test]
    fn test_second_delimiter_always_closes() {
        // A delimiter with an info string inside a fence still closes it.
        assert_eq!(
            classify("```\n```js\nafter"),
            vec![true, true, false]
        );
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        assert_eq!(classify("text\n```\ncode\nmore"), vec![false, true, true, true]);
    }

    #[test]
    fn test_two_backticks_do_not_open() {
        assert_eq!(classify("``\ncode"), vec![false, false]);
    }

    #[test]
    fn test_is_inside_by_offset() {
        let source = "a\n```\nb\n```\nc";
        let map = FenceMap::new(source);
        assert!(!map.is_inside(0));
        assert!(map.is_inside(source.find('b').unwrap()));
        assert!(!map.is_inside(source.rfind('c').unwrap()));
    }

    #[test]
    fn test_location() {
        let source = "first\nsecond {{ x }}\n";
        let map = FenceMap::new(source);
        let offset = source.find("{{").unwrap();
        assert_eq!(map.location(source, offset), Location { line: 2, column: 8 });
        assert_eq!(map.location(source, 0).to_string(), "1:1");
    }

    #[test]
    fn test_location_counts_characters() {
        let source = "héllo {{ x }}";
        let map = FenceMap::new(source);
        let offset = source.find("{{").unwrap();
        assert_eq!(map.location(source, offset).column, 7);
    }
}
