//! Map between byte offsets and line/column positions in a source file.
//!
//! `syn` reports locations as `proc_macro2::LineColumn` (1-based line, 0-based column counted in characters); the
//! engine and `miette` work with byte offsets.

use peephole_core::Span;
use proc_macro2::LineColumn;

/// Line start offsets of one source file.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, line_starts }
    }

    /// Byte offset of a `LineColumn`, clamped to the end of its line.
    pub fn offset(&self, position: LineColumn) -> usize {
        let Some(&line_start) = position.line.checked_sub(1).and_then(|l| self.line_starts.get(l)) else {
            return self.source.len();
        };
        let line = &self.source[line_start..];
        let line_len = line.find('\n').unwrap_or(line.len());
        line.char_indices()
            .nth(position.column)
            .map(|(i, _)| i.min(line_len))
            .unwrap_or(line_len)
            + line_start
    }

    /// Byte span covered by a `proc_macro2::Span`.
    pub fn span(&self, span: proc_macro2::Span) -> Span {
        Span::new(self.offset(span.start()), self.offset(span.end()))
    }
}

/// Get line number, column number, and line text for a byte offset
pub fn line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    let line_text = &source[line_start..line_end];
    let col_num = source[line_start..offset].chars().count() + 1;

    (line_num, col_num, line_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "struct Hotel {\n    name: String,\n}\n";

    #[test]
    fn test_offset_first_line() {
        let index = LineIndex::new(SOURCE);
        assert_eq!(index.offset(LineColumn { line: 1, column: 7 }), 7);
    }

    #[test]
    fn test_offset_second_line() {
        let index = LineIndex::new(SOURCE);
        // `name` starts at column 4 of line 2
        let offset = index.offset(LineColumn { line: 2, column: 4 });
        assert_eq!(&SOURCE[offset..offset + 4], "name");
    }

    #[test]
    fn test_offset_counts_characters() {
        let source = "// é\nx";
        let index = LineIndex::new(source);
        assert_eq!(index.offset(LineColumn { line: 1, column: 4 }), 5);
        assert_eq!(index.offset(LineColumn { line: 2, column: 0 }), 6);
    }

    #[test]
    fn test_offset_clamps_to_line_end() {
        let index = LineIndex::new(SOURCE);
        assert_eq!(index.offset(LineColumn { line: 1, column: 99 }), 14);
        assert_eq!(index.offset(LineColumn { line: 99, column: 0 }), SOURCE.len());
    }

    #[test]
    fn test_line_info() {
        let (line, col, text) = line_info(SOURCE, 19);
        assert_eq!(line, 2);
        assert_eq!(col, 5);
        assert_eq!(text, "    name: String,");
    }

    #[test]
    fn test_line_info_past_end() {
        let (line, _, text) = line_info(SOURCE, 1000);
        assert_eq!(line, 4);
        assert_eq!(text, "");
    }
}
