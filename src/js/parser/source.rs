use std::cell::OnceCell;
use std::fs;

use super::loc::{calculate_line_offsets, find_line_col_for_pos, Pos};
use super::parse_error::ParseResult;

/// An immutable source text along with the path it was loaded from.
pub struct Source {
    pub file_path: String,
    pub contents: String,
    line_offsets: OnceCell<Vec<usize>>,
}

impl Source {
    pub fn new_from_file(file_path: &str) -> ParseResult<Source> {
        let contents = fs::read_to_string(file_path)?;
        Ok(Source::new_from_string(file_path, contents))
    }

    pub fn new_from_string(file_path: &str, contents: String) -> Source {
        Source { file_path: file_path.to_owned(), contents, line_offsets: OnceCell::new() }
    }

    /// Byte offsets of the start of each line, calculated lazily on first use.
    pub fn line_offsets(&self) -> &[usize] {
        self.line_offsets
            .get_or_init(|| calculate_line_offsets(&self.contents))
    }

    /// 1-indexed line and 0-indexed column for a position in this source.
    pub fn line_col(&self, pos: Pos) -> (usize, usize) {
        find_line_col_for_pos(pos, self.line_offsets())
    }

    /// The full text of the line containing the given position, without its line terminator.
    pub fn line_text(&self, pos: Pos) -> &str {
        let offsets = self.line_offsets();
        let (line, _) = find_line_col_for_pos(pos, offsets);

        let start = offsets[line - 1];
        let end = offsets.get(line).copied().unwrap_or(self.contents.len());

        self.contents[start..end]
            .trim_end_matches(|c| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
    }
}
