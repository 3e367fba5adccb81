use std::ops::Range;

use serde::Serialize;

/// Start and end positions are byte offsets in the source file.
pub type Pos = usize;

/// Half open interval describing a source location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Loc {
    pub start: Pos,
    pub end: Pos,
}

impl Loc {
    pub fn new(start: Pos, end: Pos) -> Loc {
        Loc { start, end }
    }

    pub fn to_range(&self) -> Range<Pos> {
        self.start..self.end
    }

    /// Smallest location containing both locations.
    pub fn to(&self, other: Loc) -> Loc {
        Loc { start: self.start, end: other.end }
    }
}

pub const EMPTY_LOC: Loc = Loc { start: 0, end: 0 };

/// Calculate the byte offsets of the start of each line. Lines are terminated by LF, CR, CRLF,
/// and the unicode line and paragraph separators, matching the lexer's line counting.
pub fn calculate_line_offsets(source: &str) -> Vec<usize> {
    let mut line_offsets = vec![0];

    let mut chars = source.char_indices().peekable();
    while let Some((pos, char)) = chars.next() {
        match char {
            '\r' => {
                if let Some((_, '\n')) = chars.peek() {
                    chars.next();
                    line_offsets.push(pos + 2);
                } else {
                    line_offsets.push(pos + 1);
                }
            }
            '\n' => line_offsets.push(pos + 1),
            '\u{2028}' | '\u{2029}' => line_offsets.push(pos + char.len_utf8()),
            _ => {}
        }
    }

    line_offsets
}

/// Return the 1-indexed line and 0-indexed column number for a Pos, given the set of line start
/// offsets.
pub fn find_line_col_for_pos(pos: Pos, line_offsets: &[usize]) -> (usize, usize) {
    // Binary search to find the largest line start offset that is smaller than the pos. This is
    // the line number.
    let line = find_largest_offset_less_than_or_equal(pos, line_offsets);

    // Column is the byte offset from the start of the line
    let col = pos - line_offsets[line];

    (line + 1, col)
}

fn find_largest_offset_less_than_or_equal(target: Pos, line_offsets: &[usize]) -> usize {
    match line_offsets.binary_search(&target) {
        Ok(index) => index,
        Err(index) => index - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_offsets_for_each_terminator() {
        let offsets = calculate_line_offsets("a\nb\r\nc\rd\u{2028}e");
        assert_eq!(offsets, vec![0, 2, 5, 7, 11]);
    }

    #[test]
    fn line_col_lookup() {
        let offsets = calculate_line_offsets("let x;\nlet y;\n");
        assert_eq!(find_line_col_for_pos(0, &offsets), (1, 0));
        assert_eq!(find_line_col_for_pos(4, &offsets), (1, 4));
        assert_eq!(find_line_col_for_pos(7, &offsets), (2, 0));
        assert_eq!(find_line_col_for_pos(11, &offsets), (2, 4));
    }
}
