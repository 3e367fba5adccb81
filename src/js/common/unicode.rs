use icu_properties::props::{IdContinue, IdStart};
use icu_properties::{CodePointSetData, CodePointSetDataBorrowed};

/// A single unicode code point. Value may be in the surrogate pair range, but is guaranteed to
/// be within the full unicode range [0x0-0x10FFFF].
pub type CodePoint = u32;

/// Highest unicode code point
pub const MAX_CODE_POINT: CodePoint = 0x10FFFF;

/// All code points with the ID_Start property.
const ID_START: CodePointSetDataBorrowed<'static> = CodePointSetData::new::<IdStart>();

/// All code points with the ID_Continue property.
const ID_CONTINUE: CodePointSetDataBorrowed<'static> = CodePointSetData::new::<IdContinue>();

/// Role flags stored in the ASCII lookup table. A code point may have several roles, e.g. `7` is
/// a decimal, hex, and octal digit as well as an identifier part.
mod flags {
    pub const DECIMAL_DIGIT: u16 = 1 << 0;
    pub const HEX_DIGIT: u16 = 1 << 1;
    pub const OCTAL_DIGIT: u16 = 1 << 2;
    pub const BINARY_DIGIT: u16 = 1 << 3;
    pub const ID_START: u16 = 1 << 4;
    pub const ID_PART: u16 = 1 << 5;
    pub const WHITESPACE: u16 = 1 << 6;
    pub const LINE_TERMINATOR: u16 = 1 << 7;
    pub const NUMERIC_SEPARATOR: u16 = 1 << 8;
    pub const QUOTE: u16 = 1 << 9;
}

const fn build_ascii_table() -> [u16; 128] {
    let mut table = [0; 128];

    let mut i = 0;
    while i < 128 {
        let c = i as u8;
        let mut role = 0;

        if c >= b'0' && c <= b'9' {
            role |= flags::DECIMAL_DIGIT | flags::HEX_DIGIT | flags::ID_PART;
            if c <= b'7' {
                role |= flags::OCTAL_DIGIT;
            }
            if c <= b'1' {
                role |= flags::BINARY_DIGIT;
            }
        }

        if (c >= b'a' && c <= b'f') || (c >= b'A' && c <= b'F') {
            role |= flags::HEX_DIGIT;
        }

        if (c >= b'a' && c <= b'z') || (c >= b'A' && c <= b'Z') || c == b'$' || c == b'_' {
            role |= flags::ID_START | flags::ID_PART;
        }

        if c == b'_' {
            role |= flags::NUMERIC_SEPARATOR;
        }

        // Space, tab, vertical tab, and form feed
        if c == b' ' || c == b'\t' || c == 0x0B || c == 0x0C {
            role |= flags::WHITESPACE;
        }

        if c == b'\n' || c == b'\r' {
            role |= flags::LINE_TERMINATOR;
        }

        if c == b'"' || c == b'\'' || c == b'`' {
            role |= flags::QUOTE;
        }

        table[i] = role;
        i += 1;
    }

    table
}

/// Lookup table of role flags for every ASCII code point.
static ASCII_TABLE: [u16; 128] = build_ascii_table();

#[inline]
fn has_ascii_role(code_point: CodePoint, role: u16) -> bool {
    match ASCII_TABLE.get(code_point as usize) {
        Some(flags) => flags & role != 0,
        None => false,
    }
}

#[inline]
pub fn is_ascii(code_point: CodePoint) -> bool {
    code_point < 0x80
}

#[inline]
pub fn is_decimal_digit(code_point: CodePoint) -> bool {
    has_ascii_role(code_point, flags::DECIMAL_DIGIT)
}

#[inline]
pub fn is_numeric_separator(code_point: CodePoint) -> bool {
    has_ascii_role(code_point, flags::NUMERIC_SEPARATOR)
}

#[inline]
pub fn is_quote(code_point: CodePoint) -> bool {
    has_ascii_role(code_point, flags::QUOTE)
}

#[inline]
pub fn is_ascii_whitespace(code_point: CodePoint) -> bool {
    has_ascii_role(code_point, flags::WHITESPACE)
}

pub fn is_unicode_whitespace(code_point: CodePoint) -> bool {
    match code_point {
        // All non-ascii code points in the unicode Space_Separator category
        0x00A0 | 0x1680 | 0x2000..=0x200A | 0x202F | 0x205F | 0x3000 => true,
        // Zero width non breaking space
        0xFEFF => true,
        _ => false,
    }
}

#[inline]
pub fn is_whitespace(code_point: CodePoint) -> bool {
    is_ascii_whitespace(code_point) || is_unicode_whitespace(code_point)
}

#[inline]
pub fn is_ascii_newline(code_point: CodePoint) -> bool {
    has_ascii_role(code_point, flags::LINE_TERMINATOR)
}

/// Line separator and paragraph separator
#[inline]
pub fn is_unicode_newline(code_point: CodePoint) -> bool {
    code_point == 0x2028 || code_point == 0x2029
}

#[inline]
pub fn is_newline(code_point: CodePoint) -> bool {
    is_ascii_newline(code_point) || is_unicode_newline(code_point)
}

/// Line terminators as named by the grammar, identical to `is_newline`.
#[inline]
pub fn is_line_terminator(code_point: CodePoint) -> bool {
    is_newline(code_point)
}

pub fn get_binary_value(code_point: CodePoint) -> Option<u32> {
    if has_ascii_role(code_point, flags::BINARY_DIGIT) {
        Some(code_point - '0' as u32)
    } else {
        None
    }
}

pub fn get_octal_value(code_point: CodePoint) -> Option<u32> {
    if has_ascii_role(code_point, flags::OCTAL_DIGIT) {
        Some(code_point - '0' as u32)
    } else {
        None
    }
}

pub fn get_hex_value(code_point: CodePoint) -> Option<u32> {
    if !has_ascii_role(code_point, flags::HEX_DIGIT) {
        return None;
    }

    match code_point {
        0x30..=0x39 => Some(code_point - '0' as u32),
        0x61..=0x66 => Some(code_point - 'a' as u32 + 10),
        _ => Some(code_point - 'A' as u32 + 10),
    }
}

/// Can this code point appear as the first code point of an identifier.
#[inline]
pub fn is_id_start_ascii(code_point: CodePoint) -> bool {
    has_ascii_role(code_point, flags::ID_START)
}

/// Can this code point appear in an identifier (after the first code point).
#[inline]
pub fn is_id_part_ascii(code_point: CodePoint) -> bool {
    has_ascii_role(code_point, flags::ID_PART)
}

#[inline]
pub fn is_id_start_unicode(code_point: CodePoint) -> bool {
    ID_START.contains32(code_point)
}

#[inline]
pub fn is_id_part_unicode(code_point: CodePoint) -> bool {
    // Either part of the unicode ID_Continue, ZWNJ, or ZWJ
    ID_CONTINUE.contains32(code_point) || code_point == 0x200C || code_point == 0x200D
}

#[inline]
pub fn is_id_start(code_point: CodePoint) -> bool {
    if is_ascii(code_point) {
        is_id_start_ascii(code_point)
    } else {
        is_id_start_unicode(code_point)
    }
}

#[inline]
pub fn is_id_part(code_point: CodePoint) -> bool {
    if is_ascii(code_point) {
        is_id_part_ascii(code_point)
    } else {
        is_id_part_unicode(code_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_values() {
        assert_eq!(get_hex_value('f' as u32), Some(15));
        assert_eq!(get_hex_value('F' as u32), Some(15));
        assert_eq!(get_hex_value('9' as u32), Some(9));
        assert_eq!(get_hex_value('g' as u32), None);
        assert_eq!(get_octal_value('7' as u32), Some(7));
        assert_eq!(get_octal_value('8' as u32), None);
        assert_eq!(get_binary_value('1' as u32), Some(1));
        assert_eq!(get_binary_value('2' as u32), None);
        assert_eq!(get_hex_value(0x1F600), None);
    }

    #[test]
    fn identifier_classes() {
        assert!(is_id_start('$' as u32));
        assert!(is_id_start('_' as u32));
        assert!(!is_id_start('1' as u32));
        assert!(is_id_part('1' as u32));
        assert!(is_id_start('\u{00E9}' as u32));
        assert!(is_id_start('\u{4E2D}' as u32));
        assert!(is_id_part(0x200D));
        assert!(!is_id_start(0x200D));
    }

    #[test]
    fn separators_and_terminators() {
        assert!(is_numeric_separator('_' as u32));
        assert!(is_newline(0x2028));
        assert!(is_newline('\r' as u32));
        assert!(!is_newline(' ' as u32));
        assert!(is_whitespace(0xFEFF));
        assert!(is_whitespace(0x0B));
        assert!(is_quote('`' as u32));
    }
}
