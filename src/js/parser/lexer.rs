use std::rc::Rc;
use std::str::FromStr;

use num_bigint::BigInt;

use crate::common::unicode::{
    get_binary_value, get_hex_value, get_octal_value, is_ascii, is_ascii_newline,
    is_ascii_whitespace, is_decimal_digit, is_id_part, is_id_part_ascii, is_id_start,
    is_id_start_ascii, is_line_terminator, is_unicode_newline, is_unicode_whitespace, CodePoint,
    MAX_CODE_POINT,
};

use super::context::Context;
use super::diagnostic::{Diagnostic, DiagnosticCode};
use super::loc::{Loc, Pos};
use super::source::Source;
use super::token::{TemplatePart, Token};

pub struct Lexer<'a> {
    pub source: &'a Rc<Source>,
    buf: &'a str,
    current: char,
    pos: Pos,
    /// 1-indexed line number of the current position
    line: usize,
    /// Byte offset of the start of the current line
    line_start: Pos,
    is_new_line_before_current: bool,
    /// Whether the most recently lexed identifier contained an escape sequence
    has_escape: bool,
    /// Diagnostics recorded since the parser last drained them
    diagnostics: Vec<Diagnostic>,
}

/// A save point for the lexer, can be used to restore the lexer to a particular position.
#[derive(Clone)]
pub struct SavedLexerState {
    current: char,
    pos: Pos,
    line: usize,
    line_start: Pos,
    is_new_line_before_current: bool,
    has_escape: bool,
    num_diagnostics: usize,
}

type LexResult = (Token, Loc);

/// A malformed escape sequence, with the location and code that describe it.
type EscapeResult<T> = Result<T, (Loc, DiagnosticCode)>;

/// Character that marks an EOF. Only treated as EOF when the position is at the end of the buffer.
const EOF_CHAR: char = '\u{ffff}';

/// Flags accepted after a regular expression body.
const REGEXP_FLAGS: &str = "dgimsuvy";

impl<'a> Lexer<'a> {
    pub fn new(source: &'a Rc<Source>) -> Lexer<'a> {
        let buf = source.contents.as_str();
        let current = buf.chars().next().unwrap_or(EOF_CHAR);

        Lexer {
            source,
            buf,
            current,
            pos: 0,
            line: 1,
            line_start: 0,
            is_new_line_before_current: false,
            has_escape: false,
            diagnostics: vec![],
        }
    }

    pub fn save(&self) -> SavedLexerState {
        SavedLexerState {
            current: self.current,
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
            is_new_line_before_current: self.is_new_line_before_current,
            has_escape: self.has_escape,
            num_diagnostics: self.diagnostics.len(),
        }
    }

    pub fn restore(&mut self, save_state: &SavedLexerState) {
        self.current = save_state.current;
        self.pos = save_state.pos;
        self.line = save_state.line;
        self.line_start = save_state.line_start;
        self.is_new_line_before_current = save_state.is_new_line_before_current;
        self.has_escape = save_state.has_escape;
        self.diagnostics.truncate(save_state.num_diagnostics);
    }

    pub fn is_new_line_before_current(&self) -> bool {
        self.is_new_line_before_current
    }

    /// Whether the identifier token that was just lexed contained a unicode escape sequence.
    pub fn has_escape(&self) -> bool {
        self.has_escape
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn line_start(&self) -> Pos {
        self.line_start
    }

    /// Remove and return every diagnostic recorded since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    fn char_at(&self, pos: Pos) -> char {
        self.buf
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or(EOF_CHAR)
    }

    /// Move the cursor to an arbitrary character boundary within the current line.
    fn reset_to(&mut self, pos: Pos) {
        self.pos = pos.min(self.buf.len());
        self.current = self.char_at(self.pos);
    }

    #[inline]
    fn advance(&mut self) {
        if !self.is_eof() {
            self.pos += self.current.len_utf8();
            self.current = self.char_at(self.pos);
        }
    }

    /// Advance over `n` ASCII characters.
    #[inline]
    fn advance_n(&mut self, n: usize) {
        self.reset_to(self.pos + n);
    }

    fn advance2(&mut self) {
        self.advance_n(2);
    }

    fn advance3(&mut self) {
        self.advance_n(3);
    }

    fn advance4(&mut self) {
        self.advance_n(4);
    }

    #[inline]
    fn peek_n(&self, n: usize) -> char {
        self.char_at(self.pos + n)
    }

    fn peek(&self) -> char {
        self.peek_n(1)
    }

    fn peek2(&self) -> char {
        self.peek_n(2)
    }

    fn peek3(&self) -> char {
        self.peek_n(3)
    }

    fn mark_loc(&self, start_pos: Pos) -> Loc {
        Loc { start: start_pos, end: self.pos }
    }

    fn emit(&self, token: Token, start_pos: Pos) -> LexResult {
        (token, self.mark_loc(start_pos))
    }

    fn error(&mut self, loc: Loc, code: DiagnosticCode) {
        self.diagnostics.push(Diagnostic::new(code, loc));
    }

    fn error_with_arg(&mut self, loc: Loc, code: DiagnosticCode, arg: &str) {
        self.diagnostics.push(Diagnostic::with_arg(code, loc, arg));
    }

    /// Consume the line terminator at the cursor, treating CRLF as a single line break.
    fn consume_line_terminator(&mut self) {
        if self.current == '\r' && self.peek() == '\n' {
            self.advance2();
        } else {
            self.advance();
        }

        self.line += 1;
        self.line_start = self.pos;
    }

    pub fn next(&mut self, ctx: Context) -> LexResult {
        self.is_new_line_before_current = false;
        self.has_escape = false;

        loop {
            // Fast pass for skipping ASCII whitespace and newlines
            loop {
                if is_ascii_whitespace(self.current as CodePoint) {
                    self.advance();
                } else if is_ascii_newline(self.current as CodePoint) {
                    self.is_new_line_before_current = true;
                    self.consume_line_terminator();
                } else {
                    break;
                }
            }

            let start_pos = self.pos;

            return match self.current {
                '+' => match self.peek() {
                    '+' => {
                        self.advance2();
                        self.emit(Token::Increment, start_pos)
                    }
                    '=' => {
                        self.advance2();
                        self.emit(Token::AddEq, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::Plus, start_pos)
                    }
                },
                '-' => match self.peek() {
                    // HTML close comment is only recognized at the start of a line
                    '-' if self.peek2() == '>'
                        && self.allow_html_comments(ctx)
                        && (self.is_new_line_before_current || start_pos == 0) =>
                    {
                        self.advance3();
                        self.skip_line_comment();
                        continue;
                    }
                    '-' => {
                        self.advance2();
                        self.emit(Token::Decrement, start_pos)
                    }
                    '=' => {
                        self.advance2();
                        self.emit(Token::SubtractEq, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::Minus, start_pos)
                    }
                },
                '*' => match self.peek() {
                    '*' => match self.peek2() {
                        '=' => {
                            self.advance3();
                            self.emit(Token::ExponentEq, start_pos)
                        }
                        _ => {
                            self.advance2();
                            self.emit(Token::Exponent, start_pos)
                        }
                    },
                    '=' => {
                        self.advance2();
                        self.emit(Token::MultiplyEq, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::Multiply, start_pos)
                    }
                },
                '/' => match self.peek() {
                    '/' => {
                        self.advance2();
                        self.skip_line_comment();
                        continue;
                    }
                    '*' => {
                        self.advance2();
                        self.skip_block_comment(start_pos);
                        continue;
                    }
                    '=' => {
                        self.advance2();
                        self.emit(Token::DivideEq, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::Divide, start_pos)
                    }
                },
                '%' => match self.peek() {
                    '=' => {
                        self.advance2();
                        self.emit(Token::RemainderEq, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::Remainder, start_pos)
                    }
                },
                '&' => match self.peek() {
                    '&' => match self.peek2() {
                        '=' => {
                            self.advance3();
                            self.emit(Token::LogicalAndEq, start_pos)
                        }
                        _ => {
                            self.advance2();
                            self.emit(Token::LogicalAnd, start_pos)
                        }
                    },
                    '=' => {
                        self.advance2();
                        self.emit(Token::AndEq, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::BitwiseAnd, start_pos)
                    }
                },
                '|' => match self.peek() {
                    '|' => match self.peek2() {
                        '=' => {
                            self.advance3();
                            self.emit(Token::LogicalOrEq, start_pos)
                        }
                        _ => {
                            self.advance2();
                            self.emit(Token::LogicalOr, start_pos)
                        }
                    },
                    '=' => {
                        self.advance2();
                        self.emit(Token::OrEq, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::BitwiseOr, start_pos)
                    }
                },
                '?' => match self.peek() {
                    '?' => match self.peek2() {
                        '=' => {
                            self.advance3();
                            self.emit(Token::NullishCoalesceEq, start_pos)
                        }
                        _ => {
                            self.advance2();
                            self.emit(Token::NullishCoalesce, start_pos)
                        }
                    },
                    // ?.d is parsed as a question mark followed by a decimal literal
                    '.' if !is_decimal_digit(self.peek2() as CodePoint) => {
                        self.advance2();
                        self.emit(Token::QuestionDot, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::Question, start_pos)
                    }
                },
                '^' => match self.peek() {
                    '=' => {
                        self.advance2();
                        self.emit(Token::XorEq, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::BitwiseXor, start_pos)
                    }
                },
                '>' => match self.peek() {
                    '>' => match self.peek2() {
                        '>' => match self.peek3() {
                            '=' => {
                                self.advance4();
                                self.emit(Token::ShiftRightLogicalEq, start_pos)
                            }
                            _ => {
                                self.advance3();
                                self.emit(Token::ShiftRightLogical, start_pos)
                            }
                        },
                        '=' => {
                            self.advance3();
                            self.emit(Token::ShiftRightArithmeticEq, start_pos)
                        }
                        _ => {
                            self.advance2();
                            self.emit(Token::ShiftRightArithmetic, start_pos)
                        }
                    },
                    '=' => {
                        self.advance2();
                        self.emit(Token::GreaterThanOrEqual, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::GreaterThan, start_pos)
                    }
                },
                '<' => match self.peek() {
                    '!' if self.peek2() == '-'
                        && self.peek3() == '-'
                        && self.allow_html_comments(ctx) =>
                    {
                        self.advance4();
                        self.skip_line_comment();
                        continue;
                    }
                    '<' => match self.peek2() {
                        '=' => {
                            self.advance3();
                            self.emit(Token::ShiftLeftEq, start_pos)
                        }
                        _ => {
                            self.advance2();
                            self.emit(Token::ShiftLeft, start_pos)
                        }
                    },
                    '=' => {
                        self.advance2();
                        self.emit(Token::LessThanOrEqual, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::LessThan, start_pos)
                    }
                },
                '~' => {
                    self.advance();
                    self.emit(Token::BitwiseNot, start_pos)
                }
                '=' => match self.peek() {
                    '=' => match self.peek2() {
                        '=' => {
                            self.advance3();
                            self.emit(Token::EqEqEq, start_pos)
                        }
                        _ => {
                            self.advance2();
                            self.emit(Token::EqEq, start_pos)
                        }
                    },
                    '>' => {
                        self.advance2();
                        self.emit(Token::Arrow, start_pos)
                    }
                    _ => {
                        self.advance();
                        self.emit(Token::Equals, start_pos)
                    }
                },
                '!' => match self.peek() {
                    '=' => match self.peek2() {
                        '=' => {
                            self.advance3();
                            self.emit(Token::NotEqEq, start_pos)
                        }
                        _ => {
                            self.advance2();
                            self.emit(Token::NotEq, start_pos)
                        }
                    },
                    _ => {
                        self.advance();
                        self.emit(Token::LogicalNot, start_pos)
                    }
                },
                '(' => {
                    self.advance();
                    self.emit(Token::LeftParen, start_pos)
                }
                ')' => {
                    self.advance();
                    self.emit(Token::RightParen, start_pos)
                }
                '{' => {
                    self.advance();
                    self.emit(Token::LeftBrace, start_pos)
                }
                '}' => {
                    self.advance();
                    self.emit(Token::RightBrace, start_pos)
                }
                '[' => {
                    self.advance();
                    self.emit(Token::LeftBracket, start_pos)
                }
                ']' => {
                    self.advance();
                    self.emit(Token::RightBracket, start_pos)
                }
                ';' => {
                    self.advance();
                    self.emit(Token::Semicolon, start_pos)
                }
                ',' => {
                    self.advance();
                    self.emit(Token::Comma, start_pos)
                }
                '.' => {
                    let next_char = self.peek();
                    if next_char == '.' && self.peek2() == '.' {
                        self.advance3();
                        self.emit(Token::Spread, start_pos)
                    } else if is_decimal_digit(next_char as CodePoint) {
                        let token = self.lex_decimal_literal(start_pos, false);
                        self.error_if_cannot_follow_numeric_literal();
                        self.emit(token, start_pos)
                    } else {
                        self.advance();
                        self.emit(Token::Period, start_pos)
                    }
                }
                ':' => {
                    self.advance();
                    self.emit(Token::Colon, start_pos)
                }
                '#' => {
                    // Parse hashbang comment if it starts at the first byte in the file
                    if self.pos == 0 && self.peek() == '!' {
                        self.advance2();
                        self.skip_line_comment();
                        continue;
                    }

                    let next_char = self.peek();
                    if is_id_start(next_char as CodePoint) || next_char == '\\' {
                        self.advance();
                        let name = self.lex_identifier_name(self.pos);
                        self.has_escape = false;
                        self.emit(Token::PrivateName(name), start_pos)
                    } else {
                        self.advance();
                        let loc = self.mark_loc(start_pos);
                        self.error(loc, DiagnosticCode::InvalidCharacter);
                        continue;
                    }
                }
                '0'..='9' => {
                    let token = self.lex_numeric_literal(ctx, start_pos);
                    self.error_if_cannot_follow_numeric_literal();
                    self.emit(token, start_pos)
                }
                '"' | '\'' => self.lex_string_literal(ctx),
                '`' => {
                    self.advance();
                    self.lex_template_literal(start_pos, true)
                }
                EOF_CHAR if self.is_eof() => self.emit(Token::Eof, start_pos),
                char if is_id_start_ascii(char as CodePoint) => {
                    self.lex_identifier_ascii(start_pos)
                }
                // Escape sequence at the start of an identifier
                '\\' => self.lex_identifier(start_pos),
                other => {
                    let code_point = other as CodePoint;
                    if is_ascii(code_point) {
                        self.advance();
                        let loc = self.mark_loc(start_pos);
                        self.error(loc, DiagnosticCode::InvalidCharacter);
                        continue;
                    } else if is_id_start(code_point) {
                        self.lex_identifier(start_pos)
                    } else if is_unicode_whitespace(code_point) {
                        self.advance();
                        continue;
                    } else if is_unicode_newline(code_point) {
                        self.is_new_line_before_current = true;
                        self.consume_line_terminator();
                        continue;
                    } else {
                        self.advance();
                        let loc = self.mark_loc(start_pos);
                        self.error(loc, DiagnosticCode::InvalidCharacter);
                        continue;
                    }
                }
            };
        }
    }

    /// HTML-like comments are an Annex B extension that only applies to scripts.
    fn allow_html_comments(&self, ctx: Context) -> bool {
        ctx.contains(Context::WEB_COMPAT) && !ctx.is_module()
    }

    /// Skip to the end of the line. The line terminator itself is left for the whitespace pass.
    fn skip_line_comment(&mut self) {
        while !self.is_eof() && !is_line_terminator(self.current as CodePoint) {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self, start_pos: Pos) {
        loop {
            match self.current {
                '*' if self.peek() == '/' => {
                    self.advance2();
                    return;
                }
                EOF_CHAR if self.is_eof() => {
                    let loc = self.mark_loc(start_pos);
                    self.error(loc, DiagnosticCode::UnclosedComment);
                    return;
                }
                other if is_line_terminator(other as CodePoint) => {
                    self.is_new_line_before_current = true;
                    self.consume_line_terminator();
                }
                _ => self.advance(),
            }
        }
    }

    fn lex_numeric_literal(&mut self, ctx: Context, start_pos: Pos) -> Token {
        if self.current != '0' {
            return self.lex_decimal_literal(start_pos, false);
        }

        match self.peek() {
            'x' | 'X' => {
                self.lex_literal_with_base(16, get_hex_value, DiagnosticCode::HexSequenceNoDigits, None)
            }
            'o' | 'O' => self.lex_literal_with_base(
                8,
                get_octal_value,
                DiagnosticCode::OctalSequenceNoDigits,
                Some(DiagnosticCode::OctalSequence),
            ),
            'b' | 'B' => self.lex_literal_with_base(
                2,
                get_binary_value,
                DiagnosticCode::BinarySequenceNoDigits,
                Some(DiagnosticCode::BinarySequence),
            ),
            '0'..='7' => self.lex_legacy_octal_literal(ctx, start_pos),
            '8' | '9' => self.lex_leading_zero_decimal_literal(ctx, start_pos),
            _ => self.lex_decimal_literal(start_pos, true),
        }
    }

    /// Skip a series of decimal digits, possibly separated by numeric separators. Numeric
    /// separators must be adjacent to a numeric digit on both sides.
    ///
    /// Return the number of digits and whether any numeric separator was encountered.
    fn skip_decimal_digits(&mut self, allow_numeric_separator: bool) -> (usize, bool) {
        let mut num_digits = 0;
        let mut has_numeric_separator = false;
        let mut is_last_char_numeric_separator = false;

        loop {
            if is_decimal_digit(self.current as CodePoint) {
                num_digits += 1;
                is_last_char_numeric_separator = false;
            } else if self.current == '_' && num_digits > 0 {
                let loc = Loc::new(self.pos, self.pos + 1);
                if !allow_numeric_separator {
                    self.error(loc, DiagnosticCode::UnderscoreAfterZero);
                } else if is_last_char_numeric_separator {
                    self.error(loc, DiagnosticCode::ContinuousNumericSeparator);
                }

                has_numeric_separator = true;
                is_last_char_numeric_separator = true;
            } else {
                break;
            }

            self.advance();
        }

        // Last digit cannot be a separator
        if is_last_char_numeric_separator && allow_numeric_separator {
            let loc = Loc::new(self.pos - 1, self.pos);
            self.error(loc, DiagnosticCode::TrailingNumericSeparator);
        }

        (num_digits, has_numeric_separator)
    }

    /// Lex a decimal literal starting at either a digit or a decimal point. Literals with a leading
    /// zero do not allow numeric separators or a BigInt suffix in their integer part.
    fn lex_decimal_literal(&mut self, start_pos: Pos, has_leading_zero: bool) -> Token {
        let mut has_numeric_separator = false;
        let mut is_integer = true;

        // Read optional digits before the decimal point
        let (_, has_separator) = self.skip_decimal_digits(!has_leading_zero);
        has_numeric_separator |= has_separator;

        // Read optional decimal point with its optional following digits
        if self.current == '.' {
            self.advance();
            is_integer = false;

            let (_, has_separator) = self.skip_decimal_digits(true);
            has_numeric_separator |= has_separator;
        }

        // Read optional exponent. Without digits the exponent does not contribute to the value.
        let mut end_pos = self.pos;
        if self.current == 'e' || self.current == 'E' {
            self.advance();
            is_integer = false;

            // Exponent has optional sign
            if self.current == '-' || self.current == '+' {
                self.advance();
            }

            let (num_digits, has_separator) = self.skip_decimal_digits(true);
            has_numeric_separator |= has_separator;

            if num_digits == 0 {
                let loc = self.mark_loc(start_pos);
                self.error(loc, DiagnosticCode::MissingExponent);
            } else {
                end_pos = self.pos;
            }
        }

        let digits = &self.buf[start_pos..end_pos];

        // This is a bigint literal
        if self.current == 'n' {
            self.advance();

            // BigInts do not allow a fraction, exponent, or leading zeros
            let is_single_zero = has_leading_zero && digits == "0";
            if !is_integer || (has_leading_zero && !is_single_zero) {
                let loc = self.mark_loc(start_pos);
                self.error(loc, DiagnosticCode::InvalidBigIntLiteral);
            } else {
                return Token::BigIntLiteral(parse_bigint(digits, 10));
            }
        }

        // Fast path for small integers accumulates the value directly, otherwise defer to float
        // parsing which handles fractions, exponents, and rounding of large values.
        let value = if is_integer && digits.len() <= 15 {
            digits
                .bytes()
                .filter(|byte| *byte != b'_')
                .fold(0.0, |value, byte| value * 10.0 + (byte - b'0') as f64)
        } else if has_numeric_separator {
            parse_float(&digits.replace('_', ""))
        } else {
            parse_float(digits)
        };

        Token::NumberLiteral(value)
    }

    #[inline]
    fn lex_literal_with_base(
        &mut self,
        base: u32,
        char_to_digit: fn(CodePoint) -> Option<u32>,
        no_digits_code: DiagnosticCode,
        invalid_digit_code: Option<DiagnosticCode>,
    ) -> Token {
        let start_pos = self.pos;
        self.advance2();

        let mut value: f64 = 0.0;
        let mut num_digits = 0;

        // Digits may be separated by numeric separators
        let mut is_last_char_numeric_separator = false;
        loop {
            if let Some(digit) = char_to_digit(self.current as CodePoint) {
                value = value * base as f64 + digit as f64;
                num_digits += 1;
                is_last_char_numeric_separator = false;
            } else if self.current == '_' {
                let loc = Loc::new(self.pos, self.pos + 1);
                if is_last_char_numeric_separator {
                    self.error(loc, DiagnosticCode::ContinuousNumericSeparator);
                } else if num_digits == 0 {
                    self.error(loc, DiagnosticCode::TrailingNumericSeparator);
                }

                is_last_char_numeric_separator = true;
            } else if let (Some(code), true) =
                (invalid_digit_code, is_decimal_digit(self.current as CodePoint))
            {
                // A decimal digit outside the radix, consume the rest of the digit run
                let loc = Loc::new(self.pos, self.pos + 1);
                self.error(loc, code);

                while is_decimal_digit(self.current as CodePoint) {
                    self.advance();
                }

                break;
            } else {
                break;
            }

            self.advance()
        }

        // Last digit cannot be a separator
        if is_last_char_numeric_separator {
            let loc = Loc::new(self.pos - 1, self.pos);
            self.error(loc, DiagnosticCode::TrailingNumericSeparator);
        }

        if num_digits == 0 {
            let loc = self.mark_loc(start_pos);
            self.error(loc, no_digits_code);
        }

        if self.current == 'n' {
            let digits = &self.buf[(start_pos + 2)..self.pos];
            let value = parse_bigint(digits, base);
            self.advance();

            return Token::BigIntLiteral(value);
        }

        Token::NumberLiteral(value)
    }

    fn lex_legacy_octal_literal(&mut self, ctx: Context, start_pos: Pos) -> Token {
        // Skip the leading zero
        self.advance();

        let mut value: f64 = 0.0;
        while let Some(digit) = get_octal_value(self.current as CodePoint) {
            value = value * 8.0 + digit as f64;
            self.advance();
        }

        // Reparse as decimal literal if we encounter a digit outside octal range
        if self.current == '8' || self.current == '9' {
            self.reset_to(start_pos);
            return self.lex_leading_zero_decimal_literal(ctx, start_pos);
        }

        if ctx.is_strict() {
            let loc = self.mark_loc(start_pos);
            self.error(loc, DiagnosticCode::StrictOctal);
        }

        if self.current == '_' {
            let loc = Loc::new(self.pos, self.pos + 1);
            self.error(loc, DiagnosticCode::UnderscoreAfterZero);

            while self.current == '_' || is_decimal_digit(self.current as CodePoint) {
                self.advance();
            }
        }

        if self.current == 'n' {
            self.advance();
            let loc = self.mark_loc(start_pos);
            self.error(loc, DiagnosticCode::InvalidBigIntLiteral);
        }

        Token::NumberLiteral(value)
    }

    /// A decimal literal with a leading zero such as `08`, which is a legacy feature.
    fn lex_leading_zero_decimal_literal(&mut self, ctx: Context, start_pos: Pos) -> Token {
        let token = self.lex_decimal_literal(start_pos, true);

        let loc = self.mark_loc(start_pos);
        if ctx.is_strict() {
            self.error(loc, DiagnosticCode::StrictOctal);
        } else {
            self.error(loc, DiagnosticCode::LegacyLeadingZero);
        }

        token
    }

    fn error_if_cannot_follow_numeric_literal(&mut self) {
        if self.is_eof() {
            return;
        }

        let code_point = self.current as CodePoint;
        if is_id_start(code_point) || is_decimal_digit(code_point) || self.current == '\\' {
            let loc = Loc::new(self.pos, self.pos + self.current.len_utf8());
            self.error(loc, DiagnosticCode::IdafterNumber);
        }
    }

    fn lex_string_literal(&mut self, ctx: Context) -> LexResult {
        let quote_char = self.current;
        let start_pos = self.pos;
        self.advance();

        let mut value = String::new();

        loop {
            match self.current {
                // Escape sequences
                '\\' => {
                    let escape_start_pos = self.pos;

                    match self.peek() {
                        // Null character escape
                        '0' if !is_decimal_digit(self.peek2() as CodePoint) => {
                            value.push('\x00');
                            self.advance2()
                        }
                        // Legacy octal escape
                        first_digit @ ('0'..='7') => {
                            self.advance();

                            let mut octal_value = first_digit as u32 - '0' as u32;
                            self.advance();

                            if let Some(next_digit) = get_octal_value(self.current as CodePoint) {
                                octal_value = octal_value * 8 + next_digit;
                                self.advance();

                                if first_digit <= '3' {
                                    if let Some(next_digit) =
                                        get_octal_value(self.current as CodePoint)
                                    {
                                        octal_value = octal_value * 8 + next_digit;
                                        self.advance();
                                    }
                                }
                            }

                            if ctx.is_strict() {
                                let loc = self.mark_loc(escape_start_pos);
                                self.error(loc, DiagnosticCode::StrictOctalEscape);
                            }

                            push_code_point(&mut value, octal_value);
                        }
                        // Legacy non-octal escape
                        char @ ('8' | '9') => {
                            self.advance2();

                            if ctx.is_strict() {
                                let loc = self.mark_loc(escape_start_pos);
                                self.error(loc, DiagnosticCode::InvalidEightAndNine);
                            }

                            value.push(char)
                        }
                        // Hex escape sequence
                        'x' => {
                            self.advance2();

                            match self.lex_hex_escape_sequence(escape_start_pos) {
                                Ok(code_point) => push_code_point(&mut value, code_point),
                                Err((loc, code)) => self.error(loc, code),
                            }
                        }
                        // Unicode escape sequence
                        'u' => {
                            self.advance2();

                            match self.lex_unicode_escape_sequence_pair(escape_start_pos) {
                                Ok(code_point) => push_code_point(&mut value, code_point),
                                Err((loc, code)) => self.error(loc, code),
                            }
                        }
                        // Line continuations are ignored in string value
                        next if is_line_terminator(next as CodePoint) => {
                            self.advance();
                            self.consume_line_terminator();
                        }
                        EOF_CHAR if self.pos + 1 >= self.buf.len() => {
                            self.advance();
                        }
                        other => {
                            self.advance();
                            self.advance();
                            value.push(single_character_escape(other));
                        }
                    }
                }
                // Unterminated string literal, keeping the partial value
                '\n' | '\r' => {
                    let loc = self.mark_loc(start_pos);
                    self.error(loc, DiagnosticCode::UnterminatedString);
                    break;
                }
                EOF_CHAR if self.is_eof() => {
                    let loc = self.mark_loc(start_pos);
                    self.error(loc, DiagnosticCode::UnterminatedString);
                    break;
                }
                quote if quote == quote_char => {
                    self.advance();
                    break;
                }
                // Line and paragraph separators are allowed within strings
                other if is_unicode_newline(other as CodePoint) => {
                    value.push(other);
                    self.consume_line_terminator();
                }
                other => {
                    value.push(other);
                    self.advance();
                }
            }
        }

        self.emit(Token::StringLiteral(value), start_pos)
    }

    // Lex a regexp literal. Must be called when the current token is a `/` or `/=` starting at
    // the given position.
    pub fn next_regexp_literal(&mut self, start_pos: Pos) -> LexResult {
        self.reset_to(start_pos + 1);
        let pattern_start_pos = self.pos;

        let mut in_class = false;
        let pattern_end_pos;

        loop {
            match self.current {
                '/' if !in_class => {
                    pattern_end_pos = self.pos;
                    self.advance();
                    break;
                }
                '[' => {
                    in_class = true;
                    self.advance();
                }
                ']' => {
                    in_class = false;
                    self.advance();
                }
                '\\' => {
                    self.advance();
                    if self.is_eof() || is_line_terminator(self.current as CodePoint) {
                        continue;
                    }

                    self.advance();
                }
                EOF_CHAR if self.is_eof() => {
                    pattern_end_pos = self.pos;
                    let loc = self.mark_loc(start_pos);
                    self.error(loc, DiagnosticCode::UnterminatedRegExp);
                    break;
                }
                other if is_line_terminator(other as CodePoint) => {
                    pattern_end_pos = self.pos;
                    let loc = self.mark_loc(start_pos);
                    self.error(loc, DiagnosticCode::UnterminatedRegExp);
                    break;
                }
                _ => self.advance(),
            }
        }

        // Consume optional flags, which are IdentifierPartChars
        let flags_start_pos = self.pos;
        let mut seen_flags = String::new();

        while !self.is_eof() && is_id_part(self.current as CodePoint) {
            let flag = self.current;
            let flag_loc = Loc::new(self.pos, self.pos + flag.len_utf8());
            let flag_string = flag.to_string();

            if !REGEXP_FLAGS.contains(flag) {
                self.error_with_arg(flag_loc, DiagnosticCode::UnknownRegExpFlag, &flag_string);
            } else if seen_flags.contains(flag) {
                self.error_with_arg(flag_loc, DiagnosticCode::DuplicateRegExpFlag, &flag_string);
            } else {
                seen_flags.push(flag);
            }

            self.advance();
        }

        let pattern = String::from(&self.buf[pattern_start_pos..pattern_end_pos]);
        let flags = String::from(&self.buf[flags_start_pos..self.pos]);
        let raw = String::from(&self.buf[start_pos..self.pos]);

        self.emit(Token::RegexpLiteral { raw, pattern, flags }, start_pos)
    }

    // Get the next template part after the end of a template expression. Must be called when the
    // previously lexed token was a `}`.
    pub fn next_template_part(&mut self) -> LexResult {
        let start_pos = self.pos - 1;
        self.lex_template_literal(start_pos, false)
    }

    fn lex_template_literal(&mut self, start_pos: Pos, is_head: bool) -> LexResult {
        let mut value = String::new();

        let is_tail;
        let raw_start_pos = self.pos;
        let raw_end_pos;

        let mut has_cr = false;
        let mut bad_escape = None;

        loop {
            match self.current {
                // Escape sequences
                '\\' => {
                    let escape_start_pos = self.pos;

                    match self.peek() {
                        '0' if !is_decimal_digit(self.peek2() as CodePoint) => {
                            value.push('\x00');
                            self.advance2()
                        }
                        // Octal escapes are never allowed in templates
                        '0'..='9' => {
                            self.advance2();
                            let loc = self.mark_loc(escape_start_pos);
                            bad_escape.get_or_insert((loc, DiagnosticCode::TemplateBadEscape));
                        }
                        // Hex escape sequence
                        'x' => {
                            self.advance2();

                            match self.lex_hex_escape_sequence(escape_start_pos) {
                                Ok(code_point) => push_code_point(&mut value, code_point),
                                Err(error) => {
                                    bad_escape.get_or_insert(error);
                                }
                            }
                        }
                        // Unicode escape sequence
                        'u' => {
                            self.advance2();

                            match self.lex_unicode_escape_sequence_pair(escape_start_pos) {
                                Ok(code_point) => push_code_point(&mut value, code_point),
                                Err(error) => {
                                    bad_escape.get_or_insert(error);
                                }
                            }
                        }
                        // Line continuations, either LF, CR, or CRLF, which are excluded in cooked
                        // value but still count as a line break.
                        next if is_line_terminator(next as CodePoint) => {
                            if next == '\r' {
                                has_cr = true;
                            }

                            self.advance();
                            self.consume_line_terminator();
                        }
                        EOF_CHAR if self.pos + 1 >= self.buf.len() => {
                            self.advance();
                        }
                        other => {
                            self.advance();
                            self.advance();
                            value.push(single_character_escape(other));
                        }
                    }
                }
                '$' => match self.peek() {
                    // Start of an expression in the template literal
                    '{' => {
                        raw_end_pos = self.pos;
                        is_tail = false;

                        self.advance2();

                        break;
                    }
                    // Not an escape sequence, use '$' directly
                    _ => {
                        value.push('$');
                        self.advance()
                    }
                },
                // End of the entire template literal
                '`' => {
                    raw_end_pos = self.pos;
                    is_tail = true;

                    self.advance();

                    break;
                }
                EOF_CHAR if self.is_eof() => {
                    raw_end_pos = self.pos;
                    is_tail = true;

                    let loc = self.mark_loc(start_pos);
                    self.error(loc, DiagnosticCode::UnterminatedTemplate);

                    break;
                }
                // CR and CRLF are converted to LF to both raw and cooked strings
                '\r' => {
                    has_cr = true;
                    value.push('\n');
                    self.consume_line_terminator();
                }
                other if is_line_terminator(other as CodePoint) => {
                    value.push(other);
                    self.consume_line_terminator();
                }
                other => {
                    value.push(other);
                    self.advance();
                }
            }
        }

        let mut raw = String::from(&self.buf[raw_start_pos..raw_end_pos]);

        // CR and CRLF are both converted to LF in raw string. This requires copying the string
        // again, so only perform the replace if a CR was encountered.
        if has_cr {
            raw = raw.replace("\r\n", "\n").replace('\r', "\n");
        }

        // Only return cooked string if a malformed escape was not found
        let cooked = match bad_escape {
            None => Some(value),
            Some(_) => None,
        };

        let part = TemplatePart { raw, cooked, bad_escape, is_head, is_tail };
        self.emit(Token::TemplatePart(part), start_pos)
    }

    /// Lex the two hex digits of a `\x` escape, called after the `\x` prefix.
    fn lex_hex_escape_sequence(&mut self, start_pos: Pos) -> EscapeResult<CodePoint> {
        if let Some(x1) = get_hex_value(self.current as CodePoint) {
            if let Some(x2) = get_hex_value(self.peek() as CodePoint) {
                self.advance2();
                return Ok(x1 * 16 + x2);
            }

            self.advance();
        }

        let loc = self.mark_loc(start_pos);
        Err((loc, DiagnosticCode::InvalidHexEscapeSequence))
    }

    // Lex a single unicode escape sequence, called after the `\u` prefix has already been
    // processed. Value may be a lone surrogate.
    fn lex_unicode_escape_sequence(&mut self, start_pos: Pos) -> EscapeResult<CodePoint> {
        // Escape sequence has form \u{HEX_DIGITS}
        if self.current == '{' {
            self.advance();

            let mut value: CodePoint = 0;
            let mut num_digits = 0;
            let mut is_overflow = false;

            while let Some(hex_value) = get_hex_value(self.current as CodePoint) {
                self.advance();
                num_digits += 1;

                value = value * 16 + hex_value;
                if value > MAX_CODE_POINT {
                    is_overflow = true;
                    value = MAX_CODE_POINT + 1;
                }
            }

            if num_digits == 0 || self.current != '}' {
                let loc = self.mark_loc(start_pos);
                return Err((loc, DiagnosticCode::InvalidUnicodeEscapeSequence));
            }

            self.advance();

            // Check that value is not out of range (greater than 0x10FFFF)
            if is_overflow {
                let loc = self.mark_loc(start_pos);
                return Err((loc, DiagnosticCode::UnicodeOverflow));
            }

            return Ok(value);
        }

        // Otherwise this is \uXXXX so expect exactly four hex digits
        let mut value = 0;
        for _ in 0..4 {
            if let Some(hex_value) = get_hex_value(self.current as CodePoint) {
                self.advance();
                value = value * 16 + hex_value;
            } else {
                let loc = self.mark_loc(start_pos);
                return Err((loc, DiagnosticCode::InvalidUnicodeEscapeSequence));
            }
        }

        Ok(value)
    }

    /// Lex a unicode escape sequence in a string or template, joining a high surrogate with an
    /// immediately following escaped low surrogate.
    fn lex_unicode_escape_sequence_pair(&mut self, start_pos: Pos) -> EscapeResult<CodePoint> {
        let code_point = self.lex_unicode_escape_sequence(start_pos)?;

        if (0xD800..=0xDBFF).contains(&code_point) && self.current == '\\' && self.peek() == 'u' {
            let save_state = self.save();
            let low_start_pos = self.pos;
            self.advance2();

            if let Ok(low) = self.lex_unicode_escape_sequence(low_start_pos) {
                if (0xDC00..=0xDFFF).contains(&low) {
                    return Ok(0x10000 + ((code_point - 0xD800) << 10) + (low - 0xDC00));
                }
            }

            self.restore(&save_state);
        }

        Ok(code_point)
    }

    fn lex_identifier(&mut self, start_pos: Pos) -> LexResult {
        let name = self.lex_identifier_name(start_pos);

        // Escaped keywords are never treated as keywords
        if self.has_escape {
            return self.emit(Token::Identifier(name), start_pos);
        }

        match Token::keyword_from_str(&name) {
            Some(keyword_token) => self.emit(keyword_token, start_pos),
            None => self.emit(Token::Identifier(name), start_pos),
        }
    }

    // Fast path for lexing a purely ASCII identifier
    fn lex_identifier_ascii(&mut self, start_pos: Pos) -> LexResult {
        // Consume the id start ASCII character
        self.advance();

        loop {
            if is_id_part_ascii(self.current as CodePoint) {
                self.advance();
            } else if (is_ascii(self.current as CodePoint) && self.current != '\\') || self.is_eof()
            {
                break;
            } else {
                // Start of an escape sequence or a non-ASCII character so bail to slow path
                return self.lex_identifier(start_pos);
            }
        }

        let id_string = &self.buf[start_pos..self.pos];

        if let Some(keyword_token) = Token::keyword_from_str(id_string) {
            self.emit(keyword_token, start_pos)
        } else {
            self.emit(Token::Identifier(String::from(id_string)), start_pos)
        }
    }

    // Slow path for lexing an identifier with at least one unicode character or escape sequence,
    // restarting from the start of the identifier.
    fn lex_identifier_name(&mut self, start_pos: Pos) -> String {
        self.reset_to(start_pos);

        let mut string_builder = String::new();
        let mut is_first = true;

        loop {
            let code_point = self.current as CodePoint;

            if self.current == '\\' {
                let escape_start_pos = self.pos;
                self.advance();
                self.has_escape = true;

                let escaped = if self.current == 'u' {
                    self.advance();
                    self.lex_unicode_escape_sequence(escape_start_pos)
                } else {
                    Err((self.mark_loc(escape_start_pos), DiagnosticCode::InvalidUnicodeEscapeSequence))
                };

                match escaped {
                    Ok(code_point) => {
                        let is_valid = if is_first {
                            is_id_start(code_point)
                        } else {
                            is_id_part(code_point)
                        };

                        if is_valid {
                            push_code_point(&mut string_builder, code_point);
                        } else {
                            let loc = self.mark_loc(escape_start_pos);
                            self.error(loc, DiagnosticCode::InvalidUnicodeEscapeSequence);
                        }
                    }
                    Err((loc, code)) => self.error(loc, code),
                }
            } else if !self.is_eof()
                && (if is_first { is_id_start(code_point) } else { is_id_part(code_point) })
            {
                string_builder.push(self.current);
                self.advance();
            } else {
                break;
            }

            is_first = false;
        }

        string_builder
    }
}

/// The value of a single character escape such as `\n`. Any other character escapes itself.
fn single_character_escape(char: char) -> char {
    match char {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\x08',
        'v' => '\x0B',
        'f' => '\x0C',
        other => other,
    }
}

/// Append a decoded code point. Lone surrogates cannot be represented in a Rust string and are
/// replaced with U+FFFD.
fn push_code_point(string: &mut String, code_point: CodePoint) {
    string.push(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER));
}

fn parse_float(digits: &str) -> f64 {
    f64::from_str(digits).unwrap_or(f64::NAN)
}

fn parse_bigint(digits: &str, base: u32) -> BigInt {
    let digits = digits.replace('_', "");
    BigInt::parse_bytes(digits.as_bytes(), base).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::options::ParseOptions;
    use crate::parser::diagnostic::Severity;

    fn lex_all(text: &str, ctx: Context) -> (Vec<Token>, Vec<Diagnostic>) {
        let source = Rc::new(Source::new_from_string("test.js", text.to_owned()));
        let mut lexer = Lexer::new(&source);

        let mut tokens = vec![];
        loop {
            let (token, _) = lexer.next(ctx);
            if token == Token::Eof {
                break;
            }

            tokens.push(token);
        }

        (tokens, lexer.take_diagnostics())
    }

    fn sloppy() -> Context {
        Context::initial(&ParseOptions::default())
    }

    fn lex_number(text: &str, ctx: Context) -> (f64, Vec<DiagnosticCode>) {
        let (tokens, diagnostics) = lex_all(text, ctx);
        let codes = diagnostics.iter().map(|d| d.code).collect();
        match tokens.first() {
            Some(Token::NumberLiteral(value)) => (*value, codes),
            other => panic!("expected number, found {:?}", other),
        }
    }

    #[test]
    fn radix_literals() {
        assert_eq!(lex_number("0x1F", sloppy()), (31.0, vec![]));
        assert_eq!(lex_number("0o17", sloppy()), (15.0, vec![]));
        assert_eq!(lex_number("0b101", sloppy()), (5.0, vec![]));
        assert_eq!(lex_number("0B1_1", sloppy()), (3.0, vec![]));

        assert_eq!(lex_number("0x", sloppy()).1, vec![DiagnosticCode::HexSequenceNoDigits]);
        assert_eq!(lex_number("0b12", sloppy()).1, vec![DiagnosticCode::BinarySequence]);
        assert_eq!(lex_number("0o79", sloppy()).1, vec![DiagnosticCode::OctalSequence]);
        assert_eq!(lex_number("0x1__2", sloppy()).1, vec![DiagnosticCode::ContinuousNumericSeparator]);
        assert_eq!(lex_number("0x1_", sloppy()).1, vec![DiagnosticCode::TrailingNumericSeparator]);
    }

    #[test]
    fn decimal_literals() {
        assert_eq!(lex_number("1_000", sloppy()), (1000.0, vec![]));
        assert_eq!(lex_number("1.5e3", sloppy()), (1500.0, vec![]));
        assert_eq!(lex_number(".25", sloppy()), (0.25, vec![]));
        assert_eq!(lex_number("123456789012345678", sloppy()).0, 123456789012345678.0);
        assert_eq!(lex_number("1e", sloppy()), (1.0, vec![DiagnosticCode::MissingExponent]));
        assert_eq!(lex_number("1__0", sloppy()).1, vec![DiagnosticCode::ContinuousNumericSeparator]);
        assert_eq!(lex_number("1_", sloppy()).1, vec![DiagnosticCode::TrailingNumericSeparator]);
        assert_eq!(lex_number("1.5n", sloppy()).1, vec![DiagnosticCode::InvalidBigIntLiteral]);
        assert_eq!(lex_number("3in", sloppy()).1, vec![DiagnosticCode::IdafterNumber]);
    }

    #[test]
    fn leading_zero_literals() {
        assert_eq!(lex_number("017", sloppy()), (15.0, vec![]));
        assert_eq!(lex_number("008", sloppy()), (8.0, vec![DiagnosticCode::LegacyLeadingZero]));
        assert_eq!(lex_number("0_8", sloppy()), (8.0, vec![DiagnosticCode::UnderscoreAfterZero]));
        assert_eq!(lex_number("017", sloppy().strict()).1, vec![DiagnosticCode::StrictOctal]);
        assert_eq!(lex_number("09", sloppy().strict()).1, vec![DiagnosticCode::StrictOctal]);
        assert_eq!(lex_number("07n", sloppy()).1, vec![DiagnosticCode::InvalidBigIntLiteral]);

        let (_, diagnostics) = lex_all("008", sloppy());
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn bigint_literals() {
        let (tokens, diagnostics) = lex_all("0n 12n 0xFFn", sloppy());
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens,
            vec![
                Token::BigIntLiteral(BigInt::from(0)),
                Token::BigIntLiteral(BigInt::from(12)),
                Token::BigIntLiteral(BigInt::from(255)),
            ]
        );
    }

    #[test]
    fn string_escapes() {
        let (tokens, diagnostics) =
            lex_all(r#"'a\n\x41B\u{43}\101\
b' "😀""#, sloppy());
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens,
            vec![
                Token::StringLiteral("a\nABCAb".to_owned()),
                Token::StringLiteral("\u{1F600}".to_owned())
            ]
        );

        let (_, diagnostics) = lex_all(r"'\101' '\8'", sloppy().strict());
        let codes = diagnostics.iter().map(|d| d.code).collect::<Vec<_>>();
        assert_eq!(
            codes,
            vec![DiagnosticCode::StrictOctalEscape, DiagnosticCode::InvalidEightAndNine]
        );

        let (_, diagnostics) = lex_all(r"'\xZZ' '\u{110000}'", sloppy());
        let codes = diagnostics.iter().map(|d| d.code).collect::<Vec<_>>();
        assert_eq!(
            codes,
            vec![DiagnosticCode::InvalidHexEscapeSequence, DiagnosticCode::UnicodeOverflow]
        );
    }

    #[test]
    fn unterminated_string_keeps_partial_value() {
        let (tokens, diagnostics) = lex_all("'abc\nx", sloppy());
        assert_eq!(tokens[0], Token::StringLiteral("abc".to_owned()));
        assert_eq!(tokens[1], Token::Identifier("x".to_owned()));
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnterminatedString);
    }

    #[test]
    fn template_cooking_and_lines() {
        let source = Rc::new(Source::new_from_string("t.js", "`a\r\nb\\\nc${".to_owned()));
        let mut lexer = Lexer::new(&source);

        match lexer.next(sloppy()) {
            (Token::TemplatePart(part), loc) => {
                assert_eq!(part.raw, "a\nb\\\nc");
                assert_eq!(part.cooked.as_deref(), Some("a\nbc"));
                assert!(part.is_head);
                assert!(!part.is_tail);
                assert_eq!(loc, Loc::new(0, 10));
            }
            other => panic!("expected template, found {:?}", other),
        }

        assert_eq!(lexer.line(), 3);
        assert_eq!(lexer.line_start(), 7);
    }

    #[test]
    fn template_bad_escape() {
        let (tokens, diagnostics) = lex_all(r"`\xZZ` `\01`", sloppy());
        assert!(diagnostics.is_empty());

        match (&tokens[0], &tokens[1]) {
            (Token::TemplatePart(first), Token::TemplatePart(second)) => {
                assert_eq!(first.cooked, None);
                assert_eq!(first.raw, r"\xZZ");
                assert_eq!(
                    first.bad_escape.map(|(_, code)| code),
                    Some(DiagnosticCode::InvalidHexEscapeSequence)
                );
                assert_eq!(
                    second.bad_escape.map(|(_, code)| code),
                    Some(DiagnosticCode::TemplateBadEscape)
                );
            }
            other => panic!("expected templates, found {:?}", other),
        }
    }

    #[test]
    fn regexp_flags() {
        let source = Rc::new(Source::new_from_string("r.js", "/a[/]b/gimx".to_owned()));
        let mut lexer = Lexer::new(&source);
        let (token, _) = lexer.next(sloppy());
        assert_eq!(token, Token::Divide);

        let (token, loc) = lexer.next_regexp_literal(0);
        assert_eq!(
            token,
            Token::RegexpLiteral {
                raw: "/a[/]b/gimx".to_owned(),
                pattern: "a[/]b".to_owned(),
                flags: "gimx".to_owned()
            }
        );
        assert_eq!(loc, Loc::new(0, 11));

        let diagnostics = lexer.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnknownRegExpFlag);
        assert_eq!(diagnostics[0].arg.as_deref(), Some("x"));
    }

    #[test]
    fn identifiers_and_escapes() {
        let (tokens, diagnostics) = lex_all("caf\\u00e9 \\u{61}wait w\\u0069th #priv", sloppy());
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("café".to_owned()),
                Token::Identifier("await".to_owned()),
                Token::Identifier("with".to_owned()),
                Token::PrivateName("priv".to_owned()),
            ]
        );

        let (_, diagnostics) = lex_all("a\\u0020b", sloppy());
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidUnicodeEscapeSequence);
    }

    #[test]
    fn comments_and_newlines() {
        let source = Rc::new(Source::new_from_string(
            "c.js",
            "#!/usr/bin/env node\na /* x\n */ b // c\r\n<!-- d\n--> e\nf".to_owned(),
        ));
        let mut lexer = Lexer::new(&source);

        let (token, _) = lexer.next(sloppy());
        assert_eq!(token, Token::Identifier("a".to_owned()));
        assert!(lexer.is_new_line_before_current());

        let (token, _) = lexer.next(sloppy());
        assert_eq!(token, Token::Identifier("b".to_owned()));
        assert!(lexer.is_new_line_before_current());

        let (token, _) = lexer.next(sloppy());
        assert_eq!(token, Token::Identifier("f".to_owned()));
        assert_eq!(lexer.line(), 6);
        assert!(lexer.take_diagnostics().is_empty());

        let (_, diagnostics) = lex_all("/* open", sloppy());
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnclosedComment);
    }

    #[test]
    fn invalid_characters_are_skipped() {
        let (tokens, diagnostics) = lex_all("a @ b # c", sloppy());
        assert_eq!(tokens.len(), 3);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::InvalidCharacter));
    }

    #[test]
    fn save_and_restore_rewinds_diagnostics() {
        let source = Rc::new(Source::new_from_string("s.js", "a 0x\nb".to_owned()));
        let mut lexer = Lexer::new(&source);
        lexer.next(sloppy());

        let save_state = lexer.save();
        lexer.next(sloppy());
        lexer.next(sloppy());
        assert_eq!(lexer.line(), 2);

        lexer.restore(&save_state);
        assert_eq!(lexer.line(), 1);
        assert!(lexer.take_diagnostics().is_empty());

        let (token, _) = lexer.next(sloppy());
        assert_eq!(token, Token::NumberLiteral(0.0));
    }
}
