use std::fmt;

use num_bigint::BigInt;

use super::diagnostic::DiagnosticCode;
use super::loc::Loc;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Identifier(String),
    NumberLiteral(f64),
    BigIntLiteral(BigInt),
    StringLiteral(String),
    TemplatePart(TemplatePart),
    RegexpLiteral {
        raw: String,
        pattern: String,
        flags: String,
    },
    /// A `#name` private name, storing the name without the leading `#`.
    PrivateName(String),
    Eof,
    // Operators
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    Exponent,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRightArithmetic,
    ShiftRightLogical,
    Increment,
    Decrement,
    LogicalNot,
    BitwiseNot,
    LogicalAnd,
    LogicalOr,
    NullishCoalesce,
    Question,
    QuestionDot,
    Equals,
    AddEq,
    SubtractEq,
    MultiplyEq,
    DivideEq,
    RemainderEq,
    ExponentEq,
    AndEq,
    OrEq,
    XorEq,
    ShiftLeftEq,
    ShiftRightArithmeticEq,
    ShiftRightLogicalEq,
    LogicalAndEq,
    LogicalOrEq,
    NullishCoalesceEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    // Punctuation
    Semicolon,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Period,
    Spread,
    Arrow,
    // Keywords
    Var,
    Let,
    Const,
    Function,
    Async,
    This,
    If,
    Else,
    Switch,
    Case,
    Default,
    For,
    Of,
    While,
    Do,
    With,
    Return,
    Break,
    Continue,
    Try,
    Catch,
    Finally,
    Throw,
    Null,
    True,
    False,
    In,
    InstanceOf,
    New,
    Typeof,
    Void,
    Delete,
    Debugger,
    Static,
    From,
    As,
    Class,
    Extends,
    Super,
    Get,
    Set,
    Import,
    Export,
    Await,
    Yield,
    Enum,
}

/// One quasi of a template literal, running from a backtick or the `}` that closes a
/// substitution up to the next backtick or `${`.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplatePart {
    /// Source text of the quasi with CR and CRLF normalized to LF.
    pub raw: String,
    /// Decoded value, absent when the quasi contains a malformed escape.
    pub cooked: Option<String>,
    /// The first malformed escape in the quasi, reported unless the template is tagged.
    pub bad_escape: Option<(Loc, DiagnosticCode)>,
    pub is_head: bool,
    pub is_tail: bool,
}

impl Token {
    /// Map an identifier name to its keyword token, if it is a keyword.
    pub fn keyword_from_str(name: &str) -> Option<Token> {
        let token = match name {
            "var" => Token::Var,
            "let" => Token::Let,
            "const" => Token::Const,
            "function" => Token::Function,
            "async" => Token::Async,
            "this" => Token::This,
            "if" => Token::If,
            "else" => Token::Else,
            "switch" => Token::Switch,
            "case" => Token::Case,
            "default" => Token::Default,
            "for" => Token::For,
            "of" => Token::Of,
            "while" => Token::While,
            "do" => Token::Do,
            "with" => Token::With,
            "return" => Token::Return,
            "break" => Token::Break,
            "continue" => Token::Continue,
            "try" => Token::Try,
            "catch" => Token::Catch,
            "finally" => Token::Finally,
            "throw" => Token::Throw,
            "null" => Token::Null,
            "true" => Token::True,
            "false" => Token::False,
            "in" => Token::In,
            "instanceof" => Token::InstanceOf,
            "new" => Token::New,
            "typeof" => Token::Typeof,
            "void" => Token::Void,
            "delete" => Token::Delete,
            "debugger" => Token::Debugger,
            "static" => Token::Static,
            "from" => Token::From,
            "as" => Token::As,
            "class" => Token::Class,
            "extends" => Token::Extends,
            "super" => Token::Super,
            "get" => Token::Get,
            "set" => Token::Set,
            "import" => Token::Import,
            "export" => Token::Export,
            "await" => Token::Await,
            "yield" => Token::Yield,
            "enum" => Token::Enum,
            _ => return None,
        };

        Some(token)
    }

    /// Keywords that may never be used as identifiers, regardless of context.
    pub fn is_reserved_word(&self) -> bool {
        match self {
            Token::Var
            | Token::Const
            | Token::Function
            | Token::This
            | Token::If
            | Token::Else
            | Token::Switch
            | Token::Case
            | Token::Default
            | Token::For
            | Token::While
            | Token::Do
            | Token::With
            | Token::Return
            | Token::Break
            | Token::Continue
            | Token::Try
            | Token::Catch
            | Token::Finally
            | Token::Throw
            | Token::Null
            | Token::True
            | Token::False
            | Token::In
            | Token::InstanceOf
            | Token::New
            | Token::Typeof
            | Token::Void
            | Token::Delete
            | Token::Debugger
            | Token::Class
            | Token::Extends
            | Token::Super
            | Token::Import
            | Token::Export
            | Token::Enum => true,
            _ => false,
        }
    }

    /// Keywords that are only reserved in some contexts, and otherwise act as identifiers.
    pub fn is_contextual_keyword(&self) -> bool {
        matches!(
            self,
            Token::Let
                | Token::Async
                | Token::Of
                | Token::Static
                | Token::From
                | Token::As
                | Token::Get
                | Token::Set
                | Token::Await
                | Token::Yield
        )
    }

    /// Whether this token can be used as a property name, which includes every keyword.
    pub fn is_identifier_name(&self) -> bool {
        matches!(self, Token::Identifier(_)) || self.is_reserved_word() || self.is_contextual_keyword()
    }

    /// Binary and logical operators.
    pub fn is_binary_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus
                | Token::Minus
                | Token::Multiply
                | Token::Divide
                | Token::Remainder
                | Token::Exponent
                | Token::EqEq
                | Token::NotEq
                | Token::EqEqEq
                | Token::NotEqEq
                | Token::LessThan
                | Token::LessThanOrEqual
                | Token::GreaterThan
                | Token::GreaterThanOrEqual
                | Token::InstanceOf
                | Token::In
                | Token::BitwiseAnd
                | Token::BitwiseOr
                | Token::BitwiseXor
                | Token::ShiftLeft
                | Token::ShiftRightArithmetic
                | Token::ShiftRightLogical
                | Token::LogicalAnd
                | Token::LogicalOr
                | Token::NullishCoalesce
        )
    }

    /// Whether this token at the start of a line continues the expression on the previous line,
    /// so that no semicolon is inserted before it.
    pub fn continues_expression(&self) -> bool {
        matches!(
            self,
            Token::Period
                | Token::QuestionDot
                | Token::LeftBracket
                | Token::LeftParen
                | Token::TemplatePart(_)
                | Token::Question
                | Token::Comma
        ) || self.is_binary_operator()
            || self.is_assignment_operator()
    }

    /// Assignment operators, including the plain `=`.
    pub fn is_assignment_operator(&self) -> bool {
        matches!(
            self,
            Token::Equals
                | Token::AddEq
                | Token::SubtractEq
                | Token::MultiplyEq
                | Token::DivideEq
                | Token::RemainderEq
                | Token::ExponentEq
                | Token::AndEq
                | Token::OrEq
                | Token::XorEq
                | Token::ShiftLeftEq
                | Token::ShiftRightArithmeticEq
                | Token::ShiftRightLogicalEq
                | Token::LogicalAndEq
                | Token::LogicalOrEq
                | Token::NullishCoalesceEq
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match self {
            Token::Identifier(name) => name,
            Token::NumberLiteral(value) => return write!(f, "{}", value),
            Token::BigIntLiteral(value) => return write!(f, "{}n", value),
            Token::StringLiteral(value) => return write!(f, "\"{}\"", value),
            Token::TemplatePart(TemplatePart { raw, .. }) => return write!(f, "`{}`", raw),
            Token::RegexpLiteral { raw, .. } => raw,
            Token::PrivateName(name) => return write!(f, "#{}", name),
            Token::Eof => "<EOF>",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Multiply => "*",
            Token::Divide => "/",
            Token::Remainder => "%",
            Token::Exponent => "**",
            Token::BitwiseAnd => "&",
            Token::BitwiseOr => "|",
            Token::BitwiseXor => "^",
            Token::ShiftLeft => "<<",
            Token::ShiftRightArithmetic => ">>",
            Token::ShiftRightLogical => ">>>",
            Token::Increment => "++",
            Token::Decrement => "--",
            Token::LogicalNot => "!",
            Token::BitwiseNot => "~",
            Token::LogicalAnd => "&&",
            Token::LogicalOr => "||",
            Token::NullishCoalesce => "??",
            Token::Question => "?",
            Token::QuestionDot => "?.",
            Token::Equals => "=",
            Token::AddEq => "+=",
            Token::SubtractEq => "-=",
            Token::MultiplyEq => "*=",
            Token::DivideEq => "/=",
            Token::RemainderEq => "%=",
            Token::ExponentEq => "**=",
            Token::AndEq => "&=",
            Token::OrEq => "|=",
            Token::XorEq => "^=",
            Token::ShiftLeftEq => "<<=",
            Token::ShiftRightArithmeticEq => ">>=",
            Token::ShiftRightLogicalEq => ">>>=",
            Token::LogicalAndEq => "&&=",
            Token::LogicalOrEq => "||=",
            Token::NullishCoalesceEq => "??=",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::EqEqEq => "===",
            Token::NotEqEq => "!==",
            Token::LessThan => "<",
            Token::LessThanOrEqual => "<=",
            Token::GreaterThan => ">",
            Token::GreaterThanOrEqual => ">=",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
            Token::Colon => ":",
            Token::Period => ".",
            Token::Spread => "...",
            Token::Arrow => "=>",
            Token::Var => "var",
            Token::Let => "let",
            Token::Const => "const",
            Token::Function => "function",
            Token::Async => "async",
            Token::This => "this",
            Token::If => "if",
            Token::Else => "else",
            Token::Switch => "switch",
            Token::Case => "case",
            Token::Default => "default",
            Token::For => "for",
            Token::Of => "of",
            Token::While => "while",
            Token::Do => "do",
            Token::With => "with",
            Token::Return => "return",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Try => "try",
            Token::Catch => "catch",
            Token::Finally => "finally",
            Token::Throw => "throw",
            Token::Null => "null",
            Token::True => "true",
            Token::False => "false",
            Token::In => "in",
            Token::InstanceOf => "instanceof",
            Token::New => "new",
            Token::Typeof => "typeof",
            Token::Void => "void",
            Token::Delete => "delete",
            Token::Debugger => "debugger",
            Token::Static => "static",
            Token::From => "from",
            Token::As => "as",
            Token::Class => "class",
            Token::Extends => "extends",
            Token::Super => "super",
            Token::Get => "get",
            Token::Set => "set",
            Token::Import => "import",
            Token::Export => "export",
            Token::Await => "await",
            Token::Yield => "yield",
            Token::Enum => "enum",
        };

        f.write_str(str)
    }
}
