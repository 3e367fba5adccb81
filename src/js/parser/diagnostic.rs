use std::fmt;

use serde::{Serialize, Serializer};

use super::loc::Loc;
use super::parse_error::{ParseError, ParseResult};

/// Unique code for every diagnostic the tokenizer and parser can produce. The numeric value of a
/// code is stable and is what gets serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum DiagnosticCode {
    // Lexical
    InvalidCharacter,
    UnclosedComment,
    UnterminatedString,
    UnterminatedTemplate,
    UnterminatedRegExp,
    DuplicateRegExpFlag,
    UnknownRegExpFlag,
    InvalidHexEscapeSequence,
    InvalidUnicodeEscapeSequence,
    UnicodeOverflow,
    TemplateBadEscape,
    StrictOctalEscape,
    InvalidEightAndNine,
    IdafterNumber,
    MissingExponent,
    InvalidBigIntLiteral,
    BinarySequenceNoDigits,
    OctalSequenceNoDigits,
    HexSequenceNoDigits,
    BinarySequence,
    OctalSequence,
    StrictOctal,
    ContinuousNumericSeparator,
    TrailingNumericSeparator,
    UnderscoreAfterZero,
    LegacyLeadingZero,
    EscapedKeyword,

    // Syntax
    Unexpected,
    UnexpectedToken,
    UnexpectedEOF,
    Expected,
    ExpectedExpression,
    ExpectedStatement,
    ExpectedBindingIdent,
    ExpectedSemicolon,
    ExpectedString,
    UnexpectedArrow,
    ArrowOnNewLine,
    MissingFuncName,
    MissingClassName,
    NewlineAfterThrow,
    InvalidLHS,
    LHSPreOp,
    LHSPostOp,
    InvalidForLHS,
    ObjCoverInit,
    RestTrailing,
    RestInit,
    RestNotLast,
    InvalidCoalescing,
    InvalidExponentation,
    MultipleDefaultsInSwitch,
    NoCatchOrFinally,
    ForInOfMultipleDeclarations,
    ForInOfInitializer,
    ForOfLet,
    ForOfAsync,
    ForAwaitNotOf,
    MissingConstInit,
    MissingDestructInit,
    LexicalInStatementPosition,
    ClassForbiddenAsStatement,
    FunctionInStatementPosition,
    ImportInScript,
    ExportInScript,
    OptionalChainingNoNew,
    ChainNoTemplate,
    NoSuper,
    InvalidNewTarget,
    InvalidImportMeta,
    GetterArity,
    SetterArity,
    DuplicateConstructor,
    SpecialConstructor,
    StaticPrototype,
    DuplicateProto,
    PrivateNameConstructor,
    GeneratorAccessor,

    // Early
    StrictModeReserved,
    StrictEvalArguments,
    StrictDelete,
    StrictWith,
    YieldAsIdent,
    AwaitAsIdent,
    AwaitInParameter,
    YieldInParameter,
    InvalidLetConstBinding,
    IllegalReturn,
    InvalidBreak,
    IllegalContinue,
    UnknownLabel,
    DuplicateLabel,
    LabelledFunction,
    DupBind,
    DupLexBind,
    BoundClause,
    ShadowClause,
    DuplicateIdentifier,
    UseStrictNonSimpleParams,
    InvalidSuperProperty,
    InvalidSuperCall,
    DuplicateExport,
    NoExpBinding,
}

/// Broad classification of where a diagnostic is detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    /// Malformed or unterminated literal, invalid escape, or invalid character.
    Lexical,
    /// A token that cannot start or continue the expected grammar rule.
    Syntax,
    /// A binding conflict or a context dependent restriction.
    Early,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl DiagnosticCode {
    pub fn category(self) -> DiagnosticCategory {
        if self <= DiagnosticCode::EscapedKeyword {
            DiagnosticCategory::Lexical
        } else if self <= DiagnosticCode::GeneratorAccessor {
            DiagnosticCategory::Syntax
        } else {
            DiagnosticCategory::Early
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticCode::LegacyLeadingZero => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Message template for this code. A `%0` in the template is replaced by the diagnostic's
    /// argument.
    pub fn template(self) -> &'static str {
        use DiagnosticCode::*;

        match self {
            InvalidCharacter => "Invalid character",
            UnclosedComment => "`*/` expected",
            UnterminatedString => "Unterminated string literal",
            UnterminatedTemplate => "Unterminated template literal",
            UnterminatedRegExp => "Unterminated regular expression",
            DuplicateRegExpFlag => "Duplicate regular expression flag `%0`",
            UnknownRegExpFlag => "Unknown regular expression flag `%0`",
            InvalidHexEscapeSequence => "Invalid hexadecimal escape sequence",
            InvalidUnicodeEscapeSequence => "Invalid Unicode escape sequence",
            UnicodeOverflow => "Unicode codepoint must not be greater than 0x10FFFF",
            TemplateBadEscape => "Bad escape sequence in untagged template literal",
            StrictOctalEscape => "Octal escape sequences are not allowed in strict mode",
            InvalidEightAndNine => "Escapes \\8 or \\9 are not syntactically valid escapes",
            IdafterNumber => "An identifier or keyword cannot immediately follow a numeric literal",
            MissingExponent => "Non-number after exponent indicator",
            InvalidBigIntLiteral => "Invalid BigInt syntax",
            BinarySequenceNoDigits => "Binary integer literal like sequence without any digits",
            OctalSequenceNoDigits => "Octal integer literal like sequence without any digits",
            HexSequenceNoDigits => "Hex integer literal like sequence without any digits",
            BinarySequence => "Binary integer literal like sequence containing an invalid digit",
            OctalSequence => "Octal integer literal like sequence containing an invalid digit",
            StrictOctal => "Octal literals are not allowed in strict mode",
            ContinuousNumericSeparator => {
                "Multiple consecutive numeric separators are not permitted"
            }
            TrailingNumericSeparator => {
                "Numeric separators are not allowed at the end of numeric literals"
            }
            UnderscoreAfterZero => "Numeric separator can not be used after leading 0",
            LegacyLeadingZero => "Decimal literals with a leading zero are a legacy feature",
            EscapedKeyword => "Keyword `%0` must not contain escaped characters",
            Unexpected => "Unexpected token",
            UnexpectedToken => "Unexpected token - `%0`",
            UnexpectedEOF => "Unexpected end of input",
            Expected => "`%0` expected",
            ExpectedExpression => "Expression expected",
            ExpectedStatement => "Statement expected",
            ExpectedBindingIdent => "Expected a binding identifier",
            ExpectedSemicolon => "`;` expected",
            ExpectedString => "String literal expected",
            UnexpectedArrow => "Unexpected `=>`",
            ArrowOnNewLine => "No line break is allowed between arrow arguments and `=>`",
            MissingFuncName => "Function declaration require a name in this context",
            MissingClassName => "Class declaration require a name in this context",
            NewlineAfterThrow => "Line break not allowed after `throw`",
            InvalidLHS => {
                "The left-hand side of an assignment expression must be a variable or a property access"
            }
            LHSPreOp => "Invalid left-hand side expression in prefix operation",
            LHSPostOp => "Invalid left-hand side expression in postfix operation",
            InvalidForLHS => "Invalid left-hand side in for-loop",
            ObjCoverInit => {
                "`=` can only be used in an object literal property inside a destructuring"
            }
            RestTrailing => "A rest parameter or binding pattern may not have a trailing comma",
            RestInit => "A rest element cannot have an initializer",
            RestNotLast => "A rest element must be last in a destructuring pattern",
            InvalidCoalescing => {
                "Coalescing and logical operators used together in the same expression must be disambiguated with parentheses"
            }
            InvalidExponentation => {
                "Unary expressions as the left operand of an exponentation expression must be disambiguated with parentheses"
            }
            MultipleDefaultsInSwitch => {
                "A `default` clause cannot appear more than once in a `switch` statement"
            }
            NoCatchOrFinally => "Missing catch or finally after try",
            ForInOfMultipleDeclarations => {
                "Only a single declaration is allowed in a `for...in` or `for...of` statement"
            }
            ForInOfInitializer => {
                "The declaration in a `for...in` or `for...of` statement may not have an initializer"
            }
            ForOfLet => "The left-hand side of a for-of loop may not start with `let`",
            ForOfAsync => "The left-hand side of a for-of loop may not be `async`",
            ForAwaitNotOf => "`for await` loops must use `of`",
            MissingConstInit => "Const declarations must have an initializer",
            MissingDestructInit => "Missing initializer in destructuring declaration",
            LexicalInStatementPosition => {
                "Lexical declaration cannot appear in a single-statement context"
            }
            ClassForbiddenAsStatement => {
                "Class declaration can't appear in single-statement context"
            }
            FunctionInStatementPosition => {
                "Functions can only be declared at top level, inside a block, or as the body of an if statement"
            }
            ImportInScript => "The `import` keyword can only be used with the module goal",
            ExportInScript => "The `export` keyword can only be used with the module goal",
            OptionalChainingNoNew => "Invalid optional chain from new expression",
            ChainNoTemplate => "Invalid optional chain in tagged template",
            NoSuper => "`super` must be followed by an argument list or member access",
            InvalidNewTarget => "`%0` is not a valid meta-property for keyword `new`",
            InvalidImportMeta => "`import.meta` can only be used with the module goal",
            GetterArity => "Getter functions must have no parameters",
            SetterArity => "Setter functions must have exactly one parameter",
            DuplicateConstructor => "Class can only have a single constructor",
            SpecialConstructor => "Class constructor may not be an accessor, generator, or async",
            StaticPrototype => "Classes may not have a static property named prototype",
            DuplicateProto => {
                "Duplicate __proto__ properties are not allowed in object literals"
            }
            PrivateNameConstructor => "Private name not allowed to be #constructor",
            GeneratorAccessor => "An accessor cannot be a generator",
            StrictModeReserved => "Unexpected reserved word `%0` in strict mode",
            StrictEvalArguments => "Unexpected `%0` as a binding or assignment target in strict mode",
            StrictDelete => "Calling delete on an identifier is not allowed in strict mode",
            StrictWith => "`with` statements are not allowed in strict mode",
            YieldAsIdent => "`yield` may not be used as an identifier in this context",
            AwaitAsIdent => "`await` may not be used as an identifier in this context",
            AwaitInParameter => "`await` expression cannot be used in function parameters",
            YieldInParameter => "`yield` expression cannot be used in function parameters",
            InvalidLetConstBinding => "A lexical declaration can not define a `let` binding",
            IllegalReturn => "A `return` statement can only be used within a function body",
            InvalidBreak => {
                "A `break` statement can only be used within an enclosing iteration or switch"
            }
            IllegalContinue => {
                "A `continue` statement can only be used within an enclosing iteration statement"
            }
            UnknownLabel => "Unknown label `%0`",
            DuplicateLabel => "Label `%0` has already been declared",
            LabelledFunction => "Functions can only be labeled in sloppy mode outside loops",
            DupBind => "Duplicate binding `%0`",
            DupLexBind => "Duplicate lexical binding `%0`",
            BoundClause => "`%0` already bound as a catch clause binding",
            ShadowClause => "`%0` shadows a catch clause binding",
            DuplicateIdentifier => "Duplicate parameter `%0`",
            UseStrictNonSimpleParams => {
                "`use strict` only allowed in functions with simple parameter lists"
            }
            InvalidSuperProperty => "Member access on super must be in a method",
            InvalidSuperCall => {
                "Calls to super must be in the constructor of a class that has a super class"
            }
            DuplicateExport => "Duplicate export of `%0`",
            NoExpBinding => "Exported binding `%0` needs to refer to a top-level declared variable",
        }
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(*self as u16)
    }
}

/// A single diagnostic produced while tokenizing or parsing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    #[serde(flatten)]
    pub loc: Loc,
    pub severity: Severity,
    pub arg: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, loc: Loc) -> Diagnostic {
        Diagnostic { code, loc, severity: code.default_severity(), arg: None }
    }

    pub fn with_arg(code: DiagnosticCode, loc: Loc, arg: &str) -> Diagnostic {
        Diagnostic { code, loc, severity: code.default_severity(), arg: Some(arg.to_owned()) }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render the message template, interpolating the argument.
    pub fn message(&self) -> String {
        let template = self.code.template();
        match &self.arg {
            Some(arg) => template.replace("%0", arg),
            None => template.to_owned(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Which strategy handles diagnostics for a parse, chosen once per invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorMode {
    /// The first error aborts the parse.
    FailFast,
    /// Every diagnostic is collected and the parse always completes.
    Recover,
}

/// Destination for diagnostics. Both strategies are consumed identically by the tokenizer and
/// the parser, which only differ in whether `report` returns an error.
pub trait DiagnosticSink {
    fn mode(&self) -> ErrorMode;

    /// Record a diagnostic. Returns an error when the diagnostic must abort the parse.
    fn report(&mut self, diagnostic: Diagnostic) -> ParseResult<()>;

    /// Number of diagnostics recorded so far, usable as a rewind point.
    fn len(&self) -> usize;

    /// Discard every diagnostic recorded after the given rewind point.
    fn truncate(&mut self, len: usize);

    /// Whether an error severity diagnostic has been recorded.
    fn has_errors(&self) -> bool;

    /// Consume the recorded diagnostics, in non-decreasing start offset order.
    fn finish(self: Box<Self>) -> Vec<Diagnostic>;
}

/// Raise on the first error. Warnings are kept and returned alongside a successful parse.
pub struct FailFastSink {
    warnings: Vec<Diagnostic>,
}

impl FailFastSink {
    pub fn new() -> FailFastSink {
        FailFastSink { warnings: vec![] }
    }
}

impl DiagnosticSink for FailFastSink {
    fn mode(&self) -> ErrorMode {
        ErrorMode::FailFast
    }

    fn report(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        if diagnostic.is_error() {
            return Err(ParseError::Syntax(diagnostic));
        }

        self.warnings.push(diagnostic);
        Ok(())
    }

    fn len(&self) -> usize {
        self.warnings.len()
    }

    fn truncate(&mut self, len: usize) {
        self.warnings.truncate(len)
    }

    fn has_errors(&self) -> bool {
        false
    }

    fn finish(self: Box<Self>) -> Vec<Diagnostic> {
        sorted_by_start(self.warnings)
    }
}

/// Append every diagnostic and continue.
pub struct RecoverySink {
    diagnostics: Vec<Diagnostic>,
    num_errors: usize,
}

impl RecoverySink {
    pub fn new() -> RecoverySink {
        RecoverySink { diagnostics: vec![], num_errors: 0 }
    }
}

impl DiagnosticSink for RecoverySink {
    fn mode(&self) -> ErrorMode {
        ErrorMode::Recover
    }

    fn report(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        if diagnostic.is_error() {
            self.num_errors += 1;
        }

        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn len(&self) -> usize {
        self.diagnostics.len()
    }

    fn truncate(&mut self, len: usize) {
        while self.diagnostics.len() > len {
            if let Some(diagnostic) = self.diagnostics.pop() {
                if diagnostic.is_error() {
                    self.num_errors -= 1;
                }
            }
        }
    }

    fn has_errors(&self) -> bool {
        self.num_errors > 0
    }

    fn finish(self: Box<Self>) -> Vec<Diagnostic> {
        sorted_by_start(self.diagnostics)
    }
}

/// Deferred diagnostics are recorded when the construct that resolves them completes, which can
/// be after diagnostics with a later start offset. A stable sort restores offset order while
/// keeping detection order between diagnostics at the same offset.
fn sorted_by_start(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by_key(|diagnostic| diagnostic.loc.start);
    diagnostics
}

pub fn new_sink(mode: ErrorMode) -> Box<dyn DiagnosticSink> {
    match mode {
        ErrorMode::FailFast => Box::new(FailFastSink::new()),
        ErrorMode::Recover => Box::new(RecoverySink::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_interpolation() {
        let diagnostic = Diagnostic::with_arg(DiagnosticCode::DupLexBind, Loc::new(4, 5), "x");
        assert_eq!(diagnostic.message(), "Duplicate lexical binding `x`");

        let diagnostic = Diagnostic::new(DiagnosticCode::UnterminatedString, Loc::new(0, 3));
        assert_eq!(diagnostic.to_string(), "Unterminated string literal");
    }

    #[test]
    fn categories() {
        assert_eq!(DiagnosticCode::StrictOctal.category(), DiagnosticCategory::Lexical);
        assert_eq!(DiagnosticCode::ExpectedSemicolon.category(), DiagnosticCategory::Syntax);
        assert_eq!(DiagnosticCode::DupBind.category(), DiagnosticCategory::Early);
    }

    #[test]
    fn fail_fast_raises_on_error_only() {
        let mut sink = FailFastSink::new();
        let warning = Diagnostic::new(DiagnosticCode::LegacyLeadingZero, Loc::new(0, 3));
        assert!(sink.report(warning).is_ok());

        let error = Diagnostic::new(DiagnosticCode::InvalidCharacter, Loc::new(3, 4));
        match sink.report(error) {
            Err(ParseError::Syntax(diagnostic)) => {
                assert_eq!(diagnostic.code, DiagnosticCode::InvalidCharacter)
            }
            _ => panic!("expected error"),
        }

        assert_eq!(Box::new(sink).finish().len(), 1);
    }

    #[test]
    fn recovery_orders_by_start_and_rewinds() {
        let mut sink = RecoverySink::new();
        sink.report(Diagnostic::new(DiagnosticCode::Unexpected, Loc::new(10, 11)))
            .unwrap();
        let checkpoint = sink.len();
        sink.report(Diagnostic::new(DiagnosticCode::ExpectedSemicolon, Loc::new(12, 13)))
            .unwrap();
        sink.truncate(checkpoint);
        assert!(sink.has_errors());

        sink.report(Diagnostic::new(DiagnosticCode::DuplicateIdentifier, Loc::new(2, 3)))
            .unwrap();
        sink.report(Diagnostic::new(DiagnosticCode::DupBind, Loc::new(10, 11)))
            .unwrap();

        let codes = Box::new(sink)
            .finish()
            .into_iter()
            .map(|diagnostic| diagnostic.code)
            .collect::<Vec<_>>();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::DuplicateIdentifier,
                DiagnosticCode::Unexpected,
                DiagnosticCode::DupBind
            ]
        );
    }

    #[test]
    fn serialized_shape() {
        let diagnostic = Diagnostic::with_arg(DiagnosticCode::DupBind, Loc::new(1, 2), "a");
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["code"], DiagnosticCode::DupBind as u16);
        assert_eq!(json["start"], 1);
        assert_eq!(json["end"], 2);
        assert_eq!(json["severity"], "error");
        assert_eq!(json["arg"], "a");
    }
}
