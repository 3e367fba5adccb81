use std::rc::Rc;
use std::{fmt, io};

use thiserror::Error;

use super::diagnostic::Diagnostic;
use super::loc::Loc;
use super::source::Source;

/// The outcome of a failed parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Error: {0}")]
    Io(#[from] io::Error),
    /// The first error severity diagnostic of a fail-fast parse.
    #[error("SyntaxError: {0}")]
    Syntax(Diagnostic),
}

impl ParseError {
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ParseError::Io(_) => None,
            ParseError::Syntax(diagnostic) => Some(diagnostic),
        }
    }

    pub fn loc(&self) -> Option<Loc> {
        self.diagnostic().map(|diagnostic| diagnostic.loc)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// A parse error along with the source it occurred in, rendered with file, line, and column.
pub struct LocalizedParseError {
    pub error: ParseError,
    pub source: Option<Rc<Source>>,
}

impl LocalizedParseError {
    pub fn new(error: ParseError, source: &Rc<Source>) -> LocalizedParseError {
        LocalizedParseError { error, source: Some(source.clone()) }
    }
}

impl std::error::Error for LocalizedParseError {}

impl fmt::Display for LocalizedParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.error, &self.source) {
            (ParseError::Syntax(diagnostic), Some(source)) => {
                let (line, col) = source.line_col(diagnostic.loc.start);
                write!(f, "SyntaxError: {}:{}:{} {}", source.file_path, line, col, diagnostic)
            }
            (error, _) => write!(f, "{}", error),
        }
    }
}

impl fmt::Debug for LocalizedParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <LocalizedParseError as fmt::Display>::fmt(self, f)
    }
}

impl From<io::Error> for LocalizedParseError {
    fn from(error: io::Error) -> LocalizedParseError {
        LocalizedParseError { error: ParseError::Io(error), source: None }
    }
}
