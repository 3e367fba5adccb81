use crate::parser::diagnostic::{Diagnostic, Severity};
use crate::parser::source::Source;

use super::options::Args;

/// Detect if the terminal supports colors on stderr.
fn detect_stderr_supports_colors() -> bool {
    if let Some(support) = supports_color::on_cached(supports_color::Stream::Stderr) {
        support.has_basic
    } else {
        false
    }
}

/// Whether we should use colors when printing diagnostics to stderr. Based on the CLI flags and
/// detecting if the terminal supports colors.
pub fn stderr_should_use_colors(args: &Args) -> bool {
    !args.no_color && detect_stderr_supports_colors()
}

/// Reset all color and style attributes
pub const RESET: &str = "\x1b[0m";

/// Styles
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

/// Colors
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";

/// Render a diagnostic as `file:line:col: severity: message`, followed by the offending source
/// line when colors are enabled.
pub fn format_diagnostic(source: &Source, diagnostic: &Diagnostic, use_colors: bool) -> String {
    let (line, col) = source.line_col(diagnostic.loc.start);

    let severity = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };

    if !use_colors {
        return format!(
            "{}:{}:{}: {}: {}",
            source.file_path,
            line,
            col,
            severity,
            diagnostic.message()
        );
    }

    let color = match diagnostic.severity {
        Severity::Error => RED,
        Severity::Warning => YELLOW,
    };

    format!(
        "{BOLD}{}:{}:{}:{RESET} {BOLD}{color}{}:{RESET} {}\n{DIM}{}{RESET}",
        source.file_path,
        line,
        col,
        severity,
        diagnostic.message(),
        source.line_text(diagnostic.loc.start),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::diagnostic::DiagnosticCode;
    use crate::parser::loc::Loc;

    #[test]
    fn plain_format() {
        let source = Source::new_from_string("a.js", "let x;\nlet x;\n".to_owned());
        let diagnostic = Diagnostic::with_arg(DiagnosticCode::DupLexBind, Loc::new(11, 12), "x");

        assert_eq!(
            format_diagnostic(&source, &diagnostic, false),
            "a.js:2:4: error: Duplicate lexical binding `x`"
        );
    }
}
