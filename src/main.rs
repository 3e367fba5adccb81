use cinder_core::common::options::{Args, ParseOptions};
use cinder_core::common::terminal::{format_diagnostic, stderr_should_use_colors};
use cinder_core::parser::{
    self, diagnostic::Diagnostic, source::Source, LocalizedParseError, ParseError,
};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::error::Error;
use std::rc::Rc;

/// Install a stderr subscriber when `CINDER_LOG` or `RUST_LOG` is set. `CINDER_LOG` takes
/// precedence and uses the same filter syntax.
fn init_tracing() {
    let filter = match std::env::var("CINDER_LOG") {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_diagnostics(
    args: &Args,
    source: &Source,
    diagnostics: &[Diagnostic],
) -> Result<(), Box<dyn Error>> {
    if args.json_diagnostics {
        eprintln!("{}", serde_json::to_string(diagnostics)?);
        return Ok(());
    }

    let use_colors = stderr_should_use_colors(args);
    for diagnostic in diagnostics {
        eprintln!("{}", format_diagnostic(source, diagnostic, use_colors));
    }

    Ok(())
}

/// Returns whether the file parsed without errors.
fn main_impl() -> Result<bool, Box<dyn Error>> {
    init_tracing();

    let args = Args::parse();
    let options = ParseOptions::new_from_args(&args);

    let source = Rc::new(Source::new_from_file(&args.file)?);

    let output = match parser::parse(&source, &options) {
        Ok(output) => output,
        Err(ParseError::Syntax(diagnostic)) => {
            print_diagnostics(&args, &source, &[diagnostic])?;
            return Ok(false);
        }
        Err(error) => return Err(Box::new(LocalizedParseError::new(error, &source))),
    };

    if args.print_ast {
        print!("{}", parser::print_program(&output.program, options.locations));
    }

    print_diagnostics(&args, &source, &output.diagnostics)?;

    Ok(!output.diagnostics.iter().any(Diagnostic::is_error))
}

/// Wrapper to pretty print errors
fn main() {
    match main_impl() {
        Ok(true) => (),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
