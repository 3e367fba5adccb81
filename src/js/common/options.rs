use clap::Parser;

use crate::parser::diagnostic::ErrorMode;

/// Raw command line arguments.
#[derive(Parser)]
#[command(about)]
pub struct Args {
    /// Print the AST to the console as JSON
    #[arg(long, default_value_t = false)]
    pub print_ast: bool,

    /// Include source locations in the printed AST
    #[arg(long, default_value_t = false)]
    pub locations: bool,

    /// Parse as module instead of script
    #[arg(long, default_value_t = false)]
    pub module: bool,

    /// Collect every diagnostic instead of stopping at the first error
    #[arg(long, default_value_t = false)]
    pub recover: bool,

    /// Disable Annex B web compatibility semantics
    #[arg(long, default_value_t = false)]
    pub no_web_compat: bool,

    /// Print diagnostics as JSON
    #[arg(long, default_value_t = false)]
    pub json_diagnostics: bool,

    /// Never use colors when printing diagnostics
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    pub file: String,
}

/// The goal symbol the source text is parsed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    Script,
    Module,
}

/// Options for a single parse.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Parse as a Script or a Module
    pub goal: Goal,
    /// Enable Annex B web compatibility semantics in sloppy mode code
    pub web_compat: bool,
    /// Abort on the first error or collect every diagnostic
    pub mode: ErrorMode,
    /// Attach source locations to printed nodes
    pub locations: bool,
}

impl ParseOptions {
    /// Create a new options struct from the command line arguments.
    pub fn new_from_args(args: &Args) -> Self {
        Self {
            goal: if args.module { Goal::Module } else { Goal::Script },
            web_compat: !args.no_web_compat,
            mode: if args.recover {
                ErrorMode::Recover
            } else {
                ErrorMode::FailFast
            },
            locations: args.locations,
        }
    }

    pub fn module() -> Self {
        Self { goal: Goal::Module, ..Self::default() }
    }

    pub fn recover() -> Self {
        Self { mode: ErrorMode::Recover, ..Self::default() }
    }

    pub fn with_goal(mut self, goal: Goal) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_web_compat(mut self, web_compat: bool) -> Self {
        self.web_compat = web_compat;
        self
    }

    pub fn with_locations(mut self, locations: bool) -> Self {
        self.locations = locations;
        self
    }
}

impl Default for ParseOptions {
    /// Create a new options struct with default values.
    fn default() -> Self {
        Self { goal: Goal::Script, web_compat: true, mode: ErrorMode::FailFast, locations: false }
    }
}
