pub mod ast;
mod context;
pub mod diagnostic;
mod expression;
mod lexer;
pub mod loc;
mod parse_error;
mod parser;
mod printer;
mod scope;
pub mod source;
mod token;

pub use parse_error::{LocalizedParseError, ParseError, ParseResult};
pub use parser::{parse, parse_module, parse_script, recover, ParseOutput};
pub use printer::{print_program, program_to_json};
