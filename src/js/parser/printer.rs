use serde_json::Value;

use super::ast::Program;

/// Render a program as a JSON value. Every node carries a `type` tag, and a `loc` object with
/// start and end offsets when locations are requested.
pub fn program_to_json(program: &Program, locations: bool) -> Value {
    let mut value = serde_json::to_value(program).unwrap_or_default();

    if !locations {
        strip_locations(&mut value);
    }

    value
}

/// Pretty print a program as JSON.
pub fn print_program(program: &Program, locations: bool) -> String {
    let value = program_to_json(program, locations);
    let mut printed = serde_json::to_string_pretty(&value).unwrap_or_default();
    printed.push('\n');
    printed
}

fn strip_locations(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("loc");
            for child in map.values_mut() {
                strip_locations(child);
            }
        }
        Value::Array(elements) => {
            for element in elements {
                strip_locations(element);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Directive, EmptyStatement, SourceType, Statement};
    use crate::parser::loc::Loc;

    fn program() -> Program {
        Program {
            loc: Loc::new(0, 14),
            source_type: SourceType::Script,
            directives: vec![Directive {
                loc: Loc::new(0, 13),
                value: "use strict".to_owned(),
                raw: "\"use strict\"".to_owned(),
            }],
            body: vec![Statement::Empty(EmptyStatement { loc: Loc::new(13, 14) })],
            strict: true,
        }
    }

    #[test]
    fn locations_are_optional() {
        let with_locations = program_to_json(&program(), true);
        assert_eq!(with_locations["loc"]["end"], 14);
        assert_eq!(with_locations["body"][0]["loc"]["start"], 13);

        let without_locations = program_to_json(&program(), false);
        assert!(without_locations.get("loc").is_none());
        assert!(without_locations["body"][0].get("loc").is_none());
        assert_eq!(without_locations["type"], "Program");
        assert_eq!(without_locations["sourceType"], "script");
        assert_eq!(without_locations["directives"][0]["value"], "use strict");
    }

    #[test]
    fn printed_output_ends_with_newline() {
        let printed = print_program(&program(), false);
        assert!(printed.starts_with('{'));
        assert!(printed.ends_with("}\n"));
        assert!(printed.contains("\"EmptyStatement\""));
    }
}
