//! Property-based tests for parser invariants over generated programs and literals.

use cinder_core::common::options::ParseOptions;
use cinder_core::parser::{self, ast::*, source::Source, ParseOutput};
use proptest::prelude::*;

use std::rc::Rc;

fn source(text: &str) -> Rc<Source> {
    Rc::new(Source::new_from_string("prop.js", text.to_owned()))
}

fn recover(text: &str) -> ParseOutput {
    parser::recover(&source(text), &ParseOptions::default()).unwrap()
}

/// The right hand side of `x = ...;`, which must parse without errors.
fn assigned_value(text: &str) -> Expression {
    let output = parser::parse_script(&source(text)).unwrap();
    match &output.program.body[0] {
        Statement::Expr(stmt) => match &*stmt.expression {
            Expression::Assign(assign) => (*assign.right).clone(),
            other => panic!("expected assignment, found {:?}", other),
        },
        other => panic!("expected expression statement, found {:?}", other),
    }
}

fn template_element(text: &str) -> TemplateElement {
    match assigned_value(text) {
        Expression::Template(mut template) => template.quasis.remove(0),
        other => panic!("expected template, found {:?}", other),
    }
}

// Identifiers end in an underscore so that they are never keywords
fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}".prop_map(|s| format!("{s}_"))
}

fn arb_primary() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_identifier(),
        (0u32..100_000).prop_map(|n| n.to_string()),
        "[a-zA-Z ]{0,12}".prop_map(|s| format!("\"{s}\"")),
        Just("true".to_owned()),
        Just("null".to_owned()),
        Just("this".to_owned()),
    ]
}

/// Nested operands are parenthesized so that every combination is a valid expression.
fn arb_expression() -> impl Strategy<Value = String> {
    arb_primary().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) + ({b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) ** ({b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) ?? (({b}) || ({a}))")),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(a, b, c)| format!("({a}) ? ({b}) : ({c})")),
            (arb_identifier(), inner.clone()).prop_map(|(a, b)| format!("({a}) => ({b})")),
            inner.clone().prop_map(|a| format!("[({a}), ...({a})]")),
            (arb_identifier(), inner.clone()).prop_map(|(a, b)| format!("{{ {a}: ({b}) }}")),
            (arb_identifier(), inner.clone()).prop_map(|(a, b)| format!("{a}?.(({b}))")),
            inner.prop_map(|a| format!("`t${{({a})}}`")),
        ]
    })
}

fn arb_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_expression().prop_map(|expr| format!("({expr});")),
        (arb_identifier(), arb_expression())
            .prop_map(|(name, expr)| format!("var {name} = {expr};")),
        (arb_expression(), arb_expression())
            .prop_map(|(test, expr)| format!("if ({test}) {{ ({expr}); }}")),
        (arb_identifier(), arb_expression())
            .prop_map(|(name, expr)| format!("function {name}() {{ return {expr}; }}")),
    ]
}

fn arb_program() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_statement(), 1..6).prop_map(|stmts| stmts.join("\n"))
}

/// Template contents built from plain text and escape sequences.
fn arb_template_contents() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zA-Z0-9 ]{1,4}",
        Just("\\n".to_owned()),
        Just("\\x41".to_owned()),
        Just("\\u0042".to_owned()),
        Just("\\u{1F600}".to_owned()),
        Just("\\\\".to_owned()),
        Just("\\`".to_owned()),
    ];

    prop::collection::vec(piece, 0..8).prop_map(|pieces| pieces.concat())
}

proptest! {
    /// Property: Generated programs are valid and the program spans the whole source
    #[test]
    fn generated_programs_parse(text in arb_program()) {
        let output = parser::parse_script(&source(&text));
        prop_assert!(output.is_ok(), "failed to parse {}", text);

        let output = output.unwrap();
        prop_assert!(output.diagnostics.is_empty());
        prop_assert_eq!(output.program.loc.end, text.len());
    }

    /// Property: Parsing the same text twice gives identical trees and diagnostics
    #[test]
    fn parsing_is_deterministic(text in "[ -~\n]{0,48}") {
        let first = recover(&text);
        let second = recover(&text);

        prop_assert_eq!(first.program, second.program);
        prop_assert_eq!(first.diagnostics, second.diagnostics);
    }

    /// Property: Recovery mode completes on any input and reaches the end of the source
    #[test]
    fn recovery_always_completes(text in "[ -~\n]{0,48}") {
        let output = recover(&text);
        prop_assert_eq!(output.program.loc.end, text.len());
    }

    /// Property: Integer literals decode to their value in every radix
    #[test]
    fn integer_literals_roundtrip(n in 0u64..(1u64 << 53)) {
        let expected = n as f64;
        for text in [
            format!("x = {};", n),
            format!("x = 0x{:X};", n),
            format!("x = 0o{:o};", n),
            format!("x = 0b{:b};", n),
        ] {
            match assigned_value(&text) {
                Expression::Number(number) => prop_assert_eq!(number.value, expected),
                other => prop_assert!(false, "expected number, found {:?}", other),
            }
        }
    }

    /// Property: Numeric separators between digit groups do not change the value
    #[test]
    fn numeric_separators(n in 1000u64..1_000_000_000) {
        let digits = n.to_string();
        let mut separated = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                separated.push('_');
            }
            separated.push(c);
        }

        match assigned_value(&format!("x = {};", separated)) {
            Expression::Number(number) => prop_assert_eq!(number.value, n as f64),
            other => prop_assert!(false, "expected number, found {:?}", other),
        }
    }

    /// Property: Unicode escapes in strings decode to the escaped code point
    #[test]
    fn unicode_escapes_roundtrip(c in any::<char>()) {
        let text = format!("x = \"\\u{{{:X}}}\";", c as u32);
        match assigned_value(&text) {
            Expression::String(string) => prop_assert_eq!(string.value, c.to_string()),
            other => prop_assert!(false, "expected string, found {:?}", other),
        }
    }

    /// Property: Plain string contents are their own value
    #[test]
    fn plain_strings_roundtrip(s in "[a-zA-Z0-9 !#-&(-\\[\\]-~]{0,24}") {
        match assigned_value(&format!("x = \"{}\";", s)) {
            Expression::String(string) => prop_assert_eq!(string.value, s),
            other => prop_assert!(false, "expected string, found {:?}", other),
        }
    }

    /// Property: Decoding the raw text of a template again reproduces its cooked value
    #[test]
    fn template_raw_recooks(contents in arb_template_contents()) {
        let element = template_element(&format!("x = `{}`;", contents));
        prop_assert_eq!(&element.raw, &contents);

        let recooked = template_element(&format!("x = `{}`;", element.raw));
        prop_assert_eq!(recooked.cooked, element.cooked);
    }
}
