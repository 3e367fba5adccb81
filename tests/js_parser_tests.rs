use cinder_core::common::options::ParseOptions;
use cinder_core::parser::{
    self,
    ast::*,
    diagnostic::{DiagnosticCode, Severity},
    source::Source,
    ParseError, ParseOutput, ParseResult,
};

use std::rc::Rc;

fn source(text: &str) -> Rc<Source> {
    Rc::new(Source::new_from_string("test.js", text.to_owned()))
}

fn parse_script(text: &str) -> ParseResult<ParseOutput> {
    parser::parse_script(&source(text))
}

fn parse_module(text: &str) -> ParseResult<ParseOutput> {
    parser::parse_module(&source(text))
}

fn recover(text: &str) -> ParseOutput {
    parser::recover(&source(text), &ParseOptions::default()).unwrap()
}

/// Parse a valid script, failing the test on any error.
fn parse_ok(text: &str) -> Program {
    match parse_script(text) {
        Ok(output) => output.program,
        Err(err) => panic!("failed to parse {:?}: {}", text, err),
    }
}

/// The code of the first error in a fail-fast parse.
fn error_code(result: ParseResult<ParseOutput>) -> DiagnosticCode {
    match result {
        Err(ParseError::Syntax(diagnostic)) => diagnostic.code,
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("expected a syntax error"),
    }
}

fn script_error(text: &str) -> DiagnosticCode {
    error_code(parse_script(text))
}

fn expression_at(program: &Program, index: usize) -> &Expression {
    match &program.body[index] {
        Statement::Expr(stmt) => &stmt.expression,
        other => panic!("expected expression statement, found {:?}", other),
    }
}

/// The right hand side of the assignment in the first statement.
fn assigned_value(program: &Program) -> &Expression {
    match expression_at(program, 0) {
        Expression::Assign(assign) => &assign.right,
        other => panic!("expected assignment, found {:?}", other),
    }
}

fn number_value(text: &str) -> f64 {
    match assigned_value(&parse_ok(text)) {
        Expression::Number(number) => number.value,
        other => panic!("expected number, found {:?}", other),
    }
}

#[test]
fn valid_program_spans_source() {
    let text = "let a = 1;\nfunction f(b) { return a + b; }\nf(2);\n";
    let output = parse_script(text).unwrap();

    assert_eq!(output.program.loc.start, 0);
    assert_eq!(output.program.loc.end, text.len());
    assert_eq!(output.program.body.len(), 3);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn numeric_literals() {
    assert_eq!(number_value("x = 0x1F;"), 31.0);
    assert_eq!(number_value("x = 0o17;"), 15.0);
    assert_eq!(number_value("x = 0b101;"), 5.0);
    assert_eq!(number_value("x = 1_000;"), 1000.0);
    assert_eq!(number_value("x = .5e1;"), 5.0);
}

#[test]
fn legacy_octal_is_a_warning_in_sloppy_mode() {
    let output = parse_script("x = 008;").unwrap();
    assert_eq!(number_value("x = 008;"), 8.0);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, DiagnosticCode::LegacyLeadingZero);
    assert_eq!(output.diagnostics[0].severity, Severity::Warning);

    assert_eq!(script_error("x = 0_8;"), DiagnosticCode::UnderscoreAfterZero);
    assert_eq!(script_error("'use strict'; x = 017;"), DiagnosticCode::StrictOctal);
}

#[test]
fn template_cooking() {
    match assigned_value(&parse_ok("x = `A`;")) {
        Expression::Template(template) => {
            assert_eq!(template.quasis[0].cooked.as_deref(), Some("A"));
        }
        other => panic!("expected template, found {:?}", other),
    }

    // Tagged templates tolerate malformed escapes
    let output = parse_script("tag`\\xZZ`;").unwrap();
    assert!(output.diagnostics.is_empty());
    match expression_at(&output.program, 0) {
        Expression::TaggedTemplate(tagged) => {
            assert_eq!(tagged.quasi.quasis[0].cooked, None);
            assert_eq!(tagged.quasi.quasis[0].raw, "\\xZZ");
        }
        other => panic!("expected tagged template, found {:?}", other),
    }

    assert_eq!(script_error("`\\xZZ`;"), DiagnosticCode::InvalidHexEscapeSequence);
}

#[test]
fn template_substitutions() {
    match assigned_value(&parse_ok("x = `a${b}c${d + 1}e`;")) {
        Expression::Template(template) => {
            assert_eq!(template.quasis.len(), 3);
            assert_eq!(template.expressions.len(), 2);
            assert_eq!(template.quasis[2].cooked.as_deref(), Some("e"));
        }
        other => panic!("expected template, found {:?}", other),
    }
}

#[test]
fn duplicate_lexical_bindings() {
    assert_eq!(script_error("let a; let a;"), DiagnosticCode::DupLexBind);
    assert_eq!(script_error("{ const a = 1; var a; }"), DiagnosticCode::DupLexBind);
    assert_eq!(
        script_error("for (let x of y) { var x; }"),
        DiagnosticCode::DupLexBind
    );

    parse_ok("var a; var a;");
    parse_ok("let a; { let a; }");
}

#[test]
fn recovery_reports_and_completes() {
    let text = "for (let x of y) { var x; }";
    let output = recover(text);

    assert!(!output.diagnostics.is_empty());
    assert_eq!(output.diagnostics[0].code, DiagnosticCode::DupLexBind);
    assert_eq!(output.program.loc.end, text.len());
    assert!(matches!(output.program.body[0], Statement::ForEach(_)));
}

#[test]
fn recovery_continues_after_lexical_error() {
    let text = "let s = \"abc\nlet t = 1;\n";
    let output = recover(text);

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, DiagnosticCode::UnterminatedString);
    assert_eq!(output.program.body.len(), 2);
    assert_eq!(output.program.loc.end, text.len());
}

#[test]
fn recovery_reaches_end_of_garbage() {
    let text = "let = ;\nfoo(1, ;\nclass { x y }\n) ] }\n";
    let output = recover(text);

    assert!(output.diagnostics.iter().any(|diagnostic| diagnostic.is_error()));
    assert_eq!(output.program.loc.end, text.len());
}

#[test]
fn stray_tokens_expect_a_statement() {
    assert_eq!(script_error("if (a) ) b;"), DiagnosticCode::ExpectedStatement);
    assert_eq!(script_error("while (a)"), DiagnosticCode::ExpectedStatement);

    let output = recover("a; ) else b;");
    assert_eq!(output.diagnostics.len(), 2);
    assert!(output
        .diagnostics
        .iter()
        .all(|diagnostic| diagnostic.code == DiagnosticCode::ExpectedStatement));
    assert_eq!(output.program.body.len(), 4);
    assert!(matches!(output.program.body[3], Statement::Expr(_)));
}

#[test]
fn parsing_is_deterministic() {
    let text = "let [a, ...b] = c; a ?? (b || d); x = (y) => y ** 2; `t${a}`; let a;";
    let first = recover(text);
    let second = recover(text);

    assert_eq!(first.program, second.program);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn arrow_functions() {
    match assigned_value(&parse_ok("f = (a, { b }, ...c) => a;")) {
        Expression::ArrowFunction(func) => {
            assert_eq!(func.params.len(), 3);
            assert!(matches!(func.params[2], FunctionParam::Rest(_)));
            assert!(matches!(*func.body, FunctionBody::Expression(_)));
            assert!(!func.is_async);
        }
        other => panic!("expected arrow function, found {:?}", other),
    }

    match assigned_value(&parse_ok("f = async x => { await x; };")) {
        Expression::ArrowFunction(func) => {
            assert!(func.is_async);
            assert!(matches!(*func.body, FunctionBody::Block(_)));
        }
        other => panic!("expected arrow function, found {:?}", other),
    }

    // Not an arrow function at all
    assert!(matches!(assigned_value(&parse_ok("f = (a, b);")), Expression::Sequence(_)));
    assert!(matches!(assigned_value(&parse_ok("f = async(a, b);")), Expression::Call(_)));

    assert_eq!(script_error("f = (a)\n=> a;"), DiagnosticCode::ArrowOnNewLine);
    assert_eq!(script_error("f = (a, a) => a;"), DiagnosticCode::DuplicateIdentifier);
    assert_eq!(script_error("f = (a)(b) => a;"), DiagnosticCode::UnexpectedArrow);

    // Invalid parameters are reported once and parsing continues after the arrow function
    let output = recover("f = (a + b) => a; g;");
    assert!(!output.diagnostics.is_empty());
    assert!(matches!(output.program.body.last(), Some(Statement::Expr(_))));
}

#[test]
fn arrow_parameter_defaults_with_delimiters() {
    let text = "f = (a = /[)]/, b = `${(c)}`, c = x / (2), d = { e: [f] }) => a;";
    match assigned_value(&parse_ok(text)) {
        Expression::ArrowFunction(func) => assert_eq!(func.params.len(), 4),
        other => panic!("expected arrow function, found {:?}", other),
    }

    let text = "f = (a = `${ `${ ')' }` }`) => a;";
    assert!(matches!(assigned_value(&parse_ok(text)), Expression::ArrowFunction(_)));

    // A regular expression or template with a `=>` inside is still a parenthesized expression
    assert!(matches!(assigned_value(&parse_ok("f = (/) => 1/);")), Expression::RegExp(_)));
    assert!(matches!(assigned_value(&parse_ok("f = (`) => 1`);")), Expression::Template(_)));
}

#[test]
fn deeply_nested_arrow_functions() {
    let depth = 30;
    let nested_defaults = format!("{}0{}", "(a = ".repeat(depth), ") => 1".repeat(depth));
    let nested_async = format!("{}0{}", "async (a = ".repeat(depth), ") => 1".repeat(depth));
    let nested_parens = format!("(a = {}0{}) => 1", "(".repeat(depth), ")".repeat(depth));

    for text in &[nested_defaults, nested_async, nested_parens] {
        let program = parse_ok(&format!("f = {};", text));
        assert!(matches!(assigned_value(&program), Expression::ArrowFunction(_)));
        assert!(recover(text).diagnostics.is_empty());
    }
}

#[test]
fn assignment_targets() {
    parse_ok("[a, ...b] = c;");
    parse_ok("({ a, b: [c = 1], ...d } = e);");
    parse_ok("({ a = 1 } = b);");
    parse_ok("a.b += 1; a[0] ??= 2;");

    assert_eq!(script_error("1 = 2;"), DiagnosticCode::InvalidLHS);
    assert_eq!(script_error("[a] += 1;"), DiagnosticCode::InvalidLHS);
    assert_eq!(script_error("[...a, b] = c;"), DiagnosticCode::RestNotLast);
    assert_eq!(script_error("({ a = 1 });"), DiagnosticCode::ObjCoverInit);
    assert_eq!(script_error("(a + b)++;"), DiagnosticCode::LHSPostOp);
    assert_eq!(script_error("++f();"), DiagnosticCode::LHSPreOp);
}

#[test]
fn duplicate_proto() {
    assert_eq!(script_error("x = { __proto__: 1, __proto__: 2 };"), DiagnosticCode::DuplicateProto);
    parse_ok("x = { __proto__: 1, ['__proto__']: 2 };");
    parse_ok("({ __proto__: a, __proto__: b } = c);");
}

#[test]
fn strict_mode_errors() {
    assert_eq!(script_error("'use strict'; with (a) {}"), DiagnosticCode::StrictWith);
    assert_eq!(script_error("'use strict'; delete x;"), DiagnosticCode::StrictDelete);
    assert_eq!(script_error("'use strict'; eval = 1;"), DiagnosticCode::StrictEvalArguments);
    assert_eq!(script_error("'use strict'; arguments++;"), DiagnosticCode::StrictEvalArguments);

    parse_ok("with (a) {} delete x; eval = 1;");
}

#[test]
fn for_of_heads() {
    parse_ok("for (async in x);");
    parse_ok("for (async.x of y);");
    parse_ok("for (async of => {}; ;);");
    parse_module("async function f() { for await (async of x); }").unwrap();
    assert_eq!(script_error("for (async of x);"), DiagnosticCode::ForOfAsync);
    assert_eq!(script_error("for (let.x of y);"), DiagnosticCode::ForOfLet);

    // Sloppy mode allows a var to redeclare a simple catch parameter, except in a for-of head
    parse_ok("try {} catch (e) { var e; for (var e in []); }");
    assert_eq!(
        script_error("try {} catch (e) { for (var e of []); }"),
        DiagnosticCode::BoundClause
    );
    assert_eq!(
        script_error("try {} catch (e) { for (var [e] of []); }"),
        DiagnosticCode::BoundClause
    );
    assert_eq!(
        script_error("try {} catch (e) { var e; for (var e of []); }"),
        DiagnosticCode::BoundClause
    );
}

#[test]
fn directive_prologues() {
    let program = parse_ok("'use strict'\n'other'\nx;");
    assert!(program.strict);
    assert_eq!(program.directives.len(), 2);
    assert_eq!(script_error("'use strict'\n010;"), DiagnosticCode::StrictOctal);

    // A string continued on the next line is an expression statement
    for text in ["'use strict'\n.length; 010;", "'use strict'\n+ 1; 010;", "'use strict'\n, a; 010;"] {
        let program = parse_ok(text);
        assert!(!program.strict);
        assert!(program.directives.is_empty());
    }

    let program = parse_ok("function f() { 'use strict'\n[a] = b; return 010; }");
    assert!(!program.strict);
}

#[test]
fn operator_mixing() {
    assert_eq!(script_error("a ?? b || c;"), DiagnosticCode::InvalidCoalescing);
    assert_eq!(script_error("a && b ?? c;"), DiagnosticCode::InvalidCoalescing);
    parse_ok("(a ?? b) || c; a ?? (b && c);");

    assert_eq!(script_error("-x ** 2;"), DiagnosticCode::InvalidExponentation);
    parse_ok("(-x) ** 2; 2 ** -x;");
}

#[test]
fn exponentiation_is_right_associative() {
    match assigned_value(&parse_ok("x = a ** b ** c;")) {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOperator::Exponent);
            assert!(matches!(*binary.left, Expression::Id(_)));
            assert!(matches!(*binary.right, Expression::Binary(_)));
        }
        other => panic!("expected binary expression, found {:?}", other),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    match assigned_value(&parse_ok("x = a + b * c - d;")) {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOperator::Subtract);
            match &*binary.left {
                Expression::Binary(left) => {
                    assert_eq!(left.operator, BinaryOperator::Add);
                    assert!(matches!(*left.right, Expression::Binary(_)));
                }
                other => panic!("expected binary expression, found {:?}", other),
            }
        }
        other => panic!("expected binary expression, found {:?}", other),
    }
}

#[test]
fn regexp_and_division() {
    assert!(matches!(assigned_value(&parse_ok("x = a / b / c;")), Expression::Binary(_)));

    match assigned_value(&parse_ok("x = /[/]+/gi;")) {
        Expression::RegExp(regexp) => {
            assert_eq!(regexp.pattern, "[/]+");
            assert_eq!(regexp.flags, "gi");
        }
        other => panic!("expected regular expression, found {:?}", other),
    }
}

#[test]
fn optional_chains() {
    assert!(matches!(assigned_value(&parse_ok("x = a?.b.c();")), Expression::Chain(_)));
    assert!(matches!(assigned_value(&parse_ok("x = a?.[0]?.(1);")), Expression::Chain(_)));

    assert_eq!(script_error("new a?.b();"), DiagnosticCode::OptionalChainingNoNew);
    assert_eq!(script_error("a?.b`t`;"), DiagnosticCode::ChainNoTemplate);
}

#[test]
fn super_and_meta_properties() {
    parse_ok("class A extends B { constructor() { super(); super.x; } }");
    parse_ok("x = { m() { return super.m(); } };");
    parse_ok("function f() { return new.target; }");

    assert_eq!(script_error("function f() { super.x; }"), DiagnosticCode::InvalidSuperProperty);
    assert_eq!(
        script_error("class A { constructor() { super(); } }"),
        DiagnosticCode::InvalidSuperCall
    );
    assert_eq!(script_error("new.target;"), DiagnosticCode::UnexpectedToken);
    assert_eq!(script_error("function f() { new.foo; }"), DiagnosticCode::InvalidNewTarget);
    assert_eq!(script_error("import.meta;"), DiagnosticCode::InvalidImportMeta);

    parse_module("import.meta.url;").unwrap();
    parse_script("import('a');").unwrap();
}

#[test]
fn yield_and_await() {
    let program = parse_ok("function* g() { yield\n1; }");
    let body = match &program.body[0] {
        Statement::FuncDecl(func) => match &*func.body {
            FunctionBody::Block(block) => &block.body,
            other => panic!("expected block body, found {:?}", other),
        },
        other => panic!("expected function declaration, found {:?}", other),
    };

    match &body[0] {
        Statement::Expr(stmt) => match &*stmt.expression {
            Expression::Yield(yield_expr) => assert!(yield_expr.argument.is_none()),
            other => panic!("expected yield, found {:?}", other),
        },
        other => panic!("expected expression statement, found {:?}", other),
    }

    parse_ok("function* g() { yield* a; const x = yield; }");
    parse_ok("async function f() { await a; for await (const x of y) {} }");
    parse_ok("var yield = 1, await = 2;");

    assert_eq!(
        script_error("function* g(a = yield) {}"),
        DiagnosticCode::YieldInParameter
    );
    assert_eq!(
        script_error("async function f(a = await b) {}"),
        DiagnosticCode::AwaitInParameter
    );

    // Modules allow top-level await
    parse_module("await a;").unwrap();
}

#[test]
fn object_literal_methods_and_accessors() {
    parse_ok("x = { a, b: 1, [c]: 2, d() {}, get e() { return 1; }, set e(v) {}, async *f() {} };");
    parse_ok("x = { get: 1, set: 2, async: 3, get() {}, async() {} };");

    assert_eq!(script_error("x = { get a(b) {} };"), DiagnosticCode::GetterArity);
    assert_eq!(script_error("x = { set a() {} };"), DiagnosticCode::SetterArity);
    assert_eq!(script_error("x = { get *a() {} };"), DiagnosticCode::GeneratorAccessor);
}

#[test]
fn private_names() {
    parse_ok("class A { #x; has(o) { return #x in o; } get() { return this.#x; } }");
    assert_eq!(
        script_error("class A { #x; m() { #x; } }"),
        DiagnosticCode::UnexpectedToken
    );
}

#[test]
fn labels_and_jumps() {
    parse_ok("a: for (;;) { b: while (x) { continue a; } break; }");

    assert_eq!(script_error("a: a: ;"), DiagnosticCode::DuplicateLabel);
    assert_eq!(script_error("for (;;) { break b; }"), DiagnosticCode::UnknownLabel);
    assert_eq!(script_error("break;"), DiagnosticCode::InvalidBreak);
    assert_eq!(script_error("return;"), DiagnosticCode::IllegalReturn);
}

#[test]
fn modules() {
    parse_module("import a, { b as c } from 'm'; export { a, c as d }; export default 1;")
        .unwrap();
    parse_module("export * as ns from 'm'; export const x = 1;").unwrap();

    assert_eq!(script_error("import a from 'm';"), DiagnosticCode::ImportInScript);
    assert_eq!(script_error("export const a = 1;"), DiagnosticCode::ExportInScript);
    assert_eq!(
        error_code(parse_module("const a = 1; export { a, a };")),
        DiagnosticCode::DuplicateExport
    );
}
