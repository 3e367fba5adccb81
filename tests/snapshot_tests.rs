use cinder_core::common::options::ParseOptions;
use cinder_core::parser::{self, diagnostic::Severity, source::Source};

use std::{cmp::min, env, error, fs, path::Path, rc::Rc};

type GenericResult<T> = Result<T, Box<dyn error::Error>>;

const RECORD_ENV_VAR: &str = "RECORD";

struct TestEnv {
    errors: Vec<String>,
}

#[test]
fn js_parser_snapshot_tests() -> GenericResult<()> {
    let parser_tests_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("js_parser");
    run_snapshot_tests(&parser_tests_dir, &mut |path| print_diagnostics(path))
}

/// Parse in recovery mode and list every diagnostic, one per line. Files with `module` in their
/// path are parsed with the module goal.
fn print_diagnostics(path: &str) -> GenericResult<String> {
    let source = Rc::new(Source::new_from_file(path)?);

    let options = if path.contains("module") {
        ParseOptions::module()
    } else {
        ParseOptions::default()
    };

    let output = parser::recover(&source, &options)?;

    if output.diagnostics.is_empty() {
        return Ok("No diagnostics\n".to_owned());
    }

    let mut result = String::new();
    for diagnostic in &output.diagnostics {
        let (line, col) = source.line_col(diagnostic.loc.start);
        let severity = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };

        result.push_str(&format!("{}:{}: {}: {}\n", line, col, severity, diagnostic.message()));
    }

    Ok(result)
}

/// Run snapshot tests for all js files under the given directory.
///
/// Individual tests implemented as a function takes in a path and returns the output of the test.
fn run_snapshot_tests(
    root_path: &Path,
    test_fn: &mut impl FnMut(&str) -> GenericResult<String>,
) -> GenericResult<()> {
    let mut env = TestEnv { errors: vec![] };
    visit_directory(&mut env, root_path, test_fn)?;

    if !env.errors.is_empty() {
        assert_eq!("actual", "expected", "\n{}\n", env.errors.join(""))
    }

    Ok(())
}

/// Recursively visit all subdirectories under the target directory, searching for js files.
fn visit_directory(
    env: &mut TestEnv,
    path: &Path,
    test_fn: &mut impl FnMut(&str) -> GenericResult<String>,
) -> GenericResult<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            visit_directory(env, &path, test_fn)?
        } else if path.is_file() {
            if let Some(extension) = path.extension() {
                if extension.to_str() == Some("js") {
                    process_snapshot_test_file(env, &path, test_fn)?
                }
            }
        }
    }

    Ok(())
}

/// Compare actual vs expected output for the test file with the given path.
fn process_snapshot_test_file(
    env: &mut TestEnv,
    path: &Path,
    test_fn: &mut impl FnMut(&str) -> GenericResult<String>,
) -> GenericResult<()> {
    let path_str = path.to_str().unwrap();
    let exp_path = path.with_extension("exp");

    let actual = test_fn(path_str)?;

    let expected = if exp_path.exists() {
        fs::read_to_string(&exp_path)?
    } else {
        String::new()
    };

    if actual != expected {
        if env::var(RECORD_ENV_VAR).is_ok() {
            fs::write(&exp_path, &actual)?;
        }

        env.errors.push(find_diff_snippet(path, &actual, &expected))
    }

    Ok(())
}

const RED: &str = "\u{001B}[31m";
const GREEN: &str = "\u{001B}[32m";
const RESET: &str = "\u{001B}[0m";
const BOLD: &str = "\u{001B}[1m";

/// Find and format a snippet showing the difference between the two strings.
fn find_diff_snippet(path: &Path, actual: &str, expected: &str) -> String {
    let actual_lines = actual.lines().collect::<Vec<&str>>();
    let expected_lines = expected.lines().collect::<Vec<&str>>();

    // Find the first line that differs between the strings
    let mut i = 0;
    while i < actual_lines.len() && i < expected_lines.len() && actual_lines[i] == expected_lines[i]
    {
        i += 1;
    }

    let actual_snippet = if i == actual_lines.len() {
        String::new()
    } else {
        let snippet_end = min(i + 10, actual_lines.len());
        let lines = actual_lines[i..snippet_end].join("\n+ ");
        format!("{}{}+ {}{}", RED, BOLD, lines, RESET)
    };

    let expected_snippet = if i == expected_lines.len() {
        String::new()
    } else {
        let snippet_end = min(i + 10, expected_lines.len());
        let lines = expected_lines[i..snippet_end].join("\n- ");
        format!("{}{}- {}{}", GREEN, BOLD, lines, RESET)
    };

    format!(
        "\n{}\nActual and expected differ on line {}\n{}\n{}\n",
        path.to_str().unwrap(),
        i,
        expected_snippet,
        actual_snippet
    )
}
