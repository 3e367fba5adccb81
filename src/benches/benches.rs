use std::rc::Rc;

use cinder_core::common::options::ParseOptions;
use cinder_core::parser::{self, diagnostic::ErrorMode, source::Source, ParseOutput};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn setup_step(file: &str) -> Rc<Source> {
    Rc::new(Source::new_from_file(&format!("benches/{}", file)).unwrap())
}

fn parse_step(source: Rc<Source>, options: &ParseOptions) -> ParseOutput {
    parser::parse(&source, options).unwrap()
}

/// Repeat a statement template until the source is at least the requested number of bytes. Each
/// `@` in the template is replaced with the repetition index.
fn generated_source(template: &str, min_size: usize) -> Rc<Source> {
    let mut contents = String::with_capacity(min_size + template.len());
    let mut i = 0;
    while contents.len() < min_size {
        contents.push_str(&template.replace('@', &i.to_string()));
        i += 1;
    }

    Rc::new(Source::new_from_string("<generated>", contents))
}

/// Benchmark parsing a file in both error modes.
fn bench_file(c: &mut Criterion, file: &str) {
    let fail_fast_options = ParseOptions::module();
    c.bench_function(&format!("{} > parse", file), |b| {
        b.iter_batched(
            || setup_step(file),
            |source| parse_step(source, &fail_fast_options),
            BatchSize::PerIteration,
        )
    });

    let recover_options = ParseOptions::module().with_mode(ErrorMode::Recover);
    c.bench_function(&format!("{} > recover", file), |b| {
        b.iter_batched(
            || setup_step(file),
            |source| parse_step(source, &recover_options),
            BatchSize::PerIteration,
        )
    });
}

pub fn file_benches(c: &mut Criterion) {
    bench_file(c, "sample.js");
}

/// Parenthesized expressions and arrow functions go through the arrow head scan, literals
/// stress the tokenizer.
pub fn generated_benches(c: &mut Criterion) {
    let options = ParseOptions::default();

    let arrows = generated_source(
        "let f@ = (a, { b, c = @ }, ...d) => (a + b) * (c - d.length);\n",
        64 * 1024,
    );
    c.bench_function("arrows > parse", |b| {
        b.iter_batched(
            || arrows.clone(),
            |source| parse_step(source, &options),
            BatchSize::SmallInput,
        )
    });

    let literals = generated_source(
        "x@ = [0x@F, 0o17, 1_000, \"a\\u0041@\", `t${@}\\n`, 1e@, @n, /a@/g];\n",
        64 * 1024,
    );
    c.bench_function("literals > parse", |b| {
        b.iter_batched(
            || literals.clone(),
            |source| parse_step(source, &options),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(files, file_benches);
criterion_group!(generated, generated_benches);
criterion_main!(files, generated);
