use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlpretty::dialect::dialect_for;
use sqlpretty::tokenizer::tokenize;
use sqlpretty::{format, format_string, Config, Language, Mode};

const SENTINEL: &str = ")))))__SQLPRETTY_OUTPUT__(((((";

fn load_test_file(name: &str) -> String {
    let path = format!("tests/data/{}", name);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    match content.find(SENTINEL) {
        Some(pos) => content[..pos].to_string(),
        None => content,
    }
}

/// A long script made by repeating every standard fixture.
fn large_script() -> String {
    let names = [
        "unformatted/101_case.sql",
        "unformatted/102_subquery.sql",
        "unformatted/103_joins.sql",
        "unformatted/104_between.sql",
        "unformatted/109_begin_block.sql",
    ];
    let one: String = names
        .iter()
        .map(|name| format!("{};\n", load_test_file(name).trim().trim_end_matches(';')))
        .collect();
    one.repeat(200)
}

fn bench_format_small(c: &mut Criterion) {
    let sql = "SELECT a, b, c FROM my_table WHERE x = 1 AND y > 2 ORDER BY a\n";
    let config = Config::default();
    c.bench_function("format_small", |b| {
        b.iter(|| format(black_box(sql), Language::Standard, black_box(&config)))
    });
}

fn bench_format_large(c: &mut Criterion) {
    let sql = large_script();
    let config = Config::default();
    c.bench_function("format_large", |b| {
        b.iter(|| format(black_box(&sql), Language::Standard, black_box(&config)))
    });
}

fn bench_tokenize_only(c: &mut Criterion) {
    let sql = large_script();
    let lexicon = dialect_for(Language::Standard).lexicon();
    c.bench_function("tokenize_only", |b| b.iter(|| tokenize(black_box(&sql), lexicon)));
}

fn bench_dialects(c: &mut Criterion) {
    let sql = large_script();
    let config = Config::default();
    let mut group = c.benchmark_group("dialects");
    for language in Language::ALL {
        group.bench_function(language.name(), |b| {
            b.iter(|| format(black_box(&sql), language, black_box(&config)))
        });
    }
    group.finish();
}

fn bench_safety_check_overhead(c: &mut Criterion) {
    let sql = large_script();
    let mut group = c.benchmark_group("safety_check_overhead");

    let with = Mode {
        dialect_name: "standard".to_string(),
        ..Mode::default()
    };
    group.bench_function("with_safety", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&with)).unwrap())
    });

    let without = Mode {
        fast: true,
        ..with.clone()
    };
    group.bench_function("without_safety", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&without)).unwrap())
    });

    let detect = Mode {
        fast: true,
        ..Mode::default()
    };
    group.bench_function("auto_detect", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&detect)).unwrap())
    });
    group.finish();
}

fn bench_max_line_length(c: &mut Criterion) {
    let sql = large_script();
    let config = Config::default().with_max_line_length(40).with_align_columns(true);
    c.bench_function("format_limited_width", |b| {
        b.iter(|| format(black_box(&sql), Language::Standard, black_box(&config)))
    });
}

criterion_group!(
    benches,
    bench_format_small,
    bench_format_large,
    bench_tokenize_only,
    bench_dialects,
    bench_safety_check_overhead,
    bench_max_line_length,
);
criterion_main!(benches);
