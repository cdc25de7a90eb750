//! Profiling driver: formats a generated script in a loop so a sampling
//! profiler has something steady to look at.
//!
//! Usage: `cargo run --release --example profile -- [iterations] [dialect]`

use sqlpretty::{format, Config, Language};
use std::hint::black_box;

const STATEMENTS: &[&str] = &[
    "SELECT a.id, b.name AS label, count(*) FROM a LEFT JOIN b ON a.id = b.a_id \
     WHERE a.x BETWEEN 1 AND 5 AND b.y IN (SELECT y FROM c) GROUP BY a.id, b.name;",
    "INSERT INTO t (a, b, c) VALUES (1, 'one', NULL), (2, 'two', 3.5);",
    "UPDATE t SET a = a + 1, b = coalesce(b, 'x') WHERE id = 7; -- bump",
    "BEGIN SELECT CASE WHEN x > 0 THEN 'pos' ELSE 'neg' END FROM t; END;",
];

fn main() {
    let mut args = std::env::args().skip(1);
    let iterations: usize = args.next().and_then(|n| n.parse().ok()).unwrap_or(2000);
    let language: Language = match args.next().map(|name| name.parse()) {
        Some(Ok(language)) => language,
        Some(Err(e)) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        None => Language::Standard,
    };

    let source = STATEMENTS.join("\n").repeat(50);
    let config = Config::default().with_align_columns(true);

    let mut bytes = 0;
    for _ in 0..iterations {
        bytes += black_box(format(black_box(&source), language, &config)).len();
    }
    println!("{} iterations, {} bytes of output", iterations, bytes);
}
