use pretty_assertions::assert_eq;
use sqlpretty::tokenizer::tokenize;
use sqlpretty::{
    format, format_bytes, format_string, Config, KeywordCase, Language, Mode, ParameterSet,
};

fn default_config() -> Config {
    Config::default()
}

fn mode_for(dialect: &str) -> Mode {
    Mode {
        dialect_name: dialect.to_string(),
        ..Mode::default()
    }
}

#[test]
fn test_simple_select_scenario() {
    let out = format(
        "SELECT id, name FROM users WHERE active = true;",
        Language::Standard,
        &default_config(),
    );
    insta::assert_snapshot!(out, @r"
    SELECT
      id,
      name
    FROM
      users
    WHERE
      active = true;
    ");
}

#[test]
fn test_statement_gap_between_top_level_queries() {
    let out = format("SELECT 1; SELECT 2;", Language::Standard, &default_config());
    assert_eq!(out, "SELECT\n  1;\n\nSELECT\n  2;");
}

#[test]
fn test_no_gap_inside_procedural_block() {
    let out = format(
        "BEGIN SELECT 1; SELECT 2; END;",
        Language::Standard,
        &default_config(),
    );
    insta::assert_snapshot!(out, @r"
    BEGIN
      SELECT
        1;
      SELECT
        2;
    END;
    ");
}

#[test]
fn test_dollar_quote_is_one_token() {
    let lexicon = sqlpretty::dialect::dialect_for(Language::PostgreSql).lexicon();
    let tokens = tokenize("SELECT $$a; b$$;", lexicon);
    assert!(tokens.iter().any(|t| t.text == "$$a; b$$"));

    let out = format("SELECT $$a; b$$;", Language::PostgreSql, &default_config());
    assert_eq!(out, "SELECT\n  $$a; b$$;");
}

#[test]
fn test_positional_placeholder_substitution() {
    let config = default_config().with_params(ParameterSet::Positional(vec![
        "x".to_string(),
        "y".to_string(),
    ]));
    let out = format("SELECT $1, $0;", Language::Standard, &config);
    assert_eq!(out, "SELECT\n  y,\n  x;");

    let out = format("SELECT $1, $5;", Language::Standard, &config);
    assert_eq!(out, "SELECT\n  y,\n  $5;");
}

#[test]
fn test_postgres_placeholders_start_at_one() {
    let config = default_config().with_params(ParameterSet::Positional(vec![
        "x".to_string(),
        "y".to_string(),
    ]));
    let out = format("SELECT $1, $2, $0", Language::PostgreSql, &config);
    assert_eq!(out, "SELECT\n  x,\n  y,\n  $0");
}

#[test]
fn test_named_placeholder_substitution() {
    let mut named = std::collections::BTreeMap::new();
    named.insert("id".to_string(), "42".to_string());
    let config = default_config().with_params(ParameterSet::Named(named));
    let out = format(
        "SELECT * FROM t WHERE id = :id AND x = :missing",
        Language::Standard,
        &config,
    );
    assert_eq!(
        out,
        "SELECT\n  *\nFROM\n  t\nWHERE\n  id = 42\n  AND x = :missing"
    );
}

#[test]
fn test_lossless_tokenization() {
    let samples = [
        "SELECT id, name FROM users WHERE active = true;",
        "select 'it''s' -- c\n/* b */ from `t` where x = $$y$$",
        "DECLARE v NUMBER := 1; BEGIN NULL; END;",
        "\u{feff}SELECT 'unterminated",
    ];
    for sample in samples {
        for language in Language::ALL {
            let lexicon = sqlpretty::dialect::dialect_for(language).lexicon();
            let joined: String = tokenize(sample, lexicon)
                .iter()
                .map(|t| t.text.as_str())
                .collect();
            assert_eq!(joined, sample, "{language} lost text");
        }
    }
}

#[test]
fn test_idempotence_across_dialects() {
    let samples = [
        "SELECT a, b FROM t WHERE x IN (1, 2) ORDER BY a",
        "INSERT INTO t (a, b) VALUES (1, 2), (3, 4);",
        "UPDATE t SET a = 1, b = 2 WHERE id = 3;",
        "SELECT CASE WHEN a THEN 1 ELSE 2 END FROM t -- done",
        "BEGIN SELECT 1; END; SELECT 2;",
        "= 's' a BEGIN 1 . WHILE , b",
        "SELECT a OR . . END FROM t",
        "SELECT id AS a, name AS longer FROM t; UPDATE t SET a = 1, bb = 2;",
    ];
    let configs = [
        default_config(),
        default_config()
            .with_align_columns(true)
            .with_align_assignments(true)
            .with_align_values(true),
        default_config()
            .with_max_line_length(20)
            .with_keyword_case(KeywordCase::Upper),
    ];
    for config in &configs {
        for language in Language::ALL {
            for sample in samples {
                let once = format(sample, language, config);
                let twice = format(&once, language, config);
                assert_eq!(once, twice, "{language}: {sample:?}");
            }
        }
    }
}

#[test]
fn test_no_panic_on_garbage() {
    let inputs: [&[u8]; 6] = [
        b"",
        b"\xff\xfe\x00",
        b"((((((((",
        b"))))END END END;;;",
        b"/* unterminated",
        b"$tag$ never closed",
    ];
    for input in inputs {
        for language in Language::ALL {
            let out = format_bytes(input, language, &default_config());
            assert!(!out.ends_with(' '));
        }
    }
}

#[test]
fn test_indent_and_case_options() {
    let config = default_config()
        .with_indent("\t")
        .with_keyword_case(KeywordCase::Upper);
    let out = format("select a from t", Language::Standard, &config);
    assert_eq!(out, "SELECT\n\ta\nFROM\n\tt");
}

#[test]
fn test_no_trailing_whitespace() {
    let out = format(
        "SELECT a ,   b   \n\n FROM t   -- c   \n",
        Language::Standard,
        &default_config(),
    );
    assert!(out.lines().all(|l| l == l.trim_end()));
    assert!(!out.ends_with('\n'));
}

#[test]
fn test_plsql_block() {
    let out = format(
        "DECLARE x NUMBER := 1; BEGIN x := x + 1; EXCEPTION WHEN OTHERS THEN NULL; END;",
        Language::PlSql,
        &default_config().with_keyword_case(KeywordCase::Dialect),
    );
    insta::assert_snapshot!(out, @r"
    DECLARE
      x NUMBER := 1;
    BEGIN
      x := x + 1;
    EXCEPTION
      WHEN OTHERS THEN NULL;
    END;
    ");
}

#[test]
fn test_format_string_adds_trailing_newline() {
    let out = format_string("select 1", &mode_for("standard")).unwrap();
    assert_eq!(out, "select\n  1\n");
}

#[test]
fn test_format_string_detects_dialect() {
    let out = format_string("SELECT `a` FROM t LIMIT 5, 10", &Mode::default()).unwrap();
    assert_eq!(out, "SELECT\n  `a`\nFROM\n  t\nLIMIT\n  5, 10\n");
}

#[test]
fn test_format_string_unknown_dialect() {
    assert!(format_string("select 1", &mode_for("klingon")).is_err());
}
