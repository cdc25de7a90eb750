use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Language;

/// Lines searched for an inline `sqlpretty: dialect=<name>` hint.
const HINT_LINES: usize = 5;

static HINT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:--|/\*)\s*sqlpretty:\s*dialect\s*=\s*([A-Za-z0-9_/]+)").ok()
});

/// Heuristic patterns and the dialect each one votes for.
const RULES: &[(Language, &str)] = &[
    (Language::PostgreSql, r"\$\$"),
    (Language::PostgreSql, r"\$[A-Za-z_]\w*\$"),
    (Language::PostgreSql, r"::\s*[A-Za-z_]"),
    (Language::PostgreSql, r"(?i)\bRETURNING\b"),
    (Language::PostgreSql, r"(?i)\bON\s+CONFLICT\b"),
    (Language::PostgreSql, r"(?i)\bILIKE\b"),
    (Language::PostgreSql, r"(?i)\b(?:BIG)?SERIAL\b"),
    (Language::PostgreSql, r"->>"),
    (Language::MySql, r"`"),
    (Language::MySql, r"(?i)\bAUTO_INCREMENT\b"),
    (Language::MySql, r"(?i)\bENGINE\s*="),
    (Language::MySql, r"(?i)\bDELIMITER\b"),
    (Language::MySql, r"(?i)\bUNSIGNED\b"),
    (Language::MySql, r"(?i)\bLIMIT\s+\d+\s*,\s*\d+"),
    (Language::Sqlite, r"(?i)\bPRAGMA\b"),
    (Language::Sqlite, r"(?i)\bAUTOINCREMENT\b"),
    (Language::Sqlite, r"(?i)\bWITHOUT\s+ROWID\b"),
    (Language::Sqlite, r"(?i)\bsqlite_\w+"),
    (Language::PlSql, r":="),
    (Language::PlSql, r"(?i)%(?:ROW)?TYPE\b"),
    (Language::PlSql, r"(?i)\bVARCHAR2\b"),
    (Language::PlSql, r"(?i)\bELSIF\b"),
    (Language::PlSql, r"(?i)\bFROM\s+DUAL\b"),
    (Language::PlSql, r"(?i)\bNVL\s*\("),
    (Language::N1ql, r"(?i)\bUSE\s+KEYS\b"),
    (Language::N1ql, r"(?i)\b(?:UN)?NEST\b"),
    (Language::N1ql, r"(?i)\bMETA\s*\("),
    (Language::Db2, r"(?i)\bSYSIBM\b"),
    (Language::Db2, r"(?i)\bSYSDUMMY1\b"),
    (Language::Db2, r"(?i)\bWITH\s+UR\b"),
    (Language::Db2, r"(?i)\bFETCH\s+FIRST\s+\d+\s+ROWS?\s+ONLY\b"),
];

static COMPILED: LazyLock<Vec<(Language, Regex)>> = LazyLock::new(|| {
    RULES
        .iter()
        .filter_map(|&(language, pattern)| Regex::new(pattern).ok().map(|re| (language, re)))
        .collect()
});

/// Dialect named by an inline hint comment near the top of `text`.
fn hinted_language(text: &str) -> Option<Language> {
    let hint = HINT.as_ref()?;
    text.lines().take(HINT_LINES).find_map(|line| {
        let name = hint.captures(line)?.get(1)?.as_str();
        match name.parse() {
            Ok(language) => Some(language),
            Err(e) => {
                tracing::debug!("ignoring dialect hint: {e}");
                None
            }
        }
    })
}

/// Guess the dialect of `text`.
///
/// Returns the language and whether anything actually matched. An inline
/// hint wins outright; otherwise each heuristic that matches casts one vote
/// and the language with the most votes is chosen, ties going to the earlier
/// language in [`Language::ALL`]. Without any match the result is
/// `(Language::Standard, false)`.
pub fn detect_language(text: &str) -> (Language, bool) {
    if let Some(language) = hinted_language(text) {
        return (language, true);
    }

    let mut votes = [0usize; Language::ALL.len()];
    for (language, re) in COMPILED.iter() {
        if re.is_match(text) {
            votes[*language as usize] += 1;
        }
    }

    let mut best = (Language::Standard, 0);
    for (language, count) in Language::ALL.into_iter().zip(votes) {
        if count > best.1 {
            best = (language, count);
        }
    }
    (best.0, best.1 > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_compiles() {
        assert_eq!(COMPILED.len(), RULES.len());
        assert!(HINT.is_some());
    }

    #[test]
    fn test_no_match_is_standard() {
        assert_eq!(detect_language("SELECT a FROM t"), (Language::Standard, false));
        assert_eq!(detect_language(""), (Language::Standard, false));
    }

    #[test]
    fn test_postgres_markers() {
        assert_eq!(detect_language("select $$x$$::text").0, Language::PostgreSql);
        assert_eq!(
            detect_language("INSERT INTO t VALUES (1) RETURNING id").0,
            Language::PostgreSql
        );
    }

    #[test]
    fn test_other_dialects() {
        assert_eq!(detect_language("SELECT `a` FROM `t` LIMIT 5, 10").0, Language::MySql);
        assert_eq!(detect_language("PRAGMA foreign_keys = ON").0, Language::Sqlite);
        assert_eq!(
            detect_language("DECLARE v NUMBER; BEGIN v := 1; END;").0,
            Language::PlSql
        );
        assert_eq!(
            detect_language("SELECT * FROM b USE KEYS 'k'").0,
            Language::N1ql
        );
        assert_eq!(
            detect_language("SELECT 1 FROM SYSIBM.SYSDUMMY1").0,
            Language::Db2
        );
    }

    #[test]
    fn test_most_votes_wins() {
        // One MySQL marker against two PL/SQL markers.
        let sql = "SELECT `a` FROM t; x := NVL(y, 0);";
        assert_eq!(detect_language(sql), (Language::PlSql, true));
    }

    #[test]
    fn test_tie_goes_to_catalogue_order() {
        let sql = "SELECT `a` FROM t RETURNING b";
        assert_eq!(detect_language(sql).0, Language::PostgreSql);
    }

    #[test]
    fn test_inline_hint_wins() {
        let sql = "-- sqlpretty: dialect=db2\nSELECT $$x$$::text";
        assert_eq!(detect_language(sql), (Language::Db2, true));

        let sql = "/* sqlpretty: dialect=oracle */ SELECT 1";
        assert_eq!(detect_language(sql), (Language::PlSql, true));
    }

    #[test]
    fn test_hint_only_near_top() {
        let sql = "\n\n\n\n\n-- sqlpretty: dialect=db2\nSELECT 1";
        assert_eq!(detect_language(sql), (Language::Standard, false));
    }

    #[test]
    fn test_bad_hint_falls_back_to_heuristics() {
        let sql = "-- sqlpretty: dialect=cobol\nPRAGMA user_version";
        assert_eq!(detect_language(sql), (Language::Sqlite, true));
    }
}
