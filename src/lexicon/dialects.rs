//! Lexicons for each supported dialect, layered over [`super::common`].

use phf::{phf_map, phf_set};

use super::common::{NEWLINE, RESERVED, TOP_LEVEL, TOP_LEVEL_NO_INDENT};
use super::{BlockContext, Lexicon, Opener, PlaceholderSyntax, StringStyle, Words};

const CASE: Opener = Opener {
    context: BlockContext::Case,
    header_end: None,
};
const BODY: Opener = Opener {
    context: BlockContext::ProceduralBlock,
    header_end: None,
};
const IF_THEN: Opener = Opener {
    context: BlockContext::ProceduralBlock,
    header_end: Some("then"),
};
const WHILE_DO: Opener = Opener {
    context: BlockContext::ProceduralBlock,
    header_end: Some("do"),
};

static BASE_SECTIONS: Words = phf_set! { "else", "elsif", "elseif" };

// ---- Openers / closers ----

const CLOSES_CASE: &[&str] = &["case"];
const CLOSES_CASE_BEGIN: &[&str] = &["case", "begin"];
const CLOSES_CASE_BEGIN_DECLARE: &[&str] = &["case", "begin", "declare"];
const CLOSES_IF: &[&str] = &["if"];
const CLOSES_LOOP: &[&str] = &["loop"];
const CLOSES_REPEAT: &[&str] = &["repeat"];
const CLOSES_WHILE: &[&str] = &["while"];

static SIMPLE_OPENERS: phf::Map<&'static str, Opener> = phf_map! {
    "case" => CASE,
    "begin" => BODY,
};

static SIMPLE_CLOSERS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "end" => CLOSES_CASE_BEGIN,
    "end case" => CLOSES_CASE,
};

static N1QL_OPENERS: phf::Map<&'static str, Opener> = phf_map! {
    "case" => CASE,
};

static N1QL_CLOSERS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "end" => CLOSES_CASE,
};

static PG_OPENERS: phf::Map<&'static str, Opener> = phf_map! {
    "case" => CASE,
    "begin" => BODY,
    "if" => IF_THEN,
    "loop" => BODY,
};

static PG_CLOSERS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "end" => CLOSES_CASE_BEGIN,
    "end case" => CLOSES_CASE,
    "end if" => CLOSES_IF,
    "end loop" => CLOSES_LOOP,
};

static MYSQL_OPENERS: phf::Map<&'static str, Opener> = phf_map! {
    "case" => CASE,
    "begin" => BODY,
    "if" => IF_THEN,
    "loop" => BODY,
    "repeat" => BODY,
    "while" => WHILE_DO,
};

static MYSQL_CLOSERS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "end" => CLOSES_CASE_BEGIN,
    "end case" => CLOSES_CASE,
    "end if" => CLOSES_IF,
    "end loop" => CLOSES_LOOP,
    "end repeat" => CLOSES_REPEAT,
    "end while" => CLOSES_WHILE,
};

static PLSQL_OPENERS: phf::Map<&'static str, Opener> = phf_map! {
    "case" => CASE,
    "begin" => BODY,
    "declare" => BODY,
    "if" => IF_THEN,
    "loop" => BODY,
};

static PLSQL_CLOSERS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "end" => CLOSES_CASE_BEGIN_DECLARE,
    "end case" => CLOSES_CASE,
    "end if" => CLOSES_IF,
    "end loop" => CLOSES_LOOP,
};

// ---- Dialect keyword extensions ----

static PG_TOP_LEVEL: Words = phf_set! {
    "returning",
    "on conflict",
    "do update set",
    "do nothing",
    "declare",
};

static PG_RESERVED: Words = phf_set! {
    "similar to",
    "is distinct from",
    "is not distinct from",
    "language",
    "returns",
    "plpgsql",
    "perform",
    "raise",
    "notice",
    "exception",
};

static PG_NEWLINE: Words = phf_set! { "elsif", "exception" };

static PG_SECTIONS: Words = phf_set! { "else", "elsif", "exception" };

static MYSQL_TOP_LEVEL: Words = phf_set! {
    "replace into",
    "on duplicate key update",
    "straight_join",
};

static MYSQL_NEWLINE: Words = phf_set! { "xor", "elseif", "until" };

static MYSQL_RESERVED: Words = phf_set! {
    "auto_increment",
    "engine",
    "charset",
    "declare",
    "do",
    "handler",
    "leave",
    "iterate",
    "regexp",
    "rlike",
    "div",
    "unsigned",
};

static SQLITE_TOP_LEVEL: Words = phf_set! {
    "pragma",
    "insert or replace into",
    "insert or ignore into",
    "returning",
};

static SQLITE_RESERVED: Words = phf_set! {
    "autoincrement",
    "glob",
    "vacuum",
    "without rowid",
    "deferred",
    "immediate",
    "exclusive",
};

static PLSQL_TOP_LEVEL: Words = phf_set! {
    "returning",
    "connect by",
    "start with",
    "model",
};

static PLSQL_NO_INDENT: Words = phf_set! { "minus" };

static PLSQL_NEWLINE: Words = phf_set! { "elsif", "exception" };

static PLSQL_RESERVED: Words = phf_set! {
    "nvl",
    "dual",
    "rownum",
    "sysdate",
    "varchar2",
    "number",
    "out",
    "nocopy",
    "pragma",
    "raise",
    "exit when",
    "open",
    "fetch",
    "close",
    "cursor",
};

static PLSQL_SECTIONS: Words = phf_set! { "else", "elsif", "exception" };

static N1QL_TOP_LEVEL: Words = phf_set! {
    "use keys",
    "use index",
    "nest",
    "unnest",
    "let",
    "letting",
    "upsert into",
    "explain",
    "infer",
};

static N1QL_RESERVED: Words = phf_set! {
    "missing",
    "valued",
    "satisfies",
    "every",
    "some",
    "within",
    "raw",
    "element",
    "keyspace",
    "namespace",
};

static DB2_TOP_LEVEL: Words = phf_set! {
    "fetch first",
    "fetch next",
};

static DB2_RESERVED: Words = phf_set! {
    "current date",
    "current time",
    "current timestamp",
    "sysibm",
    "sysdummy1",
    "rows only",
    "do",
    "leave",
    "iterate",
    "declare",
    "signal",
};

static DB2_NEWLINE: Words = phf_set! { "elseif" };

// ---- Lexicons ----

const QUOTED: &[StringStyle] = &[
    StringStyle::quoted(b'\''),
    StringStyle::quoted(b'"'),
    StringStyle::quoted(b'`'),
];

const ESCAPED: &[StringStyle] = &[
    StringStyle::escaped(b'\''),
    StringStyle::escaped(b'"'),
    StringStyle::escaped(b'`'),
];

const SQLITE_STRINGS: &[StringStyle] = &[
    StringStyle::quoted(b'\''),
    StringStyle::quoted(b'"'),
    StringStyle::quoted(b'`'),
    StringStyle {
        open: b'[',
        close: b']',
        backslash: false,
    },
];

const ANSI_QUOTED: &[StringStyle] = &[StringStyle::quoted(b'\''), StringStyle::quoted(b'"')];

const DASH: &[&str] = &["--"];
const DASH_HASH: &[&str] = &["--", "#"];

pub static STANDARD: Lexicon = Lexicon {
    name: "standard",
    top_level: &[&TOP_LEVEL],
    top_level_no_indent: &[&TOP_LEVEL_NO_INDENT],
    newline: &[&NEWLINE],
    reserved: &[&RESERVED],
    openers: &SIMPLE_OPENERS,
    closers: &SIMPLE_CLOSERS,
    block_sections: &BASE_SECTIONS,
    strings: QUOTED,
    prefixed_strings: &[(b'N', false), (b'n', false), (b'X', false), (b'x', false)],
    dollar_quotes: false,
    bracket_parens: true,
    line_comments: DASH,
    placeholders: PlaceholderSyntax {
        indexed: b"?$",
        named: b":",
        base: 0,
    },
    variable_prefixes: b"",
};

pub static POSTGRESQL: Lexicon = Lexicon {
    name: "postgresql",
    top_level: &[&TOP_LEVEL, &PG_TOP_LEVEL],
    top_level_no_indent: &[&TOP_LEVEL_NO_INDENT],
    newline: &[&NEWLINE, &PG_NEWLINE],
    reserved: &[&RESERVED, &PG_RESERVED],
    openers: &PG_OPENERS,
    closers: &PG_CLOSERS,
    block_sections: &PG_SECTIONS,
    strings: ANSI_QUOTED,
    prefixed_strings: &[
        (b'E', true),
        (b'e', true),
        (b'B', false),
        (b'b', false),
        (b'X', false),
        (b'x', false),
    ],
    dollar_quotes: true,
    bracket_parens: true,
    line_comments: DASH,
    placeholders: PlaceholderSyntax {
        indexed: b"$",
        named: b":",
        base: 1,
    },
    variable_prefixes: b"",
};

pub static MYSQL: Lexicon = Lexicon {
    name: "mysql",
    top_level: &[&TOP_LEVEL, &MYSQL_TOP_LEVEL],
    top_level_no_indent: &[&TOP_LEVEL_NO_INDENT],
    newline: &[&NEWLINE, &MYSQL_NEWLINE],
    reserved: &[&RESERVED, &MYSQL_RESERVED],
    openers: &MYSQL_OPENERS,
    closers: &MYSQL_CLOSERS,
    block_sections: &BASE_SECTIONS,
    strings: ESCAPED,
    prefixed_strings: &[(b'N', true), (b'n', true), (b'X', false), (b'x', false)],
    dollar_quotes: false,
    bracket_parens: true,
    line_comments: DASH_HASH,
    placeholders: PlaceholderSyntax {
        indexed: b"?",
        named: b"",
        base: 0,
    },
    variable_prefixes: b"@",
};

pub static SQLITE: Lexicon = Lexicon {
    name: "sqlite",
    top_level: &[&TOP_LEVEL, &SQLITE_TOP_LEVEL],
    top_level_no_indent: &[&TOP_LEVEL_NO_INDENT],
    newline: &[&NEWLINE],
    reserved: &[&RESERVED, &SQLITE_RESERVED],
    openers: &SIMPLE_OPENERS,
    closers: &SIMPLE_CLOSERS,
    block_sections: &BASE_SECTIONS,
    strings: SQLITE_STRINGS,
    prefixed_strings: &[(b'X', false), (b'x', false)],
    dollar_quotes: false,
    bracket_parens: false,
    line_comments: DASH,
    placeholders: PlaceholderSyntax {
        indexed: b"?",
        named: b":@$",
        base: 1,
    },
    variable_prefixes: b"",
};

pub static PLSQL: Lexicon = Lexicon {
    name: "plsql",
    top_level: &[&TOP_LEVEL, &PLSQL_TOP_LEVEL],
    top_level_no_indent: &[&TOP_LEVEL_NO_INDENT, &PLSQL_NO_INDENT],
    newline: &[&NEWLINE, &PLSQL_NEWLINE],
    reserved: &[&RESERVED, &PLSQL_RESERVED],
    openers: &PLSQL_OPENERS,
    closers: &PLSQL_CLOSERS,
    block_sections: &PLSQL_SECTIONS,
    strings: ANSI_QUOTED,
    prefixed_strings: &[(b'N', false), (b'n', false)],
    dollar_quotes: false,
    bracket_parens: true,
    line_comments: DASH,
    placeholders: PlaceholderSyntax {
        indexed: b"?",
        named: b":",
        base: 0,
    },
    variable_prefixes: b"",
};

pub static N1QL: Lexicon = Lexicon {
    name: "n1ql",
    top_level: &[&TOP_LEVEL, &N1QL_TOP_LEVEL],
    top_level_no_indent: &[&TOP_LEVEL_NO_INDENT],
    newline: &[&NEWLINE],
    reserved: &[&RESERVED, &N1QL_RESERVED],
    openers: &N1QL_OPENERS,
    closers: &N1QL_CLOSERS,
    block_sections: &BASE_SECTIONS,
    strings: ESCAPED,
    prefixed_strings: &[],
    dollar_quotes: false,
    bracket_parens: true,
    line_comments: DASH_HASH,
    placeholders: PlaceholderSyntax {
        indexed: b"$",
        named: b"$",
        base: 1,
    },
    variable_prefixes: b"",
};

pub static DB2: Lexicon = Lexicon {
    name: "db2",
    top_level: &[&TOP_LEVEL, &DB2_TOP_LEVEL],
    top_level_no_indent: &[&TOP_LEVEL_NO_INDENT],
    newline: &[&NEWLINE, &DB2_NEWLINE],
    reserved: &[&RESERVED, &DB2_RESERVED],
    openers: &MYSQL_OPENERS,
    closers: &MYSQL_CLOSERS,
    block_sections: &BASE_SECTIONS,
    strings: ANSI_QUOTED,
    prefixed_strings: &[(b'X', false), (b'x', false), (b'G', false), (b'g', false)],
    dollar_quotes: false,
    bracket_parens: true,
    line_comments: DASH,
    placeholders: PlaceholderSyntax {
        indexed: b"?",
        named: b":",
        base: 0,
    },
    variable_prefixes: b"",
};

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&Lexicon; 7] = [&STANDARD, &POSTGRESQL, &MYSQL, &SQLITE, &PLSQL, &N1QL, &DB2];

    #[test]
    fn test_every_closer_names_a_known_opener() {
        for lexicon in ALL {
            for (closer, openers) in lexicon.closers.entries() {
                for opener in openers.iter() {
                    assert!(
                        lexicon.openers.contains_key(*opener),
                        "{}: {closer:?} closes unknown opener {opener:?}",
                        lexicon.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_phrases_fit_the_lookup_window() {
        for lexicon in ALL {
            let sets = lexicon
                .top_level
                .iter()
                .chain(lexicon.top_level_no_indent)
                .chain(lexicon.newline)
                .chain(lexicon.reserved);
            for set in sets {
                for phrase in set.iter() {
                    assert!(phrase.split(' ').count() <= super::super::MAX_PHRASE_WORDS);
                }
            }
            for closer in lexicon.closers.keys() {
                assert!(closer.split(' ').count() <= super::super::MAX_PHRASE_WORDS);
            }
        }
    }

    #[test]
    fn test_placeholder_syntax() {
        assert_eq!(STANDARD.placeholders.base, 0);
        assert_eq!(POSTGRESQL.placeholders.base, 1);
        assert!(SQLITE.placeholders.named.contains(&b'@'));
        assert!(MYSQL.placeholders.named.is_empty());
        assert!(POSTGRESQL.dollar_quotes);
        assert!(!N1QL.dollar_quotes);
    }
}
