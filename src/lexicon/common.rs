//! Keyword sets shared by every dialect.

use phf::phf_set;

use super::Words;

pub static TOP_LEVEL: Words = phf_set! {
    "select",
    "from",
    "where",
    "group by",
    "having",
    "order by",
    "limit",
    "offset",
    "with",
    "with recursive",
    "insert into",
    "insert",
    "update",
    "set",
    "delete from",
    "delete",
    "values",
    "window",
    "create table",
    "create view",
    "create or replace view",
    "create function",
    "create or replace function",
    "create procedure",
    "create or replace procedure",
    "create trigger",
    "create or replace trigger",
    "create index",
    "create unique index",
    "alter table",
    "drop table",
    "truncate table",
    "add",
    "alter column",
    "drop column",
    "merge into",
};

pub static TOP_LEVEL_NO_INDENT: Words = phf_set! {
    "union",
    "union all",
    "union distinct",
    "except",
    "except all",
    "intersect",
    "intersect all",
};

pub static NEWLINE: Words = phf_set! {
    "and",
    "or",
    "when",
    "else",
    "join",
    "inner join",
    "left join",
    "left outer join",
    "right join",
    "right outer join",
    "full join",
    "full outer join",
    "cross join",
    "natural join",
    "natural left join",
    "natural right join",
};

pub static RESERVED: Words = phf_set! {
    "all",
    "alter",
    "any",
    "array",
    "as",
    "asc",
    "between",
    "both",
    "by",
    "cascade",
    "cast",
    "check",
    "collate",
    "column",
    "constraint",
    "create",
    "cross",
    "current_date",
    "current_time",
    "current_timestamp",
    "default",
    "desc",
    "distinct",
    "drop",
    "escape",
    "exists",
    "false",
    "fetch",
    "filter",
    "first",
    "following",
    "for",
    "foreign",
    "full",
    "function",
    "grant",
    "if",
    "ilike",
    "in",
    "index",
    "inner",
    "interval",
    "into",
    "is",
    "key",
    "last",
    "lateral",
    "leading",
    "left",
    "like",
    "natural",
    "next",
    "not",
    "null",
    "nulls",
    "of",
    "on",
    "only",
    "outer",
    "over",
    "partition by",
    "preceding",
    "primary key",
    "procedure",
    "range",
    "recursive",
    "references",
    "replace",
    "right",
    "row",
    "rows",
    "table",
    "then",
    "ties",
    "to",
    "trailing",
    "transaction",
    "trigger",
    "true",
    "unbounded",
    "unique",
    "unknown",
    "using",
    "view",
    "work",
    "begin",
    "commit",
    "rollback",
    "savepoint",
};
