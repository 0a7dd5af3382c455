use std::fmt::{self, Write};

use chrono::NaiveDate;

/// A value as it appears inside a `VALUES` tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Bool(bool),
    Int(i64),
    Date(NaiveDate),
}

impl SqlValue {
    pub fn text(value: impl Into<String>) -> Self {
        SqlValue::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(SqlValue::text).unwrap_or(SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Text(value) => write_quoted(f, value),
            SqlValue::Bool(value) => f.write_str(if *value { "true" } else { "false" }),
            SqlValue::Int(value) => write!(f, "{value}"),
            SqlValue::Date(value) => write!(f, "'{}'::date", value.format("%Y-%m-%d")),
        }
    }
}

/// Single-quoted string literal. Embedded quotes are doubled and NUL bytes,
/// which no SQL text type accepts, are dropped.
fn write_quoted<W: Write>(out: &mut W, value: &str) -> fmt::Result {
    out.write_char('\'')?;
    for ch in value.chars() {
        match ch {
            '\'' => out.write_str("''")?,
            '\0' => {}
            other => out.write_char(other)?,
        }
    }
    out.write_char('\'')
}
