//! Resolves which source columns play the code / description / type roles.

/// Keyword sets per role. A label matches a role when it contains any of the
/// role's keywords, ignoring case. An empty set never matches.
#[derive(Debug, Clone, Copy)]
pub struct RoleKeywords {
    pub code: &'static [&'static str],
    pub description: &'static [&'static str],
    pub code_type: &'static [&'static str],
}

impl RoleKeywords {
    /// No keywords at all: every role resolves positionally.
    pub const POSITIONAL: RoleKeywords = RoleKeywords {
        code: &[],
        description: &[],
        code_type: &[],
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub code: usize,
    pub description: usize,
    /// No positional fallback; downstream inference covers the gap.
    pub code_type: Option<usize>,
}

/// Lowercases and collapses `_`, `-` and whitespace runs into single spaces so
/// `SHORT_DESCRIPTION` and `Short  Description` compare the same.
fn normalize_label(value: &str) -> String {
    value
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// First label containing any of `keywords`.
pub fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    if keywords.is_empty() {
        return None;
    }
    let wanted: Vec<String> = keywords.iter().map(|k| normalize_label(k)).collect();
    headers.iter().position(|header| {
        let label = normalize_label(header);
        wanted.iter().any(|keyword| label.contains(keyword.as_str()))
    })
}

/// Resolves each role independently; one label may serve several roles.
pub fn map_columns(headers: &[String], roles: &RoleKeywords) -> ColumnMap {
    let code = find_column(headers, roles.code).unwrap_or(0);
    let description = find_column(headers, roles.description)
        .unwrap_or(if headers.len() > 1 { 1 } else { 0 });
    let code_type = find_column(headers, roles.code_type);
    ColumnMap {
        code,
        description,
        code_type,
    }
}

/// Header label for a resolved column, for log lines.
pub fn label_at(headers: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| headers.get(i))
        .map(String::as_str)
        .unwrap_or("<none>")
}
