//! Field cleaning, natural-key deduplication, and per-system row acceptance.

use std::{
    collections::{HashMap, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
};

use regex::Regex;

use crate::readers::Cell;

/// Trimmed text truncated to `max_len` characters, or `None` for a missing or
/// not-a-number cell. Quotes are left alone; the SQL literal encoder escapes
/// them, so truncation can never split an escaped pair.
pub fn clean(cell: &Cell, max_len: usize) -> Option<String> {
    cell.as_text().map(|text| clean_str(&text, max_len))
}

/// NUL characters are removed before trimming; the SQL encoder drops them too,
/// so a cleaned value always survives a literal round trip unchanged.
pub fn clean_str(value: &str, max_len: usize) -> String {
    if value.contains('\0') {
        let stripped = value.replace('\0', "");
        return truncate_chars(stripped.trim(), max_len).to_string();
    }
    truncate_chars(value.trim(), max_len).to_string()
}

pub fn truncate_chars(value: &str, max_len: usize) -> &str {
    match value.char_indices().nth(max_len) {
        Some((byte_idx, _)) => &value[..byte_idx],
        None => value,
    }
}

/// Natural key of a record: the code plus its code type (or code system).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeKey {
    pub code: String,
    pub qualifier: &'static str,
}

impl DedupeKey {
    pub fn new(code: &str, qualifier: &'static str) -> Self {
        Self {
            code: code.to_string(),
            qualifier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    New,
    Duplicate,
    /// Same key as an earlier row but different content; still dropped.
    ConflictingDuplicate,
}

/// First-occurrence-wins key set for one pipeline run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashMap<DedupeKey, u64>,
    duplicates: usize,
    conflicting: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key`; `content` is only used to tell plain repeats from
    /// conflicting ones.
    pub fn admit(&mut self, key: DedupeKey, content: &str) -> Admission {
        let fingerprint = fingerprint(content);
        match self.seen.get(&key) {
            None => {
                self.seen.insert(key, fingerprint);
                Admission::New
            }
            Some(first) if *first == fingerprint => {
                self.duplicates += 1;
                Admission::Duplicate
            }
            Some(_) => {
                self.duplicates += 1;
                self.conflicting += 1;
                Admission::ConflictingDuplicate
            }
        }
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn conflicting(&self) -> usize {
        self.conflicting
    }
}

fn fingerprint(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Accepts ICD-10 codes shaped as one uppercase letter, two digits, then
/// anything.
#[derive(Debug, Clone)]
pub struct Icd10Filter {
    pattern: Regex,
}

impl Icd10Filter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"^[A-Z][0-9]{2}")?,
        })
    }

    pub fn accepts(&self, code: &str) -> bool {
        self.pattern.is_match(code)
    }
}

/// How a CPT source row is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CptLine {
    Code(String),
    /// Section title carried forward as the category of later code lines.
    SectionHeader(String),
    Other,
}

pub fn is_five_digit_code(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_all_uppercase(value: &str) -> bool {
    value.chars().any(char::is_uppercase) && !value.chars().any(char::is_lowercase)
}

pub fn classify_cpt_line(first_cell: &str) -> CptLine {
    let value = first_cell.trim();
    if value.is_empty() {
        return CptLine::Other;
    }
    if is_five_digit_code(value) {
        return CptLine::Code(value.to_string());
    }
    let multi_word = value.split_whitespace().nth(1).is_some();
    if value.to_uppercase().contains("SERVICES") || (is_all_uppercase(value) && multi_word) {
        return CptLine::SectionHeader(value.to_string());
    }
    CptLine::Other
}
