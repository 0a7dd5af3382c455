use serde::Deserialize;

use crate::error::SourceError;

const MODIFIER_CATALOG_JSON: &str = include_str!("../../data/modifiers.json");

/// A modifier as published in the embedded catalog. Nothing about a modifier
/// is inferred; every field comes from here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModifierEntry {
    pub code: String,
    pub description: String,
    pub short_description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub modifier_type: String,
    /// Applies to CPT (HCPCS Level I).
    pub level_i: bool,
    /// Applies to HCPCS Level II.
    pub level_ii: bool,
}

pub fn modifier_catalog() -> Result<Vec<ModifierEntry>, SourceError> {
    Ok(serde_json::from_str(MODIFIER_CATALOG_JSON)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_parses_with_unique_codes() {
        let entries = modifier_catalog().expect("embedded catalog");
        assert!(entries.len() > 100);
        let codes: HashSet<&str> = entries.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes.len(), entries.len());
    }

    #[test]
    fn telehealth_modifier_levels() {
        let entries = modifier_catalog().expect("embedded catalog");
        let m95 = entries.iter().find(|e| e.code == "95").expect("modifier 95");
        assert_eq!(m95.category, "telehealth");
        assert!(m95.level_i && !m95.level_ii);
        let gt = entries.iter().find(|e| e.code == "GT").expect("modifier GT");
        assert!(!gt.level_i && gt.level_ii);
    }
}
