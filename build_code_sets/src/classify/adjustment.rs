//! CARC/RARC type disambiguation and description-driven classification.

use std::fmt;

use serde::Serialize;

use crate::classify::rules::{KeywordRules, rules};
use crate::code_system::CodeSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdjustmentType {
    Carc,
    Rarc,
}

impl AdjustmentType {
    pub fn as_str(self) -> &'static str {
        self.code_system().as_str()
    }

    pub fn code_system(self) -> CodeSystem {
        match self {
            Self::Carc => CodeSystem::Carc,
            Self::Rarc => CodeSystem::Rarc,
        }
    }
}

impl fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CARC_PREFIXES: &[&str] = &["CO", "OA", "PI", "PR"];
const RARC_LEADING_LETTERS: &[char] = &['N', 'M', 'A'];
const NUMERIC_CARC_LIMIT: u32 = 300;

/// Resolves CARC vs RARC. An explicit type value naming `CARC` or `RARC` wins;
/// otherwise the code shape decides (see [`infer_from_code`]).
pub fn resolve_type(code: &str, type_value: Option<&str>) -> AdjustmentType {
    if let Some(value) = type_value {
        let value = value.trim().to_uppercase();
        if value.contains("CARC") {
            return AdjustmentType::Carc;
        }
        if value.contains("RARC") {
            return AdjustmentType::Rarc;
        }
    }
    infer_from_code(code)
}

/// Group-code prefixes and numeric codes below 300 are CARC; codes led by
/// N, M or A are RARC; anything else defaults to CARC.
pub fn infer_from_code(code: &str) -> AdjustmentType {
    let code = code.trim();
    if CARC_PREFIXES.iter().any(|prefix| code.starts_with(prefix)) {
        return AdjustmentType::Carc;
    }
    if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
        return match code.parse::<u32>() {
            Ok(value) if value < NUMERIC_CARC_LIMIT => AdjustmentType::Carc,
            _ => AdjustmentType::Rarc,
        };
    }
    match code.chars().next() {
        Some(first) if RARC_LEADING_LETTERS.contains(&first) => AdjustmentType::Rarc,
        _ => AdjustmentType::Carc,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialClass {
    PatientResponsibility,
    Contractual,
    Adjustment,
    Other,
}

impl FinancialClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PatientResponsibility => "patient_responsibility",
            Self::Contractual => "contractual",
            Self::Adjustment => "adjustment",
            Self::Other => "other",
        }
    }
}

pub const DEFAULT_ADJUSTMENT_CATEGORY: &str = "Administrative";

const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (
        &["patient", "deductible", "copay", "coinsurance"],
        "Patient Responsibility",
    ),
    (&["coverage", "benefit", "covered"], "Coverage"),
    (&["medical necessity", "medically necessary"], "Medical Necessity"),
    (&["limit", "maximum", "exceeded"], "Benefit Limit"),
    (&["administrative", "processing", "clerical"], "Administrative"),
    (&["duplicate", "previously paid"], "Duplicate"),
    (&["authorization", "prior auth"], "Authorization"),
    (&["coordination", "other insurance", "cob"], "COB"),
    (&["contractual", "contract", "allowable"], "Contractual"),
    (&["documentation", "records", "missing"], "Documentation"),
    (&["eligibility", "eligible"], "Eligibility"),
    (&["timely filing", "claim filing", "late"], "Timely Filing"),
    (&["coding", "procedure code", "diagnosis"], "Coding Error"),
    (&["bundling", "bundled", "inclusive"], "Bundling"),
    (&["appeal", "review"], "Appeal Rights"),
    (&["routing", "forward"], "Routing"),
];

const FINANCIAL_CLASS_RULES: &[(&[&str], FinancialClass)] = &[
    (
        &["patient", "deductible", "copay", "coinsurance"],
        FinancialClass::PatientResponsibility,
    ),
    (
        &["contractual", "allowable", "contract"],
        FinancialClass::Contractual,
    ),
    (
        &["write", "adjustment", "non-covered"],
        FinancialClass::Adjustment,
    ),
];

// Non-appealable terms are checked before appealable ones.
const APPEALABILITY_RULES: &[(&[&str], bool)] = &[
    (&["duplicate", "timely filing", "late", "administrative"], false),
    (&["medical necessity", "coverage", "denial", "benefit"], true),
];

/// Keyword tables for CARC/RARC descriptions, built once per run.
#[derive(Debug, Clone)]
pub struct AdjustmentRules {
    categories: KeywordRules<&'static str>,
    financial_classes: KeywordRules<FinancialClass>,
    appealability: KeywordRules<bool>,
}

impl AdjustmentRules {
    pub fn standard() -> Self {
        Self {
            categories: rules(CATEGORY_RULES, DEFAULT_ADJUSTMENT_CATEGORY),
            financial_classes: rules(FINANCIAL_CLASS_RULES, FinancialClass::Other),
            appealability: rules(APPEALABILITY_RULES, false),
        }
    }

    pub fn category(&self, description: &str) -> &'static str {
        self.categories.classify(description)
    }

    pub fn financial_class(&self, description: &str) -> FinancialClass {
        self.financial_classes.classify(description)
    }

    pub fn appealable(&self, description: &str) -> bool {
        self.appealability.classify(description)
    }
}

pub fn requires_patient_notification(description: &str) -> bool {
    description.to_lowercase().contains("patient")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_type_value_wins() {
        assert_eq!(resolve_type("N1", Some("RARC (informational)")), AdjustmentType::Rarc);
        assert_eq!(resolve_type("N1", Some("carc")), AdjustmentType::Carc);
        assert_eq!(resolve_type("45", Some("RARC")), AdjustmentType::Rarc);
    }

    #[test]
    fn inconclusive_type_value_uses_code_shape() {
        assert_eq!(resolve_type("CO45", Some("Group")), AdjustmentType::Carc);
        assert_eq!(resolve_type("MA130", Some("Group")), AdjustmentType::Rarc);
        assert_eq!(resolve_type("B7", Some("")), AdjustmentType::Carc);
        assert_eq!(resolve_type("45", None), AdjustmentType::Carc);
    }

    #[test]
    fn code_shape_rule() {
        assert_eq!(infer_from_code("PR1"), AdjustmentType::Carc);
        assert_eq!(infer_from_code("299"), AdjustmentType::Carc);
        assert_eq!(infer_from_code("300"), AdjustmentType::Rarc);
        assert_eq!(infer_from_code("N130"), AdjustmentType::Rarc);
        assert_eq!(infer_from_code("M15"), AdjustmentType::Rarc);
        assert_eq!(infer_from_code("A1"), AdjustmentType::Rarc);
        assert_eq!(infer_from_code("P12"), AdjustmentType::Carc);
    }

    #[test]
    fn category_priority_order() {
        let rules = AdjustmentRules::standard();
        assert_eq!(
            rules.category("Deductible amount exceeded the benefit maximum"),
            "Patient Responsibility"
        );
        assert_eq!(rules.category("Benefit maximum has been reached"), "Coverage");
        assert_eq!(rules.category("Duplicate claim/service"), "Duplicate");
        assert_eq!(rules.category("Claim lacks information"), "Administrative");
        assert_eq!(rules.category("Forward to the correct payer"), "Routing");
    }

    #[test]
    fn financial_class_groups() {
        let rules = AdjustmentRules::standard();
        assert_eq!(
            rules.financial_class("Coinsurance amount"),
            FinancialClass::PatientResponsibility
        );
        assert_eq!(
            rules.financial_class("Charge exceeds fee schedule/maximum allowable"),
            FinancialClass::Contractual
        );
        assert_eq!(rules.financial_class("Non-covered charge"), FinancialClass::Adjustment);
        assert_eq!(rules.financial_class("Claim lacks information"), FinancialClass::Other);
    }

    #[test]
    fn appealability_checks_negative_terms_first() {
        let rules = AdjustmentRules::standard();
        assert!(!rules.appealable("Late filing of a coverage denial"));
        assert!(rules.appealable("Not deemed a medical necessity"));
        assert!(!rules.appealable("Claim lacks information"));
    }

    #[test]
    fn patient_notification() {
        assert!(requires_patient_notification("Patient refused the service"));
        assert!(!requires_patient_notification("Duplicate claim"));
    }
}
