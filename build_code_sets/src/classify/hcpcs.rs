use std::collections::HashMap;

pub const DEFAULT_HCPCS_CATEGORY: &str = "Other";

/// HCPCS action code for a discontinued code.
pub const DISCONTINUED_ACTION: &str = "D";

const HCPCS_CATEGORIES: &[(char, &str)] = &[
    ('A', "Transportation Services, Medical and Surgical Supplies"),
    ('B', "Enteral and Parenteral Therapy"),
    ('C', "Outpatient PPS"),
    ('D', "Dental Procedures"),
    ('E', "Durable Medical Equipment"),
    ('G', "Procedures/Professional Services (Temporary)"),
    ('H', "Alcohol and Drug Abuse Treatment Services"),
    ('J', "Drugs Administered Other Than Oral Method"),
    ('K', "Temporary Codes"),
    ('L', "Orthotic/Prosthetic Procedures"),
    ('M', "Medical Services"),
    ('P', "Pathology and Laboratory Services"),
    ('Q', "Temporary Codes"),
    ('R', "Diagnostic Radiology Services"),
    ('S', "Temporary National Codes"),
    ('T', "National T-Codes"),
    ('V', "Vision Services"),
];

#[derive(Debug, Clone)]
pub struct HcpcsCategories {
    by_letter: HashMap<char, &'static str>,
}

impl HcpcsCategories {
    pub fn standard() -> Self {
        Self {
            by_letter: HCPCS_CATEGORIES.iter().copied().collect(),
        }
    }

    pub fn category(&self, code: &str) -> &'static str {
        code.trim()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .and_then(|c| self.by_letter.get(&c).copied())
            .unwrap_or(DEFAULT_HCPCS_CATEGORY)
    }
}

/// Inactive exactly when the action code is `D`; an absent action code is active.
pub fn is_active(action_code: Option<&str>) -> bool {
    action_code != Some(DISCONTINUED_ACTION)
}
