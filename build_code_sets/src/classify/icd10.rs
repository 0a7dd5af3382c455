use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter {
    pub name: &'static str,
    pub range: &'static str,
}

const UNKNOWN_CHAPTER: Chapter = Chapter {
    name: "Other",
    range: "Unknown",
};

const CHAPTERS: &[(char, &str, &str)] = &[
    ('A', "Infectious and parasitic diseases", "A00-B99"),
    ('B', "Infectious and parasitic diseases", "A00-B99"),
    ('C', "Neoplasms", "C00-D49"),
    ('D', "Diseases of blood and immune system", "D50-D89"),
    ('E', "Endocrine, nutritional and metabolic diseases", "E00-E89"),
    ('F', "Mental and behavioral disorders", "F01-F99"),
    ('G', "Diseases of the nervous system", "G00-G99"),
    ('H', "Diseases of eye/ear and adnexa", "H00-H95"),
    ('I', "Diseases of the circulatory system", "I00-I99"),
    ('J', "Diseases of the respiratory system", "J00-J99"),
    ('K', "Diseases of the digestive system", "K00-K95"),
    ('L', "Diseases of skin and subcutaneous tissue", "L00-L99"),
    ('M', "Diseases of musculoskeletal system", "M00-M99"),
    ('N', "Diseases of the genitourinary system", "N00-N99"),
    ('O', "Pregnancy, childbirth and the puerperium", "O00-O9A"),
    ('P', "Perinatal conditions", "P00-P96"),
    ('Q', "Congenital malformations", "Q00-Q99"),
    ('R', "Symptoms, signs and abnormal findings", "R00-R99"),
    ('S', "Injury, poisoning (by body region)", "S00-T88"),
    ('T', "Injury, poisoning (by type)", "S00-T88"),
    ('U', "Codes for special purposes", "U00-U85"),
    ('V', "External causes - transport accidents", "V00-Y99"),
    ('W', "External causes - other accidents", "V00-Y99"),
    ('X', "External causes - intentional self-harm", "V00-Y99"),
    ('Y', "External causes - assault, undetermined", "V00-Y99"),
    ('Z', "Factors influencing health status", "Z00-Z99"),
];

const SEVENTH_CHARACTER_PREFIXES: &[&str] = &["M80", "M84", "M48.4", "M48.5"];

/// Chapter lookup keyed by the first letter of a code.
#[derive(Debug, Clone)]
pub struct Icd10Chapters {
    by_letter: HashMap<char, Chapter>,
}

impl Icd10Chapters {
    pub fn standard() -> Self {
        let by_letter = CHAPTERS
            .iter()
            .map(|&(letter, name, range)| (letter, Chapter { name, range }))
            .collect();
        Self { by_letter }
    }

    pub fn chapter(&self, code: &str) -> Chapter {
        code.chars()
            .next()
            .and_then(|letter| self.by_letter.get(&letter))
            .copied()
            .unwrap_or(UNKNOWN_CHAPTER)
    }
}

/// Category codes (3 chars), 4-char codes ending in `9`, and placeholder codes
/// containing `X` are not billable.
pub fn is_billable(code: &str) -> bool {
    let len = code.chars().count();
    if len == 3 {
        return false;
    }
    if len == 4 && code.ends_with('9') {
        return false;
    }
    !code.contains('X')
}

pub fn requires_additional_digit(code: &str) -> bool {
    let injury = (code.starts_with('S') || code.starts_with('T')) && code.chars().count() >= 6;
    injury
        || SEVENTH_CHARACTER_PREFIXES
            .iter()
            .any(|prefix| code.starts_with(prefix))
}

/// The three-character category a code belongs to.
pub fn category(code: &str) -> &str {
    match code.char_indices().nth(3) {
        Some((idx, _)) => &code[..idx],
        None => code,
    }
}
