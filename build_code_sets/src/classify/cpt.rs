use std::ops::RangeInclusive;

pub const DEFAULT_CPT_CATEGORY: &str = "Other";

const CPT_RANGES: &[(u32, u32, &str)] = &[
    (99201, 99499, "Evaluation and Management"),
    (10021, 69990, "Surgery"),
    (70010, 79999, "Radiology"),
    (80047, 89398, "Pathology and Laboratory"),
    (90281, 99199, "Medicine"),
    (99500, 99607, "Home Health Procedures/Services"),
];

#[derive(Debug, Clone)]
pub struct CptRange {
    pub codes: RangeInclusive<u32>,
    pub category: &'static str,
}

/// Disjoint numeric ranges mapping CPT codes to specialty categories.
#[derive(Debug, Clone)]
pub struct CptRanges {
    ranges: Vec<CptRange>,
}

impl CptRanges {
    pub fn standard() -> Self {
        let ranges = CPT_RANGES
            .iter()
            .map(|&(start, end, category)| CptRange {
                codes: start..=end,
                category,
            })
            .collect();
        Self { ranges }
    }

    pub fn range_category(&self, code: &str) -> Option<&'static str> {
        let value: u32 = code.trim().parse().ok()?;
        self.ranges
            .iter()
            .find(|range| range.codes.contains(&value))
            .map(|range| range.category)
    }

    /// Range category, else the carried-forward section header, else `Other`.
    pub fn category(&self, code: &str, carried: Option<&str>) -> String {
        match self.range_category(code) {
            Some(category) => category.to_string(),
            None => carried
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CPT_CATEGORY)
                .to_string(),
        }
    }
}
