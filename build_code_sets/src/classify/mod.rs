//! Rule-based classification. Every table here is immutable once built; the
//! orchestrator builds one [`ClassificationTables`] per run and lends it to
//! each pipeline.

pub mod adjustment;
pub mod cpt;
pub mod hcpcs;
pub mod icd10;
pub mod rules;

use adjustment::AdjustmentRules;
use cpt::CptRanges;
use hcpcs::HcpcsCategories;
use icd10::Icd10Chapters;

#[derive(Debug, Clone)]
pub struct ClassificationTables {
    pub icd10_chapters: Icd10Chapters,
    pub cpt_ranges: CptRanges,
    pub hcpcs_categories: HcpcsCategories,
    pub adjustment: AdjustmentRules,
}

impl ClassificationTables {
    pub fn standard() -> Self {
        Self {
            icd10_chapters: Icd10Chapters::standard(),
            cpt_ranges: CptRanges::standard(),
            hcpcs_categories: HcpcsCategories::standard(),
            adjustment: AdjustmentRules::standard(),
        }
    }
}

impl Default for ClassificationTables {
    fn default() -> Self {
        Self::standard()
    }
}
