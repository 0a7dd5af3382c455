pub const DEFAULT_ICD10_PATH: &str = "data/raw/icd10/icd10cm_order_2026.txt";
pub const DEFAULT_CPT_PATH: &str = "data/raw/cpt/cpt_code_list.xlsx";
pub const DEFAULT_HCPCS_PATH: &str = "data/raw/hcpcs/hcpcs_transaction_report.xlsx";
pub const DEFAULT_CARC_RARC_PATH: &str = "data/raw/carc_rarc/carc_rarc_codes.xlsx";
pub const DEFAULT_OUTPUT_PATH: &str = "data/output/populate_medical_codes.sql";
pub const SUMMARY_SUFFIX: &str = ".summary.json";

pub const DEFAULT_ICD10_EFFECTIVE_DATE: &str = "2026-01-01";
pub const DEFAULT_EFFECTIVE_DATE: &str = "2025-01-01";

pub const DEFAULT_MAX_TEXT_LEN: usize = 1000;
pub const DEFAULT_ADJUSTMENT_MAX_TEXT_LEN: usize = 2000;
pub const SHORT_DESCRIPTION_LEN: usize = 100;
pub const CPT_CATEGORY_LEN: usize = 50;
pub const HCPCS_CATEGORY_LEN: usize = 100;

pub const DEFAULT_PROGRESS_EVERY: usize = 1000;
