use crate::code_system::PipelineKind;
use crate::normalize::truncate_chars;
use crate::record::{CodeDetail, NormalizedCodeRecord};
use crate::sql::literal::SqlValue;

/// Appended to every update set.
pub const UPDATED_AT_ASSIGNMENT: &str = "updated_at = NOW()";

/// A destination table: insert column order, conflict target, and the
/// descriptive columns refreshed on conflict.
#[derive(Debug, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub conflict: &'static [&'static str],
    pub update: &'static [&'static str],
}

pub const ICD10_TABLE: TableSpec = TableSpec {
    name: "icd10_code_master",
    columns: &[
        "icd10_code",
        "short_description",
        "long_description",
        "chapter",
        "chapter_range",
        "section",
        "category",
        "code_type",
        "laterality",
        "encounter",
        "age_group",
        "gender",
        "reporting_required",
        "public_health_reporting",
        "manifestation_code",
        "is_billable",
        "is_header",
        "requires_additional_digit",
        "usage_count",
        "last_used_date",
        "is_active",
        "effective_date",
        "termination_date",
    ],
    conflict: &["icd10_code"],
    update: &[
        "short_description",
        "long_description",
        "chapter",
        "chapter_range",
        "is_billable",
        "is_header",
        "requires_additional_digit",
    ],
};

pub const CPT_TABLE: TableSpec = TableSpec {
    name: "cpt_code_master",
    columns: &[
        "cpt_code",
        "short_description",
        "long_description",
        "category",
        "section",
        "subsection",
        "rvu_work",
        "rvu_practice_expense",
        "rvu_malpractice",
        "rvu_total",
        "bilateral_surgery",
        "assistant_surgeon",
        "co_surgeon",
        "multiple_proc",
        "global_period",
        "prior_auth_commonly_required",
        "modifier_51_exempt",
        "usage_count",
        "last_used_date",
        "is_active",
        "effective_date",
        "termination_date",
    ],
    conflict: &["cpt_code"],
    update: &["short_description", "long_description", "category"],
};

pub const HCPCS_TABLE: TableSpec = TableSpec {
    name: "hcpcs_code_master",
    columns: &[
        "hcpcs_code",
        "short_description",
        "long_description",
        "category",
        "action_code",
        "coverage_status",
        "pricing_indicator",
        "multiple_pricing_indicator",
        "is_active",
        "effective_date",
        "termination_date",
    ],
    conflict: &["hcpcs_code"],
    update: &[
        "short_description",
        "long_description",
        "category",
        "action_code",
        "is_active",
    ],
};

pub const ADJUSTMENT_TABLE: TableSpec = TableSpec {
    name: "adjustment_reason_code",
    columns: &[
        "code",
        "code_type",
        "category",
        "description",
        "short_description",
        "payer_id",
        "payer_specific_code",
        "financial_class",
        "requires_patient_notification",
        "appealable",
        "is_active",
        "effective_date",
        "expiration_date",
    ],
    conflict: &["code", "code_type"],
    update: &[
        "description",
        "short_description",
        "category",
        "financial_class",
        "requires_patient_notification",
        "appealable",
    ],
};

pub const MODIFIER_TABLE: TableSpec = TableSpec {
    name: "modifier_code",
    columns: &[
        "modifier_code",
        "description",
        "short_description",
        "category",
        "type",
        "level_i_indicator",
        "level_ii_indicator",
        "is_active",
        "effective_date",
        "termination_date",
    ],
    conflict: &["modifier_code"],
    update: &[
        "description",
        "short_description",
        "category",
        "type",
        "level_i_indicator",
        "level_ii_indicator",
    ],
};

const ICD10_CHAPTER_LEN: usize = 100;
const ICD10_CHAPTER_RANGE_LEN: usize = 20;
const ICD10_CATEGORY_LEN: usize = 50;

impl TableSpec {
    pub fn for_pipeline(pipeline: PipelineKind) -> &'static TableSpec {
        match pipeline {
            PipelineKind::Icd10 => &ICD10_TABLE,
            PipelineKind::Cpt => &CPT_TABLE,
            PipelineKind::Hcpcs => &HCPCS_TABLE,
            PipelineKind::Adjustment => &ADJUSTMENT_TABLE,
            PipelineKind::Modifier => &MODIFIER_TABLE,
        }
    }

    /// `col = EXCLUDED.col` for every update column, then `updated_at`.
    pub fn update_assignments(&self) -> Vec<String> {
        self.update
            .iter()
            .map(|col| format!("{col} = EXCLUDED.{col}"))
            .chain(std::iter::once(UPDATED_AT_ASSIGNMENT.to_string()))
            .collect()
    }
}

fn text(value: &str) -> SqlValue {
    SqlValue::text(value)
}

fn yes_no(flag: bool) -> SqlValue {
    SqlValue::text(if flag { "Yes" } else { "No" })
}

/// Literal tuple for `record`, in the column order of its destination table.
pub fn row_values(record: &NormalizedCodeRecord) -> Vec<SqlValue> {
    use SqlValue::{Bool, Date, Int, Null};

    let effective = Date(record.effective_date);
    match &record.detail {
        CodeDetail::Icd10 {
            chapter,
            chapter_range,
        } => vec![
            text(&record.code),
            text(&record.short_description),
            text(&record.long_description),
            text(truncate_chars(chapter, ICD10_CHAPTER_LEN)),
            text(truncate_chars(chapter_range, ICD10_CHAPTER_RANGE_LEN)),
            Null,
            text(truncate_chars(&record.category, ICD10_CATEGORY_LEN)),
            text("diagnosis"),
            Null,
            Null,
            Null,
            Null,
            Bool(false),
            Bool(false),
            Bool(false),
            Bool(record.billable),
            Bool(record.is_header),
            Bool(record.requires_additional_digit),
            Int(0),
            Null,
            Bool(record.is_active),
            effective,
            Null,
        ],
        CodeDetail::Cpt => vec![
            text(&record.code),
            text(&record.short_description),
            text(&record.long_description),
            text(&record.category),
            Null,
            Null,
            Null,
            Null,
            Null,
            Null,
            Bool(false),
            Bool(false),
            Bool(false),
            Bool(false),
            Null,
            Bool(false),
            Bool(false),
            Int(0),
            Null,
            Bool(record.is_active),
            effective,
            Null,
        ],
        CodeDetail::Hcpcs { action_code } => vec![
            text(&record.code),
            text(&record.short_description),
            text(&record.long_description),
            text(&record.category),
            SqlValue::optional_text(action_code.as_deref()),
            Null,
            Null,
            Null,
            Bool(record.is_active),
            effective,
            Null,
        ],
        CodeDetail::Adjustment {
            code_type,
            financial_class,
            requires_patient_notification,
            appealable,
        } => vec![
            text(&record.code),
            text(code_type.as_str()),
            text(&record.category),
            text(&record.long_description),
            text(&record.short_description),
            Null,
            Null,
            text(financial_class.as_str()),
            Bool(*requires_patient_notification),
            Bool(*appealable),
            Bool(record.is_active),
            effective,
            Null,
        ],
        CodeDetail::Modifier {
            modifier_type,
            level_i,
            level_ii,
        } => vec![
            text(&record.code),
            text(&record.long_description),
            text(&record.short_description),
            text(&record.category),
            text(modifier_type),
            yes_no(*level_i),
            yes_no(*level_ii),
            Bool(record.is_active),
            effective,
            Null,
        ],
    }
}
