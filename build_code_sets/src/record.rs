use chrono::NaiveDate;

use crate::classify::adjustment::{AdjustmentType, FinancialClass};
use crate::code_system::{CodeSystem, PipelineKind};
use crate::normalize::DedupeKey;
use crate::sql::TableSpec;

/// Per-system columns that have no home in the shared record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeDetail {
    Icd10 {
        chapter: String,
        chapter_range: String,
    },
    Cpt,
    Hcpcs {
        action_code: Option<String>,
    },
    Adjustment {
        code_type: AdjustmentType,
        financial_class: FinancialClass,
        requires_patient_notification: bool,
        appealable: bool,
    },
    Modifier {
        modifier_type: String,
        level_i: bool,
        level_ii: bool,
    },
}

/// One cleaned, classified code ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCodeRecord {
    pub code: String,
    pub short_description: String,
    pub long_description: String,
    pub category: String,
    pub billable: bool,
    pub requires_additional_digit: bool,
    pub is_header: bool,
    pub is_active: bool,
    pub effective_date: NaiveDate,
    pub detail: CodeDetail,
}

impl NormalizedCodeRecord {
    /// A record with every flag at its neutral value (active, not a header,
    /// billable, no seventh character).
    pub fn new(code: impl Into<String>, effective_date: NaiveDate, detail: CodeDetail) -> Self {
        Self {
            code: code.into(),
            short_description: String::new(),
            long_description: String::new(),
            category: String::new(),
            billable: true,
            requires_additional_digit: false,
            is_header: false,
            is_active: true,
            effective_date,
            detail,
        }
    }

    pub fn code_system(&self) -> CodeSystem {
        match &self.detail {
            CodeDetail::Icd10 { .. } => CodeSystem::Icd10,
            CodeDetail::Cpt => CodeSystem::Cpt,
            CodeDetail::Hcpcs { .. } => CodeSystem::Hcpcs,
            CodeDetail::Adjustment { code_type, .. } => code_type.code_system(),
            CodeDetail::Modifier { .. } => CodeSystem::Modifier,
        }
    }

    /// CARC or RARC for adjustment codes, absent for every other system.
    pub fn code_type(&self) -> Option<AdjustmentType> {
        match &self.detail {
            CodeDetail::Adjustment { code_type, .. } => Some(*code_type),
            _ => None,
        }
    }

    pub fn financial_class(&self) -> Option<FinancialClass> {
        match &self.detail {
            CodeDetail::Adjustment {
                financial_class, ..
            } => Some(*financial_class),
            _ => None,
        }
    }

    pub fn dedupe_key(&self) -> DedupeKey {
        DedupeKey::new(&self.code, self.code_system().as_str())
    }

    /// Text compared between duplicates to tell plain repeats from conflicts.
    pub fn content_fingerprint(&self) -> String {
        format!(
            "{}\u{1f}{}\u{1f}{}",
            self.short_description, self.long_description, self.category
        )
    }
}

/// Records for one destination table, in source order.
#[derive(Debug, Clone)]
pub struct OutputBatch {
    pub pipeline: PipelineKind,
    pub table: &'static TableSpec,
    pub records: Vec<NormalizedCodeRecord>,
}

impl OutputBatch {
    pub fn new(pipeline: PipelineKind) -> Self {
        Self {
            pipeline,
            table: TableSpec::for_pipeline(pipeline),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
