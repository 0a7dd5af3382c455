use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// Code systems carried in destination records.
///
/// CARC and RARC share the `adjustment_reason_code` table and one pipeline; the
/// distinction lives in each record's `code_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeSystem {
    Icd10,
    Cpt,
    Hcpcs,
    Carc,
    Rarc,
    Modifier,
}

impl CodeSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Icd10 => "ICD10",
            Self::Cpt => "CPT",
            Self::Hcpcs => "HCPCS",
            Self::Carc => "CARC",
            Self::Rarc => "RARC",
            Self::Modifier => "MODIFIER",
        }
    }
}

impl fmt::Display for CodeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independent pipeline per destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Icd10,
    Cpt,
    Hcpcs,
    Adjustment,
    Modifier,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 5] = [
        PipelineKind::Icd10,
        PipelineKind::Hcpcs,
        PipelineKind::Cpt,
        PipelineKind::Adjustment,
        PipelineKind::Modifier,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Icd10 => "ICD-10",
            Self::Cpt => "CPT",
            Self::Hcpcs => "HCPCS",
            Self::Adjustment => "CARC/RARC",
            Self::Modifier => "Modifier",
        }
    }

    /// Pipelines backed by an input file, as opposed to the embedded catalog.
    pub fn is_file_backed(self) -> bool {
        !matches!(self, Self::Modifier)
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
