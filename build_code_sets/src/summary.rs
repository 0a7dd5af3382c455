use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::BTreeMap, path::PathBuf};

use crate::code_system::PipelineKind;
use crate::error::{RowRejection, SourceError};
use crate::sql::TableSpec;

/// How a pipeline's source fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded,
    /// Served from the catalog compiled into the binary.
    Embedded,
    Missing,
    Failed { reason: String },
}

impl SourceStatus {
    pub fn from_error(err: &SourceError) -> Self {
        if err.is_missing() {
            SourceStatus::Missing
        } else {
            SourceStatus::Failed {
                reason: err.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub pipeline: PipelineKind,
    pub table: &'static str,
    pub source: Option<PathBuf>,
    pub status: SourceStatus,
    pub rows_read: usize,
    pub records: usize,
    pub duplicates: usize,
    pub conflicting_duplicates: usize,
    pub rejected: BTreeMap<&'static str, usize>,
}

impl PipelineReport {
    pub fn new(pipeline: PipelineKind, source: Option<PathBuf>) -> Self {
        let status = if source.is_some() {
            SourceStatus::Loaded
        } else {
            SourceStatus::Embedded
        };
        Self {
            pipeline,
            table: TableSpec::for_pipeline(pipeline).name,
            source,
            status,
            rows_read: 0,
            records: 0,
            duplicates: 0,
            conflicting_duplicates: 0,
            rejected: BTreeMap::new(),
        }
    }

    pub fn reject(&mut self, reason: RowRejection, count: usize) {
        if count > 0 {
            *self.rejected.entry(reason.as_str()).or_default() += count;
        }
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn is_degraded(&self) -> bool {
        matches!(
            self.status,
            SourceStatus::Missing | SourceStatus::Failed { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Written,
    NothingProcessed,
    DryRun,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    /// Set only when an artifact was written.
    pub output_path: Option<PathBuf>,
    pub statements: usize,
    pub total_records: usize,
    pub pipelines: Vec<PipelineReport>,
}

impl RunSummary {
    pub fn report(&self, pipeline: PipelineKind) -> Option<&PipelineReport> {
        self.pipelines.iter().find(|r| r.pipeline == pipeline)
    }

    pub fn records_for(&self, pipeline: PipelineKind) -> usize {
        self.report(pipeline).map(|r| r.records).unwrap_or(0)
    }
}

/// Records counted toward the "nothing processed" decision: file-backed
/// pipelines only, unless none of them was selected.
pub fn counted_records(reports: &[PipelineReport]) -> usize {
    let file_backed: Vec<&PipelineReport> = reports
        .iter()
        .filter(|r| r.pipeline.is_file_backed())
        .collect();
    if file_backed.is_empty() {
        reports.iter().map(|r| r.records).sum()
    } else {
        file_backed.iter().map(|r| r.records).sum()
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("Code set build summary");
    for report in &summary.pipelines {
        let status = match &report.status {
            SourceStatus::Loaded => "loaded".to_string(),
            SourceStatus::Embedded => "embedded".to_string(),
            SourceStatus::Missing => "missing".to_string(),
            SourceStatus::Failed { reason } => format!("failed: {reason}"),
        };
        println!(
            "  {:<10} {:>8} records  rows_read={} duplicates={} conflicting={} rejected={} ({status})",
            report.pipeline.label(),
            report.records,
            report.rows_read,
            report.duplicates,
            report.conflicting_duplicates,
            report.rejected_total(),
        );
    }
    let degraded = summary.pipelines.iter().filter(|r| r.is_degraded()).count();
    if degraded > 0 {
        println!("{degraded} source(s) missing or unreadable; they contributed zero records.");
    }
    match summary.outcome {
        RunOutcome::Written => println!(
            "Wrote {} records in {} statements to {}",
            summary.total_records,
            summary.statements,
            summary
                .output_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        ),
        RunOutcome::DryRun => println!(
            "Dry run: {} records across {} statements; no files written.",
            summary.total_records, summary.statements
        ),
        RunOutcome::NothingProcessed => {
            println!("Nothing processed: every selected source produced zero records. No SQL written.")
        }
    }
}
