//! One independent pipeline per destination table. Each pipeline owns its
//! deduplicator and carried-forward state; nothing mutable is shared.

pub mod adjustment;
pub mod cpt;
pub mod hcpcs;
pub mod icd10;
pub mod modifier;
pub mod orchestrator;

use std::fmt::Display;

use crate::args::PipelineConfig;
use crate::classify::ClassificationTables;
use crate::code_system::PipelineKind;
use crate::error::{RowRejection, SourceError};
use crate::normalize::{Admission, Deduplicator};
use crate::progress::RowProgress;
use crate::record::{NormalizedCodeRecord, OutputBatch};
use crate::summary::{PipelineReport, SourceStatus};

pub use orchestrator::{collect_batches, collect_batches_parallel, finalize, run, run_sequential};

/// What one pipeline hands back to the orchestrator.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub batch: OutputBatch,
    pub report: PipelineReport,
}

/// Accumulates one pipeline's records, applying first-occurrence-wins
/// deduplication and keeping the row accounting.
pub struct BatchBuilder {
    batch: OutputBatch,
    dedup: Deduplicator,
    report: PipelineReport,
    progress: RowProgress,
}

impl BatchBuilder {
    pub fn new(pipeline: PipelineKind, config: &PipelineConfig, progress: RowProgress) -> Self {
        let source = config
            .sources
            .for_pipeline(pipeline)
            .map(|p| p.to_path_buf());
        Self {
            batch: OutputBatch::new(pipeline),
            dedup: Deduplicator::new(),
            report: PipelineReport::new(pipeline, source),
            progress,
        }
    }

    pub fn pipeline(&self) -> PipelineKind {
        self.batch.pipeline
    }

    /// Marks one source row as read.
    pub fn row(&mut self) {
        self.report.rows_read += 1;
        self.progress.row();
    }

    pub fn reject(&mut self, reason: RowRejection, detail: impl Display) {
        tracing::debug!(
            "{}: dropped row ({}): {detail}",
            self.pipeline(),
            reason.as_str()
        );
        self.report.reject(reason, 1);
    }

    /// Rows that never reached the pipeline as rows, such as order-file lines
    /// with too few fields; counted as read and rejected.
    pub fn reject_unread(&mut self, reason: RowRejection, count: usize) {
        self.report.rows_read += count;
        self.report.reject(reason, count);
    }

    pub fn push(&mut self, record: NormalizedCodeRecord) -> Admission {
        let admission = self
            .dedup
            .admit(record.dedupe_key(), &record.content_fingerprint());
        match admission {
            Admission::New => self.batch.records.push(record),
            Admission::Duplicate => {}
            Admission::ConflictingDuplicate => tracing::debug!(
                "{}: conflicting duplicate for {} dropped; keeping first occurrence",
                self.pipeline(),
                record.code
            ),
        }
        admission
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.progress.set_message(message);
    }

    /// Closes the pipeline. A source error discards every collected record
    /// and marks the source as missing or failed.
    pub fn finish(mut self, result: Result<(), SourceError>) -> PipelineOutput {
        if let Err(err) = result {
            tracing::warn!(
                "{}: {err}; emitting zero {} records",
                self.pipeline(),
                self.batch.table.name
            );
            self.report.status = SourceStatus::from_error(&err);
            self.batch.records.clear();
        }
        self.report.records = self.batch.len();
        self.report.duplicates = self.dedup.duplicates();
        self.report.conflicting_duplicates = self.dedup.conflicting();
        self.progress
            .finish(format!("{} records", self.report.records));
        PipelineOutput {
            batch: self.batch,
            report: self.report,
        }
    }
}

/// Runs one pipeline to completion. Source failures degrade to an empty batch
/// and never escape.
pub fn run_pipeline(
    pipeline: PipelineKind,
    config: &PipelineConfig,
    tables: &ClassificationTables,
    progress: RowProgress,
) -> PipelineOutput {
    let mut builder = BatchBuilder::new(pipeline, config, progress);
    let result = match pipeline {
        PipelineKind::Icd10 => icd10::load(config, tables, &mut builder),
        PipelineKind::Cpt => cpt::load(config, tables, &mut builder),
        PipelineKind::Hcpcs => hcpcs::load(config, tables, &mut builder),
        PipelineKind::Adjustment => adjustment::load(config, tables, &mut builder),
        PipelineKind::Modifier => modifier::load(config, &mut builder),
    };
    builder.finish(result)
}
