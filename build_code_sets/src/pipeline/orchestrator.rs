use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use std::{io, path::Path, sync::Arc};

use crate::args::PipelineConfig;
use crate::classify::ClassificationTables;
use crate::code_system::PipelineKind;
use crate::common::write_atomic;
use crate::pipeline::{PipelineOutput, run_pipeline};
use crate::progress::{RowProgress, progress_hub};
use crate::record::OutputBatch;
use crate::sql::{UpsertWriter, write_artifact};
use crate::summary::{PipelineReport, RunOutcome, RunSummary, SourceStatus, counted_records};

/// Runs the selected pipelines one after another.
pub fn collect_batches(
    config: &PipelineConfig,
    tables: &ClassificationTables,
) -> Vec<PipelineOutput> {
    config
        .systems
        .iter()
        .map(|&pipeline| {
            let progress = RowProgress::new(pipeline, None, config.progress_every);
            run_pipeline(pipeline, config, tables, progress)
        })
        .collect()
}

/// Runs the selected pipelines concurrently on the blocking pool. Output
/// order matches `config.systems` regardless of completion order.
pub async fn collect_batches_parallel(
    config: Arc<PipelineConfig>,
    tables: Arc<ClassificationTables>,
) -> Vec<PipelineOutput> {
    let hub = progress_hub();
    let tasks = config.systems.iter().map(|&pipeline| {
        let task_config = Arc::clone(&config);
        let task_tables = Arc::clone(&tables);
        let progress = RowProgress::new(pipeline, Some(&hub), config.progress_every);
        async move {
            let joined = tokio::task::spawn_blocking(move || {
                run_pipeline(pipeline, &task_config, &task_tables, progress)
            })
            .await;
            (pipeline, joined)
        }
    });

    join_all(tasks)
        .await
        .into_iter()
        .map(|(pipeline, joined)| match joined {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!("{pipeline}: pipeline task failed: {err}");
                failed_output(pipeline, &config, format!("pipeline task failed: {err}"))
            }
        })
        .collect()
}

fn failed_output(pipeline: PipelineKind, config: &PipelineConfig, reason: String) -> PipelineOutput {
    let source = config
        .sources
        .for_pipeline(pipeline)
        .map(Path::to_path_buf);
    let mut report = PipelineReport::new(pipeline, source);
    report.status = SourceStatus::Failed { reason };
    PipelineOutput {
        batch: OutputBatch::new(pipeline),
        report,
    }
}

pub async fn run(config: PipelineConfig) -> Result<RunSummary> {
    let tables = ClassificationTables::standard();
    if config.parallel {
        let config = Arc::new(config);
        let outputs = collect_batches_parallel(Arc::clone(&config), Arc::new(tables)).await;
        finalize(&config, outputs)
    } else {
        run_sequential(&config, &tables)
    }
}

pub fn run_sequential(
    config: &PipelineConfig,
    tables: &ClassificationTables,
) -> Result<RunSummary> {
    let outputs = collect_batches(config, tables);
    finalize(config, outputs)
}

/// Decides the run outcome, writes the artifact and the JSON summary unless
/// this is a dry run, and returns the summary.
pub fn finalize(config: &PipelineConfig, outputs: Vec<PipelineOutput>) -> Result<RunSummary> {
    let (batches, reports): (Vec<OutputBatch>, Vec<PipelineReport>) = outputs
        .into_iter()
        .map(|output| (output.batch, output.report))
        .unzip();
    let generated_at = Utc::now();

    let mut summary = RunSummary {
        generated_at,
        outcome: RunOutcome::NothingProcessed,
        output_path: None,
        statements: 0,
        total_records: 0,
        pipelines: reports,
    };

    if counted_records(&summary.pipelines) == 0 {
        tracing::warn!("No records produced by any selected source; skipping SQL artifact");
    } else if config.dry_run {
        let mut writer = UpsertWriter::new(io::sink(), config.max_rows_per_statement);
        for batch in &batches {
            writer
                .write_batch(batch)
                .context("Failed rendering SQL for dry run")?;
        }
        summary.outcome = RunOutcome::DryRun;
        summary.statements = writer.statements();
        summary.total_records = writer.rows();
    } else {
        let preamble = artifact_preamble(&summary);
        let stats = write_artifact(
            &config.output_path,
            &preamble,
            &batches,
            config.max_rows_per_statement,
        )?;
        tracing::info!(
            "Wrote {} statements ({} rows) to {}",
            stats.statements,
            stats.rows,
            config.output_path.display()
        );
        summary.outcome = RunOutcome::Written;
        summary.output_path = Some(config.output_path.clone());
        summary.statements = stats.statements;
        summary.total_records = stats.rows;
    }

    if !config.dry_run {
        let json = serde_json::to_vec_pretty(&summary).context("Failed serializing run summary")?;
        write_atomic(&config.summary_path, &json)?;
    }
    Ok(summary)
}

fn artifact_preamble(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        "Medical code set upserts".to_string(),
        format!("Generated {}", summary.generated_at.to_rfc3339()),
    ];
    for report in &summary.pipelines {
        let source = report
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded catalog".to_string());
        lines.push(format!(
            "{}: {} records from {}",
            report.pipeline.label(),
            report.records,
            source
        ));
    }
    lines
}
