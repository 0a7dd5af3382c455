use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::{io::IsTerminal, time::Duration};

use crate::code_system::PipelineKind;

fn apply_pipeline_progress_style(progress: &ProgressBar) {
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {prefix:.bold} [{elapsed_precise}] {pos} rows ({per_sec}) {msg}",
    ) {
        progress.set_style(style);
    }
}

fn apply_pipeline_done_style(progress: &ProgressBar) {
    if let Ok(style) =
        ProgressStyle::with_template("  {prefix:.bold} [{elapsed_precise}] {pos} rows {msg}")
    {
        progress.set_style(style);
    }
}

/// Shared draw target for concurrent pipelines.
pub fn progress_hub() -> MultiProgress {
    if std::io::stderr().is_terminal() {
        MultiProgress::new()
    } else {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }
}

/// Per-pipeline row counter: drives a spinner and logs a line every
/// `log_every` rows.
pub struct RowProgress {
    pipeline: PipelineKind,
    bar: ProgressBar,
    log_every: usize,
    rows: usize,
}

impl RowProgress {
    pub fn new(pipeline: PipelineKind, hub: Option<&MultiProgress>, log_every: usize) -> Self {
        let bar = if !std::io::stderr().is_terminal() {
            ProgressBar::hidden()
        } else if let Some(hub) = hub {
            hub.add(ProgressBar::new_spinner())
        } else {
            ProgressBar::new_spinner()
        };
        bar.set_prefix(pipeline.label());
        apply_pipeline_progress_style(&bar);
        if !bar.is_hidden() {
            bar.enable_steady_tick(Duration::from_millis(250));
        }
        Self {
            pipeline,
            bar,
            log_every: log_every.max(1),
            rows: 0,
        }
    }

    /// Progress that draws nothing and logs nothing periodic.
    pub fn hidden(pipeline: PipelineKind) -> Self {
        Self {
            pipeline,
            bar: ProgressBar::hidden(),
            log_every: usize::MAX,
            rows: 0,
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    pub fn row(&mut self) {
        self.rows += 1;
        self.bar.inc(1);
        if self.rows % self.log_every == 0 {
            tracing::info!("{}: processed {} rows", self.pipeline, self.rows);
        }
    }

    pub fn finish(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}: finished after {} rows, {message}", self.pipeline, self.rows);
        apply_pipeline_done_style(&self.bar);
        self.bar.finish_with_message(message);
    }
}
