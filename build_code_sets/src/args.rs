use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::code_system::PipelineKind;
use crate::common::{default_summary_path, resolve_path};
use crate::constants::{
    DEFAULT_ADJUSTMENT_MAX_TEXT_LEN, DEFAULT_CARC_RARC_PATH, DEFAULT_CPT_PATH,
    DEFAULT_EFFECTIVE_DATE, DEFAULT_HCPCS_PATH, DEFAULT_ICD10_EFFECTIVE_DATE, DEFAULT_ICD10_PATH,
    DEFAULT_MAX_TEXT_LEN, DEFAULT_OUTPUT_PATH, DEFAULT_PROGRESS_EVERY,
};

#[derive(Debug, Parser)]
#[command(name = "build_code_sets")]
#[command(
    about = "Normalize ICD-10, CPT, HCPCS, CARC/RARC and modifier code sets into idempotent SQL upserts"
)]
pub struct Args {
    /// ICD-10-CM order file (.txt). Defaults to data/raw/icd10/icd10cm_order_2026.txt.
    #[arg(long)]
    pub icd10_path: Option<PathBuf>,

    /// CPT code list spreadsheet (.xlsx, .xls, .ods or .csv).
    #[arg(long)]
    pub cpt_path: Option<PathBuf>,

    /// HCPCS transaction report spreadsheet.
    ///
    /// The `Changes by HCPC` sheet is read when present, otherwise the first sheet.
    #[arg(long)]
    pub hcpcs_path: Option<PathBuf>,

    /// CARC/RARC code spreadsheet.
    #[arg(long)]
    pub carc_rarc_path: Option<PathBuf>,

    /// Generated SQL artifact path.
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// JSON run summary path. Defaults to the artifact path with `.summary.json`.
    #[arg(long)]
    pub summary_path: Option<PathBuf>,

    /// Comma-separated pipelines to run (icd10,cpt,hcpcs,adjustment,modifier). Default: all.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub systems: Vec<PipelineKind>,

    /// Effective date stamped on ICD-10 rows.
    #[arg(long, default_value = DEFAULT_ICD10_EFFECTIVE_DATE)]
    pub icd10_effective_date: NaiveDate,

    /// Effective date stamped on CPT, HCPCS, CARC/RARC and modifier rows.
    #[arg(long, default_value = DEFAULT_EFFECTIVE_DATE)]
    pub effective_date: NaiveDate,

    /// Max characters kept for long descriptions.
    #[arg(long, default_value_t = DEFAULT_MAX_TEXT_LEN)]
    pub max_text_len: usize,

    /// Max characters kept for CARC/RARC descriptions.
    #[arg(long, default_value_t = DEFAULT_ADJUSTMENT_MAX_TEXT_LEN)]
    pub adjustment_max_text_len: usize,

    /// Split each table's rows across several upsert statements of at most this many rows.
    ///
    /// Useful when the SQL client caps request size. Omit for one statement per table.
    #[arg(long)]
    pub max_rows_per_statement: Option<usize>,

    /// Run the pipelines concurrently instead of one after another.
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Log a progress line every N source rows.
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: usize,

    /// Run every pipeline and print the summary, but write no files.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub icd10: PathBuf,
    pub cpt: PathBuf,
    pub hcpcs: PathBuf,
    pub carc_rarc: PathBuf,
}

impl SourcePaths {
    pub fn under(root: &Path) -> Self {
        Self {
            icd10: root.join(DEFAULT_ICD10_PATH),
            cpt: root.join(DEFAULT_CPT_PATH),
            hcpcs: root.join(DEFAULT_HCPCS_PATH),
            carc_rarc: root.join(DEFAULT_CARC_RARC_PATH),
        }
    }

    /// Source file for a file-backed pipeline; `None` for the embedded catalog.
    pub fn for_pipeline(&self, pipeline: PipelineKind) -> Option<&Path> {
        match pipeline {
            PipelineKind::Icd10 => Some(&self.icd10),
            PipelineKind::Cpt => Some(&self.cpt),
            PipelineKind::Hcpcs => Some(&self.hcpcs),
            PipelineKind::Adjustment => Some(&self.carc_rarc),
            PipelineKind::Modifier => None,
        }
    }
}

/// Validated run configuration shared by reference with every pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sources: SourcePaths,
    pub output_path: PathBuf,
    pub summary_path: PathBuf,
    /// Selected pipelines, deduplicated, in run order.
    pub systems: Vec<PipelineKind>,
    pub icd10_effective_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub max_text_len: usize,
    pub adjustment_max_text_len: usize,
    pub max_rows_per_statement: Option<usize>,
    pub parallel: bool,
    pub progress_every: usize,
    pub dry_run: bool,
}

impl PipelineConfig {
    /// Defaults for a workspace rooted at `root`, every pipeline selected.
    pub fn with_root(root: &Path) -> Result<Self> {
        let output_path = root.join(DEFAULT_OUTPUT_PATH);
        Ok(Self {
            sources: SourcePaths::under(root),
            summary_path: default_summary_path(&output_path),
            output_path,
            systems: PipelineKind::ALL.to_vec(),
            icd10_effective_date: parse_date(DEFAULT_ICD10_EFFECTIVE_DATE)?,
            effective_date: parse_date(DEFAULT_EFFECTIVE_DATE)?,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            adjustment_max_text_len: DEFAULT_ADJUSTMENT_MAX_TEXT_LEN,
            max_rows_per_statement: None,
            parallel: false,
            progress_every: DEFAULT_PROGRESS_EVERY,
            dry_run: false,
        })
    }

    pub fn from_args(args: &Args, root: &Path) -> Result<Self> {
        let defaults = SourcePaths::under(root);
        let sources = SourcePaths {
            icd10: pick_path(&args.icd10_path, root, defaults.icd10),
            cpt: pick_path(&args.cpt_path, root, defaults.cpt),
            hcpcs: pick_path(&args.hcpcs_path, root, defaults.hcpcs),
            carc_rarc: pick_path(&args.carc_rarc_path, root, defaults.carc_rarc),
        };
        let output_path = pick_path(&args.output_path, root, root.join(DEFAULT_OUTPUT_PATH));
        let summary_path = args
            .summary_path
            .as_deref()
            .map(|p| resolve_path(root, p))
            .unwrap_or_else(|| default_summary_path(&output_path));

        let config = Self {
            sources,
            output_path,
            summary_path,
            systems: normalize_systems(&args.systems),
            icd10_effective_date: args.icd10_effective_date,
            effective_date: args.effective_date,
            max_text_len: args.max_text_len,
            adjustment_max_text_len: args.adjustment_max_text_len,
            max_rows_per_statement: args.max_rows_per_statement,
            parallel: args.parallel,
            progress_every: args.progress_every,
            dry_run: args.dry_run,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.systems.is_empty() {
            bail!("No pipelines selected");
        }
        if self.max_text_len == 0 || self.adjustment_max_text_len == 0 {
            bail!("--max-text-len and --adjustment-max-text-len must be positive");
        }
        if self.max_rows_per_statement == Some(0) {
            bail!("--max-rows-per-statement must be positive when set");
        }
        if self.progress_every == 0 {
            bail!("--progress-every must be positive");
        }
        if self.output_path == self.summary_path {
            bail!(
                "Summary path {} would overwrite the SQL artifact",
                self.summary_path.display()
            );
        }
        Ok(())
    }

    pub fn is_selected(&self, pipeline: PipelineKind) -> bool {
        self.systems.contains(&pipeline)
    }

    pub fn effective_date_for(&self, pipeline: PipelineKind) -> NaiveDate {
        match pipeline {
            PipelineKind::Icd10 => self.icd10_effective_date,
            _ => self.effective_date,
        }
    }
}

fn pick_path(arg: &Option<PathBuf>, root: &Path, default: PathBuf) -> PathBuf {
    arg.as_deref()
        .map(|p| resolve_path(root, p))
        .unwrap_or(default)
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {value}"))
}

/// Empty selection means all pipelines; output order follows
/// [`PipelineKind::ALL`] regardless of the order given.
fn normalize_systems(selected: &[PipelineKind]) -> Vec<PipelineKind> {
    if selected.is_empty() {
        return PipelineKind::ALL.to_vec();
    }
    PipelineKind::ALL
        .into_iter()
        .filter(|kind| selected.contains(kind))
        .collect()
}
