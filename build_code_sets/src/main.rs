use anyhow::{Context, Result};
use clap::Parser;

use build_code_sets::args::{Args, PipelineConfig};
use build_code_sets::code_system::PipelineKind;
use build_code_sets::common::project_root;
use build_code_sets::pipeline;
use build_code_sets::summary::print_summary;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = PipelineConfig::from_args(&args, &project_root()).context("Invalid configuration")?;

    println!(
        "Building {} into {}",
        config
            .systems
            .iter()
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", "),
        config.output_path.display()
    );
    for kind in PipelineKind::ALL {
        if !config.is_selected(kind) {
            continue;
        }
        match config.sources.for_pipeline(kind) {
            Some(path) if path.exists() => println!("Using {} source {}", kind, path.display()),
            Some(path) => println!(
                "{} source missing at {}; it will contribute zero records",
                kind,
                path.display()
            ),
            None => println!("Using embedded {} catalog", kind),
        }
    }

    let dry_run = config.dry_run;
    let summary_path = config.summary_path.clone();
    let summary = pipeline::run(config).await?;
    print_summary(&summary);
    if !dry_run {
        println!("Wrote run summary {}", summary_path.display());
    }
    Ok(())
}
