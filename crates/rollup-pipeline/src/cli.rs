use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use rollup_io::{write_csv, OutputFormat};

use crate::config::PipelineConfig;
use crate::presets::Preset;
use crate::runner::{extract_and_transform, run};

#[derive(Debug, Parser)]
#[command(about = "Run a dataset pipeline: extract raw files, transform them into a subtotalled report, save a versioned copy.")]
#[command(group(ArgGroup::new("source").required(true).args(["pipeline", "config"])))]
pub struct Args {
    /// Built-in pipeline to run.
    #[arg(long, value_enum)]
    pipeline: Option<Preset>,

    /// Pipeline definition in JSON.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory the pipeline's input paths are relative to.
    #[arg(long, value_name = "DIR", default_value = "data/raw")]
    raw_dir: PathBuf,

    /// Output root; receives `latest.<ext>` and `versions/`.
    #[arg(long, value_name = "DIR", default_value = "data/output")]
    output_dir: PathBuf,

    /// Output format: `xlsx` or `csv`.
    #[arg(long, value_name = "FORMAT", default_value = "xlsx")]
    format: OutputFormat,

    /// Print the result as CSV to stdout instead of saving it.
    #[arg(long)]
    dry_run: bool,

    /// Print the resolved pipeline as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();
    run_with_args(args)
}

pub fn run_with_args(args: Args) -> Result<()> {
    let config = match (&args.pipeline, &args.config) {
        (Some(preset), _) => preset.config(),
        (None, Some(path)) => PipelineConfig::from_json_path(path)?,
        (None, None) => anyhow::bail!("either --pipeline or --config is required"),
    };

    if args.print_config {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(config.to_json_pretty()?.as_bytes())?;
        handle.write_all(b"\n")?;
        return Ok(());
    }

    if args.dry_run {
        let table = extract_and_transform(&config, &args.raw_dir)?;
        let stdout = std::io::stdout();
        write_csv(&table, stdout.lock()).context("write result to stdout")?;
        return Ok(());
    }

    let output = run(&config, &args.raw_dir, &args.output_dir, args.format)?;
    println!("{}", output.version_path.display());
    println!("{}", output.latest_path.display());
    Ok(())
}
