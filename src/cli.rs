use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use inflight_clean::cleaning::CleaningPipeline;
use inflight_clean::config::AppConfig;
use inflight_clean::workflow::{clean_single_file, explore_files, run_workflow};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "inflight-clean",
    version,
    about = "Cleans and merges in-flight retail extracts"
)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true, env = "INFLIGHT_CLEAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean two extracts and write the combined dataset and report
    Run {
        /// First extract. Overrides the configured path.
        #[arg(long)]
        file_a: Option<PathBuf>,

        /// Second extract. Overrides the configured path.
        #[arg(long)]
        file_b: Option<PathBuf>,

        /// Combined dataset path (.csv or .parquet)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Clean a single file and save the result
    Clean {
        /// Input file path (CSV, Parquet, JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path. Defaults to cleaned_<name>.csv next to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report path. Defaults to <output>.report.txt.
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Profile one or two raw extracts without modifying them
    Explore {
        #[arg(long)]
        file_a: PathBuf,

        #[arg(long)]
        file_b: Option<PathBuf>,

        /// Rows to read from each file
        #[arg(long, default_value_t = 10_000)]
        rows: usize,
    },
    /// Write the default configuration as JSON
    InitConfig {
        /// Destination. Defaults to the platform config directory.
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run_command(command: Commands, config: AppConfig) -> Result<()> {
    match command {
        Commands::Run {
            file_a,
            file_b,
            output,
            report,
        } => handle_run(config, file_a, file_b, output, report),
        Commands::Clean {
            file,
            output,
            report,
        } => handle_clean(&config, &file, output, report),
        Commands::Explore {
            file_a,
            file_b,
            rows,
        } => handle_explore(&file_a, file_b.as_deref(), rows),
        Commands::InitConfig { path } => handle_init_config(path),
    }
}

fn handle_run(
    mut config: AppConfig,
    file_a: Option<PathBuf>,
    file_b: Option<PathBuf>,
    output: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<()> {
    if let Some(f) = file_a {
        config.inputs.file_a = f;
    }
    if let Some(f) = file_b {
        config.inputs.file_b = f;
    }
    if let Some(o) = output {
        config.outputs.cleaned = o;
    }
    if let Some(r) = report {
        config.outputs.report = r;
    }

    let summary = run_workflow(&config).context("Cleaning workflow failed")?;
    tracing::info!(
        "Clean dataset: {}, report: {}",
        summary.output_path.display(),
        summary.report_path.display()
    );
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("cleaned_{stem}.csv"))
}

fn handle_clean(
    config: &AppConfig,
    file: &Path,
    output: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<()> {
    let output = output.unwrap_or_else(|| default_output(file));
    let report = report.unwrap_or_else(|| output.with_extension("report.txt"));

    tracing::info!(
        "Cleaning {} and saving to {}",
        file.display(),
        output.display()
    );
    let pipeline = CleaningPipeline::new(config.schema.clone());
    clean_single_file(&pipeline, file, &output, &report)
        .with_context(|| format!("Failed to clean {}", file.display()))?;
    tracing::info!("Successfully cleaned.");
    Ok(())
}

#[expect(clippy::print_stdout)]
fn handle_explore(file_a: &Path, file_b: Option<&Path>, rows: usize) -> Result<()> {
    let text = explore_files(file_a, file_b, Some(rows)).context("Exploration failed")?;
    println!("{text}");
    Ok(())
}

fn handle_init_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => AppConfig::default_path()?,
    };
    AppConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    tracing::info!("Default configuration written to {}", path.display());
    Ok(())
}
