//! End-to-end drivers: the two-file workflow, single-file cleaning and the
//! pre-clean exploration.

use crate::cleaning::explore::{
    DEFAULT_SAMPLE_ROWS, compare_columns, profile_dataset, render_comparison, render_profile,
};
use crate::cleaning::{
    Artifact, CleanRun, CleaningPipeline, combine, load_dataset, render_final_report,
    write_artifacts,
};
use crate::config::AppConfig;
use crate::error::{Result, ResultExt as _};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Totals for a completed two-file run.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSummary {
    /// Raw rows read from both inputs
    pub rows_processed: usize,
    pub rows_final: usize,
    pub inter_file_duplicates: usize,
    pub output_path: PathBuf,
    pub report_path: PathBuf,
}

impl WorkflowSummary {
    /// Final rows over raw rows, in percent.
    pub fn retention_rate(&self) -> f64 {
        if self.rows_processed == 0 {
            100.0
        } else {
            (self.rows_final as f64 / self.rows_processed as f64) * 100.0
        }
    }
}

fn banner(title: &str) {
    tracing::info!("{}", "=".repeat(80));
    tracing::info!("{title}");
    tracing::info!("{}", "=".repeat(80));
}

fn now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn load_and_clean(pipeline: &CleaningPipeline, path: &Path, label: &str) -> Result<CleanRun> {
    tracing::info!("Loading {label} from {}", path.display());
    let raw = load_dataset(path, None).with_context(|| format!("Failed to load {label}"))?;
    pipeline.clean(raw, label)
}

/// Cleans both configured inputs, merges them and publishes the combined
/// dataset together with the report.
///
/// Both artifacts are written only after every step succeeded.
///
/// # Errors
///
/// Returns an error if either input cannot be loaded or cleaned, the two
/// cleaned datasets do not share a column set, or an artifact cannot be
/// written.
pub fn run_workflow(config: &AppConfig) -> Result<WorkflowSummary> {
    let executed_at = now();
    banner("IN-FLIGHT RETAIL DATA CLEANING");
    tracing::info!("Execution started: {executed_at}");

    let pipeline = CleaningPipeline::new(config.schema.clone());
    let a = load_and_clean(&pipeline, &config.inputs.file_a, &config.inputs.label_a)?;
    let b = load_and_clean(&pipeline, &config.inputs.file_b, &config.inputs.label_b)?;

    banner("COMBINING DATASETS");
    let mut combined = combine(&a, &b)?;
    let report = render_final_report(&a, &b, &combined, &config.outputs.cleaned, &executed_at);

    write_artifacts(&mut [
        Artifact::Dataset {
            df: &mut combined.data,
            path: &config.outputs.cleaned,
        },
        Artifact::Text {
            contents: &report,
            path: &config.outputs.report,
        },
    ])?;

    let summary = WorkflowSummary {
        rows_processed: a.initial_shape.rows + b.initial_shape.rows,
        rows_final: combined.data.height(),
        inter_file_duplicates: combined.inter_file_duplicates,
        output_path: config.outputs.cleaned.clone(),
        report_path: config.outputs.report.clone(),
    };

    banner("PROCESS COMPLETED");
    tracing::info!("Total records processed: {}", summary.rows_processed);
    tracing::info!("Final clean records: {}", summary.rows_final);
    tracing::info!("Retention rate: {:.2}%", summary.retention_rate());
    if !combined.is_clean() {
        tracing::warn!(
            nulls = combined.null_count,
            duplicates = combined.duplicate_count,
            "combined dataset failed the integrity check"
        );
    }

    Ok(summary)
}

/// Report for a single cleaned input.
pub fn render_single_report(run: &CleanRun, output_path: &Path, executed_at: &str) -> String {
    format!(
        "DATA CLEANING REPORT\n{rule}\nExecuted at: {executed_at}\n\n{name}:\n{report}\n\n- Saved to: {output}\n",
        rule = "=".repeat(80),
        name = run.name.to_uppercase(),
        report = run.report_text(),
        output = output_path.display(),
    )
}

/// Cleans one file and writes the cleaned dataset and its report.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded or cleaned or the outputs
/// cannot be written.
pub fn clean_single_file(
    pipeline: &CleaningPipeline,
    input: &Path,
    output: &Path,
    report_path: &Path,
) -> Result<CleanRun> {
    let executed_at = now();
    let label = input
        .file_stem()
        .map_or_else(|| "input".to_owned(), |s| s.to_string_lossy().into_owned());

    let mut run = load_and_clean(pipeline, input, &label)?;
    let report = render_single_report(&run, output, &executed_at);
    write_artifacts(&mut [
        Artifact::Dataset {
            df: &mut run.data,
            path: output,
        },
        Artifact::Text {
            contents: &report,
            path: report_path,
        },
    ])?;

    tracing::info!(
        "Kept {} of {} rows ({:.2}%)",
        run.final_shape.rows,
        run.initial_shape.rows,
        run.percentage_kept()
    );
    Ok(run)
}

/// Profiles one or two raw inputs before cleaning. `rows` defaults to the
/// first 10 000 rows of each file.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or profiled.
pub fn explore_files(first: &Path, second: Option<&Path>, rows: Option<usize>) -> Result<String> {
    let limit = rows.unwrap_or(DEFAULT_SAMPLE_ROWS);
    let mut sections = Vec::new();

    let first_df = load_dataset(first, Some(limit))?;
    let first_profile = profile_dataset(&first_df, &first.display().to_string())?;
    sections.push(render_profile(&first_profile));

    if let Some(second) = second {
        let second_df = load_dataset(second, Some(limit))?;
        let second_profile = profile_dataset(&second_df, &second.display().to_string())?;
        sections.push(render_profile(&second_profile));
        sections.push(render_comparison(&compare_columns(
            &first_profile,
            &second_profile,
        )));
    }

    Ok(sections.join("\n"))
}
