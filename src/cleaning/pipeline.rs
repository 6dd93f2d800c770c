//! Pipeline orchestrator.
//!
//! Applies the cleaning steps in a fixed order, one transition per step:
//!
//! ```text
//! Start → Normalized → TypeCoerced → Deduplicated → ValidFiltered
//!       → NullDropped → Validated → Done
//! ```
//!
//! There is no branching and no retry. The orchestrator holds no state
//! between calls: every [`CleaningPipeline::clean`] builds a fresh
//! [`CleaningReport`] and hands it back inside the [`CleanRun`].

use super::coerce::coerce_types;
use super::dedup::deduplicate;
use super::invalid::remove_invalid_values;
use super::normalize::normalize_columns;
use super::nulls::drop_null_rows;
use super::report::{CleaningReport, StepOutput};
use super::schema::ColumnSchema;
use super::validate::ValidationSummary;
use crate::error::Result;
use polars::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Start,
    Normalized,
    TypeCoerced,
    Deduplicated,
    ValidFiltered,
    NullDropped,
    Validated,
    Done,
}

impl PipelineStage {
    pub const ALL: [Self; 8] = [
        Self::Start,
        Self::Normalized,
        Self::TypeCoerced,
        Self::Deduplicated,
        Self::ValidFiltered,
        Self::NullDropped,
        Self::Validated,
        Self::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Normalized => "Normalized",
            Self::TypeCoerced => "TypeCoerced",
            Self::Deduplicated => "Deduplicated",
            Self::ValidFiltered => "ValidFiltered",
            Self::NullDropped => "NullDropped",
            Self::Validated => "Validated",
            Self::Done => "Done",
        }
    }

    pub fn next_stage(&self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::Normalized),
            Self::Normalized => Some(Self::TypeCoerced),
            Self::TypeCoerced => Some(Self::Deduplicated),
            Self::Deduplicated => Some(Self::ValidFiltered),
            Self::ValidFiltered => Some(Self::NullDropped),
            Self::NullDropped => Some(Self::Validated),
            Self::Validated => Some(Self::Done),
            Self::Done => None,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// (rows, columns) of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl Shape {
    pub fn of(df: &DataFrame) -> Self {
        Self {
            rows: df.height(),
            columns: df.width(),
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} rows x {} columns", self.rows, self.columns)
    }
}

/// Outcome of one [`CleaningPipeline::clean`] call.
#[derive(Debug, Clone)]
pub struct CleanRun {
    pub name: String,
    pub data: DataFrame,
    pub report: CleaningReport,
    pub initial_shape: Shape,
    pub final_shape: Shape,
    pub validation: ValidationSummary,
}

impl CleanRun {
    pub fn rows_removed(&self) -> usize {
        self.initial_shape.rows - self.final_shape.rows
    }

    /// Share of input rows that survived, in percent. An empty input keeps
    /// everything it had.
    pub fn percentage_kept(&self) -> f64 {
        if self.initial_shape.rows == 0 {
            100.0
        } else {
            (self.final_shape.rows as f64 / self.initial_shape.rows as f64) * 100.0
        }
    }

    pub fn report_text(&self) -> String {
        self.report.to_text()
    }
}

/// Walks a frame through the state machine, recording each step.
struct Run {
    stage: PipelineStage,
    report: CleaningReport,
}

impl Run {
    fn advance(&mut self, output: StepOutput) -> DataFrame {
        if let Some(next) = self.stage.next_stage() {
            self.stage = next;
        }
        tracing::debug!(stage = %self.stage, rows = output.df.height(), "step complete");
        self.report.record_step(self.stage, &output);
        output.df
    }
}

#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    schema: ColumnSchema,
}

impl CleaningPipeline {
    pub fn new(schema: ColumnSchema) -> Self {
        Self { schema }
    }

    /// Runs every step over `df` and returns the cleaned frame with its report.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CleanError::MissingColumn`] when a required
    /// column is absent after normalization, or a data-processing error if
    /// Polars fails.
    pub fn clean(&self, df: DataFrame, name: &str) -> Result<CleanRun> {
        tracing::info!("{}", "=".repeat(80));
        tracing::info!("Cleaning {}", name.to_uppercase());
        tracing::info!("{}", "=".repeat(80));

        let initial_shape = Shape::of(&df);
        let mut run = Run {
            stage: PipelineStage::Start,
            report: CleaningReport::new(),
        };
        run.report
            .headline(PipelineStage::Start, format!("Initial shape: {initial_shape}"));

        let df = run.advance(normalize_columns(df)?);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        self.schema.check_required(&names, name)?;

        let df = run.advance(coerce_types(df, &self.schema)?);
        let df = run.advance(deduplicate(&df)?);
        let df = run.advance(remove_invalid_values(&df, &self.schema)?);
        let df = run.advance(drop_null_rows(&df)?);

        let validation = ValidationSummary::compute(&df)?;
        let df = run.advance(
            StepOutput::new(df, ValidationSummary::headline()).with_details(validation.to_lines()),
        );

        let final_shape = Shape::of(&df);
        let mut clean_run = CleanRun {
            name: name.to_owned(),
            data: df,
            report: run.report,
            initial_shape,
            final_shape,
            validation,
        };

        let kept = clean_run.percentage_kept();
        let removed = clean_run.rows_removed();
        clean_run
            .report
            .headline(PipelineStage::Done, format!("Final shape: {final_shape}"));
        clean_run.report.detail(
            PipelineStage::Done,
            format!("Rows removed: {removed} ({:.2}%)", 100.0 - kept),
        );
        clean_run.report.detail(
            PipelineStage::Done,
            format!("Rows kept: {} ({kept:.2}%)", final_shape.rows),
        );

        Ok(clean_run)
    }
}
