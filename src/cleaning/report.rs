//! Cleaning report: an ordered, append-only log of what each step did.
//!
//! Steps never write to a shared log. Each returns a [`StepOutput`] carrying
//! the transformed frame, one headline and any detail lines; the orchestrator
//! appends them to the run's [`CleaningReport`] under the step's stage.

use super::pipeline::PipelineStage;
use polars::prelude::DataFrame;

/// Result of one pipeline step.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub df: DataFrame,
    /// The single entry every step emits
    pub headline: String,
    pub details: Vec<String>,
}

impl StepOutput {
    pub fn new(df: DataFrame, headline: impl Into<String>) -> Self {
        Self {
            df,
            headline: headline.into(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }

    pub fn with_details(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.details.extend(lines);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLevel {
    Headline,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub stage: PipelineStage,
    pub level: EntryLevel,
    pub message: String,
}

impl ReportEntry {
    pub fn render(&self) -> String {
        match self.level {
            EntryLevel::Headline => self.message.clone(),
            EntryLevel::Detail => format!("  {}", self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    entries: Vec<ReportEntry>,
}

impl CleaningReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: PipelineStage, level: EntryLevel, message: impl Into<String>) {
        let entry = ReportEntry {
            stage,
            level,
            message: message.into(),
        };
        tracing::info!("  {}", entry.render());
        self.entries.push(entry);
    }

    pub fn headline(&mut self, stage: PipelineStage, message: impl Into<String>) {
        self.push(stage, EntryLevel::Headline, message);
    }

    pub fn detail(&mut self, stage: PipelineStage, message: impl Into<String>) {
        self.push(stage, EntryLevel::Detail, message);
    }

    /// Appends a step's headline followed by its details.
    pub fn record_step(&mut self, stage: PipelineStage, output: &StepOutput) {
        self.headline(stage, output.headline.as_str());
        for line in &output.details {
            self.detail(stage, line.as_str());
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn entries_for(&self, stage: PipelineStage) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |e| e.stage == stage)
    }

    /// Stages that emitted a headline, in emission order.
    pub fn headline_stages(&self) -> Vec<PipelineStage> {
        self.entries
            .iter()
            .filter(|e| e.level == EntryLevel::Headline)
            .map(|e| e.stage)
            .collect()
    }

    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(ReportEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
