//! Cleaning pipeline for raw in-flight retail extracts.
//!
//! Steps run in a fixed order over one dataset:
//!
//! 1. [`normalize`]: canonical column names
//! 2. [`coerce`]: dates and numbers parsed, failures become nulls
//! 3. [`dedup`]: exact duplicate rows removed
//! 4. [`invalid`]: negative passengers/sales removed
//! 5. [`nulls`]: null prevalence reported, incomplete rows removed
//! 6. [`validate`]: post-clean statistics
//!
//! [`pipeline`] sequences them and [`combine`] merges two cleaned datasets.

pub mod coerce;
pub mod combine;
pub mod dedup;
pub mod explore;
pub mod invalid;
pub mod io;
pub mod normalize;
pub mod nulls;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod validate;

pub use combine::{CombinedDataset, combine, render_final_report};
pub use io::{Artifact, load_dataset, save_dataset, write_artifacts};
pub use pipeline::{CleanRun, CleaningPipeline, PipelineStage, Shape};
pub use report::{CleaningReport, StepOutput};
pub use schema::{ColumnKind, ColumnRule, ColumnSchema, Presence};
pub use validate::ValidationSummary;

#[cfg(test)]
mod tests;
