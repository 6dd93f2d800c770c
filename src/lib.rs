//! # inflight-clean
//!
//! Cleans raw in-flight retail extracts (flight date, passengers, sales and
//! related attributes) and merges two of them into one analysis-ready
//! dataset with a human-readable cleaning report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use inflight_clean::cleaning::{CleaningPipeline, combine, load_dataset};
//!
//! # fn example() -> inflight_clean::error::Result<()> {
//! let pipeline = CleaningPipeline::default();
//! let a = pipeline.clean(load_dataset("extract_a.csv".as_ref(), None)?, "File A")?;
//! let b = pipeline.clean(load_dataset("extract_b.csv".as_ref(), None)?, "File B")?;
//!
//! let combined = combine(&a, &b)?;
//! println!("{} clean rows", combined.data.height());
//! println!("{}", a.report_text());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`cleaning`]: the cleaning steps, orchestrator, combiner and report
//! - [`workflow`]: end-to-end drivers used by the binary
//! - [`config`]: JSON configuration with defaults
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: error type and context helpers

pub mod cleaning;
pub mod config;
pub mod error;
pub mod logging;
pub mod workflow;
