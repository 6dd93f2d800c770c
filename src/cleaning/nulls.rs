use super::report::StepOutput;
use crate::error::Result;
use polars::prelude::*;

/// Missing values in one column, measured before any row is removed.
#[derive(Debug, Clone, PartialEq)]
pub struct NullTally {
    pub column: String,
    pub nulls: usize,
    pub percentage: f64,
}

/// Columns with at least one null, in column order.
pub fn null_tallies(df: &DataFrame) -> Vec<NullTally> {
    let rows = df.height();
    df.get_columns()
        .iter()
        .filter(|c| c.null_count() > 0)
        .map(|c| NullTally {
            column: c.name().to_string(),
            nulls: c.null_count(),
            percentage: if rows > 0 {
                (c.null_count() as f64 / rows as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

pub fn total_nulls(df: &DataFrame) -> usize {
    df.get_columns().iter().map(Column::null_count).sum()
}

/// Step 5: report null prevalence, then drop every row with a null in any
/// column.
///
/// # Errors
///
/// Returns an error if Polars fails to filter the frame.
pub fn drop_null_rows(df: &DataFrame) -> Result<StepOutput> {
    let tallies = null_tallies(df);

    let complete = df.drop_nulls::<String>(None)?;
    let removed = df.height() - complete.height();

    let mut details = Vec::new();
    if !tallies.is_empty() {
        details.push("Columns with missing values before cleaning:".to_owned());
        details.extend(
            tallies
                .iter()
                .map(|t| format!("  - {}: {} ({:.2}%)", t.column, t.nulls, t.percentage)),
        );
    }

    Ok(StepOutput::new(
        complete,
        format!("Step 5: removed {removed} rows with missing values"),
    )
    .with_details(details))
}
