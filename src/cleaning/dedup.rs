use super::report::StepOutput;
use crate::error::Result;
use polars::prelude::*;

/// Removes rows identical across every column, keeping the first occurrence
/// and the original order. Returns the frame and the number of rows removed.
///
/// # Errors
///
/// Returns an error if Polars fails to compute the unique rows.
pub fn remove_duplicates(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let unique = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    let removed = df.height() - unique.height();
    Ok((unique, removed))
}

/// Number of rows that duplicate an earlier row.
///
/// # Errors
///
/// Returns an error if Polars fails to compute the unique rows.
pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
    remove_duplicates(df).map(|(_, removed)| removed)
}

/// Step 3: intra-file duplicate removal.
///
/// # Errors
///
/// Returns an error if Polars fails to compute the unique rows.
pub fn deduplicate(df: &DataFrame) -> Result<StepOutput> {
    let (unique, removed) = remove_duplicates(df)?;
    let headline = if removed > 0 {
        format!("Step 3: removed {removed} duplicate rows")
    } else {
        "Step 3: no duplicates found".to_owned()
    };
    Ok(StepOutput::new(unique, headline))
}
