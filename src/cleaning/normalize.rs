use super::report::StepOutput;
use crate::error::{CleanError, Result};
use polars::prelude::*;

/// Trimmed, lower-cased, spaces replaced by underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Step 1: canonicalize every column label. Values are untouched.
///
/// # Errors
///
/// Returns [`CleanError::DataProcessing`] when two raw labels normalize to the
/// same name.
pub fn normalize_columns(mut df: DataFrame) -> Result<StepOutput> {
    let original: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let normalized: Vec<String> = original
        .iter()
        .map(|name| normalize_column_name(name))
        .collect();

    for (idx, name) in normalized.iter().enumerate() {
        if let Some(first) = normalized[..idx].iter().position(|n| n == name) {
            return Err(CleanError::DataProcessing(format!(
                "columns '{}' and '{}' both normalize to '{name}'",
                original[first], original[idx]
            )));
        }
    }

    let renamed = original
        .iter()
        .zip(&normalized)
        .filter(|(before, after)| before != after)
        .count();

    df.set_column_names(normalized)?;

    let output = StepOutput::new(df, "Step 1: normalized column names");
    Ok(if renamed > 0 {
        output.with_detail(format!("- {renamed} column names changed"))
    } else {
        output
    })
}
