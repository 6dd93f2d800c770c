use super::report::StepOutput;
use super::schema::ColumnSchema;
use crate::error::{CleanError, Result};
use polars::prelude::*;

/// Per-column tally of strictly negative values.
struct NegativeTally {
    column: String,
    rows: usize,
}

fn label(column: &str) -> String {
    match column {
        "passengers" => "negative passengers".to_owned(),
        "sales" => "negative sales".to_owned(),
        other => format!("negative {other}"),
    }
}

fn is_negative(name: &str) -> Expr {
    col(name).lt(lit(0.0)).fill_null(lit(false))
}

/// Step 4: drop rows with a negative value in any non-negative column.
///
/// Each column is tallied on its own, so a row negative in two columns is
/// counted twice in the details. The headline reports the actual number of
/// rows removed. Nulls are not negative and survive this step.
///
/// # Errors
///
/// Returns an error if a non-negative column is not `Float64`, which means
/// coercion did not run first.
pub fn remove_invalid_values(df: &DataFrame, schema: &ColumnSchema) -> Result<StepOutput> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    let columns: Vec<&str> = schema
        .present_non_negative(&present)
        .map(|rule| rule.name.as_str())
        .collect();
    for name in &columns {
        let dtype = df.column(name)?.dtype();
        if dtype != &DataType::Float64 {
            return Err(CleanError::DataProcessing(format!(
                "column '{name}' must be numeric before filtering, found {dtype}"
            )));
        }
    }

    let Some(any_negative) = columns
        .iter()
        .map(|name| is_negative(name))
        .reduce(|acc, next| acc.or(next))
    else {
        return Ok(StepOutput::new(
            df.clone(),
            "Step 4: total invalid rows removed: 0",
        ));
    };

    let counts = df
        .clone()
        .lazy()
        .select(
            columns
                .iter()
                .map(|name| is_negative(name).cast(DataType::UInt64).sum().alias(*name))
                .collect::<Vec<_>>(),
        )
        .collect()?;
    let mut tallies = Vec::with_capacity(columns.len());
    for name in &columns {
        let rows = counts
            .column(name)?
            .as_materialized_series()
            .u64()?
            .get(0)
            .unwrap_or(0);
        tallies.push(NegativeTally {
            column: (*name).to_owned(),
            rows: rows as usize,
        });
    }

    let filtered = df.clone().lazy().filter(any_negative.not()).collect()?;
    let removed = df.height() - filtered.height();

    let details = tallies
        .iter()
        .filter(|t| t.rows > 0)
        .map(|t| format!("- removed {} rows with {}", t.rows, label(&t.column)));

    Ok(StepOutput::new(
        filtered,
        format!("Step 4: total invalid rows removed: {removed}"),
    )
    .with_details(details))
}
