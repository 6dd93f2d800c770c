//! Pre-clean exploration of raw extracts.
//!
//! Answers "what are we about to clean?": shape, null prevalence, duplicate
//! rows, descriptive statistics for numeric-looking columns, and whether two
//! extracts share the same columns. Nothing is modified.

use super::coerce::parse_numeric;
use super::dedup::count_duplicates;
use crate::error::Result;
use polars::prelude::*;

/// Default number of rows sampled from each extract.
pub const DEFAULT_SAMPLE_ROWS: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub nulls: usize,
    pub null_pct: f64,
    pub numeric: Option<NumericSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProfile {
    pub label: String,
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
    pub duplicates: usize,
}

impl DatasetProfile {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnComparison {
    pub only_in_first: Vec<String>,
    pub only_in_second: Vec<String>,
}

impl ColumnComparison {
    pub fn same_columns(&self) -> bool {
        self.only_in_first.is_empty() && self.only_in_second.is_empty()
    }
}

/// Text columns count as numeric only when every non-null cell parses.
fn numeric_values(series: &Series) -> Result<Option<Float64Chunked>> {
    if series.dtype() == &DataType::String {
        let text = series.str()?;
        let parsed: Vec<Option<f64>> = text.into_iter().map(|c| c.and_then(parse_numeric)).collect();
        let non_null = text.len() - text.null_count();
        let parsed_count = parsed.iter().flatten().count();
        if non_null == 0 || parsed_count != non_null {
            return Ok(None);
        }
        let values = Series::new(series.name().clone(), parsed);
        return Ok(Some(values.f64()?.clone()));
    }
    if series.dtype().is_bool() || series.dtype().is_temporal() {
        return Ok(None);
    }
    match series.cast(&DataType::Float64) {
        Ok(values) => Ok(Some(values.f64()?.clone())),
        Err(_) => Ok(None),
    }
}

fn profile_column(column: &Column, rows: usize) -> Result<ColumnProfile> {
    let series = column.as_materialized_series();
    let nulls = series.null_count();
    let numeric = numeric_values(series)?.map(|ca| NumericSummary {
        count: ca.len() - ca.null_count(),
        mean: ca.mean(),
        std: ca.std(1),
        min: ca.min(),
        max: ca.max(),
    });

    Ok(ColumnProfile {
        name: series.name().to_string(),
        dtype: series.dtype().to_string(),
        nulls,
        null_pct: if rows > 0 {
            (nulls as f64 / rows as f64) * 100.0
        } else {
            0.0
        },
        numeric,
    })
}

/// Profiles a raw extract.
///
/// # Errors
///
/// Returns an error if Polars fails to read a column.
pub fn profile_dataset(df: &DataFrame, label: &str) -> Result<DatasetProfile> {
    let rows = df.height();
    let columns = df
        .get_columns()
        .iter()
        .map(|c| profile_column(c, rows))
        .collect::<Result<Vec<_>>>()?;

    Ok(DatasetProfile {
        label: label.to_owned(),
        rows,
        columns,
        duplicates: count_duplicates(df)?,
    })
}

/// Compares raw column names exactly as they appear in the extracts.
pub fn compare_columns(first: &DatasetProfile, second: &DatasetProfile) -> ColumnComparison {
    let a = first.column_names();
    let b = second.column_names();
    ColumnComparison {
        only_in_first: a
            .iter()
            .filter(|n| !b.contains(n))
            .map(|n| (*n).to_owned())
            .collect(),
        only_in_second: b
            .iter()
            .filter(|n| !a.contains(n))
            .map(|n| (*n).to_owned())
            .collect(),
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.4}"),
        _ => "-".to_owned(),
    }
}

fn stats_row(cells: [&str; 6]) -> String {
    let [column, count, mean, std, min, max] = cells;
    format!("  {column:<24} {count:>8} {mean:>14} {std:>14} {min:>14} {max:>14}")
}

pub fn render_profile(profile: &DatasetProfile) -> String {
    let rule = "=".repeat(80);
    let mut lines = vec![
        rule.clone(),
        format!("EXPLORING {}", profile.label.to_uppercase()),
        rule,
        format!(
            "Shape: {} rows x {} columns",
            profile.rows,
            profile.columns.len()
        ),
        format!("Columns: {}", profile.column_names().join(", ")),
        String::new(),
        "Missing values per column:".to_owned(),
    ];
    lines.extend(profile.columns.iter().map(|c| {
        format!(
            "  {:<24} {:>8} ({:.2}%)  [{}]",
            c.name, c.nulls, c.null_pct, c.dtype
        )
    }));

    lines.push(String::new());
    lines.push(format!("Duplicate rows: {}", profile.duplicates));
    lines.push(String::new());
    lines.push("Numeric columns:".to_owned());
    lines.push(stats_row(["column", "count", "mean", "std", "min", "max"]));
    lines.extend(profile.columns.iter().filter_map(|c| {
        c.numeric.as_ref().map(|s| {
            stats_row([
                &c.name,
                &s.count.to_string(),
                &fmt_opt(s.mean),
                &fmt_opt(s.std),
                &fmt_opt(s.min),
                &fmt_opt(s.max),
            ])
        })
    }));

    lines.join("\n") + "\n"
}

pub fn render_comparison(comparison: &ColumnComparison) -> String {
    let rule = "=".repeat(80);
    let mut lines = vec![
        rule.clone(),
        "COMPARING EXTRACTS".to_owned(),
        rule,
        format!("Same columns: {}", comparison.same_columns()),
    ];
    if !comparison.same_columns() {
        lines.push(format!(
            "Only in first: {}",
            comparison.only_in_first.join(", ")
        ));
        lines.push(format!(
            "Only in second: {}",
            comparison.only_in_second.join(", ")
        ));
    }
    lines.join("\n") + "\n"
}
