//! Merges two independently cleaned datasets and renders the final report.

use super::dedup::{count_duplicates, remove_duplicates};
use super::nulls::total_nulls;
use super::pipeline::{CleanRun, Shape};
use crate::error::{CleanError, Result};
use polars::prelude::*;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CombinedDataset {
    pub data: DataFrame,
    /// Shape right after concatenation, before the cross-file pass
    pub concatenated_shape: Shape,
    /// Rows removed by the cross-file duplicate pass
    pub inter_file_duplicates: usize,
    /// Quality assertion on the final frame: both expected to be zero
    pub null_count: usize,
    pub duplicate_count: usize,
}

impl CombinedDataset {
    pub fn shape(&self) -> Shape {
        Shape::of(&self.data)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.null_count == 0 && self.duplicate_count == 0
    }
}

/// Concatenates `a` then `b` positionally and removes duplicates that span
/// the two inputs.
///
/// `b` may list its columns in a different order; it is reordered to match
/// `a`.
///
/// # Errors
///
/// Returns [`CleanError::SchemaMismatch`] when the two column sets differ or
/// their types cannot be stacked.
pub fn combine(a: &CleanRun, b: &CleanRun) -> Result<CombinedDataset> {
    let a_names: Vec<PlSmallStr> = a.data.get_column_names().into_iter().cloned().collect();
    let b_names: Vec<PlSmallStr> = b.data.get_column_names().into_iter().cloned().collect();

    let only_a: Vec<&str> = a_names
        .iter()
        .filter(|n| !b_names.contains(n))
        .map(PlSmallStr::as_str)
        .collect();
    let only_b: Vec<&str> = b_names
        .iter()
        .filter(|n| !a_names.contains(n))
        .map(PlSmallStr::as_str)
        .collect();
    if !only_a.is_empty() || !only_b.is_empty() {
        return Err(CleanError::SchemaMismatch(format!(
            "{} has [{}] that {} lacks; {} has [{}] that {} lacks",
            a.name,
            only_a.join(", "),
            b.name,
            b.name,
            only_b.join(", "),
            a.name
        )));
    }

    let aligned = b.data.select(a_names)?;
    let stacked = a.data.vstack(&aligned).map_err(|e| {
        CleanError::SchemaMismatch(format!("cannot stack {} onto {}: {e}", b.name, a.name))
    })?;
    let concatenated_shape = Shape::of(&stacked);
    tracing::info!("Combined dataset shape: {concatenated_shape}");

    let (data, inter_file_duplicates) = remove_duplicates(&stacked)?;
    if inter_file_duplicates > 0 {
        tracing::info!(
            "Removed {inter_file_duplicates} duplicates across files, final shape: {}",
            Shape::of(&data)
        );
    }

    let null_count = total_nulls(&data);
    let duplicate_count = count_duplicates(&data)?;

    Ok(CombinedDataset {
        data,
        concatenated_shape,
        inter_file_duplicates,
        null_count,
        duplicate_count,
    })
}

/// Composite report: both per-input reports followed by the combined summary.
pub fn render_final_report(
    a: &CleanRun,
    b: &CleanRun,
    combined: &CombinedDataset,
    output_path: &Path,
    executed_at: &str,
) -> String {
    let shape = combined.shape();
    let integrity = if combined.is_clean() {
        "VERIFIED"
    } else {
        "FAILED"
    };
    let rule = "=".repeat(80);

    format!(
        "DATA CLEANING REPORT
{rule}
Executed at: {executed_at}

{name_a}:
{report_a}

{name_b}:
{report_b}

FINAL COMBINED DATASET:
- Total rows: {rows}
- Total columns: {columns}
- Duplicates removed across files: {inter}
- Saved to: {output}

FINAL COLUMNS:
{column_list}

QUALITY SUMMARY:
- Missing values: {nulls}
- Duplicate rows: {dups}
- Data integrity: {integrity}
",
        name_a = a.name.to_uppercase(),
        report_a = a.report_text(),
        name_b = b.name.to_uppercase(),
        report_b = b.report_text(),
        rows = shape.rows,
        columns = shape.columns,
        inter = combined.inter_file_duplicates,
        output = output_path.display(),
        column_list = combined.column_names().join(", "),
        nulls = combined.null_count,
        dups = combined.duplicate_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::pipeline::CleaningPipeline;

    fn cleaned(df: DataFrame, name: &str) -> Result<CleanRun> {
        CleaningPipeline::default().clean(df, name)
    }

    #[test]
    fn test_reorders_columns_of_second_input() -> Result<()> {
        let a = cleaned(
            df!("fecha" => &["2024-01-01"], "sales" => &["10"], "origin" => &["MEX"])?,
            "A",
        )?;
        let b = cleaned(
            df!("Origin" => &["CUN"], "FECHA" => &["2024-01-02"], "Sales" => &["4"])?,
            "B",
        )?;

        let combined = combine(&a, &b)?;
        assert_eq!(combined.column_names(), vec!["fecha", "sales", "origin"]);
        assert_eq!(combined.shape().rows, 2);
        assert_eq!(combined.inter_file_duplicates, 0);
        assert!(combined.is_clean());
        Ok(())
    }

    #[test]
    fn test_rejects_different_column_sets() -> Result<()> {
        let a = cleaned(df!("fecha" => &["2024-01-01"], "sales" => &["1"])?, "A")?;
        let b = cleaned(df!("fecha" => &["2024-01-01"], "gate" => &["G1"])?, "B")?;
        assert!(matches!(combine(&a, &b), Err(CleanError::SchemaMismatch(_))));
        Ok(())
    }

    #[test]
    fn test_final_report_sections() -> Result<()> {
        let a = cleaned(df!("fecha" => &["2024-01-01"], "sales" => &["1"])?, "File A")?;
        let b = cleaned(df!("fecha" => &["2024-01-01"], "sales" => &["1"])?, "File B")?;
        let combined = combine(&a, &b)?;

        let text = render_final_report(
            &a,
            &b,
            &combined,
            Path::new("clean/combined.csv"),
            "2024-05-01 10:00:00",
        );
        let a_pos = text.find("FILE A:").unwrap();
        let b_pos = text.find("FILE B:").unwrap();
        let summary_pos = text.find("FINAL COMBINED DATASET:").unwrap();
        assert!(a_pos < b_pos && b_pos < summary_pos);
        assert!(text.contains("- Duplicates removed across files: 1"));
        assert!(text.contains("fecha, sales"));
        assert!(text.contains("- Data integrity: VERIFIED"));
        Ok(())
    }
}
