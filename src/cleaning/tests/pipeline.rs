use crate::cleaning::*;
use crate::error::{CleanError, Result};
use polars::prelude::*;

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_negative_sales_row_is_removed() -> Result<()> {
    let df = df!(
        " Fecha " => &["2024-01-01"],
        "Passengers" => &["5"],
        "Sales" => &["-10"]
    )?;

    let run = CleaningPipeline::default().clean(df, "Scenario")?;
    assert_eq!(column_names(&run.data), vec!["fecha", "passengers", "sales"]);
    assert_eq!(run.data.height(), 0);

    let invalid: Vec<_> = run
        .report
        .entries_for(PipelineStage::ValidFiltered)
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(
        invalid,
        vec![
            "Step 4: total invalid rows removed: 1".to_owned(),
            "- removed 1 rows with negative sales".to_owned(),
        ]
    );
    Ok(())
}

#[test]
fn test_identical_rows_keep_one() -> Result<()> {
    let df = df!(
        "fecha" => &["2024-01-01", "2024-01-01"],
        "sales" => &["3", "3"],
        "origin" => &["MEX", "MEX"]
    )?;

    let run = CleaningPipeline::default().clean(df, "Scenario")?;
    assert_eq!(run.data.height(), 1);
    let dedup: Vec<_> = run
        .report
        .entries_for(PipelineStage::Deduplicated)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(dedup, vec!["Step 3: removed 1 duplicate rows"]);
    Ok(())
}

#[test]
fn test_unparsable_date_is_quarantined_then_dropped() -> Result<()> {
    let df = df!(
        "fecha" => &["not-a-date", "2024-01-02"],
        "passengers" => &["4", "6"],
        "sales" => &["12.5", "8"]
    )?;

    let run = CleaningPipeline::default().clean(df, "Scenario")?;
    assert_eq!(run.data.height(), 1);

    // survives the duplicate and invalid-value steps
    assert!(
        run.report_text()
            .contains("Step 4: total invalid rows removed: 0")
    );

    let null_step: Vec<_> = run
        .report
        .entries_for(PipelineStage::NullDropped)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(
        null_step,
        vec![
            "Step 5: removed 1 rows with missing values",
            "Columns with missing values before cleaning:",
            "  - fecha: 1 (50.00%)",
        ]
    );
    Ok(())
}

#[test]
fn test_report_has_one_headline_per_stage_in_order() -> Result<()> {
    let df = df!(
        "Fecha" => &["2024-01-01", "2024-01-01", "bad", "2024-01-04"],
        "Passengers" => &["1", "1", "2", "-3"],
        "Sales" => &["5", "5", "6", "7"]
    )?;

    let run = CleaningPipeline::default().clean(df, "File A")?;
    assert_eq!(run.report.headline_stages(), PipelineStage::ALL.to_vec());
    assert_eq!(run.initial_shape, Shape { rows: 4, columns: 3 });
    assert_eq!(run.final_shape, Shape { rows: 1, columns: 3 });
    assert_eq!(run.rows_removed(), 3);

    let done: Vec<_> = run
        .report
        .entries_for(PipelineStage::Done)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(
        done,
        vec![
            "Final shape: 1 rows x 3 columns",
            "Rows removed: 3 (75.00%)",
            "Rows kept: 1 (25.00%)",
        ]
    );
    Ok(())
}

#[test]
fn test_each_clean_starts_a_fresh_report() -> Result<()> {
    let pipeline = CleaningPipeline::default();
    let first = pipeline.clean(df!("fecha" => &["2024-01-01"])?, "A")?;
    let second = pipeline.clean(df!("fecha" => &["2024-01-02"])?, "B")?;
    assert_eq!(first.report.entries().len(), second.report.entries().len());
    assert_eq!(
        first.report.entries()[0].message,
        "Initial shape: 1 rows x 1 columns"
    );
    Ok(())
}

#[test]
fn test_missing_required_column_is_structural_error() -> Result<()> {
    let df = df!("Passengers" => &["1"], "Sales" => &["2"])?;
    let err = CleaningPipeline::default().clean(df, "File B").unwrap_err();
    match err {
        CleanError::MissingColumn { column, dataset } => {
            assert_eq!(column, "fecha");
            assert_eq!(dataset, "File B");
        }
        other => panic!("expected MissingColumn, got {other}"),
    }
    Ok(())
}

#[test]
fn test_optional_columns_may_be_absent() -> Result<()> {
    let df = df!("fecha" => &["2024-01-01"], "origin" => &["MEX"])?;
    let run = CleaningPipeline::default().clean(df, "A")?;
    assert_eq!(run.data.height(), 1);
    assert_eq!(
        run.validation.to_lines(),
        vec![
            "- Total missing values: 0".to_owned(),
            "- Date range: 2024-01-01 to 2024-01-01".to_owned(),
        ]
    );
    Ok(())
}

#[test]
fn test_custom_schema_makes_sales_required() -> Result<()> {
    let mut schema = ColumnSchema::default();
    if let Some(rule) = schema.columns.iter_mut().find(|r| r.name == "sales") {
        rule.presence = Presence::Required;
    }
    let df = df!("fecha" => &["2024-01-01"])?;
    assert!(matches!(
        CleaningPipeline::new(schema).clean(df, "A"),
        Err(CleanError::MissingColumn { .. })
    ));
    Ok(())
}

#[test]
fn test_csv_null_tokens_are_dropped_with_missing_rows() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("extract.csv");
    std::fs::write(
        &path,
        "fecha,sales,origin\n2024-01-01,5,NA\n2024-01-02,6,MEX\n2024-01-03,7,\n",
    )?;

    let run = CleaningPipeline::default().clean(load_dataset(&path, None)?, "File A")?;
    assert_eq!(run.data.height(), 1);

    let null_step: Vec<_> = run
        .report
        .entries_for(PipelineStage::NullDropped)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(
        null_step,
        vec![
            "Step 5: removed 2 rows with missing values",
            "Columns with missing values before cleaning:",
            "  - origin: 2 (66.67%)",
        ]
    );
    Ok(())
}
