//! Type coercion with quarantine semantics.
//!
//! Cells that cannot be parsed become null instead of failing the run. They
//! stay in the frame so the null dropper can report their prevalence per
//! column before purging them.

use super::report::StepOutput;
use super::schema::{ColumnKind, ColumnSchema};
use crate::error::Result;
use polars::prelude::*;

/// Parses a finite number; anything else is missing.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn has_time(format: &str) -> bool {
    ["%H", "%M", "%S", "%T", "%R"]
        .iter()
        .any(|directive| format.contains(directive))
}

fn parse_with_format(text: Expr, format: &str) -> Expr {
    let options = StrptimeOptions {
        format: Some(format.into()),
        strict: false,
        exact: true,
        cache: true,
    };
    if has_time(format) {
        text.str()
            .to_datetime(Some(TimeUnit::Milliseconds), None, options, lit("raise"))
            .cast(DataType::Date)
    } else {
        text.str().to_date(options)
    }
}

/// Date expression for `name`: native dates are kept, datetimes truncated,
/// anything else parsed as text with the first matching format.
fn date_expr(name: &str, dtype: &DataType, formats: &[String]) -> Expr {
    let column = col(name);
    let parsed = match dtype {
        DataType::Date => column,
        DataType::Datetime(_, _) => column.cast(DataType::Date),
        _ if formats.is_empty() => lit(NULL).cast(DataType::Date),
        _ => {
            let text = column.cast(DataType::String).str().strip_chars(lit(NULL));
            let attempts: Vec<Expr> = formats
                .iter()
                .map(|format| parse_with_format(text.clone(), format))
                .collect();
            coalesce(&attempts)
        }
    };
    parsed.alias(name)
}

/// Numeric expression for `name`: text is trimmed then cast non-strictly,
/// and non-finite results count as missing.
fn numeric_expr(name: &str, dtype: &DataType) -> Expr {
    let number = if dtype == &DataType::String {
        col(name).str().strip_chars(lit(NULL)).cast(DataType::Float64)
    } else {
        col(name).cast(DataType::Float64)
    };
    when(number.clone().is_finite())
        .then(number)
        .otherwise(lit(NULL))
        .alias(name)
}

/// Step 2: parse date and numeric columns declared in `schema`.
///
/// Only columns present in the frame are touched; required-column checks
/// happen once at pipeline entry. No rows are removed.
///
/// # Errors
///
/// Returns an error only if Polars fails to evaluate the casts.
pub fn coerce_types(df: DataFrame, schema: &ColumnSchema) -> Result<StepOutput> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();

    let mut targets = Vec::new();
    let mut exprs = Vec::new();
    for rule in schema.present_of_kind(ColumnKind::Date, &present) {
        let column = df.column(&rule.name)?;
        targets.push((rule.name.as_str(), column.null_count()));
        exprs.push(date_expr(&rule.name, column.dtype(), &schema.date_formats));
    }
    for rule in schema.present_of_kind(ColumnKind::Numeric, &present) {
        let column = df.column(&rule.name)?;
        targets.push((rule.name.as_str(), column.null_count()));
        exprs.push(numeric_expr(&rule.name, column.dtype()));
    }

    if exprs.is_empty() {
        return Ok(StepOutput::new(df, "Step 2: converted data types"));
    }

    let coerced = df.lazy().with_columns(exprs).collect()?;

    let mut details = Vec::new();
    for (name, nulls_before) in targets {
        let quarantined = coerced
            .column(name)?
            .null_count()
            .saturating_sub(nulls_before);
        if quarantined > 0 {
            details.push(format!(
                "- {name}: {quarantined} unparsable values marked as missing"
            ));
        }
    }

    Ok(StepOutput::new(coerced, "Step 2: converted data types").with_details(details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parsed_dates(raw: &[&str]) -> Result<Vec<Option<NaiveDate>>> {
        let df = df!("fecha" => raw)?;
        let out = coerce_types(df, &ColumnSchema::default())?;
        Ok(out
            .df
            .column("fecha")?
            .as_materialized_series()
            .date()?
            .as_date_iter()
            .collect())
    }

    #[test]
    fn test_date_formats() -> Result<()> {
        let jan_first = NaiveDate::from_ymd_opt(2024, 1, 1);
        let dates = parsed_dates(&[
            "2024-01-01",
            " 2024-01-01 ",
            "2024-01-01 13:45:00",
            "2024-01-01T08:00:00",
            "2024/01/01",
            "not-a-date",
            "",
            "2024-02-30",
        ])?;
        assert_eq!(
            dates,
            vec![
                jan_first, jan_first, jan_first, jan_first, jan_first, None, None, None
            ]
        );
        Ok(())
    }

    #[test]
    fn test_slash_dates_are_month_first() -> Result<()> {
        let dates = parsed_dates(&["01/02/2024", "25/12/2024"])?;
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 2),
                NaiveDate::from_ymd_opt(2024, 12, 25),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("5"), Some(5.0));
        assert_eq!(parse_numeric(" -10.5 "), Some(-10.5));
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn test_coerce_marks_missing_without_dropping() -> Result<()> {
        let df = df!(
            "fecha" => &["2024-01-01", "not-a-date", "2024-01-03"],
            "sales" => &["10", "x", " -3 "],
            "origin" => &["MEX", "CUN", "GDL"]
        )?;

        let out = coerce_types(df, &ColumnSchema::default())?;
        assert_eq!(out.df.height(), 3);
        assert_eq!(out.df.column("fecha")?.dtype(), &DataType::Date);
        assert_eq!(out.df.column("sales")?.dtype(), &DataType::Float64);
        assert_eq!(out.df.column("origin")?.dtype(), &DataType::String);
        assert_eq!(out.df.column("fecha")?.null_count(), 1);
        assert_eq!(out.df.column("sales")?.null_count(), 1);
        assert_eq!(
            out.df
                .column("sales")?
                .as_materialized_series()
                .f64()?
                .get(2),
            Some(-3.0)
        );
        assert_eq!(
            out.details,
            vec![
                "- fecha: 1 unparsable values marked as missing".to_owned(),
                "- sales: 1 unparsable values marked as missing".to_owned(),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_non_finite_numbers_are_missing() -> Result<()> {
        let df = df!(
            "fecha" => &["2024-01-01", "2024-01-02"],
            "sales" => &[f64::NAN, 4.0]
        )?;
        let out = coerce_types(df, &ColumnSchema::default())?;
        assert_eq!(out.df.column("sales")?.null_count(), 1);
        assert_eq!(
            out.details,
            vec!["- sales: 1 unparsable values marked as missing".to_owned()]
        );
        Ok(())
    }

    #[test]
    fn test_coerce_native_numeric_columns() -> Result<()> {
        let df = df!(
            "fecha" => &["2024-01-01", "2024-01-02"],
            "passengers" => &[12i64, 15]
        )?;
        let out = coerce_types(df, &ColumnSchema::default())?;
        let passengers = out.df.column("passengers")?.as_materialized_series();
        assert_eq!(passengers.f64()?.get(1), Some(15.0));
        assert!(out.details.is_empty());
        Ok(())
    }
}
