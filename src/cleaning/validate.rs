//! Post-clean sanity statistics. Read-only: nothing here mutates or filters.

use super::nulls::total_nulls;
use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// Diagnostics for a cleaned frame. Ranges are `None` when the column is
/// absent or has no values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSummary {
    pub total_nulls: usize,
    pub passengers: Option<NumericRange>,
    pub sales: Option<NumericRange>,
    pub fecha: Option<DateRange>,
}

fn numeric_range(df: &DataFrame, name: &str) -> Result<Option<NumericRange>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let values = column.as_materialized_series().cast(&DataType::Float64)?;
    let ca = values.f64()?;
    Ok(match (ca.min(), ca.max()) {
        (Some(min), Some(max)) => Some(NumericRange { min, max }),
        _ => None,
    })
}

fn date_range(df: &DataFrame, name: &str) -> Result<Option<DateRange>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::Date {
        return Ok(None);
    }
    let dates: Vec<NaiveDate> = series.date()?.as_date_iter().flatten().collect();
    Ok(match (dates.iter().min(), dates.iter().max()) {
        (Some(min), Some(max)) => Some(DateRange {
            min: *min,
            max: *max,
        }),
        _ => None,
    })
}

impl ValidationSummary {
    /// Step 6 diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if a present column cannot be read as its type.
    pub fn compute(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            total_nulls: total_nulls(df),
            passengers: numeric_range(df, "passengers")?,
            sales: numeric_range(df, "sales")?,
            fecha: date_range(df, "fecha")?,
        })
    }

    pub fn headline() -> &'static str {
        "Step 6: validated cleaned data"
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("- Total missing values: {}", self.total_nulls)];
        if let Some(r) = self.passengers {
            lines.push(format!("- Passengers: min={}, max={}", r.min, r.max));
        }
        if let Some(r) = self.sales {
            lines.push(format!("- Sales: min={}, max={}", r.min, r.max));
        }
        if let Some(r) = self.fecha {
            lines.push(format!("- Date range: {} to {}", r.min, r.max));
        }
        lines
    }
}
