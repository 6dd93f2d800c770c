//! Post-conditions checked over a batch of generated messy extracts.

use crate::cleaning::coerce::coerce_types;
use crate::cleaning::dedup::{count_duplicates, deduplicate};
use crate::cleaning::invalid::remove_invalid_values;
use crate::cleaning::normalize::normalize_columns;
use crate::cleaning::nulls::{drop_null_rows, total_nulls};
use crate::cleaning::*;
use crate::error::Result;
use polars::prelude::*;

/// Small deterministic generator so failures are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

fn messy_extract(seed: u64, rows: usize) -> Result<DataFrame> {
    let mut rng = Lcg(seed);
    let dates = ["2024-01-01", "2024-01-02", "not-a-date", "2024/01/03", ""];
    let numbers = ["5", "-2", "0", "12.5", "abc", "", "7"];
    let origins = ["MEX", "CUN", "GDL"];

    let mut fecha = Vec::with_capacity(rows);
    let mut passengers = Vec::with_capacity(rows);
    let mut sales = Vec::with_capacity(rows);
    let mut origin = Vec::with_capacity(rows);
    for _ in 0..rows {
        let pick = |rng: &mut Lcg, options: &[&str]| -> Option<String> {
            let value = options[rng.next(options.len() as u64) as usize];
            (!value.is_empty()).then(|| value.to_owned())
        };
        fecha.push(pick(&mut rng, &dates));
        passengers.push(pick(&mut rng, &numbers));
        sales.push(pick(&mut rng, &numbers));
        origin.push(pick(&mut rng, &origins));
    }

    Ok(df!(
        " Fecha " => fecha,
        "Passengers" => passengers,
        "Sales" => sales,
        "Origin" => origin
    )?)
}

fn all_non_negative(df: &DataFrame, name: &str) -> Result<bool> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .flatten()
        .all(|v| v >= 0.0))
}

#[test]
fn test_every_step_only_shrinks() -> Result<()> {
    let schema = ColumnSchema::default();
    for seed in 1..=20 {
        let raw = messy_extract(seed, 60)?;
        let mut rows = raw.height();

        let step = normalize_columns(raw)?;
        assert_eq!(step.df.height(), rows, "normalize changed rows (seed {seed})");
        let mut df = coerce_types(step.df, &schema)?.df;
        assert_eq!(df.height(), rows, "coerce changed rows (seed {seed})");

        for stage in [
            PipelineStage::Deduplicated,
            PipelineStage::ValidFiltered,
            PipelineStage::NullDropped,
        ] {
            let next = match stage {
                PipelineStage::Deduplicated => deduplicate(&df)?.df,
                PipelineStage::ValidFiltered => remove_invalid_values(&df, &schema)?.df,
                _ => drop_null_rows(&df)?.df,
            };
            assert!(next.height() <= rows, "{stage} grew the frame (seed {seed})");
            rows = next.height();
            df = next;
        }
    }
    Ok(())
}

#[test]
fn test_clean_output_post_conditions() -> Result<()> {
    let pipeline = CleaningPipeline::default();
    for seed in 1..=20 {
        let raw = messy_extract(seed, 80)?;
        let before = raw.height();
        let run = pipeline.clean(raw, "generated")?;

        assert!(run.data.height() <= before);
        assert_eq!(run.rows_removed(), before - run.data.height());
        assert_eq!(total_nulls(&run.data), 0, "nulls remain (seed {seed})");
        assert_eq!(count_duplicates(&run.data)?, 0, "duplicates remain (seed {seed})");
        assert!(all_non_negative(&run.data, "passengers")?);
        assert!(all_non_negative(&run.data, "sales")?);
        assert_eq!(run.data.column("fecha")?.dtype(), &DataType::Date);
        assert_eq!(run.report.headline_stages(), PipelineStage::ALL.to_vec());
        assert!(
            run.report_text()
                .contains(&format!("Rows removed: {}", run.rows_removed()))
        );
    }
    Ok(())
}

#[test]
fn test_combined_output_post_conditions() -> Result<()> {
    let pipeline = CleaningPipeline::default();
    for seed in 1..=10 {
        let a = pipeline.clean(messy_extract(seed, 50)?, "A")?;
        let b = pipeline.clean(messy_extract(seed + 100, 50)?, "B")?;
        let combined = combine(&a, &b)?;

        assert!(combined.shape().rows <= a.data.height() + b.data.height());
        assert_eq!(
            combined.concatenated_shape.rows - combined.shape().rows,
            combined.inter_file_duplicates
        );
        assert!(combined.is_clean(), "combined frame not clean (seed {seed})");
    }
    Ok(())
}
