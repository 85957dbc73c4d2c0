// crates/jetwash-core/src/transform.rs

//! Cleaning and resampling of one fetched series.

use chrono::Duration;
use polars::prelude::*;
use tracing::debug;

use jetwash_influx::RawSample;

use crate::corrections::Correction;
use crate::error::{PipelineError, Result};
use crate::extract::numeric_value_expr;

pub const TIME_COLUMN: &str = "time";
pub const VALUE_COLUMN: &str = "value";

/// Build the working frame for a fetched series: a millisecond datetime
/// column and the stored values in their raw string form.
pub fn samples_to_frame(samples: &[RawSample]) -> Result<DataFrame> {
    let times: Vec<i64> = samples.iter().map(|s| s.time.timestamp_millis()).collect();
    let values: Vec<&str> = samples.iter().map(|s| s.value.as_str()).collect();

    let time_series = Series::new(TIME_COLUMN.into(), times)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let value_series = Series::new(VALUE_COLUMN.into(), values);

    Ok(DataFrame::new(vec![time_series.into(), value_series.into()])?)
}

/// Extract, correct and resample one series.
///
/// Rows without a recognizable number are dropped. The remaining values are
/// corrected and averaged into half-open, epoch-aligned buckets of width
/// `every`; buckets without samples produce no row. The result has one row
/// per populated bucket, ascending by bucket start.
pub fn treat_series(df: &DataFrame, correction: Correction, every: Duration) -> Result<DataFrame> {
    let every_ms = every.num_milliseconds();
    if every_ms <= 0 {
        return Err(PipelineError::Processing(
            "resample interval must be positive".to_string(),
        ));
    }

    let extracted = df
        .clone()
        .lazy()
        .with_column(numeric_value_expr(VALUE_COLUMN).alias("numeric"))
        .collect()?;

    let time = extracted.column(TIME_COLUMN)?.datetime()?;
    let raw = extracted.column(VALUE_COLUMN)?.str()?;
    let numeric = extracted.column("numeric")?.f64()?;

    let mut bucket_ms: Vec<i64> = Vec::with_capacity(extracted.height());
    let mut corrected: Vec<f64> = Vec::with_capacity(extracted.height());

    for idx in 0..extracted.height() {
        let (Some(ts), Some(value)) = (time.get(idx), numeric.get(idx)) else {
            debug!(
                raw = raw.get(idx).unwrap_or_default(),
                "dropping row without a numeric value"
            );
            continue;
        };
        bucket_ms.push(ts.div_euclid(every_ms) * every_ms);
        corrected.push(correction.apply(value));
    }

    let bucket_series = Series::new(TIME_COLUMN.into(), bucket_ms)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let value_series = Series::new(VALUE_COLUMN.into(), corrected);
    let buckets = DataFrame::new(vec![bucket_series.into(), value_series.into()])?;

    Ok(buckets
        .lazy()
        .group_by([col(TIME_COLUMN)])
        .agg([col(VALUE_COLUMN).mean()])
        .sort([TIME_COLUMN], SortMultipleOptions::default())
        .collect()?)
}
