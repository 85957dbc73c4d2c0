// crates/jetwash-core/src/pipeline.rs

//! The fetch, treat, write loop over the configured topic table.

use polars::prelude::*;
use tracing::info;

use jetwash_influx::{FieldValue, Point, SeriesStore};

use crate::config::Config;
use crate::corrections::CorrectionTable;
use crate::error::Result;
use crate::transform::{samples_to_frame, treat_series, TIME_COLUMN, VALUE_COLUMN};

/// What happened for one topic of the run.
#[derive(Debug)]
pub struct TopicReport {
    pub source: String,
    pub target: String,
    pub raw_rows: usize,
    pub points: usize,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub topics: Vec<TopicReport>,
}

impl RunSummary {
    pub fn total_points(&self) -> usize {
        self.topics.iter().map(|topic| topic.points).sum()
    }
}

/// Run the whole treatment: for every configured topic in order, fetch the
/// raw series, treat it and write the result under the target identifier.
/// A topic without data is skipped; any store failure aborts the run. With
/// `dry_run` set, the write phase only logs what it would submit.
pub fn run(store: &dyn SeriesStore, config: &Config, dry_run: bool) -> Result<RunSummary> {
    let corrections = CorrectionTable::new(config.wheel_radius_m);
    let mut summary = RunSummary::default();

    for route in &config.topics {
        info!(source = %route.source, target = %route.target, "processing topic");

        let samples = store.query_series(&route.source, config.lookback)?;
        if samples.is_empty() {
            info!(source = %route.source, "no data found");
            summary.topics.push(TopicReport {
                source: route.source.clone(),
                target: route.target.clone(),
                raw_rows: 0,
                points: 0,
            });
            continue;
        }

        let raw_rows = samples.len();
        let frame = samples_to_frame(&samples)?;
        let treated = treat_series(&frame, corrections.for_source(&route.source), config.resample)?;
        let points = write_series(store, &route.target, &treated, dry_run)?;

        info!(source = %route.source, raw_rows, points, "topic finished");
        summary.topics.push(TopicReport {
            source: route.source.clone(),
            target: route.target.clone(),
            raw_rows,
            points,
        });
    }

    Ok(summary)
}

/// Submit one point per treated row, oldest first. Returns the number of
/// points submitted (or, in a dry run, that would have been).
fn write_series(
    store: &dyn SeriesStore,
    target: &str,
    treated: &DataFrame,
    dry_run: bool,
) -> Result<usize> {
    let time = treated.column(TIME_COLUMN)?.datetime()?;
    let value = treated.column(VALUE_COLUMN)?.f64()?;

    let mut points = 0usize;
    for idx in 0..treated.height() {
        let (Some(ts_ms), Some(v)) = (time.get(idx), value.get(idx)) else {
            continue;
        };
        let point = Point::new(target)
            .field("value", FieldValue::Float(v))
            .timestamp_ns(ts_ms * 1_000_000);

        if dry_run {
            info!(line = %point.to_line_protocol(), "dry run, skipping write");
        } else {
            store.write_point(&point)?;
        }
        points += 1;
    }

    Ok(points)
}
