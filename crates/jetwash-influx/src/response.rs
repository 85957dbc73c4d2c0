//! Decoding of Flux annotated-CSV query responses.
//!
//! The `/api/v2/query` endpoint answers in annotated CSV: `#`-prefixed
//! annotation rows, then a header row per table, then data rows. Only the
//! `_time` and `_value` columns are read; everything else is ignored.

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};

use crate::error::{ClientError, Result};

/// One raw sample as returned by the store: a timestamp and the stored
/// value in its original string form.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub time: DateTime<Utc>,
    pub value: String,
}

/// Decode a query response body into samples, in response order.
///
/// A body without any `_time`/`_value` table decodes to an empty result,
/// unless it carries the in-band error form (a table with an `error`
/// column), which surfaces as [`ClientError::Query`]. Error tables are
/// recognized anywhere in the stream, including after data tables and when
/// the message row is missing.
pub fn decode_query_response(body: &str) -> Result<Vec<RawSample>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(body.as_bytes());

    let mut time_idx: Option<usize> = None;
    let mut value_idx: Option<usize> = None;
    let mut error_idx: Option<usize> = None;
    let mut samples = Vec::new();

    for record in reader.records() {
        let record = record?;

        if let Some(idx) = error_idx {
            let message = record.get(idx).unwrap_or("").trim();
            return Err(ClientError::Query(if message.is_empty() {
                "store reported an unspecified error".to_string()
            } else {
                message.to_string()
            }));
        }

        // Each table repeats its header row; annotations are already
        // stripped by the comment setting.
        if contains(&record, "_time") && contains(&record, "_value") {
            time_idx = position(&record, "_time");
            value_idx = position(&record, "_value");
            continue;
        }

        // Flux reports query failures as a table with `error` and
        // `reference` columns, the message in the following row. Error
        // tables can also cut into the stream after data tables; past the
        // first data header, only a row naming both columns opens one (a
        // data row can carry the bare word `error`).
        if let Some(idx) = position(&record, "error") {
            if time_idx.is_none() || contains(&record, "reference") {
                error_idx = Some(idx);
                continue;
            }
        }

        let (Some(t_idx), Some(v_idx)) = (time_idx, value_idx) else {
            continue;
        };

        let Some(raw_time) = record.get(t_idx) else {
            continue;
        };
        if raw_time.is_empty() {
            continue;
        }

        let time = DateTime::parse_from_rfc3339(raw_time)
            .map_err(|err| {
                ClientError::Response(format!("bad _time value {:?}: {}", raw_time, err))
            })?
            .with_timezone(&Utc);
        let value = record.get(v_idx).unwrap_or("").to_string();

        samples.push(RawSample { time, value });
    }

    // An error header right at the end of the body still marks a failed
    // query, even though the message row never arrived.
    if error_idx.is_some() {
        return Err(ClientError::Query(
            "store reported an unspecified error".to_string(),
        ));
    }

    Ok(samples)
}

fn contains(record: &StringRecord, name: &str) -> bool {
    record.iter().any(|field| field == name)
}

fn position(record: &StringRecord, name: &str) -> Option<usize> {
    record.iter().position(|field| field == name)
}
