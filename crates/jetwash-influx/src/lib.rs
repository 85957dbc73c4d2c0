pub mod client;
pub mod error;
pub mod line_protocol;
pub mod response;

pub use client::{flux_query, InfluxClient, InfluxConfig, SeriesStore};
pub use error::{ClientError, Result};
pub use line_protocol::{FieldValue, Point};
pub use response::{decode_query_response, RawSample};
