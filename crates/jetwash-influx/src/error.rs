// crates/jetwash-influx/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("InfluxDB returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("CSV decoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed query response: {0}")]
    Response(String),

    #[error("Query rejected: {0}")]
    Query(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
