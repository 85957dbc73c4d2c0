// crates/jetwash-core/src/extract.rs

//! Numeric extraction from raw telemetry strings.
//!
//! Stored values arrive as loose text ("13 km/h", "SoC: 87.5%"). The
//! treatment keeps the first numeric substring and ignores the rest.

use polars::prelude::*;

/// First numeric substring recognized in a raw value: one or more digits,
/// optionally followed by a dot and more digits. Signs are not part of the
/// match.
pub const NUMERIC_PATTERN: &str = r"(\d+\.?\d*)";

/// Expression turning the string column `column` into its extracted numeric
/// value as Float64. Rows without a recognizable number become null.
pub fn numeric_value_expr(column: &str) -> Expr {
    col(column)
        .str()
        .extract(lit(NUMERIC_PATTERN), 1)
        .cast(DataType::Float64)
}
