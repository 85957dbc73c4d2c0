use jetwash_core::extract::numeric_value_expr;
use polars::prelude::*;

fn extracted(values: &[&str]) -> Float64Chunked {
    let df = df!("value" => values).expect("frame build failed");
    let out = df
        .lazy()
        .with_column(numeric_value_expr("value").alias("numeric"))
        .collect()
        .expect("extraction failed");
    out.column("numeric")
        .expect("missing numeric column")
        .f64()
        .expect("numeric column is not f64")
        .clone()
}

#[test]
fn extracts_first_number_from_mixed_text() {
    let numeric = extracted(&["13 km/h", "SoC: 87.5%", "105%", "v=0.5 m/s"]);

    assert_eq!(numeric.get(0), Some(13.0));
    assert_eq!(numeric.get(1), Some(87.5));
    assert_eq!(numeric.get(2), Some(105.0));
    assert_eq!(numeric.get(3), Some(0.5));
}

#[test]
fn only_the_first_number_counts() {
    let numeric = extracted(&["12.7.3", "10 of 20"]);

    assert_eq!(numeric.get(0), Some(12.7));
    assert_eq!(numeric.get(1), Some(10.0));
}

#[test]
fn rows_without_numbers_become_null() {
    let numeric = extracted(&["...", "n/a", ""]);

    assert!(numeric.get(0).is_none());
    assert!(numeric.get(1).is_none());
    assert!(numeric.get(2).is_none());
}

#[test]
fn signs_are_not_part_of_the_number() {
    let numeric = extracted(&["-5", "+3.5"]);

    assert_eq!(numeric.get(0), Some(5.0));
    assert_eq!(numeric.get(1), Some(3.5));
}

#[test]
fn bare_numbers_pass_through() {
    let numeric = extracted(&["42", "0.001"]);

    assert_eq!(numeric.get(0), Some(42.0));
    assert_eq!(numeric.get(1), Some(0.001));
}
