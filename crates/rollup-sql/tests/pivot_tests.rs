mod common;

use common::{int, rentals, table, text};
use pretty_assertions::assert_eq;
use rollup_sql::{pivot, TransformError, Value, GRAND_TOTAL_COLUMN};

#[test]
fn counts_per_value_with_grand_total() {
    let out = pivot(
        &rentals(),
        "Market",
        "Product",
        "Segment",
        &[text("SegA"), text("SegB")],
    )
    .unwrap();

    assert_eq!(
        out.columns(),
        ["Market", "Product", "SegA", "SegB", GRAND_TOTAL_COLUMN]
    );
    assert_eq!(
        out.rows(),
        [
            vec![text("M1"), text("P1"), int(2), int(0), int(2)],
            vec![text("M1"), text("P2"), int(0), int(1), int(1)],
        ]
    );
}

#[test]
fn rows_with_unlisted_values_are_dropped() {
    let input = table(
        &["g1", "g2", "v"],
        vec![
            vec![text("a"), text("x"), text("keep")],
            vec![text("a"), text("x"), text("skip")],
            vec![text("b"), text("y"), text("skip")],
        ],
    );
    let out = pivot(&input, "g1", "g2", "v", &[text("keep")]).unwrap();
    assert_eq!(
        out.rows(),
        [vec![text("a"), text("x"), int(1), int(1)]]
    );
}

#[test]
fn numeric_values_name_their_columns() {
    let input = table(
        &["g1", "g2", "v"],
        vec![
            vec![text("a"), text("x"), int(1)],
            vec![text("a"), text("x"), Value::from(2.0)],
        ],
    );
    let out = pivot(&input, "g1", "g2", "v", &[int(1), int(2)]).unwrap();
    assert_eq!(out.columns(), ["g1", "g2", "1", "2", GRAND_TOTAL_COLUMN]);
    assert_eq!(out.rows(), [vec![text("a"), text("x"), int(1), int(1), int(2)]]);
}

#[test]
fn grand_total_equals_sum_of_counts() {
    let out = pivot(
        &rentals(),
        "Market",
        "Segment",
        "Customer",
        &[text("C1"), text("C2"), text("C3")],
    )
    .unwrap();
    for row in out.rows() {
        let counts: f64 = row[2..row.len() - 1]
            .iter()
            .map(|v| v.as_f64().unwrap())
            .sum();
        assert_eq!(Some(counts), row[row.len() - 1].as_f64());
    }
}

#[test]
fn empty_value_list_is_rejected() {
    let err = pivot(&rentals(), "Market", "Product", "Segment", &[]).unwrap_err();
    assert!(matches!(err, TransformError::Validation(_)));
}

#[test]
fn value_named_like_a_grouping_column_is_rejected() {
    let err = pivot(&rentals(), "Market", "Product", "Segment", &[text("Market")]).unwrap_err();
    assert!(matches!(err, TransformError::Validation(_)));
}

#[test]
fn missing_value_column_is_a_schema_error() {
    let err = pivot(&rentals(), "Market", "Product", "Seats", &[int(1)]).unwrap_err();
    assert_eq!(
        err,
        TransformError::Schema {
            column: "Seats".to_string()
        }
    );
}
