mod common;

use common::{int, rentals, table, text};
use pretty_assertions::assert_eq;
use rollup_sql::{group_agg, group_count, AggFunc, TransformError, Value};

#[test]
fn group_count_sorts_by_key() {
    let counted = group_count(&rentals(), &["Market", "Product", "Segment"], "Count").unwrap();
    assert_eq!(counted.columns(), ["Market", "Product", "Segment", "Count"]);
    assert_eq!(
        counted.rows(),
        [
            vec![text("M1"), text("P1"), text("SegA"), int(2)],
            vec![text("M1"), text("P2"), text("SegB"), int(1)],
        ]
    );
}

#[test]
fn counts_sum_to_row_count() {
    let input = table(
        &["k"],
        vec![
            vec![text("b")],
            vec![text("a")],
            vec![Value::Null],
            vec![text("b")],
            vec![int(3)],
        ],
    );
    let counted = group_count(&input, &["k"], "n").unwrap();
    // Numbers, then text, then missing.
    assert_eq!(
        counted.rows(),
        [
            vec![int(3), int(1)],
            vec![text("a"), int(1)],
            vec![text("b"), int(2)],
            vec![Value::Null, int(1)],
        ]
    );
    let total: i64 = counted
        .column_values("n")
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap() as i64)
        .sum();
    assert_eq!(total as usize, input.row_count());
}

#[test]
fn group_count_rejects_counter_clashing_with_key() {
    let err = group_count(&rentals(), &["Market"], "Market").unwrap_err();
    assert!(matches!(err, TransformError::Validation(_)));
}

#[test]
fn group_count_missing_key_is_a_schema_error() {
    let err = group_count(&rentals(), &["Region"], "Count").unwrap_err();
    assert_eq!(
        err,
        TransformError::Schema {
            column: "Region".to_string()
        }
    );
}

fn payments() -> rollup_sql::Table {
    table(
        &["Market", "Payment"],
        vec![
            vec![text("M1"), int(10)],
            vec![text("M2"), int(5)],
            vec![text("M1"), Value::from(2.5)],
            vec![text("M1"), Value::Null],
            vec![text("M2"), int(7)],
        ],
    )
}

#[test]
fn group_agg_functions() {
    let cases = [
        (AggFunc::Sum, [Value::from(12.5), int(12)]),
        (AggFunc::Count, [int(2), int(2)]),
        (AggFunc::Min, [Value::from(2.5), int(5)]),
        (AggFunc::Max, [int(10), int(7)]),
        (AggFunc::Mean, [Value::from(6.25), Value::from(6.0)]),
    ];
    for (func, [m1, m2]) in cases {
        let out = group_agg(&payments(), &["Market"], "Out", "Payment", func).unwrap();
        assert_eq!(out.columns(), ["Market", "Out"]);
        assert_eq!(
            out.rows(),
            [vec![text("M1"), m1], vec![text("M2"), m2]],
            "aggregation {func}"
        );
    }
}

#[test]
fn group_agg_sum_over_text_is_rejected() {
    let input = table(&["k", "v"], vec![vec![text("a"), text("ten")]]);
    let err = group_agg(&input, &["k"], "total", "v", AggFunc::Sum).unwrap_err();
    assert!(matches!(err, TransformError::Validation(_)));
}

#[test]
fn agg_func_parses_aliases() {
    assert_eq!("avg".parse::<AggFunc>().unwrap(), AggFunc::Mean);
    assert_eq!("SUM".parse::<AggFunc>().unwrap(), AggFunc::Sum);
    assert!("median".parse::<AggFunc>().is_err());
}
