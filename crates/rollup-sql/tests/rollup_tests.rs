mod common;

use common::{int, table, text};
use pretty_assertions::assert_eq;
use rollup_sql::{order_rollup, rollup, with_rollup, RollupLabels, Table, TransformError, Value};

fn counts() -> Table {
    table(
        &["Market", "Product", "SegA", "SegB"],
        vec![
            vec![text("M2"), text("P1"), int(1), int(0)],
            vec![text("M1"), text("P2"), int(0), int(3)],
            vec![text("M1"), text("P1"), int(2), Value::from(0.5)],
        ],
    )
}

#[test]
fn rollup_returns_only_synthetic_rows() {
    let totals = rollup(&counts(), "Market", "Product", &RollupLabels::default()).unwrap();
    assert_eq!(totals.columns(), counts().columns());
    assert_eq!(
        totals.rows(),
        [
            vec![text("M1"), text("Total"), int(2), Value::from(3.5)],
            vec![text("M2"), text("Total"), int(1), int(0)],
            vec![text("Grand Total"), text("Total"), int(3), Value::from(3.5)],
        ]
    );
}

#[test]
fn with_rollup_places_subtotals_after_their_group() {
    let out = with_rollup(&counts(), "Market", "Product", &RollupLabels::default()).unwrap();
    let keys: Vec<(Value, Value)> = out
        .rows()
        .iter()
        .map(|row| (row[0].clone(), row[1].clone()))
        .collect();
    assert_eq!(
        keys,
        [
            (text("M1"), text("P1")),
            (text("M1"), text("P2")),
            (text("M1"), text("Total")),
            (text("M2"), text("P1")),
            (text("M2"), text("Total")),
            (text("Grand Total"), text("Total")),
        ]
    );
}

#[test]
fn subtotals_conserve_column_sums() {
    let base = counts();
    let totals = rollup(&base, "Market", "Product", &RollupLabels::default()).unwrap();
    let (subtotals, grand) = totals.rows().split_at(totals.row_count() - 1);

    for col in 2..base.columns().len() {
        let base_sum: f64 = base.rows().iter().filter_map(|r| r[col].as_f64()).sum();
        let sub_sum: f64 = subtotals.iter().filter_map(|r| r[col].as_f64()).sum();
        assert_eq!(base_sum, sub_sum);
        assert_eq!(Some(base_sum), grand[0][col].as_f64());
    }
}

#[test]
fn custom_labels_are_used_for_markers_and_ordering() {
    let labels = RollupLabels::new("All", "Everything");
    let out = with_rollup(&counts(), "Market", "Product", &labels).unwrap();
    let last = &out.rows()[out.row_count() - 1];
    assert_eq!(last[0], text("Everything"));
    assert_eq!(last[1], text("All"));
    assert_eq!(out.rows()[2][1], text("All"));
}

#[test]
fn grand_total_sorts_last_even_when_a_group_sorts_after_it() {
    let base = table(
        &["g1", "g2", "n"],
        vec![
            vec![text("Zulu"), text("x"), int(1)],
            vec![text("Alpha"), text("x"), int(2)],
        ],
    );
    let out = with_rollup(&base, "g1", "g2", &RollupLabels::default()).unwrap();
    assert_eq!(out.rows()[out.row_count() - 1][0], text("Grand Total"));
    assert_eq!(out.rows()[out.row_count() - 2], vec![text("Zulu"), text("Total"), int(1)]);
}

#[test]
fn order_rollup_is_stable_for_equal_keys() {
    let base = table(
        &["g1", "g2", "n"],
        vec![
            vec![text("a"), text("x"), int(1)],
            vec![text("a"), text("x"), int(2)],
        ],
    );
    let out = order_rollup(&base, "g1", "g2", &RollupLabels::default()).unwrap();
    assert_eq!(out, base);
}

#[test]
fn text_measure_column_is_rejected() {
    let base = table(
        &["g1", "g2", "note"],
        vec![vec![text("a"), text("x"), text("hello")]],
    );
    let err = rollup(&base, "g1", "g2", &RollupLabels::default()).unwrap_err();
    assert!(matches!(err, TransformError::Validation(_)));
}

#[test]
fn missing_grouping_column_is_a_schema_error() {
    let err = rollup(&counts(), "Region", "Product", &RollupLabels::default()).unwrap_err();
    assert_eq!(
        err,
        TransformError::Schema {
            column: "Region".to_string()
        }
    );
}

#[test]
fn empty_table_still_gets_a_grand_total() {
    let base = table(&["g1", "g2", "n"], Vec::new());
    let totals = rollup(&base, "g1", "g2", &RollupLabels::default()).unwrap();
    assert_eq!(
        totals.rows(),
        [vec![text("Grand Total"), text("Total"), int(0)]]
    );
}
