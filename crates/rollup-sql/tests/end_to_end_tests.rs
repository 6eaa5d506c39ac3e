mod common;

use common::{int, rentals, text};
use pretty_assertions::assert_eq;
use rollup_sql::{classify, group_count, pivot, with_rollup, RollupLabels};

#[test]
fn rentals_to_segment_rollup() {
    let counted = group_count(&rentals(), &["Market", "Customer", "Segment"], "Count").unwrap();
    assert_eq!(
        counted.rows(),
        [
            vec![text("M1"), text("C1"), text("SegA"), int(2)],
            vec![text("M1"), text("C2"), text("SegB"), int(1)],
        ]
    );

    let categorised = classify(
        &counted,
        &["Market", "Customer", "Segment", "Count"],
        "Count",
        &[(1.0, 2.0)],
        &["1-2"],
        "3+",
        "Category",
    )
    .unwrap();
    assert_eq!(
        categorised.column_values("Category").unwrap(),
        [text("1-2"), text("1-2")]
    );

    let pivoted = pivot(
        &categorised,
        "Market",
        "Category",
        "Segment",
        &[text("SegA"), text("SegB")],
    )
    .unwrap();
    assert_eq!(
        pivoted.columns(),
        ["Market", "Category", "SegA", "SegB", "Grand_Total"]
    );

    let out = with_rollup(&pivoted, "Market", "Category", &RollupLabels::default()).unwrap();
    assert_eq!(
        out.rows(),
        [
            vec![text("M1"), text("1-2"), int(1), int(1), int(2)],
            vec![text("M1"), text("Total"), int(1), int(1), int(2)],
            vec![text("Grand Total"), text("Total"), int(1), int(1), int(2)],
        ]
    );
}
