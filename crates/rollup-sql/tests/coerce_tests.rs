mod common;

use common::{int, table, text};
use pretty_assertions::assert_eq;
use rollup_sql::{coerce_numeric, TransformError, Value};

#[test]
fn coerces_only_the_named_column() {
    let input = table(
        &["Payment", "Note"],
        vec![
            vec![text("1,250"), text("7")],
            vec![text("abc"), text("x")],
            vec![text(" 2.5 "), Value::Null],
            vec![Value::Null, text("y")],
            vec![int(3), text("z")],
        ],
    );

    let out = coerce_numeric(&input, "Payment").unwrap();
    assert_eq!(
        out.column_values("Payment").unwrap(),
        [int(1250), Value::Null, Value::from(2.5), Value::Null, int(3)]
    );
    assert_eq!(
        out.column_values("Note").unwrap(),
        input.column_values("Note").unwrap()
    );
    assert_eq!(out.columns(), input.columns());
}

#[test]
fn coercion_is_idempotent() {
    let input = table(&["v"], vec![vec![text("1,000")], vec![text("n/a")]]);
    let once = coerce_numeric(&input, "v").unwrap();
    let twice = coerce_numeric(&once, "v").unwrap();
    assert_eq!(once, twice);
}

#[test]
fn missing_column_is_a_schema_error() {
    let input = table(&["v"], vec![vec![text("1")]]);
    assert_eq!(
        coerce_numeric(&input, "Payment").unwrap_err(),
        TransformError::Schema {
            column: "Payment".to_string()
        }
    );
}
