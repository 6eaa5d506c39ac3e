#![allow(dead_code)]

use rollup_sql::{Table, Value};

pub fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
    Table::with_rows(columns.to_vec(), rows).unwrap()
}

pub fn text(s: &str) -> Value {
    Value::from(s)
}

pub fn int(v: i64) -> Value {
    Value::Int(v)
}

/// Three rental rows over Market/Product/Segment/Customer; two share every column.
pub fn rentals() -> Table {
    table(
        &["Market", "Product", "Segment", "Customer"],
        vec![
            vec![text("M1"), text("P1"), text("SegA"), text("C1")],
            vec![text("M1"), text("P1"), text("SegA"), text("C1")],
            vec![text("M1"), text("P2"), text("SegB"), text("C2")],
        ],
    )
}
