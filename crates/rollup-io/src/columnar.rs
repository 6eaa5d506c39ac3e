use crate::error::{IoError, IoResult};
use crate::read::text_cell;
use arrow_array::cast::AsArray;
use arrow_array::types::{
    Float16Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow_array::{Array, RecordBatch};
use arrow_schema::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rollup_sql::{Table, Value};
use std::fs::File;
use std::path::Path;

/// Read every record batch of a Parquet file into one [`Table`].
///
/// Strings map to trimmed text (blank strings are missing), integers to ints (`u64` values above
/// `i64::MAX` become floats), floats to floats and booleans to `"TRUE"` / `"FALSE"`. Any other
/// Arrow type is rejected.
pub fn read_parquet(path: &Path) -> IoResult<Table> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .collect();

    let mut table = Table::new(columns)?;
    for batch in builder.build()? {
        append_batch(&mut table, &batch?)?;
    }

    log::debug!(
        "read {} parquet rows over {} columns from {}",
        table.row_count(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

fn append_batch(table: &mut Table, batch: &RecordBatch) -> IoResult<()> {
    let schema = batch.schema();
    let columns = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(array, field)| column_values(array.as_ref(), field.name()))
        .collect::<IoResult<Vec<_>>>()?;

    for row in 0..batch.num_rows() {
        table.push_row(columns.iter().map(|column| column[row].clone()).collect())?;
    }
    Ok(())
}

fn column_values(array: &dyn Array, column: &str) -> IoResult<Vec<Value>> {
    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; array.len()],
        DataType::Utf8 => {
            let strings = array.as_string::<i32>();
            cells(array, |i| text_cell(strings.value(i)))
        }
        DataType::LargeUtf8 => {
            let strings = array.as_string::<i64>();
            cells(array, |i| text_cell(strings.value(i)))
        }
        DataType::Utf8View => {
            let strings = array.as_string_view();
            cells(array, |i| text_cell(strings.value(i)))
        }
        DataType::Boolean => {
            let flags = array.as_boolean();
            cells(array, |i| Value::from(if flags.value(i) { "TRUE" } else { "FALSE" }))
        }
        DataType::Int8 => {
            let ints = array.as_primitive::<Int8Type>();
            cells(array, |i| Value::Int(i64::from(ints.value(i))))
        }
        DataType::Int16 => {
            let ints = array.as_primitive::<Int16Type>();
            cells(array, |i| Value::Int(i64::from(ints.value(i))))
        }
        DataType::Int32 => {
            let ints = array.as_primitive::<Int32Type>();
            cells(array, |i| Value::Int(i64::from(ints.value(i))))
        }
        DataType::Int64 => {
            let ints = array.as_primitive::<Int64Type>();
            cells(array, |i| Value::Int(ints.value(i)))
        }
        DataType::UInt8 => {
            let ints = array.as_primitive::<UInt8Type>();
            cells(array, |i| Value::Int(i64::from(ints.value(i))))
        }
        DataType::UInt16 => {
            let ints = array.as_primitive::<UInt16Type>();
            cells(array, |i| Value::Int(i64::from(ints.value(i))))
        }
        DataType::UInt32 => {
            let ints = array.as_primitive::<UInt32Type>();
            cells(array, |i| Value::Int(i64::from(ints.value(i))))
        }
        DataType::UInt64 => {
            let ints = array.as_primitive::<UInt64Type>();
            cells(array, |i| {
                let v = ints.value(i);
                i64::try_from(v).map_or_else(|_| Value::from(v as f64), Value::Int)
            })
        }
        DataType::Float16 => {
            let floats = array.as_primitive::<Float16Type>();
            cells(array, |i| Value::from(floats.value(i).to_f64()))
        }
        DataType::Float32 => {
            let floats = array.as_primitive::<Float32Type>();
            cells(array, |i| Value::from(f64::from(floats.value(i))))
        }
        DataType::Float64 => {
            let floats = array.as_primitive::<Float64Type>();
            cells(array, |i| Value::from(floats.value(i)))
        }
        other => {
            return Err(IoError::UnsupportedColumnType {
                column: column.to_string(),
                data_type: other.to_string(),
            })
        }
    };
    Ok(values)
}

fn cells(array: &dyn Array, value_at: impl Fn(usize) -> Value) -> Vec<Value> {
    (0..array.len())
        .map(|i| {
            if array.is_null(i) {
                Value::Null
            } else {
                value_at(i)
            }
        })
        .collect()
}
