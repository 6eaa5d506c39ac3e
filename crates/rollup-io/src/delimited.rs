use crate::error::{IoError, IoResult};
use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;
use rollup_sql::{Table, Value};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::{Read, Write};

/// Reader settings for delimited files.
///
/// Serialized as `{"delimiter": ";", "encoding": "windows1252"}`; both fields are optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    #[serde(with = "ascii_char")]
    pub delimiter: u8,
    /// How to decode raw CSV bytes into text fields.
    pub encoding: CsvTextEncoding,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: CsvTextEncoding::Auto,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvTextEncoding {
    /// UTF-8, falling back to Windows-1252 for any field that is not valid UTF-8.
    ///
    /// Matches what Excel produces when exporting CSV on Windows.
    Auto,
    /// UTF-8; invalid byte sequences are an error.
    Utf8,
    Windows1252,
}

mod ascii_char {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(byte: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(char::from(*byte))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let c = char::deserialize(deserializer)?;
        u8::try_from(c)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| D::Error::custom(format!("delimiter `{c}` is not an ASCII character")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Text,
}

/// Read a CSV stream into a [`Table`].
///
/// The first record is the header. Each column gets a single kind inferred from all of its
/// non-empty fields: integers if every field parses as `i64`, floats if every field parses as
/// `f64`, text otherwise. Empty fields are [`Value::Null`] and short rows are padded with nulls.
/// Thousands separators are not understood here; `"1,250"` stays text until it is coerced.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> IoResult<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Headers are handled here so blank names and ragged rows get consistent treatment.
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    let mut record_index: u64 = 0;
    let mut header: Option<Vec<String>> = None;
    let mut body: Vec<Vec<String>> = Vec::new();

    loop {
        let more = csv_reader
            .read_byte_record(&mut record)
            .map_err(|e| IoError::from_csv(e, record_index + 1))?;
        if !more {
            break;
        }
        record_index += 1;
        let fields = decode_record(&record, record_index, options.encoding)?;
        match header {
            None => header = Some(fields),
            Some(_) => body.push(fields),
        }
    }

    let Some(mut header) = header else {
        return Err(IoError::EmptyInput);
    };

    let width = body.iter().map(Vec::len).fold(header.len(), usize::max);
    header.resize(width, String::new());
    for (idx, name) in header.iter_mut().enumerate() {
        if name.trim().is_empty() {
            *name = format!("Column{}", idx + 1);
        } else {
            *name = name.trim().to_string();
        }
    }

    let kinds = infer_column_kinds(&body, width);
    let rows = body.iter().map(|fields| {
        kinds
            .iter()
            .enumerate()
            .map(|(idx, &kind)| parse_field(fields.get(idx).map_or("", String::as_str), kind))
            .collect::<Vec<_>>()
    });

    let table = Table::with_rows(header, rows)?;
    log::debug!(
        "read {} csv rows over {} columns",
        table.row_count(),
        table.columns().len()
    );
    Ok(table)
}

/// Write `table` as CSV: a header record, then one record per row with nulls as empty fields.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> IoResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(table.columns())
        .map_err(|e| IoError::from_csv(e, 1))?;
    for (idx, row) in table.rows().iter().enumerate() {
        csv_writer
            .write_record(row.iter().map(ToString::to_string))
            .map_err(|e| IoError::from_csv(e, idx as u64 + 2))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn infer_column_kinds(body: &[Vec<String>], width: usize) -> Vec<ColumnKind> {
    (0..width)
        .map(|col| {
            let mut is_int = true;
            let mut is_float = true;
            for field in body.iter().filter_map(|row| row.get(col)) {
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                if is_int && field.parse::<i64>().is_err() {
                    is_int = false;
                }
                if field.parse::<f64>().is_err() {
                    is_float = false;
                    break;
                }
            }
            if is_int {
                ColumnKind::Int
            } else if is_float {
                ColumnKind::Float
            } else {
                ColumnKind::Text
            }
        })
        .collect()
}

fn parse_field(field: &str, kind: ColumnKind) -> Value {
    let field = field.trim();
    if field.is_empty() {
        return Value::Null;
    }
    match kind {
        ColumnKind::Int => field.parse::<i64>().map(Value::Int).unwrap_or(Value::Null),
        ColumnKind::Float => field.parse::<f64>().map(Value::from).unwrap_or(Value::Null),
        ColumnKind::Text => Value::from(field),
    }
}

fn decode_record(
    record: &ByteRecord,
    row: u64,
    encoding: CsvTextEncoding,
) -> IoResult<Vec<String>> {
    record
        .iter()
        .enumerate()
        .map(|(idx, field)| decode_field(field, row, idx == 0, encoding).map(Cow::into_owned))
        .collect()
}

fn decode_field(
    field: &[u8],
    row: u64,
    first_column: bool,
    encoding: CsvTextEncoding,
) -> IoResult<Cow<'_, str>> {
    // Excel-exported CSVs often start with a UTF-8 byte order mark.
    let field = if row == 1 && first_column {
        field.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(field)
    } else {
        field
    };

    match encoding {
        CsvTextEncoding::Utf8 => std::str::from_utf8(field)
            .map(Cow::Borrowed)
            .map_err(|e| IoError::Csv {
                row,
                reason: format!("invalid UTF-8: {e}"),
            }),
        CsvTextEncoding::Windows1252 => Ok(WINDOWS_1252.decode(field).0),
        CsvTextEncoding::Auto => Ok(match std::str::from_utf8(field) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => WINDOWS_1252.decode(field).0,
        }),
    }
}
