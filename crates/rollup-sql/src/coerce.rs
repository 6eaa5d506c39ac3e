use crate::error::TransformResult;
use crate::table::Table;
use crate::value::Value;

/// Convert one column to numbers.
///
/// Each cell is read as text, thousands separators (`,`) are stripped and the rest is parsed as
/// an integer or, failing that, a float. Anything that still does not parse becomes
/// [`Value::Null`]; only a missing column is an error.
pub fn coerce_numeric(table: &Table, column: &str) -> TransformResult<Table> {
    let idx = table.require_column(column)?;

    let mut out = table.clone();
    let mut unparsed = 0usize;
    for row in out.rows_mut() {
        let coerced = parse_numeric(&row[idx]);
        if coerced.is_null() && !row[idx].is_null() {
            unparsed += 1;
        }
        row[idx] = coerced;
    }

    if unparsed > 0 {
        log::debug!("coerce_numeric: {unparsed} value(s) in `{column}` did not parse and are now missing");
    }
    Ok(out)
}

pub fn parse_numeric(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Int(_) | Value::Float(_) => value.clone(),
        Value::Text(text) => parse_numeric_text(text),
    }
}

/// `"1,250"` -> `Int(1250)`, `" 2.5 "` -> `Float(2.5)`, `"abc"` -> `Null`.
pub fn parse_numeric_text(text: &str) -> Value {
    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = cleaned.parse::<i64>() {
        return Value::Int(int);
    }
    cleaned
        .parse::<f64>()
        .map(Value::from)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thousands_separators() {
        assert_eq!(parse_numeric_text("1,250"), Value::Int(1250));
        assert_eq!(parse_numeric_text("1,234,567.5"), Value::from(1_234_567.5));
    }

    #[test]
    fn junk_becomes_null() {
        assert_eq!(parse_numeric_text("abc"), Value::Null);
        assert_eq!(parse_numeric_text(""), Value::Null);
        assert_eq!(parse_numeric_text("NaN"), Value::Null);
        assert_eq!(parse_numeric_text("12 units"), Value::Null);
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(parse_numeric(&Value::Int(7)), Value::Int(7));
        assert_eq!(parse_numeric(&Value::from(7.25)), Value::from(7.25));
        assert_eq!(parse_numeric(&Value::Null), Value::Null);
    }
}
