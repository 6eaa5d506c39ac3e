use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 2^63 as an `f64`; the first float above every `i64`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// A single table cell.
///
/// Numbers compare and hash by numeric value, so `Int(3)` and `Float(3.0)` are the same key in a
/// join or a group-by. `Null` is a regular member of the domain: two nulls are equal and sort
/// after every other value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(Arc<str>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(v.into_inner()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }
}

fn float_as_exact_int(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && (-TWO_POW_63..TWO_POW_63).contains(&value)).then(|| value as i64)
}

fn cmp_int_float(int: i64, float: f64) -> Ordering {
    if float.is_nan() || float >= TWO_POW_63 {
        return Ordering::Less;
    }
    if float < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let truncated = float.trunc();
    match int.cmp(&(truncated as i64)) {
        Ordering::Equal => truncated
            .partial_cmp(&float)
            .unwrap_or(Ordering::Equal),
        ord => ord,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                float_as_exact_int(f.into_inner()) == Some(*i)
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Int(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Value::Float(v) => match float_as_exact_int(v.into_inner()) {
                Some(int) => {
                    1u8.hash(state);
                    int.hash(state);
                }
                None => {
                    2u8.hash(state);
                    v.hash(state);
                }
            },
            Value::Text(v) => {
                3u8.hash(state);
                v.hash(state);
            }
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Text(a), Value::Text(b)) => a.as_ref().cmp(b.as_ref()),
            (Value::Text(_), _) => Ordering::Greater,
            (_, Value::Text(_)) => Ordering::Less,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, b.into_inner()),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, a.into_inner()).reverse(),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", v.into_inner()),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

/// NaN has no place in a table; it becomes `Null`.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Value::Null
        } else {
            Value::Float(OrderedFloat(value))
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Running sum over numeric cells that stays integral until a float (or an `i64` overflow) shows
/// up. Nulls are skipped.
#[derive(Clone, Debug, Default)]
pub(crate) struct NumericSum {
    int: i64,
    float: f64,
    is_float: bool,
    count: usize,
}

impl NumericSum {
    /// Returns `false` when `value` is text and was not added.
    pub(crate) fn add(&mut self, value: &Value) -> bool {
        match value {
            Value::Null => {}
            Value::Int(v) => {
                if self.is_float {
                    self.float += *v as f64;
                } else if let Some(sum) = self.int.checked_add(*v) {
                    self.int = sum;
                } else {
                    self.float = self.int as f64 + *v as f64;
                    self.is_float = true;
                }
                self.count += 1;
            }
            Value::Float(v) => {
                if !self.is_float {
                    self.float = self.int as f64;
                    self.is_float = true;
                }
                self.float += v.into_inner();
                self.count += 1;
            }
            Value::Text(_) => return false,
        }
        true
    }

    pub(crate) fn total(&self) -> Value {
        if self.is_float {
            Value::from(self.float)
        } else {
            Value::Int(self.int)
        }
    }

    pub(crate) fn mean(&self) -> Value {
        if self.count == 0 {
            return Value::Null;
        }
        let total = if self.is_float {
            self.float
        } else {
            self.int as f64
        };
        Value::from(total / self.count as f64)
    }
}
