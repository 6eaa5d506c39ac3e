pub type TransformResult<T> = Result<T, TransformError>;

/// Failures raised by the relational operations.
///
/// The set is closed: a referenced column that does not exist, a filter operator outside the six
/// supported symbols, or parameters whose shape does not make sense (mismatched parallel lists,
/// empty required lists, non-numeric columns where sums are required).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("unknown column: {column}")]
    Schema { column: String },

    #[error("invalid operator `{0}`: supported operators are >=, <=, >, <, ==, !=")]
    InvalidOperator(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl TransformError {
    pub(crate) fn unknown_column(column: impl Into<String>) -> Self {
        TransformError::Schema {
            column: column.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        TransformError::Validation(message.into())
    }
}
