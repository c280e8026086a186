use std::fmt;

/// An airport record that cannot be placed on the globe.
///
/// Raised at join time so malformed coordinates never reach the render layer
/// as NaN positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataValidationError {
    /// Normalized airport code the record was matched by.
    pub code: String,
    /// Offending field (`"lat"` or `"lon"`).
    pub field: &'static str,
    /// The raw value as it appeared in the table.
    pub value: String,
}

impl DataValidationError {
    pub fn new(code: impl Into<String>, field: &'static str, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            field,
            value: value.into(),
        }
    }
}

impl fmt::Display for DataValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "airport {}: {} is not a finite number ({:?})",
            self.code, self.field, self.value
        )
    }
}

impl std::error::Error for DataValidationError {}
