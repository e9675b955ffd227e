use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error reading field '{field}': {error}")]
pub struct ReadError {
    field: String,
    error: String,
}

impl ReadError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self { field: field.into(), error: error.into() }
    }

    /// The name of the field that could not be decoded.
    pub fn field(&self) -> &str {
        &self.field
    }
}
