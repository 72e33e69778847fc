use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field '{0}'")]
    MissingField(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl DomainError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
