use thiserror::Error;

/// Errors that can occur when parsing a bill id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillIdError {
    #[error("Bill id cannot be empty")]
    Empty,
    #[error("Bill id too long (max 100 characters)")]
    TooLong,
    #[error("Bill id contains invalid character: {0:?}")]
    InvalidCharacter(char),
}

/// Errors that can occur when interpreting an upstream bill payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Bill payload is not a JSON object")]
    NotAnObject,
}
