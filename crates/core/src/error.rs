use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("malformed row: {0}")]
    Row(String),

    #[error("io error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
