use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{api} responded with HTTP {status}")]
    HttpStatus { api: String, status: u16 },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    ArrowError(String),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error("Configuration file '{0}' not found")]
    ConfigMissing(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;

impl From<arrow_schema::ArrowError> for EtlError {
    fn from(e: arrow_schema::ArrowError) -> Self {
        EtlError::ArrowError(e.to_string())
    }
}

// 用于从字符串创建错误
impl From<String> for EtlError {
    fn from(s: String) -> Self {
        EtlError::Unknown(s)
    }
}

impl From<&str> for EtlError {
    fn from(s: &str) -> Self {
        EtlError::Unknown(s.to_string())
    }
}
