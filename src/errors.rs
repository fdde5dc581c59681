use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockalyseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Chart error: {0}")]
    ChartError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, StockalyseError>;

// 用于从字符串创建错误
impl From<String> for StockalyseError {
    fn from(s: String) -> Self {
        StockalyseError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for StockalyseError {
    fn from(s: &str) -> Self {
        StockalyseError::Unknown(s.to_string())
    }
}
