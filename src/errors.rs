use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("GitHub API error: {status}")]
    UpstreamStatus { status: u16 },

    #[error("GitHub GraphQL error: {0}")]
    GraphQlError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SignalError {
    /// 上游账号不存在，边界层应返回 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, SignalError::NotFound(_))
    }

    /// HTTP-style status the boundary layer should answer with
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else {
            500
        }
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;

// 用于从字符串创建错误
impl From<String> for SignalError {
    fn from(s: String) -> Self {
        SignalError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for SignalError {
    fn from(s: &str) -> Self {
        SignalError::Unknown(s.to_string())
    }
}
