//! 错误类型
//!
//! 取词、加载与抽取过程中的统一错误

use thiserror::Error;

/// 取词流程中的错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned status {status}")]
    HttpStatus { status: u16 },

    /// 读取本地名言包失败
    #[error("failed to read quote bundle: {0}")]
    Io(String),

    #[error("malformed quote data: {0}")]
    Parse(String),

    #[error("no quotes available for category '{category}'")]
    EmptyPool { category: String },

    /// 请求被新的请求取代，不向用户展示
    #[error("request superseded")]
    Cancelled,
}

impl QuoteError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QuoteError::Cancelled)
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return QuoteError::HttpStatus {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return QuoteError::Parse(err.to_string());
        }
        QuoteError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for QuoteError {
    fn from(err: std::io::Error) -> Self {
        QuoteError::Io(err.to_string())
    }
}
