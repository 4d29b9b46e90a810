//! 库层的错误类型

use thiserror::Error;

/// varint 前缀解码失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarintError {
    /// 超过 10 字节仍有续位，或超出 64 位
    #[error("varint prefix overflows 64 bits")]
    Overflow,
}

/// 致命的分帧错误，字节流无法重新同步
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("malformed length prefix: {0}")]
    MalformedPrefix(#[from] VarintError),

    #[error("frame of {declared} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { declared: u64, limit: usize },
}

/// 配置解析失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("environment variable '{key}' has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// 被动检查提交失败
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Icinga rejected the check result with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}
