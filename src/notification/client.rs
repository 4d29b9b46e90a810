//! Icinga API 客户端 - 提交被动检查结果
//!
//! 提交的响应是一个长连接的按行分隔事件流，以 `AsyncBufRead` 形式交给调用方。

use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tokio_util::io::StreamReader;
use tracing::{debug, info};

use super::payload::PassiveCheckResult;
use crate::error::NotifyError;

/// 流式响应体上的行读取器
pub type EventStreamReader = StreamReader<BoxStream<'static, io::Result<Bytes>>, Bytes>;

/// Icinga API 连接配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcingaConfig {
    /// API 地址 (如 https://icinga.example.com:5665)
    pub base_url: String,
    /// 检查结果所属的 host 对象
    pub host: String,
    /// 该 host 上的 service (check) 名称
    pub check: String,
    pub user: String,
    pub password: String,
    /// 跳过 TLS 证书校验
    pub insecure: bool,
    pub connect_timeout_secs: u64,
}

impl Default for IcingaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:5665".to_string(),
            host: String::new(),
            check: "gauge".to_string(),
            user: String::new(),
            password: String::new(),
            insecure: false,
            connect_timeout_secs: 10,
        }
    }
}

impl IcingaConfig {
    /// 当前 service 的 process-check-result 完整 URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/actions/process-check-result?service={}!{}",
            self.base_url.trim_end_matches('/'),
            self.host,
            self.check
        )
    }
}

#[derive(Debug)]
pub struct IcingaClient {
    client: Client,
    config: IcingaConfig,
}

impl IcingaClient {
    pub fn new(config: IcingaConfig) -> Result<Self, NotifyError> {
        // 只限制连接阶段，响应体会一直保持打开
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(NotifyError::Client)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &IcingaConfig {
        &self.config
    }

    /// POST 检查结果，返回流式响应体
    pub async fn submit(&self, check: &PassiveCheckResult) -> Result<EventStreamReader, NotifyError> {
        let url = self.config.endpoint();
        debug!(%url, exit_status = check.exit_status, "Submitting passive check result");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .header(ACCEPT, "application/json")
            .json(check)
            .send()
            .await
            .map_err(NotifyError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        info!(%status, "Check result accepted, reading event stream");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(io::Error::other))
            .boxed();
        Ok(StreamReader::new(body))
    }
}
