//! Gauge 监听器 - 持有插件连接并驱动读取循环

use std::future::Future;
use std::io;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use super::dispatcher::{dispatch, Dispatch};
use crate::error::FrameError;
use crate::protocol::{FrameAssembler, FrameLimits, SuiteExecutionResult};

const READ_CHUNK_SIZE: usize = 8192;

/// suite 运行结束的单槽回调
pub type SuiteResultHandler = Box<dyn FnMut(SuiteExecutionResult) -> BoxFuture<'static, ()> + Send>;

/// 读取循环结束的原因
#[derive(Debug)]
pub enum ListenerExit {
    /// 收到 kill 请求，连接已关闭
    Killed,
    /// 对端关闭连接
    Closed,
    ReadFailed(io::Error),
    /// 字节流无法再切分为帧
    FramingFailed(FrameError),
}

/// 从单个连接读取 varint 分帧的 Gauge 消息
pub struct GaugeListener<S> {
    stream: S,
    assembler: FrameAssembler,
    handler: Option<SuiteResultHandler>,
}

impl GaugeListener<TcpStream> {
    /// 连接 Gauge 为插件打开的端口
    pub async fn connect(host: &str, port: u16) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        info!(host, port, "Connected to Gauge");
        Ok(Self::new(stream))
    }
}

impl<S> GaugeListener<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            assembler: FrameAssembler::new(),
            handler: None,
        }
    }

    pub fn with_frame_limits(mut self, limits: FrameLimits) -> Self {
        self.assembler = FrameAssembler::with_limits(limits);
        self
    }

    /// 注册 suite 结果 handler，替换之前注册的
    pub fn on_suite_result<F, Fut>(&mut self, mut handler: F)
    where
        F: FnMut(SuiteExecutionResult) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.handler = Some(Box::new(move |result| handler(result).boxed()));
    }

    /// 读取直到对端关闭、读取失败或 Gauge 要求退出。
    ///
    /// 每帧处理完才进行下一次读取，handler 在循环内 await。
    pub async fn run(mut self) -> ListenerExit {
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];

        loop {
            let n = match self.stream.read(&mut chunk).await {
                Ok(0) => {
                    info!("Gauge closed the connection");
                    return ListenerExit::Closed;
                }
                Ok(n) => n,
                Err(e) => {
                    warn!(error = %e, "Read from Gauge failed");
                    return ListenerExit::ReadFailed(e);
                }
            };
            self.assembler.feed(&chunk[..n]);

            if let Some(exit) = self.process_frames().await {
                return exit;
            }
        }
    }

    async fn process_frames(&mut self) -> Option<ListenerExit> {
        loop {
            let payload = match self.assembler.extract_next() {
                Ok(Some(payload)) => payload,
                Ok(None) => return None,
                Err(e) => {
                    warn!(error = %e, "Unrecoverable framing error");
                    return Some(ListenerExit::FramingFailed(e));
                }
            };

            match dispatch(&payload) {
                Dispatch::Kill => {
                    info!(
                        discarded_bytes = self.assembler.buffered_len(),
                        "Kill request received, closing connection"
                    );
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(error = %e, "Shutdown after kill request failed");
                    }
                    return Some(ListenerExit::Killed);
                }
                Dispatch::SuiteResult(result) => match self.handler.as_mut() {
                    Some(handler) => handler(result).await,
                    None => warn!("Suite result received but no handler is registered"),
                },
                Dispatch::Ignored(message_type) => {
                    debug!(message_type, "Ignoring message");
                }
                Dispatch::Malformed(reason) => {
                    warn!(len = payload.len(), %reason, "Failed to read proto message, skipping frame");
                }
            }
        }
    }
}
