//! 消息分发 - 解码帧 payload 并决定如何处理

use prost::Message as _;

use crate::protocol::{Message, MessageType, SuiteExecutionResult};

/// 单帧对应的处理动作
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Gauge 要求插件退出
    Kill,
    /// 一次运行结束，交给已注册的 handler
    SuiteResult(SuiteExecutionResult),
    /// 能解码，但类型不需要处理
    Ignored(i32),
    /// payload 解码失败
    Malformed(String),
}

/// 把 `payload` 解码为外层消息并分类
pub fn dispatch(payload: &[u8]) -> Dispatch {
    let message = match Message::decode(payload) {
        Ok(message) => message,
        Err(e) => return Dispatch::Malformed(e.to_string()),
    };

    match message.kind() {
        Some(MessageType::KillProcessRequest) => Dispatch::Kill,
        Some(MessageType::SuiteExecutionResult) => Dispatch::SuiteResult(
            message.suite_execution_result.unwrap_or_default(),
        ),
        _ => Dispatch::Ignored(message.message_type),
    }
}
