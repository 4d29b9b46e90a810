//! Gauge 插件消息定义
//!
//! 手写的 prost 结构，只覆盖本插件用到的 `messages.proto` / `spec.proto` 字段，
//! 未声明的字段解码时跳过。

use prost::Message as _;

use super::varint::encode_varint;

/// 每个消息都带的类型标识
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    ExecutionStarting = 0,
    SpecExecutionStarting = 1,
    SpecExecutionEnding = 2,
    ScenarioExecutionStarting = 3,
    ScenarioExecutionEnding = 4,
    StepExecutionStarting = 5,
    StepExecutionEnding = 6,
    ExecuteStep = 7,
    ExecutionEnding = 8,
    StepValidateRequest = 9,
    StepValidateResponse = 10,
    ExecutionStatusResponse = 11,
    StepNamesRequest = 12,
    StepNamesResponse = 13,
    KillProcessRequest = 14,
    SuiteExecutionResult = 15,
}

/// Gauge 发给报告插件的每一帧的外层消息
#[derive(Clone, PartialEq, prost::Message)]
pub struct Message {
    #[prost(enumeration = "MessageType", tag = "1")]
    pub message_type: i32,
    #[prost(int64, tag = "2")]
    pub message_id: i64,
    #[prost(message, optional, tag = "17")]
    pub suite_execution_result: Option<SuiteExecutionResult>,
    #[prost(message, optional, tag = "18")]
    pub kill_process_request: Option<KillProcessRequest>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SuiteExecutionResult {
    #[prost(message, optional, tag = "1")]
    pub suite_result: Option<ProtoSuiteResult>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KillProcessRequest {}

/// 一次 `gauge run` 的汇总结果
#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoSuiteResult {
    #[prost(bool, tag = "4")]
    pub failed: bool,
    #[prost(int32, tag = "5")]
    pub specs_failed_count: i32,
    /// 毫秒
    #[prost(int64, tag = "6")]
    pub execution_time: i64,
    #[prost(float, tag = "7")]
    pub success_rate: f32,
    #[prost(string, tag = "8")]
    pub environment: String,
    #[prost(string, tag = "9")]
    pub tags: String,
    #[prost(string, tag = "10")]
    pub project_name: String,
    #[prost(string, tag = "11")]
    pub timestamp: String,
    #[prost(int32, tag = "12")]
    pub specs_skipped_count: i32,
}

impl Message {
    pub fn kill() -> Self {
        Self {
            message_type: MessageType::KillProcessRequest as i32,
            kill_process_request: Some(KillProcessRequest {}),
            ..Default::default()
        }
    }

    pub fn suite_result(result: ProtoSuiteResult) -> Self {
        Self {
            message_type: MessageType::SuiteExecutionResult as i32,
            suite_execution_result: Some(SuiteExecutionResult {
                suite_result: Some(result),
            }),
            ..Default::default()
        }
    }

    /// 已知类型，未列出的值返回 `None`
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::try_from(self.message_type).ok()
    }

    /// 编码为一个 `varint(length) payload` 帧
    pub fn to_frame(&self) -> Vec<u8> {
        let payload = self.encode_to_vec();
        let mut out = Vec::with_capacity(payload.len() + 10);
        encode_varint(payload.len() as u64, &mut out);
        out.extend_from_slice(&payload);
        out
    }
}
