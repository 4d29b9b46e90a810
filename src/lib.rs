//! Icinga Passive - 把 Gauge suite 结果作为被动检查上报给 Icinga
//!
//! 监听 Gauge 插件连接，把每个 suite 结果提交到 Icinga API，
//! 并分类 Icinga 流式返回的检查结果事件。

pub mod cli;
pub mod config;
pub mod error;
pub mod listener;
pub mod monitor;
pub mod notification;
pub mod protocol;

pub use config::{is_execution_action, Config};
pub use error::{ConfigError, FrameError, NotifyError, VarintError};
pub use listener::{dispatch, Dispatch, GaugeListener, ListenerExit, SuiteResultHandler};
pub use monitor::{
    consume_event_stream, parse_record, render_summary, CheckSummary, EventClassifier,
    LineOutcome, StateHistory, StreamEnd, StreamRecord, StreamStats,
};
pub use notification::{IcingaClient, IcingaConfig, PassiveCheckResult, RunNaming};
pub use protocol::{
    decode_varint, encode_varint, FrameAssembler, FrameLimits, Message, MessageType,
    ProtoSuiteResult, SuiteExecutionResult,
};
