//! Gauge 插件协议：varint 长度前缀的 protobuf 帧

pub mod frame;
pub mod messages;
pub mod varint;

pub use frame::{FrameAssembler, FrameLimits, DEFAULT_MAX_FRAME_LEN};
pub use messages::{KillProcessRequest, Message, MessageType, ProtoSuiteResult, SuiteExecutionResult};
pub use varint::{decode_varint, encode_varint, encoded_len, MAX_VARINT_LEN};
