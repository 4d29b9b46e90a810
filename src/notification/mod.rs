//! 发送给 Icinga 的被动检查结果
//!
//! 一次 Gauge 运行生成 [`PassiveCheckResult`]，由 [`IcingaClient`] 提交，
//! 并返回 Icinga 回应的事件流。

pub mod client;
pub mod naming;
pub mod payload;

pub use client::{EventStreamReader, IcingaClient, IcingaConfig};
pub use naming::{RunNaming, RUN_TIME_FORMAT};
pub use payload::{PassiveCheckResult, EXIT_CRITICAL, EXIT_OK};
