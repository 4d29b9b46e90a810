//! Gauge 侧：一个连接、一个读取循环、一个结果 handler

mod connection;
mod dispatcher;

pub use connection::{GaugeListener, ListenerExit, SuiteResultHandler};
pub use dispatcher::{dispatch, Dispatch};
