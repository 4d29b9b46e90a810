//! Icinga 事件流监控
//!
//! 解码检查结果事件，为每个对象保留有界状态历史，标记抖动对象并报告事件速率。

pub mod classifier;
pub mod event;
pub mod history;
pub mod render;
pub mod stream;

pub use classifier::{CheckSummary, EventClassifier, LineOutcome};
pub use event::{
    parse_record, CheckResult, CheckResultEvent, CheckResultField, CheckTarget, StreamRecord,
};
pub use history::{is_flapping, transitions, StateHistory, FLAPPING_MIN_SAMPLES, MAX_HISTORY_LEN};
pub use render::{render_history, render_summary, StateLabel};
pub use stream::{consume_event_stream, StreamEnd, StreamStats};
