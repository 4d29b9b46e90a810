//! 检查结果分类器 - 按对象统计计数、状态历史、抖动检测和事件速率

use std::collections::HashMap;
use std::time::Instant;

use super::event::{parse_record, CheckResultEvent, CheckTarget, StreamRecord};
use super::history::StateHistory;

/// 每条检查结果处理后的快照
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub identity: String,
    pub target: CheckTarget,
    /// 按时间先后排列
    pub history: Vec<u32>,
    pub output: String,
    pub flapping: bool,
    /// 该对象累计事件数
    pub event_count: u64,
    /// 该对象自分类器启动以来的每秒事件数
    pub object_rate: f64,
    /// 所有对象合计的每秒事件数
    pub global_rate: f64,
}

/// 单行输入的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Updated(CheckSummary),
    /// 合法记录，但类型不携带检查状态
    Ignored { kind: String },
    Malformed { reason: String },
    /// check_result 不是结构化对象，状态保持不变
    Unresolved { identity: String },
}

/// 持有一个事件流的全部对象聚合状态
#[derive(Debug, Clone)]
pub struct EventClassifier {
    started: Instant,
    total: u64,
    counts: HashMap<String, u64>,
    histories: HashMap<String, StateHistory>,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EventClassifier {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// 速率时钟从 `started` 开始计时（测试用）
    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            total: 0,
            counts: HashMap::new(),
            histories: HashMap::new(),
        }
    }

    /// 解析并应用事件流中的一行
    pub fn classify_line(&mut self, line: &str) -> LineOutcome {
        self.classify_line_at(line, Instant::now())
    }

    pub fn classify_line_at(&mut self, line: &str, now: Instant) -> LineOutcome {
        match parse_record(line) {
            StreamRecord::CheckResult(event) => match self.observe_at(&event, now) {
                Some(summary) => LineOutcome::Updated(summary),
                None => LineOutcome::Unresolved {
                    identity: event.identity(),
                },
            },
            StreamRecord::Other { kind } => LineOutcome::Ignored { kind },
            StreamRecord::Malformed { reason } => LineOutcome::Malformed { reason },
        }
    }

    /// 应用一条检查结果。记录中没有结构化结果时返回 `None`，
    /// 计数器和历史都不变。
    pub fn observe_at(&mut self, event: &CheckResultEvent, now: Instant) -> Option<CheckSummary> {
        let result = event.structured()?;
        let identity = event.identity();
        let elapsed = self.elapsed_secs(now);

        self.total += 1;
        let count = self.counts.entry(identity.clone()).or_insert(0);
        *count += 1;
        let event_count = *count;

        let history = self.histories.entry(identity.clone()).or_default();
        history.push(result.state);

        Some(CheckSummary {
            identity,
            target: event.target(),
            history: history.to_vec(),
            output: result.output.clone(),
            flapping: history.is_flapping(),
            event_count,
            object_rate: rate(event_count, elapsed),
            global_rate: rate(self.total, elapsed),
        })
    }

    pub fn total_events(&self) -> u64 {
        self.total
    }

    pub fn event_count(&self, identity: &str) -> u64 {
        self.counts.get(identity).copied().unwrap_or(0)
    }

    pub fn history(&self, identity: &str) -> Option<&StateHistory> {
        self.histories.get(identity)
    }

    pub fn is_flapping(&self, identity: &str) -> bool {
        self.histories
            .get(identity)
            .map(StateHistory::is_flapping)
            .unwrap_or(false)
    }

    /// 已出现的不同对象数
    pub fn object_count(&self) -> usize {
        self.histories.len()
    }

    // 整秒，至少为 1
    fn elapsed_secs(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started).as_secs().max(1)
    }
}

fn rate(count: u64, elapsed_secs: u64) -> f64 {
    count as f64 / elapsed_secs as f64
}
