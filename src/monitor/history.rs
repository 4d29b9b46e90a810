//! 每个对象的有界状态历史和抖动检测

use std::collections::VecDeque;

/// 每个对象保留的最近状态数
pub const MAX_HISTORY_LEN: usize = 10;

/// 样本数少于此值时不判定为抖动
pub const FLAPPING_MIN_SAMPLES: usize = 5;

/// 单个对象最近 [`MAX_HISTORY_LEN`] 个状态码，按时间先后
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateHistory {
    states: VecDeque<u32>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个状态，超出窗口时淘汰最旧的
    pub fn push(&mut self, state: u32) {
        self.states.push_back(state);
        while self.states.len() > MAX_HISTORY_LEN {
            self.states.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn latest(&self) -> Option<u32> {
        self.states.back().copied()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.states.iter().copied().collect()
    }

    pub fn is_flapping(&self) -> bool {
        is_flapping(&self.to_vec())
    }
}

/// 统计相邻状态不同的次数
pub fn transitions(window: &[u32]) -> usize {
    window.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

/// `window` 的状态变化是否过于频繁。
///
/// 至少需要 [`FLAPPING_MIN_SAMPLES`] 个样本；变化次数超过窗口长度的三分之一即为抖动。
pub fn is_flapping(window: &[u32]) -> bool {
    if window.len() < FLAPPING_MIN_SAMPLES {
        return false;
    }
    transitions(window) > window.len() / 3
}
