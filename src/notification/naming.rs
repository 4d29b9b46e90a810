//! 运行命名策略，启动时根据配置选定

use chrono::{DateTime, Local};

/// 时间戳命名使用的格式
pub const RUN_TIME_FORMAT: &str = "%Y-%m-%d %H.%M.%S";

/// suite 运行在被动检查输出中的标签方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunNaming {
    /// 每次运行使用相同的（空）标签，结果互相覆盖
    Stable,
    /// 以运行结束时的本地时间作为标签
    #[default]
    Timestamped,
}

impl RunNaming {
    /// `overwrite_reports=true` 时选择固定命名
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            Self::Stable
        } else {
            Self::Timestamped
        }
    }

    pub fn run_name(&self) -> String {
        self.run_name_at(Local::now())
    }

    pub fn run_name_at(&self, at: DateTime<Local>) -> String {
        match self {
            Self::Stable => String::new(),
            Self::Timestamped => at.format(RUN_TIME_FORMAT).to_string(),
        }
    }
}
