//! 检查摘要的文本渲染

use crossterm::style::{StyledContent, Stylize};

use super::classifier::CheckSummary;
use super::event::CheckTarget;

/// host 状态码大于等于此值时显示为 DOWN
pub const HOST_DOWN_THRESHOLD: u32 = 2;

/// 状态码对应的 Icinga 状态名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateLabel {
    Up,
    Down,
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl StateLabel {
    pub fn for_code(target: CheckTarget, code: u32) -> Self {
        match target {
            CheckTarget::Host if code < HOST_DOWN_THRESHOLD => Self::Up,
            CheckTarget::Host => Self::Down,
            CheckTarget::Service => match code {
                0 => Self::Ok,
                1 => Self::Warning,
                2 => Self::Critical,
                _ => Self::Unknown,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    fn styled(self) -> StyledContent<&'static str> {
        let text = self.as_str();
        match self {
            Self::Up | Self::Ok => text.green(),
            Self::Warning => text.yellow(),
            Self::Down | Self::Critical => text.red(),
            Self::Unknown => text.magenta(),
        }
    }
}

/// 按时间先后渲染状态码，空格分隔
pub fn render_history(target: CheckTarget, states: &[u32], color: bool) -> String {
    states
        .iter()
        .map(|&code| {
            let label = StateLabel::for_code(target, code);
            if color {
                label.styled().to_string()
            } else {
                label.as_str().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 每条检查结果处理后打印的多行摘要
pub fn render_summary(summary: &CheckSummary, color: bool) -> String {
    let mut lines = Vec::with_capacity(5);

    let title = if color {
        summary.identity.clone().bold().to_string()
    } else {
        summary.identity.clone()
    };
    lines.push(title);
    lines.push(format!(
        "  history: {}",
        render_history(summary.target, &summary.history, color)
    ));
    lines.push(format!("  output:  {}", summary.output.trim_end()));

    if summary.flapping {
        let banner = "  FLAPPING: state changed too often in the last checks";
        lines.push(if color {
            banner.yellow().bold().to_string()
        } else {
            banner.to_string()
        });
    }

    lines.push(format!(
        "  rate:    {:.2} events/s (all objects {:.2} events/s)",
        summary.object_rate, summary.global_rate
    ));

    lines.join("\n")
}
