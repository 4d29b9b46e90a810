//! 事件流循环 - 把按行分隔的记录交给分类器

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::classifier::{CheckSummary, EventClassifier, LineOutcome};

/// 单行记录的长度上限，与帧长度上限一致
pub const MAX_LINE_LEN: usize = 16 * 1024 * 1024;

/// 事件流循环的结束方式
#[derive(Debug)]
pub enum StreamEnd {
    Eof,
    Cancelled,
    ReadFailed(io::Error),
}

/// 单个事件流的统计，包括没有更新状态的记录
#[derive(Debug)]
pub struct StreamStats {
    pub lines: u64,
    pub check_results: u64,
    pub ignored: u64,
    pub malformed: u64,
    pub unresolved: u64,
    pub end: StreamEnd,
}

impl StreamStats {
    fn new() -> Self {
        Self {
            lines: 0,
            check_results: 0,
            ignored: 0,
            malformed: 0,
            unresolved: 0,
            end: StreamEnd::Eof,
        }
    }
}

/// 读取记录直到 EOF、读错误或 `cancel` 触发。
///
/// 严格按到达顺序处理；每次状态更新都交给 `on_summary`，空行跳过。
/// 超过 [`MAX_LINE_LEN`] 的行记为 malformed 并丢弃。
pub async fn consume_event_stream<R, F>(
    reader: R,
    classifier: &mut EventClassifier,
    cancel: &CancellationToken,
    on_summary: F,
) -> StreamStats
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&CheckSummary),
{
    consume_with_line_limit(reader, classifier, cancel, MAX_LINE_LEN, on_summary).await
}

async fn consume_with_line_limit<R, F>(
    mut reader: R,
    classifier: &mut EventClassifier,
    cancel: &CancellationToken,
    max_line_len: usize,
    mut on_summary: F,
) -> StreamStats
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&CheckSummary),
{
    let mut stats = StreamStats::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(lines = stats.lines, "Event stream cancelled");
                stats.end = StreamEnd::Cancelled;
                return stats;
            }
            read = read_line_capped(&mut reader, &mut buf, max_line_len) => read,
        };

        match read {
            Ok(LineRead::Eof) => {
                info!(lines = stats.lines, "Event stream ended");
                stats.end = StreamEnd::Eof;
                return stats;
            }
            Ok(LineRead::TooLong) => {
                stats.lines += 1;
                stats.malformed += 1;
                warn!(
                    limit = max_line_len,
                    malformed = stats.malformed,
                    "Event record too long, skipped"
                );
                continue;
            }
            Ok(LineRead::Line) => {}
            Err(e) => {
                warn!(error = %e, "Event stream read failed");
                stats.end = StreamEnd::ReadFailed(e);
                return stats;
            }
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                stats.lines += 1;
                stats.malformed += 1;
                warn!(error = %e, malformed = stats.malformed, "Event record is not UTF-8");
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;

        match classifier.classify_line(line) {
            LineOutcome::Updated(summary) => {
                stats.check_results += 1;
                on_summary(&summary);
            }
            LineOutcome::Ignored { kind } => {
                stats.ignored += 1;
                debug!(%kind, "Ignoring event");
            }
            LineOutcome::Malformed { reason } => {
                stats.malformed += 1;
                warn!(%reason, malformed = stats.malformed, "Malformed event record");
            }
            LineOutcome::Unresolved { identity } => {
                stats.unresolved += 1;
                warn!(%identity, "Check result without a structured payload");
            }
        }
    }
}

enum LineRead {
    Line,
    TooLong,
    Eof,
}

// 读到换行或 EOF；超长的行只消费不保存
async fn read_line_capped<R>(reader: &mut R, buf: &mut Vec<u8>, max: usize) -> io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let mut read_any = false;
    let mut overflowed = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(match (read_any, overflowed) {
                (false, _) => LineRead::Eof,
                (true, true) => LineRead::TooLong,
                (true, false) => LineRead::Line,
            });
        }
        read_any = true;

        let (used, done) = match available.iter().position(|&b| b == b'\n') {
            Some(i) => (i + 1, true),
            None => (available.len(), false),
        };
        if !overflowed {
            if buf.len() + used > max {
                overflowed = true;
                buf.clear();
            } else {
                buf.extend_from_slice(&available[..used]);
            }
        }
        reader.consume(used);

        if done {
            return Ok(if overflowed { LineRead::TooLong } else { LineRead::Line });
        }
    }
}
