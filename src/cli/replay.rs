//! replay 命令 - 用分类器回放录制的事件流

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::fs::File;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::monitor::{consume_event_stream, render_summary, EventClassifier, StreamStats};

/// replay 命令参数
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// 每行一个 JSON 事件的文件
    pub file: PathBuf,

    /// 关闭彩色输出
    #[arg(long)]
    pub no_color: bool,
}

pub async fn handle_replay(args: ReplayArgs) -> Result<StreamStats> {
    let file = File::open(&args.file)
        .await
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let color = !args.no_color && std::io::stdout().is_terminal();

    let mut classifier = EventClassifier::new();
    let stats = replay_reader(BufReader::new(file), &mut classifier, color).await;

    info!(
        file = %args.file.display(),
        lines = stats.lines,
        check_results = stats.check_results,
        objects = classifier.object_count(),
        "Replay finished"
    );
    println!(
        "{} events, {} check results, {} objects, {} malformed, {} ignored",
        stats.lines,
        stats.check_results,
        classifier.object_count(),
        stats.malformed,
        stats.ignored
    );

    Ok(stats)
}

/// 分类 `reader` 的全部内容，每次更新打印摘要
pub async fn replay_reader<R>(reader: R, classifier: &mut EventClassifier, color: bool) -> StreamStats
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    consume_event_stream(reader, classifier, &CancellationToken::new(), |summary| {
        println!("{}\n", render_summary(summary, color));
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_replay_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type":"CheckResult","host":"db","check_result":{{"state":0}}}}"#).unwrap();
        writeln!(file, r#"{{"type":"CheckResult","host":"db","check_result":{{"state":1}}}}"#).unwrap();
        writeln!(file, r#"{{"type":"Notification","host":"db"}}"#).unwrap();

        let stats = handle_replay(ReplayArgs {
            file: file.path().to_path_buf(),
            no_color: true,
        })
        .await
        .unwrap();

        assert_eq!(stats.lines, 3);
        assert_eq!(stats.check_results, 2);
        assert_eq!(stats.ignored, 1);
    }

    #[tokio::test]
    async fn test_replay_missing_file() {
        let result = handle_replay(ReplayArgs {
            file: PathBuf::from("/nonexistent/events.ndjson"),
            no_color: true,
        })
        .await;
        assert!(result.is_err());
    }
}
