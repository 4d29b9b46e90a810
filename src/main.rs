//! Icinga Passive CLI
//!
//! Gauge 把本程序作为报告插件启动；`replay` 离线回放录制的 Icinga 事件流。

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use icinga_passive::{
    cli::{handle_listen, handle_replay, ListenArgs, ReplayArgs},
    is_execution_action, ListenerExit,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "icinga-passive")]
#[command(about = "Report Gauge suite results to Icinga as passive check results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    listen: ListenArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// 回放录制的事件流 (每行一个 JSON 事件)
    Replay(ReplayArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("icinga_passive=info,icinga-passive=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Replay(args)) => {
            handle_replay(args).await?;
        }
        None => {
            if !is_execution_action(|key| std::env::var(key).ok()) {
                info!("Not an execution action, nothing to do");
                return Ok(());
            }

            match handle_listen(cli.listen).await? {
                Some(ListenerExit::Killed) => {
                    info!("Kill request received, exiting");
                    std::process::exit(0);
                }
                Some(ListenerExit::Closed) => info!("Gauge closed the connection"),
                Some(ListenerExit::ReadFailed(e)) => {
                    warn!(error = %e, "Connection to Gauge lost");
                }
                Some(ListenerExit::FramingFailed(e)) => {
                    bail!("Gauge stream is corrupt: {}", e);
                }
                None => info!("Interrupted"),
            }
        }
    }

    Ok(())
}
