//! listen 命令 - 作为 Gauge 报告插件运行
//!
//! 连接 Gauge，把每个 suite 结果转成被动检查结果提交给 Icinga，
//! 并汇总 Icinga 返回的事件流。

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::listener::{GaugeListener, ListenerExit};
use crate::monitor::{consume_event_stream, render_summary, EventClassifier};
use crate::notification::{IcingaClient, PassiveCheckResult, RunNaming};
use crate::protocol::SuiteExecutionResult;

/// listen 命令参数
#[derive(Args, Debug, Default)]
pub struct ListenArgs {
    /// Gauge 端口 (覆盖 plugin_connection_port)
    #[arg(long)]
    pub port: Option<u16>,

    /// 只打印检查结果，不提交
    #[arg(long)]
    pub dry_run: bool,

    /// 关闭彩色输出
    #[arg(long)]
    pub no_color: bool,
}

/// suite 结果 handler 所需的状态，多次调用共享
#[derive(Clone)]
pub struct ResultForwarder {
    naming: RunNaming,
    client: Option<Arc<IcingaClient>>,
    classifier: Arc<Mutex<EventClassifier>>,
    cancel: CancellationToken,
    dry_run: bool,
    color: bool,
}

impl ResultForwarder {
    pub fn new(config: &Config, dry_run: bool, color: bool, cancel: CancellationToken) -> Result<Self> {
        let client = match &config.icinga {
            Some(icinga) => Some(Arc::new(
                IcingaClient::new(icinga.clone()).context("Failed to create Icinga client")?,
            )),
            None => None,
        };

        Ok(Self {
            naming: config.naming,
            client,
            classifier: Arc::new(Mutex::new(EventClassifier::new())),
            cancel,
            dry_run,
            color,
        })
    }

    pub fn classifier(&self) -> Arc<Mutex<EventClassifier>> {
        self.classifier.clone()
    }

    /// 构造检查结果；非 dry-run 时提交并消费响应事件流
    pub async fn forward(&self, result: SuiteExecutionResult) -> PassiveCheckResult {
        let check = PassiveCheckResult::from_suite(&result, &self.naming.run_name());
        info!(
            exit_status = check.exit_status,
            output = %check.plugin_output,
            "Suite execution finished"
        );

        let client = match (&self.client, self.dry_run) {
            (Some(client), false) => client,
            (_, true) => {
                match serde_json::to_string_pretty(&check) {
                    Ok(json) => println!("[DRY-RUN] Would submit:\n{}", json),
                    Err(e) => warn!(error = %e, "Failed to serialize check result"),
                }
                return check;
            }
            (None, false) => {
                warn!("No Icinga URL configured, check result not submitted");
                return check;
            }
        };

        let reader = match client.submit(&check).await {
            Ok(reader) => reader,
            Err(e) => {
                error!(
                    error = %e,
                    endpoint = %client.config().endpoint(),
                    "Failed to submit check result"
                );
                return check;
            }
        };

        let color = self.color;
        let mut classifier = self.classifier.lock().await;
        let stats = consume_event_stream(reader, &mut classifier, &self.cancel, |summary| {
            println!("{}\n", render_summary(summary, color));
        })
        .await;
        info!(
            lines = stats.lines,
            check_results = stats.check_results,
            ignored = stats.ignored,
            malformed = stats.malformed,
            unresolved = stats.unresolved,
            end = ?stats.end,
            "Event stream finished"
        );

        check
    }
}

/// 运行插件，直到 Gauge 发送 kill、连接结束或 Ctrl-C。
///
/// 被中断时返回 `None`。
pub async fn handle_listen(args: ListenArgs) -> Result<Option<ListenerExit>> {
    let mut config = Config::from_env().context("Failed to read plugin configuration")?;
    if let Some(port) = args.port {
        config.gauge_port = port;
    }
    if let Some(root) = &config.project_root {
        std::env::set_current_dir(root)
            .with_context(|| format!("Failed to enter project root {}", root.display()))?;
    }

    let cancel = CancellationToken::new();
    let color = !args.no_color && std::io::stdout().is_terminal();
    let forwarder = ResultForwarder::new(&config, args.dry_run, color, cancel.clone())?;

    let mut listener = GaugeListener::connect(&config.gauge_host, config.gauge_port)
        .await
        .with_context(|| {
            format!(
                "Could not create the gauge listener on {}:{}",
                config.gauge_host, config.gauge_port
            )
        })?;
    listener.on_suite_result(move |result| {
        let forwarder = forwarder.clone();
        async move {
            forwarder.forward(result).await;
        }
    });

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
            interrupt.cancel();
        }
    });

    tokio::select! {
        exit = listener.run() => Ok(Some(exit)),
        _ = cancel.cancelled() => Ok(None),
    }
}
