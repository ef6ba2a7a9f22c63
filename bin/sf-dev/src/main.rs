//! Storefront Ingest Development Harness
//!
//! Replays newline-delimited `{"topic": ..., "message": ..., "id": ...}` records through
//! the handler registry, wired to:
//! - In-memory repositories and member store
//! - Use cases that log instead of sending email or writing audit logs
//! - Webhook alerts when configured, log-only alerts otherwise
//! - Optional Prometheus metrics endpoint

mod usecases;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sf_common::MessageContext;
use sf_config::IngestConfig;
use sf_ingest::{
    FailureReporter, HandlerRegistry, InMemoryStores, LogNotifier, Notifier, WebhookNotifier, WebhookNotifierConfig,
};

use crate::usecases::LoggingUseCases;

/// Storefront ingest development harness
#[derive(Parser, Debug)]
#[command(name = "sf-dev")]
#[command(about = "Replay NDJSON broker messages through the storefront ingest routers")]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "SF_CONFIG")]
    config: Option<PathBuf>,

    /// NDJSON input file; reads stdin when omitted
    #[arg(long, env = "SF_INPUT")]
    input: Option<PathBuf>,

    /// Stop at the first message that fails
    #[arg(long, env = "SF_FAIL_FAST", default_value = "false")]
    fail_fast: bool,
}

/// One replayed broker message. A string `message` is sent verbatim, so
/// malformed payloads can be replayed too. Records without an `id` get a
/// generated message id.
#[derive(Debug, Deserialize)]
struct InputLine {
    topic: String,
    message: Value,
    #[serde(default)]
    id: Option<String>,
}

impl InputLine {
    fn context(&self) -> MessageContext {
        match &self.id {
            Some(id) => MessageContext::new(id.clone()),
            None => MessageContext::generated(),
        }
    }

    fn into_raw(self) -> Result<Vec<u8>> {
        match self.message {
            Value::String(raw) => Ok(raw.into_bytes()),
            other => Ok(serde_json::to_vec(&other)?),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = IngestConfig::load(args.config.as_deref())?;

    init_tracing(&config)?;
    info!("Starting storefront ingest dev harness");

    if let Some(addr) = &config.metrics.listen_addr {
        let addr: SocketAddr = addr.parse().with_context(|| format!("invalid metrics address {addr}"))?;
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        info!("Metrics endpoint listening on {}", addr);
    }

    let notifier: Arc<dyn Notifier> = match &config.alert.webhook_url {
        Some(url) => {
            let timeout = Duration::from_secs(config.alert.timeout_secs);
            info!(url = %url, "Alerts go to webhook");
            Arc::new(WebhookNotifier::new(WebhookNotifierConfig::new(url.clone(), timeout))?)
        }
        None => {
            info!("No alert webhook configured, alerts are logged");
            Arc::new(LogNotifier)
        }
    };
    let reporter = Arc::new(FailureReporter::new(notifier));

    let stores = InMemoryStores::new();
    let use_cases = Arc::new(LoggingUseCases);
    let deps = stores.collaborators(use_cases.clone(), use_cases.clone(), use_cases);
    let registry = HandlerRegistry::build(&config.routing, &deps, reporter);

    let input: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let summary = replay(&registry, input, args.fail_fast).await?;
    info!(
        acked = summary.acked,
        failed = summary.failed,
        skipped = summary.skipped,
        accounts = stores.accounts.len(),
        contacts = stores.contacts.len(),
        members = stores.members.len(),
        "Replay finished"
    );

    if summary.failed > 0 {
        anyhow::bail!("{} message(s) failed", summary.failed);
    }
    Ok(())
}

fn init_tracing(config: &IngestConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(
        config
            .log
            .level
            .parse()
            .with_context(|| format!("invalid log level {}", config.log.level))?,
    );

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Summary {
    acked: u64,
    failed: u64,
    skipped: u64,
}

async fn replay(
    registry: &HandlerRegistry,
    input: Box<dyn AsyncRead + Unpin + Send>,
    fail_fast: bool,
) -> Result<Summary> {
    let mut lines = BufReader::new(input).lines();
    let mut summary = Summary::default();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: InputLine = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping unreadable input line");
                summary.skipped += 1;
                continue;
            }
        };

        let topic = record.topic.clone();
        let ctx = record.context();
        let raw = record.into_raw()?;

        match registry.route(&topic, &ctx, &raw).await {
            Ok(()) => summary.acked += 1,
            Err(e) => {
                summary.failed += 1;
                error!(
                    line = line_no,
                    topic = %topic,
                    message_id = %ctx.message_id(),
                    error = %e,
                    "Message not acked"
                );
                if fail_fast {
                    break;
                }
            }
        }
    }

    Ok(summary)
}
