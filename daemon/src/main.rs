//! trustmesh relay: reads one JSON document per line, routes each through
//! the gossip router, and prints the resulting envelopes as JSON lines.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use trustmesh_router::Router;
use trustmesh_utils::{init_logging, LogFormat};

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "trustmesh-relay", about = "trustmesh gossip relay")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "TRUSTMESH_CONFIG")]
    config: Option<PathBuf>,

    /// Newline-delimited JSON input; standard input when omitted.
    #[arg(long, env = "TRUSTMESH_INPUT")]
    input: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TRUSTMESH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TRUSTMESH_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Local node public key.
    #[arg(long, env = "TRUSTMESH_PUBKEY")]
    pubkey: Option<String>,

    /// Start with routing disabled: documents are consumed and dropped.
    #[arg(long)]
    inactive: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

fn effective_config(cli: &Cli) -> anyhow::Result<DaemonConfig> {
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(pubkey) = &cli.pubkey {
        config.pubkey = pubkey.clone();
    }
    if cli.inactive {
        config.router.active = false;
    }
    Ok(config)
}

/// Feed parsed lines into the router until the input ends.
async fn pump<R: AsyncRead + Unpin>(reader: R, tx: mpsc::Sender<Value>) -> anyhow::Result<usize> {
    let mut lines = BufReader::new(reader).lines();
    let mut line_no = 0usize;
    let mut accepted = 0usize;
    while let Some(line) = lines.next_line().await.context("reading input")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(doc) => {
                if tx.send(doc).await.is_err() {
                    break;
                }
                accepted += 1;
            }
            Err(e) => tracing::warn!(line = line_no, error = %e, "skipping invalid JSON line"),
        }
    }
    Ok(accepted)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    init_logging(config.log_format, &config.log_level);

    if config.pubkey.is_empty() {
        tracing::warn!("no local pubkey configured; every document is treated as relayed");
    }
    for key in config.malformed_keys() {
        tracing::warn!(pubkey = key, "configured key is not a base58 public key");
    }
    tracing::info!(
        peers = config.peers.len(),
        mirrors = config.mirror_endpoints.len(),
        active = config.router.active,
        "starting trustmesh relay"
    );

    let directory = Arc::new(config.seed_directory().await);
    tracing::debug!(known = directory.len().await, "peer directory seeded");
    let peering = Arc::new(config.peering());
    let router = Router::new(directory, peering, config.router.clone());
    let handle = router.handle();

    let (tx, rx) = mpsc::channel(config.router.channel_capacity.max(1));
    let (mut envelopes, task) = router.spawn(rx);

    let reader = tokio::spawn(async move {
        match cli.input {
            Some(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("opening input {}", path.display()))?;
                pump(file, tx).await
            }
            None => pump(tokio::io::stdin(), tx).await,
        }
    });

    let mut stdout = tokio::io::stdout();
    while let Some(envelope) = envelopes.recv().await {
        let mut line = serde_json::to_string(&envelope)?;
        line.push('\n');
        stdout.write_all(line.as_bytes()).await?;
    }
    stdout.flush().await?;

    let accepted = reader.await??;
    task.await?;

    tracing::info!(documents = accepted, stats = ?handle.stats().snapshot(), "trustmesh relay exited cleanly");
    Ok(())
}
