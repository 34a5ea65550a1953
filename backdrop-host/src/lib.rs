//! Headless host for the backdrop engine.
//!
//! Reads notification envelopes as JSON lines, feeds them to the engine and
//! prints the resulting playback commands as JSON lines on stdout. Logs go to
//! stderr so the command stream stays clean.

mod commands;
mod state;

pub use commands::*;
pub use state::*;

use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "backdrop-host", version, about = "Drive weather video backdrops from JSON notifications")]
pub struct Args {
    /// YAML config file (built-in sprite table when omitted)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read envelopes from this file instead of stdin
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

/// Installs the stderr log subscriber. `RUST_LOG` refines the filter.
pub fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        );

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

/// Runs the host until the input ends or Ctrl-C arrives.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let mut state = HostState::from_config_path(args.config.as_deref())
        .context("Failed to load backdrop config")?;
    let mut stdout = tokio::io::stdout();
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Interrupted, shutting down");
    };

    match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            pump(BufReader::new(file), &mut state, &mut stdout, shutdown).await?;
        }
        None => {
            pump(BufReader::new(tokio::io::stdin()), &mut state, &mut stdout, shutdown).await?;
        }
    }

    tracing::info!(
        "Host stopped after {} notifications ({} skipped)",
        state.handled(),
        state.skipped()
    );
    Ok(())
}

/// Feeds every line of `reader` to the engine and writes commands to `out`.
/// Stops at end of input or when `shutdown` completes.
pub async fn pump<R, W, F>(reader: R, state: &mut HostState, out: &mut W, shutdown: F) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    write_commands(out, &state.take_commands()).await?;

    let mut lines = reader.lines();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    tracing::debug!("End of input");
                    break;
                };
                let commands = state.handle_line(&line);
                write_commands(out, &commands).await?;
            }
            _ = &mut shutdown => break,
        }
    }

    Ok(())
}
