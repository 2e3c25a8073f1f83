// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Nebulyn grid service binary.
//! Serves the grid save/load/list routes over HTTP. `RUST_LOG` replaces the
//! default `info` filter.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use nebulyn_config_fs::FsStore;
use nebulyn_grid_service::{router, AppState, MemoryStore, API_PREFIX};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Nebulyn grid HTTP service")]
struct Args {
    /// TCP listener (e.g. 0.0.0.0:8788)
    #[arg(long, default_value = "127.0.0.1:8788")]
    listen: SocketAddr,
    /// Directory to keep grids in (one JSON file per grid)
    #[arg(long, conflicts_with = "memory")]
    storage_dir: Option<PathBuf>,
    /// Keep grids in memory only; they are lost on exit
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = match (args.storage_dir, args.memory) {
        (Some(dir), _) => {
            let store = FsStore::at(&dir)
                .with_context(|| format!("open storage dir {}", dir.display()))?;
            info!(dir = %dir.display(), "grid storage on disk");
            AppState::with_store(store)
        }
        (None, true) => {
            info!("grid storage in memory");
            AppState::with_store(MemoryStore::default())
        }
        (None, false) => {
            warn!("no storage configured; saves and loads will fail");
            AppState::unavailable()
        }
    };

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("bind {}", args.listen))?;
    info!(
        "grid service listening on http://{}{API_PREFIX}",
        listener.local_addr()?
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "could not install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
