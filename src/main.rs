use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use mangashelf::server::AppState;
use mangashelf::store::MemoryStore;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Series snapshot written by the scraper (JSON array of raw records).
    #[arg(long)]
    series_snapshot: PathBuf,

    /// Chapters snapshot written by the scraper. Omit for a series-only
    /// deployment; the chapters routes then serve empty results.
    #[arg(long)]
    chapters_snapshot: Option<PathBuf>,

    /// Logical series table name.
    #[arg(long, default_value = "series")]
    series_table: String,

    /// Logical chapters table name.
    #[arg(long, default_value = "chapters")]
    chapters_table: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    mangashelf::logging::init().context("init logging")?;

    let args = AppArgs::parse();
    tracing::debug!(?args, "parsed args");

    let mut store = MemoryStore::new();
    let count = store
        .load_snapshot(&args.series_table, &args.series_snapshot)
        .context("load series snapshot")?;
    tracing::info!(table = %args.series_table, records = count, "loaded series snapshot");

    store.create_table(&args.chapters_table);
    if let Some(path) = &args.chapters_snapshot {
        let count = store
            .load_snapshot(&args.chapters_table, path)
            .context("load chapters snapshot")?;
        tracing::info!(table = %args.chapters_table, records = count, "loaded chapters snapshot");
    }

    let state = AppState {
        store: Arc::new(store),
        series_table: args.series_table,
        chapters_table: args.chapters_table,
    };

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, mangashelf::server::router(state)).await?;
    Ok(())
}
