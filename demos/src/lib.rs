//! # chainfeed-demos
//!
//! Shared plumbing for the example programs in `src/bin/`.
//!
//! Each program connects, issues one request, writes what it receives to
//! stdout and closes the client. The printing loops live here, generic over
//! the provider and the writer, so `tests/schemas_test.rs` can drive them
//! with scripted chunks and inspect the output.
//!
//! Without `CHAINFEED_URL` the programs replay the sessions recorded under
//! `fixtures/replay/`:
//! ```sh
//! cargo run --bin jsonstream_status
//! CHAINFEED_LOG=debug cargo run --bin arrow_blocks
//! ```

use anyhow::{Context, Result};
use chainfeed_client::{
    config::ENV_URL, json_records, ArrowTable, ChunkStream, Client, ClientBuilder, ClientConfig,
    Provider, ReplayProvider,
};
use chainfeed_core::{Bound, ChainId, Format, GetBlocksRequest};
use chainfeed_observability::{init_tracing, LogConfig};
use futures::TryStreamExt;
use serde_json::Value;
use std::collections::HashSet;
use std::io::Write;
use tracing::{debug, info};

/// Recorded sessions shipped with the examples.
pub const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/replay");

/// Load `.env` (overriding the process environment) and start logging.
pub fn init() -> Result<()> {
    let dotenv = dotenvy::dotenv_override();
    init_tracing(&LogConfig::from_env()).context("initialising logging")?;
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }
    Ok(())
}

/// Client settings from the environment, pointed at the bundled recordings
/// when no endpoint is configured.
pub fn client_config() -> ClientConfig {
    let mut config = ClientConfig::from_env();
    let configured = std::env::var(ENV_URL).is_ok_and(|v| !v.trim().is_empty());
    if !configured {
        config.endpoint = FIXTURES_DIR.to_string();
    }
    config
}

pub async fn connect() -> Result<Client<ReplayProvider>> {
    let config = client_config();
    let endpoint = config.endpoint.clone();
    ClientBuilder::from_config(config)
        .build::<ReplayProvider>()
        .await
        .with_context(|| format!("connecting to {endpoint}"))
}

/// The last ten Ethereum blocks up to the chain head.
pub fn latest_eth_blocks() -> GetBlocksRequest {
    GetBlocksRequest {
        chains: HashSet::from([ChainId::ETH]),
        from_block: Bound::FromLatest(10),
        to_block: Bound::Latest,
    }
}

/// Print every JSON record of a chunk stream on its own line.
async fn print_records(chunks: ChunkStream, out: &mut impl Write) -> Result<usize> {
    let mut records = json_records::<Value>(chunks);
    let mut printed = 0;
    while let Some(record) = records.try_next().await? {
        writeln!(out, "{record}")?;
        printed += 1;
    }
    out.flush()?;
    Ok(printed)
}

/// Request the service status as JSON lines and print each record.
/// Returns the number of records printed.
pub async fn print_status<P: Provider>(client: &Client<P>, out: &mut impl Write) -> Result<usize> {
    let chunks = client.get_status_by_format(Format::JsonStream).await?;
    print_records(chunks, out).await
}

/// Request blocks as JSON lines and print each record.
pub async fn print_blocks_json<P: Provider>(
    client: &Client<P>,
    request: GetBlocksRequest,
    out: &mut impl Write,
) -> Result<usize> {
    let chunks = client
        .get_blocks_by_format(request, Format::JsonStream, false)
        .await?;
    print_records(chunks, out).await
}

/// Request blocks as Arrow chunks, growing one table and printing it after
/// every chunk. Returns the final table.
pub async fn print_blocks_arrow<P: Provider>(
    client: &Client<P>,
    request: GetBlocksRequest,
    out: &mut impl Write,
) -> Result<ArrowTable> {
    let mut chunks = client
        .get_blocks_by_format(request, Format::Arrow, false)
        .await?;

    let mut table = ArrowTable::new();
    while let Some(chunk) = chunks.try_next().await? {
        let added = table.extend_from_chunk(&chunk)?;
        info!(added, total = table.num_rows(), "arrow chunk");
        writeln!(out, "{}", table.pretty()?)?;
    }
    out.flush()?;
    Ok(table)
}
