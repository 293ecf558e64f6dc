//! # arrow_blocks
//!
//! Streams the last ten Ethereum blocks in Arrow IPC chunks and prints the
//! accumulated table after each one.
//!
//! ```sh
//! cargo run --bin arrow_blocks
//! ```

use anyhow::Result;
use chainfeed_demos::{connect, init, latest_eth_blocks, print_blocks_arrow};
use std::io;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    let client = connect().await?;

    let table = print_blocks_arrow(&client, latest_eth_blocks(), &mut io::stdout()).await;
    let closed = client.close().await;

    let table = table?;
    closed?;
    info!(
        rows = table.num_rows(),
        chunks = table.num_chunks(),
        columns = table.num_columns(),
        "table complete"
    );
    Ok(())
}
