//! # jsonstream_blocks
//!
//! Prints the last ten Ethereum blocks as JSON lines.
//!
//! ```sh
//! cargo run --bin jsonstream_blocks
//! ```

use anyhow::Result;
use chainfeed_demos::{connect, init, latest_eth_blocks, print_blocks_json};
use std::io;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    let client = connect().await?;

    let printed = print_blocks_json(&client, latest_eth_blocks(), &mut io::stdout()).await;
    let closed = client.close().await;

    let count = printed?;
    closed?;
    info!(count, "blocks printed");
    Ok(())
}
