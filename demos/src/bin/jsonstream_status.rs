//! # jsonstream_status
//!
//! Prints the status of every indexing service, one JSON object per line.
//!
//! ```sh
//! cargo run --bin jsonstream_status
//! ```

use anyhow::Result;
use chainfeed_demos::{connect, init, print_status};
use std::io;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    let client = connect().await?;

    let printed = print_status(&client, &mut io::stdout()).await;
    let closed = client.close().await;

    let count = printed?;
    closed?;
    info!(count, "status records printed");
    Ok(())
}
