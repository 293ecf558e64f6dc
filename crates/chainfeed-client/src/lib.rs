//! # chainfeed-client
//!
//! Async client for the ChainFeed streaming service.
//!
//! A request returns a lazy, forward-only stream of chunks. Each chunk is
//! either a complete Arrow IPC stream or a block of JSON lines, depending on
//! the requested [`Format`](chainfeed_core::Format).
//!
//! ## Architecture
//! ```text
//! ClientBuilder ──build::<P>()──► Client<P>
//!                                    │ get_status / get_blocks_by_format / ...
//!                                    ▼
//!                          Provider::request(Request)
//!                                    │
//!                                    ▼
//!                           ChunkStream (Vec<u8>)
//!                     ┌──────────────┴──────────────┐
//!                     ▼                             ▼
//!        json_records::<T>() (JSON lines)   ArrowTable::extend_from_chunk
//! ```
//!
//! The network transport is not part of this crate: it is supplied by a
//! [`Provider`] implementation. Two are bundled: [`MemoryProvider`] serves
//! scripted chunks and [`ReplayProvider`] serves recorded sessions from disk.

pub mod builder;
pub mod client;
pub mod config;
pub mod memory;
pub mod provider;
pub mod records;
pub mod replay;
pub mod table;

pub use builder::ClientBuilder;
pub use client::Client;
pub use config::ClientConfig;
pub use memory::MemoryProvider;
pub use provider::{ChunkStream, Provider, ResponseStream};
pub use records::json_records;
pub use replay::ReplayProvider;
pub use table::{accumulate, decode_chunk, ArrowTable, TableError};
