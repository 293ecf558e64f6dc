//! `Client` — typed request helpers over a [`Provider`].

use chainfeed_core::{
    ClientError, Format, GetBlocksRequest, GetLogsRequest, Operation, Request, Status,
};
use futures::{future, StreamExt, TryStreamExt};
use tracing::debug;

use crate::{
    provider::{ChunkStream, Provider, ResponseStream},
    records::json_records,
};

/// A client session over one provider.
///
/// Open it with [`ClientBuilder`](crate::ClientBuilder), issue requests,
/// then call [`close`](Client::close) on every exit path.
pub struct Client<P> {
    inner: P,
}

impl<P> Client<P>
where
    P: Provider,
{
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.inner
    }

    /// Issue a request and return its chunk stream, minus empty chunks.
    pub async fn raw_request(
        &self,
        operation: Operation,
        format: Format,
        deltas: bool,
    ) -> Result<ChunkStream, ClientError> {
        let request = Request::new(operation, format, deltas);
        debug!(
            id = %request.id,
            operation = request.operation.name(),
            %format,
            deltas,
            "issuing request"
        );

        let chunks = self.inner.request(request).await?;
        Ok(chunks
            .try_filter(|data| future::ready(!data.is_empty()))
            .boxed())
    }

    pub async fn get_status_by_format(&self, format: Format) -> Result<ChunkStream, ClientError> {
        self.raw_request(Operation::GetStatus, format, false).await
    }

    /// Status records, one per JSON line.
    pub async fn get_status(&self) -> Result<ResponseStream<Status>, ClientError> {
        let chunks = self.get_status_by_format(Format::JsonStream).await?;
        Ok(json_records(chunks))
    }

    pub async fn get_blocks_by_format(
        &self,
        request: GetBlocksRequest,
        format: Format,
        deltas: bool,
    ) -> Result<ChunkStream, ClientError> {
        self.raw_request(Operation::GetBlocks { params: request }, format, deltas)
            .await
    }

    pub async fn get_logs_by_format(
        &self,
        request: GetLogsRequest,
        format: Format,
        deltas: bool,
    ) -> Result<ChunkStream, ClientError> {
        self.raw_request(Operation::GetLogs { params: request }, format, deltas)
            .await
    }

    /// Close the session.
    pub async fn close(self) -> Result<(), ClientError> {
        debug!("closing client");
        self.inner.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProvider;
    use chainfeed_core::{Bound, ChainId};
    use serde_json::json;
    use std::collections::HashSet;

    const STATUS_LINE: &str = r#"{"type":"Toolbox","chain":1,"chain_code":"ETH","chain_name":"Ethereum","entity":"blocks","latest_block_height":19000000,"service":"indexer","status":"ok","timestamp":1700000000}"#;

    #[tokio::test]
    async fn status_records_are_typed() {
        let provider =
            MemoryProvider::new().with_chunk("getStatus", format!("{STATUS_LINE}\n{STATUS_LINE}\n"));
        let client = Client::new(provider);

        let records: Vec<Status> = client.get_status().await.unwrap().try_collect().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chain_code, "ETH");
        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_chunks_are_dropped() {
        let provider = MemoryProvider::new().with_chunks("getStatus", ["", "x", ""]);
        let client = Client::new(provider);

        let chunks: Vec<Vec<u8>> = client
            .get_status_by_format(Format::JsonStream)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks, vec![b"x".to_vec()]);
    }

    #[tokio::test]
    async fn blocks_request_reaches_provider() {
        let provider = MemoryProvider::new().with_chunk("getBlocks", "{}\n");
        let client = Client::new(provider.clone());

        let request = GetBlocksRequest {
            chains: HashSet::from([ChainId::ETH]),
            from_block: Bound::FromLatest(10),
            to_block: Bound::Latest,
        };
        let _ = client
            .get_blocks_by_format(request, Format::Arrow, false)
            .await
            .unwrap();

        let sent = provider.requests();
        assert_eq!(sent.len(), 1);
        let wire = serde_json::to_value(&sent[0]).unwrap();
        assert_eq!(wire["operation"], json!("getBlocks"));
        assert_eq!(wire["chains"], json!("ETH"));
        assert_eq!(wire["from_block"], json!(-10));
        assert_eq!(wire["format"], json!("arrow"));
    }

    #[tokio::test]
    async fn logs_request_carries_filters() {
        let transfer = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
        let usdc = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
        let provider = MemoryProvider::new().with_chunk("getLogs", "{\"log_index\":0}\n\n");
        let client = Client::new(provider.clone());

        let request = GetLogsRequest {
            chains: HashSet::from([ChainId::ETH]),
            from_block: Bound::Exact(21_000_000),
            to_block: Bound::Subscribe,
            address__in: HashSet::from([usdc.to_string()]),
            topic0__in: HashSet::from([transfer.to_string()]),
        };
        let chunks: Vec<Vec<u8>> = client
            .get_logs_by_format(request, Format::JsonStream, true)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks.len(), 1);

        let wire = serde_json::to_value(&provider.requests()[0]).unwrap();
        assert_eq!(wire["operation"], json!("getLogs"));
        assert_eq!(wire["from_block"], json!(21_000_000));
        assert_eq!(wire["to_block"], json!("none"));
        assert_eq!(wire["address__in"], json!(usdc));
        assert_eq!(wire["topic0__in"], json!(transfer));
        assert_eq!(wire["deltas"], json!(true));
    }

    #[tokio::test]
    async fn close_releases_provider() {
        let provider = MemoryProvider::new();
        let client = Client::new(provider.clone());
        client.close().await.unwrap();
        assert!(provider.is_closed());
    }
}
