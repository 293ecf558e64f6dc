//! Record streams over JSON-lines chunks.

use chainfeed_core::{records::parse_each, ClientError};
use futures::{stream, StreamExt};
use serde::de::DeserializeOwned;

use crate::provider::{ChunkStream, ResponseStream};

/// Flatten a JSON-lines chunk stream into a stream of records.
///
/// Records come out in chunk order, then line order within a chunk. A
/// malformed line yields an error after the records that precede it.
pub fn json_records<T>(chunks: ChunkStream) -> ResponseStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    chunks
        .map(|chunk| {
            let items: Vec<Result<T, ClientError>> = match chunk {
                Ok(data) => parse_each(&data),
                Err(e) => vec![Err(e)],
            };
            stream::iter(items)
        })
        .flatten()
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::Value;

    fn chunks(items: Vec<Result<&'static str, ClientError>>) -> ChunkStream {
        stream::iter(items.into_iter().map(|r| r.map(|s| s.as_bytes().to_vec()))).boxed()
    }

    #[tokio::test]
    async fn records_keep_arrival_order() {
        let stream = chunks(vec![Ok("{\"n\":1}\n{\"n\":2}\n"), Ok("{\"n\":3}")]);
        let values: Vec<Value> = json_records(stream).try_collect().await.unwrap();
        let ns: Vec<i64> = values.iter().map(|v| v["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn malformed_line_ends_the_loop() {
        let stream = chunks(vec![Ok("{\"n\":1}\n"), Ok("{oops}\n"), Ok("{\"n\":3}\n")]);
        let mut records = json_records::<Value>(stream);

        let mut seen = 0;
        let err = loop {
            match records.next().await {
                Some(Ok(_)) => seen += 1,
                Some(Err(e)) => break e,
                None => panic!("stream ended without an error"),
            }
        };
        assert_eq!(seen, 1);
        assert!(matches!(err, ClientError::MalformedRecord { line: 1, .. }));
    }

    #[tokio::test]
    async fn good_lines_precede_the_error_in_one_chunk() {
        let stream = chunks(vec![Ok("{\"n\":1}\n{bad\n{\"n\":3}\n")]);
        let items: Vec<Result<Value, ClientError>> = json_records(stream).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap()["n"], 1);
        assert!(matches!(items[1], Err(ClientError::MalformedRecord { line: 2, .. })));
    }

    #[tokio::test]
    async fn upstream_errors_pass_through() {
        let stream = chunks(vec![Err(ClientError::BackendShutDown)]);
        let result: Result<Vec<Value>, _> = json_records(stream).try_collect().await;
        assert!(matches!(result, Err(ClientError::BackendShutDown)));
    }
}
