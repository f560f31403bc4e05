//! Bounded response reader.

use futures::{Stream, StreamExt};

/// A response body read up to a byte cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedBody {
    pub bytes: Vec<u8>,
    /// True when the stream still had data once the cap was reached.
    pub truncated: bool,
}

/// Read at most `limit` bytes from a chunked body stream.
///
/// The advertised `Content-Length` is never consulted. Hitting the cap stops
/// reading and is not an error; only a failing chunk is.
pub async fn read_bounded<S, B, E>(mut stream: S, limit: usize) -> Result<BoundedBody, E>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut bytes = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let chunk = chunk.as_ref();
        let remaining = limit - bytes.len();

        if chunk.len() > remaining {
            bytes.extend_from_slice(&chunk[..remaining]);
            return Ok(BoundedBody {
                bytes,
                truncated: true,
            });
        }

        bytes.extend_from_slice(chunk);
        if bytes.len() == limit {
            // Peek past empty chunks so an exact fit is not reported as
            // truncated. Anything past the cap, including a stream error, is
            // discarded.
            let truncated = loop {
                match stream.next().await {
                    Some(Ok(next)) if next.as_ref().is_empty() => continue,
                    Some(Ok(_)) => break true,
                    _ => break false,
                }
            };
            return Ok(BoundedBody { bytes, truncated });
        }
    }

    Ok(BoundedBody {
        bytes,
        truncated: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(parts: &[&str]) -> Vec<Result<Vec<u8>, String>> {
        parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect()
    }

    #[tokio::test]
    async fn test_reads_everything_under_cap() {
        let body = read_bounded(stream::iter(chunks(&["hello ", "world"])), 64)
            .await
            .unwrap();
        assert_eq!(body.bytes, b"hello world");
        assert!(!body.truncated);
    }

    #[tokio::test]
    async fn test_truncates_to_exactly_cap() {
        let body = read_bounded(stream::iter(chunks(&["0123456789", "abcdef"])), 12)
            .await
            .unwrap();
        assert_eq!(body.bytes, b"0123456789ab");
        assert_eq!(body.bytes.len(), 12);
        assert!(body.truncated);
    }

    #[tokio::test]
    async fn test_single_oversized_chunk() {
        let big = "z".repeat(4096);
        let body = read_bounded(stream::iter(chunks(&[&big])), 100).await.unwrap();
        assert_eq!(body.bytes.len(), 100);
        assert!(body.truncated);
    }

    #[tokio::test]
    async fn test_exact_fit_is_not_truncated() {
        let body = read_bounded(stream::iter(chunks(&["abcd", "efgh"])), 8)
            .await
            .unwrap();
        assert_eq!(body.bytes, b"abcdefgh");
        assert!(!body.truncated);
    }

    #[tokio::test]
    async fn test_empty_chunks_after_exact_fit_are_skipped() {
        let body = read_bounded(stream::iter(chunks(&["abcd", "", "MORE"])), 4)
            .await
            .unwrap();
        assert_eq!(body.bytes, b"abcd");
        assert!(body.truncated);

        let body = read_bounded(stream::iter(chunks(&["abcd", "", ""])), 4)
            .await
            .unwrap();
        assert_eq!(body.bytes, b"abcd");
        assert!(!body.truncated);
    }

    #[tokio::test]
    async fn test_error_after_cap_is_not_reported() {
        let items: Vec<Result<Vec<u8>, String>> = vec![
            Ok(b"abcdefgh".to_vec()),
            Err("connection reset".to_string()),
        ];
        let body = read_bounded(stream::iter(items), 4).await.unwrap();
        assert_eq!(body.bytes, b"abcd");
        assert!(body.truncated);
    }

    #[tokio::test]
    async fn test_error_right_after_exact_fit_is_discarded() {
        let items: Vec<Result<Vec<u8>, String>> =
            vec![Ok(b"abcd".to_vec()), Err("connection reset".to_string())];
        let body = read_bounded(stream::iter(items), 4).await.unwrap();
        assert_eq!(body.bytes, b"abcd");
    }

    #[tokio::test]
    async fn test_stream_error_before_cap_is_reported() {
        let items: Vec<Result<Vec<u8>, String>> =
            vec![Ok(b"ab".to_vec()), Err("connection reset".to_string())];
        let err = read_bounded(stream::iter(items), 1024).await.unwrap_err();
        assert_eq!(err, "connection reset");
    }

    #[tokio::test]
    async fn test_zero_cap_reads_nothing() {
        let body = read_bounded(stream::iter(chunks(&["data"])), 0).await.unwrap();
        assert!(body.bytes.is_empty());
        assert!(body.truncated);
    }
}
