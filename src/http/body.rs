//! Response body types
//!
//! Buffered bodies for small generated responses, and a streaming body that
//! reads one byte span of a file on demand.

use crate::error::MediaError;
use crate::http::range::ResolvedRange;
use crate::logger;
use futures_util::{stream, StreamExt};
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::convert::Infallible;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Body type of every response this server produces
pub type ResponseBody = UnsyncBoxBody<Bytes, Infallible>;

/// Buffered body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into()).boxed_unsync()
}

/// Zero-length body
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new().boxed_unsync()
}

/// Open a read cursor over `[range.start(), range.end()]` of `path`
pub async fn open_cursor(path: &Path, range: ResolvedRange) -> std::io::Result<impl AsyncRead> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(range.start())).await?;
    Ok(file.take(range.chunk_size()))
}

/// Stream the bytes of `range` from `path`.
///
/// The file is opened lazily on first poll, after the response head has
/// been committed. An open or read failure is logged and its error payload
/// becomes the final frame; the body then ends, short of `Content-Length`.
pub fn range_stream(path: PathBuf, range: ResolvedRange, buffer_size: usize) -> ResponseBody {
    let display = path.display().to_string();

    let chunks = stream::once(async move { open_cursor(&path, range).await })
        .flat_map(move |opened| match opened {
            Ok(cursor) => ReaderStream::with_capacity(cursor, buffer_size).left_stream(),
            Err(e) => stream::iter([Err(e)]).right_stream(),
        })
        // ReaderStream ends after yielding its first error
        .map(move |chunk| {
            let frame = match chunk {
                Ok(bytes) => Frame::data(bytes),
                Err(e) => {
                    let err = MediaError::stream(&display, e);
                    logger::log_error(&err.to_string());
                    Frame::data(Bytes::from(err.to_payload()))
                }
            };
            Ok::<_, Infallible>(frame)
        });

    StreamBody::new(chunks).boxed_unsync()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn collect(body: ResponseBody) -> Vec<u8> {
        body.collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_range_stream_reads_span() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        file.write_all(&data).unwrap();

        let range = ResolvedRange::new(1234, 5678, 10_000).unwrap();
        // Small buffer to force several frames
        let body = range_stream(file.path().to_path_buf(), range, 512);
        assert_eq!(collect(body).await, &data[1234..=5678]);
    }

    #[tokio::test]
    async fn test_range_stream_missing_file_yields_payload() {
        let dir = tempfile::tempdir().unwrap();
        let range = ResolvedRange::new(0, 9, 10).unwrap();
        let body = range_stream(dir.path().join("gone.mp4"), range, 1024);

        let bytes = collect(body).await;
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["kind"], "stream_failed");
    }

    #[tokio::test]
    async fn test_buffered_bodies() {
        assert_eq!(collect(full("hello")).await, b"hello");
        assert!(collect(empty()).await.is_empty());
    }
}
