//! Frame-level reading and writing over any async byte stream.

use std::time::Duration;

use kittywar_protocol::{
    decode_header, encode_frame, encode_request, Frame, FrameFault, RawFrame,
    Request, HEADER_LEN,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::TransportError;

// ---------------------------------------------------------------------------
// FrameReader
// ---------------------------------------------------------------------------

/// Reads server-to-client frames off a byte stream.
///
/// A single `read` on a socket may return fewer bytes than asked for.
/// The reader keeps reading until the header (and then the declared body)
/// is complete, and only reports a fault when the stream actually ends
/// short of the declared length.
pub struct FrameReader<R> {
    inner: R,
    idle_timeout: Option<Duration>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            idle_timeout: None,
        }
    }

    /// Fails a read with [`TransportError::IdleTimeout`] when the peer
    /// stays silent for longer than `timeout`. `None` waits forever.
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Reads the next frame without interpreting its flag.
    ///
    /// Returns `Ok(None)` when the peer closed the stream on a frame
    /// boundary. A close anywhere else is a [`FrameFault`].
    pub async fn read_raw(&mut self) -> Result<Option<RawFrame>, TransportError> {
        let mut header = [0u8; HEADER_LEN];
        let got = self.fill(&mut header).await?;
        if got == 0 {
            return Ok(None);
        }
        let header = decode_header(&header[..got])?;

        let mut body = vec![0u8; header.body_len];
        let got = self.fill(&mut body).await?;
        if got < header.body_len {
            return Err(FrameFault::TruncatedBody {
                declared: header.body_len,
                got,
            }
            .into());
        }

        tracing::trace!(flag = header.flag, len = header.body_len, "frame read");
        Ok(Some(RawFrame {
            flag: header.flag,
            body,
        }))
    }

    /// Reads and decodes the next frame.
    ///
    /// Unlike [`read_raw`](Self::read_raw), an unknown flag is an error
    /// here. Long-running readers should prefer `read_raw` and skip
    /// frames they do not understand.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, TransportError> {
        match self.read_raw().await? {
            Some(raw) => Ok(Some(raw.decode()?)),
            None => Ok(None),
        }
    }

    /// Reads until `buf` is full or the stream ends. Returns the number
    /// of bytes actually read.
    async fn fill(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut filled = 0;
        while filled < buf.len() {
            let read = self.inner.read(&mut buf[filled..]);
            let n = match self.idle_timeout {
                Some(limit) => tokio::time::timeout(limit, read)
                    .await
                    .map_err(|_| TransportError::IdleTimeout(limit))?,
                None => read.await,
            }
            .map_err(TransportError::ReceiveFailed)?;

            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

// ---------------------------------------------------------------------------
// FrameWriter
// ---------------------------------------------------------------------------

/// Writes frames onto a byte stream.
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Encodes and sends a client request.
    pub async fn write_request(&mut self, request: &Request) -> Result<(), TransportError> {
        let bytes = encode_request(request)?;
        self.write_bytes(&bytes).await?;
        tracing::debug!(flag = %request.flag, len = request.body.len(), "request sent");
        Ok(())
    }

    /// Encodes and sends a server-style frame.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<(), TransportError> {
        let bytes = encode_frame(frame)?;
        self.write_bytes(&bytes).await
    }

    /// Writes already-encoded bytes and flushes them.
    pub async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.inner
            .write_all(bytes)
            .await
            .map_err(TransportError::SendFailed)?;
        self.inner.flush().await.map_err(TransportError::SendFailed)
    }

    /// Closes the write direction of the stream.
    pub async fn shutdown(&mut self) -> Result<(), TransportError> {
        self.inner
            .shutdown()
            .await
            .map_err(TransportError::SendFailed)
    }
}

#[cfg(test)]
mod tests {
    use kittywar_protocol::{AuthToken, Body, Flag};
    use tokio::io::duplex;

    use super::*;

    #[tokio::test]
    async fn test_read_raw_clean_close_returns_none() {
        let (client, server) = duplex(64);
        drop(server);
        let mut reader = FrameReader::new(client);
        assert!(reader.read_raw().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_frame_after_write_frame() {
        let (client, server) = duplex(64);
        let mut writer = FrameWriter::new(server);
        let mut reader = FrameReader::new(client);

        writer
            .write_frame(&Frame::new(Flag::GainChances, Body::Ints(vec![2, 5])))
            .await
            .unwrap();

        let frame = reader.read_frame().await.unwrap().unwrap();
        assert_eq!(frame.flag, Flag::GainChances);
        assert_eq!(frame.body, Body::Ints(vec![2, 5]));
    }

    #[tokio::test]
    async fn test_read_raw_truncated_body_is_fault() {
        let (client, mut server) = duplex(512);
        let mut bytes = vec![1u8, 0, 0, 200];
        bytes.extend([7u8; 50]);
        server.write_all(&bytes).await.unwrap();
        drop(server);

        let mut reader = FrameReader::new(client);
        let err = reader.read_raw().await.unwrap_err();
        assert_eq!(
            err.frame_fault(),
            Some(FrameFault::TruncatedBody {
                declared: 200,
                got: 50
            })
        );
    }

    #[tokio::test]
    async fn test_read_raw_truncated_header_is_fault() {
        let (client, mut server) = duplex(64);
        server.write_all(&[98, 0]).await.unwrap();
        drop(server);

        let mut reader = FrameReader::new(client);
        let err = reader.read_raw().await.unwrap_err();
        assert_eq!(
            err.frame_fault(),
            Some(FrameFault::TruncatedHeader { got: 2 })
        );
    }

    #[tokio::test]
    async fn test_read_raw_keeps_unknown_flag_aligned() {
        let (client, mut server) = duplex(64);
        server.write_all(&[77, 0, 0, 2, 9, 9]).await.unwrap();
        server.write_all(&[98, 0, 0, 0]).await.unwrap();

        let mut reader = FrameReader::new(client);
        let unknown = reader.read_raw().await.unwrap().unwrap();
        assert_eq!(unknown.flag, 77);
        assert!(unknown.decode().is_err());

        let next = reader.read_frame().await.unwrap().unwrap();
        assert_eq!(next, Frame::empty(Flag::AdvancePhase));
    }

    #[tokio::test]
    async fn test_read_raw_idle_timeout() {
        let (client, _server) = duplex(64);
        let mut reader =
            FrameReader::new(client).with_idle_timeout(Some(Duration::from_millis(20)));
        let err = reader.read_raw().await.unwrap_err();
        assert!(matches!(err, TransportError::IdleTimeout(_)));
    }

    #[tokio::test]
    async fn test_write_request_produces_decodable_bytes() {
        let (client, mut server) = duplex(128);
        let token = AuthToken::new("tokentokentokentokentoke").unwrap();
        let mut writer = FrameWriter::new(client);
        writer
            .write_request(&Request::with_id(Flag::SelectMove, token.clone(), 2))
            .await
            .unwrap();
        drop(writer);

        let mut bytes = Vec::new();
        server.read_to_end(&mut bytes).await.unwrap();
        let request = kittywar_protocol::decode_request(&bytes).unwrap();
        assert_eq!(request.flag, Flag::SelectMove);
        assert_eq!(request.token, token);
        assert_eq!(request.body, Body::Int(2));
    }
}
