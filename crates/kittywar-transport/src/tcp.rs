//! TCP connection setup.

use std::time::Duration;

use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::{FrameReader, FrameWriter, TransportError};

pub type TcpFrameReader = FrameReader<OwnedReadHalf>;
pub type TcpFrameWriter = FrameWriter<OwnedWriteHalf>;

/// Opens a TCP connection to `addr` and splits it into a reader and a
/// writer half.
///
/// The two halves can live on different tasks. The reader is meant to
/// have exactly one owner for the lifetime of the connection.
pub async fn connect(
    addr: &str,
    timeout: Duration,
) -> Result<(TcpFrameReader, TcpFrameWriter), TransportError> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| TransportError::ConnectTimeout {
            addr: addr.to_string(),
            after: timeout,
        })?
        .map_err(|source| TransportError::ConnectFailed {
            addr: addr.to_string(),
            source,
        })?;

    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(error = %e, "could not disable Nagle");
    }
    tracing::debug!(addr, "connected");

    let (read, write) = stream.into_split();
    Ok((FrameReader::new(read), FrameWriter::new(write)))
}
