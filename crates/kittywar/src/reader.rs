//! The read loop: sole owner of the socket's read half.
//!
//! Frames are read one at a time and forwarded in arrival order. Nothing
//! else in the client reads from the connection, so the login reply and
//! every later frame come through this one channel.

use kittywar_protocol::Frame;
use kittywar_transport::{FrameReader, TransportError};
use tokio::io::AsyncRead;
use tokio::sync::mpsc;

/// What the read loop reports.
#[derive(Debug)]
pub(crate) enum Inbound {
    Frame(Frame),
    /// Clean close on a frame boundary.
    Closed,
    /// The loop stopped on an error. Nothing follows.
    Failed(TransportError),
}

/// Reads until the stream ends, a read fails, or the receiver is dropped.
///
/// A frame with a flag or body this client does not understand is
/// skipped; the stream stays aligned because its length was honoured.
pub(crate) async fn read_loop<R>(mut reader: FrameReader<R>, inbound: mpsc::Sender<Inbound>)
where
    R: AsyncRead + Unpin,
{
    loop {
        let next = match reader.read_raw().await {
            Ok(Some(raw)) => match raw.decode() {
                Ok(frame) => {
                    tracing::debug!(%frame, "frame received");
                    Inbound::Frame(frame)
                }
                Err(e) => {
                    tracing::warn!(flag = raw.flag, error = %e, "skipping undecodable frame");
                    continue;
                }
            },
            Ok(None) => Inbound::Closed,
            Err(e) => Inbound::Failed(e),
        };

        let last = !matches!(next, Inbound::Frame(_));
        if inbound.send(next).await.is_err() || last {
            break;
        }
    }
    tracing::debug!("read loop stopped");
}
