use std::time::Duration;

use kittywar_protocol::{FrameFault, ProtocolError};

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The TCP connect itself failed (refused, unreachable, ...).
    #[error("connect to {addr} failed: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The TCP connect did not complete in time.
    #[error("connect to {addr} timed out after {after:?}")]
    ConnectTimeout { addr: String, after: Duration },

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Nothing arrived within the configured idle window.
    #[error("no data received for {0:?}")]
    IdleTimeout(Duration),

    /// Encoding an outbound frame failed, or an inbound frame was
    /// malformed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl TransportError {
    /// Returns the framing fault, if this error is one.
    pub fn frame_fault(&self) -> Option<FrameFault> {
        match self {
            Self::Protocol(ProtocolError::Frame(fault)) => Some(*fault),
            _ => None,
        }
    }

    /// Returns `true` if a fresh connection attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailed { .. }
                | Self::ConnectTimeout { .. }
                | Self::SendFailed(_)
                | Self::ReceiveFailed(_)
                | Self::IdleTimeout(_)
        ) || self.frame_fault().is_some()
    }
}

impl From<FrameFault> for TransportError {
    fn from(fault: FrameFault) -> Self {
        Self::Protocol(ProtocolError::Frame(fault))
    }
}
