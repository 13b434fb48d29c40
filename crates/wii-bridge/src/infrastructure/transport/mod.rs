//! Outbound transport to the remote listener.
//!
//! # Sub-modules
//!
//! - **`ws_client`** – [`WsConnector`] opens a WebSocket client connection
//!   and hands back a [`WsTransmitter`] that sends each update as one binary
//!   frame.
//!
//! The application layer sees these only through the
//! [`TransportConnector`](crate::application::TransportConnector) and
//! [`UpdateTransmitter`](crate::application::UpdateTransmitter) traits.

use std::io;
use std::time::Duration;

use tokio_tungstenite::tungstenite;

pub mod ws_client;

pub use ws_client::{WsConnector, WsTransmitter};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot reach {address}: {source}")]
    Unreachable {
        address: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("no handshake from {address} within {after:?}")]
    Timeout { address: String, after: Duration },
    #[error("listener did not take the update within {after:?}")]
    SendTimeout { after: Duration },
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("connection closed by peer")]
    Closed,
}

impl TransportError {
    /// Returns `true` when the connection can no longer carry updates.
    pub fn is_connection_lost(&self) -> bool {
        match self {
            TransportError::Closed => true,
            TransportError::WebSocket(e) => matches!(
                e,
                tungstenite::Error::ConnectionClosed
                    | tungstenite::Error::AlreadyClosed
                    | tungstenite::Error::Io(_)
                    | tungstenite::Error::Protocol(
                        tungstenite::error::ProtocolError::ResetWithoutClosingHandshake
                    )
            ),
            // A stalled listener may catch up; each send stays bounded.
            TransportError::SendTimeout { .. } => false,
            TransportError::Unreachable { .. } | TransportError::Timeout { .. } => false,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        TransportError::WebSocket(tungstenite::Error::Io(e))
    }
}
