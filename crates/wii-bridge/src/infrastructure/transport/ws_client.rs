//! WebSocket client transport.
//!
//! The bridge only ever writes to the listener.  Inbound frames are read and
//! dropped during [`pump`](UpdateTransmitter::pump) so that pings get answered
//! and a close from the peer is noticed.
//!
//! Writes are bounded by a send timeout, so a listener that stops reading
//! slows the bridge down instead of stalling it.
//!
//! Only `ws://` endpoints are supported; no TLS backend is compiled in.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{FutureExt, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, trace};

use super::TransportError;
use crate::application::{TransportConnector, UpdateTransmitter};

/// Opens WebSocket connections, bounding the handshake by a timeout.
#[derive(Debug, Clone)]
pub struct WsConnector {
    connect_timeout: Duration,
    send_timeout: Duration,
}

impl WsConnector {
    /// `send_timeout` bounds every write on the connections this opens.
    pub fn new(connect_timeout: Duration, send_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            send_timeout,
        }
    }
}

#[async_trait]
impl TransportConnector for WsConnector {
    type Transmitter = WsTransmitter;

    async fn open(&self, address: &str) -> Result<WsTransmitter, TransportError> {
        debug!("opening websocket to {address}");
        let handshake = tokio::time::timeout(self.connect_timeout, connect_async(address)).await;
        let (stream, response) = match handshake {
            Ok(Ok(connected)) => connected,
            Ok(Err(source)) => {
                return Err(TransportError::Unreachable {
                    address: address.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(TransportError::Timeout {
                    address: address.to_string(),
                    after: self.connect_timeout,
                })
            }
        };
        info!("websocket open to {address} (HTTP {})", response.status());
        Ok(WsTransmitter {
            stream,
            send_timeout: self.send_timeout,
        })
    }
}

/// An open WebSocket connection carrying encoded updates.
pub struct WsTransmitter {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    send_timeout: Duration,
}

/// Runs one socket write, giving up after `limit`.
async fn bounded(
    limit: Duration,
    write: impl Future<Output = Result<(), tungstenite::Error>>,
) -> Result<(), TransportError> {
    match tokio::time::timeout(limit, write).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(TransportError::SendTimeout { after: limit }),
    }
}

#[async_trait]
impl UpdateTransmitter for WsTransmitter {
    async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), TransportError> {
        trace!("queueing {} byte frame", bytes.len());
        // Feeding waits for room when earlier frames are still unflushed.
        bounded(self.send_timeout, self.stream.feed(WsMessage::binary(bytes))).await
    }

    async fn pump(&mut self) -> Result<(), TransportError> {
        // Drain whatever has already arrived without waiting for more.
        while let Some(next) = self.stream.next().now_or_never() {
            match next {
                None | Some(Ok(WsMessage::Close(_))) => return Err(TransportError::Closed),
                Some(Ok(frame)) => trace!("ignoring inbound frame ({} bytes)", frame.len()),
                Some(Err(e)) => return Err(e.into()),
            }
        }
        bounded(self.send_timeout, self.stream.flush()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    async fn local_listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("ws://{}", listener.local_addr().unwrap());
        (listener, address)
    }

    #[tokio::test]
    async fn test_sent_bytes_arrive_as_one_binary_frame() {
        // Arrange
        let (listener, address) = local_listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(socket).await.unwrap();
            ws.next().await.unwrap().unwrap()
        });
        let connector = WsConnector::new(Duration::from_secs(5), Duration::from_secs(1));

        // Act
        let mut tx = connector.open(&address).await.unwrap();
        tx.send_binary(vec![0x0A, 0x02, 0x08, 0x01]).await.unwrap();
        tx.pump().await.unwrap();

        // Assert
        let frame = server.await.unwrap();
        assert_eq!(frame, WsMessage::Binary(vec![0x0A, 0x02, 0x08, 0x01]));
    }

    #[tokio::test]
    async fn test_open_fails_when_nothing_listens() {
        // Bind then drop to get a port that refuses connections.
        let (listener, address) = local_listener().await;
        drop(listener);
        let connector = WsConnector::new(Duration::from_secs(5), Duration::from_secs(1));

        let result = connector.open(&address).await;

        assert!(matches!(result, Err(TransportError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn test_open_rejects_non_websocket_address() {
        let connector = WsConnector::new(Duration::from_secs(5), Duration::from_secs(1));

        let result = connector.open("not a url").await;

        assert!(matches!(result, Err(TransportError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn test_pump_reports_peer_close() {
        // Arrange
        let (listener, address) = local_listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(socket).await.unwrap();
            ws.close(None).await.unwrap();
            // Keep the socket alive until the client has seen the close.
            let _ = ws.next().await;
        });
        let connector = WsConnector::new(Duration::from_secs(5), Duration::from_secs(1));
        let mut tx = connector.open(&address).await.unwrap();

        // Act
        let mut outcome = Ok(());
        for _ in 0..100 {
            outcome = tx.pump().await;
            if outcome.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        // Assert
        let err = outcome.unwrap_err();
        assert!(err.is_connection_lost(), "unexpected error: {err}");
        drop(tx);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_listener_that_stops_reading_cannot_stall_sends() {
        // Arrange: complete the handshake, then never read again
        let (listener, address) = local_listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let _ws = accept_async(socket).await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        let send_timeout = Duration::from_millis(200);
        let connector = WsConnector::new(Duration::from_secs(5), send_timeout);
        let mut tx = connector.open(&address).await.unwrap();

        // Act: keep writing large frames until the socket buffers are full
        let started = tokio::time::Instant::now();
        let mut failure = None;
        for _ in 0..1024 {
            let step = async {
                tx.send_binary(vec![0u8; 256 * 1024]).await?;
                tx.pump().await
            };
            let step_started = tokio::time::Instant::now();
            let result = step.await;
            assert!(
                step_started.elapsed() < send_timeout * 4,
                "one send took {:?}",
                step_started.elapsed()
            );
            if let Err(e) = result {
                failure = Some(e);
                break;
            }
        }

        // Assert
        let err = failure.expect("buffers never filled");
        assert!(matches!(err, TransportError::SendTimeout { after } if after == send_timeout));
        assert!(started.elapsed() < Duration::from_secs(30));
        server.abort();
    }
}
