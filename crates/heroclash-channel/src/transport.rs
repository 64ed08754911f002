//! Transport seam between the channel client and the socket.
//!
//! The subscribe/decode/teardown logic in [`crate::client`] only ever talks
//! to [`DuelTransport`], so it can be driven by a scripted transport in
//! tests. [`WsTransport`] is the production implementation.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use heroclash_api::credentials::Credentials;
use heroclash_api::errors::{ClientError, ConfigurationError, ConnectionError};
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to WebSocket";

/// Text-frame transport carrying the duel channel.
#[async_trait]
pub trait DuelTransport: Send {
    async fn send_text(&mut self, text: String) -> Result<(), ClientError>;

    /// Next text frame. `None` means the connection ended (server close or
    /// EOF); an `Err` item is a transport failure.
    async fn next_text(&mut self) -> Option<Result<String, ClientError>>;

    /// Graceful shutdown. Closing an already-closed connection is fine.
    async fn close(&mut self) -> Result<(), ClientError>;
}

/// WebSocket transport with the bearer credential presented at handshake.
pub struct WsTransport {
    ws: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsTransport {
    pub async fn connect(url: &str, credentials: &Credentials) -> Result<Self, ClientError> {
        let mut request = url.into_client_request().map_err(|error| {
            ClientError::Connection(ConnectionError::with_cause(
                CONNECT_FAILED_MESSAGE,
                error.to_string(),
            ))
        })?;
        let bearer = format!("Bearer {}", credentials.token)
            .parse::<HeaderValue>()
            .map_err(|error| {
                ClientError::Configuration(ConfigurationError::new(format!(
                    "invalid bearer token header: {error}"
                )))
            })?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let (ws, _response) = connect_async(request).await.map_err(|error| {
            ClientError::Connection(ConnectionError::with_cause(
                CONNECT_FAILED_MESSAGE,
                error.to_string(),
            ))
        })?;
        tracing::debug!(url, "duel channel connected");
        Ok(Self { ws })
    }
}

#[async_trait]
impl DuelTransport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<(), ClientError> {
        self.ws.send(Message::text(text)).await.map_err(|error| {
            ClientError::Connection(ConnectionError::with_cause(
                "Failed to send channel frame",
                error.to_string(),
            ))
        })
    }

    async fn next_text(&mut self) -> Option<Result<String, ClientError>> {
        loop {
            match self.ws.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.to_string())),
                Ok(Message::Close(_)) => return None,
                // Pings are answered by tungstenite itself; binary frames
                // are not part of this protocol.
                Ok(_) => continue,
                Err(error) => {
                    return Some(Err(ClientError::Connection(ConnectionError::with_cause(
                        "Channel connection failed",
                        error.to_string(),
                    ))));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        match self.ws.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(error) => Err(ClientError::Connection(ConnectionError::with_cause(
                "Failed to close channel",
                error.to_string(),
            ))),
        }
    }
}
