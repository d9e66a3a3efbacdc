//! Default websocket gateway session.
//!
//! Frames are JSON objects of the shape `{"t": <event name>, "d": <payload>}`.
//! Frames without a type tag are transport chatter (heartbeat acks and the
//! like) and are skipped.

use super::{Connector, Session};
use crate::error::GatewayError;
use crate::intents::Intents;
use async_trait::async_trait;
use driftwire_model::Envelope;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Deserialize)]
struct Frame {
    #[serde(rename = "t")]
    name: Option<String>,
    #[serde(rename = "d", default)]
    payload: serde_json::Value,
}

/// Opens [`WsSession`]s.
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(
        &self,
        url: &str,
        token: &str,
        intents: Intents,
    ) -> Result<Box<dyn Session>, GatewayError> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| GatewayError::Connect(e.to_string()))?;
        debug!(%url, "websocket established");
        let mut session = WsSession { stream };
        session.identify(token, intents).await?;
        Ok(Box::new(session))
    }
}

/// One live websocket session.
pub struct WsSession {
    stream: WsStream,
}

impl WsSession {
    async fn identify(&mut self, token: &str, intents: Intents) -> Result<(), GatewayError> {
        let frame = serde_json::json!({
            "op": 2,
            "d": { "token": token, "intents": intents.bits() }
        });
        self.stream
            .send(WsMessage::Text(frame.to_string()))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Session for WsSession {
    async fn next_envelope(&mut self) -> Result<Option<Envelope>, GatewayError> {
        loop {
            match self.stream.next().await {
                None => return Ok(None),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(WsMessage::Text(text))) => {
                    let frame: Frame = serde_json::from_str(&text)
                        .map_err(|e| GatewayError::Protocol(e.to_string()))?;
                    match frame.name {
                        Some(name) => return Ok(Some(Envelope::new(name, frame.payload))),
                        None => {
                            trace!("untyped frame skipped");
                            continue;
                        }
                    }
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    self.stream.send(WsMessage::Pong(data)).await?;
                }
                Some(Ok(WsMessage::Close(_))) => return Ok(None),
                Some(Ok(_)) => continue,
            }
        }
    }

    async fn close(&mut self) -> Result<(), GatewayError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
