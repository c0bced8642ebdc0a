//! A [`SessionCreator`] that asks a remote session backend over WebSocket.
//!
//! One connection per call: connect, send a `CreateSessionRequest`, read
//! one `CreateSessionReply`, close. Sessions are created at most once per
//! room, so there is nothing to gain from keeping a connection open.

use std::time::Duration;

use matchroom_protocol::{
    Codec, CreateSessionReply, CreateSessionRequest, JsonCodec, ParticipantId,
    SessionId,
};
use matchroom_room::{SessionCreator, SessionError};
use matchroom_transport::{Connection, WebSocketConnection};

/// Client for a session backend reachable at a `ws://` URL.
#[derive(Debug, Clone)]
pub struct WsSessionCreator {
    url: String,
    timeout: Duration,
    codec: JsonCodec,
}

impl WsSessionCreator {
    /// `timeout` bounds the whole round trip, connect included.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            codec: JsonCodec,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn round_trip(
        &self,
        participants: [ParticipantId; 2],
    ) -> Result<SessionId, SessionError> {
        let conn = WebSocketConnection::connect(&self.url)
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        let request = CreateSessionRequest {
            participant_ids: participants,
        };
        let bytes = self
            .codec
            .encode(&request)
            .map_err(|e| SessionError::Rejected(e.to_string()))?;
        conn.send(&bytes)
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        let data = conn
            .recv()
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?
            .ok_or_else(|| {
                SessionError::Unavailable("connection closed before reply".into())
            })?;
        let _ = conn.close().await;

        let reply: CreateSessionReply = self
            .codec
            .decode(&data)
            .map_err(|e| SessionError::Rejected(e.to_string()))?;
        if reply.session_id.is_empty() {
            return Err(SessionError::Rejected("empty session id".into()));
        }
        Ok(reply.session_id)
    }
}

impl SessionCreator for WsSessionCreator {
    async fn create_session(
        &self,
        participants: [ParticipantId; 2],
    ) -> Result<SessionId, SessionError> {
        tracing::debug!(url = %self.url(), owner = %participants[0], "requesting session");
        tokio::time::timeout(self.timeout, self.round_trip(participants))
            .await
            .map_err(|_| SessionError::Timeout)?
    }
}
