//! Per-connection handler: decode RPC frames, dispatch them into the
//! registry, send replies back.
//!
//! A connection carries any number of requests, answered in order. Bad
//! frames and invalid requests are answered with an `Error` payload and
//! the connection stays open.

use std::sync::Arc;

use matchroom_protocol::{Codec, Envelope, Payload, ProtocolError, RpcError};
use matchroom_room::{RoomError, RoomRegistry, SessionCreator};
use matchroom_transport::{Connection, WebSocketConnection};

use crate::server::ServerState;
use crate::MatchroomError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<S, C>>,
) -> Result<(), MatchroomError>
where
    S: SessionCreator,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    loop {
        let data = match tokio::time::timeout(state.idle_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, "connection idle, closing");
                let _ = conn.close().await;
                break;
            }
        };

        let reply = match state.codec.decode::<Envelope>(&data) {
            Ok(request) => Envelope {
                id: request.id,
                payload: dispatch(&state.registry, request.payload).await,
            },
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode envelope");
                Envelope {
                    id: 0,
                    payload: Payload::Error(RpcError::invalid_argument(e.to_string())),
                }
            }
        };

        let bytes = state.codec.encode(&reply)?;
        conn.send(&bytes).await?;
    }

    Ok(())
}

/// Runs one request against the registry and builds its reply payload.
pub(crate) async fn dispatch<S: SessionCreator>(
    registry: &RoomRegistry<S>,
    request: Payload,
) -> Payload {
    if !request.is_request() {
        return not_a_request();
    }

    let result = match request {
        Payload::CreateRoom(req) => registry
            .create_room(&req.participant_id)
            .await
            .map(Payload::CreateRoomReply),
        Payload::RoomInfo(req) => registry
            .room_info(&req.room_id)
            .await
            .map(Payload::RoomInfoReply),
        Payload::JoinRoom(req) => registry
            .join_room(&req.room_id, &req.participant_id)
            .await
            .map(Payload::JoinRoomReply),
        _ => return not_a_request(),
    };

    result.unwrap_or_else(|e| Payload::Error(rpc_error(&e)))
}

fn not_a_request() -> Payload {
    let err = ProtocolError::InvalidMessage("expected CreateRoom, RoomInfo or JoinRoom".into());
    Payload::Error(RpcError::invalid_argument(err.to_string()))
}

fn rpc_error(err: &RoomError) -> RpcError {
    if err.is_invalid_argument() {
        RpcError::invalid_argument(err.to_string())
    } else {
        tracing::error!(error = %err, "registry refused request");
        RpcError::internal(err.to_string())
    }
}
