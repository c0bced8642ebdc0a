//! Core protocol types for Matchroom's wire format.
//!
//! Every type here is serialized by a [`Codec`](crate::Codec) and sent
//! over a transport. Requests flow client → service, replies flow back,
//! and both travel inside an [`Envelope`] that carries a correlation id.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Declares an opaque string identifier.
///
/// All three identifiers share the same shape: a transparent `String`
/// newtype that serializes as a plain JSON string, so `RoomId("abc")` is
/// `"abc"` on the wire. They are distinct types so a room id can never be
/// passed where a participant id is expected.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the identifier is the empty string.
            /// Empty identifiers are never valid in a request.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// An external identity (user id) that may own or join a room.
    ParticipantId
}

string_id! {
    /// A unique identifier for a room, assigned at creation.
    RoomId
}

string_id! {
    /// Identifier of the paired session (e.g. a game instance) created
    /// once two participants are matched.
    SessionId
}

// ---------------------------------------------------------------------------
// ResponseStatus
// ---------------------------------------------------------------------------

/// Business outcome of an RPC.
///
/// Expected outcomes such as a full room are never errors; they are a
/// status on an otherwise successful reply. `InvalidArgument` and
/// `Internal` only appear inside [`RpcError`].
///
/// Serialized as `"SUCCESS"`, `"ALREADY_IN_ROOM"`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    AlreadyInRoom,
    RoomNotFound,
    RoomFull,
    InvalidArgument,
    Internal,
}

impl ResponseStatus {
    /// Returns `true` for [`ResponseStatus::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "SUCCESS",
            Self::AlreadyInRoom => "ALREADY_IN_ROOM",
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::RoomFull => "ROOM_FULL",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Internal => "INTERNAL",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------
//
// Request fields default to the empty string when missing so that a
// request like `{}` decodes and is then rejected by validation, with the
// name of the missing field, instead of failing as a decode error.

/// Client → Service: create a room owned by `participant_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub participant_id: ParticipantId,
}

/// Client → Service: look up a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfoRequest {
    #[serde(default)]
    pub room_id: RoomId,
}

/// Client → Service: join `room_id` as `participant_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub room_id: RoomId,
    #[serde(default)]
    pub participant_id: ParticipantId,
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// Service → Client: result of a create.
///
/// `room_id` is present only when `status` is `SUCCESS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomReply {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
}

impl CreateRoomReply {
    pub fn success(room_id: RoomId) -> Self {
        Self {
            status: ResponseStatus::Success,
            room_id: Some(room_id),
        }
    }

    pub fn with_status(status: ResponseStatus) -> Self {
        Self {
            status,
            room_id: None,
        }
    }
}

/// Public view of a room as seen by [`RoomInfoReply`].
///
/// A point-in-time copy: the room may be joined right after the reply is
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,
    #[serde(default)]
    pub owner: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_participant: Option<ParticipantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

/// Service → Client: result of a room lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfoReply {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomView>,
}

impl RoomInfoReply {
    pub fn success(room: RoomView) -> Self {
        Self {
            status: ResponseStatus::Success,
            room: Some(room),
        }
    }

    pub fn with_status(status: ResponseStatus) -> Self {
        Self { status, room: None }
    }
}

/// Service → Client: result of a join.
///
/// A `SUCCESS` reply without `session_id` means the participants were
/// paired but the session backend did not produce a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomReply {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl JoinRoomReply {
    pub fn success(session_id: Option<SessionId>) -> Self {
        Self {
            status: ResponseStatus::Success,
            session_id,
        }
    }

    pub fn with_status(status: ResponseStatus) -> Self {
        Self {
            status,
            session_id: None,
        }
    }
}

/// Service → Client: the request could not be served at all.
///
/// Used for malformed requests (missing fields, undecodable frames), as
/// opposed to business outcomes which travel as a reply status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub status: ResponseStatus,
    pub message: String,
}

impl RpcError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::InvalidArgument,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Internal,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session backend messages
// ---------------------------------------------------------------------------

/// Service → Session backend: create a session for two matched
/// participants, owner first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub participant_ids: [ParticipantId; 2],
}

/// Session backend → Service: the created session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionReply {
    pub session_id: SessionId,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The content of an RPC frame.
///
/// Adjacently tagged:
///   `{ "type": "JoinRoom", "data": { "room_id": "r1", "participant_id": "bob" } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    CreateRoom(CreateRoomRequest),
    RoomInfo(RoomInfoRequest),
    JoinRoom(JoinRoomRequest),

    CreateRoomReply(CreateRoomReply),
    RoomInfoReply(RoomInfoReply),
    JoinRoomReply(JoinRoomReply),

    Error(RpcError),
}

impl Payload {
    /// Returns `true` for the three request variants.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Self::CreateRoom(_) | Self::RoomInfo(_) | Self::JoinRoom(_)
        )
    }
}

/// The top-level RPC frame.
///
/// `id` is chosen by the client and echoed on the reply so a client can
/// pipeline several requests on one connection. Frames the service cannot
/// decode are answered with id `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: u64,
    pub payload: Payload,
}

// =========================================================================
// Tests
// =========================================================================
