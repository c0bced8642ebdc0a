//! Error types for the room layer.
//!
//! Business outcomes (room full, room not found, already in a room) are
//! not errors; they are a [`ResponseStatus`](matchroom_protocol::ResponseStatus)
//! on the reply. [`RoomError`] only covers requests the registry refuses
//! to serve at all.

use matchroom_protocol::RoomId;

/// Hard failures of a registry operation.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A required request field was empty.
    #[error("missing {0}")]
    MissingField(&'static str),

    /// The identifier generator produced an id that is already in use.
    /// No room is overwritten.
    #[error("generated room id {0} is already in use")]
    DuplicateRoomId(RoomId),

    /// The identifier generator produced an empty id.
    #[error("generated room id is empty")]
    InvalidGeneratedId,
}

impl RoomError {
    /// Returns `true` when the error was caused by the request itself
    /// rather than by the registry's collaborators.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}

/// Failures reported by a [`SessionCreator`](crate::SessionCreator).
///
/// The registry logs these and otherwise ignores them: a join that has
/// paired two participants stands even when no session was created.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session backend could not be reached.
    #[error("session backend unavailable: {0}")]
    Unavailable(String),

    /// The session backend answered but refused or garbled the request.
    #[error("session backend rejected request: {0}")]
    Rejected(String),

    /// The session backend did not answer in time.
    #[error("session backend timed out")]
    Timeout,
}
