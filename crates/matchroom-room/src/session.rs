//! The session-creation hook.
//!
//! Matchroom pairs participants; it does not run the game they then
//! play. Once a room fills, the registry hands both participant ids to a
//! [`SessionCreator`], which provisions the session somewhere else and
//! returns its id.
//!
//! A trait keeps the registry independent of where sessions live: the
//! service plugs in a WebSocket client, tests plug in in-memory stubs, and
//! deployments without a session backend use [`NoSessions`].

use std::future::Future;

use matchroom_protocol::{ParticipantId, SessionId};

use crate::SessionError;

/// Creates the paired session for two matched participants.
///
/// The returned future must be `Send` because the registry is shared
/// across Tokio worker threads and `join_room` awaits it. Implementors
/// can still write a plain `async fn`:
///
/// ```rust
/// use matchroom_protocol::{ParticipantId, SessionId};
/// use matchroom_room::{SessionCreator, SessionError};
///
/// /// Names the session after both participants.
/// struct LocalSessions;
///
/// impl SessionCreator for LocalSessions {
///     async fn create_session(
///         &self,
///         participants: [ParticipantId; 2],
///     ) -> Result<SessionId, SessionError> {
///         Ok(SessionId(format!("{}-vs-{}", participants[0], participants[1])))
///     }
/// }
/// ```
pub trait SessionCreator: Send + Sync + 'static {
    /// Called at most once per room, with `[owner, other_participant]`.
    fn create_session(
        &self,
        participants: [ParticipantId; 2],
    ) -> impl Future<Output = Result<SessionId, SessionError>> + Send;
}

/// Marker for a registry with no session backend.
///
/// Uninhabited: a `RoomRegistry<NoSessions>` holds no creator, so joins
/// succeed without ever producing a session id.
#[derive(Debug, Clone, Copy)]
pub enum NoSessions {}

impl SessionCreator for NoSessions {
    async fn create_session(
        &self,
        _participants: [ParticipantId; 2],
    ) -> Result<SessionId, SessionError> {
        match *self {}
    }
}
