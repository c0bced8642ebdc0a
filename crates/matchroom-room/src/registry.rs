//! The room registry: every room in the process behind one lock.
//!
//! All three operations take the same `tokio::sync::Mutex`, so the checks
//! and the mutation of one call can never interleave with another call.
//! That is what keeps the central invariant:
//!
//! > a participant holds a slot in at most one room at any time.
//!
//! The only await point outside the lock is the session-creation call in
//! [`RoomRegistry::join_room`], which runs after the room has already been
//! marked full.

use std::collections::HashMap;

use matchroom_protocol::{
    CreateRoomReply, JoinRoomReply, ParticipantId, ResponseStatus, RoomId,
    RoomInfoReply,
};
use tokio::sync::Mutex;

use crate::{
    IdGenerator, NoSessions, RandomIdGenerator, Room, RoomError, RoomSnapshot,
    SessionCreator,
};

/// State guarded by the registry lock.
#[derive(Default)]
struct Rooms {
    /// All rooms, keyed by id. Rooms are never removed.
    by_id: HashMap<RoomId, Room>,

    /// Which room each participant holds a slot in. Updated in the same
    /// critical section as `by_id`, so it always agrees with it.
    participants: HashMap<ParticipantId, RoomId>,
}

/// Lock-guarded collection of all rooms.
///
/// Construct one per process and share it (e.g. in an `Arc`) with whatever
/// dispatches requests into it.
///
/// `S` is the session backend. A registry built with
/// [`RoomRegistry::new`] has none and never produces session ids.
pub struct RoomRegistry<S = NoSessions> {
    rooms: Mutex<Rooms>,
    generator: Box<dyn IdGenerator>,
    sessions: Option<S>,
}

impl RoomRegistry<NoSessions> {
    /// Creates an empty registry without a session backend.
    pub fn new() -> Self {
        Self::from_parts(None)
    }
}

impl Default for RoomRegistry<NoSessions> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SessionCreator> RoomRegistry<S> {
    /// Creates an empty registry that hands every filled room to `creator`.
    pub fn with_session_creator(creator: S) -> Self {
        Self::from_parts(Some(creator))
    }

    fn from_parts(sessions: Option<S>) -> Self {
        Self {
            rooms: Mutex::new(Rooms::default()),
            generator: Box::new(RandomIdGenerator),
            sessions,
        }
    }

    /// Replaces the room id generator.
    pub fn with_generator(mut self, generator: impl IdGenerator) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Returns `true` if joins will attempt to create a session.
    pub fn has_session_creator(&self) -> bool {
        self.sessions.is_some()
    }

    /// Creates a room owned by `participant`.
    ///
    /// Replies `ALREADY_IN_ROOM`, creating nothing, if the participant
    /// already holds a slot anywhere.
    ///
    /// # Errors
    /// - [`RoomError::MissingField`] if `participant` is empty
    /// - [`RoomError::DuplicateRoomId`] / [`RoomError::InvalidGeneratedId`]
    ///   if the generator misbehaves
    pub async fn create_room(
        &self,
        participant: &ParticipantId,
    ) -> Result<CreateRoomReply, RoomError> {
        if participant.is_empty() {
            return Err(RoomError::MissingField("participant id"));
        }

        let mut rooms = self.rooms.lock().await;

        if let Some(current) = rooms.participants.get(participant) {
            tracing::debug!(%participant, room_id = %current, "create refused, already in a room");
            return Ok(CreateRoomReply::with_status(ResponseStatus::AlreadyInRoom));
        }

        let room_id = RoomId(self.generator.generate_id());
        if room_id.is_empty() {
            return Err(RoomError::InvalidGeneratedId);
        }
        if rooms.by_id.contains_key(&room_id) {
            return Err(RoomError::DuplicateRoomId(room_id));
        }

        rooms
            .by_id
            .insert(room_id.clone(), Room::new(room_id.clone(), participant.clone()));
        rooms.participants.insert(participant.clone(), room_id.clone());

        tracing::info!(%room_id, owner = %participant, "room created");
        Ok(CreateRoomReply::success(room_id))
    }

    /// Looks up a room.
    ///
    /// The view in the reply is a copy taken under the lock; the room may
    /// be joined as soon as this returns.
    ///
    /// # Errors
    /// [`RoomError::MissingField`] if `room_id` is empty.
    pub async fn room_info(&self, room_id: &RoomId) -> Result<RoomInfoReply, RoomError> {
        if room_id.is_empty() {
            return Err(RoomError::MissingField("room id"));
        }

        let rooms = self.rooms.lock().await;
        let reply = match rooms.by_id.get(room_id) {
            Some(room) => RoomInfoReply::success(room.snapshot().into()),
            None => RoomInfoReply::with_status(ResponseStatus::RoomNotFound),
        };
        Ok(reply)
    }

    /// Joins `participant` into `room_id` as the second participant.
    ///
    /// Checked in order under the lock: the room exists (`ROOM_NOT_FOUND`),
    /// the participant holds no slot anywhere, including as this room's
    /// owner (`ALREADY_IN_ROOM`), the room is not full (`ROOM_FULL`).
    ///
    /// On success the room is full before the lock is released. The
    /// session backend is then called once, outside the lock. Its failure
    /// is logged and does not undo the join: the reply is still `SUCCESS`,
    /// just without a session id.
    ///
    /// # Errors
    /// [`RoomError::MissingField`] if either id is empty.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
    ) -> Result<JoinRoomReply, RoomError> {
        if room_id.is_empty() {
            return Err(RoomError::MissingField("room id"));
        }
        if participant.is_empty() {
            return Err(RoomError::MissingField("participant id"));
        }

        let owner = {
            let mut rooms = self.rooms.lock().await;
            let Rooms {
                by_id,
                participants,
            } = &mut *rooms;

            let Some(room) = by_id.get_mut(room_id) else {
                return Ok(JoinRoomReply::with_status(ResponseStatus::RoomNotFound));
            };

            if let Some(current) = participants.get(participant) {
                tracing::debug!(%participant, room_id = %current, "join refused, already in a room");
                return Ok(JoinRoomReply::with_status(ResponseStatus::AlreadyInRoom));
            }

            if !room.try_join(participant.clone()) {
                return Ok(JoinRoomReply::with_status(ResponseStatus::RoomFull));
            }
            participants.insert(participant.clone(), room_id.clone());

            tracing::info!(%room_id, %participant, owner = %room.owner(), "room full");
            room.owner().clone()
        };

        let Some(creator) = &self.sessions else {
            return Ok(JoinRoomReply::success(None));
        };

        match creator
            .create_session([owner, participant.clone()])
            .await
        {
            Ok(session_id) => {
                let mut rooms = self.rooms.lock().await;
                if let Some(room) = rooms.by_id.get_mut(room_id) {
                    room.set_session(session_id.clone());
                }
                tracing::info!(%room_id, %session_id, "session created");
                Ok(JoinRoomReply::success(Some(session_id)))
            }
            Err(e) => {
                tracing::warn!(%room_id, error = %e, "unable to create a session for room");
                Ok(JoinRoomReply::success(None))
            }
        }
    }

    /// Returns a copy of one room, if it exists.
    pub async fn snapshot(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        self.rooms.lock().await.by_id.get(room_id).map(Room::snapshot)
    }

    /// Returns a copy of every room, taken in one critical section.
    pub async fn snapshots(&self) -> Vec<RoomSnapshot> {
        self.rooms
            .lock()
            .await
            .by_id
            .values()
            .map(Room::snapshot)
            .collect()
    }

    /// Returns the room `participant` holds a slot in, if any.
    pub async fn participant_room(&self, participant: &ParticipantId) -> Option<RoomId> {
        self.rooms.lock().await.participants.get(participant).cloned()
    }

    /// Returns the number of rooms ever created.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.by_id.len()
    }
}
