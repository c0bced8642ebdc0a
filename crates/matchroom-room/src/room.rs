//! A single matchmaking slot and its state machine.

use std::fmt;

use matchroom_protocol::{ParticipantId, RoomId, RoomView, SessionId};

/// The lifecycle state of a room.
///
/// ```text
/// WaitingForOpponent ──(join)──→ Full
/// ```
///
/// There is no transition out of `Full` and rooms are never removed.
/// Whether a full room has a session id is tracked separately and does
/// not gate anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomState {
    /// Created by its owner, second slot still empty.
    WaitingForOpponent,
    /// Both slots taken.
    Full,
}

impl RoomState {
    /// Returns `true` if the room is accepting a second participant.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForOpponent)
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForOpponent => write!(f, "WaitingForOpponent"),
            Self::Full => write!(f, "Full"),
        }
    }
}

/// A room as stored in the registry.
///
/// Only the registry mutates rooms, and only while holding its lock.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    owner: ParticipantId,
    other_participant: Option<ParticipantId>,
    session_id: Option<SessionId>,
}

impl Room {
    pub(crate) fn new(id: RoomId, owner: ParticipantId) -> Self {
        Self {
            id,
            owner,
            other_participant: None,
            session_id: None,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn owner(&self) -> &ParticipantId {
        &self.owner
    }

    pub fn other_participant(&self) -> Option<&ParticipantId> {
        self.other_participant.as_ref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn state(&self) -> RoomState {
        if self.other_participant.is_some() {
            RoomState::Full
        } else {
            RoomState::WaitingForOpponent
        }
    }

    /// Fills the second slot. Returns `false`, leaving the room untouched,
    /// if it is already full.
    pub(crate) fn try_join(&mut self, participant: ParticipantId) -> bool {
        if !self.state().is_joinable() {
            return false;
        }
        self.other_participant = Some(participant);
        true
    }

    /// Records the paired session. The first session id wins.
    pub(crate) fn set_session(&mut self, session_id: SessionId) {
        if self.session_id.is_none() {
            self.session_id = Some(session_id);
        }
    }

    /// Copies the room's current fields out of the registry.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id.clone(),
            owner: self.owner.clone(),
            other_participant: self.other_participant.clone(),
            session_id: self.session_id.clone(),
            state: self.state(),
        }
    }
}

/// A point-in-time copy of a [`Room`].
///
/// Detached from the registry: it does not change when the room is joined
/// afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub owner: ParticipantId,
    pub other_participant: Option<ParticipantId>,
    pub session_id: Option<SessionId>,
    pub state: RoomState,
}

impl RoomSnapshot {
    /// Participants holding a slot, owner first.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        std::iter::once(&self.owner).chain(self.other_participant.as_ref())
    }
}

impl From<RoomSnapshot> for RoomView {
    fn from(snapshot: RoomSnapshot) -> Self {
        RoomView {
            id: snapshot.id,
            owner: snapshot.owner,
            other_participant: snapshot.other_participant,
            session_id: snapshot.session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room::new(RoomId::from("r1"), ParticipantId::from("alice"))
    }

    #[test]
    fn test_new_room_waits_for_opponent() {
        let room = room();
        assert_eq!(room.state(), RoomState::WaitingForOpponent);
        assert!(room.state().is_joinable());
        assert!(room.other_participant().is_none());
        assert!(room.session_id().is_none());
    }

    #[test]
    fn test_try_join_fills_second_slot_once() {
        let mut room = room();
        assert!(room.try_join(ParticipantId::from("bob")));
        assert_eq!(room.state(), RoomState::Full);
        assert_eq!(room.other_participant(), Some(&ParticipantId::from("bob")));

        assert!(!room.try_join(ParticipantId::from("carol")));
        assert_eq!(room.other_participant(), Some(&ParticipantId::from("bob")));
        assert!(!room.state().is_joinable());
    }

    #[test]
    fn test_set_session_keeps_first_value() {
        let mut room = room();
        room.try_join(ParticipantId::from("bob"));
        room.set_session(SessionId::from("s1"));
        room.set_session(SessionId::from("s2"));
        assert_eq!(room.session_id(), Some(&SessionId::from("s1")));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut room = room();
        let before = room.snapshot();
        room.try_join(ParticipantId::from("bob"));

        assert_eq!(before.state, RoomState::WaitingForOpponent);
        assert!(before.other_participant.is_none());
        assert_eq!(room.snapshot().state, RoomState::Full);
    }

    #[test]
    fn test_snapshot_participants_owner_first() {
        let mut room = room();
        room.try_join(ParticipantId::from("bob"));
        let snapshot = room.snapshot();
        let ids: Vec<&str> = snapshot.participants().map(|p| p.as_str()).collect();
        assert_eq!(ids, ["alice", "bob"]);
    }

    #[test]
    fn test_snapshot_into_view() {
        let view: RoomView = room().snapshot().into();
        assert_eq!(view.id, RoomId::from("r1"));
        assert_eq!(view.owner, ParticipantId::from("alice"));
        assert!(view.other_participant.is_none());
    }

    #[test]
    fn test_room_state_display() {
        assert_eq!(RoomState::WaitingForOpponent.to_string(), "WaitingForOpponent");
        assert_eq!(RoomState::Full.to_string(), "Full");
    }
}
