//! Integration tests for the room registry: the documented request
//! outcomes, session-backend behavior, and the one-room-per-participant
//! invariant under concurrent load.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use matchroom_protocol::{ParticipantId, ResponseStatus, RoomId, SessionId};
use matchroom_room::{
    RoomError, RoomRegistry, RoomState, SequentialIdGenerator, SessionCreator,
    SessionError,
};
use rand::Rng;
use tokio::sync::Notify;

// =========================================================================
// Session backend stubs
// =========================================================================

/// Names the session after both participants.
struct PairSessions;

impl SessionCreator for PairSessions {
    async fn create_session(
        &self,
        participants: [ParticipantId; 2],
    ) -> Result<SessionId, SessionError> {
        Ok(SessionId(format!("{}+{}", participants[0], participants[1])))
    }
}

/// Fails every call, like an unreachable backend.
struct DownSessions;

impl SessionCreator for DownSessions {
    async fn create_session(
        &self,
        _participants: [ParticipantId; 2],
    ) -> Result<SessionId, SessionError> {
        Err(SessionError::Timeout)
    }
}

/// Blocks until the test opens the gate.
struct GatedSessions {
    entered: Arc<Notify>,
    gate: Arc<Notify>,
}

impl SessionCreator for GatedSessions {
    async fn create_session(
        &self,
        _participants: [ParticipantId; 2],
    ) -> Result<SessionId, SessionError> {
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(SessionId::from("late-session"))
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: &str) -> ParticipantId {
    ParticipantId::from(id)
}

async fn create(reg: &RoomRegistry<impl SessionCreator>, owner: &str) -> RoomId {
    let reply = reg.create_room(&pid(owner)).await.expect("valid request");
    assert_eq!(reply.status, ResponseStatus::Success);
    reply.room_id.expect("success carries a room id")
}

// =========================================================================
// Request outcomes
// =========================================================================

#[tokio::test]
async fn test_create_room_empty_participant_fails() {
    let reg = RoomRegistry::new();
    let err = reg.create_room(&pid("")).await.unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.to_string(), "missing participant id");
}

#[tokio::test]
async fn test_create_room_twice_returns_already_in_room() {
    let reg = RoomRegistry::new();
    create(&reg, "alice").await;

    let reply = reg.create_room(&pid("alice")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::AlreadyInRoom);
    assert!(reply.room_id.is_none());
    assert_eq!(reg.room_count().await, 1);
}

#[tokio::test]
async fn test_join_unknown_room_returns_room_not_found() {
    let reg = RoomRegistry::new();
    let reply = reg
        .join_room(&RoomId::from("unknown"), &pid("bob"))
        .await
        .unwrap();
    assert_eq!(reply.status, ResponseStatus::RoomNotFound);
    assert_eq!(reg.participant_room(&pid("bob")).await, None);
}

#[tokio::test]
async fn test_join_full_lifecycle() {
    let reg = RoomRegistry::with_session_creator(PairSessions);
    let room = create(&reg, "alice").await;

    // The owner cannot join their own room.
    let reply = reg.join_room(&room, &pid("alice")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::AlreadyInRoom);
    assert_eq!(reg.snapshot(&room).await.unwrap().state, RoomState::WaitingForOpponent);

    let reply = reg.join_room(&room, &pid("bob")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::Success);
    assert_eq!(reply.session_id, Some(SessionId::from("alice+bob")));

    let reply = reg.join_room(&room, &pid("carol")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::RoomFull);
    assert!(reply.session_id.is_none());

    // Bob is now in a room, so a second join anywhere is refused before
    // the full check.
    let reply = reg.join_room(&room, &pid("bob")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::AlreadyInRoom);

    let view = reg.room_info(&room).await.unwrap().room.unwrap();
    assert_eq!(view.owner, pid("alice"));
    assert_eq!(view.other_participant, Some(pid("bob")));
    assert_eq!(view.session_id, Some(SessionId::from("alice+bob")));
}

#[tokio::test]
async fn test_joined_participant_cannot_join_another_room() {
    let reg = RoomRegistry::new();
    let first = create(&reg, "alice").await;
    let second = create(&reg, "dave").await;

    reg.join_room(&first, &pid("bob")).await.unwrap();
    let reply = reg.join_room(&second, &pid("bob")).await.unwrap();

    assert_eq!(reply.status, ResponseStatus::AlreadyInRoom);
    assert_eq!(reg.snapshot(&second).await.unwrap().other_participant, None);
}

#[tokio::test]
async fn test_room_info_before_join() {
    let reg = RoomRegistry::new();
    let room = create(&reg, "alice").await;

    let reply = reg.room_info(&room).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::Success);
    assert_eq!(reply.room.unwrap().id, room);

    let reply = reg.room_info(&RoomId::from("nonexistent")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::RoomNotFound);
}

#[tokio::test]
async fn test_room_info_is_stable_without_joins() {
    let reg = RoomRegistry::new();
    let room = create(&reg, "alice").await;

    let first = reg.room_info(&room).await.unwrap();
    for _ in 0..10 {
        assert_eq!(reg.room_info(&room).await.unwrap(), first);
    }
}

#[tokio::test]
async fn test_room_info_empty_id_fails() {
    let reg = RoomRegistry::new();
    let result = reg.room_info(&RoomId::default()).await;
    assert!(matches!(result, Err(RoomError::MissingField(_))));
}

// =========================================================================
// Session backend
// =========================================================================

#[tokio::test]
async fn test_session_failure_keeps_room_full() {
    let reg = RoomRegistry::with_session_creator(DownSessions);
    let room = create(&reg, "alice").await;

    let reply = reg.join_room(&room, &pid("bob")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::Success);
    assert!(reply.session_id.is_none());

    let snapshot = reg.snapshot(&room).await.unwrap();
    assert_eq!(snapshot.state, RoomState::Full);
    assert!(snapshot.session_id.is_none());

    let reply = reg.join_room(&room, &pid("carol")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::RoomFull);
}

#[tokio::test]
async fn test_slow_session_backend_does_not_hold_the_lock() {
    let entered = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let reg = Arc::new(
        RoomRegistry::with_session_creator(GatedSessions {
            entered: Arc::clone(&entered),
            gate: Arc::clone(&gate),
        })
        .with_generator(SequentialIdGenerator::new("r")),
    );
    let room = create(&*reg, "alice").await;

    let joining = {
        let reg = Arc::clone(&reg);
        let room = room.clone();
        tokio::spawn(async move { reg.join_room(&room, &pid("bob")).await })
    };
    entered.notified().await;

    // While the backend is busy, the room is already full and the
    // registry still serves other calls.
    let reply = reg.join_room(&room, &pid("carol")).await.unwrap();
    assert_eq!(reply.status, ResponseStatus::RoomFull);
    let other = create(&*reg, "dave").await;
    assert_eq!(other, RoomId::from("r-2"));
    let view = reg.room_info(&room).await.unwrap().room.unwrap();
    assert_eq!(view.other_participant, Some(pid("bob")));
    assert_eq!(view.session_id, None);

    gate.notify_one();
    let reply = tokio::time::timeout(Duration::from_secs(5), joining)
        .await
        .expect("join should finish")
        .expect("task should not panic")
        .unwrap();
    assert_eq!(reply.session_id, Some(SessionId::from("late-session")));
    assert_eq!(
        reg.snapshot(&room).await.unwrap().session_id,
        Some(SessionId::from("late-session"))
    );
}

// =========================================================================
// Concurrency
// =========================================================================

/// Asserts that no participant holds a slot in two rooms and that the
/// participant index agrees with the rooms.
async fn assert_single_room_per_participant<S: SessionCreator>(reg: &RoomRegistry<S>) {
    let mut seen: HashMap<ParticipantId, RoomId> = HashMap::new();
    for snapshot in reg.snapshots().await {
        for participant in snapshot.participants() {
            if let Some(other) = seen.insert(participant.clone(), snapshot.id.clone()) {
                panic!("{participant} is in both {other} and {}", snapshot.id);
            }
        }
    }
    for (participant, room) in &seen {
        assert_eq!(reg.participant_room(participant).await.as_ref(), Some(room));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_and_join_never_double_books() {
    const PARTICIPANTS: usize = 24;
    const TASKS: usize = 64;
    const OPS_PER_TASK: usize = 50;

    let reg = Arc::new(RoomRegistry::with_session_creator(PairSessions));
    let known_rooms = Arc::new(tokio::sync::Mutex::new(Vec::<RoomId>::new()));

    let mut handles = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        let reg = Arc::clone(&reg);
        let known_rooms = Arc::clone(&known_rooms);
        handles.push(tokio::spawn(async move {
            let mut creates = 0usize;
            let mut joins = 0usize;
            for _ in 0..OPS_PER_TASK {
                let (who, create_room, pick) = {
                    let mut rng = rand::rng();
                    let who: usize = rng.random_range(0..PARTICIPANTS);
                    let create_room: bool = rng.random_bool(0.4);
                    let pick: usize = rng.random::<u64>() as usize;
                    (who, create_room, pick)
                };
                let participant = ParticipantId(format!("p{who}"));

                if create_room {
                    let reply = reg.create_room(&participant).await.unwrap();
                    if let Some(room) = reply.room_id {
                        creates += 1;
                        known_rooms.lock().await.push(room);
                    }
                } else {
                    let target = {
                        let rooms = known_rooms.lock().await;
                        if rooms.is_empty() {
                            continue;
                        }
                        rooms[pick % rooms.len()].clone()
                    };
                    let reply = reg.join_room(&target, &participant).await.unwrap();
                    if reply.status == ResponseStatus::Success {
                        joins += 1;
                        assert!(reply.session_id.is_some());
                    }
                }
                tokio::task::yield_now().await;
            }
            (creates, joins)
        }));
    }

    // Check the invariant while the writers are still running.
    let checker = {
        let reg = Arc::clone(&reg);
        tokio::spawn(async move {
            for _ in 0..50 {
                assert_single_room_per_participant(&*reg).await;
                tokio::task::yield_now().await;
            }
        })
    };

    let mut total_creates = 0;
    let mut total_joins = 0;
    for handle in handles {
        let (creates, joins) = handle.await.expect("worker should not panic");
        total_creates += creates;
        total_joins += joins;
    }
    checker.await.expect("invariant held during the run");

    assert_single_room_per_participant(&*reg).await;

    let snapshots = reg.snapshots().await;
    assert_eq!(snapshots.len(), total_creates);
    let full = snapshots
        .iter()
        .filter(|s| s.state == RoomState::Full)
        .count();
    assert_eq!(full, total_joins);
    assert!(snapshots.len() <= PARTICIPANTS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_on_one_room_admit_exactly_one() {
    let reg = Arc::new(RoomRegistry::with_session_creator(PairSessions));
    let room = create(&*reg, "owner").await;

    let mut handles = Vec::new();
    for i in 0..32 {
        let reg = Arc::clone(&reg);
        let room = room.clone();
        handles.push(tokio::spawn(async move {
            reg.join_room(&room, &ParticipantId(format!("challenger-{i}")))
                .await
                .unwrap()
                .status
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            ResponseStatus::Success => successes += 1,
            ResponseStatus::RoomFull => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_single_room_per_participant(&*reg).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_by_one_participant_make_one_room() {
    let reg = Arc::new(RoomRegistry::new());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let reg = Arc::clone(&reg);
        handles.push(tokio::spawn(async move {
            reg.create_room(&pid("alice")).await.unwrap().status
        }));
    }

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }
    let created = statuses.iter().filter(|s| s.is_success()).count();
    assert_eq!(created, 1);
    assert_eq!(reg.room_count().await, 1);
}
