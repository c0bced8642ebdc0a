//! Room registry for Matchroom.
//!
//! Holds every two-participant room in the process and serializes all
//! state transitions behind one lock, so that no participant is ever in
//! two rooms at once.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: create, inspect, and join rooms
//! - [`Room`] / [`RoomSnapshot`]: a room and a detached copy of it
//! - [`RoomState`]: `WaitingForOpponent → Full`
//! - [`IdGenerator`]: where room ids come from
//! - [`SessionCreator`]: what happens once a room fills

mod error;
mod id;
mod registry;
mod room;
mod session;

pub use error::{RoomError, SessionError};
pub use id::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use registry::RoomRegistry;
pub use room::{Room, RoomSnapshot, RoomState};
pub use session::{NoSessions, SessionCreator};
