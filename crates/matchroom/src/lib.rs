//! # Matchroom
//!
//! Matchmaking registry for two-participant sessions.
//!
//! A client creates a room, another client joins it, and once the room is
//! full Matchroom asks a session backend to start the paired session. The
//! registry guarantees that a participant is never in two rooms at once.
//!
//! ```text
//! client ──ws──▶ handler ──▶ RoomRegistry ──▶ SessionCreator ──ws──▶ backend
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matchroom::prelude::*;
//!
//! # async fn run() -> Result<(), MatchroomError> {
//! let config = ServerConfig::from_env()?;
//! let server = MatchroomServerBuilder::new()
//!     .config(&config)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;
mod session_client;

pub use config::ServerConfig;
pub use error::MatchroomError;
pub use server::{MatchroomServer, MatchroomServerBuilder};
pub use session_client::WsSessionCreator;

/// Everything needed to run a server or talk to one.
pub mod prelude {
    pub use crate::{
        MatchroomError, MatchroomServer, MatchroomServerBuilder, ServerConfig,
        WsSessionCreator,
    };
    pub use matchroom_protocol::{
        Codec, CreateRoomReply, CreateRoomRequest, CreateSessionReply,
        CreateSessionRequest, Envelope, JoinRoomReply, JoinRoomRequest,
        JsonCodec, ParticipantId, Payload, ResponseStatus, RoomId,
        RoomInfoReply, RoomInfoRequest, RoomView, RpcError, SessionId,
    };
    pub use matchroom_room::{
        IdGenerator, NoSessions, RandomIdGenerator, RoomError, RoomRegistry,
        RoomSnapshot, RoomState, SequentialIdGenerator, SessionCreator,
        SessionError,
    };
}
