//! Wire protocol for Matchroom.
//!
//! This crate defines what clients and the service exchange:
//!
//! - **Identifiers** ([`ParticipantId`], [`RoomId`], [`SessionId`]):
//!   opaque string newtypes.
//! - **RPC types** ([`Envelope`], [`Payload`], the request/reply structs
//!   and [`ResponseStatus`]).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how envelopes become
//!   bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer knows nothing about locks or rooms in memory; the
//! registry consumes and produces these types, and the service moves them
//! over a transport.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    CreateRoomReply, CreateRoomRequest, CreateSessionReply,
    CreateSessionRequest, Envelope, JoinRoomReply, JoinRoomRequest,
    ParticipantId, Payload, ResponseStatus, RoomId, RoomInfoReply,
    RoomInfoRequest, RoomView, RpcError, SessionId,
};
