//! Unified error type for the Matchroom service.

use matchroom_protocol::ProtocolError;
use matchroom_room::RoomError;
use matchroom_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` conversions let `?` lift sub-crate errors into this one.
#[derive(Debug, thiserror::Error)]
pub enum MatchroomError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A registry refusal that is not a business outcome.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
