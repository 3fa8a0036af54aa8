//! Error types.
//!
//! None of these are fatal: every failure path ends the current session
//! attempt and hands control back to the caller.

use thiserror::Error;

use crate::protocol::SessionPhase;

/// Invalid setup values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size {0} is out of range ({min}..={max})", min = crate::core::MIN_GRID_SIZE, max = crate::core::MAX_GRID_SIZE)]
    GridSize(usize),

    #[error("player name must not be blank")]
    BlankName,

    #[error("room code {0:?} is not a 4-digit number between 1000 and 9999")]
    RoomCode(String),

    #[error("online sessions need a room code and a local player")]
    MissingOnlineIdentity,
}

/// Failures reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("peer {0} could not be found")]
    PeerUnavailable(String),

    #[error("could not register peer id {peer}: {reason}")]
    Registration { peer: String, reason: String },

    #[error("connection is closed")]
    Closed,

    #[error("connection is not open yet")]
    NotOpen,

    #[error("transport failure: {0}")]
    Other(String),
}

/// Errors returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("operation not allowed while session is {0}")]
    InvalidPhase(SessionPhase),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ConfigError::GridSize(1).to_string(),
            "grid size 1 is out of range (2..=1024)"
        );
        assert_eq!(
            TransportError::PeerUnavailable("db-game-1234".into()).to_string(),
            "peer db-game-1234 could not be found"
        );
        assert_eq!(
            SessionError::InvalidPhase(SessionPhase::Terminated).to_string(),
            "operation not allowed while session is terminated"
        );
    }

    #[test]
    fn test_from_conversions() {
        let err: SessionError = ConfigError::BlankName.into();
        assert!(matches!(err, SessionError::Config(ConfigError::BlankName)));

        let err: SessionError = TransportError::Closed.into();
        assert_eq!(err.to_string(), "connection is closed");
    }
}
