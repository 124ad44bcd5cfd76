//! Error taxonomy shared by the room engine, the registry and the HTTP layer.

use crate::types::{Phase, PlayerId, RoomCode};

/// Result type for room operations
pub type RoomResult<T> = Result<T, RoomError>;

/// Everything a room operation can be rejected with. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("Room {0} not found")]
    RoomNotFound(RoomCode),

    #[error("Player {0} not found in room")]
    PlayerNotFound(PlayerId),

    #[error("Only the host can {0}")]
    Forbidden(&'static str),

    #[error("At least {required} players are needed to start (have {actual})")]
    InsufficientPlayers { required: usize, actual: usize },

    #[error("Cannot {action} during the {phase} phase")]
    InvalidPhase { action: &'static str, phase: Phase },

    #[error("Game already in progress")]
    GameInProgress,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No free room code left")]
    NoFreeRoomCode,
}

impl RoomError {
    /// Stable machine-readable error code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomNotFound(_) => "ROOM_NOT_FOUND",
            Self::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InsufficientPlayers { .. } => "INSUFFICIENT_PLAYERS",
            Self::InvalidPhase { .. } => "INVALID_PHASE",
            Self::GameInProgress => "GAME_IN_PROGRESS",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::NoFreeRoomCode => "NO_FREE_ROOM_CODE",
        }
    }
}
