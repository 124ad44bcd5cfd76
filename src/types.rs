use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque ID types for type safety
pub type RoomCode = String;
pub type PlayerId = String;
pub type GameId = String;

/// Rounds per game before the imposter wins by survival
pub const MAX_ROUNDS: u32 = 3;

/// Players required to start a game
pub const MIN_PLAYERS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Lobby,
    Words,
    Clues,
    Voting,
    Results,
    GameOver,
}

impl Phase {
    /// Whether roles (imposter, words) are assigned and the game is still being played
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Words | Self::Clues | Self::Voting | Self::Results)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Words => write!(f, "words"),
            Self::Clues => write!(f, "clues"),
            Self::Voting => write!(f, "voting"),
            Self::Results => write!(f, "results"),
            Self::GameOver => write!(f, "gameOver"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Civilians,
    Imposter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WordPair {
    pub civilian: String,
    pub imposter: String,
}

impl WordPair {
    pub fn new(civilian: impl Into<String>, imposter: impl Into<String>) -> Self {
        Self {
            civilian: civilian.into(),
            imposter: imposter.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    /// Secret word for the current game (None in lobby)
    pub word: Option<String>,
    /// Clue for the current round
    pub clue: Option<String>,
    /// Target of this player's vote in the current round
    pub vote: Option<PlayerId>,
    pub is_imposter: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, is_host: bool) -> Self {
        Self {
            id,
            name,
            is_host,
            word: None,
            clue: None,
            vote: None,
            is_imposter: false,
        }
    }
}

/// One game session. Mutated only through the operations in `crate::room`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomCode,
    /// Join order
    pub players: Vec<Player>,
    pub phase: Phase,
    pub current_round: u32,
    pub max_rounds: u32,
    pub word_pair: Option<WordPair>,
    pub imposter_id: Option<PlayerId>,
    /// Vote counts for the current round, keyed by target
    pub votes: BTreeMap<PlayerId, u32>,
    pub game_started: bool,
    pub game_ended: bool,
    pub winner: Option<Winner>,
    pub created_at: DateTime<Utc>,
    /// Bumped on every committed mutation
    pub version: u64,
    /// Minted on every StartGame so deferred timers can tell games apart
    pub game_id: Option<GameId>,
    /// Plurality target of the round that just closed (shown during results)
    pub voted_out: Option<PlayerId>,
    /// ISO timestamp at which the pending phase timer fires
    pub phase_deadline: Option<String>,
}

/// Identifies the exact phase instance a deferred timer was scheduled for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStamp {
    pub game_id: Option<GameId>,
    pub round: u32,
    pub phase: Phase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_wire_names() {
        assert_eq!(serde_json::to_string(&Phase::Lobby).unwrap(), "\"lobby\"");
        assert_eq!(
            serde_json::to_string(&Phase::GameOver).unwrap(),
            "\"gameOver\""
        );
        assert_eq!(
            serde_json::from_str::<Phase>("\"voting\"").unwrap(),
            Phase::Voting
        );
    }

    #[test]
    fn test_phase_display_matches_wire_name() {
        for phase in [
            Phase::Lobby,
            Phase::Words,
            Phase::Clues,
            Phase::Voting,
            Phase::Results,
            Phase::GameOver,
        ] {
            let wire = serde_json::to_string(&phase).unwrap();
            assert_eq!(wire.trim_matches('"'), phase.to_string());
        }
    }

    #[test]
    fn test_phase_is_live() {
        assert!(!Phase::Lobby.is_live());
        assert!(Phase::Words.is_live());
        assert!(Phase::Clues.is_live());
        assert!(Phase::Voting.is_live());
        assert!(Phase::Results.is_live());
        assert!(!Phase::GameOver.is_live());
    }

    #[test]
    fn test_winner_wire_names() {
        assert_eq!(
            serde_json::to_string(&Winner::Civilians).unwrap(),
            "\"civilians\""
        );
        assert_eq!(
            serde_json::to_string(&Winner::Imposter).unwrap(),
            "\"imposter\""
        );
    }

    #[test]
    fn test_player_serializes_camel_case() {
        let player = Player::new("p1".to_string(), "Alice".to_string(), true);
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["isHost"], true);
        assert_eq!(json["isImposter"], false);
        assert!(json["word"].is_null());
    }
}
