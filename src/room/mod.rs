//! The room engine: every state transition a room can go through.
//!
//! All operations are synchronous and take `&mut Room`. Each one either
//! validates and commits its whole change (bumping `version`) or returns a
//! `RoomError` without touching the room. Serializing access to a room is
//! the caller's job (see `crate::registry`).

mod phase;
mod player;
mod round;
mod vote;

pub use player::LeaveOutcome;
pub use vote::tally;

use crate::error::{RoomError, RoomResult};
use crate::types::*;
use std::collections::BTreeMap;

impl Room {
    /// Create a lobby containing only its host
    pub fn new(id: RoomCode, host_id: PlayerId, host_name: String) -> Self {
        Self {
            id,
            players: vec![Player::new(host_id, host_name, true)],
            phase: Phase::Lobby,
            current_round: 1,
            max_rounds: MAX_ROUNDS,
            word_pair: None,
            imposter_id: None,
            votes: BTreeMap::new(),
            game_started: false,
            game_ended: false,
            winner: None,
            created_at: chrono::Utc::now(),
            version: 1,
            game_id: None,
            voted_out: None,
            phase_deadline: None,
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn is_host(&self, player_id: &str) -> bool {
        self.host().is_some_and(|h| h.id == player_id)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The phase instance a deferred timer scheduled now would belong to
    pub fn phase_stamp(&self) -> PhaseStamp {
        PhaseStamp {
            game_id: self.game_id.clone(),
            round: self.current_round,
            phase: self.phase,
        }
    }

    fn require_host(&self, player_id: &str, action: &'static str) -> RoomResult<()> {
        if self.is_host(player_id) {
            Ok(())
        } else {
            Err(RoomError::Forbidden(action))
        }
    }

    fn require_phase(&self, expected: Phase, action: &'static str) -> RoomResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RoomError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }

    /// Enter a phase. Any pending deadline belonged to the old phase.
    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.game_ended = phase == Phase::GameOver;
        self.phase_deadline = None;
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    /// Reset clue, vote and tally for a fresh round
    fn clear_round_fields(&mut self) {
        for player in &mut self.players {
            player.clue = None;
            player.vote = None;
        }
        self.votes.clear();
        self.voted_out = None;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::Room;
    use crate::words::WordCatalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Lobby with `count` players: "p1" (host), "p2", ...
    pub fn lobby(count: usize) -> Room {
        let mut room = Room::new("ABCD".to_string(), "p1".to_string(), "Player 1".to_string());
        for i in 2..=count {
            room.join(&format!("p{}", i), format!("Player {}", i)).unwrap();
        }
        room
    }

    /// Started game with `count` players, deterministic for `seed`
    pub fn started(count: usize, seed: u64) -> Room {
        let mut room = lobby(count);
        room.start_game("p1", &WordCatalog::default(), &mut StdRng::seed_from_u64(seed))
            .unwrap();
        room
    }

    pub fn imposter(room: &Room) -> String {
        room.imposter_id.clone().expect("game has an imposter")
    }

    /// Any player other than the imposter, earliest-joined first
    pub fn civilians(room: &Room) -> Vec<String> {
        room.players
            .iter()
            .filter(|p| !p.is_imposter)
            .map(|p| p.id.clone())
            .collect()
    }
}
