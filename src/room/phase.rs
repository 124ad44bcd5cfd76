use crate::error::{RoomError, RoomResult};
use crate::types::*;
use crate::words::WordCatalog;
use rand::Rng;

impl Room {
    /// Start a game from the lobby (host only)
    pub fn start_game<R: Rng>(
        &mut self,
        player_id: &str,
        catalog: &WordCatalog,
        rng: &mut R,
    ) -> RoomResult<()> {
        self.require_host(player_id, "start the game")?;
        self.require_phase(Phase::Lobby, "start the game")?;
        if self.players.len() < MIN_PLAYERS {
            return Err(RoomError::InsufficientPlayers {
                required: MIN_PLAYERS,
                actual: self.players.len(),
            });
        }

        self.assign_roles(catalog, rng);
        self.clear_round_fields();
        self.current_round = 1;
        self.game_started = true;
        self.winner = None;
        self.game_id = Some(ulid::Ulid::new().to_string());
        self.set_phase(Phase::Words);
        self.touch();

        tracing::info!(
            room = %self.id,
            players = self.players.len(),
            "Game started"
        );
        Ok(())
    }

    /// Pick the word pair and the imposter for the whole game
    fn assign_roles<R: Rng>(&mut self, catalog: &WordCatalog, rng: &mut R) {
        let pair = catalog.choose(rng).clone();
        let imposter_index = rng.random_range(0..self.players.len());

        for (index, player) in self.players.iter_mut().enumerate() {
            player.is_imposter = index == imposter_index;
            player.word = Some(if player.is_imposter {
                pair.imposter.clone()
            } else {
                pair.civilian.clone()
            });
        }

        self.imposter_id = Some(self.players[imposter_index].id.clone());
        self.word_pair = Some(pair);
    }

    /// Host override: move to the next phase without waiting for timers
    /// or for every player to act.
    pub fn advance_phase(&mut self, player_id: &str) -> RoomResult<()> {
        self.require_host(player_id, "advance the phase")?;

        match self.phase {
            Phase::Lobby | Phase::GameOver => {
                return Err(RoomError::InvalidPhase {
                    action: "advance the phase",
                    phase: self.phase,
                });
            }
            Phase::Words => self.set_phase(Phase::Clues),
            Phase::Clues => self.set_phase(Phase::Voting),
            Phase::Voting => self.close_voting(),
            Phase::Results => self.start_next_round(),
        }
        self.touch();

        tracing::info!(room = %self.id, phase = %self.phase, "Host advanced phase");
        Ok(())
    }

    /// Apply a deferred timed transition.
    ///
    /// Returns `false` without changing anything when the room has moved on
    /// since `stamp` was taken, or when the current phase has no timer.
    pub fn expire_phase(&mut self, stamp: &PhaseStamp) -> bool {
        if self.phase_stamp() != *stamp {
            return false;
        }

        match self.phase {
            Phase::Words => self.set_phase(Phase::Clues),
            Phase::Results => self.start_next_round(),
            _ => return false,
        }
        self.touch();
        true
    }

    /// Reset the room to its lobby (host only). Valid from every phase.
    pub fn new_game(&mut self, player_id: &str) -> RoomResult<()> {
        self.require_host(player_id, "start a new game")?;

        for player in &mut self.players {
            player.word = None;
            player.is_imposter = false;
        }
        self.clear_round_fields();
        self.current_round = 1;
        self.word_pair = None;
        self.imposter_id = None;
        self.winner = None;
        self.game_started = false;
        self.game_id = None;
        self.set_phase(Phase::Lobby);
        self.touch();

        tracing::info!(room = %self.id, "Room reset to lobby");
        Ok(())
    }

    /// Same imposter, same words, fresh clues and votes
    fn start_next_round(&mut self) {
        self.clear_round_fields();
        self.current_round = (self.current_round + 1).min(self.max_rounds);
        self.set_phase(Phase::Words);
    }

    pub(super) fn end_game(&mut self, winner: Winner) {
        self.winner = Some(winner);
        self.set_phase(Phase::GameOver);
    }
}
