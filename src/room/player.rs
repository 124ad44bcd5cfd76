use crate::error::{RoomError, RoomResult};
use crate::types::*;

/// What happened to the room when a player left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Player removed, room still has players
    Left,
    /// Last player removed; the owner of the room should drop it
    Emptied,
    /// The player was not in the room
    NotInRoom,
}

impl Room {
    /// Add a player to the lobby.
    ///
    /// Joining again with an id that is already in the room only refreshes
    /// the display name, so clients can reconnect in any phase.
    pub fn join(&mut self, player_id: &str, name: String) -> RoomResult<()> {
        if let Some(index) = self.player_index(player_id) {
            self.players[index].name = name;
            self.touch();
            return Ok(());
        }

        if self.phase != Phase::Lobby {
            return Err(RoomError::GameInProgress);
        }

        let is_host = self.host().is_none();
        self.players.push(Player::new(player_id.to_string(), name, is_host));
        self.touch();
        Ok(())
    }

    /// Remove a player, handing the host role to the earliest-joined
    /// remaining player if needed.
    pub fn leave(&mut self, player_id: &str) -> LeaveOutcome {
        let Some(index) = self.player_index(player_id) else {
            return LeaveOutcome::NotInRoom;
        };

        let removed = self.players.remove(index);
        self.touch();

        if self.players.is_empty() {
            return LeaveOutcome::Emptied;
        }

        if removed.is_host {
            self.players[0].is_host = true;
        }

        // Voters who picked the leaver get to vote again
        for player in &mut self.players {
            if player.vote.as_deref() == Some(removed.id.as_str()) {
                player.vote = None;
            }
        }
        self.recount_votes();

        if removed.is_imposter && self.phase.is_live() {
            tracing::info!(room = %self.id, "Imposter left mid-game, civilians win");
            self.end_game(Winner::Civilians);
        } else {
            self.check_round_progress();
        }

        LeaveOutcome::Left
    }
}
