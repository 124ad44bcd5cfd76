use crate::error::{RoomError, RoomResult};
use crate::types::*;
use std::collections::BTreeMap;

/// Count one vote per player, keyed by target. Votes for players who are no
/// longer in the room are dropped.
pub fn tally(players: &[Player]) -> BTreeMap<PlayerId, u32> {
    let mut counts: BTreeMap<PlayerId, u32> = BTreeMap::new();
    for target in players.iter().filter_map(|p| p.vote.as_ref()) {
        if players.iter().any(|p| &p.id == target) {
            *counts.entry(target.clone()).or_insert(0) += 1;
        }
    }
    counts
}

impl Room {
    /// Cast (or change) a vote during the voting phase.
    ///
    /// Closes voting once every player has voted.
    pub fn submit_vote(&mut self, voter_id: &str, target_id: &str) -> RoomResult<()> {
        self.require_phase(Phase::Voting, "vote")?;
        let index = self
            .player_index(voter_id)
            .ok_or_else(|| RoomError::PlayerNotFound(voter_id.to_string()))?;
        if self.player(target_id).is_none() {
            return Err(RoomError::PlayerNotFound(target_id.to_string()));
        }

        self.players[index].vote = Some(target_id.to_string());
        self.recount_votes();
        self.check_round_progress();
        self.touch();
        Ok(())
    }

    pub fn all_votes_cast(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.vote.is_some())
    }

    pub(super) fn recount_votes(&mut self) {
        self.votes = tally(&self.players);
    }

    /// The player with the most votes this round.
    ///
    /// Ties go to the earliest-joined of the tied players. `None` when
    /// nobody voted.
    pub fn plurality(&self) -> Option<&str> {
        let mut best: Option<(&str, u32)> = None;
        for player in &self.players {
            let count = self.votes.get(&player.id).copied().unwrap_or(0);
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((player.id.as_str(), count));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Tally the round and decide whether the game is over
    pub(super) fn close_voting(&mut self) {
        self.recount_votes();
        let voted_out = self.plurality().map(str::to_string);

        let caught = voted_out.is_some() && voted_out == self.imposter_id;
        tracing::info!(
            room = %self.id,
            round = self.current_round,
            voted_out = ?voted_out,
            caught,
            "Voting closed"
        );
        self.voted_out = voted_out;

        if caught {
            self.end_game(Winner::Civilians);
        } else if self.current_round >= self.max_rounds {
            self.end_game(Winner::Imposter);
        } else {
            self.set_phase(Phase::Results);
        }
    }
}
