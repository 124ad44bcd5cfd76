use crate::error::{RoomError, RoomResult};
use crate::types::*;

impl Room {
    /// Record (or replace) a player's clue for this round.
    ///
    /// Moves the room to voting once every player has a clue.
    pub fn submit_clue(&mut self, player_id: &str, clue: String) -> RoomResult<()> {
        self.require_phase(Phase::Clues, "submit a clue")?;
        let index = self
            .player_index(player_id)
            .ok_or_else(|| RoomError::PlayerNotFound(player_id.to_string()))?;

        self.players[index].clue = Some(clue);
        self.check_round_progress();
        self.touch();
        Ok(())
    }

    pub fn all_clues_submitted(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.clue.is_some())
    }

    /// Automatic completion: leave clues once everyone wrote one, close
    /// voting once everyone voted.
    pub(super) fn check_round_progress(&mut self) {
        match self.phase {
            Phase::Clues if self.all_clues_submitted() => {
                tracing::debug!(room = %self.id, "All clues in, opening voting");
                self.set_phase(Phase::Voting);
            }
            Phase::Voting if self.all_votes_cast() => {
                tracing::debug!(room = %self.id, "All votes in, closing voting");
                self.close_voting();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn in_clues(count: usize) -> Room {
        let mut room = started(count, 21);
        room.advance_phase("p1").unwrap();
        room
    }

    #[test]
    fn test_submit_clue_records_text() {
        let mut room = in_clues(3);
        room.submit_clue("p2", "furry".to_string()).unwrap();

        assert_eq!(room.player("p2").unwrap().clue.as_deref(), Some("furry"));
        assert_eq!(room.phase, Phase::Clues);
    }

    #[test]
    fn test_resubmitting_replaces_clue() {
        let mut room = in_clues(3);
        room.submit_clue("p2", "furry".to_string()).unwrap();
        room.submit_clue("p2", "loud".to_string()).unwrap();

        assert_eq!(room.player("p2").unwrap().clue.as_deref(), Some("loud"));
    }

    #[test]
    fn test_all_clues_open_voting() {
        let mut room = in_clues(3);
        room.submit_clue("p1", "a".to_string()).unwrap();
        room.submit_clue("p2", "b".to_string()).unwrap();
        assert_eq!(room.phase, Phase::Clues);

        room.submit_clue("p3", "c".to_string()).unwrap();
        assert_eq!(room.phase, Phase::Voting);
        assert!(room.all_clues_submitted());
    }

    #[test]
    fn test_clue_outside_clue_phase_fails() {
        let mut room = started(3, 21);
        let before = room.clone();

        let result = room.submit_clue("p2", "early".to_string());
        assert_eq!(
            result,
            Err(RoomError::InvalidPhase {
                action: "submit a clue",
                phase: Phase::Words
            })
        );
        assert_eq!(room, before);

        let mut room = lobby(3);
        assert!(matches!(
            room.submit_clue("p2", "early".to_string()),
            Err(RoomError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn test_clue_from_unknown_player_fails() {
        let mut room = in_clues(3);
        let result = room.submit_clue("ghost", "boo".to_string());
        assert_eq!(result, Err(RoomError::PlayerNotFound("ghost".to_string())));
    }

    #[test]
    fn test_clues_reset_for_next_round() {
        let mut room = in_clues(3);
        room.submit_clue("p1", "a".to_string()).unwrap();
        room.advance_phase("p1").unwrap(); // voting
        room.advance_phase("p1").unwrap(); // results
        room.advance_phase("p1").unwrap(); // round 2 words

        assert_eq!(room.current_round, 2);
        assert!(room.players.iter().all(|p| p.clue.is_none()));
    }
}
