use super::Registry;
use crate::error::RoomResult;
use crate::room::LeaveOutcome;
use crate::types::*;

/// Outcome of a leave request
#[derive(Debug, Clone, PartialEq)]
pub enum LeaveResult {
    /// The room lives on (also returned if the player was not in it)
    Left(Room),
    /// The room is gone: its last player left, or it did not exist
    RoomDeleted,
}

impl Registry {
    /// Lock the room, run one engine operation and return the committed
    /// snapshot. Schedules a phase timer when the operation entered a new
    /// phase instance.
    async fn apply<F>(&self, code: &str, op: F) -> RoomResult<Room>
    where
        F: FnOnce(&mut Room) -> RoomResult<()>,
    {
        let handle = self.handle(code).await?;
        let mut room = handle.lock().await;

        let before = room.phase_stamp();
        op(&mut room)?;
        if room.phase_stamp() != before {
            self.schedule_phase_timer(&handle, &mut room);
        }
        Ok(room.clone())
    }

    pub async fn create_room(&self, host_id: &str, host_name: String) -> RoomResult<Room> {
        let room = self.insert_new_room(host_id, host_name).await?;
        tracing::info!(room = %room.id, host = host_id, "Room created");
        Ok(room)
    }

    pub async fn join_room(&self, code: &str, player_id: &str, name: String) -> RoomResult<Room> {
        let room = self.apply(code, |room| room.join(player_id, name)).await?;
        tracing::info!(
            room = code,
            player = player_id,
            players = room.players.len(),
            "Player joined"
        );
        Ok(room)
    }

    /// Remove a player. Leaving a room that does not exist is not an error.
    pub async fn leave_room(&self, code: &str, player_id: &str) -> LeaveResult {
        let Ok(handle) = self.handle(code).await else {
            tracing::debug!(room = code, player = player_id, "Leave for unknown room");
            return LeaveResult::RoomDeleted;
        };

        let (outcome, snapshot) = {
            let mut room = handle.lock().await;
            let before = room.phase_stamp();
            let outcome = room.leave(player_id);
            if outcome == LeaveOutcome::Left && room.phase_stamp() != before {
                self.schedule_phase_timer(&handle, &mut room);
            }
            (outcome, room.clone())
        };

        match outcome {
            LeaveOutcome::Emptied => self.drop_emptied_room(code).await,
            LeaveOutcome::Left => {
                tracing::info!(room = code, player = player_id, "Player left");
                LeaveResult::Left(snapshot)
            }
            LeaveOutcome::NotInRoom => LeaveResult::Left(snapshot),
        }
    }

    /// Called once the last player left. If someone joined in the meantime
    /// the room stays and is reported as it is now.
    async fn drop_emptied_room(&self, code: &str) -> LeaveResult {
        if self.remove_if_empty(code).await {
            return LeaveResult::RoomDeleted;
        }
        match self.get_room(code).await {
            Ok(room) => LeaveResult::Left(room),
            Err(_) => LeaveResult::RoomDeleted,
        }
    }

    pub async fn start_game(&self, code: &str, player_id: &str) -> RoomResult<Room> {
        self.apply(code, |room| {
            room.start_game(player_id, &self.catalog, &mut rand::rng())
        })
        .await
    }

    pub async fn submit_clue(
        &self,
        code: &str,
        player_id: &str,
        clue: String,
    ) -> RoomResult<Room> {
        self.apply(code, |room| room.submit_clue(player_id, clue)).await
    }

    pub async fn submit_vote(
        &self,
        code: &str,
        player_id: &str,
        target_id: &str,
    ) -> RoomResult<Room> {
        self.apply(code, |room| room.submit_vote(player_id, target_id)).await
    }

    pub async fn advance_phase(&self, code: &str, player_id: &str) -> RoomResult<Room> {
        self.apply(code, |room| room.advance_phase(player_id)).await
    }

    pub async fn new_game(&self, code: &str, player_id: &str) -> RoomResult<Room> {
        self.apply(code, |room| room.new_game(player_id)).await
    }

    /// Read-only snapshot
    pub async fn get_room(&self, code: &str) -> RoomResult<Room> {
        let handle = self.handle(code).await?;
        let room = handle.lock().await;
        Ok(room.clone())
    }
}
