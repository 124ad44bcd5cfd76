//! Deferred phase transitions (word reveal window, results pause).
//!
//! Timers are never cancelled. Each one remembers the phase instance it was
//! scheduled for and does nothing if the room has moved on by the time it
//! fires.

use super::{Registry, RoomHandle};
use crate::types::{Phase, Room};
use std::sync::Arc;
use std::time::Duration;

impl Registry {
    /// How long `phase` waits before advancing on its own, if at all
    fn phase_delay(&self, phase: Phase) -> Option<Duration> {
        let delay = match phase {
            Phase::Words => self.timers.reveal,
            Phase::Results => self.timers.results,
            _ => return None,
        };
        (!delay.is_zero()).then_some(delay)
    }

    /// Schedule the timer for the room's current phase. Must be called with
    /// the room locked, right after it entered that phase.
    pub(super) fn schedule_phase_timer(&self, handle: &RoomHandle, room: &mut Room) {
        let Some(delay) = self.phase_delay(room.phase) else {
            return;
        };

        let stamp = room.phase_stamp();
        room.phase_deadline = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| chrono::Utc::now().checked_add_signed(d))
            .map(|deadline| deadline.to_rfc3339());

        tracing::debug!(
            room = %room.id,
            phase = %room.phase,
            delay_ms = delay.as_millis() as u64,
            "Scheduled phase timer"
        );

        let registry = self.clone();
        let handle = Arc::clone(handle);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut room = handle.lock().await;
            if room.expire_phase(&stamp) {
                tracing::info!(room = %room.id, phase = %room.phase, "Phase timer advanced room");
                registry.schedule_phase_timer(&handle, &mut room);
            } else {
                tracing::debug!(
                    room = %room.id,
                    scheduled_for = %stamp.phase,
                    "Ignoring stale phase timer"
                );
            }
        });
    }
}
