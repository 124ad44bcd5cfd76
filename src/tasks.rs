use crate::registry::Registry;
use std::time::Duration;

/// Spawn a background task that periodically evicts rooms older than `ttl`
pub fn spawn_room_sweeper(registry: Registry, ttl: Duration, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let evicted = registry.evict_stale(ttl).await;
            if evicted > 0 {
                let remaining = registry.room_count().await;
                tracing::debug!(evicted, remaining, "Room sweep finished");
            }
        }
    });
}
