//! Background closing of undo groups.
//!
//! A typing burst stays one undo step until the user pauses for the group
//! window. Without a timer the pause is only noticed on the next edit; this
//! task notices it on its own, so an idle editor never holds an open group.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use scribe_buffer::History;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest check period accepted; `tokio::time::interval` rejects zero.
pub const MIN_CLOSE_PERIOD: Duration = Duration::from_millis(1);

/// Spawns a task that closes `history`'s open group once it has been idle
/// for the group window. Checks every `period`.
///
/// The task only holds a weak reference and exits once the last `Arc` to
/// the history is dropped, so the handle may be dropped freely.
pub fn spawn_group_closer(history: &Arc<History>, period: Duration) -> JoinHandle<()> {
    let history: Weak<History> = Arc::downgrade(history);
    let period = period.max(MIN_CLOSE_PERIOD);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(history) = history.upgrade() else {
                tracing::trace!("history dropped, group closer exiting");
                break;
            };
            if history.close_expired(Instant::now()) {
                tracing::trace!("idle undo group closed");
            }
        }
    })
}
