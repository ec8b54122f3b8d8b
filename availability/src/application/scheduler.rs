//! Fixed-delay driver for the overdue lock sweep.
//!
//! The sweep itself is synchronous; this loop only decides when it runs. A
//! new sweep starts `interval` after the previous one finished, so sweeps
//! never overlap.

use crate::application::overdue::OverdueLockHandling;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Run `handling.unlock_overdue()` every `interval` until `shutdown` fires
/// (or its sender is dropped).
///
/// Returns the total number of locks released.
pub async fn run_overdue_sweeps(
    handling: Arc<OverdueLockHandling>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> usize {
    let mut released = 0;

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!(released, "Overdue lock sweeper stopping");
                return released;
            }
            () = tokio::time::sleep(interval) => {
                released += handling.unlock_overdue();
            }
        }
    }
}
