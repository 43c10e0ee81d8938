//! Deletion timers for persisted cookie jar entries.

use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Schedules deletion of a jar entry once its retention window elapses.
///
/// Individual timers are fire-and-forget, but all of them park on a shared
/// shutdown signal so a graceful shutdown cancels every pending deletion
/// instead of leaving tasks behind the runtime's back.
#[derive(Clone, Debug)]
pub struct RetentionTimer {
    shutdown: watch::Sender<bool>,
}

impl RetentionTimer {
    #[must_use]
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self { shutdown }
    }

    /// Delete the file at `path` after `after`, unless the timer service is
    /// shut down first. Not cancellable per entry.
    pub fn schedule(&self, path: PathBuf, after: Duration) {
        let mut rx = self.shutdown.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                () = sleep(after) => match tokio::fs::remove_file(&path).await {
                    Ok(()) => info!(
                        "Cookie file {} deleted after {}s retention",
                        path.display(),
                        after.as_secs()
                    ),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => error!("Error deleting cookie file {}: {err}", path.display()),
                },
                _ = rx.changed() => {
                    debug!("Retention timer for {} cancelled", path.display());
                }
            }
        });
    }

    /// Cancel every pending deletion. Called once, on process shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}

impl Default for RetentionTimer {
    fn default() -> Self {
        Self::new()
    }
}
