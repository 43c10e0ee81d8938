//! Durable, named cookie storage with automatic expiry-driven deletion.

pub mod retention;

pub use retention::RetentionTimer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// A single browser cookie, as captured from the automated browser and as
/// replayed back into a fresh instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Epoch seconds; session cookies carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

fn default_path() -> String {
    "/".to_string()
}

/// Persists named cookie sets on disk, one pretty-printed JSON file per name.
/// Every save schedules deletion of the entry after the retention window.
///
/// There is no locking: concurrent saves under the same name are
/// last-writer-wins, which the sequential login-then-verify flow tolerates.
#[derive(Clone, Debug)]
pub struct CookieJar {
    dir: PathBuf,
    retention: Duration,
    timer: RetentionTimer,
}

impl CookieJar {
    #[must_use]
    pub fn new(dir: PathBuf, retention: Duration, timer: RetentionTimer) -> Self {
        Self {
            dir,
            retention,
            timer,
        }
    }

    /// Persist `cookies` under `name`, superseding any previous entry, and
    /// schedule the entry's deletion. Failures are logged, never raised.
    pub async fn save(&self, cookies: &[Cookie], name: &str) -> bool {
        let path = self.entry_path(name);
        match write_entry(&path, cookies).await {
            Ok(()) => {
                info!("Cookies saved to {}", path.display());
                self.timer.schedule(path, self.retention);
                true
            }
            Err(err) => {
                error!("Error saving cookies to {}: {err}", path.display());
                false
            }
        }
    }

    /// Read the entry under `name`; absent or unreadable entries yield an
    /// empty sequence.
    pub async fn load(&self, name: &str) -> Vec<Cookie> {
        let path = self.entry_path(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("Cookies file not found: {}", path.display());
                return Vec::new();
            }
            Err(err) => {
                error!("Error loading cookies from {}: {err}", path.display());
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(cookies) => {
                info!("Cookies loaded from {}", path.display());
                cookies
            }
            Err(err) => {
                error!("Error loading cookies from {}: {err}", path.display());
                Vec::new()
            }
        }
    }

    /// Jar names come from caller-supplied logins; each maps to exactly one
    /// flat file inside the jar directory.
    fn entry_path(&self, name: &str) -> PathBuf {
        let safe: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

async fn write_entry(path: &Path, cookies: &[Cookie]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    // serde_json writes UTF-8 and leaves non-ASCII untouched.
    let json = serde_json::to_vec_pretty(cookies)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
