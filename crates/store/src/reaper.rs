//! Age-based expiry for abandoned staged blobs.
//!
//! Staged entries that were never uploaded (abandoned edits, crashed
//! sessions) would otherwise accumulate forever. The reaper is a
//! cleanliness pass, not a safety mechanism: a missed or delayed run only
//! means temporarily higher storage use.

use crate::BlobStore;
use crate::error::Result;
use time::{Duration, UtcDateTime};
use tracing::{info, instrument, warn};

/// How long a staged blob survives without being re-staged.
///
/// Roughly two days: long enough to ride out an offline weekend edit,
/// short enough that abandoned drafts don't pin storage.
pub const RETENTION_WINDOW: Duration = Duration::hours(48);

/// Periodically purges staged entries older than the retention window.
///
/// Runs independently of any document lifecycle. Entries staged while a
/// scan is in flight may or may not be visited by that scan; either is
/// fine, since a freshly staged entry cannot yet be expired.
#[derive(Debug, Clone)]
pub struct Reaper {
    store: BlobStore,
    retention: Duration,
}

impl Reaper {
    /// Create a reaper with the default 48-hour retention window.
    pub fn new(store: BlobStore) -> Self {
        Self { store, retention: RETENTION_WINDOW }
    }

    /// Override the retention window.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Purge entries whose age exceeds the retention window as of `now`.
    ///
    /// Returns the number of entries removed. An entry aged exactly the
    /// retention window survives until the next pass (the purge threshold
    /// is exclusive).
    #[instrument(skip(self))]
    pub async fn purge_expired_at(&self, now: UtcDateTime) -> Result<u64> {
        let removed = self.store.purge_older_than(now - self.retention).await?;
        if removed > 0 {
            info!(removed, "reaped expired staged images");
        }
        Ok(removed)
    }

    /// Purge entries whose age exceeds the retention window right now.
    pub async fn purge_expired(&self) -> Result<u64> {
        self.purge_expired_at(UtcDateTime::now()).await
    }

    /// Run the reaper on a fixed period until the task is dropped.
    ///
    /// A failed pass is logged and the loop continues; correctness never
    /// depends on any individual pass completing.
    pub async fn run(self, period: std::time::Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(error) = self.purge_expired().await {
                warn!(%error, "reaper pass failed, will retry next period");
            }
        }
    }
}
