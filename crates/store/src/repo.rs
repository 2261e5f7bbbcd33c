//! Keyed blob pool over the staging database.
//!
//! Last-write-wins by design: a document field rarely needs image history,
//! and keeping one row per reference id keeps every other operation a
//! single-statement affair.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{StagedImage, StagedRow};
use exn::ResultExt;
use sqlx::SqlitePool;
use time::UtcDateTime;
use tracing::instrument;

/// Repository for staged image blobs.
///
/// The store holds no relationship to "which document references this id";
/// that association lives in the markup being processed. Entries exist from
/// the moment they are staged until the upload workflow clears them with
/// [`delete_many`](Self::delete_many) or the reaper ages them out with
/// [`purge_older_than`](Self::purge_older_than).
#[derive(Debug, Clone)]
pub struct BlobStore {
    pool: SqlitePool,
}
impl From<&Database> for BlobStore {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl BlobStore {
    /// Create a new store over the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Staging
    // =========================================================================

    /// Insert or overwrite the entry for `reference_id`.
    ///
    /// Re-staging an existing id replaces both the blob and its timestamp;
    /// a subsequent [`get`](Self::get) never observes the old bytes.
    #[instrument(skip(self, blob), fields(blob_size = blob.len()))]
    pub async fn put(&self, reference_id: &str, blob: &[u8], staged_at: UtcDateTime) -> Result<()> {
        sqlx::query(include_str!("../queries/put_staged_image.sql"))
            .bind(reference_id)
            .bind(blob)
            .bind(staged_at.unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Get the blob staged for `reference_id`, or `None`.
    ///
    /// A missing key is a well-defined absence, never an error.
    pub async fn get(&self, reference_id: &str) -> Result<Option<Vec<u8>>> {
        sqlx::query_scalar(include_str!("../queries/get_blob.sql"))
            .bind(reference_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Get the full staged record for `reference_id`, timestamp included.
    pub async fn get_staged(&self, reference_id: &str) -> Result<Option<StagedImage>> {
        let row: Option<StagedRow> = sqlx::query_as(include_str!("../queries/get_staged_image.sql"))
            .bind(reference_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(StagedImage::try_from).transpose()
    }

    /// Count all staged entries.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_staged_images.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("row count"))
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove every listed entry in a single transaction.
    ///
    /// Intended for the upload workflow: after the blobs it gathered have
    /// been confirmed persisted remotely, it clears exactly those ids. Ids
    /// with no entry are skipped silently (already-cleared or reaped rows
    /// are not a fault of the caller). Every id has been attempted by the
    /// time this resolves; a failure to commit the batch as a whole is
    /// [`ErrorKind::Database`], and callers must not assume partial
    /// application either way.
    #[instrument(skip(self), fields(ids = reference_ids.len()))]
    pub async fn delete_many(&self, reference_ids: &[String]) -> Result<()> {
        if reference_ids.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        for reference_id in reference_ids {
            sqlx::query(include_str!("../queries/delete_staged_image.sql"))
                .bind(reference_id)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Delete every entry staged strictly before `threshold`.
    ///
    /// Entries whose timestamp equals the threshold survive (exclusive
    /// boundary). Returns the number of rows removed; zero matches is a
    /// normal outcome, not an error.
    #[instrument(skip(self))]
    pub async fn purge_older_than(&self, threshold: UtcDateTime) -> Result<u64> {
        let result = sqlx::query(include_str!("../queries/purge_older_than.sql"))
            .bind(threshold.unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected())
    }
}
