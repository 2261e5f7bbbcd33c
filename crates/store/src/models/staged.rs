use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use time::UtcDateTime;

/// A staged image blob: the unit of persistence.
///
/// Keyed by a caller-assigned opaque `reference_id`, not a content hash, so
/// the same logical image slot in a document keeps one stable identity
/// across edits even when its bytes change. Re-staging the same id replaces
/// the prior entry and its timestamp; there is no history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    /// Caller-assigned opaque identifier, unique within the store.
    pub reference_id: String,
    /// Raw image payload. Opaque to the store.
    pub blob: Vec<u8>,
    /// Wall-clock time of insertion or last re-staging. Only the reaper
    /// reads this.
    pub staged_at: UtcDateTime,
}

#[derive(sqlx::FromRow)]
pub(crate) struct StagedRow {
    pub(crate) reference_id: String,
    pub(crate) blob: Vec<u8>,
    pub(crate) staged_at: i64,
}

impl TryFrom<StagedRow> for StagedImage {
    type Error = Error;
    fn try_from(row: StagedRow) -> Result<Self, Self::Error> {
        Ok(Self {
            reference_id: row.reference_id,
            blob: row.blob,
            staged_at: UtcDateTime::from_unix_timestamp(row.staged_at)
                .or_raise(|| ErrorKind::InvalidData("staging date"))?,
        })
    }
}
