//! Blob gathering for the save workflow.

use crate::scan::placeholder_refs;
use inkstage_store::BlobStore;
use tracing::{debug, instrument, warn};

/// A placeholder's reference id paired with its staged blob, ready for the
/// upload payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatheredImage {
    pub reference_id: String,
    pub blob: Vec<u8>,
}

/// Resolve every placeholder in `markup` to its staged blob.
///
/// Output preserves the order placeholders appear in the markup. Each blob
/// is exactly what was last staged for that id at lookup time; there is no
/// snapshot isolation beyond the single lookup per id.
///
/// Placeholders with no staged entry are skipped: that is the expected
/// case for images already persisted server-side and never staged locally.
/// A store failure on an individual lookup is likewise treated as absent;
/// gathering is a best-effort read and the caller gets whatever could be
/// resolved. No side effects on the store.
#[instrument(skip(store, markup), fields(markup_size = markup.len()))]
pub async fn gather(store: &BlobStore, markup: &str) -> Vec<GatheredImage> {
    let refs = placeholder_refs(markup);
    let mut gathered = Vec::with_capacity(refs.len());
    for reference_id in refs {
        match store.get(&reference_id).await {
            Ok(Some(blob)) => gathered.push(GatheredImage { reference_id, blob }),
            Ok(None) => debug!(%reference_id, "placeholder has no staged blob, skipping"),
            Err(error) => warn!(%reference_id, %error, "staged blob lookup failed, treating as absent"),
        }
    }
    gathered
}
