//! The two-phase hydration protocol.

use crate::error::{ErrorKind, Result};
use crate::fetch::ImageFetch;
use inkstage_markup::placeholder_refs;
use inkstage_store::BlobStore;
use time::UtcDateTime;
use tracing::{debug, instrument, warn};

/// The server's advertisement of an image the client does not yet have
/// locally: which placeholder it belongs to, and where to get the bytes.
/// Supplied by the load workflow; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerImageRef {
    pub reference_id: String,
    pub url: String,
}

/// What a placeholder should display after hydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// The staged bytes for this placeholder.
    Blob(Vec<u8>),
    /// No staged bytes exist (the fetch failed, or the id was evicted and
    /// is unknown to the server). The renderer must show an explicit
    /// broken-image indicator, never a silent blank: data loss should be
    /// visible.
    Broken,
}

/// One placeholder's resolved visual source, for an external renderer to
/// apply. Returned in the order placeholders appear in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub reference_id: String,
    pub source: ImageSource,
}

impl Binding {
    /// Whether this placeholder resolved to staged bytes.
    pub fn is_resolved(&self) -> bool {
        matches!(self.source, ImageSource::Blob(_))
    }
}

/// Pull server images into the staging store, then resolve every
/// placeholder in `markup` to a visual source.
///
/// Phase 1 attempts a fetch for every ref in `server_refs`; successes are
/// staged under their reference id with the current time, failures are
/// logged and skipped. Phase 2 begins only once every ref has been
/// attempted, so rendering never races the staging of the document's own
/// images. Placeholders with no staged entry after phase 1 come back as
/// [`ImageSource::Broken`].
///
/// Hydration is idempotent per reference id: re-hydrating a document whose
/// images are already staged re-fetches and overwrites. That costs a
/// redundant network call and is deliberate; the staged copy can never go
/// stale relative to the server manifest.
///
/// # Errors
///
/// Fetch failures never fail the call. A staging-store failure does: a
/// write that cannot be staged, or a lookup the store refuses to answer,
/// surfaces as [`ErrorKind::Storage`].
#[instrument(skip_all, fields(refs = server_refs.len(), markup_size = markup.len()))]
pub async fn hydrate(
    store: &BlobStore,
    fetcher: &dyn ImageFetch,
    markup: &str,
    server_refs: &[ServerImageRef],
) -> Result<Vec<Binding>> {
    // Phase 1: fetch and stage. Every ref is attempted before any
    // placeholder is resolved.
    for server_ref in server_refs {
        match fetcher.fetch(&server_ref.url).await {
            Ok(blob) => {
                store
                    .put(&server_ref.reference_id, &blob, UtcDateTime::now())
                    .await
                    .map_err(ErrorKind::storage)?;
                debug!(reference_id = %server_ref.reference_id, "staged server image");
            }
            Err(error) => {
                warn!(
                    reference_id = %server_ref.reference_id,
                    url = %server_ref.url,
                    %error,
                    "image fetch failed, placeholder will render broken",
                );
            }
        }
    }

    // Phase 2: resolve placeholders against whatever is now staged.
    let mut bindings = Vec::new();
    for reference_id in placeholder_refs(markup) {
        let source = match store.get(&reference_id).await.map_err(ErrorKind::storage)? {
            Some(blob) => ImageSource::Blob(blob),
            None => ImageSource::Broken,
        };
        bindings.push(Binding { reference_id, source });
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetch;
    use inkstage_store::Database;

    async fn store() -> (Database, BlobStore) {
        let db = Database::connect_in_memory().await.unwrap();
        let store = BlobStore::from(&db);
        (db, store)
    }

    fn server_ref(reference_id: &str, url: &str) -> ServerImageRef {
        ServerImageRef { reference_id: reference_id.to_string(), url: url.to_string() }
    }

    #[tokio::test]
    async fn test_hydrate_stages_and_binds_server_images() {
        let (_db, store) = store().await;
        let fetcher = MockFetch::with_responses([("https://srv.test/images/x", b"x bytes".as_slice())]);
        let markup = r#"<img data-image-ref="x">"#;

        let bindings = hydrate(&store, &fetcher, markup, &[server_ref("x", "https://srv.test/images/x")])
            .await
            .unwrap();
        assert_eq!(
            bindings,
            [Binding { reference_id: "x".to_string(), source: ImageSource::Blob(b"x bytes".to_vec()) }]
        );
        // The blob is staged for later gather/offline use, not just bound.
        assert_eq!(store.get("x").await.unwrap(), Some(b"x bytes".to_vec()));
    }

    #[tokio::test]
    async fn test_failed_fetch_marks_only_that_placeholder_broken() {
        let (_db, store) = store().await;
        // "y" has no configured response, so its fetch fails.
        let fetcher = MockFetch::with_responses([("https://srv.test/images/x", b"x bytes".as_slice())]);
        let markup = r#"<img data-image-ref="x"><img data-image-ref="y">"#;
        let refs =
            [server_ref("x", "https://srv.test/images/x"), server_ref("y", "https://srv.test/images/y")];

        let bindings = hydrate(&store, &fetcher, markup, &refs).await.unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].reference_id, "x");
        assert!(bindings[0].is_resolved());
        assert_eq!(bindings[1].reference_id, "y");
        assert_eq!(bindings[1].source, ImageSource::Broken);
        // Only the successful fetch was staged.
        assert!(store.get("x").await.unwrap().is_some());
        assert!(store.get("y").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_placeholder_unknown_to_server_renders_broken() {
        let (_db, store) = store().await;
        // A client-side id that was staged once, evicted since, and is not
        // in the server manifest.
        let markup = r#"<img data-image-ref="evicted">"#;
        let bindings = hydrate(&store, &MockFetch::default(), markup, &[]).await.unwrap();
        assert_eq!(
            bindings,
            [Binding { reference_id: "evicted".to_string(), source: ImageSource::Broken }]
        );
    }

    #[tokio::test]
    async fn test_rehydration_overwrites_staged_bytes() {
        let (_db, store) = store().await;
        store
            .put("x", b"stale bytes", UtcDateTime::from_unix_timestamp(1_000).unwrap())
            .await
            .unwrap();
        let fetcher = MockFetch::with_responses([("https://srv.test/images/x", b"fresh bytes".as_slice())]);
        let markup = r#"<img data-image-ref="x">"#;

        let bindings = hydrate(&store, &fetcher, markup, &[server_ref("x", "https://srv.test/images/x")])
            .await
            .unwrap();
        assert_eq!(bindings[0].source, ImageSource::Blob(b"fresh bytes".to_vec()));
        assert_eq!(store.get("x").await.unwrap(), Some(b"fresh bytes".to_vec()));
        // The restage also refreshed the timestamp.
        let staged = store.get_staged("x").await.unwrap().unwrap();
        assert!(staged.staged_at.unix_timestamp() > 1_000);
    }

    #[tokio::test]
    async fn test_fetched_images_without_placeholders_stay_staged() {
        let (_db, store) = store().await;
        // Hydration abandoned half-way is modeled by a manifest entry whose
        // placeholder is no longer in the markup: the staged bytes remain
        // for a later retry or the reaper.
        let fetcher = MockFetch::with_responses([("https://srv.test/images/orphan", b"bytes".as_slice())]);
        let bindings = hydrate(&store, &fetcher, "<p>no images</p>", &[server_ref("orphan", "https://srv.test/images/orphan")])
            .await
            .unwrap();
        assert!(bindings.is_empty());
        assert!(store.get("orphan").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_staging_failure_during_fetch_phase_propagates() {
        let (db, store) = store().await;
        // The fetch itself succeeds; staging its result cannot, because
        // the pool is closed. Unlike a fetch failure, this surfaces.
        db.close().await;
        let fetcher = MockFetch::with_responses([("https://srv.test/images/x", b"x bytes".as_slice())]);
        let err = hydrate(&store, &fetcher, "", &[server_ref("x", "https://srv.test/images/x")])
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::Storage(_)));
    }

    #[tokio::test]
    async fn test_render_lookup_failure_propagates() {
        let (db, store) = store().await;
        db.close().await;
        // No refs to fetch; the failure comes from the phase-2 lookup.
        let err = hydrate(&store, &MockFetch::default(), r#"<img data-image-ref="x">"#, &[])
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::Storage(_)));
    }

    #[tokio::test]
    async fn test_all_fetches_fail_still_binds_every_placeholder() {
        let (_db, store) = store().await;
        let markup = r#"<img data-image-ref="a"><img data-image-ref="b">"#;
        let refs = [server_ref("a", "https://srv.test/a"), server_ref("b", "https://srv.test/b")];
        let bindings = hydrate(&store, &MockFetch::default(), markup, &refs).await.unwrap();
        assert_eq!(bindings.len(), 2);
        assert!(bindings.iter().all(|b| b.source == ImageSource::Broken));
    }
}
