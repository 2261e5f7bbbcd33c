//! SQLite staging store for editor image blobs.
//!
//! This crate provides the durable local pool that lets a rich-text editor
//! keep working without the network: images a user inserts (or that were
//! pulled down from the server once) are staged here, keyed by an opaque
//! caller-assigned reference id, until the save workflow uploads them or
//! the reaper ages them out.
//!
//! # Architecture
//! - [`Database`]: connection pool, pragmas, embedded migrations. One per
//!   client session; the idempotent open operation.
//! - [`BlobStore`]: the keyed blob pool (put / get / batch delete / purge).
//!   Last-write-wins on re-stage, no history.
//! - [`Reaper`]: age-based expiry, default 48-hour retention.
//!
//! The store is not the source of truth: anything that matters has either
//! been uploaded by the save workflow or can be re-fetched from the server
//! manifest. Deleting the database file loses only unsaved staged edits.

mod db;
pub mod error;
mod models;
mod reaper;
mod repo;

pub use crate::db::Database;
pub use crate::models::StagedImage;
pub use crate::reaper::{RETENTION_WINDOW, Reaper};
pub use crate::repo::BlobStore;
