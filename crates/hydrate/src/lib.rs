//! Pull server images into the staging store and bind them to placeholders.
//!
//! When an existing document is opened, the load workflow hands this crate
//! the server's image manifest (reference id + retrieval URL per image) and
//! the document markup. Hydration runs in two strict phases: fetch and
//! stage every advertised image, then resolve every placeholder to either
//! its staged bytes or an explicit broken marker. The caller gets back a
//! binding list to apply to its own render target; this crate never touches
//! a live document tree.

pub mod error;
mod fetch;
mod hydrate;

pub use crate::fetch::{ImageFetch, MockFetch};
pub use crate::hydrate::{Binding, ImageSource, ServerImageRef, hydrate};
