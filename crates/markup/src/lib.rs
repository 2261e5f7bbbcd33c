//! Placeholder scanning and blob gathering over editor markup.
//!
//! A document's HTML refers to images indirectly: each placeholder is an
//! `img` element carrying a [`REFERENCE_ATTR`] attribute naming a staged
//! blob. This crate finds those placeholders and, for the save workflow,
//! resolves them against the staging store into an upload payload.
//!
//! Everything here is a pure read; nothing mutates the markup or the store.

mod consts;
mod gather;
mod scan;

pub use crate::consts::REFERENCE_ATTR;
pub use crate::gather::{GatheredImage, gather};
pub use crate::scan::placeholder_refs;
