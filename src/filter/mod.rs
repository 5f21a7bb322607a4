//! Filter Catalog
//!
//! The fixed set of per-layer filters. Each kind maps to one pixel-level
//! transform in [`crate::pixel::Pixel::apply`].

mod kind;

pub use kind::{FilterKind, UNSUPPORTED_FILTER_NAME};
