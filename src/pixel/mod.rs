//! Pixel Module
//!
//! The RGBA colour sample every layer is made of, its derived metrics,
//! the per-pixel filter transforms and source-over merging.

mod hsl;
mod rgba;

pub use hsl::Hsl;
pub use rgba::{Pixel, DEFAULT_MAX_VALUE};

/// Row-major pixel grid: `grid[y][x]`
pub type PixelGrid = Vec<Vec<Pixel>>;
