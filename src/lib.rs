//! Collage - Layered Image Compositing
//!
//! Collage builds an image out of an ordered stack of equally-sized layers.
//! Each layer carries one filter from a fixed catalog; flattening applies
//! every filter and merges the stack bottom-to-top with source-over alpha.
//!
//! # Architecture
//!
//! - `pixel`: RGBA samples, metrics, per-pixel filters and merging
//! - `filter`: the named filter catalog
//! - `layers`: layers and the project that owns the stack
//! - `engine`: flattening and raster I/O (PPM, PNG, JPEG)
//! - `state`: project files on disk
//! - `cli`: the `collage-cli` command surface

pub mod cli;
pub mod engine;
pub mod error;
pub mod filter;
pub mod layers;
pub mod pixel;
pub mod state;

pub use engine::{
    decode_ppm, encode_ppm, export_image, import_image, CompositingEngine, ExportOptions,
};
pub use error::{CollageError, Result};
pub use filter::FilterKind;
pub use layers::{Layer, Project};
pub use pixel::{Pixel, PixelGrid, DEFAULT_MAX_VALUE};
