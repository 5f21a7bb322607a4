//! Compositing Engine Module
//!
//! Core image processing:
//! - Layer stack flattening
//! - Raster file I/O (PPM natively, PNG/JPEG via `image`)

pub mod compositor;
pub mod io;

pub use compositor::CompositingEngine;
pub use io::{decode_ppm, encode_ppm, export_image, import_image, ExportOptions, RasterFormat};
