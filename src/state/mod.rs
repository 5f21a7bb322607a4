//! State Management Module
//!
//! Project persistence: the on-disk manifest and load/save helpers.

pub mod manifest;
pub mod storage;

pub use manifest::{LayerManifest, ProjectManifest, CURRENT_FORMAT_VERSION};
pub use storage::{load_project, read_manifest, save_project};
