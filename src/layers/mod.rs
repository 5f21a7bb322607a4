//! Layer Model Module
//!
//! Layers and the project that stacks them:
//! - `Layer`: a named pixel grid plus its active filter
//! - `Project`: the ordered stack, canvas size and name

mod layer;
mod project;

pub use layer::Layer;
pub use project::Project;
