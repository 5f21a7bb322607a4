//! CLI Module
//!
//! Command-line interface for the Collage compositing engine. Every
//! subcommand loads a project file, runs one operation and saves it.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pixel::DEFAULT_MAX_VALUE;

/// Collage - layered image compositing
#[derive(Parser, Debug)]
#[command(name = "collage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project file
    #[command(name = "new")]
    New {
        /// Path for the new project file
        path: PathBuf,

        /// Project name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Canvas width in pixels
        #[arg(long)]
        width: usize,

        /// Canvas height in pixels
        #[arg(long)]
        height: usize,

        /// Maximum channel value
        #[arg(long, default_value_t = DEFAULT_MAX_VALUE)]
        max_value: u16,
    },

    /// Add a blank layer on top of the stack
    #[command(name = "add-layer")]
    AddLayer {
        /// Path to the project
        path: PathBuf,
        /// Name of the new layer
        layer: String,
    },

    /// Remove a layer
    #[command(name = "remove-layer")]
    RemoveLayer {
        /// Path to the project
        path: PathBuf,
        /// Layer to remove
        layer: String,
    },

    /// Set a layer's filter
    #[command(name = "set-filter")]
    SetFilter {
        /// Path to the project
        path: PathBuf,
        /// Layer to filter
        layer: String,
        /// Filter name (see `filters`)
        filter: String,
    },

    /// Place an image file on a layer
    #[command(name = "add-image")]
    AddImage {
        /// Path to the project
        path: PathBuf,
        /// Target layer
        layer: String,
        /// Image file (ppm, png, jpg)
        image: PathBuf,
        /// X coordinate of the image's top-left corner
        #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
        x: i64,
        /// Y coordinate of the image's top-left corner
        #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
        y: i64,
    },

    /// Write a layer's filter into its pixels
    #[command(name = "bake")]
    Bake {
        /// Path to the project
        path: PathBuf,
        /// Layer to bake
        layer: String,
    },

    /// Flatten the project and save it as an image
    #[command(name = "save-image")]
    SaveImage {
        /// Path to the project
        path: PathBuf,
        /// Output image (format from extension: ppm, png, jpg)
        output: PathBuf,
        /// JPEG quality (1-100)
        #[arg(long, default_value_t = 90)]
        quality: u8,
    },

    /// Print project details
    #[command(name = "info")]
    Info {
        /// Path to the project
        path: PathBuf,
    },

    /// List the available filters
    #[command(name = "filters")]
    Filters,
}
