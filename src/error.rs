//! Error handling for Collage
//!
//! Every failure in the core is a local, recoverable condition reported to
//! the caller. Channel clamping is never an error.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Collage operations
pub type Result<T> = std::result::Result<T, CollageError>;

/// Main error type for Collage operations
#[derive(Error, Debug)]
pub enum CollageError {
    // Filter Errors
    #[error("Invalid filter: '{name}'")]
    InvalidFilter { name: String },

    // Layer Errors
    #[error("Layer already exists: '{name}'")]
    DuplicateLayerName { name: String },

    #[error("Unknown layer: '{name}'")]
    UnknownLayer { name: String },

    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    #[error(
        "Out of bounds: {width}x{height} image at ({x}, {y}) does not fit a {layer_width}x{layer_height} layer"
    )]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
        layer_width: usize,
        layer_height: usize,
    },

    // Geometry / Pixel Errors
    #[error("Invalid dimensions: {reason}")]
    InvalidDimensions { reason: String },

    #[error("Invalid channel value: {reason}")]
    InvalidChannel { reason: String },

    // Project Lifecycle Errors
    #[error("Project has not been started")]
    NotStarted,

    #[error("Project has already been started")]
    AlreadyStarted,

    #[error("Invalid project: {reason}")]
    InvalidProject { reason: String },

    // Raster I/O Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to decode image: {reason}")]
    ImageDecode {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to encode image: {reason}")]
    ImageEncode {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CollageError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CollageError::InvalidFilter { .. } => "INVALID_FILTER",
            CollageError::DuplicateLayerName { .. } => "DUPLICATE_LAYER_NAME",
            CollageError::UnknownLayer { .. } => "UNKNOWN_LAYER",
            CollageError::InvalidName { .. } => "INVALID_NAME",
            CollageError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            CollageError::InvalidDimensions { .. } => "INVALID_DIMENSIONS",
            CollageError::InvalidChannel { .. } => "INVALID_CHANNEL",
            CollageError::NotStarted => "NOT_STARTED",
            CollageError::AlreadyStarted => "ALREADY_STARTED",
            CollageError::InvalidProject { .. } => "INVALID_PROJECT",
            CollageError::FileNotFound { .. } => "FILE_NOT_FOUND",
            CollageError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            CollageError::ImageDecode { .. } => "IMAGE_DECODE",
            CollageError::ImageEncode { .. } => "IMAGE_ENCODE",
            CollageError::Io(_) => "IO_ERROR",
            CollageError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Model-level rejections leave the project untouched, so the caller can
    /// simply retry with corrected input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            CollageError::Io(_) | CollageError::Serialization(_) | CollageError::ImageEncode { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            CollageError::InvalidFilter { .. } => vec![
                "Run 'collage-cli filters' to list the supported filter names",
                "Filter names are case-sensitive (e.g. 'brighten-luma')",
            ],
            CollageError::DuplicateLayerName { .. } => {
                vec!["Choose a layer name that is not already used in this project"]
            }
            CollageError::UnknownLayer { .. } => vec![
                "Check the layer name for typos",
                "Run 'collage-cli info <project>' to list the layers",
            ],
            CollageError::OutOfBounds { .. } => vec![
                "Use non-negative coordinates",
                "Move the image so it fits entirely on the canvas",
                "Crop or shrink the source image",
            ],
            CollageError::InvalidDimensions { .. } => {
                vec!["Width and height must both be positive"]
            }
            CollageError::NotStarted => vec!["Start a project with 'collage-cli new' first"],
            CollageError::UnsupportedFormat { .. } => vec![
                "Supported formats: PPM (P3), PNG, JPEG",
                "Check the file extension",
            ],
            CollageError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CollageError::InvalidFilter {
            name: "sepia".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_FILTER");
        assert_eq!(CollageError::NotStarted.error_code(), "NOT_STARTED");
    }

    #[test]
    fn test_model_errors_are_recoverable() {
        let err = CollageError::DuplicateLayerName {
            name: "bg".to_string(),
        };
        assert!(err.is_recoverable());
        assert!(!err.recovery_suggestions().is_empty());

        let io = CollageError::Io(std::io::Error::other("disk gone"));
        assert!(!io.is_recoverable());
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = CollageError::OutOfBounds {
            x: 3,
            y: 0,
            width: 3,
            height: 3,
            layer_width: 5,
            layer_height: 5,
        };
        assert_eq!(
            err.to_string(),
            "Out of bounds: 3x3 image at (3, 0) does not fit a 5x5 layer"
        );
    }
}
