//! Layer
//!
//! A named, fixed-size grid of pixels plus the filter to apply when the
//! stack is flattened. Filters are recorded, not baked: the stored grid
//! only changes through image placement (or an explicit bake).

use crate::error::{CollageError, Result};
use crate::filter::FilterKind;
use crate::pixel::{Pixel, PixelGrid};

/// A single layer in a collage project
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    width: usize,
    height: usize,
    max_value: u16,
    grid: PixelGrid,
    filter: FilterKind,
}

impl Layer {
    /// Create a blank layer filled with fully transparent white
    ///
    /// # Errors
    /// * `InvalidName` - If `name` is empty
    /// * `InvalidDimensions` - If `width` or `height` is zero
    pub fn new(name: &str, width: usize, height: usize, max_value: u16) -> Result<Self> {
        validate_name(name)?;
        validate_dimensions(width, height)?;
        let blank = Pixel::transparent_white(max_value);
        Ok(Self {
            name: name.to_string(),
            width,
            height,
            max_value: blank.max_value(),
            grid: vec![vec![blank; width]; height],
            filter: FilterKind::Normal,
        })
    }

    /// Build a layer from an existing grid
    ///
    /// The grid must have exactly `height` rows of `width` pixels, all
    /// sharing one channel ceiling.
    pub fn from_pixels(name: &str, pixels: PixelGrid, height: usize, width: usize) -> Result<Self> {
        validate_name(name)?;
        validate_dimensions(width, height)?;
        if pixels.len() != height {
            return Err(CollageError::InvalidDimensions {
                reason: format!("expected {} rows, got {}", height, pixels.len()),
            });
        }
        if let Some((y, row)) = pixels.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(CollageError::InvalidDimensions {
                reason: format!("row {} has {} pixels, expected {}", y, row.len(), width),
            });
        }

        let max_value = pixels[0][0].max_value();
        if pixels.iter().flatten().any(|p| p.max_value() != max_value) {
            return Err(CollageError::InvalidChannel {
                reason: "pixels in a layer must share one max value".to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            width,
            height,
            max_value,
            grid: pixels,
            filter: FilterKind::Normal,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// The filter applied at flatten time
    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    /// Raw (unfiltered) pixels, row-major
    pub fn pixels(&self) -> &PixelGrid {
        &self.grid
    }

    /// Raw pixel at `(x, y)`, if inside the layer
    pub fn pixel_at(&self, x: usize, y: usize) -> Option<Pixel> {
        self.grid.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Record the filter to apply at flatten time
    pub fn with_filter(mut self, kind: FilterKind) -> Self {
        self.filter = kind;
        self
    }

    pub fn set_filter(&mut self, kind: FilterKind) {
        self.filter = kind;
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Overwrite the region starting at `(x, y)` with `source`
    ///
    /// Pixels from a source with a different channel ceiling are rescaled to
    /// this layer's. The write is all-or-nothing.
    ///
    /// # Errors
    /// * `InvalidDimensions` - If `source` is empty or ragged
    /// * `OutOfBounds` - If any part of `source` would fall outside the layer
    pub fn place_image(&mut self, source: &[Vec<Pixel>], x: i64, y: i64) -> Result<()> {
        let source_height = source.len();
        let source_width = source.first().map_or(0, Vec::len);
        if source_width == 0 {
            return Err(CollageError::InvalidDimensions {
                reason: "source image is empty".to_string(),
            });
        }
        if source.iter().any(|row| row.len() != source_width) {
            return Err(CollageError::InvalidDimensions {
                reason: "source image rows differ in length".to_string(),
            });
        }

        let fits = x >= 0
            && y >= 0
            && x as usize + source_width <= self.width
            && y as usize + source_height <= self.height;
        if !fits {
            return Err(CollageError::OutOfBounds {
                x,
                y,
                width: source_width,
                height: source_height,
                layer_width: self.width,
                layer_height: self.height,
            });
        }

        let (x, y) = (x as usize, y as usize);
        for (dy, row) in source.iter().enumerate() {
            let target = &mut self.grid[y + dy][x..x + source_width];
            for (dst, src) in target.iter_mut().zip(row) {
                *dst = src.rescale(self.max_value);
            }
        }
        Ok(())
    }

    /// Filtered pixel at `(x, y)`, reading blend modes against `below`
    pub fn effective_pixel_at(&self, x: usize, y: usize, below: Option<&Layer>) -> Option<Pixel> {
        let pixel = self.pixel_at(x, y)?;
        let under = below.and_then(|layer| layer.pixel_at(x, y));
        Some(pixel.apply(self.filter, under))
    }

    /// The whole grid with this layer's filter applied
    pub fn effective_grid(&self, below: Option<&Layer>) -> PixelGrid {
        self.grid
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, pixel)| {
                        let under = below.and_then(|layer| layer.pixel_at(x, y));
                        pixel.apply(self.filter, under)
                    })
                    .collect()
            })
            .collect()
    }

    /// Replace the stored grid with its filtered form and reset to `Normal`
    pub(crate) fn bake(&mut self, below: Option<&Layer>) {
        self.grid = self.effective_grid(below);
        self.filter = FilterKind::Normal;
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CollageError::InvalidName {
            reason: "name must not be empty".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn validate_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(CollageError::InvalidDimensions {
            reason: format!("{}x{} (both must be positive)", width, height),
        });
    }
    Ok(())
}
