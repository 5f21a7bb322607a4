//! Compositing Engine
//!
//! Flattens a layer stack (index 0 = bottom) into a single layer.
//!
//! The running composite starts as the bottom layer's filtered pixels.
//! Each higher layer is filtered against the *raw* layer directly beneath
//! it, then merged source-over onto the composite.

use log::debug;

use crate::error::{CollageError, Result};
use crate::layers::Layer;

/// Flattens layer stacks for one canvas size and channel ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositingEngine {
    width: usize,
    height: usize,
    max_value: u16,
}

impl CompositingEngine {
    pub fn new(width: usize, height: usize, max_value: u16) -> Self {
        Self {
            width,
            height,
            max_value,
        }
    }

    /// Flatten `layers` into one layer named `output_name`
    ///
    /// An empty stack yields a blank (transparent white) canvas. A single
    /// layer yields its filtered pixels with no merge.
    ///
    /// # Errors
    /// `InvalidProject` if any layer does not match this engine's canvas.
    pub fn flatten(&self, layers: &[Layer], output_name: &str) -> Result<Layer> {
        for layer in layers {
            self.check_layer(layer)?;
        }

        let Some(bottom) = layers.first() else {
            debug!("Flattening empty stack into blank '{}'", output_name);
            return Layer::new(output_name, self.width, self.height, self.max_value);
        };

        let mut accumulated = bottom.effective_grid(None);

        for pair in layers.windows(2) {
            let (below, layer) = (&pair[0], &pair[1]);
            debug!(
                "Compositing '{}' ({}) over '{}'",
                layer.name(),
                layer.filter(),
                below.name()
            );

            let rows = accumulated
                .iter_mut()
                .zip(layer.pixels())
                .zip(below.pixels());
            for ((acc_row, top_row), below_row) in rows {
                for ((acc, top), under) in acc_row.iter_mut().zip(top_row).zip(below_row) {
                    let effective = top.apply(layer.filter(), Some(*under));
                    *acc = effective.merge(acc);
                }
            }
        }

        debug!(
            "Flattened {} layers into '{}' ({}x{})",
            layers.len(),
            output_name,
            self.width,
            self.height
        );
        Layer::from_pixels(output_name, accumulated, self.height, self.width)
    }

    fn check_layer(&self, layer: &Layer) -> Result<()> {
        if layer.width() != self.width || layer.height() != self.height {
            return Err(CollageError::InvalidProject {
                reason: format!(
                    "layer '{}' is {}x{}, canvas is {}x{}",
                    layer.name(),
                    layer.width(),
                    layer.height(),
                    self.width,
                    self.height
                ),
            });
        }
        if layer.max_value() != self.max_value {
            return Err(CollageError::InvalidProject {
                reason: format!(
                    "layer '{}' has max value {}, canvas uses {}",
                    layer.name(),
                    layer.max_value(),
                    self.max_value
                ),
            });
        }
        Ok(())
    }
}
