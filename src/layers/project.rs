//! Project Container
//!
//! Owns the ordered layer stack (index 0 is the bottom), the canvas size,
//! and the project name. Nothing can be done to a project until it has
//! been started.

use log::{debug, info};

use super::layer::{validate_dimensions, validate_name, Layer};
use crate::engine::CompositingEngine;
use crate::error::{CollageError, Result};
use crate::filter::FilterKind;
use crate::pixel::{Pixel, PixelGrid, DEFAULT_MAX_VALUE};

/// State fixed when a project is started
#[derive(Debug, Clone)]
struct Canvas {
    name: String,
    width: usize,
    height: usize,
    max_value: u16,
    layers: Vec<Layer>,
}

impl Canvas {
    fn position(&self, layer_name: &str) -> Result<usize> {
        self.layers
            .iter()
            .position(|l| l.name() == layer_name)
            .ok_or_else(|| CollageError::UnknownLayer {
                name: layer_name.to_string(),
            })
    }
}

/// A layered collage project
#[derive(Debug, Clone, Default)]
pub struct Project {
    canvas: Option<Canvas>,
}

impl Project {
    /// Create a project that has not been started yet
    pub fn new() -> Self {
        Self { canvas: None }
    }

    /// Create and start a fresh project in one step
    pub fn started(name: &str, height: usize, width: usize) -> Result<Self> {
        let mut project = Self::new();
        project.start_project(name, height, width)?;
        Ok(project)
    }

    /// Start a fresh project with no layers and the default channel ceiling
    ///
    /// # Errors
    /// * `AlreadyStarted` - If this project was started before
    /// * `InvalidName` - If `name` is empty
    /// * `InvalidDimensions` - If `height` or `width` is zero
    pub fn start_project(&mut self, name: &str, height: usize, width: usize) -> Result<()> {
        self.start_project_with_max(name, height, width, DEFAULT_MAX_VALUE)
    }

    /// Start a fresh project with an explicit channel ceiling
    pub fn start_project_with_max(
        &mut self,
        name: &str,
        height: usize,
        width: usize,
        max_value: u16,
    ) -> Result<()> {
        self.start(name, Vec::new(), height, width, max_value)
    }

    /// Start a project from a pre-built layer stack (bottom first)
    ///
    /// The channel ceiling is taken from the layers, falling back to the
    /// default for an empty stack.
    pub fn start_with_layers(
        &mut self,
        name: &str,
        layers: Vec<Layer>,
        height: usize,
        width: usize,
    ) -> Result<()> {
        let max_value = layers
            .first()
            .map_or(DEFAULT_MAX_VALUE, Layer::max_value);
        self.start(name, layers, height, width, max_value)
    }

    pub(crate) fn start(
        &mut self,
        name: &str,
        layers: Vec<Layer>,
        height: usize,
        width: usize,
        max_value: u16,
    ) -> Result<()> {
        if self.canvas.is_some() {
            return Err(CollageError::AlreadyStarted);
        }
        validate_name(name)?;
        validate_dimensions(width, height)?;
        if max_value == 0 {
            return Err(CollageError::InvalidChannel {
                reason: "max value must be positive".to_string(),
            });
        }

        for (i, layer) in layers.iter().enumerate() {
            if layer.width() != width || layer.height() != height {
                return Err(CollageError::InvalidProject {
                    reason: format!(
                        "layer '{}' is {}x{}, canvas is {}x{}",
                        layer.name(),
                        layer.width(),
                        layer.height(),
                        width,
                        height
                    ),
                });
            }
            if layer.max_value() != max_value {
                return Err(CollageError::InvalidProject {
                    reason: format!(
                        "layer '{}' has max value {}, project uses {}",
                        layer.name(),
                        layer.max_value(),
                        max_value
                    ),
                });
            }
            if layers[..i].iter().any(|l| l.name() == layer.name()) {
                return Err(CollageError::DuplicateLayerName {
                    name: layer.name().to_string(),
                });
            }
        }

        info!(
            "Started project '{}' ({}x{}, max {}, {} layers)",
            name,
            width,
            height,
            max_value,
            layers.len()
        );

        self.canvas = Some(Canvas {
            name: name.to_string(),
            width,
            height,
            max_value,
            layers,
        });
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.canvas.is_some()
    }

    fn canvas(&self) -> Result<&Canvas> {
        self.canvas.as_ref().ok_or(CollageError::NotStarted)
    }

    fn canvas_mut(&mut self) -> Result<&mut Canvas> {
        self.canvas.as_mut().ok_or(CollageError::NotStarted)
    }

    pub fn name(&self) -> Result<&str> {
        Ok(&self.canvas()?.name)
    }

    pub fn width(&self) -> Result<usize> {
        Ok(self.canvas()?.width)
    }

    pub fn height(&self) -> Result<usize> {
        Ok(self.canvas()?.height)
    }

    pub fn max_value(&self) -> Result<u16> {
        Ok(self.canvas()?.max_value)
    }

    /// The layer stack, bottom first
    pub fn layers(&self) -> Result<&[Layer]> {
        Ok(&self.canvas()?.layers)
    }

    /// Owned copies of every layer, bottom first
    pub fn return_all_layers(&self) -> Result<Vec<Layer>> {
        Ok(self.canvas()?.layers.clone())
    }

    pub fn layer(&self, name: &str) -> Result<&Layer> {
        let canvas = self.canvas()?;
        Ok(&canvas.layers[canvas.position(name)?])
    }

    // ------------------------------------------------------------------------
    // Layer operations
    // ------------------------------------------------------------------------

    /// Add a blank, fully transparent white layer on top of the stack
    ///
    /// # Errors
    /// * `NotStarted` - If the project has not been started
    /// * `DuplicateLayerName` - If a layer with this name already exists
    pub fn add_layer(&mut self, name: &str) -> Result<()> {
        let canvas = self.canvas_mut()?;
        if canvas.layers.iter().any(|l| l.name() == name) {
            return Err(CollageError::DuplicateLayerName {
                name: name.to_string(),
            });
        }
        let layer = Layer::new(name, canvas.width, canvas.height, canvas.max_value)?;
        canvas.layers.push(layer);
        debug!("Added layer '{}' at index {}", name, canvas.layers.len() - 1);
        Ok(())
    }

    /// Remove a whole layer, returning it
    pub fn remove_layer(&mut self, name: &str) -> Result<Layer> {
        let canvas = self.canvas_mut()?;
        let index = canvas.position(name)?;
        debug!("Removed layer '{}' from index {}", name, index);
        Ok(canvas.layers.remove(index))
    }

    /// Set a layer's filter by canonical filter name
    ///
    /// # Errors
    /// * `InvalidFilter` - If `filter_name` is not a known filter
    /// * `UnknownLayer` - If no layer is called `layer_name`
    pub fn set_filter(&mut self, layer_name: &str, filter_name: &str) -> Result<()> {
        self.canvas()?;
        let kind = FilterKind::parse(filter_name)?;
        self.set_filter_kind(layer_name, kind)
    }

    pub fn set_filter_kind(&mut self, layer_name: &str, kind: FilterKind) -> Result<()> {
        let canvas = self.canvas_mut()?;
        let index = canvas.position(layer_name)?;
        canvas.layers[index].set_filter(kind);
        debug!("Layer '{}' filter set to {}", layer_name, kind);
        Ok(())
    }

    /// Place an image on a layer with its top-left corner at `(x, y)`
    pub fn place_image(
        &mut self,
        layer_name: &str,
        image: &[Vec<Pixel>],
        x: i64,
        y: i64,
    ) -> Result<()> {
        let canvas = self.canvas_mut()?;
        let index = canvas.position(layer_name)?;
        canvas.layers[index].place_image(image, x, y)?;
        debug!(
            "Placed {}x{} image on layer '{}' at ({}, {})",
            image.first().map_or(0, Vec::len),
            image.len(),
            layer_name,
            x,
            y
        );
        Ok(())
    }

    /// Write a layer's filtered pixels into its grid and reset its filter
    ///
    /// Blend modes read the raw layer directly beneath, as when flattening.
    pub fn bake_filter(&mut self, layer_name: &str) -> Result<()> {
        let canvas = self.canvas_mut()?;
        let index = canvas.position(layer_name)?;
        let (lower, upper) = canvas.layers.split_at_mut(index);
        upper[0].bake(lower.last());
        debug!("Baked filter into layer '{}'", layer_name);
        Ok(())
    }

    /// Flatten the whole stack into one layer called `output_name`
    pub fn flatten(&self, output_name: &str) -> Result<Layer> {
        let canvas = self.canvas()?;
        CompositingEngine::new(canvas.width, canvas.height, canvas.max_value)
            .flatten(&canvas.layers, output_name)
    }

    // ------------------------------------------------------------------------
    // Factories bound to this project's channel ceiling
    // ------------------------------------------------------------------------

    /// An opaque pixel at this project's channel ceiling
    pub fn create_pixel(&self, r: u16, g: u16, b: u16) -> Result<Pixel> {
        Pixel::rgb(r, g, b, self.canvas()?.max_value)
    }

    pub fn create_rgba(&self, r: u16, g: u16, b: u16, a: u16) -> Result<Pixel> {
        Pixel::rgba(r, g, b, a, self.canvas()?.max_value)
    }

    pub fn create_layer(
        &self,
        name: &str,
        pixels: PixelGrid,
        height: usize,
        width: usize,
    ) -> Result<Layer> {
        self.canvas()?;
        Layer::from_pixels(name, pixels, height, width)
    }

    /// A `height` x `width` grid of opaque white
    pub fn blank_grid(&self, height: usize, width: usize) -> Result<PixelGrid> {
        let max_value = self.canvas()?.max_value;
        validate_dimensions(width, height)?;
        let white = Pixel::rgb(max_value, max_value, max_value, max_value)?;
        Ok(vec![vec![white; width]; height])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, r: u16, g: u16, b: u16, a: u16) -> PixelGrid {
        vec![vec![Pixel::rgba(r, g, b, a, 255).unwrap(); width]; height]
    }

    #[test]
    fn test_operations_require_start() {
        let mut project = Project::new();
        assert!(!project.is_started());
        assert!(matches!(project.add_layer("bg"), Err(CollageError::NotStarted)));
        assert!(matches!(
            project.set_filter("bg", "normal"),
            Err(CollageError::NotStarted)
        ));
        assert!(matches!(project.flatten("out"), Err(CollageError::NotStarted)));
        assert!(matches!(project.layers(), Err(CollageError::NotStarted)));
    }

    #[test]
    fn test_start_twice_fails() {
        let mut project = Project::started("p", 2, 3).unwrap();
        assert!(matches!(
            project.start_project("p", 2, 3),
            Err(CollageError::AlreadyStarted)
        ));
        assert_eq!(project.width().unwrap(), 3);
        assert_eq!(project.height().unwrap(), 2);
        assert_eq!(project.max_value().unwrap(), 255);
    }

    #[test]
    fn test_start_validates_input() {
        assert!(matches!(
            Project::started("p", 0, 3),
            Err(CollageError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Project::started("", 3, 3),
            Err(CollageError::InvalidName { .. })
        ));
        assert!(Project::new().start_project_with_max("p", 1, 1, 0).is_err());
    }

    #[test]
    fn test_start_rejects_zero_max_value() {
        let mut project = Project::new();
        assert!(matches!(
            project.start("p", Vec::new(), 1, 1, 0),
            Err(CollageError::InvalidChannel { .. })
        ));
        assert!(!project.is_started());
    }

    #[test]
    fn test_duplicate_layer_leaves_one() {
        let mut project = Project::started("p", 2, 2).unwrap();
        project.add_layer("bg").unwrap();
        let err = project.add_layer("bg").unwrap_err();
        assert!(matches!(err, CollageError::DuplicateLayerName { .. }));
        let count = project
            .layers()
            .unwrap()
            .iter()
            .filter(|l| l.name() == "bg")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_layers_are_appended_on_top() {
        let mut project = Project::started("p", 1, 1).unwrap();
        project.add_layer("a").unwrap();
        project.add_layer("b").unwrap();
        let names: Vec<_> = project.layers().unwrap().iter().map(Layer::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_set_filter_errors_leave_state() {
        let mut project = Project::started("p", 1, 1).unwrap();
        project.add_layer("a").unwrap();

        assert!(matches!(
            project.set_filter("a", "unsupported"),
            Err(CollageError::InvalidFilter { .. })
        ));
        assert!(matches!(
            project.set_filter("missing", "normal"),
            Err(CollageError::UnknownLayer { .. })
        ));
        assert_eq!(project.layer("a").unwrap().filter(), FilterKind::Normal);

        project.set_filter("a", "screen").unwrap();
        assert_eq!(project.layer("a").unwrap().filter(), FilterKind::Screen);
    }

    #[test]
    fn test_place_image_on_unknown_layer() {
        let mut project = Project::started("p", 2, 2).unwrap();
        let err = project
            .place_image("ghost", &solid(1, 1, 0, 0, 0, 255), 0, 0)
            .unwrap_err();
        assert!(matches!(err, CollageError::UnknownLayer { .. }));
    }

    #[test]
    fn test_remove_layer() {
        let mut project = Project::started("p", 1, 1).unwrap();
        project.add_layer("a").unwrap();
        project.add_layer("b").unwrap();
        let removed = project.remove_layer("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert_eq!(project.layers().unwrap().len(), 1);
        assert!(project.remove_layer("a").is_err());
    }

    #[test]
    fn test_start_with_layers_validates() {
        let a = Layer::from_pixels("a", solid(2, 2, 1, 1, 1, 255), 2, 2).unwrap();
        let small = Layer::new("small", 1, 1, 255).unwrap();
        let dup = Layer::new("a", 2, 2, 255).unwrap();

        let mut project = Project::new();
        assert!(matches!(
            project.start_with_layers("p", vec![a.clone(), small], 2, 2),
            Err(CollageError::InvalidProject { .. })
        ));
        assert!(matches!(
            project.start_with_layers("p", vec![a.clone(), dup], 2, 2),
            Err(CollageError::DuplicateLayerName { .. })
        ));
        assert!(!project.is_started());

        project.start_with_layers("p", vec![a], 2, 2).unwrap();
        assert_eq!(project.layers().unwrap().len(), 1);
    }

    #[test]
    fn test_return_all_layers_is_a_copy() {
        let mut project = Project::started("p", 1, 1).unwrap();
        project.add_layer("a").unwrap();
        let mut copies = project.return_all_layers().unwrap();
        copies[0].set_filter(FilterKind::Multiply);
        assert_eq!(project.layer("a").unwrap().filter(), FilterKind::Normal);
    }

    #[test]
    fn test_bake_filter_uses_layer_below() {
        let mut project = Project::started("p", 1, 1).unwrap();
        project.add_layer("below").unwrap();
        project.add_layer("top").unwrap();
        project.place_image("below", &solid(1, 1, 100, 100, 100, 255), 0, 0).unwrap();
        project.place_image("top", &solid(1, 1, 200, 200, 200, 255), 0, 0).unwrap();
        project.set_filter("top", "multiply").unwrap();

        project.bake_filter("top").unwrap();
        let top = project.layer("top").unwrap();
        assert_eq!(top.filter(), FilterKind::Normal);
        assert_eq!(top.pixel_at(0, 0).unwrap().channels(), [78, 78, 78, 255]);
    }

    #[test]
    fn test_factories() {
        let mut project = Project::new();
        project.start_project_with_max("p", 1, 1, 15).unwrap();
        assert_eq!(project.create_pixel(15, 0, 0).unwrap().max_value(), 15);
        assert!(project.create_rgba(16, 0, 0, 0).is_err());
        let grid = project.blank_grid(2, 3).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0].channels(), [15, 15, 15, 15]);
        assert!(project.blank_grid(0, 3).is_err());
        assert!(project.create_layer("x", grid, 2, 3).is_ok());
    }
}
