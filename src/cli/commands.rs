//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::engine::{export_image, import_image, ExportOptions};
use crate::error::{CollageError, Result};
use crate::filter::FilterKind;
use crate::layers::Project;
use crate::state::{load_project, read_manifest, save_project};

/// Create a new project file.
pub fn new_project(
    path: &Path,
    name: Option<&str>,
    width: usize,
    height: usize,
    max_value: u16,
) -> Result<()> {
    info!("Creating new project at: {}", path.display());

    if path.exists() {
        return Err(CollageError::InvalidProject {
            reason: format!("{} already exists", path.display()),
        });
    }

    let name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string()),
    };

    let mut project = Project::new();
    project.start_project_with_max(&name, height, width, max_value)?;
    save_project(&project, path)?;

    println!("Project '{}' created: {} ({}x{})", name, path.display(), width, height);
    Ok(())
}

/// Add a blank layer on top of the stack.
pub fn add_layer(path: &Path, layer: &str) -> Result<()> {
    info!("Adding layer '{}' to: {}", layer, path.display());

    let mut project = load_project(path)?;
    project.add_layer(layer)?;
    save_project(&project, path)?;

    println!("Layer created with name: {}", layer);
    Ok(())
}

/// Remove a layer.
pub fn remove_layer(path: &Path, layer: &str) -> Result<()> {
    info!("Removing layer '{}' from: {}", layer, path.display());

    let mut project = load_project(path)?;
    project.remove_layer(layer)?;
    save_project(&project, path)?;

    println!("Layer removed: {}", layer);
    Ok(())
}

/// Set a layer's filter.
pub fn set_filter(path: &Path, layer: &str, filter: &str) -> Result<()> {
    info!("Setting filter '{}' on layer '{}' in: {}", filter, layer, path.display());

    let mut project = load_project(path)?;
    project.set_filter(layer, filter)?;
    save_project(&project, path)?;

    println!("Layer '{}' filter: {}", layer, filter);
    Ok(())
}

/// Place an image file on a layer.
pub fn add_image(path: &Path, layer: &str, image: &Path, x: i64, y: i64) -> Result<()> {
    info!(
        "Adding image {} to layer '{}' at ({}, {})",
        image.display(),
        layer,
        x,
        y
    );

    let mut project = load_project(path)?;
    let grid = import_image(image)?;
    project.place_image(layer, &grid, x, y)?;
    save_project(&project, path)?;

    println!("Image {} placed on layer '{}'", image.display(), layer);
    Ok(())
}

/// Write a layer's filter into its pixels.
pub fn bake(path: &Path, layer: &str) -> Result<()> {
    info!("Baking layer '{}' in: {}", layer, path.display());

    let mut project = load_project(path)?;
    project.bake_filter(layer)?;
    save_project(&project, path)?;

    println!("Layer '{}' baked", layer);
    Ok(())
}

/// Flatten the project and save it as an image.
pub fn save_image(path: &Path, output: &Path, quality: u8) -> Result<()> {
    info!("Saving image of {} to {}", path.display(), output.display());

    let project = load_project(path)?;
    let flattened = project.flatten(project.name()?)?;
    export_image(&flattened, output, ExportOptions::with_jpeg_quality(quality))?;

    println!("Image saved to path: {}", output.display());
    Ok(())
}

/// Print project details.
pub fn show_info(path: &Path) -> Result<()> {
    let manifest = read_manifest(path)?;
    let project = manifest.to_project()?;

    println!("Project: {}", project.name()?);
    println!(
        "Canvas: {}x{} (max value {})",
        project.width()?,
        project.height()?,
        project.max_value()?
    );
    println!("Created: {}", manifest.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Modified: {}", manifest.modified_at.format("%Y-%m-%d %H:%M:%S"));
    println!("{:-<60}", "");

    let layers = project.layers()?;
    if layers.is_empty() {
        println!("No layers.");
    }
    // Top of the stack first
    for (index, layer) in layers.iter().enumerate().rev() {
        println!("{:>3}: {:<30} {}", index, layer.name(), layer.filter());
    }
    Ok(())
}

/// List the available filters.
pub fn list_filters() {
    for kind in FilterKind::ALL {
        let note = if kind.is_blend_mode() {
            " (blends with layer below)"
        } else {
            ""
        };
        println!("{}{}", kind, note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::decode_ppm;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_command_sequence() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("demo.json");
        let source = dir.path().join("red.ppm");
        let output = dir.path().join("out.ppm");
        fs::write(&source, "P3\n1 1\n255\n255 0 0\n").unwrap();

        new_project(&project, None, 2, 1, 255).unwrap();
        add_layer(&project, "bg").unwrap();
        add_image(&project, "bg", &source, 1, 0).unwrap();
        set_filter(&project, "bg", "green-component").unwrap();
        save_image(&project, &output, 90).unwrap();

        let loaded = load_project(&project).unwrap();
        assert_eq!(loaded.name().unwrap(), "demo");

        let grid = decode_ppm(&fs::read_to_string(&output).unwrap()).unwrap();
        // PPM drops alpha, so the blank pixel shows its filtered colour
        assert_eq!(grid[0][0].channels(), [0, 255, 0, 255]);
        assert_eq!(grid[0][1].channels(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("demo.json");
        new_project(&project, Some("demo"), 1, 1, 255).unwrap();
        assert!(new_project(&project, Some("demo"), 1, 1, 255).is_err());
    }

    #[test]
    fn test_failed_command_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("demo.json");
        new_project(&project, None, 1, 1, 255).unwrap();
        add_layer(&project, "bg").unwrap();
        let before = fs::read_to_string(&project).unwrap();

        assert!(add_layer(&project, "bg").is_err());
        assert!(set_filter(&project, "bg", "sepia").is_err());
        assert_eq!(fs::read_to_string(&project).unwrap(), before);
    }
}
