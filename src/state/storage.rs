//! Project file storage
//!
//! Reads and writes project manifests as pretty-printed JSON.

use std::fs;
use std::path::Path;

use log::{debug, info};

use super::manifest::ProjectManifest;
use crate::error::{CollageError, Result};
use crate::layers::Project;

/// Read a manifest without rebuilding the project
pub fn read_manifest(path: &Path) -> Result<ProjectManifest> {
    if !path.exists() {
        return Err(CollageError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    let manifest: ProjectManifest = serde_json::from_str(&content)?;
    Ok(manifest)
}

/// Save a started project to `path`
///
/// If a manifest already exists there, its id and creation time are kept.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let previous = if path.exists() {
        read_manifest(path).ok()
    } else {
        None
    };
    let manifest = ProjectManifest::from_project(project, previous.as_ref())?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(&manifest)?;
    fs::write(path, content)?;

    info!(
        "Saved project '{}' ({} layers) to {}",
        manifest.name,
        manifest.layers.len(),
        path.display()
    );
    Ok(())
}

/// Load and start a project from `path`
///
/// # Errors
/// * `FileNotFound` - If nothing exists at `path`
/// * `Serialization` - If the file is not a valid manifest
/// * `InvalidProject` - If the checksum or layer data is inconsistent
pub fn load_project(path: &Path) -> Result<Project> {
    let manifest = read_manifest(path)?;
    debug!(
        "Loading project '{}' (format {}, {} layers)",
        manifest.name,
        manifest.format_version,
        manifest.layers.len()
    );
    manifest.to_project()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("demo.json");

        let mut project = Project::started("demo", 2, 2).unwrap();
        project.add_layer("bg").unwrap();
        let grid = vec![vec![Pixel::rgba(1, 2, 3, 4, 255).unwrap(); 2]; 2];
        project.place_image("bg", &grid, 0, 0).unwrap();
        project.set_filter("bg", "screen").unwrap();

        save_project(&project, &path).unwrap();
        let loaded = load_project(&path).unwrap();

        assert_eq!(loaded.name().unwrap(), "demo");
        assert_eq!(loaded.layers().unwrap(), project.layers().unwrap());
    }

    #[test]
    fn test_resave_keeps_identity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.json");
        let project = Project::started("demo", 1, 1).unwrap();

        save_project(&project, &path).unwrap();
        let first = read_manifest(&path).unwrap();
        save_project(&project, &path).unwrap();
        let second = read_manifest(&path).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempdir().unwrap();
        let err = load_project(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, CollageError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_project(&path),
            Err(CollageError::Serialization(_))
        ));
    }

    #[test]
    fn test_save_unstarted_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");
        assert!(matches!(
            save_project(&Project::new(), &path),
            Err(CollageError::NotStarted)
        ));
        assert!(!path.exists());
    }
}
