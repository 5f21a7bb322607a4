//! Project manifest
//!
//! The serialized form of a project: canvas settings, the ordered layer
//! stack (bottom first) with each layer's filter and row-major RGBA pixels,
//! and a SHA-256 checksum over all layer data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{CollageError, Result};
use crate::filter::FilterKind;
use crate::layers::{Layer, Project};
use crate::pixel::Pixel;

/// Manifest format written by this version
pub const CURRENT_FORMAT_VERSION: &str = "1.0";

fn default_format_version() -> String {
    CURRENT_FORMAT_VERSION.to_string()
}

/// One layer as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerManifest {
    pub name: String,
    /// Canonical filter name
    pub filter: String,
    /// Row-major `[r, g, b, a]`
    pub pixels: Vec<[u16; 4]>,
}

/// Whole project as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(default = "default_format_version")]
    pub format_version: String,
    pub id: Uuid,
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub max_value: u16,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub checksum_sha256: String,
    pub layers: Vec<LayerManifest>,
}

impl ProjectManifest {
    /// Capture a started project
    ///
    /// `previous` carries the id and creation time over from an earlier save.
    pub fn from_project(project: &Project, previous: Option<&ProjectManifest>) -> Result<Self> {
        let layers: Vec<LayerManifest> = project
            .layers()?
            .iter()
            .map(|layer| LayerManifest {
                name: layer.name().to_string(),
                filter: layer.filter().name().to_string(),
                pixels: layer.pixels().iter().flatten().map(Pixel::channels).collect(),
            })
            .collect();

        let width = project.width()?;
        let height = project.height()?;
        let max_value = project.max_value()?;
        let now = Utc::now();
        Ok(Self {
            format_version: CURRENT_FORMAT_VERSION.to_string(),
            id: previous.map_or_else(Uuid::new_v4, |p| p.id),
            name: project.name()?.to_string(),
            width,
            height,
            max_value,
            created_at: previous.map_or(now, |p| p.created_at),
            modified_at: now,
            checksum_sha256: checksum(width, height, max_value, &layers),
            layers,
        })
    }

    /// Rebuild a started project, verifying the checksum and every invariant
    pub fn to_project(&self) -> Result<Project> {
        let major = self.format_version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(CollageError::InvalidProject {
                reason: format!("unsupported format version {}", self.format_version),
            });
        }

        let actual = checksum(self.width, self.height, self.max_value, &self.layers);
        if actual != self.checksum_sha256 {
            return Err(CollageError::InvalidProject {
                reason: format!(
                    "checksum mismatch (stored {}, computed {})",
                    self.checksum_sha256, actual
                ),
            });
        }

        let layers = self
            .layers
            .iter()
            .map(|stored| self.rebuild_layer(stored))
            .collect::<Result<Vec<_>>>()?;

        let mut project = Project::new();
        project.start(&self.name, layers, self.height, self.width, self.max_value)?;
        Ok(project)
    }

    fn rebuild_layer(&self, stored: &LayerManifest) -> Result<Layer> {
        let expected = self.width.checked_mul(self.height).ok_or_else(|| {
            CollageError::InvalidProject {
                reason: format!("canvas {}x{} is too large", self.width, self.height),
            }
        })?;
        if stored.pixels.len() != expected {
            return Err(CollageError::InvalidProject {
                reason: format!(
                    "layer '{}' has {} pixels, expected {}",
                    stored.name,
                    stored.pixels.len(),
                    expected
                ),
            });
        }

        let filter = FilterKind::parse(&stored.filter)?;
        let grid = stored
            .pixels
            .chunks(self.width.max(1))
            .map(|row| {
                row.iter()
                    .map(|&[r, g, b, a]| Pixel::rgba(r, g, b, a, self.max_value))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Layer::from_pixels(&stored.name, grid, self.height, self.width)?.with_filter(filter))
    }
}

/// Hex SHA-256 over the canvas settings, layer names, filters and channel data
fn checksum(width: usize, height: usize, max_value: u16, layers: &[LayerManifest]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((width as u64).to_le_bytes());
    hasher.update((height as u64).to_le_bytes());
    hasher.update(max_value.to_le_bytes());
    for layer in layers {
        hasher.update(layer.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(layer.filter.as_bytes());
        hasher.update([0u8]);
        for channel in layer.pixels.iter().flatten() {
            hasher.update(channel.to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reseal(manifest: &mut ProjectManifest) {
        manifest.checksum_sha256 = checksum(
            manifest.width,
            manifest.height,
            manifest.max_value,
            &manifest.layers,
        );
    }

    fn sample_project() -> Project {
        let mut project = Project::started("demo", 2, 3).unwrap();
        project.add_layer("bg").unwrap();
        project.add_layer("fg").unwrap();
        let red = vec![vec![Pixel::rgb(255, 0, 0, 255).unwrap(); 2]];
        project.place_image("fg", &red, 1, 1).unwrap();
        project.set_filter("fg", "darken-luma").unwrap();
        project
    }

    #[test]
    fn test_manifest_rebuilds_project() {
        let project = sample_project();
        let manifest = ProjectManifest::from_project(&project, None).unwrap();
        assert_eq!(manifest.layers.len(), 2);
        assert_eq!(manifest.layers[1].filter, "darken-luma");
        assert_eq!(manifest.layers[0].pixels.len(), 6);

        let rebuilt = manifest.to_project().unwrap();
        assert_eq!(rebuilt.name().unwrap(), "demo");
        assert_eq!(rebuilt.layers().unwrap(), project.layers().unwrap());
    }

    #[test]
    fn test_previous_identity_is_kept() {
        let project = sample_project();
        let first = ProjectManifest::from_project(&project, None).unwrap();
        let second = ProjectManifest::from_project(&project, Some(&first)).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.modified_at >= first.modified_at);
    }

    #[test]
    fn test_tampered_pixels_fail_checksum() {
        let mut manifest = ProjectManifest::from_project(&sample_project(), None).unwrap();
        manifest.layers[0].pixels[0] = [0, 0, 0, 255];
        assert!(matches!(
            manifest.to_project(),
            Err(CollageError::InvalidProject { .. })
        ));
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let mut manifest = ProjectManifest::from_project(&sample_project(), None).unwrap();
        manifest.layers[1].filter = "unsupported".to_string();
        reseal(&mut manifest);
        assert!(matches!(
            manifest.to_project(),
            Err(CollageError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_wrong_pixel_count_is_rejected() {
        let mut manifest = ProjectManifest::from_project(&sample_project(), None).unwrap();
        manifest.layers[0].pixels.pop();
        reseal(&mut manifest);
        assert!(manifest.to_project().is_err());
    }

    #[test]
    fn test_unstarted_project_cannot_be_captured() {
        assert!(matches!(
            ProjectManifest::from_project(&Project::new(), None),
            Err(CollageError::NotStarted)
        ));
    }

    #[test]
    fn test_tampered_canvas_fails_checksum() {
        let mut manifest = ProjectManifest::from_project(&sample_project(), None).unwrap();
        manifest.max_value = 15;
        assert!(matches!(
            manifest.to_project(),
            Err(CollageError::InvalidProject { .. })
        ));
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        let mut manifest = ProjectManifest::from_project(&sample_project(), None).unwrap();
        manifest.width = usize::MAX;
        manifest.height = 2;
        reseal(&mut manifest);
        assert!(matches!(
            manifest.to_project(),
            Err(CollageError::InvalidProject { .. })
        ));
    }

    #[test]
    fn test_zero_max_value_is_rejected() {
        let project = Project::started("empty", 1, 1).unwrap();
        let mut manifest = ProjectManifest::from_project(&project, None).unwrap();
        manifest.max_value = 0;
        reseal(&mut manifest);
        assert!(matches!(
            manifest.to_project(),
            Err(CollageError::InvalidChannel { .. })
        ));
    }
}
