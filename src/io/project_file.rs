//! Project directory format
//!
//! ```text
//! <dir>/project.json    manifest: version, source document, zones
//! <dir>/mask.png        binary walk mask, white = walkable
//! <dir>/floorplan.png   rendered floorplan (optional)
//! ```
//!
//! The lock flag is an editing-session state and is not stored.

use std::fs;
use std::path::Path;

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{FloorplanError, Result};
use crate::mask::WalkMask;
use crate::zones::{FloorplanProject, SourceDocument, Zone};

pub const MANIFEST_FILE: &str = "project.json";
pub const MASK_FILE: &str = "mask.png";
pub const IMAGE_FILE: &str = "floorplan.png";

/// Current manifest format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ProjectManifest {
    version: u32,
    #[serde(default)]
    source: SourceDocument,
    #[serde(default)]
    zones: Vec<Zone>,
    #[serde(default)]
    mask_file: Option<String>,
    #[serde(default)]
    image_file: Option<String>,
}

/// Write `project` into directory `dir`, creating it if needed
pub fn save_project(project: &FloorplanProject, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    let mask_file = match project.mask() {
        Some(mask) => {
            mask.to_binary_image().save(dir.join(MASK_FILE))?;
            Some(MASK_FILE.to_string())
        }
        None => None,
    };

    let image_file = match project.image() {
        Some(image) => {
            image.save(dir.join(IMAGE_FILE))?;
            Some(IMAGE_FILE.to_string())
        }
        None => None,
    };

    let manifest = ProjectManifest {
        version: FORMAT_VERSION,
        source: project.source.clone(),
        zones: project.zones().to_vec(),
        mask_file,
        image_file,
    };
    fs::write(dir.join(MANIFEST_FILE), serde_json::to_string_pretty(&manifest)?)?;

    info!(
        "Saved project to {} ({} zones)",
        dir.display(),
        manifest.zones.len()
    );
    Ok(())
}

/// Read a project previously written by [`save_project`]
pub fn load_project(dir: &Path) -> Result<FloorplanProject> {
    let text = fs::read_to_string(dir.join(MANIFEST_FILE))?;
    let manifest: ProjectManifest = serde_json::from_str(&text)?;
    if manifest.version > FORMAT_VERSION {
        return Err(FloorplanError::UnsupportedVersion {
            found: manifest.version,
            supported: FORMAT_VERSION,
        });
    }

    let mut project = FloorplanProject::new();
    project.source = manifest.source;

    if let Some(name) = &manifest.image_file {
        let image: DynamicImage = image::open(dir.join(name))?;
        let (width, height) = image.dimensions();
        debug!("Loaded floorplan image {}x{}", width, height);
        project.set_image(Some(image))?;
    }

    if let Some(name) = &manifest.mask_file {
        let mask = WalkMask::from_binary_image(&image::open(dir.join(name))?)?;
        project.set_mask(Some(mask))?;
    }

    for zone in manifest.zones {
        project.add_zone(zone)?;
    }

    info!(
        "Loaded project from {} ({} zones)",
        dir.display(),
        project.zones().len()
    );
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PixelPoint;
    use crate::zones::ZoneType;

    #[test]
    fn test_empty_project_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        save_project(&FloorplanProject::new(), dir.path()).unwrap();

        assert!(dir.path().join(MANIFEST_FILE).exists());
        assert!(!dir.path().join(MASK_FILE).exists());

        let loaded = load_project(dir.path()).unwrap();
        assert!(loaded.mask().is_none());
        assert!(loaded.image().is_none());
        assert!(loaded.zones().is_empty());
    }

    #[test]
    fn test_zones_round_trip_unlocked() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = FloorplanProject::new();
        project
            .add_zone(Zone::anchor("S1", ZoneType::Spawn, PixelPoint::new(1, 2)).unwrap())
            .unwrap();
        save_project(&project, dir.path()).unwrap();

        let loaded = load_project(dir.path()).unwrap();
        assert!(!loaded.is_locked());
        assert_eq!(loaded.zones(), project.zones());
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"version": 99}"#).unwrap();
        assert!(matches!(
            load_project(dir.path()),
            Err(FloorplanError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_project(dir.path()), Err(FloorplanError::IoError(_))));
    }
}
