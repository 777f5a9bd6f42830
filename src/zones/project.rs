//! Floorplan project: source image, walk mask and zones edited together

use std::path::PathBuf;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::{config, ValidationConfig};
use crate::core::error::{FloorplanError, Result};
use crate::core::types::PixelPoint;
use crate::mask::{MaskBuildReport, MaskBuilder, MaskConfig, WalkMask};
use crate::spatial::Polygon;
use crate::zones::validation::{validate_parts, ValidationIssue};
use crate::zones::{Zone, ZoneType};

/// Where the floorplan raster came from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceDocument {
    pub pdf_path: Option<PathBuf>,
    pub page_index: u32,
    pub dpi: Option<u32>,
}

/// Editable floorplan: image, mask, zones and a lock for simulation hand-off
#[derive(Debug, Clone, Default)]
pub struct FloorplanProject {
    pub source: SourceDocument,
    image: Option<DynamicImage>,
    mask: Option<WalkMask>,
    zones: Vec<Zone>,
    locked: bool,
}

impl FloorplanProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project over an already rendered floorplan image
    pub fn with_image(image: DynamicImage) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    // === Image and mask ===

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Option<DynamicImage>) -> Result<()> {
        self.ensure_unlocked()?;
        self.image = image;
        Ok(())
    }

    pub fn mask(&self) -> Option<&WalkMask> {
        self.mask.as_ref()
    }

    /// Mutable mask access for manual painting
    pub fn mask_mut(&mut self) -> Result<&mut WalkMask> {
        self.ensure_unlocked()?;
        self.mask.as_mut().ok_or(FloorplanError::MissingMask)
    }

    pub fn set_mask(&mut self, mask: Option<WalkMask>) -> Result<()> {
        self.ensure_unlocked()?;
        self.mask = mask;
        Ok(())
    }

    /// Regenerate the mask from the project image
    pub fn rebuild_mask(&mut self, mask_config: &MaskConfig) -> Result<MaskBuildReport> {
        self.ensure_unlocked()?;
        let image = self.image.as_ref().ok_or(FloorplanError::MissingImage)?;
        let report = MaskBuilder::new(mask_config.clone()).build(image)?;
        self.mask = Some(report.mask.clone());
        Ok(report)
    }

    // === Zones ===

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn add_zone(&mut self, zone: Zone) -> Result<()> {
        self.ensure_unlocked()?;
        debug!("Adding {} zone {}", zone.zone_type(), zone.display_id());
        self.zones.push(zone);
        Ok(())
    }

    /// First zone with this id and type
    pub fn find_zone(&self, id: &str, zone_type: ZoneType) -> Option<&Zone> {
        self.zones
            .iter()
            .find(|z| z.id() == id && z.zone_type() == zone_type)
    }

    fn find_zone_mut(&mut self, id: &str, zone_type: ZoneType) -> Option<&mut Zone> {
        self.zones
            .iter_mut()
            .find(|z| z.id() == id && z.zone_type() == zone_type)
    }

    /// Remove a zone; removing an anchor also removes its paired area
    pub fn remove_zone(&mut self, id: &str, zone_type: ZoneType) -> Result<Zone> {
        self.ensure_unlocked()?;
        let index = self
            .zones
            .iter()
            .position(|z| z.id() == id && z.zone_type() == zone_type)
            .ok_or_else(|| FloorplanError::ZoneNotFound(id.to_string()))?;
        let removed = self.zones.remove(index);

        if let (Some(area_id), Some(area_type)) =
            (removed.expected_area_id(), zone_type.paired_area_type())
        {
            let before = self.zones.len();
            self.zones
                .retain(|z| !(z.id() == area_id && z.zone_type() == area_type));
            if self.zones.len() < before {
                debug!("Removed paired area {} with anchor {}", area_id, id);
            }
        }
        Ok(removed)
    }

    /// Next free id for an anchor type: prefix plus one more than the highest
    /// numeric suffix in use (`T1`, `T2`, ...)
    pub fn next_id(&self, zone_type: ZoneType) -> Option<String> {
        let prefix = zone_type.id_prefix()?;
        let max = self
            .zones
            .iter()
            .filter(|z| z.zone_type() == zone_type)
            .filter_map(|z| z.id().strip_prefix(prefix))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Some(format!("{}{}", prefix, max + 1))
    }

    /// Place a new anchor on a walkable pixel, allocating its id
    pub fn place_anchor(&mut self, zone_type: ZoneType, point: PixelPoint) -> Result<&Zone> {
        self.ensure_unlocked()?;
        let mask = self.mask.as_ref().ok_or(FloorplanError::MissingMask)?;
        if !mask.is_walkable(point.x, point.y) {
            return Err(FloorplanError::AnchorNotWalkable {
                x: point.x,
                y: point.y,
            });
        }
        let id = self
            .next_id(zone_type)
            .ok_or_else(|| FloorplanError::ZoneTypeMismatch {
                id: String::new(),
                zone_type,
                expected: "an anchor",
            })?;

        let zone = Zone::anchor(id, zone_type, point)?;
        info!("Placed {} {} at {}", zone_type, zone.id(), point);
        self.zones.push(zone);
        Ok(&self.zones[self.zones.len() - 1])
    }

    /// Attach (or replace) the area polygon paired with an anchor
    pub fn attach_area(&mut self, anchor_id: &str, polygon: Polygon) -> Result<&Zone> {
        self.ensure_unlocked()?;
        if !polygon.is_valid() {
            return Err(FloorplanError::InvalidPolygon(format!(
                "area for {} needs at least 3 vertices, got {}",
                anchor_id,
                polygon.len()
            )));
        }

        let anchor = self
            .zones
            .iter()
            .find(|z| z.id() == anchor_id && z.zone_type().is_anchor())
            .ok_or_else(|| FloorplanError::ZoneNotFound(anchor_id.to_string()))?;
        let anchor_type = anchor.zone_type();
        let (Some(area_type), Some(area_id)) =
            (anchor_type.paired_area_type(), anchor.expected_area_id())
        else {
            return Err(FloorplanError::ZoneTypeMismatch {
                id: anchor_id.to_string(),
                zone_type: anchor_type,
                expected: "a paired area",
            });
        };

        if let Some(index) = self
            .zones
            .iter()
            .position(|z| z.id() == area_id && z.zone_type() == area_type)
        {
            self.zones[index].set_polygon(polygon)?;
            debug!("Replaced area {} for {}", area_id, anchor_id);
            return Ok(&self.zones[index]);
        }

        let zone = Zone::area(area_id, area_type, polygon)?;
        info!("Attached {} {} to {}", area_type, zone.id(), anchor_id);
        self.zones.push(zone);
        Ok(&self.zones[self.zones.len() - 1])
    }

    /// Rename a zone; anchor/area links stay as they were
    pub fn rename_zone(&mut self, id: &str, zone_type: ZoneType, new_id: &str) -> Result<()> {
        self.ensure_unlocked()?;
        let zone = self
            .find_zone_mut(id, zone_type)
            .ok_or_else(|| FloorplanError::ZoneNotFound(id.to_string()))?;
        zone.set_id(new_id);
        Ok(())
    }

    // === Validation and locking ===

    /// Typed findings against the global validation thresholds
    pub fn issues(&self) -> Vec<ValidationIssue> {
        self.issues_with(&config().validation)
    }

    pub fn issues_with(&self, validation: &ValidationConfig) -> Vec<ValidationIssue> {
        validate_parts(self.image.is_some(), self.mask.as_ref(), &self.zones, validation)
    }

    /// Human-readable findings; empty means the project is valid
    pub fn validate(&self) -> Vec<String> {
        self.validate_with(&config().validation)
    }

    pub fn validate_with(&self, validation: &ValidationConfig) -> Vec<String> {
        self.issues_with(validation)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Lock the project for simulation if it validates cleanly
    pub fn validate_and_lock(&mut self) -> std::result::Result<(), Vec<String>> {
        let findings = self.validate();
        if !findings.is_empty() {
            debug!("Lock refused: {} finding(s)", findings.len());
            return Err(findings);
        }
        self.locked = true;
        info!("Project validated and locked ({} zones)", self.zones.len());
        Ok(())
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            return Err(FloorplanError::Locked);
        }
        Ok(())
    }
}
