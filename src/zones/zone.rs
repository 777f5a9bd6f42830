//! Zones: a typed anchor point or area polygon on the floorplan

use serde::{Deserialize, Serialize};

use crate::core::error::{FloorplanError, Result};
use crate::core::types::PixelPoint;
use crate::spatial::Polygon;
use crate::zones::ZoneType;

/// Geometry carried by a zone; always the variant matching its type's group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneShape {
    Anchor {
        point: Option<PixelPoint>,
        /// Id of the area zone drawn for this anchor, if its type has one
        paired_area: Option<String>,
    },
    Area {
        polygon: Option<Polygon>,
    },
}

/// Named zone on the floorplan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ZoneRecord", into = "ZoneRecord")]
pub struct Zone {
    id: String,
    zone_type: ZoneType,
    shape: ZoneShape,
}

impl Zone {
    /// Create a zone of any type with no geometry yet
    pub fn new(id: impl Into<String>, zone_type: ZoneType) -> Self {
        let id = id.into();
        let shape = if zone_type.is_anchor() {
            ZoneShape::Anchor {
                point: None,
                paired_area: zone_type.paired_area_id(&id),
            }
        } else {
            ZoneShape::Area { polygon: None }
        };
        Self {
            id,
            zone_type,
            shape,
        }
    }

    /// Anchor zone at `point`
    ///
    /// The paired area id is fixed here from the naming convention and
    /// carried explicitly afterwards.
    pub fn anchor(id: impl Into<String>, zone_type: ZoneType, point: PixelPoint) -> Result<Self> {
        let mut zone = Self::new(id, zone_type);
        zone.set_point(point)?;
        Ok(zone)
    }

    /// Area zone bounded by `polygon`
    pub fn area(id: impl Into<String>, zone_type: ZoneType, polygon: Polygon) -> Result<Self> {
        let mut zone = Self::new(id, zone_type);
        zone.set_polygon(polygon)?;
        Ok(zone)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn zone_type(&self) -> ZoneType {
        self.zone_type
    }

    pub fn shape(&self) -> &ZoneShape {
        &self.shape
    }

    pub fn point(&self) -> Option<PixelPoint> {
        match &self.shape {
            ZoneShape::Anchor { point, .. } => *point,
            ZoneShape::Area { .. } => None,
        }
    }

    pub fn polygon(&self) -> Option<&Polygon> {
        match &self.shape {
            ZoneShape::Area { polygon } => polygon.as_ref(),
            ZoneShape::Anchor { .. } => None,
        }
    }

    pub fn paired_area(&self) -> Option<&str> {
        match &self.shape {
            ZoneShape::Anchor { paired_area, .. } => paired_area.as_deref(),
            ZoneShape::Area { .. } => None,
        }
    }

    pub fn set_point(&mut self, new_point: PixelPoint) -> Result<()> {
        match &mut self.shape {
            ZoneShape::Anchor { point, .. } => {
                *point = Some(new_point);
                Ok(())
            }
            ZoneShape::Area { .. } => Err(self.mismatch("an anchor")),
        }
    }

    pub fn set_polygon(&mut self, new_polygon: Polygon) -> Result<()> {
        match &mut self.shape {
            ZoneShape::Area { polygon } => {
                *polygon = Some(new_polygon);
                Ok(())
            }
            ZoneShape::Anchor { .. } => Err(self.mismatch("an area")),
        }
    }

    pub fn set_paired_area(&mut self, area_id: Option<String>) -> Result<()> {
        match &mut self.shape {
            ZoneShape::Anchor { paired_area, .. } => {
                *paired_area = area_id;
                Ok(())
            }
            ZoneShape::Area { .. } => Err(self.mismatch("an anchor")),
        }
    }

    /// Id of the area this anchor pairs with: the explicit relation, or the
    /// naming convention when it is unset
    pub fn expected_area_id(&self) -> Option<String> {
        match self.paired_area() {
            Some(explicit) => Some(explicit.to_string()),
            None => self.zone_type.paired_area_id(&self.id),
        }
    }

    /// Rename the zone; an anchor keeps its existing paired area id
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Has its geometry: an anchor point, or a polygon of at least 3 vertices
    pub fn is_complete(&self) -> bool {
        match &self.shape {
            ZoneShape::Anchor { point, .. } => point.is_some(),
            ZoneShape::Area { polygon } => polygon.as_ref().is_some_and(Polygon::is_valid),
        }
    }

    /// Id for display, `(no id)` when blank
    pub fn display_id(&self) -> &str {
        if self.id.trim().is_empty() {
            "(no id)"
        } else {
            &self.id
        }
    }

    fn mismatch(&self, expected: &'static str) -> FloorplanError {
        FloorplanError::ZoneTypeMismatch {
            id: self.id.clone(),
            zone_type: self.zone_type,
            expected,
        }
    }
}

/// Flat on-disk form of a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ZoneRecord {
    id: String,
    #[serde(rename = "type")]
    zone_type: ZoneType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<PixelPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    area: Option<Polygon>,
    /// Outer `None` for areas (omitted); anchors always write it, `null` when unpaired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paired_area: Option<Option<String>>,
}

impl TryFrom<ZoneRecord> for Zone {
    type Error = FloorplanError;

    fn try_from(record: ZoneRecord) -> Result<Self> {
        let mut zone = Zone::new(record.id, record.zone_type);
        if record.zone_type.is_anchor() {
            if record.area.is_some() {
                return Err(zone.mismatch("an area"));
            }
            if let Some(point) = record.anchor {
                zone.set_point(point)?;
            }
            zone.set_paired_area(record.paired_area.flatten())?;
        } else {
            if record.anchor.is_some() || record.paired_area.flatten().is_some() {
                return Err(zone.mismatch("an anchor"));
            }
            if let Some(polygon) = record.area {
                zone.set_polygon(polygon)?;
            }
        }
        Ok(zone)
    }
}

impl From<Zone> for ZoneRecord {
    fn from(zone: Zone) -> Self {
        let (anchor, area, paired_area) = match zone.shape {
            ZoneShape::Anchor { point, paired_area } => (point, None, Some(paired_area)),
            ZoneShape::Area { polygon } => (None, polygon, None),
        };
        ZoneRecord {
            id: zone.id,
            zone_type: zone.zone_type,
            anchor,
            area,
            paired_area,
        }
    }
}
