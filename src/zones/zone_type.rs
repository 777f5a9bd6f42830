//! Zone categories and their anchor/area pairing rules

use serde::{Deserialize, Serialize};

/// Kind of zone placed on a floorplan
///
/// Anchor-bearing types mark a single point (where passengers spawn, get
/// served, wait). Area types are polygons, each paired with one anchor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneType {
    Spawn,
    TicketCounter,
    Checkpoint,
    Holdroom,
    TicketQueueArea,
    CheckpointQueueArea,
    HoldroomArea,
}

impl ZoneType {
    pub const ALL: [ZoneType; 7] = [
        ZoneType::Spawn,
        ZoneType::TicketCounter,
        ZoneType::Checkpoint,
        ZoneType::Holdroom,
        ZoneType::TicketQueueArea,
        ZoneType::CheckpointQueueArea,
        ZoneType::HoldroomArea,
    ];

    /// Anchor types a project needs at least one of, in validation order
    pub const REQUIRED_ANCHORS: [ZoneType; 4] = [
        ZoneType::Spawn,
        ZoneType::TicketCounter,
        ZoneType::Checkpoint,
        ZoneType::Holdroom,
    ];

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            ZoneType::Spawn => "Spawn",
            ZoneType::TicketCounter => "Ticket Counter",
            ZoneType::Checkpoint => "Checkpoint",
            ZoneType::Holdroom => "Holdroom",
            ZoneType::TicketQueueArea => "Ticket Queue Area",
            ZoneType::CheckpointQueueArea => "Checkpoint Queue Area",
            ZoneType::HoldroomArea => "Holdroom Area",
        }
    }

    /// Stable identifier, also the serialized form
    pub fn code(&self) -> &'static str {
        match self {
            ZoneType::Spawn => "SPAWN",
            ZoneType::TicketCounter => "TICKET_COUNTER",
            ZoneType::Checkpoint => "CHECKPOINT",
            ZoneType::Holdroom => "HOLDROOM",
            ZoneType::TicketQueueArea => "TICKET_QUEUE_AREA",
            ZoneType::CheckpointQueueArea => "CHECKPOINT_QUEUE_AREA",
            ZoneType::HoldroomArea => "HOLDROOM_AREA",
        }
    }

    pub fn from_code(code: &str) -> Option<ZoneType> {
        Self::ALL.into_iter().find(|t| t.code().eq_ignore_ascii_case(code))
    }

    pub fn is_anchor(&self) -> bool {
        matches!(
            self,
            ZoneType::Spawn | ZoneType::TicketCounter | ZoneType::Checkpoint | ZoneType::Holdroom
        )
    }

    pub fn is_area(&self) -> bool {
        !self.is_anchor()
    }

    /// Area type drawn for this anchor type, if any
    pub fn paired_area_type(&self) -> Option<ZoneType> {
        match self {
            ZoneType::TicketCounter => Some(ZoneType::TicketQueueArea),
            ZoneType::Checkpoint => Some(ZoneType::CheckpointQueueArea),
            ZoneType::Holdroom => Some(ZoneType::HoldroomArea),
            _ => None,
        }
    }

    /// Suffix appended to an anchor id to name its paired area
    pub fn area_suffix(&self) -> Option<&'static str> {
        match self {
            ZoneType::TicketCounter | ZoneType::Checkpoint => Some("_QUEUE"),
            ZoneType::Holdroom => Some("_AREA"),
            _ => None,
        }
    }

    /// Prefix of generated anchor ids (`T1`, `C2`, ...)
    pub fn id_prefix(&self) -> Option<&'static str> {
        match self {
            ZoneType::Spawn => Some("S"),
            ZoneType::TicketCounter => Some("T"),
            ZoneType::Checkpoint => Some("C"),
            ZoneType::Holdroom => Some("H"),
            _ => None,
        }
    }

    /// Conventional id of the area paired with anchor `anchor_id`
    pub fn paired_area_id(&self, anchor_id: &str) -> Option<String> {
        self.area_suffix().map(|suffix| format!("{}{}", anchor_id, suffix))
    }
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
