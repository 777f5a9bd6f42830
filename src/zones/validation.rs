//! Project validation: findings that block locking a floorplan for simulation
//!
//! Findings accumulate in a fixed order so callers and tests can rely on it:
//! missing inputs, missing required anchors, per-zone geometry (in zone
//! order), then anchor/area pairing.

use std::fmt;

use ahash::AHashSet;
use tracing::debug;

use crate::core::config::ValidationConfig;
use crate::mask::WalkMask;
use crate::spatial::Polygon;
use crate::zones::{Zone, ZoneType};

/// A single validation finding
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    NoImage,
    NoMask,
    MissingAnchor(ZoneType),
    AnchorMissing { zone_type: ZoneType, id: String },
    AnchorOutOfBounds { zone_type: ZoneType, id: String },
    AnchorBlocked { zone_type: ZoneType, id: String },
    PolygonInvalid { zone_type: ZoneType, id: String },
    PolygonTooSmall { zone_type: ZoneType, id: String, area: f64 },
    PolygonMostlyBlocked { zone_type: ZoneType, id: String, coverage: f64 },
    MissingPairedArea {
        anchor_type: ZoneType,
        anchor_id: String,
        area_type: ZoneType,
        area_id: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoImage => write!(f, "No floorplan image rendered."),
            ValidationIssue::NoMask => write!(f, "No walk mask exists (generate auto-mask first)."),
            ValidationIssue::MissingAnchor(t) => {
                write!(f, "Missing {} anchor (place at least one).", t.label())
            }
            ValidationIssue::AnchorMissing { zone_type, id } => {
                write!(f, "{} zone missing anchor: {}", zone_type.label(), id)
            }
            ValidationIssue::AnchorOutOfBounds { zone_type, id } => {
                write!(f, "{} anchor out of bounds: {}", zone_type.label(), id)
            }
            ValidationIssue::AnchorBlocked { zone_type, id } => {
                write!(f, "{} anchor must be on walkable pixel: {}", zone_type.label(), id)
            }
            ValidationIssue::PolygonInvalid { zone_type, id } => {
                write!(f, "{} polygon missing/invalid: {}", zone_type.label(), id)
            }
            ValidationIssue::PolygonTooSmall { zone_type, id, .. } => {
                write!(f, "{} polygon too small: {}", zone_type.label(), id)
            }
            ValidationIssue::PolygonMostlyBlocked {
                zone_type,
                id,
                coverage,
            } => write!(
                f,
                "{} polygon is mostly blocked (walkable {:.0}%): {}",
                zone_type.label(),
                coverage * 100.0,
                id
            ),
            ValidationIssue::MissingPairedArea {
                anchor_type,
                anchor_id,
                area_type,
                area_id,
            } => write!(
                f,
                "{} {} needs a {} polygon (id: {})",
                anchor_type.label(),
                anchor_id,
                area_type.code(),
                area_id
            ),
        }
    }
}

/// Run every check over a project's parts
pub fn validate_parts(
    has_image: bool,
    mask: Option<&WalkMask>,
    zones: &[Zone],
    config: &ValidationConfig,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !has_image {
        issues.push(ValidationIssue::NoImage);
    }
    if mask.is_none() {
        issues.push(ValidationIssue::NoMask);
    }

    for required in ZoneType::REQUIRED_ANCHORS {
        if !zones.iter().any(|z| z.zone_type() == required) {
            issues.push(ValidationIssue::MissingAnchor(required));
        }
    }

    for zone in zones {
        check_zone(zone, mask, config, &mut issues);
    }

    check_pairing(zones, &mut issues);

    debug!("Validation found {} issue(s) over {} zone(s)", issues.len(), zones.len());
    issues
}

fn check_zone(
    zone: &Zone,
    mask: Option<&WalkMask>,
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    let zone_type = zone.zone_type();
    let id = zone.display_id().to_string();

    if zone_type.is_anchor() {
        match (zone.point(), mask) {
            (None, _) => issues.push(ValidationIssue::AnchorMissing { zone_type, id }),
            (Some(p), Some(mask)) if !mask.in_bounds(p.x, p.y) => {
                issues.push(ValidationIssue::AnchorOutOfBounds { zone_type, id })
            }
            (Some(p), Some(mask)) if !mask.is_walkable(p.x, p.y) => {
                issues.push(ValidationIssue::AnchorBlocked { zone_type, id })
            }
            _ => {}
        }
        return;
    }

    let Some(polygon) = zone.polygon().filter(|p| p.is_valid()) else {
        issues.push(ValidationIssue::PolygonInvalid { zone_type, id });
        return;
    };

    let area = polygon.area();
    if area < config.min_area_px {
        issues.push(ValidationIssue::PolygonTooSmall {
            zone_type,
            id: id.clone(),
            area,
        });
    }

    if let Some(mask) = mask {
        let coverage = walkable_fraction(polygon, mask, config.max_coverage_samples);
        if coverage < config.min_walkable_fraction {
            issues.push(ValidationIssue::PolygonMostlyBlocked {
                zone_type,
                id,
                coverage,
            });
        }
    }
}

fn check_pairing(zones: &[Zone], issues: &mut Vec<ValidationIssue>) {
    let areas: AHashSet<(&str, ZoneType)> = zones
        .iter()
        .filter(|z| z.zone_type().is_area())
        .map(|z| (z.id(), z.zone_type()))
        .collect();

    for anchor in zones.iter().filter(|z| z.zone_type().is_anchor()) {
        if anchor.id().trim().is_empty() {
            continue;
        }
        let Some(area_type) = anchor.zone_type().paired_area_type() else {
            continue;
        };
        let Some(area_id) = anchor.expected_area_id() else {
            continue;
        };

        if !areas.contains(&(area_id.as_str(), area_type)) {
            issues.push(ValidationIssue::MissingPairedArea {
                anchor_type: anchor.zone_type(),
                anchor_id: anchor.id().to_string(),
                area_type,
                area_id,
            });
        }
    }
}

/// Approximate share of `polygon` that is walkable
///
/// Samples pixel centers of the bounding rectangle on a stride chosen to keep
/// the sample count near `max_samples`. Samples outside the mask are skipped.
/// The result is an estimate; a polygon with no inside samples reports 0.0.
pub fn walkable_fraction(polygon: &Polygon, mask: &WalkMask, max_samples: u64) -> f64 {
    let bounds = polygon.bounds();
    if bounds.width <= 0 || bounds.height <= 0 {
        return 0.0;
    }

    let cells = bounds.area();
    let stride = if cells <= max_samples.max(1) {
        1
    } else {
        (cells as f64 / max_samples.max(1) as f64).sqrt().ceil().max(1.0) as i64
    };

    let mut inside = 0u64;
    let mut walkable = 0u64;
    for y in sample_span(bounds.y, bounds.bottom(), mask.height(), stride) {
        for x in sample_span(bounds.x, bounds.right(), mask.width(), stride) {
            if !polygon.contains_pixel(x, y) {
                continue;
            }
            inside += 1;
            if mask.is_walkable(x, y) {
                walkable += 1;
            }
        }
    }

    if inside == 0 {
        return 0.0;
    }
    walkable as f64 / inside as f64
}

/// Sample positions `start + k * stride` below `end` that fall inside `0..limit`
fn sample_span(start: i64, end: i64, limit: u32, stride: i64) -> impl Iterator<Item = i32> {
    let skip = if start < 0 { (-start + stride - 1) / stride } else { 0 };
    let first = start + skip * stride;
    let end = end.min(limit as i64);
    (first..end).step_by(stride as usize).map(|v| v as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PixelPoint;

    fn open_mask() -> WalkMask {
        WalkMask::filled(100, 100, true).unwrap()
    }

    fn messages(issues: &[ValidationIssue]) -> Vec<String> {
        issues.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_empty_project_messages() {
        let issues = validate_parts(false, None, &[], &ValidationConfig::default());
        assert_eq!(
            messages(&issues),
            vec![
                "No floorplan image rendered.",
                "No walk mask exists (generate auto-mask first).",
                "Missing Spawn anchor (place at least one).",
                "Missing Ticket Counter anchor (place at least one).",
                "Missing Checkpoint anchor (place at least one).",
                "Missing Holdroom anchor (place at least one).",
            ]
        );
    }

    #[test]
    fn test_anchor_checks() {
        let mut mask = open_mask();
        mask.set_walkable(5, 5, false);
        let zones = vec![
            Zone::new("S1", ZoneType::Spawn),
            Zone::anchor("S2", ZoneType::Spawn, PixelPoint::new(200, 5)).unwrap(),
            Zone::anchor("", ZoneType::Spawn, PixelPoint::new(5, 5)).unwrap(),
        ];
        let issues = validate_parts(true, Some(&mask), &zones, &ValidationConfig::default());
        let msgs = messages(&issues);
        assert!(msgs.contains(&"Spawn zone missing anchor: S1".to_string()));
        assert!(msgs.contains(&"Spawn anchor out of bounds: S2".to_string()));
        assert!(msgs.contains(&"Spawn anchor must be on walkable pixel: (no id)".to_string()));
    }

    #[test]
    fn test_anchor_without_mask_skips_placement_checks() {
        let zones = vec![Zone::anchor("S1", ZoneType::Spawn, PixelPoint::new(-5, -5)).unwrap()];
        let issues = validate_parts(true, None, &zones, &ValidationConfig::default());
        assert!(!issues
            .iter()
            .any(|i| matches!(i, ValidationIssue::AnchorOutOfBounds { .. })));
    }

    #[test]
    fn test_polygon_checks() {
        let mut mask = open_mask();
        mask.fill_polygon(&Polygon::rect(50, 50, 20, 20), false);
        let zones = vec![
            Zone::new("A", ZoneType::HoldroomArea),
            Zone::area("B", ZoneType::HoldroomArea, Polygon::rect(0, 0, 5, 5)).unwrap(),
            Zone::area("C", ZoneType::HoldroomArea, Polygon::rect(50, 50, 20, 20)).unwrap(),
        ];
        let issues = validate_parts(true, Some(&mask), &zones, &ValidationConfig::default());
        let msgs = messages(&issues);
        assert!(msgs.contains(&"Holdroom Area polygon missing/invalid: A".to_string()));
        assert!(msgs.contains(&"Holdroom Area polygon too small: B".to_string()));
        assert!(msgs.contains(&"Holdroom Area polygon is mostly blocked (walkable 0%): C".to_string()));
    }

    #[test]
    fn test_pairing_uses_explicit_relation() {
        let mut anchor = Zone::anchor("T1", ZoneType::TicketCounter, PixelPoint::new(10, 10)).unwrap();
        anchor.set_paired_area(Some("LOBBY_QUEUE".into())).unwrap();
        let area = Zone::area("LOBBY_QUEUE", ZoneType::TicketQueueArea, Polygon::rect(20, 20, 30, 30)).unwrap();

        let issues = validate_parts(true, Some(&open_mask()), &[anchor.clone()], &ValidationConfig::default());
        assert!(messages(&issues)
            .contains(&"Ticket Counter T1 needs a TICKET_QUEUE_AREA polygon (id: LOBBY_QUEUE)".to_string()));

        let issues = validate_parts(true, Some(&open_mask()), &[anchor, area], &ValidationConfig::default());
        assert!(!issues
            .iter()
            .any(|i| matches!(i, ValidationIssue::MissingPairedArea { .. })));
    }

    #[test]
    fn test_pairing_requires_matching_type() {
        let anchor = Zone::anchor("C1", ZoneType::Checkpoint, PixelPoint::new(10, 10)).unwrap();
        let wrong = Zone::area("C1_QUEUE", ZoneType::TicketQueueArea, Polygon::rect(20, 20, 30, 30)).unwrap();
        let issues = validate_parts(true, Some(&open_mask()), &[anchor, wrong], &ValidationConfig::default());
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationIssue::MissingPairedArea { .. })));
    }

    #[test]
    fn test_coverage_full_and_empty() {
        let square = Polygon::rect(10, 10, 20, 20);
        assert_eq!(walkable_fraction(&square, &open_mask(), 12_000), 1.0);

        let blocked = WalkMask::new(100, 100).unwrap();
        assert_eq!(walkable_fraction(&square, &blocked, 12_000), 0.0);
    }

    #[test]
    fn test_coverage_half() {
        let mut mask = open_mask();
        mask.fill_polygon(&Polygon::rect(0, 0, 20, 100), false);
        let square = Polygon::rect(10, 10, 20, 20);
        let coverage = walkable_fraction(&square, &mask, 12_000);
        assert!((coverage - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_degenerate_and_outside() {
        let line = Polygon::from(vec![(0, 0), (10, 0), (20, 0)]);
        assert_eq!(walkable_fraction(&line, &open_mask(), 12_000), 0.0);

        let far = Polygon::rect(500, 500, 10, 10);
        assert_eq!(walkable_fraction(&far, &open_mask(), 12_000), 0.0);
    }

    #[test]
    fn test_extreme_polygon_is_checked_without_overflow() {
        let wide = Polygon::from(vec![(i32::MIN, 0), (i32::MAX, 0), (0, 10)]);
        let zones = vec![Zone::area("H1_AREA", ZoneType::HoldroomArea, wide.clone()).unwrap()];
        let issues = validate_parts(true, Some(&open_mask()), &zones, &ValidationConfig::default());
        assert!(!messages(&issues).iter().any(|m| m.contains("too small")));

        // Sampling stays on the polygon's own grid and lands inside a wide mask
        let mask = WalkMask::filled(4000, 20, true).unwrap();
        assert_eq!(walkable_fraction(&wide, &mask, 12_000), 1.0);
    }

    #[test]
    fn test_sample_span_clips_to_mask() {
        let xs: Vec<i32> = sample_span(-10, 30, 20, 4).collect();
        assert_eq!(xs, vec![2, 6, 10, 14, 18]);
        assert_eq!(sample_span(25, 40, 20, 1).count(), 0);
        assert_eq!(sample_span(i32::MIN as i64, i32::MAX as i64, 8, 1).count(), 8);
    }

    #[test]
    fn test_coverage_sampled_stride() {
        let mask = WalkMask::filled(1000, 1000, true).unwrap();
        let big = Polygon::rect(0, 0, 1000, 1000);
        assert_eq!(walkable_fraction(&big, &mask, 100), 1.0);
    }
}
