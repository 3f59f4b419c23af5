//! No-parking zone geometry and per-frame filtering.
//!
//! The restricted region is the area left of a vertical boundary and below a
//! horizontal boundary, both expressed as fractions of the frame. A detection
//! qualifies when its whole box width sits left of the vertical boundary and
//! its top edge sits below the horizontal one.

use std::collections::HashSet;

use anyhow::{anyhow, Result};

use crate::detect::{Detection, DetectionResult, ObjectClass};

/// Restricted region, fixed for the session.
#[derive(Clone, Copy, Debug)]
pub struct Zone {
    /// Fraction of frame width; boxes must lie entirely left of this line.
    pub vertical_boundary: f32,
    /// Fraction of frame height; box tops must lie below this line
    /// (y grows downward).
    pub horizontal_boundary: f32,
}

impl Zone {
    pub fn new(vertical_boundary: f32, horizontal_boundary: f32) -> Result<Self> {
        for (name, value) in [
            ("vertical_boundary", vertical_boundary),
            ("horizontal_boundary", horizontal_boundary),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(anyhow!(
                    "zone {} must be a fraction in (0, 1], got {}",
                    name,
                    value
                ));
            }
        }
        Ok(Self {
            vertical_boundary,
            horizontal_boundary,
        })
    }

    /// Geometric predicate: is this box inside the restricted region?
    pub fn contains(&self, detection: &Detection) -> bool {
        detection.x < self.vertical_boundary
            && detection.right() < self.vertical_boundary
            && detection.y > self.horizontal_boundary
    }
}

impl Default for Zone {
    /// Left half of the frame, below 25% of its height.
    fn default() -> Self {
        Self {
            vertical_boundary: 0.5,
            horizontal_boundary: 0.25,
        }
    }
}

/// Counts qualifying objects per frame: allowed class, confident enough,
/// inside the zone.
#[derive(Clone, Debug)]
pub struct ZoneFilter {
    zone: Zone,
    allowed_classes: HashSet<ObjectClass>,
    min_confidence: f32,
}

impl ZoneFilter {
    pub fn new(zone: Zone, allowed_classes: Vec<ObjectClass>, min_confidence: f32) -> Result<Self> {
        if allowed_classes.is_empty() {
            return Err(anyhow!("at least one allowed object class is required"));
        }
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(anyhow!(
                "min_confidence must be within 0..=1, got {}",
                min_confidence
            ));
        }
        Ok(Self {
            zone,
            allowed_classes: allowed_classes.into_iter().collect(),
            min_confidence,
        })
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Number of qualifying objects in this frame's detections.
    pub fn qualifying_count(&self, result: &DetectionResult) -> usize {
        result
            .detections
            .iter()
            .filter(|d| d.confidence >= self.min_confidence)
            .filter(|d| self.allowed_classes.contains(&d.class))
            .filter(|d| self.zone.contains(d))
            .count()
    }
}
