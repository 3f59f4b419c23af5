use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Result of running detection on a frame.
#[derive(Clone, Debug, Default)]
pub struct DetectionResult {
    /// Bounding boxes (normalized 0..1 coordinates).
    pub detections: Vec<Detection>,
    /// Confidence of the strongest detection this frame.
    pub confidence: f32,
}

impl DetectionResult {
    pub fn from_detections(detections: Vec<Detection>) -> Self {
        let confidence = detections
            .iter()
            .map(|d| d.confidence)
            .fold(0.0_f32, f32::max);
        Self {
            detections,
            confidence,
        }
    }
}

/// A single detected object. Coordinates are normalized to 0..1 with the
/// origin at the top-left corner; `y` grows downward.
#[derive(Clone, Copy, Debug)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub confidence: f32,
    pub class: ObjectClass,
}

impl Detection {
    /// Right edge of the bounding box.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge of the bounding box.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Object classes the zone filter can be configured to count.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    Person,
    Car,
    Motorcycle,
    Bus,
    Truck,
    Unknown,
}

impl ObjectClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::Person => "person",
            ObjectClass::Car => "car",
            ObjectClass::Motorcycle => "motorcycle",
            ObjectClass::Bus => "bus",
            ObjectClass::Truck => "truck",
            ObjectClass::Unknown => "unknown",
        }
    }

    /// Map a COCO class index to an object class. Indices follow the SSD
    /// MobileNet label file (1-based): 1 person, 3 car, 4 motorcycle,
    /// 6 bus, 8 truck.
    pub fn from_coco_index(index: i64) -> Self {
        match index {
            1 => ObjectClass::Person,
            3 => ObjectClass::Car,
            4 => ObjectClass::Motorcycle,
            6 => ObjectClass::Bus,
            8 => ObjectClass::Truck,
            _ => ObjectClass::Unknown,
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectClass {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "person" => Ok(ObjectClass::Person),
            "car" => Ok(ObjectClass::Car),
            "motorcycle" | "motorbike" => Ok(ObjectClass::Motorcycle),
            "bus" => Ok(ObjectClass::Bus),
            "truck" => Ok(ObjectClass::Truck),
            other => Err(anyhow!("unknown object class '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_confidence_tracks_strongest_detection() {
        let result = DetectionResult::from_detections(vec![
            Detection {
                x: 0.1,
                y: 0.1,
                w: 0.2,
                h: 0.2,
                confidence: 0.4,
                class: ObjectClass::Car,
            },
            Detection {
                x: 0.5,
                y: 0.5,
                w: 0.1,
                h: 0.1,
                confidence: 0.9,
                class: ObjectClass::Truck,
            },
        ]);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn coco_indices_map_to_vehicle_classes() {
        assert_eq!(ObjectClass::from_coco_index(3), ObjectClass::Car);
        assert_eq!(ObjectClass::from_coco_index(8), ObjectClass::Truck);
        assert_eq!(ObjectClass::from_coco_index(42), ObjectClass::Unknown);
    }

    #[test]
    fn class_names_round_trip() {
        assert_eq!("motorbike".parse::<ObjectClass>().unwrap(), ObjectClass::Motorcycle);
        assert!("bicycle".parse::<ObjectClass>().is_err());
    }
}
