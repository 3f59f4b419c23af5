use std::collections::VecDeque;

use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::backend::DetectorBackend;
use crate::detect::result::{Detection, DetectionResult, ObjectClass};

/// Stub backend for testing and `stub://` sources.
///
/// Two modes:
/// - baseline hashing (default): the first frame becomes the reference scene;
///   any frame whose pixel hash differs from the reference is reported as a
///   single car parked in the lower-left quadrant. Paired with the synthetic
///   camera source this produces deterministic occupancy episodes.
/// - scripted: replays a canned sequence of per-frame detections, then
///   reports empty frames.
pub struct StubBackend {
    baseline_hash: Option<[u8; 32]>,
    script: Option<VecDeque<Vec<Detection>>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            baseline_hash: None,
            script: None,
        }
    }

    /// Replay the given detections frame by frame, then return empty frames.
    pub fn scripted<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Vec<Detection>>,
    {
        Self {
            baseline_hash: None,
            script: Some(frames.into_iter().collect()),
        }
    }

    fn synthetic_car() -> Detection {
        Detection {
            x: 0.05,
            y: 0.60,
            w: 0.30,
            h: 0.30,
            confidence: 0.85,
            class: ObjectClass::Car,
        }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, pixels: &[u8], _width: u32, _height: u32) -> Result<DetectionResult> {
        if let Some(script) = &mut self.script {
            let detections = script.pop_front().unwrap_or_default();
            return Ok(DetectionResult::from_detections(detections));
        }

        let current_hash: [u8; 32] = Sha256::digest(pixels).into();
        let baseline = *self.baseline_hash.get_or_insert(current_hash);

        if baseline != current_hash {
            Ok(DetectionResult::from_detections(vec![
                Self::synthetic_car(),
            ]))
        } else {
            Ok(DetectionResult::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_mode_reports_car_on_scene_change() {
        let mut backend = StubBackend::new();

        let r1 = backend.detect(b"scene-a", 10, 10).unwrap();
        assert!(r1.detections.is_empty());

        let r2 = backend.detect(b"scene-b", 10, 10).unwrap();
        assert_eq!(r2.detections.len(), 1);
        assert_eq!(r2.detections[0].class, ObjectClass::Car);
        assert_eq!(r2.confidence, 0.85);

        // Returning to the baseline scene clears the detection.
        let r3 = backend.detect(b"scene-a", 10, 10).unwrap();
        assert!(r3.detections.is_empty());
    }

    #[test]
    fn scripted_mode_replays_then_goes_empty() {
        let det = StubBackend::synthetic_car();
        let mut backend = StubBackend::scripted(vec![vec![det], vec![]]);

        assert_eq!(backend.detect(b"x", 1, 1).unwrap().detections.len(), 1);
        assert!(backend.detect(b"x", 1, 1).unwrap().detections.is_empty());
        assert!(backend.detect(b"x", 1, 1).unwrap().detections.is_empty());
    }
}
