//! Per-frame processing pipeline.
//!
//! Pull-based: the daemon reads a frame, hands it to `process_frame`, and the
//! pipeline runs detection, zone filtering, the dwell timer, and alert
//! dispatch in that order. Detector failures degrade to an empty frame and
//! alert delivery failures are absorbed by the dispatcher, so a single
//! malformed frame or an unplugged serial cable never stops the loop.

use std::time::Instant;

use crate::alert::{Alert, AlertCode, AlertDispatcher};
use crate::detect::{BackendRegistry, DetectionResult};
use crate::dwell::{DwellEvent, DwellState, DwellTimer};
use crate::frame::RawFrame;
use crate::zone::ZoneFilter;

/// What one frame produced.
#[derive(Clone, Copy, Debug)]
pub struct FrameOutcome {
    /// Raw detections returned by the backend.
    pub detections: usize,
    /// Detections that qualified for the zone.
    pub qualifying: usize,
    /// Dwell transition, if one fired.
    pub event: Option<DwellEvent>,
    /// True when the detector failed and the frame was treated as empty.
    pub detector_degraded: bool,
}

pub struct Pipeline {
    detector: BackendRegistry,
    filter: ZoneFilter,
    timer: DwellTimer,
    dispatcher: AlertDispatcher,
}

impl Pipeline {
    pub fn new(
        detector: BackendRegistry,
        filter: ZoneFilter,
        timer: DwellTimer,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self {
            detector,
            filter,
            timer,
            dispatcher,
        }
    }

    pub fn state(&self) -> DwellState {
        self.timer.state()
    }

    /// Process one frame at time `now`.
    ///
    /// `now` is injected rather than sampled here so tests can drive the
    /// dwell timer with simulated time.
    pub fn process_frame(&mut self, frame: &RawFrame, now: Instant) -> FrameOutcome {
        let mut detector_degraded = false;
        let result = match self
            .detector
            .detect(frame.pixels(), frame.width, frame.height)
        {
            Ok(result) => result,
            Err(e) => {
                log::warn!(
                    "detector failed on frame {}: {:#}; treating frame as empty",
                    frame.frame_index,
                    e
                );
                detector_degraded = true;
                DetectionResult::default()
            }
        };

        let qualifying = self.filter.qualifying_count(&result);
        let event = self.timer.observe(qualifying, now);

        if let Some(event) = event {
            let (code, dwell) = match event {
                DwellEvent::AlertRaised { dwell } => (AlertCode::Raised, dwell),
                DwellEvent::ZoneCleared { dwell } => (AlertCode::Cleared, dwell),
            };
            self.dispatcher.dispatch(&Alert {
                code,
                dwell,
                frame: Some(frame),
            });
        }

        FrameOutcome {
            detections: result.detections.len(),
            qualifying,
            event,
            detector_degraded,
        }
    }
}
