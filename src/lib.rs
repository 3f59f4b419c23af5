//! curbwatch
//!
//! This crate implements a no-parking zone dwell monitor: frames from a
//! camera run through an object detector, detections are filtered against a
//! configured restricted zone, and a dwell timer raises exactly one alert per
//! continuous occupancy episode once a threshold is exceeded.
//!
//! # Reliability rules
//!
//! 1. **Fatal only at startup**: a camera or serial device that cannot open
//!    aborts with a clear diagnostic before the loop starts.
//! 2. **Detector failures degrade**: a backend error on one frame is logged
//!    and treated as zero detections, never terminating the loop.
//! 3. **Alert delivery is best-effort**: sink write failures are logged and
//!    swallowed; the occupancy state machine always completes its transition.
//! 4. **One alert per episode**: the raise fires once when the dwell exceeds
//!    the threshold, the clear fires once when an alerted episode ends.
//!
//! # Module Structure
//!
//! - `ingest`: frame sources (V4L2 devices, synthetic stub)
//! - `detect`: detector backends and their registry
//! - `zone`: restricted-region geometry and per-frame filtering
//! - `dwell`: the occupancy dwell timer (the core state machine)
//! - `alert`: alert codes, sinks, and the dispatcher
//! - `pipeline`: per-frame detect → filter → dwell → dispatch glue
//! - `config`: file + environment configuration surface

pub mod alert;
pub mod config;
pub mod detect;
pub mod dwell;
pub mod frame;
pub mod ingest;
pub mod pipeline;
pub mod zone;

pub use alert::{Alert, AlertCode, AlertDispatcher, AlertSink, LogSink};
#[cfg(feature = "alert-serial")]
pub use alert::SerialSink;
#[cfg(feature = "alert-snapshot")]
pub use alert::SnapshotSink;
pub use config::{AlertChannel, CurbwatchConfig};
pub use detect::{BackendRegistry, Detection, DetectionResult, DetectorBackend, ObjectClass};
pub use dwell::{DwellEvent, DwellState, DwellTimer};
pub use frame::RawFrame;
pub use ingest::{CameraConfig, CameraSource};
pub use pipeline::{FrameOutcome, Pipeline};
pub use zone::{Zone, ZoneFilter};
