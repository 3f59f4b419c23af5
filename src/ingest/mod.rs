//! Frame ingestion sources.
//!
//! This module provides sources of raw frames for the detection pipeline:
//! - V4L2 devices such as /dev/video0 (feature: ingest-v4l2)
//! - Synthetic source for `stub://` device strings (always available, used
//!   by tests and the default config)
//!
//! All sources produce `RawFrame` instances at the configured geometry. The
//! ingestion layer owns frame pacing and source health; it performs no
//! detection and no alerting.

pub mod camera;

pub use camera::{CameraConfig, CameraSource, CameraStats};
