use anyhow::Result;

use crate::detect::result::DetectionResult;

/// Detector backend trait.
///
/// Backends receive read-only RGB24 pixel data and return bounding boxes in
/// normalized coordinates. Implementations must not retain pixel data beyond
/// the `detect` call and must not perform network I/O; model weights are
/// loaded from local files at construction time.
pub trait DetectorBackend: Send {
    /// Backend identifier, used for config selection and logging.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<DetectionResult>;

    /// Optional warm-up hook, run once before the capture loop starts.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
