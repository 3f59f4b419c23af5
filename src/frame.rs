//! Raw frame container.
//!
//! Frames are RGB24 rasters produced by the ingestion layer and consumed by
//! detector backends and alert sinks. A frame is immutable after capture and
//! discarded once the pipeline has processed it.

use anyhow::{anyhow, Result};
use std::time::Instant;

/// A single captured frame.
///
/// Pixels are tightly packed RGB24, row-major, `width * height * 3` bytes.
#[derive(Debug)]
pub struct RawFrame {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Monotonic capture counter assigned by the source.
    pub frame_index: u64,
    /// Monotonic capture instant, used by the dwell timer.
    pub captured_at: Instant,
}

impl RawFrame {
    /// Create a frame from raw RGB24 bytes. Called only by the ingestion layer.
    pub(crate) fn new(pixels: Vec<u8>, width: u32, height: u32, frame_index: u64) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(anyhow!(
                "RGB frame length mismatch for {}x{}: expected {}, got {}",
                width,
                height,
                expected,
                pixels.len()
            ));
        }
        Ok(Self {
            pixels,
            width,
            height,
            frame_index,
            captured_at: Instant::now(),
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_validates_pixel_length() {
        let frame = RawFrame::new(vec![0u8; 2 * 2 * 3], 2, 2, 1).unwrap();
        assert_eq!(frame.pixels().len(), 12);

        let err = RawFrame::new(vec![0u8; 11], 2, 2, 2).unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }
}
