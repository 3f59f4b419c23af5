#![cfg(feature = "alert-snapshot")]

//! Snapshot alert sink.
//!
//! Saves the frame that tripped the dwell threshold as a JPEG, giving the
//! operator a record of the offending vehicle. Only `Raised` alerts produce
//! a file; `Cleared` is a no-op.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;

use super::{Alert, AlertCode, AlertSink};

pub struct SnapshotSink {
    dir: PathBuf,
}

impl SnapshotSink {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create snapshot directory {}", dir.display()))?;
        Ok(Self { dir })
    }
}

impl AlertSink for SnapshotSink {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn send(&mut self, alert: &Alert<'_>) -> Result<()> {
        if alert.code != AlertCode::Raised {
            return Ok(());
        }
        let frame = alert
            .frame
            .ok_or_else(|| anyhow!("no frame attached to alert"))?;

        let image = RgbImage::from_raw(frame.width, frame.height, frame.pixels().to_vec())
            .ok_or_else(|| anyhow!("frame buffer does not match {}x{}", frame.width, frame.height))?;

        let path = self.dir.join(format!("alert-frame-{}.jpg", frame.frame_index));
        image
            .save(&path)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        log::info!("SnapshotSink: wrote {}", path.display());
        Ok(())
    }
}
