#![cfg(feature = "alert-serial")]

//! Serial alert sink.
//!
//! Writes the one-byte alert code to a microcontroller over a serial link.
//! The port is opened once at startup from the loop thread and is the only
//! writer, so no locking is needed. An open failure is fatal at startup; a
//! write failure at runtime is reported to the dispatcher, which logs it and
//! leaves the occupancy state untouched.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_serial::SerialPort;

use super::{Alert, AlertSink};

const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

pub struct SerialSink {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialSink {
    /// Open the serial device. Called once at startup.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = tokio_serial::new(path, baud_rate)
            .timeout(WRITE_TIMEOUT)
            .open()
            .with_context(|| format!("failed to open serial port {} at {} baud", path, baud_rate))?;
        log::info!("SerialSink: opened {} at {} baud", path, baud_rate);
        Ok(Self {
            port,
            path: path.to_string(),
        })
    }
}

impl AlertSink for SerialSink {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn send(&mut self, alert: &Alert<'_>) -> Result<()> {
        self.port
            .write_all(&[alert.code.as_byte()])
            .with_context(|| format!("serial write to {} failed", self.path))?;
        self.port
            .flush()
            .with_context(|| format!("serial flush on {} failed", self.path))?;
        log::debug!(
            "SerialSink: wrote '{}' ({}) to {}",
            alert.code.as_byte() as char,
            alert.code.as_str(),
            self.path
        );
        Ok(())
    }
}
