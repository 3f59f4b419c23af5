//! Alert dispatch.
//!
//! When the dwell timer raises or clears an alert, the dispatcher fans it out
//! to every configured sink. Sink failures are logged and swallowed: alert
//! delivery is a collaborator concern and must never disturb the occupancy
//! state machine or terminate the capture loop.

#[cfg(feature = "alert-serial")]
pub mod serial;
#[cfg(feature = "alert-snapshot")]
pub mod snapshot;

use std::time::Duration;

use anyhow::Result;

use crate::frame::RawFrame;

#[cfg(feature = "alert-serial")]
pub use serial::SerialSink;
#[cfg(feature = "alert-snapshot")]
pub use snapshot::SnapshotSink;

/// One-byte wire codes understood by the downstream microcontroller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertCode {
    /// Dwell threshold exceeded.
    Raised,
    /// An alerted episode ended.
    Cleared,
}

impl AlertCode {
    pub fn as_byte(&self) -> u8 {
        match self {
            AlertCode::Raised => b'1',
            AlertCode::Cleared => b'0',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCode::Raised => "raised",
            AlertCode::Cleared => "cleared",
        }
    }
}

/// A single alert handed to sinks. Borrowed, valid for the current frame only.
pub struct Alert<'a> {
    pub code: AlertCode,
    /// Continuous dwell duration at the time of the transition.
    pub dwell: Duration,
    /// Frame that triggered the transition, when available.
    pub frame: Option<&'a RawFrame>,
}

/// Alert delivery channel.
pub trait AlertSink: Send {
    /// Sink identifier, used for config selection and logging.
    fn name(&self) -> &'static str;

    /// Deliver one alert.
    fn send(&mut self, alert: &Alert<'_>) -> Result<()>;
}

/// Always-available sink that emits a structured log line.
pub struct LogSink;

impl AlertSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn send(&mut self, alert: &Alert<'_>) -> Result<()> {
        match alert.code {
            AlertCode::Raised => log::warn!(
                "illegal parking alert: zone occupied for {:.1}s",
                alert.dwell.as_secs_f64()
            ),
            AlertCode::Cleared => log::info!(
                "zone cleared after {:.1}s of occupancy",
                alert.dwell.as_secs_f64()
            ),
        }
        Ok(())
    }
}

/// Fans an alert out to every configured sink.
pub struct AlertDispatcher {
    sinks: Vec<Box<dyn AlertSink>>,
}

impl AlertDispatcher {
    pub fn new(sinks: Vec<Box<dyn AlertSink>>) -> Self {
        Self { sinks }
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    /// Deliver to all sinks. Failures are logged, never propagated.
    pub fn dispatch(&mut self, alert: &Alert<'_>) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.send(alert) {
                log::error!("alert sink '{}' failed: {:#}", sink.name(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FailingSink;

    impl AlertSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn send(&mut self, _alert: &Alert<'_>) -> Result<()> {
            Err(anyhow!("device not connected"))
        }
    }

    struct CountingSink(Arc<AtomicUsize>);

    impl AlertSink for CountingSink {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn send(&mut self, _alert: &Alert<'_>) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn wire_codes_match_protocol() {
        assert_eq!(AlertCode::Raised.as_byte(), b'1');
        assert_eq!(AlertCode::Cleared.as_byte(), b'0');
    }

    #[test]
    fn sink_failure_does_not_stop_other_sinks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = AlertDispatcher::new(vec![
            Box::new(FailingSink),
            Box::new(CountingSink(counter.clone())),
        ]);

        dispatcher.dispatch(&Alert {
            code: AlertCode::Raised,
            dwell: Duration::from_secs(6),
            frame: None,
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
