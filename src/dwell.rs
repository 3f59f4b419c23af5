//! Occupancy dwell timer.
//!
//! Tracks whether the no-parking zone is occupied, measures continuous dwell
//! duration, and raises exactly one alert per occupancy episode once the dwell
//! threshold is exceeded. The clock is injected: `observe` receives the frame
//! timestamp instead of reading a global, so the state machine can be driven
//! with simulated time in tests.
//!
//! State machine, evaluated once per frame with the qualifying-object count:
//!
//! - `Empty` + count>0 → `OccupiedWaiting`, episode start recorded
//! - `OccupiedWaiting` + count>0 → `OccupiedAlerted` once dwell exceeds the
//!   threshold (strictly greater), emitting `AlertRaised` exactly once
//! - `OccupiedAlerted` + count>0 → unchanged, no repeat alert
//! - any state + count==0 → `Empty`; leaving `OccupiedAlerted` emits
//!   `ZoneCleared` once, so a downstream microcontroller can stand down
//!
//! The alerted flag and the episode start live inside the occupied states and
//! are therefore cleared together on the occupied→empty edge.

use std::time::{Duration, Instant};

/// Occupancy state of the zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DwellState {
    /// No qualifying object in the zone.
    Empty,
    /// Zone occupied, threshold not yet exceeded.
    OccupiedWaiting { since: Instant },
    /// Zone occupied and the one-shot alert for this episode has fired.
    OccupiedAlerted { since: Instant },
}

impl DwellState {
    pub fn is_occupied(&self) -> bool {
        !matches!(self, DwellState::Empty)
    }

    /// Start of the current occupancy episode, if any.
    pub fn episode_start(&self) -> Option<Instant> {
        match self {
            DwellState::Empty => None,
            DwellState::OccupiedWaiting { since } | DwellState::OccupiedAlerted { since } => {
                Some(*since)
            }
        }
    }
}

/// Transition output worth acting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DwellEvent {
    /// The dwell threshold was exceeded; fires once per episode.
    AlertRaised { dwell: Duration },
    /// An alerted episode ended; fires once per alerted episode.
    ZoneCleared { dwell: Duration },
}

/// Per-session dwell timer.
#[derive(Clone, Debug)]
pub struct DwellTimer {
    threshold: Duration,
    state: DwellState,
}

impl DwellTimer {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: DwellState::Empty,
        }
    }

    pub fn state(&self) -> DwellState {
        self.state
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Apply one frame's qualifying count at time `now`.
    pub fn observe(&mut self, count: usize, now: Instant) -> Option<DwellEvent> {
        if count == 0 {
            let prev = self.state;
            self.state = DwellState::Empty;
            return match prev {
                DwellState::OccupiedAlerted { since } => Some(DwellEvent::ZoneCleared {
                    dwell: now.saturating_duration_since(since),
                }),
                _ => None,
            };
        }

        match self.state {
            DwellState::Empty => {
                self.state = DwellState::OccupiedWaiting { since: now };
                None
            }
            DwellState::OccupiedWaiting { since } => {
                let dwell = now.saturating_duration_since(since);
                if dwell > self.threshold {
                    self.state = DwellState::OccupiedAlerted { since };
                    Some(DwellEvent::AlertRaised { dwell })
                } else {
                    None
                }
            }
            DwellState::OccupiedAlerted { .. } => None,
        }
    }
}
