//! End-to-end pipeline test: synthetic camera, stub detector, recording sink.
//!
//! The synthetic camera alternates between an empty and an occupied scene
//! every 50 frames; the stub detector reports a parked car whenever the scene
//! differs from its baseline. Driving the pipeline with simulated timestamps
//! at 10 fps must yield exactly one raise and one clear per long episode.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;

use curbwatch::detect::backends::StubBackend;
use curbwatch::{
    Alert, AlertCode, AlertDispatcher, AlertSink, BackendRegistry, CameraConfig, CameraSource,
    DwellState, DwellTimer, ObjectClass, Pipeline, Zone, ZoneFilter,
};

struct RecordingSink(Arc<Mutex<Vec<(AlertCode, Duration)>>>);

impl AlertSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn send(&mut self, alert: &Alert<'_>) -> Result<()> {
        self.0.lock().unwrap().push((alert.code, alert.dwell));
        Ok(())
    }
}

fn build_pipeline(threshold: Duration) -> (Pipeline, Arc<Mutex<Vec<(AlertCode, Duration)>>>) {
    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::new());

    let filter = ZoneFilter::new(
        Zone::default(),
        vec![ObjectClass::Car, ObjectClass::Truck],
        0.5,
    )
    .expect("zone filter");

    let codes = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = AlertDispatcher::new(vec![Box::new(RecordingSink(codes.clone()))]);

    (
        Pipeline::new(registry, filter, DwellTimer::new(threshold), dispatcher),
        codes,
    )
}

#[test]
fn long_occupancy_episode_raises_once_then_clears() -> Result<()> {
    let mut source = CameraSource::new(CameraConfig {
        device: "stub://integration".to_string(),
        target_fps: 10,
        width: 64,
        height: 48,
    })?;
    source.connect()?;

    let (mut pipeline, codes) = build_pipeline(Duration::from_secs(2));

    // 160 frames at a simulated 10 fps: 5s empty, 5s occupied, 5s empty,
    // then 1s occupied (too short to alert).
    let base = Instant::now();
    for i in 0..160u64 {
        let frame = source.next_frame()?;
        pipeline.process_frame(&frame, base + Duration::from_millis(i * 100));
    }

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 2, "expected one raise and one clear: {codes:?}");
    assert_eq!(codes[0].0, AlertCode::Raised);
    assert!(codes[0].1 > Duration::from_secs(2));
    assert_eq!(codes[1].0, AlertCode::Cleared);

    // The trailing short episode left the zone occupied but un-alerted.
    assert!(matches!(
        pipeline.state(),
        DwellState::OccupiedWaiting { .. }
    ));

    Ok(())
}

#[test]
fn six_second_episode_alerts_after_the_five_second_mark() -> Result<()> {
    let mut source = CameraSource::new(CameraConfig {
        device: "stub://integration".to_string(),
        target_fps: 10,
        width: 64,
        height: 48,
    })?;
    source.connect()?;

    // Scripted occupancy: a parked car on every frame for 6 simulated seconds.
    let car = curbwatch::Detection {
        x: 0.05,
        y: 0.6,
        w: 0.3,
        h: 0.3,
        confidence: 0.9,
        class: ObjectClass::Car,
    };
    let script: Vec<Vec<curbwatch::Detection>> = (0..=60).map(|_| vec![car]).collect();

    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::scripted(script));
    let filter = ZoneFilter::new(Zone::default(), vec![ObjectClass::Car], 0.5).expect("filter");
    let codes = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = AlertDispatcher::new(vec![Box::new(RecordingSink(codes.clone()))]);
    let mut pipeline = Pipeline::new(
        registry,
        filter,
        DwellTimer::new(Duration::from_secs(5)),
        dispatcher,
    );

    let base = Instant::now();
    let mut raised_at = None;
    for i in 0..=60u64 {
        let frame = source.next_frame()?;
        let now = base + Duration::from_millis(i * 100);
        let outcome = pipeline.process_frame(&frame, now);
        if let Some(curbwatch::DwellEvent::AlertRaised { .. }) = outcome.event {
            raised_at = Some(i);
        }
    }

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].0, AlertCode::Raised);
    assert!(codes[0].1 > Duration::from_secs(5));
    // Fired at or after the 5.0s mark, never before.
    assert!(raised_at.unwrap() > 50);
    assert!(matches!(
        pipeline.state(),
        DwellState::OccupiedAlerted { .. }
    ));

    Ok(())
}
