//! curbwatchd - no-parking zone dwell monitor daemon
//!
//! This daemon:
//! 1. Ingests frames from the configured camera (V4L2 or synthetic stub)
//! 2. Runs the configured detector backend on each frame
//! 3. Counts vehicle-like detections inside the restricted zone
//! 4. Feeds the count into the dwell timer
//! 5. Dispatches raise/clear alerts to the configured sinks

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use curbwatch::{
    AlertChannel, AlertDispatcher, AlertSink, BackendRegistry, CameraSource, CurbwatchConfig,
    DwellTimer, LogSink, Pipeline, Zone, ZoneFilter,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the JSON config file.
    #[arg(long, env = "CURBWATCH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = CurbwatchConfig::load(args.config.as_deref())?;

    let mut source = CameraSource::new(cfg.camera.clone())?;
    source
        .connect()
        .with_context(|| format!("camera {} unavailable", cfg.camera.device))?;

    let registry = build_detector(&cfg)?;
    registry.warm_up_default()?;

    let dispatcher = build_dispatcher(&cfg)?;
    log::info!("alert channels: {}", dispatcher.sink_names().join(", "));

    let zone = Zone::new(cfg.zone.vertical_boundary, cfg.zone.horizontal_boundary)?;
    let filter = ZoneFilter::new(zone, cfg.zone.classes.clone(), cfg.detector.min_confidence)?;
    let timer = DwellTimer::new(cfg.dwell_threshold);
    let mut pipeline = Pipeline::new(registry, filter, timer, dispatcher);

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })
        .context("error setting Ctrl-C handler")?;
    }

    log::info!(
        "curbwatchd running. camera={} backend={} zone=({:.2}, {:.2}) dwell={}s",
        cfg.camera.device,
        cfg.detector.backend,
        zone.vertical_boundary,
        zone.horizontal_boundary,
        cfg.dwell_threshold.as_secs()
    );

    let frame_interval = Duration::from_millis(1000 / u64::from(cfg.camera.target_fps.max(1)));
    let mut last_health_log = Instant::now();

    while running.load(Ordering::SeqCst) {
        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("frame capture failed: {:#}", e);
                if !source.is_healthy() {
                    return Err(anyhow!(
                        "camera {} is unhealthy, shutting down",
                        cfg.camera.device
                    ));
                }
                std::thread::sleep(frame_interval);
                continue;
            }
        };

        let outcome = pipeline.process_frame(&frame, frame.captured_at);
        if let Some(event) = outcome.event {
            log::info!(
                "frame #{}: {:?} (qualifying={})",
                frame.frame_index,
                event,
                outcome.qualifying
            );
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            let stats = source.stats();
            log::info!(
                "camera health={} frames={} device={} state={:?}",
                source.is_healthy(),
                stats.frames_captured,
                stats.device,
                pipeline.state()
            );
            last_health_log = Instant::now();
        }

        std::thread::sleep(frame_interval);
    }

    log::info!("shutdown signal received, stopping");
    Ok(())
}

fn build_detector(cfg: &CurbwatchConfig) -> Result<BackendRegistry> {
    let mut registry = BackendRegistry::new();
    registry.register(curbwatch::detect::backends::StubBackend::new());

    #[cfg(feature = "backend-tract")]
    if cfg.detector.backend == "tract" {
        let model_path = cfg
            .detector
            .model_path
            .as_ref()
            .ok_or_else(|| anyhow!("detector backend 'tract' requires detector.model_path"))?;
        let backend = curbwatch::detect::backends::TractBackend::new(
            model_path,
            cfg.camera.width,
            cfg.camera.height,
        )?
        .with_threshold(cfg.detector.min_confidence);
        registry.register(backend);
    }

    #[cfg(not(feature = "backend-tract"))]
    if cfg.detector.backend == "tract" {
        return Err(anyhow!(
            "detector backend 'tract' requires the backend-tract feature"
        ));
    }

    registry.set_default(&cfg.detector.backend)?;
    Ok(registry)
}

fn build_dispatcher(cfg: &CurbwatchConfig) -> Result<AlertDispatcher> {
    let mut sinks: Vec<Box<dyn AlertSink>> = Vec::new();
    for channel in &cfg.alerts.channels {
        match channel {
            AlertChannel::Log => sinks.push(Box::new(LogSink)),
            AlertChannel::Serial => {
                #[cfg(feature = "alert-serial")]
                {
                    let port = cfg
                        .alerts
                        .serial_port
                        .as_ref()
                        .ok_or_else(|| anyhow!("alert channel 'serial' requires a serial port"))?;
                    sinks.push(Box::new(curbwatch::SerialSink::open(
                        port,
                        cfg.alerts.serial_baud,
                    )?));
                }
                #[cfg(not(feature = "alert-serial"))]
                return Err(anyhow!(
                    "alert channel 'serial' requires the alert-serial feature"
                ));
            }
            AlertChannel::Snapshot => {
                #[cfg(feature = "alert-snapshot")]
                {
                    let dir = cfg
                        .alerts
                        .snapshot_dir
                        .clone()
                        .ok_or_else(|| anyhow!("alert channel 'snapshot' requires a directory"))?;
                    sinks.push(Box::new(curbwatch::SnapshotSink::new(dir)?));
                }
                #[cfg(not(feature = "alert-snapshot"))]
                return Err(anyhow!(
                    "alert channel 'snapshot' requires the alert-snapshot feature"
                ));
            }
        }
    }
    Ok(AlertDispatcher::new(sinks))
}
