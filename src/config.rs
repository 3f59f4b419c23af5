use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::detect::ObjectClass;
use crate::ingest::CameraConfig;
use crate::zone::Zone;

const DEFAULT_CAMERA_DEVICE: &str = "stub://curb_camera";
const DEFAULT_CAMERA_FPS: u32 = 10;
const DEFAULT_CAMERA_WIDTH: u32 = 1280;
const DEFAULT_CAMERA_HEIGHT: u32 = 720;
const DEFAULT_DETECTOR_BACKEND: &str = "stub";
const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;
const DEFAULT_VERTICAL_BOUNDARY: f32 = 0.5;
const DEFAULT_HORIZONTAL_BOUNDARY: f32 = 0.25;
const DEFAULT_DWELL_SECS: u64 = 180;
const DEFAULT_SERIAL_BAUD: u32 = 9600;

#[derive(Debug, Deserialize, Default)]
struct CurbwatchConfigFile {
    camera: Option<CameraConfigFile>,
    detector: Option<DetectorConfigFile>,
    zone: Option<ZoneConfigFile>,
    dwell: Option<DwellConfigFile>,
    alerts: Option<AlertConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    backend: Option<String>,
    model_path: Option<PathBuf>,
    min_confidence: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct ZoneConfigFile {
    vertical_boundary: Option<f32>,
    horizontal_boundary: Option<f32>,
    classes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct DwellConfigFile {
    threshold_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct AlertConfigFile {
    channels: Option<Vec<String>>,
    serial_port: Option<String>,
    serial_baud: Option<u32>,
    snapshot_dir: Option<PathBuf>,
}

/// Alert delivery channels recognized in config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertChannel {
    Log,
    Serial,
    Snapshot,
}

impl FromStr for AlertChannel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "log" | "print" => Ok(AlertChannel::Log),
            "serial" => Ok(AlertChannel::Serial),
            "snapshot" => Ok(AlertChannel::Snapshot),
            other => Err(anyhow!(
                "unknown alert channel '{}' (expected log, serial, or snapshot)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CurbwatchConfig {
    pub camera: CameraConfig,
    pub detector: DetectorSettings,
    pub zone: ZoneSettings,
    pub dwell_threshold: Duration,
    pub alerts: AlertSettings,
}

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub backend: String,
    pub model_path: Option<PathBuf>,
    pub min_confidence: f32,
}

#[derive(Debug, Clone)]
pub struct ZoneSettings {
    pub vertical_boundary: f32,
    pub horizontal_boundary: f32,
    pub classes: Vec<ObjectClass>,
}

#[derive(Debug, Clone)]
pub struct AlertSettings {
    pub channels: Vec<AlertChannel>,
    pub serial_port: Option<String>,
    pub serial_baud: u32,
    pub snapshot_dir: Option<PathBuf>,
}

impl CurbwatchConfig {
    /// Load configuration: file (CLI override or `CURBWATCH_CONFIG`), then
    /// environment overrides, then validation.
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var("CURBWATCH_CONFIG").ok().map(PathBuf::from);
        let path = path_override.map(Path::to_path_buf).or(env_path);
        let file_cfg = match path.as_deref() {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: CurbwatchConfigFile) -> Result<Self> {
        let camera = CameraConfig {
            device: file
                .camera
                .as_ref()
                .and_then(|camera| camera.device.clone())
                .unwrap_or_else(|| DEFAULT_CAMERA_DEVICE.to_string()),
            target_fps: file
                .camera
                .as_ref()
                .and_then(|camera| camera.target_fps)
                .unwrap_or(DEFAULT_CAMERA_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|camera| camera.width)
                .unwrap_or(DEFAULT_CAMERA_WIDTH),
            height: file
                .camera
                .as_ref()
                .and_then(|camera| camera.height)
                .unwrap_or(DEFAULT_CAMERA_HEIGHT),
        };

        let detector = DetectorSettings {
            backend: file
                .detector
                .as_ref()
                .and_then(|detector| detector.backend.clone())
                .unwrap_or_else(|| DEFAULT_DETECTOR_BACKEND.to_string()),
            model_path: file.detector.as_ref().and_then(|d| d.model_path.clone()),
            min_confidence: file
                .detector
                .as_ref()
                .and_then(|detector| detector.min_confidence)
                .unwrap_or(DEFAULT_MIN_CONFIDENCE),
        };

        let classes = match file.zone.as_ref().and_then(|zone| zone.classes.clone()) {
            Some(names) => parse_classes(&names)?,
            None => vec![
                ObjectClass::Person,
                ObjectClass::Car,
                ObjectClass::Motorcycle,
                ObjectClass::Bus,
                ObjectClass::Truck,
            ],
        };
        let zone = ZoneSettings {
            vertical_boundary: file
                .zone
                .as_ref()
                .and_then(|zone| zone.vertical_boundary)
                .unwrap_or(DEFAULT_VERTICAL_BOUNDARY),
            horizontal_boundary: file
                .zone
                .as_ref()
                .and_then(|zone| zone.horizontal_boundary)
                .unwrap_or(DEFAULT_HORIZONTAL_BOUNDARY),
            classes,
        };

        let dwell_threshold = Duration::from_secs(
            file.dwell
                .and_then(|dwell| dwell.threshold_secs)
                .unwrap_or(DEFAULT_DWELL_SECS),
        );

        let channels = match file.alerts.as_ref().and_then(|alerts| alerts.channels.clone()) {
            Some(names) => parse_channels(&names)?,
            None => vec![AlertChannel::Log],
        };
        let alerts = AlertSettings {
            channels,
            serial_port: file.alerts.as_ref().and_then(|a| a.serial_port.clone()),
            serial_baud: file
                .alerts
                .as_ref()
                .and_then(|alerts| alerts.serial_baud)
                .unwrap_or(DEFAULT_SERIAL_BAUD),
            snapshot_dir: file.alerts.and_then(|alerts| alerts.snapshot_dir),
        };

        Ok(Self {
            camera,
            detector,
            zone,
            dwell_threshold,
            alerts,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("CURBWATCH_CAMERA_DEVICE") {
            if !device.trim().is_empty() {
                self.camera.device = device;
            }
        }
        if let Ok(backend) = std::env::var("CURBWATCH_DETECTOR_BACKEND") {
            if !backend.trim().is_empty() {
                self.detector.backend = backend;
            }
        }
        if let Ok(secs) = std::env::var("CURBWATCH_DWELL_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| anyhow!("CURBWATCH_DWELL_SECS must be an integer number of seconds"))?;
            self.dwell_threshold = Duration::from_secs(secs);
        }
        if let Ok(channels) = std::env::var("CURBWATCH_ALERT_CHANNELS") {
            let names = split_csv(&channels);
            if !names.is_empty() {
                self.alerts.channels = parse_channels(&names)?;
            }
        }
        if let Ok(port) = std::env::var("CURBWATCH_SERIAL_PORT") {
            if !port.trim().is_empty() {
                self.alerts.serial_port = Some(port);
            }
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        Zone::new(self.zone.vertical_boundary, self.zone.horizontal_boundary)?;

        if self.zone.classes.is_empty() {
            return Err(anyhow!("zone.classes must name at least one object class"));
        }
        if !(0.0..=1.0).contains(&self.detector.min_confidence) {
            return Err(anyhow!(
                "detector.min_confidence must be within 0..=1, got {}",
                self.detector.min_confidence
            ));
        }
        if self.dwell_threshold.is_zero() {
            return Err(anyhow!("dwell threshold must be greater than zero"));
        }
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera.target_fps must be greater than zero"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera resolution must be non-zero"));
        }
        if self.alerts.channels.is_empty() {
            return Err(anyhow!("at least one alert channel is required"));
        }
        self.alerts.channels.dedup();
        if self.alerts.channels.contains(&AlertChannel::Serial)
            && self.alerts.serial_port.is_none()
        {
            return Err(anyhow!(
                "alert channel 'serial' requires alerts.serial_port (or CURBWATCH_SERIAL_PORT)"
            ));
        }
        if self.alerts.channels.contains(&AlertChannel::Snapshot)
            && self.alerts.snapshot_dir.is_none()
        {
            return Err(anyhow!(
                "alert channel 'snapshot' requires alerts.snapshot_dir"
            ));
        }
        if self.detector.backend == "tract" && self.detector.model_path.is_none() {
            return Err(anyhow!(
                "detector backend 'tract' requires detector.model_path"
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<CurbwatchConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn parse_classes(names: &[String]) -> Result<Vec<ObjectClass>> {
    names.iter().map(|name| name.parse()).collect()
}

fn parse_channels(names: &[String]) -> Result<Vec<AlertChannel>> {
    names.iter().map(|name| name.parse()).collect()
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
