use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use curbwatch::config::{AlertChannel, CurbwatchConfig};
use curbwatch::ObjectClass;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "CURBWATCH_CONFIG",
        "CURBWATCH_CAMERA_DEVICE",
        "CURBWATCH_DETECTOR_BACKEND",
        "CURBWATCH_DWELL_SECS",
        "CURBWATCH_ALERT_CHANNELS",
        "CURBWATCH_SERIAL_PORT",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "camera": {
            "device": "stub://lot_camera",
            "target_fps": 12,
            "width": 800,
            "height": 600
        },
        "detector": {
            "backend": "stub",
            "min_confidence": 0.3
        },
        "zone": {
            "vertical_boundary": 0.4,
            "horizontal_boundary": 0.2,
            "classes": ["car", "truck"]
        },
        "dwell": {
            "threshold_secs": 170
        },
        "alerts": {
            "channels": ["log", "serial"],
            "serial_port": "/dev/ttyUSB0",
            "serial_baud": 115200
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("CURBWATCH_CONFIG", file.path());
    std::env::set_var("CURBWATCH_CAMERA_DEVICE", "stub://rear_camera");
    std::env::set_var("CURBWATCH_DWELL_SECS", "45");

    let cfg = CurbwatchConfig::load(None).expect("load config");

    assert_eq!(cfg.camera.device, "stub://rear_camera");
    assert_eq!(cfg.camera.target_fps, 12);
    assert_eq!(cfg.camera.width, 800);
    assert_eq!(cfg.camera.height, 600);
    assert_eq!(cfg.detector.backend, "stub");
    assert_eq!(cfg.detector.min_confidence, 0.3);
    assert_eq!(cfg.zone.vertical_boundary, 0.4);
    assert_eq!(cfg.zone.horizontal_boundary, 0.2);
    assert_eq!(cfg.zone.classes, vec![ObjectClass::Car, ObjectClass::Truck]);
    assert_eq!(cfg.dwell_threshold, Duration::from_secs(45));
    assert_eq!(
        cfg.alerts.channels,
        vec![AlertChannel::Log, AlertChannel::Serial]
    );
    assert_eq!(cfg.alerts.serial_port.as_deref(), Some("/dev/ttyUSB0"));
    assert_eq!(cfg.alerts.serial_baud, 115200);

    clear_env();
}

#[test]
fn defaults_follow_the_reference_deployment() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = CurbwatchConfig::load(None).expect("load defaults");

    assert_eq!(cfg.camera.device, "stub://curb_camera");
    assert_eq!(cfg.camera.width, 1280);
    assert_eq!(cfg.camera.height, 720);
    assert_eq!(cfg.camera.target_fps, 10);
    assert_eq!(cfg.zone.vertical_boundary, 0.5);
    assert_eq!(cfg.zone.horizontal_boundary, 0.25);
    assert_eq!(cfg.dwell_threshold, Duration::from_secs(180));
    assert_eq!(cfg.zone.classes.len(), 5);
    assert_eq!(cfg.alerts.channels, vec![AlertChannel::Log]);
    assert_eq!(cfg.alerts.serial_baud, 9600);

    clear_env();
}

#[test]
fn serial_channel_without_port_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CURBWATCH_ALERT_CHANNELS", "serial");

    let err = CurbwatchConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("serial_port"));

    clear_env();
}

#[test]
fn unknown_alert_channel_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CURBWATCH_ALERT_CHANNELS", "log,mqtt");

    let err = CurbwatchConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("unknown alert channel"));

    clear_env();
}

#[test]
fn zone_boundaries_are_validated() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{ "zone": { "vertical_boundary": 1.5 } }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    std::env::set_var("CURBWATCH_CONFIG", file.path());

    let err = CurbwatchConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("fraction in (0, 1]"));

    clear_env();
}

#[test]
fn invalid_dwell_env_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CURBWATCH_DWELL_SECS", "three minutes");

    let err = CurbwatchConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("CURBWATCH_DWELL_SECS"));

    clear_env();
}
