use std::fs;

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn writes_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logs").join("sickmotion.log");

    let subscriber = sick_motion::logging::subscriber(true, Some(path.clone()));
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("overlay started");
    });

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("overlay started"));
}

#[test]
#[serial]
fn subscriber_without_file_creates_no_log() {
    let dir = tempdir().unwrap();

    let subscriber = sick_motion::logging::subscriber(false, None);
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("test");
    });

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
#[serial]
fn debug_events_are_filtered_without_debug_logging() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quiet.log");

    let subscriber = sick_motion::logging::subscriber(false, Some(path.clone()));
    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!("dropped sample");
        tracing::info!("state changed");
    });

    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("state changed"));
    assert!(!contents.contains("dropped sample"));
}
