use sick_motion::ipc::{Action, CommandListener};
use std::process::Command;
use std::thread::sleep;
use std::time::Duration;

const CTL: &str = env!("CARGO_BIN_EXE_sickmotionctl");

#[test]
fn unknown_argument_prints_usage_and_fails() {
    let output = Command::new(CTL).arg("flip").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: sickmotionctl [toggle|enable|disable]"));
}

#[test]
fn extra_arguments_are_rejected() {
    let output = Command::new(CTL).args(["enable", "disable"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn sends_action_and_confirms() {
    let mut listener = CommandListener::bind(0).unwrap();
    let port = listener.local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(CTL)
        .arg("enable")
        .env("SICKMOTION_COMMAND_PORT", port.to_string())
        .env("SICKMOTION_SETTINGS", dir.path().join("settings.json"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Sent action: enable"
    );

    let mut received = Vec::new();
    for _ in 0..50 {
        received.extend(listener.drain());
        if !received.is_empty() {
            break;
        }
        sleep(Duration::from_millis(10));
    }
    assert_eq!(received, vec![Action::Enable]);
}

#[test]
fn no_argument_means_toggle() {
    let mut listener = CommandListener::bind(0).unwrap();
    let port = listener.local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(CTL)
        .env("SICKMOTION_COMMAND_PORT", port.to_string())
        .env("SICKMOTION_SETTINGS", dir.path().join("settings.json"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Sent action: toggle"));
}
