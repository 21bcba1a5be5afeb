use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const TOAST_LOG_FILE: &str = "toast.log";

/// Next to the settings file, so launcher notifications end up with the rest
/// of the overlay's state.
pub fn toast_log_path() -> PathBuf {
    match crate::settings::settings_path().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(TOAST_LOG_FILE),
        _ => PathBuf::from(TOAST_LOG_FILE),
    }
}

pub fn append_toast_log(msg: &str) {
    append_toast_log_to(&toast_log_path(), msg);
}

pub fn append_toast_log_to(path: &Path, msg: &str) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{} - {}", Local::now().to_rfc3339(), msg);
    }
}
