use crate::ipc::channel::{port_from_env, DEFAULT_COMMAND_PORT};
use crate::motion::gpsd::DEFAULT_GPSD_ADDR;
use crate::motion::oscillator::DEFAULT_AMPLITUDE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_ENV: &str = "SICKMOTION_SETTINGS";
const SETTINGS_DIR: &str = "sickmotion";
const SETTINGS_FILE: &str = "settings.json";

/// Which cue source drives the dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CueSourceKind {
    /// Vehicle motion from the sample source.
    #[default]
    Motion,
    /// Decorative sine wave.
    Oscillator,
}

impl std::fmt::Display for CueSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CueSourceKind::Motion => write!(f, "motion"),
            CueSourceKind::Oscillator => write!(f, "oscillator"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub cue_source: CueSourceKind,
    #[serde(default = "default_command_port")]
    pub command_port: u16,
    #[serde(default = "default_gpsd_addr")]
    pub gpsd_addr: String,
    #[serde(default = "default_oscillator_amplitude")]
    pub oscillator_amplitude: f64,
    /// Explicit location of `sickmotionctl`, checked before the
    /// conventional install locations.
    #[serde(default)]
    pub launcher_ctl_path: Option<PathBuf>,
}

fn default_command_port() -> u16 {
    DEFAULT_COMMAND_PORT
}

fn default_gpsd_addr() -> String {
    DEFAULT_GPSD_ADDR.to_string()
}

fn default_oscillator_amplitude() -> f64 {
    DEFAULT_AMPLITUDE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            cue_source: CueSourceKind::default(),
            command_port: default_command_port(),
            gpsd_addr: default_gpsd_addr(),
            oscillator_amplitude: default_oscillator_amplitude(),
            launcher_ctl_path: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Command port after applying `$SICKMOTION_COMMAND_PORT`.
    pub fn effective_command_port(&self) -> u16 {
        port_from_env().unwrap_or(self.command_port)
    }
}

/// `$SICKMOTION_SETTINGS`, else `<config dir>/sickmotion/settings.json`,
/// else `settings.json` in the working directory.
pub fn settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SETTINGS_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}

/// Load from [`settings_path`], falling back to defaults when the file is
/// unreadable so a broken config never keeps the overlay from starting.
pub fn load_or_default() -> Settings {
    let path = settings_path();
    match Settings::load(&path.to_string_lossy()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to load settings; using defaults");
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CueSourceKind, Settings};

    #[test]
    fn partial_document_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"cue_source":"oscillator","oscillator_amplitude":4.0}"#)
                .unwrap();
        assert_eq!(settings.cue_source, CueSourceKind::Oscillator);
        assert_eq!(settings.oscillator_amplitude, 4.0);
        assert_eq!(settings.command_port, 47_823);
        assert_eq!(settings.gpsd_addr, "127.0.0.1:2947");
        assert!(!settings.debug_logging);
    }

    #[test]
    fn unknown_cue_source_is_rejected() {
        assert!(serde_json::from_str::<Settings>(r#"{"cue_source":"radar"}"#).is_err());
    }
}
