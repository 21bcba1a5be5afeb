//! Launcher integration: run `sickmotionctl` on behalf of an application
//! launcher and report the outcome as a short notification.

use crate::ipc::Action;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

pub const CTL_PATH_ENV: &str = "SICKMOTION_CTL_PATH";
pub const CTL_TIMEOUT: Duration = Duration::from_millis(3000);
const WAIT_POLL: Duration = Duration::from_millis(20);

pub fn ctl_binary_name() -> String {
    format!("sickmotionctl{}", std::env::consts::EXE_SUFFIX)
}

/// Where to look for the sender, most specific first.
pub fn candidate_paths(preferred: Option<&Path>, cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let binary = ctl_binary_name();
    let mut paths = Vec::new();
    if let Some(preferred) = preferred.filter(|p| !p.as_os_str().is_empty()) {
        paths.push(preferred.to_path_buf());
    }
    paths.push(cwd.join("..").join("dist").join(&binary));
    paths.push(Path::new("/usr/local/bin").join(&binary));
    paths.push(Path::new("/opt/homebrew/bin").join(&binary));
    if let Some(home) = home {
        paths.push(home.join(".local").join("bin").join(&binary));
    }
    paths.push(cwd.join("target").join("release").join(&binary));
    paths
}

/// Candidates for this process: the preference, then the conventional
/// locations relative to the working and home directories.
pub fn default_candidates(preferred: Option<&Path>) -> Vec<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = dirs_next::home_dir();
    candidate_paths(preferred, &cwd, home.as_deref())
}

/// First existing candidate, or an error telling the user how to install
/// the sender.
pub fn resolve_from(candidates: &[PathBuf]) -> Result<PathBuf> {
    if let Some(found) = candidates.iter().find(|path| path.is_file()) {
        return Ok(found.clone());
    }
    tracing::debug!(?candidates, "sickmotionctl not found");
    bail!(
        "Could not find sickmotionctl. Build and install it first, for example: \
         `cargo build --release && cp target/release/sickmotionctl /usr/local/bin/`, \
         or set {CTL_PATH_ENV}."
    )
}

/// Run `binary <action>` and wait at most `timeout`. A hung sender is
/// killed.
pub fn run_action(binary: &Path, action: Action, timeout: Duration) -> Result<()> {
    let mut child = Command::new(binary)
        .arg(action.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {}", binary.display()))?;

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            if status.success() {
                return Ok(());
            }
            bail!("sickmotionctl {action} failed ({status})");
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            bail!(
                "sickmotionctl {action} timed out after {} ms",
                timeout.as_millis()
            );
        }
        std::thread::sleep(WAIT_POLL);
    }
}

/// Transient, user-facing notification.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Logs the notification and appends it to the toast log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToastLogNotifier;

impl Notifier for ToastLogNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(message, "notification");
        crate::toast_log::append_toast_log(message);
    }
}

pub fn success_message(action: Action) -> &'static str {
    match action {
        Action::Enable => "Motion dots enabled",
        Action::Disable => "Motion dots disabled",
        Action::Toggle => "Motion dots toggled",
    }
}

/// Resolve, run and report. Errors become notifications and never reach
/// the caller; the return value says whether the action went through.
pub fn perform(action: Action, preferred: Option<&Path>, notifier: &dyn Notifier) -> bool {
    perform_from(action, &default_candidates(preferred), notifier)
}

pub fn perform_from(action: Action, candidates: &[PathBuf], notifier: &dyn Notifier) -> bool {
    let outcome = resolve_from(candidates).and_then(|binary| {
        tracing::debug!(binary = %binary.display(), %action, "running sickmotionctl");
        run_action(&binary, action, CTL_TIMEOUT)
    });
    match outcome {
        Ok(()) => {
            notifier.notify(success_message(action));
            true
        }
        Err(err) => {
            tracing::warn!(%action, error = %err, "launcher action failed");
            notifier.notify(&format!("{err:#}"));
            false
        }
    }
}
