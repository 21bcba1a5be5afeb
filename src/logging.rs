use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Build the subscriber used by [`init`]. Without `debug` the level is forced
/// to `info`; with it `RUST_LOG` may override the `debug` default.
///
/// Events go to stderr so that stdout stays free for command output, and are
/// mirrored to `log_file` when one is given.
pub fn subscriber(debug: bool, log_file: Option<PathBuf>) -> Box<dyn Subscriber + Send + Sync> {
    // Ignore `RUST_LOG` unless debug logging was asked for, so a stray
    // variable in the user's environment does not flood the output.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file.as_deref().and_then(file_appender) {
        Some(appender) => Box::new(
            builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(appender))
                .finish(),
        ),
        None => Box::new(builder.with_writer(std::io::stderr).finish()),
    }
}

/// Initialise logging once per process. Later calls are ignored.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    let _ = tracing::subscriber::set_global_default(subscriber(debug, log_file));
}

fn file_appender(path: &Path) -> Option<tracing_appender::rolling::RollingFileAppender> {
    let file_name = path.file_name()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("cannot create log directory {}: {err}", dir.display());
        return None;
    }
    Some(tracing_appender::rolling::never(dir, file_name))
}
