use std::path::PathBuf;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; `debug` is enabled via
/// the settings file, in which case `RUST_LOG` may override it.
///
/// When `log_file` is set, output goes to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // With debug logging off we force `info` so a stray `RUST_LOG` in the
    // environment cannot turn on verbose output.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    match log_file.and_then(file_appender) {
        Some(appender) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(appender)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

/// Appender for `path`, or `None` when the path names no file; logging then
/// stays on stderr.
fn file_appender(path: PathBuf) -> Option<RollingFileAppender> {
    let Some(file_name) = path.file_name() else {
        eprintln!(
            "log file path {} has no file name; logging to stderr",
            path.display()
        );
        return None;
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some(tracing_appender::rolling::never(dir, file_name))
}
