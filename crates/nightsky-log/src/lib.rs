//! Structured logging for the night sky viewer.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. Library crates log through the `log` facade, which
//! the installed subscriber picks up alongside native `tracing` events.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use nightsky_config::Config;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "nightsky.log";

/// Used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Filter directive for a configured log level.
///
/// A bare level such as `debug` keeps the GPU stack at `warn`; anything with
/// explicit targets is used as written.
pub fn filter_directive(config: Option<&Config>) -> String {
    let level = config.map(|c| c.debug.log_level.trim()).unwrap_or_default();
    if level.is_empty() {
        DEFAULT_FILTER.to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{level},wgpu=warn,naga=warn")
    }
}

/// Create `log_dir` if needed and truncate the log file inside it.
pub fn open_log_file(log_dir: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(log_dir)?;
    File::create(log_dir.join(LOG_FILE_NAME))
}

/// JSON lines layer writing to `file`.
pub fn json_file_layer<S>(file: File) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the config's level. The JSON file layer is
/// only added when `debug_build` is set and `log_dir` is writable.
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build && let Some(log_dir) = log_dir {
        match open_log_file(log_dir) {
            Ok(file) => return subscriber.with(json_file_layer(file)).try_init(),
            Err(e) => eprintln!("file logging disabled, {}: {e}", log_dir.display()),
        }
    }

    subscriber.try_init()
}
