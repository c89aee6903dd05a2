//! `nightsky`: a procedural, animated night sky in a window.

mod frame_clock;
mod platform;
mod window;

use std::process::ExitCode;

use clap::Parser;
use nightsky_config::{CliArgs, Config, ConfigError};
use nightsky_render::RenderContextError;
use thiserror::Error;
use tracing::{error, info};
use winit::error::EventLoopError;
use winit::event_loop::EventLoop;

use crate::platform::{PlatformDirs, PlatformError};
use crate::window::{App, ConfigSource};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("event loop failed: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("GPU initialisation failed: {0}")]
    RenderContext(#[from] RenderContextError),
}

struct Loaded {
    dirs: PlatformDirs,
    on_disk: Config,
    config: Config,
}

fn load_config(args: &CliArgs) -> Result<Loaded, AppError> {
    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir.clone()),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let on_disk = Config::load_or_create(&dirs.config_dir)?;
    let mut config = on_disk.clone();
    config.apply_cli_overrides(args);
    config.validate()?;
    Ok(Loaded {
        dirs,
        on_disk,
        config,
    })
}

fn run(config: Config, source: ConfigSource) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, Some(source));
    event_loop.run_app(&mut app)?;
    match app.into_failure() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let Loaded {
        dirs,
        on_disk,
        config,
    } = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            // Logging is not up yet.
            let _ = nightsky_log::init_logging(None, false, None);
            error!("Startup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = nightsky_log::init_logging(
        Some(dirs.log_dir.as_path()),
        cfg!(debug_assertions),
        Some(&config),
    ) {
        eprintln!("logging unavailable: {e}");
    }
    info!(
        "nightsky {} (seed {}, {} stars), config in {}",
        env!("CARGO_PKG_VERSION"),
        config.sky.seed,
        config.sky.star_count,
        dirs.config_dir.display()
    );

    let source = ConfigSource {
        dir: dirs.config_dir,
        on_disk,
        overrides: args,
    };
    match run(config, source) {
        Ok(()) => {
            info!("Exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
