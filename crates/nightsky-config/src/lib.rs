//! Configuration for the night sky viewer.
//!
//! Settings persist to disk as `config.ron`, can be overridden from the
//! command line via clap, and tolerate missing or unknown fields so old and
//! new files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, MotionConfig, SkyConfig, WindowConfig};
pub use error::ConfigError;
