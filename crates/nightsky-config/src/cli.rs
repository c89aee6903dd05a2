//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Night sky viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nightsky", about = "Procedural animated night sky")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Sky seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Background star count.
    #[arg(long)]
    pub stars: Option<u32>,

    /// Freeze all animation.
    #[arg(long)]
    pub reduced_motion: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(seed) = args.seed {
            self.sky.seed = seed;
        }
        if let Some(stars) = args.stars {
            self.sky.star_count = stars;
        }
        if let Some(reduced) = args.reduced_motion {
            self.motion.reduced_motion = reduced;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            seed: Some(7),
            reduced_motion: Some(true),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.sky.seed, 7);
        assert!(config.motion.reduced_motion);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.sky.star_count, 5000);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "nightsky",
            "--stars",
            "800",
            "--reduced-motion",
            "true",
            "--log-level",
            "debug",
            "--config",
            "/tmp/sky",
        ])
        .unwrap();
        assert_eq!(args.stars, Some(800));
        assert_eq!(args.reduced_motion, Some(true));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/sky")));
        assert_eq!(args.seed, None);
    }
}
