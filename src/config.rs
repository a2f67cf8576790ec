//! Runtime tuning from a small TOML file, with command line overrides.

use std::path::{ Path, PathBuf };

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::sim::swarm::SimParams;

pub const DEFAULT_PATH: &str = "config.toml";

/// The on-disk knobs. Every key is optional and unknown keys are ignored.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Config {
    pub friction: Option<f32>,
    pub pull_distance: Option<f32>,
    pub pull_strength: Option<f32>,
    pub ball_number: Option<u32>,
}

impl Config {
    /// Read `path`, treating a missing file as an empty one.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Command line surface shared by both binaries.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Path of the TOML tuning file.
    #[arg(long, default_value = DEFAULT_PATH)]
    pub config: PathBuf,

    /// Fraction of velocity kept each frame.
    #[arg(long)]
    pub friction: Option<f32>,

    /// Cursor force radius in pixels.
    #[arg(long)]
    pub pull_distance: Option<f32>,

    /// Velocity kick for particles inside that radius.
    #[arg(long)]
    pub pull_strength: Option<f32>,

    /// How many particles to spawn.
    #[arg(long)]
    pub ball_number: Option<u32>,

    /// Open a 1280x720 window instead of going fullscreen.
    #[arg(long)]
    pub windowed: bool,
}

/// Everything a demo needs to start, after the file and the command line
/// have been merged.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub params: SimParams,
    /// `None` lets each demo pick its own population.
    pub count: Option<u32>,
    pub windowed: bool,
}

impl Args {
    /// Layer the command line over the file over the built-in defaults.
    pub fn resolve(&self) -> anyhow::Result<Settings> {
        let file = Config::load(&self.config)?;
        let defaults = SimParams::default();
        Ok(Settings {
            params: SimParams {
                friction: self
                    .friction
                    .or(file.friction)
                    .unwrap_or(defaults.friction),
                pull_distance: self
                    .pull_distance
                    .or(file.pull_distance)
                    .unwrap_or(defaults.pull_distance),
                pull_strength: self
                    .pull_strength
                    .or(file.pull_strength)
                    .unwrap_or(defaults.pull_strength),
            },
            count: self.ball_number.or(file.ball_number),
            windowed: self.windowed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, text).expect("write test config");
        path
    }

    #[test]
    fn a_missing_file_is_all_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load(&dir.path().join("nope.toml")).expect("load");
        assert!(config.friction.is_none());
        assert!(config.ball_number.is_none());
    }

    #[test]
    fn integers_are_accepted_for_float_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "pull_distance = 400\nfriction = 1\n");
        let config = Config::load(&path).expect("load");
        assert_eq!(config.pull_distance, Some(400.0));
        assert_eq!(config.friction, Some(1.0));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "gravity = 3.5\nfriction = 0.9\n");
        let config = Config::load(&path).expect("load");
        assert_eq!(config.friction, Some(0.9));
    }

    #[test]
    fn garbage_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "friction = [\n");
        let err = Config::load(&path).expect_err("parse failure");
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn the_command_line_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "friction = 0.5\nball_number = 1234\n");
        let args = Args::try_parse_from([
            "points",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--friction",
            "0.25",
        ])
        .expect("parse args");

        let settings = args.resolve().expect("resolve");
        assert_eq!(settings.params.friction, 0.25);
        assert_eq!(settings.params.pull_distance, 400.0);
        assert_eq!(settings.count, Some(1234));
        assert!(!settings.windowed);
    }
}
