//! Command-line argument parsing for scenario tools.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};

use crate::error::ConfigError;

/// Replacement of a single `section.key` entry before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub section: String,
    pub key: String,
    pub value: String,
}

impl Override {
    pub fn new(section: &str, key: &str, value: impl ToString) -> Self {
        Self {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Parses `section.key=value`. The key may itself contain dots (`ply_scale.bolt`).
impl FromStr for Override {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidOverride(s.to_string());
        let (path, value) = s.split_once('=').ok_or_else(invalid)?;
        let (section, key) = path.trim().split_once('.').ok_or_else(invalid)?;
        let (section, key) = (section.trim(), key.trim());
        if section.is_empty() || key.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(section, key, value.trim()))
    }
}

/// Output format for the resolved configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The scenario text format.
    #[default]
    Text,
    Ron,
    Json,
}

/// Scenario checker command-line arguments.
///
/// Flag values override entries loaded from the configuration file.
#[derive(Parser, Debug)]
#[command(name = "amira-check", about = "Validate and print a rendering scenario configuration")]
pub struct CliArgs {
    /// Path to the scenario configuration file.
    #[arg(long, required_unless_present = "list_scenes")]
    pub config: Option<PathBuf>,

    /// Override an entry, as `section.key=value`. Repeatable.
    #[arg(long = "set", value_name = "SECTION.KEY=VALUE")]
    pub overrides: Vec<Override>,

    /// Number of images to render.
    #[arg(long)]
    pub image_count: Option<u32>,

    /// Render width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Render height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel.
    #[arg(long)]
    pub samples: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the known scene types and exit.
    #[arg(long)]
    pub list_scenes: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// All overrides, shortcut flags first, then `--set` in command-line order.
    pub fn overrides(&self) -> Vec<Override> {
        let mut out = Vec::new();
        if let Some(n) = self.image_count {
            out.push(Override::new("dataset", "image_count", n));
        }
        if let Some(w) = self.width {
            out.push(Override::new("camera_info", "width", w));
        }
        if let Some(h) = self.height {
            out.push(Override::new("camera_info", "height", h));
        }
        if let Some(s) = self.samples {
            out.push(Override::new("render_setup", "samples", s));
        }
        out.extend(self.overrides.iter().cloned());
        out
    }
}
