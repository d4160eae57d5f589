//! Command-line argument parsing
//!
//! Supports:
//! - Replaying a scenario file
//! - Size and scale overrides
//! - Table or JSON output

use clap::Parser;
use std::path::PathBuf;

/// Replay a two-view layout scenario and print the resulting batch
#[derive(Parser, Debug)]
#[command(
    name = "duoview",
    version,
    about = "Replay a two-view layout scenario and print the resulting batch"
)]
pub struct CliArgs {
    /// Scenario YAML file to replay
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Print the final pass as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Layout config file (defaults to the user config)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the client width
    #[arg(long, value_name = "PX")]
    pub width: Option<i32>,

    /// Override the client height
    #[arg(long, value_name = "PX")]
    pub height: Option<i32>,

    /// Override the DPI scale factor
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f64>,
}

/// How the final pass is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub scenario: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output: OutputFormat,
    /// Client size override (width, height)
    pub size: (Option<i32>, Option<i32>),
    pub scale: Option<f64>,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value.is_some_and(|v| v < 0) {
                return Err(format!("--{} must not be negative", name));
            }
        }
        if let Some(scale) = self.scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(format!("--scale must be a positive number, got {}", scale));
            }
        }

        Ok(RunConfig {
            scenario: self.scenario,
            config_path: self.config,
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Table
            },
            size: (self.width, self.height),
            scale: self.scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["duoview", "scenario.yaml"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_defaults_to_table_output() {
        let config = args(&[]).into_config().unwrap();
        assert_eq!(config.output, OutputFormat::Table);
        assert_eq!(config.scenario, PathBuf::from("scenario.yaml"));
        assert_eq!(config.size, (None, None));
    }

    #[test]
    fn test_json_flag() {
        let config = args(&["--json"]).into_config().unwrap();
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_size_overrides() {
        let config = args(&["--width", "800", "--height", "600"])
            .into_config()
            .unwrap();
        assert_eq!(config.size, (Some(800), Some(600)));
    }

    #[test]
    fn test_negative_width_rejected() {
        let cli = CliArgs {
            scenario: PathBuf::from("s.yaml"),
            json: false,
            config: None,
            width: Some(-1),
            height: None,
            scale: None,
        };
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(args(&["--scale", "0"]).into_config().is_err());
    }
}
