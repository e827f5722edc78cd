//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::simulate::{PageLayout, MAX_STEPS};

/// Sample command arguments.
#[derive(Debug, Args)]
pub struct SampleCommand {
    /// Progress along the curve, from 0 to 1
    #[arg(short, long, allow_negative_numbers = true)]
    pub progress: f64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Simulate command arguments.
#[derive(Debug, Args)]
pub struct SimulateCommand {
    /// Height of the scroll container in pixels
    #[arg(long, default_value = "2000")]
    pub container_height: f64,

    /// Height of the viewport in pixels
    #[arg(long, default_value = "1000")]
    pub viewport_height: f64,

    /// Document offset of the container's top edge
    #[arg(long, default_value = "0")]
    pub container_offset: f64,

    /// Number of scroll steps between top and bottom
    #[arg(
        short,
        long,
        default_value = "10",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(0..=MAX_STEPS as u64)
    )]
    pub steps: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl SimulateCommand {
    /// The page geometry these arguments describe.
    #[must_use]
    pub fn layout(&self) -> PageLayout {
        PageLayout {
            container_offset: self.container_offset,
            container_height: self.container_height,
            viewport_height: self.viewport_height,
        }
    }
}

/// Milestones command arguments.
#[derive(Debug, Args)]
pub struct MilestonesCommand {
    /// Show which milestones are active at this progress
    #[arg(short, long)]
    pub progress: Option<f64>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Curve command arguments.
#[derive(Debug, Args)]
pub struct CurveCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
