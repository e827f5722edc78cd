//! Command-line interface for scrolltrack.
//!
//! This module provides the CLI structure for the `scrolltrack` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CurveCommand, MilestonesCommand, OutputFormat, SampleCommand, SimulateCommand,
};

/// scrolltrack - Move a marker along a curve as the page scrolls
///
/// Samples the configured curve at a scroll progress, or simulates a full
/// scroll through a page and prints what a renderer would draw at each step.
#[derive(Debug, Parser)]
#[command(name = "scrolltrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sample the curve at a progress value
    Sample(SampleCommand),

    /// Simulate scrolling through the timeline
    Simulate(SimulateCommand),

    /// List timeline milestones
    Milestones(MilestonesCommand),

    /// Describe the configured curve
    Curve(CurveCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}
