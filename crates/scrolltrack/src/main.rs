//! `scrolltrack` - CLI for sampling and simulating scroll-driven curve motion.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use scrolltrack::cli::{
    Cli, Command, ConfigCommand, CurveCommand, MilestonesCommand, OutputFormat, SampleCommand,
    SimulateCommand,
};
use scrolltrack::simulate::{simulate_scroll, Frame};
use scrolltrack::{init_logging, milestone, sample, Config, PathGeometry};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Sample(cmd) => handle_sample(&load_config(cli.config)?, &cmd),
        Command::Simulate(cmd) => handle_simulate(&load_config(cli.config)?, &cmd),
        Command::Milestones(cmd) => handle_milestones(&load_config(cli.config)?, &cmd),
        Command::Curve(cmd) => handle_curve(&load_config(cli.config)?, &cmd),
        Command::Config(cmd) => handle_config(cli.config, &cmd),
    }
}

fn load_config(path: Option<std::path::PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

fn handle_sample(config: &Config, cmd: &SampleCommand) -> anyhow::Result<()> {
    let curve = config.curve()?;
    let progress = scrolltrack::progress::normalize(cmd.progress);
    let point = sample(&curve, progress, &config.heading);
    let active = milestone::active_flags(config.milestones(), progress);

    if cmd.json {
        let out = serde_json::json!({
            "progress": progress,
            "position": point,
            "active_milestones": active,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Progress:  {progress:.4}");
        println!("Position:  ({:.2}, {:.2})", point.x, point.y);
        println!("Angle:     {:.2}°", point.angle);
        println!(
            "Active:    {}/{}",
            active.iter().filter(|a| **a).count(),
            active.len()
        );
    }
    Ok(())
}

fn handle_simulate(config: &Config, cmd: &SimulateCommand) -> anyhow::Result<()> {
    let frames = simulate_scroll(config, cmd.layout(), cmd.steps)?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&frames)?),
        OutputFormat::Table => print_frame_table(&frames, config.milestones().len()),
        OutputFormat::Plain => {
            for frame in &frames {
                println!(
                    "scroll={:.1} progress={:.4} x={:.2} y={:.2} angle={:.2}",
                    frame.scroll_y,
                    frame.progress,
                    frame.position.x,
                    frame.position.y,
                    frame.position.angle
                );
            }
        }
    }
    Ok(())
}

fn print_frame_table(frames: &[Frame], milestone_count: usize) {
    println!(
        "{:>10}  {:>8}  {:>8}  {:>8}  {:>8}  {:>9}  {:>4}",
        "scroll", "progress", "x", "y", "angle", "milestone", "hint"
    );
    for frame in frames {
        println!(
            "{:>10.1}  {:>8.4}  {:>8.2}  {:>8.2}  {:>8.2}  {:>9}  {:>4}",
            frame.scroll_y,
            frame.progress,
            frame.position.x,
            frame.position.y,
            frame.position.angle,
            format!("{}/{}", frame.active_milestones, milestone_count),
            if frame.scroll_hint_visible { "yes" } else { "no" }
        );
    }
}

fn handle_milestones(config: &Config, cmd: &MilestonesCommand) -> anyhow::Result<()> {
    let milestones = config.milestones();
    let count = milestones.len();

    if cmd.json {
        let entries: Vec<_> = milestones
            .iter()
            .enumerate()
            .map(|(i, m)| {
                serde_json::json!({
                    "date": m.date,
                    "title": m.title,
                    "x": m.x,
                    "y": m.y,
                    "threshold": milestone::activation_threshold(i, count),
                    "active": cmd.progress.map(|p| milestone::is_active(i, count, p)),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (i, m) in milestones.iter().enumerate() {
        let threshold = milestone::activation_threshold(i, count);
        let marker = match cmd.progress {
            Some(p) if milestone::is_active(i, count, p) => "*",
            Some(_) => " ",
            None => "-",
        };
        println!(
            "{marker} {:<8} {:<24} at {threshold:.2}  ({}, {})",
            m.date, m.title, m.x, m.y
        );
    }
    Ok(())
}

fn handle_curve(config: &Config, cmd: &CurveCommand) -> anyhow::Result<()> {
    let curve = config.curve()?;

    if cmd.json {
        let out = serde_json::json!({
            "path_data": config.curve.path_data,
            "total_length": curve.total_length(),
            "segments": curve.segment_count(),
            "start": curve.start(),
            "end": curve.end(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Segments:      {}", curve.segment_count());
        println!("Total length:  {:.3}", curve.total_length());
        println!("Start:         ({}, {})", curve.start().x, curve.start().y);
        println!("End:           ({}, {})", curve.end().x, curve.end().y);
    }
    Ok(())
}

fn handle_config(
    config_path: Option<std::path::PathBuf>,
    cmd: &ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Curve]");
                println!("  Path data:          {}", config.curve.path_data);
                println!("  Accuracy:           {}", config.curve.accuracy);
                println!();
                println!("[Heading]");
                println!("  Lookahead:          {}", config.heading.lookahead);
                println!("  Offset (degrees):   {}", config.heading.offset_degrees);
                println!();
                println!("[Timeline]");
                println!(
                    "  Scroll hint until:  {}",
                    config.timeline.scroll_hint_until
                );
                println!("  Milestones:         {}", config.milestones().len());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .clone()
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_file(&path)
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
