use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::forward::WaitMode;
use crate::mirror::{CategoryFilter, DEFAULT_NAME};

#[derive(Parser, Debug)]
#[command(name = "touchmux")]
#[command(about = "Mirror an input device onto a virtual uinput device and relay its events")]
#[command(version)]
pub struct Cli {
    /// Source input device (e.g. /dev/input/event3)
    #[arg(long, env = "TOUCHMUX_SRC")]
    pub src: PathBuf,

    /// Grab the source exclusively (0 or 1)
    #[arg(long, action = ArgAction::Set, default_value = "0", num_args = 0..=1,
          require_equals = true, default_missing_value = "1", value_parser = parse_switch)]
    pub grab: bool,

    /// Diagnostic logging to stderr (0 or 1)
    #[arg(long, action = ArgAction::Set, default_value = "0", num_args = 0..=1,
          require_equals = true, default_missing_value = "1", value_parser = parse_switch)]
    pub verbose: bool,

    /// Scale factor for X coordinates
    #[arg(long, default_value_t = 1.0, value_parser = parse_scale)]
    pub sx: f64,

    /// Scale factor for Y coordinates
    #[arg(long, default_value_t = 1.0, value_parser = parse_scale)]
    pub sy: f64,

    /// Event categories to mirror and relay (all, or a list of key,abs,rel,sw,led,snd,ff,msc; syn is always kept)
    #[arg(long, default_value = "all", value_parser = clap::value_parser!(CategoryFilter))]
    pub categories: CategoryFilter,

    /// How to wait for input (poll, readiness)
    #[arg(long, default_value = "poll", value_parser = clap::value_parser!(WaitMode))]
    pub wait: WaitMode,

    /// Name of the virtual device
    #[arg(long, default_value = DEFAULT_NAME)]
    pub name: String,

    /// Delay after creating the virtual device, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub settle_ms: u64,

    /// Print the mirrored device description and exit
    #[arg(long)]
    pub describe: bool,
}

fn parse_switch(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(format!("expected 0 or 1, got '{}'", s)),
    }
}

fn parse_scale(s: &str) -> Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|e| format!("'{}': {}", s, e))?;
    if !v.is_finite() || v <= 0.0 {
        return Err(format!("scale must be a positive number, got '{}'", s));
    }
    Ok(v)
}
