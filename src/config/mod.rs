mod cli;

pub use cli::Cli;

use std::path::PathBuf;
use std::time::Duration;

use crate::forward::WaitMode;
use crate::mirror::{CategoryFilter, MirrorOptions};

/// Runtime configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub src: PathBuf,
    pub grab: bool,
    pub verbose: bool,
    pub scale_x: f64,
    pub scale_y: f64,
    pub filter: CategoryFilter,
    pub wait: WaitMode,
    pub name: String,
    pub settle: Duration,
    pub describe: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            src: cli.src,
            grab: cli.grab,
            verbose: cli.verbose,
            scale_x: cli.sx,
            scale_y: cli.sy,
            filter: cli.categories,
            wait: cli.wait,
            name: cli.name,
            settle: Duration::from_millis(cli.settle_ms),
            describe: cli.describe,
        }
    }

    pub fn mirror_options(&self) -> MirrorOptions {
        MirrorOptions {
            name: self.name.clone(),
            filter: self.filter.clone(),
            ..MirrorOptions::default()
        }
    }

    /// Default log filter; RUST_LOG still takes precedence.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let argv = std::iter::once("touchmux").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(Config::from_cli)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--src", "/dev/input/event3"]).unwrap();
        assert_eq!(config.src, PathBuf::from("/dev/input/event3"));
        assert!(!config.grab);
        assert!(!config.verbose);
        assert_eq!((config.scale_x, config.scale_y), (1.0, 1.0));
        assert_eq!(config.filter, CategoryFilter::all());
        assert_eq!(config.wait, WaitMode::Poll);
        assert_eq!(config.name, "touchmux-virtual");
        assert_eq!(config.settle, Duration::from_millis(200));
        assert!(!config.describe);
        assert_eq!(config.log_level(), "warn");
    }

    #[test]
    fn test_equals_flag_syntax() {
        let config = parse(&[
            "--src",
            "/dev/input/event5",
            "--grab=1",
            "--verbose=1",
            "--sx=1.5",
            "--sy=0.75",
        ])
        .unwrap();
        assert!(config.grab);
        assert!(config.verbose);
        assert_eq!(config.scale_x, 1.5);
        assert_eq!(config.scale_y, 0.75);
        assert_eq!(config.log_level(), "debug");

        let config = parse(&["--src=/dev/input/event5", "--grab=0", "--verbose"]).unwrap();
        assert!(!config.grab);
        assert!(config.verbose);
    }

    #[test]
    fn test_missing_src_is_usage_error() {
        std::env::remove_var("TOUCHMUX_SRC");
        let err = parse(&["--grab=1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        for args in [
            ["--src", "/dev/input/event0", "--sx=0"],
            ["--src", "/dev/input/event0", "--sy=-2"],
            ["--src", "/dev/input/event0", "--sx=nan"],
            ["--src", "/dev/input/event0", "--grab=2"],
            ["--src", "/dev/input/event0", "--categories=joystick"],
            ["--src", "/dev/input/event0", "--wait=spin"],
        ] {
            let err = parse(&args).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{:?}", args);
        }
    }

    #[test]
    fn test_restricted_categories_and_mirror_options() {
        let config = parse(&[
            "--src",
            "/dev/input/event0",
            "--categories",
            "key,abs,syn",
            "--wait",
            "readiness",
            "--name",
            "panel-proxy",
        ])
        .unwrap();
        let options = config.mirror_options();
        assert_eq!(options.name, "panel-proxy");
        assert_eq!(options.filter.to_string(), "syn,key,abs");
        assert_eq!(config.wait, WaitMode::Readiness);
    }
}
