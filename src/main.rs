mod config;
mod describe;
mod device;
mod error;
mod forward;
mod input;
mod mirror;
#[cfg(test)]
mod testutil;

use clap::Parser;

use config::{Cli, Config};
use device::{SourceDevice, UinputSink};
use error::Result;
use forward::{Forwarder, ScaleConfig};

fn main() {
    // Usage errors exit with status 2.
    let config = Config::from_cli(Cli::parse());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level()))
        .init();

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Returns only for `--describe` or on a fatal error.
fn run(config: &Config) -> Result<()> {
    log::info!(
        "touchmux starting (src={}, grab={}, scale={}x{}, categories={})",
        config.src.display(),
        config.grab,
        config.scale_x,
        config.scale_y,
        config.filter
    );

    let source = SourceDevice::open(&config.src)?;
    if config.grab && !config.describe {
        source.grab();
    }

    let mirrored = mirror::mirror(&source, &config.mirror_options())?;
    if config.describe {
        print!("{}", describe::render(&mirrored));
        return Ok(());
    }

    let sink = UinputSink::create(&mirrored.descriptor)?;
    // Give udev and input readers time to attach before the first record.
    std::thread::sleep(config.settle);
    log::debug!(
        "RAW forwarding from {} to virtual device '{}'",
        config.src.display(),
        mirrored.descriptor.name
    );

    let scale = ScaleConfig::new(config.scale_x, config.scale_y, mirrored.bounds);
    let forwarder = Forwarder::new(source, sink, scale, config.filter.clone(), config.wait);
    match forwarder.run()? {}
}
