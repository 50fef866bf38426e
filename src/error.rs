use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::input::{Category, INPUT_EVENT_SIZE};

/// Step of virtual-device setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStep {
    Open,
    Register(Category),
    Properties,
    Identity,
    Create,
}

impl fmt::Display for SinkStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkStep::Open => write!(f, "open /dev/uinput"),
            SinkStep::Register(cat) => write!(f, "register {} capabilities", cat),
            SinkStep::Properties => write!(f, "set direct-touch property"),
            SinkStep::Identity => write!(f, "set device id"),
            SinkStep::Create => write!(f, "create virtual device"),
        }
    }
}

/// Fatal conditions. Anything recoverable is handled where it occurs and
/// never reaches this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("open({}): {source}", .path.display())]
    OpenSource { path: PathBuf, source: io::Error },

    #[error("configure source: {0}")]
    ConfigureSource(#[source] io::Error),

    #[error("query supported event types: {0}")]
    ProbeEventTypes(#[source] io::Error),

    #[error("{step}: {source}")]
    Sink { step: SinkStep, source: io::Error },

    #[error("read(src): {0}")]
    Read(#[source] io::Error),

    #[error("wait for source: {0}")]
    Wait(#[source] io::Error),

    #[error("write(uinput): {0}")]
    Write(#[source] io::Error),

    #[error("write(uinput): short write ({written} of {} bytes)", INPUT_EVENT_SIZE)]
    ShortWrite { written: usize },
}

impl Error {
    pub fn sink(step: SinkStep) -> impl FnOnce(io::Error) -> Self {
        move |source| Error::Sink { step, source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
