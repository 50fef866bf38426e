//! Relay records from the source to the virtual device, rescaling the
//! primary coordinate axes.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use crate::device::{EventSink, EventSource, ReadOutcome};
use crate::error::{Error, Result};
use crate::input::{
    EventRecord, Timestamp, ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_X, ABS_Y, EV_ABS,
    INPUT_EVENT_SIZE,
};
use crate::mirror::{CategoryFilter, ScaleBounds};

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Scale factors and clamp bounds for the primary coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleConfig {
    pub scale_x: f64,
    pub scale_y: f64,
    pub max_x: i32,
    pub max_y: i32,
}

impl ScaleConfig {
    pub fn new(scale_x: f64, scale_y: f64, bounds: ScaleBounds) -> Self {
        Self {
            scale_x,
            scale_y,
            max_x: bounds.max_x,
            max_y: bounds.max_y,
        }
    }

    /// Rescale legacy and multi-touch X/Y; every other record is returned
    /// unchanged.
    pub fn apply(&self, ev: EventRecord) -> EventRecord {
        if ev.kind != EV_ABS {
            return ev;
        }
        match ev.code {
            ABS_X | ABS_MT_POSITION_X => ev.with_value(scale_clamp(ev.value, self.scale_x, self.max_x)),
            ABS_Y | ABS_MT_POSITION_Y => ev.with_value(scale_clamp(ev.value, self.scale_y, self.max_y)),
            _ => ev,
        }
    }
}

/// `value * scale`, truncated toward zero, then limited to `[0, max]`.
/// A negative `max` maps everything at or above zero to `max`.
fn scale_clamp(value: i32, scale: f64, max: i32) -> i32 {
    // `as` truncates toward zero and saturates at the i32 limits.
    let scaled = (f64::from(value) * scale) as i32;
    if scaled < 0 {
        0
    } else if scaled > max {
        max
    } else {
        scaled
    }
}

/// How to wait when the source has nothing to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitMode {
    /// Sleep 1 ms and retry.
    #[default]
    Poll,
    /// Block in poll(2) until the source is readable.
    Readiness,
}

impl fmt::Display for WaitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitMode::Poll => write!(f, "poll"),
            WaitMode::Readiness => write!(f, "readiness"),
        }
    }
}

impl FromStr for WaitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "poll" | "sleep" => Ok(WaitMode::Poll),
            "readiness" | "block" => Ok(WaitMode::Readiness),
            _ => Err(format!("Invalid wait mode '{}'. Valid values: poll, readiness", s)),
        }
    }
}

/// What one cycle of the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forwarded,
    /// Dropped because its category is not mirrored.
    Filtered,
    WouldBlock,
    /// Discarded a short read of this many bytes.
    Partial(usize),
}

pub struct Forwarder<S, K> {
    source: S,
    sink: K,
    scale: ScaleConfig,
    filter: CategoryFilter,
    wait: WaitMode,
    forwarded: u64,
}

impl<S: EventSource, K: EventSink> Forwarder<S, K> {
    pub fn new(source: S, sink: K, scale: ScaleConfig, filter: CategoryFilter, wait: WaitMode) -> Self {
        Self {
            source,
            sink,
            scale,
            filter,
            wait,
            forwarded: 0,
        }
    }

    /// Relay until a fatal I/O error.
    pub fn run(mut self) -> Result<Infallible> {
        log::info!(
            "Forwarding started (scale {}x{}, clamp {}x{}, wait {})",
            self.scale.scale_x,
            self.scale.scale_y,
            self.scale.max_x,
            self.scale.max_y,
            self.wait
        );
        loop {
            if self.step()? == Step::WouldBlock {
                self.idle()?;
            }
        }
    }

    /// One read/transform/write cycle. Never waits.
    pub fn step(&mut self) -> Result<Step> {
        let record = match self.source.read_record().map_err(Error::Read)? {
            ReadOutcome::Record(record) => record,
            ReadOutcome::WouldBlock => return Ok(Step::WouldBlock),
            ReadOutcome::Partial(n) => {
                log::trace!("discarding partial record ({} bytes)", n);
                return Ok(Step::Partial(n));
            }
        };

        // Types outside the known categories are still relayed.
        if let Some(category) = record.category() {
            if !self.filter.allows(category) {
                return Ok(Step::Filtered);
            }
        }

        let out = self.scale.apply(record).with_time(Timestamp::monotonic_now());
        log::trace!(
            "type {:#x} code {:#x} value {} -> {}",
            out.kind,
            out.code,
            record.value,
            out.value
        );

        let written = self.sink.write_record(&out).map_err(Error::Write)?;
        if written != INPUT_EVENT_SIZE {
            return Err(Error::ShortWrite { written });
        }

        self.log_progress();
        Ok(Step::Forwarded)
    }

    fn idle(&mut self) -> Result<()> {
        match self.wait {
            WaitMode::Poll => {
                thread::sleep(POLL_INTERVAL);
                Ok(())
            }
            WaitMode::Readiness => self.source.wait_readable().map_err(Error::Wait),
        }
    }

    fn log_progress(&mut self) {
        if self.forwarded == 0 {
            log::info!("Events flowing");
        }
        self.forwarded += 1;
        if self.forwarded % 500 == 0 {
            log::debug!("Records forwarded: {}", self.forwarded);
        }
    }

    #[cfg(test)]
    fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }
}
