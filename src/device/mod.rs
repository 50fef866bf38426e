//! The physical source device and the uinput sink.

mod sink;
mod source;

pub use sink::UinputSink;
pub use source::SourceDevice;

use std::io;

use crate::input::EventRecord;

/// Result of one non-blocking read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Record(EventRecord),
    /// Nothing to read yet.
    WouldBlock,
    /// A read that returned this many bytes instead of one whole record.
    Partial(usize),
}

/// Live event stream of the physical device.
pub trait EventSource {
    /// Attempt to read exactly one record without blocking.
    fn read_record(&mut self) -> io::Result<ReadOutcome>;

    /// Block until the next read has data.
    fn wait_readable(&mut self) -> io::Result<()>;
}

/// Injection side of the virtual device.
pub trait EventSink {
    /// Write one record, returning how many bytes the device accepted.
    fn write_record(&mut self, record: &EventRecord) -> io::Result<usize>;
}
