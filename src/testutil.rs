//! In-memory source and sink for exercising the mirror and the loop.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io;

use crate::device::{EventSink, EventSource, ReadOutcome};
use crate::input::{Category, EventRecord, INPUT_EVENT_SIZE};
use crate::mirror::{AxisRange, CapabilitySource};

#[derive(Default)]
pub struct FakeSource {
    types: BTreeSet<u16>,
    codes: BTreeMap<Category, Vec<u16>>,
    axes: BTreeMap<u16, AxisRange>,
    fail_types: bool,
    fail_codes: BTreeSet<Category>,
    fail_axes: BTreeSet<u16>,
    stream: VecDeque<ReadOutcome>,
    read_error: Option<io::ErrorKind>,
    pub waits: usize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, raw: u16) -> Self {
        self.types.insert(raw);
        self
    }

    /// Announce `category` and report `codes` for it.
    pub fn with_codes(self, category: Category, codes: impl IntoIterator<Item = u16>) -> Self {
        self.with_type(category.raw()).with_stray_codes(category, codes)
    }

    /// Report `codes` without announcing the category itself.
    pub fn with_stray_codes(mut self, category: Category, codes: impl IntoIterator<Item = u16>) -> Self {
        self.codes.entry(category).or_default().extend(codes);
        self
    }

    /// Announce an absolute axis with `range`.
    pub fn with_axis(mut self, code: u16, range: AxisRange) -> Self {
        self.axes.insert(code, range);
        self.with_codes(Category::Absolute, [code])
    }

    pub fn failing_types(mut self) -> Self {
        self.fail_types = true;
        self
    }

    pub fn failing_codes(mut self, category: Category) -> Self {
        self.fail_codes.insert(category);
        self
    }

    pub fn failing_axis(mut self, code: u16) -> Self {
        self.fail_axes.insert(code);
        self
    }

    pub fn with_stream(mut self, outcomes: Vec<ReadOutcome>) -> Self {
        self.stream.extend(outcomes);
        self
    }

    pub fn stream_is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    pub fn fail_next_read(&mut self, kind: io::ErrorKind) {
        self.read_error = Some(kind);
    }
}

fn einval() -> io::Error {
    io::Error::from_raw_os_error(libc::EINVAL)
}

impl CapabilitySource for FakeSource {
    fn supported_types(&self) -> io::Result<Vec<u16>> {
        if self.fail_types {
            return Err(einval());
        }
        Ok(self.types.iter().copied().collect())
    }

    fn supported_codes(&self, category: Category) -> io::Result<Vec<u16>> {
        if self.fail_codes.contains(&category) {
            return Err(einval());
        }
        Ok(self.codes.get(&category).cloned().unwrap_or_default())
    }

    // Unconfigured axes read back as zeros, as the kernel reports them.
    fn axis_range(&self, code: u16) -> io::Result<AxisRange> {
        if self.fail_axes.contains(&code) {
            return Err(einval());
        }
        Ok(self.axes.get(&code).copied().unwrap_or_default())
    }
}

impl EventSource for FakeSource {
    fn read_record(&mut self) -> io::Result<ReadOutcome> {
        if let Some(kind) = self.read_error.take() {
            return Err(io::Error::from(kind));
        }
        Ok(self.stream.pop_front().unwrap_or(ReadOutcome::WouldBlock))
    }

    fn wait_readable(&mut self) -> io::Result<()> {
        self.waits += 1;
        Ok(())
    }
}

/// Records every write; can be told to accept fewer bytes than a record.
pub struct FakeSink {
    pub written: Vec<EventRecord>,
    accept: usize,
}

impl FakeSink {
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
            accept: INPUT_EVENT_SIZE,
        }
    }

    pub fn short_writes(mut self, accept: usize) -> Self {
        self.accept = accept;
        self
    }
}

impl EventSink for FakeSink {
    fn write_record(&mut self, record: &EventRecord) -> io::Result<usize> {
        self.written.push(*record);
        Ok(self.accept)
    }
}

