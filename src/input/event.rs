//! Linux `struct input_event` as raw bytes in the native layout of the host.

use std::fmt;
use std::mem::size_of;

/// Width of one `long` in `struct timeval` on this target.
const LONG_SIZE: usize = size_of::<libc::c_long>();

/// Size of one `struct input_event` (timeval + type 2 + code 2 + value 4).
/// 16 bytes on 32-bit targets, 24 bytes on 64-bit targets.
pub const INPUT_EVENT_SIZE: usize = 2 * LONG_SIZE + 8;

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;
pub const EV_MSC: u16 = 0x04;
pub const EV_SW: u16 = 0x05;
pub const EV_LED: u16 = 0x11;
pub const EV_SND: u16 = 0x12;
pub const EV_FF: u16 = 0x15;

#[cfg(test)]
pub const SYN_REPORT: u16 = 0;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_MT_SLOT: u16 = 0x2f; // 47
pub const ABS_MT_POSITION_X: u16 = 0x35; // 53
pub const ABS_MT_POSITION_Y: u16 = 0x36; // 54
pub const ABS_MAX: u16 = 0x3f;

/// The event kinds a device can report and a virtual device can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Sync,
    Key,
    Relative,
    Absolute,
    Misc,
    Switch,
    Led,
    Sound,
    ForceFeedback,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Sync,
        Category::Key,
        Category::Relative,
        Category::Absolute,
        Category::Misc,
        Category::Switch,
        Category::Led,
        Category::Sound,
        Category::ForceFeedback,
    ];

    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            EV_SYN => Some(Category::Sync),
            EV_KEY => Some(Category::Key),
            EV_REL => Some(Category::Relative),
            EV_ABS => Some(Category::Absolute),
            EV_MSC => Some(Category::Misc),
            EV_SW => Some(Category::Switch),
            EV_LED => Some(Category::Led),
            EV_SND => Some(Category::Sound),
            EV_FF => Some(Category::ForceFeedback),
            _ => None,
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Category::Sync => EV_SYN,
            Category::Key => EV_KEY,
            Category::Relative => EV_REL,
            Category::Absolute => EV_ABS,
            Category::Misc => EV_MSC,
            Category::Switch => EV_SW,
            Category::Led => EV_LED,
            Category::Sound => EV_SND,
            Category::ForceFeedback => EV_FF,
        }
    }

    /// Highest code the kernel defines for this category, or `None` when the
    /// category has no registrable code table (synchronization).
    pub fn max_code(self) -> Option<u16> {
        match self {
            Category::Sync => None,
            Category::Key => Some(0x2ff),
            Category::Relative => Some(0x0f),
            Category::Absolute => Some(ABS_MAX),
            Category::Misc => Some(0x07),
            Category::Switch => Some(0x10),
            Category::Led => Some(0x0f),
            Category::Sound => Some(0x07),
            Category::ForceFeedback => Some(0x7f),
        }
    }

    /// Short lowercase name used on the command line and in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Category::Sync => "syn",
            Category::Key => "key",
            Category::Relative => "rel",
            Category::Absolute => "abs",
            Category::Misc => "msc",
            Category::Switch => "sw",
            Category::Led => "led",
            Category::Sound => "snd",
            Category::ForceFeedback => "ff",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// `struct timeval` as carried in an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub sec: i64,
    pub usec: i64,
}

impl Timestamp {
    /// Current CLOCK_MONOTONIC time, truncated to microseconds.
    pub fn monotonic_now() -> Self {
        let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
        // CLOCK_MONOTONIC cannot fail with a valid pointer.
        unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
        Self {
            sec: ts.tv_sec as i64,
            usec: ts.tv_nsec as i64 / 1000,
        }
    }
}

/// One timestamped (type, code, value) record.
///
/// `kind` keeps the raw type so records of types outside [`Category`] are
/// still relayed verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub time: Timestamp,
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl EventRecord {
    #[cfg(test)]
    pub fn new(category: Category, code: u16, value: i32) -> Self {
        Self {
            time: Timestamp::default(),
            kind: category.raw(),
            code,
            value,
        }
    }

    pub fn category(&self) -> Option<Category> {
        Category::from_raw(self.kind)
    }

    pub fn with_time(self, time: Timestamp) -> Self {
        Self { time, ..self }
    }

    pub fn with_value(self, value: i32) -> Self {
        Self { value, ..self }
    }
}

/// Parse one input_event from a buffer holding exactly one record.
/// Returns `None` for any other length; partial records are never stitched.
pub fn parse_input_event(buf: &[u8]) -> Option<EventRecord> {
    if buf.len() != INPUT_EVENT_SIZE {
        return None;
    }
    let sec = read_long(&buf[..LONG_SIZE]);
    let usec = read_long(&buf[LONG_SIZE..2 * LONG_SIZE]);
    let rest = &buf[2 * LONG_SIZE..];
    let kind = u16::from_ne_bytes([rest[0], rest[1]]);
    let code = u16::from_ne_bytes([rest[2], rest[3]]);
    let value = i32::from_ne_bytes([rest[4], rest[5], rest[6], rest[7]]);

    Some(EventRecord {
        time: Timestamp { sec, usec },
        kind,
        code,
        value,
    })
}

/// Encode a record into the native input_event layout.
pub fn encode_input_event(ev: &EventRecord) -> [u8; INPUT_EVENT_SIZE] {
    let mut buf = [0u8; INPUT_EVENT_SIZE];
    write_long(&mut buf[..LONG_SIZE], ev.time.sec);
    write_long(&mut buf[LONG_SIZE..2 * LONG_SIZE], ev.time.usec);
    let rest = &mut buf[2 * LONG_SIZE..];
    rest[0..2].copy_from_slice(&ev.kind.to_ne_bytes());
    rest[2..4].copy_from_slice(&ev.code.to_ne_bytes());
    rest[4..8].copy_from_slice(&ev.value.to_ne_bytes());
    buf
}

fn read_long(bytes: &[u8]) -> i64 {
    let mut raw = [0u8; LONG_SIZE];
    raw.copy_from_slice(bytes);
    libc::c_long::from_ne_bytes(raw) as i64
}

fn write_long(out: &mut [u8], value: i64) {
    out.copy_from_slice(&(value as libc::c_long).to_ne_bytes());
}
