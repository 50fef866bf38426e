use std::io;
use std::os::fd::AsRawFd;
use std::path::Path;

use evdevil::event::Abs;
use evdevil::Evdev;

use crate::error::{Error, Result};
use crate::input::{parse_input_event, Category, INPUT_EVENT_SIZE};
use crate::mirror::{AxisRange, CapabilitySource};

use super::{EventSource, ReadOutcome};

/// The physical evdev node, opened non-blocking.
pub struct SourceDevice {
    evdev: Evdev,
}

impl SourceDevice {
    pub fn open(path: &Path) -> Result<Self> {
        let evdev = Evdev::open(path).map_err(|source| Error::OpenSource {
            path: path.to_path_buf(),
            source,
        })?;
        evdev.set_nonblocking(true).map_err(Error::ConfigureSource)?;
        log::info!("Source opened: {}", path.display());
        Ok(Self { evdev })
    }

    /// Ask for exclusive delivery. Failure leaves the source shared.
    pub fn grab(&self) {
        match self.evdev.grab() {
            Ok(()) => log::info!("Source grabbed exclusively"),
            Err(e) => log::warn!("EVIOCGRAB failed (continuing): {}", e),
        }
    }
}

impl CapabilitySource for SourceDevice {
    fn supported_types(&self) -> io::Result<Vec<u16>> {
        Ok(self.evdev.supported_events()?.iter().map(|t| t.raw()).collect())
    }

    fn supported_codes(&self, category: Category) -> io::Result<Vec<u16>> {
        let ev = &self.evdev;
        let codes = match category {
            Category::Sync => Vec::new(),
            Category::Key => ev.supported_keys()?.iter().map(|c| c.raw()).collect(),
            Category::Relative => ev.supported_rel_axes()?.iter().map(|c| c.raw()).collect(),
            Category::Absolute => ev.supported_abs_axes()?.iter().map(|c| c.raw()).collect(),
            Category::Misc => ev.supported_misc()?.iter().map(|c| c.raw()).collect(),
            Category::Switch => ev.supported_switches()?.iter().map(|c| c.raw()).collect(),
            Category::Led => ev.supported_leds()?.iter().map(|c| c.raw()).collect(),
            Category::Sound => ev.supported_sounds()?.iter().map(|c| c.raw()).collect(),
            Category::ForceFeedback => ev.supported_ff_features()?.iter().map(|c| c.raw()).collect(),
        };
        Ok(codes)
    }

    fn axis_range(&self, code: u16) -> io::Result<AxisRange> {
        let info = self.evdev.abs_info(Abs::from_raw(code))?;
        Ok(AxisRange {
            minimum: info.minimum(),
            maximum: info.maximum(),
            fuzz: info.fuzz(),
            flat: info.flat(),
            resolution: info.resolution(),
        })
    }
}

impl EventSource for SourceDevice {
    fn read_record(&mut self) -> io::Result<ReadOutcome> {
        let mut buf = [0u8; INPUT_EVENT_SIZE];
        let n = unsafe { libc::read(self.evdev.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::WouldBlock {
                return Ok(ReadOutcome::WouldBlock);
            }
            return Err(err);
        }

        let n = n as usize;
        Ok(match parse_input_event(&buf[..n]) {
            Some(record) => ReadOutcome::Record(record),
            None => ReadOutcome::Partial(n),
        })
    }

    fn wait_readable(&mut self) -> io::Result<()> {
        loop {
            match self.evdev.block_until_readable() {
                Ok(_) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
