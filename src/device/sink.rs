use std::io;
use std::os::fd::AsRawFd;

use evdevil::event::{Abs, Key, Led, Misc, Rel, Sound, Switch};
use evdevil::ff::Feature;
use evdevil::uinput::{AbsSetup, UinputDevice};
use evdevil::{AbsInfo, Bus, InputId, InputProp};

use crate::error::{Error, Result, SinkStep};
use crate::input::{encode_input_event, Category, EventRecord};
use crate::mirror::{AxisRange, VirtualDeviceDescriptor};

use super::EventSink;

// The kernel refuses to create a device with EV_FF set and no effect slots.
const FF_EFFECTS_MAX: u32 = 16;

/// The live virtual device.
pub struct UinputSink {
    device: UinputDevice,
}

impl UinputSink {
    /// Submit `desc` to /dev/uinput and activate the device. Every failure is
    /// fatal; a half-built device is never reused.
    pub fn create(desc: &VirtualDeviceDescriptor) -> Result<Self> {
        let id = desc.identity;
        let mut builder = UinputDevice::builder()
            .map_err(Error::sink(SinkStep::Open))?
            .with_input_id(InputId::new(Bus::from_raw(id.bus), id.vendor, id.product, id.version))
            .map_err(Error::sink(SinkStep::Identity))?;

        // INPUT_PROP_DIRECT = touchscreen, not a pointer-driving touchpad.
        if desc.direct {
            builder = builder
                .with_props([InputProp::DIRECT])
                .map_err(Error::sink(SinkStep::Properties))?;
        }

        let caps = &desc.capabilities;
        for category in caps.categories() {
            let codes = caps.codes(category);
            builder = match category {
                // Always enabled by uinput.
                Category::Sync => Ok(builder),
                Category::Key => builder.with_keys(codes.map(Key::from_raw)),
                Category::Relative => builder.with_rel_axes(codes.map(Rel::from_raw)),
                Category::Absolute => builder.with_abs_axes(
                    desc.abs_setups()
                        .map(|(code, range)| AbsSetup::new(Abs::from_raw(code), abs_info(range))),
                ),
                Category::Misc => builder.with_misc(codes.map(Misc::from_raw)),
                Category::Switch => builder.with_switches(codes.map(Switch::from_raw)),
                Category::Led => builder.with_leds(codes.map(Led::from_raw)),
                Category::Sound => builder.with_sounds(codes.map(Sound::from_raw)),
                Category::ForceFeedback => builder
                    .with_ff_features(codes.map(Feature::from_raw))
                    .and_then(|b| b.with_ff_effects_max(FF_EFFECTS_MAX)),
            }
            .map_err(Error::sink(SinkStep::Register(category)))?;
        }

        let device = builder.build(&desc.name).map_err(Error::sink(SinkStep::Create))?;
        if let Ok(name) = device.sysname() {
            log::info!(
                "Virtual device ready: /sys/devices/virtual/input/{}",
                name.to_string_lossy()
            );
        }
        Ok(Self { device })
    }
}

fn abs_info(range: AxisRange) -> AbsInfo {
    AbsInfo::new(range.minimum, range.maximum)
        .with_fuzz(range.fuzz)
        .with_flat(range.flat)
        .with_resolution(range.resolution)
}

impl EventSink for UinputSink {
    fn write_record(&mut self, record: &EventRecord) -> io::Result<usize> {
        let bytes = encode_input_event(record);
        let n = unsafe { libc::write(self.device.as_raw_fd(), bytes.as_ptr().cast(), bytes.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }
}
