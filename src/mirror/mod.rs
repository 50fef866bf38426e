//! Discover a source device's capabilities and describe a virtual device
//! that mirrors them.

mod capability;
mod filter;

pub use capability::{AxisRange, AxisTable, CapabilitySet};
pub use filter::CategoryFilter;

use std::io;

use crate::error::{Error, Result};
use crate::input::{
    Category, ABS_MAX, ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_SLOT, ABS_X, ABS_Y,
};

/// X-role maximum used when the source reports no X range at all.
pub const DEFAULT_MAX_X: i32 = 1080;
/// Y-role maximum used when the source reports no Y range at all.
pub const DEFAULT_MAX_Y: i32 = 2400;
/// Highest slot index installed when the source has no slot axis (ten contacts).
pub const DEFAULT_MAX_SLOT: i32 = 9;

pub const DEFAULT_NAME: &str = "touchmux-virtual";
const BUS_VIRTUAL: u16 = 0x06;

/// Introspection side of the physical device.
pub trait CapabilitySource {
    /// Raw type numbers of every event type the device reports.
    fn supported_types(&self) -> io::Result<Vec<u16>>;

    /// Codes the device reports for `category`.
    fn supported_codes(&self, category: Category) -> io::Result<Vec<u16>>;

    /// Range metadata for one absolute axis.
    fn axis_range(&self, code: u16) -> io::Result<AxisRange>;
}

/// Bus/vendor/product/version of the virtual device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub bus: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            bus: BUS_VIRTUAL,
            vendor: 0x18d1,
            product: 0x4ee1,
            version: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub name: String,
    pub identity: DeviceIdentity,
    pub filter: CategoryFilter,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.into(),
            identity: DeviceIdentity::default(),
            filter: CategoryFilter::all(),
        }
    }
}

/// Everything the sink needs to create the virtual device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDeviceDescriptor {
    pub name: String,
    pub identity: DeviceIdentity,
    pub capabilities: CapabilitySet,
    pub axes: AxisTable,
    pub direct: bool,
}

impl VirtualDeviceDescriptor {
    /// Abs axes to submit: every registered abs code with its installed
    /// range, or an all-zero range when none was installed.
    pub fn abs_setups(&self) -> impl Iterator<Item = (u16, AxisRange)> + '_ {
        self.capabilities
            .codes(Category::Absolute)
            .map(|code| (code, self.axes.get(code).copied().unwrap_or_default()))
    }
}

/// Clamp bounds for the primary coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleBounds {
    pub max_x: i32,
    pub max_y: i32,
}

#[derive(Debug, Clone)]
pub struct Mirrored {
    pub descriptor: VirtualDeviceDescriptor,
    pub bounds: ScaleBounds,
}

/// Build a descriptor mirroring everything `source` reports.
///
/// Only the top-level event-type query is fatal. Failed per-category and
/// per-axis probes leave that category or axis out and are logged at debug.
pub fn mirror(source: &impl CapabilitySource, options: &MirrorOptions) -> Result<Mirrored> {
    let types = source.supported_types().map_err(Error::ProbeEventTypes)?;
    let capabilities = discover_capabilities(source, &types, &options.filter);
    let (axes, bounds) = discover_axes(source, &capabilities);

    log::debug!(
        "mirrored {} categories, {} axis ranges (clamp {}x{})",
        capabilities.categories().count(),
        axes.len(),
        bounds.max_x,
        bounds.max_y
    );

    Ok(Mirrored {
        descriptor: VirtualDeviceDescriptor {
            name: options.name.clone(),
            identity: options.identity,
            capabilities,
            axes,
            direct: true,
        },
        bounds,
    })
}

fn discover_capabilities(
    source: &impl CapabilitySource,
    types: &[u16],
    filter: &CategoryFilter,
) -> CapabilitySet {
    let mut caps = CapabilitySet::new();

    for &raw in types {
        let Some(category) = Category::from_raw(raw) else {
            log::debug!("skipping unsupported event type {:#x}", raw);
            continue;
        };
        if !filter.allows(category) {
            log::debug!("skipping {} (filtered)", category);
            continue;
        }
        caps.insert_category(category);

        if category.max_code().is_none() {
            continue;
        }
        let codes = match source.supported_codes(category) {
            Ok(codes) => codes,
            Err(e) => {
                log::debug!("query {} codes failed: {}", category, e);
                continue;
            }
        };
        for code in codes {
            if let Err(e) = caps.insert(category, code) {
                log::debug!("skipping code: {}", e);
            }
        }
    }

    caps
}

fn discover_axes(source: &impl CapabilitySource, caps: &CapabilitySet) -> (AxisTable, ScaleBounds) {
    let mut axes = AxisTable::new();

    for code in 0..=ABS_MAX {
        if !caps.contains(Category::Absolute, code) {
            continue;
        }
        match source.axis_range(code) {
            Ok(range) => {
                // Codes come from 0..=ABS_MAX so the table cannot reject them.
                let _ = axes.insert(code, range);
            }
            Err(e) => log::debug!("query range of abs {:#x} failed: {}", code, e),
        }
    }

    let max_x = role_maximum(&axes, ABS_X, ABS_MT_POSITION_X, DEFAULT_MAX_X);
    let max_y = role_maximum(&axes, ABS_Y, ABS_MT_POSITION_Y, DEFAULT_MAX_Y);

    for (code, max) in [
        (ABS_MT_POSITION_X, max_x),
        (ABS_MT_POSITION_Y, max_y),
        (ABS_X, max_x),
        (ABS_Y, max_y),
        (ABS_MT_SLOT, DEFAULT_MAX_SLOT),
    ] {
        install_default(&mut axes, code, max);
    }

    // Both multi-touch axes now hold a range; they are the clamp bounds.
    let bounds = ScaleBounds {
        max_x: axes.get(ABS_MT_POSITION_X).map_or(max_x, |r| r.maximum),
        max_y: axes.get(ABS_MT_POSITION_Y).map_or(max_y, |r| r.maximum),
    };

    (axes, bounds)
}

/// Maximum for an axis role: multi-touch wins over legacy, then the default.
fn role_maximum(axes: &AxisTable, legacy: u16, multitouch: u16, default: i32) -> i32 {
    axes.reported(multitouch)
        .or_else(|| axes.reported(legacy))
        .map_or(default, |r| r.maximum)
}

fn install_default(axes: &mut AxisTable, code: u16, maximum: i32) {
    if axes.reported(code).is_some() {
        return;
    }
    log::debug!("installing default range [0, {}] for abs {:#x}", maximum, code);
    let _ = axes.insert(code, AxisRange::new(0, maximum));
}
