//! Human-readable dump of a mirrored device description.
//! Run: touchmux --src /dev/input/eventX --describe

use std::fmt::Write;

use crate::input::Category;
use crate::mirror::Mirrored;

fn abs_name(code: u16) -> &'static str {
    match code {
        0x00 => "X",
        0x01 => "Y",
        0x02 => "Z",
        0x18 => "PRESSURE",
        0x19 => "DISTANCE",
        0x1a => "TILT_X",
        0x1b => "TILT_Y",
        0x2f => "MT_SLOT",
        0x30 => "MT_TOUCH_MAJOR",
        0x31 => "MT_TOUCH_MINOR",
        0x32 => "MT_WIDTH_MAJOR",
        0x33 => "MT_WIDTH_MINOR",
        0x34 => "MT_ORIENTATION",
        0x35 => "MT_POSITION_X",
        0x36 => "MT_POSITION_Y",
        0x37 => "MT_TOOL_TYPE",
        0x39 => "MT_TRACKING_ID",
        0x3a => "MT_PRESSURE",
        0x3b => "MT_DISTANCE",
        _ => "?",
    }
}

pub fn render(mirrored: &Mirrored) -> String {
    let desc = &mirrored.descriptor;
    let id = desc.identity;
    let mut out = String::new();

    let _ = writeln!(out, "name: {}", desc.name);
    let _ = writeln!(
        out,
        "id: bus {:#06x} vendor {:#06x} product {:#06x} version {}",
        id.bus, id.vendor, id.product, id.version
    );
    let _ = writeln!(out, "direct: {}", desc.direct);

    for category in desc.capabilities.categories() {
        let codes: Vec<String> = desc
            .capabilities
            .codes(category)
            .map(|c| format!("{:#x}", c))
            .collect();
        let _ = writeln!(
            out,
            "{:>4} {:#04x} ({} codes) {}",
            category,
            category.raw(),
            codes.len(),
            codes.join(" ")
        );
    }

    if desc.capabilities.has_category(Category::Absolute) {
        for (code, r) in desc.abs_setups() {
            let _ = writeln!(
                out,
                "  ABS_{}({}) [{}, {}] fuzz {} flat {} res {}",
                abs_name(code),
                code,
                r.minimum,
                r.maximum,
                r.fuzz,
                r.flat,
                r.resolution
            );
        }
    }

    let _ = writeln!(
        out,
        "clamp: x 0..={} y 0..={}",
        mirrored.bounds.max_x, mirrored.bounds.max_y
    );
    out
}
