//! Display previews of patch colors
//!
//! Reports carry a hex color for the reference and measured value of every
//! patch so a results view can paint them without its own color management.

use palette::{FromColor, Lab, Srgb};

use crate::reference::LabColor;

/// sRGB preview of an L*a*b* (D65) color, clamped into gamut
pub fn lab_to_srgb(lab: [f64; 3]) -> Srgb {
    let srgb = Srgb::from_color(Lab::from(LabColor::new(lab[0], lab[1], lab[2])));
    Srgb::new(
        srgb.red.clamp(0.0, 1.0),
        srgb.green.clamp(0.0, 1.0),
        srgb.blue.clamp(0.0, 1.0),
    )
}

/// Hexadecimal color string, e.g. `"#FF0000"`
pub fn srgb_to_hex(srgb: Srgb) -> String {
    let r = (srgb.red * 255.0).round() as u8;
    let g = (srgb.green * 255.0).round() as u8;
    let b = (srgb.blue * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Hex preview of an L*a*b* triplet
pub fn lab_hex(lab: [f64; 3]) -> String {
    srgb_to_hex(lab_to_srgb(lab))
}

/// Hex preview of a device RGB triplet, channels clamped to 0-255
pub fn rgb_hex(rgb: [f64; 3]) -> String {
    let [r, g, b] = rgb.map(|c| c.round().clamp(0.0, 255.0) as u8);
    srgb_to_hex(Srgb::new(r, g, b).into_format())
}

impl From<LabColor> for Lab {
    fn from(color: LabColor) -> Self {
        Lab::new(color.l as f32, color.a as f32, color.b as f32)
    }
}
