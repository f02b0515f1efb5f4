use serde::Serialize;

/// A named filament color with its 8-bit RGB triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorChoice {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

/// The fixed palette offered for both the plate and the text.
pub const COLOR_OPTIONS: [ColorChoice; 2] = [
    ColorChoice {
        name: "Black",
        rgb: [0, 0, 0],
    },
    ColorChoice {
        name: "White",
        rgb: [255, 255, 255],
    },
];

/// Which of the two colored parts a choice applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorRole {
    Plate,
    Text,
}

/// Convert an 0-255 RGB triplet to normalized 0-1 components for exports.
pub fn rgb_to_normalized(rgb: [u8; 3]) -> [f64; 3] {
    [
        rgb[0] as f64 / 255.0,
        rgb[1] as f64 / 255.0,
        rgb[2] as f64 / 255.0,
    ]
}

/// Convert an 0-255 RGB triplet to a CSS-style hex string.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
