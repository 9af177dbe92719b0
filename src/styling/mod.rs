pub mod classify;
pub mod logo;
pub mod paint;
pub mod render;
pub(crate) mod shape;

use image::Rgba;

use crate::error::{RenderError, RenderResult};

// Style descriptor
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum EyeStyle {
    Square,
    Circle,
    Rounded,
    Leaf,
    Diamond,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum DataStyle {
    Square,
    Circle,
    Rounded,
    Dots,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GradientKind {
    Linear,
    Radial,
}

/// Two-stop gradient applied to data modules only. Eyes stay solid.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Gradient {
    pub kind: GradientKind,
    pub start: Rgba<u8>,
    /// Second stop. `None` degenerates to a solid fill of `start`.
    pub end: Option<Rgba<u8>>,
    /// Axis rotation in degrees, [0, 360). Ignored for radial gradients.
    pub direction: f32,
}

/// Logo overlay descriptor. Percentages are relative to the full canvas span
/// (`size_percent`) and to the resulting plate (`margin_percent`).
#[derive(Debug, Clone)]
pub struct Logo {
    pub image_bytes: Vec<u8>,
    pub size_percent: f32,
    pub margin_percent: f32,
}

impl Logo {
    pub const SIZE_RANGE: (f32, f32) = (10.0, 40.0);
    pub const MARGIN_RANGE: (f32, f32) = (0.0, 20.0);

    pub(crate) fn clamped_size(&self) -> f32 {
        self.size_percent.clamp(Self::SIZE_RANGE.0, Self::SIZE_RANGE.1)
    }

    pub(crate) fn clamped_margin(&self) -> f32 {
        self.margin_percent.clamp(Self::MARGIN_RANGE.0, Self::MARGIN_RANGE.1)
    }
}

#[derive(Debug, Clone)]
pub struct QrStyle {
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
    pub eye_color: Rgba<u8>,
    pub eye_style: EyeStyle,
    pub data_style: DataStyle,
    pub gradient: Option<Gradient>,
    pub logo: Option<Logo>,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            foreground: Rgba([0, 0, 0, 255]),
            background: Rgba([255, 255, 255, 255]),
            eye_color: Rgba([0, 0, 0, 255]),
            eye_style: EyeStyle::Square,
            data_style: DataStyle::Square,
            gradient: None,
            logo: None,
        }
    }
}

// Color parsing
//------------------------------------------------------------------------------

/// Parses `#rgb`, `#rrggbb` and `#rrggbbaa` literals.
pub fn parse_hex_color(s: &str) -> RenderResult<Rgba<u8>> {
    let bad = || RenderError::InvalidColor(s.to_string());
    let hex = s.strip_prefix('#').ok_or_else(bad)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let nibble = |c: char| c.to_digit(16).unwrap() as u8;
    let mut chars = hex.chars();
    match hex.len() {
        3 => {
            let mut channel = || {
                let n = nibble(chars.next().unwrap());
                n << 4 | n
            };
            Ok(Rgba([channel(), channel(), channel(), 255]))
        }
        6 | 8 => {
            let mut channel = || {
                let hi = nibble(chars.next().unwrap());
                let lo = nibble(chars.next().unwrap());
                hi << 4 | lo
            };
            let (r, g, b) = (channel(), channel(), channel());
            let a = if hex.len() == 8 { channel() } else { 255 };
            Ok(Rgba([r, g, b, a]))
        }
        _ => Err(bad()),
    }
}
