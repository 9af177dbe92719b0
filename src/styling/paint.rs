use image::Rgba;

use super::{Gradient, GradientKind, QrStyle};

// Fill resolver
//------------------------------------------------------------------------------

/// Resolved fill for one module class, sampled per pixel.
///
/// Paint resolution is a pure function of the style descriptor and the canvas
/// size, so identical inputs always produce pixel-identical output.
#[derive(Debug, PartialEq, Clone)]
pub enum Paint {
    Solid(Rgba<u8>),
    /// Axis endpoints in canvas space plus the two stop colors.
    Linear { x1: f32, y1: f32, x2: f32, y2: f32, start: Rgba<u8>, end: Rgba<u8> },
    /// Centered radial falloff out to `radius`.
    Radial { cx: f32, cy: f32, radius: f32, start: Rgba<u8>, end: Rgba<u8> },
}

impl Paint {
    /// Fill for data modules: the gradient when enabled, else the solid
    /// foreground color.
    pub fn for_data(style: &QrStyle, canvas_size: u32) -> Self {
        match &style.gradient {
            Some(gradient) => Self::from_gradient(gradient, canvas_size),
            None => Paint::Solid(style.foreground),
        }
    }

    /// Eyes are always solid, regardless of gradient settings.
    pub fn for_eyes(style: &QrStyle) -> Self {
        Paint::Solid(style.eye_color)
    }

    fn from_gradient(gradient: &Gradient, canvas_size: u32) -> Self {
        let size = canvas_size as f32;
        let half = size / 2.0;
        let start = gradient.start;
        // A missing second stop degenerates to a solid-looking fill.
        let end = gradient.end.unwrap_or(gradient.start);
        match gradient.kind {
            GradientKind::Linear => {
                let angle = gradient.direction.to_radians();
                let (dx, dy) = (angle.cos() * half, angle.sin() * half);
                Paint::Linear {
                    x1: half - dx,
                    y1: half - dy,
                    x2: half + dx,
                    y2: half + dy,
                    start,
                    end,
                }
            }
            GradientKind::Radial => Paint::Radial { cx: half, cy: half, radius: half, start, end },
        }
    }

    /// Color at pixel center (x, y).
    pub fn sample(&self, x: u32, y: u32) -> Rgba<u8> {
        match *self {
            Paint::Solid(color) => color,
            Paint::Linear { x1, y1, x2, y2, start, end } => {
                let (ax, ay) = (x2 - x1, y2 - y1);
                let len_sq = ax * ax + ay * ay;
                if len_sq == 0.0 {
                    return start;
                }
                let (px, py) = (x as f32 + 0.5 - x1, y as f32 + 0.5 - y1);
                let t = ((px * ax + py * ay) / len_sq).clamp(0.0, 1.0);
                lerp(start, end, t)
            }
            Paint::Radial { cx, cy, radius, start, end } => {
                let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
                let t = ((dx * dx + dy * dy).sqrt() / radius).clamp(0.0, 1.0);
                lerp(start, end, t)
            }
        }
    }
}

fn lerp(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgba([
        mix(a.0[0], b.0[0]),
        mix(a.0[1], b.0[1]),
        mix(a.0[2], b.0[2]),
        mix(a.0[3], b.0[3]),
    ])
}
