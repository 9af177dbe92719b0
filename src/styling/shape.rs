use image::RgbaImage;

use super::paint::Paint;
use super::{DataStyle, EyeStyle};

// Shape renderer
//------------------------------------------------------------------------------

/// Geometric primitive drawn for one dark module.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Shape {
    Square,
    Circle,
    Rounded,
    Dots,
    Leaf,
    Diamond,
}

impl From<DataStyle> for Shape {
    fn from(style: DataStyle) -> Self {
        match style {
            DataStyle::Square => Shape::Square,
            DataStyle::Circle => Shape::Circle,
            DataStyle::Rounded => Shape::Rounded,
            DataStyle::Dots => Shape::Dots,
        }
    }
}

impl From<EyeStyle> for Shape {
    fn from(style: EyeStyle) -> Self {
        match style {
            EyeStyle::Square => Shape::Square,
            EyeStyle::Circle => Shape::Circle,
            EyeStyle::Rounded => Shape::Rounded,
            EyeStyle::Leaf => Shape::Leaf,
            EyeStyle::Diamond => Shape::Diamond,
        }
    }
}

impl Shape {
    /// Coverage test in cell-normalized coordinates, (u, v) in [0, 1].
    pub(crate) fn contains(self, u: f32, v: f32) -> bool {
        match self {
            Shape::Square => true,
            Shape::Circle => {
                let (du, dv) = (u - 0.5, v - 0.5);
                du * du + dv * dv <= 0.25
            }
            Shape::Rounded => {
                const R: f32 = 0.2;
                let du = if u < R {
                    R - u
                } else if u > 1.0 - R {
                    u - (1.0 - R)
                } else {
                    0.0
                };
                let dv = if v < R {
                    R - v
                } else if v > 1.0 - R {
                    v - (1.0 - R)
                } else {
                    0.0
                };
                du * du + dv * dv <= R * R
            }
            Shape::Dots => {
                let (du, dv) = (u - 0.5, v - 0.5);
                du * du + dv * dv <= 0.09
            }
            // Teardrop between two quadratic curves joining the bottom-left
            // and top-right corners, bowing past the top-left and
            // bottom-right. On each curve sqrt(u) + sqrt(v) == 1 (resp. the
            // mirrored form), so membership reduces to two inequalities.
            Shape::Leaf => {
                u.sqrt() + v.sqrt() >= 1.0 && (1.0 - u).sqrt() + (1.0 - v).sqrt() >= 1.0
            }
            Shape::Diamond => (u - 0.5).abs() + (v - 0.5).abs() <= 0.5,
        }
    }
}

/// Paints one module's shape into its cell, sampling `paint` per pixel so
/// gradient fills stay continuous across module boundaries.
pub(crate) fn paint_module(
    canvas: &mut RgbaImage,
    x0: u32,
    y0: u32,
    cell_size: u32,
    shape: Shape,
    paint: &Paint,
) {
    for dy in 0..cell_size {
        for dx in 0..cell_size {
            let u = (dx as f32 + 0.5) / cell_size as f32;
            let v = (dy as f32 + 0.5) / cell_size as f32;
            if shape.contains(u, v) {
                let (x, y) = (x0 + dx, y0 + dy);
                canvas.put_pixel(x, y, paint.sample(x, y));
            }
        }
    }
}
