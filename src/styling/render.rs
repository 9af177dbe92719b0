use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, RgbaImage};
use tracing::debug;

use super::classify::{classify, logo_exclusion_radius, ModuleClass};
use super::logo::{composite_logo, decode_logo};
use super::paint::Paint;
use super::shape::{paint_module, Shape};
use super::QrStyle;
use crate::error::{RenderError, RenderResult};
use crate::matrix::ModuleMatrix;

// Render pipeline
//------------------------------------------------------------------------------

/// Pixels per module.
pub const CELL_SIZE: u32 = 10;

/// Quiet-zone margin in pixels on each side of the symbol.
pub const MARGIN: u32 = 40;

/// Canvas side length for a symbol of `n` modules.
pub fn canvas_size(n: usize) -> u32 {
    n as u32 * CELL_SIZE + 2 * MARGIN
}

/// Renders `content` as a styled QR bitmap.
///
/// The matrix is always built at EC level H. Dark data modules take the data
/// shape and paint, dark eye modules the eye shape and solid eye color, and
/// dark modules under the logo disk are left unpainted. The only fallible
/// step besides encoding is decoding an attached logo.
pub fn render(content: &str, style: &QrStyle) -> RenderResult<RgbaImage> {
    let matrix = ModuleMatrix::from_content(content)?;
    let n = matrix.width();
    let size = canvas_size(n);
    debug!(modules = n, size, "rendering styled QR");

    // Decode the logo up front so a bad image fails the call before any
    // painting happens.
    let decoded_logo = match &style.logo {
        Some(logo) => Some((logo, decode_logo(logo)?)),
        None => None,
    };

    let mut canvas = RgbaImage::from_pixel(size, size, style.background);

    let data_paint = Paint::for_data(style, size);
    let eye_paint = Paint::for_eyes(style);
    let data_shape = Shape::from(style.data_style);
    let eye_shape = Shape::from(style.eye_style);
    let logo_radius = style.logo.as_ref().map(|l| logo_exclusion_radius(n, l.clamped_size()));

    for row in 0..n {
        for col in 0..n {
            if !matrix.is_dark(row, col) {
                continue;
            }
            let x = col as u32 * CELL_SIZE + MARGIN;
            let y = row as u32 * CELL_SIZE + MARGIN;
            match classify(row, col, n, logo_radius) {
                ModuleClass::Eye => paint_module(&mut canvas, x, y, CELL_SIZE, eye_shape, &eye_paint),
                ModuleClass::Data => {
                    paint_module(&mut canvas, x, y, CELL_SIZE, data_shape, &data_paint)
                }
                ModuleClass::LogoExcluded => {}
            }
        }
    }

    if let Some((logo, decoded)) = decoded_logo {
        composite_logo(&mut canvas, logo, &decoded);
    }

    Ok(canvas)
}

/// Serializes a rendered canvas to PNG bytes.
pub fn to_png(canvas: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    canvas.write_to(&mut buf, ImageFormat::Png).map_err(RenderError::PngEncode)?;
    Ok(buf.into_inner())
}

/// Serializes a rendered canvas to a `data:image/png;base64,...` URL,
/// suitable for direct display or download.
pub fn to_data_url(canvas: &RgbaImage) -> RenderResult<String> {
    let png = to_png(canvas)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(format!("data:image/png;base64,{encoded}"))
}
