use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use super::Logo;
use crate::error::{RenderError, RenderResult};

// Logo compositor
//------------------------------------------------------------------------------

/// The plate behind the logo is always white so the logo stays legible on
/// dark or saturated background themes.
const PLATE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub(crate) fn decode_logo(logo: &Logo) -> RenderResult<DynamicImage> {
    image::load_from_memory(&logo.image_bytes).map_err(RenderError::LogoDecode)
}

/// Paints the plate and the logo over the center of the canvas.
///
/// The plate square matches the exclusion footprint used by the classifier.
/// The logo is fitted into the margin-inset square preserving aspect ratio
/// and centered, rather than stretched to fill it.
pub(crate) fn composite_logo(canvas: &mut RgbaImage, logo: &Logo, decoded: &DynamicImage) {
    let canvas_size = canvas.width();
    let plate_size = (canvas_size as f32 * logo.clamped_size() / 100.0).round() as u32;
    if plate_size == 0 {
        return;
    }
    let plate_origin = (canvas_size - plate_size) / 2;
    draw_filled_rect_mut(
        canvas,
        Rect::at(plate_origin as i32, plate_origin as i32).of_size(plate_size, plate_size),
        PLATE_COLOR,
    );

    let inset = (plate_size as f32 * logo.clamped_margin() / 100.0).round() as u32;
    let inner = plate_size.saturating_sub(inset * 2);
    if inner == 0 {
        return;
    }

    let (w, h) = (decoded.width().max(1), decoded.height().max(1));
    let scale = (inner as f32 / w as f32).min(inner as f32 / h as f32);
    let fit_w = ((w as f32 * scale).round() as u32).max(1);
    let fit_h = ((h as f32 * scale).round() as u32).max(1);
    let resized = imageops::resize(&decoded.to_rgba8(), fit_w, fit_h, FilterType::Triangle);

    let x = plate_origin + inset + (inner - fit_w.min(inner)) / 2;
    let y = plate_origin + inset + (inner - fit_h.min(inner)) / 2;
    imageops::overlay(canvas, &resized, x as i64, y as i64);
}
