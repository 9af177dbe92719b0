use image::Rgba;
use test_case::test_case;

use qrnexus::styling::classify::{classify, logo_exclusion_radius, ModuleClass};
use qrnexus::styling::render::{render, CELL_SIZE, MARGIN};
use qrnexus::styling::{DataStyle, EyeStyle, Gradient, GradientKind, Logo, QrStyle};
use qrnexus::ModuleMatrix;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn gradient_style(data_style: DataStyle) -> QrStyle {
    QrStyle {
        eye_color: BLUE,
        data_style,
        gradient: Some(Gradient {
            kind: GradientKind::Linear,
            start: Rgba([255, 0, 0, 255]),
            end: Some(Rgba([255, 255, 0, 255])),
            direction: 30.0,
        }),
        ..QrStyle::default()
    }
}

/// Pixel rectangles of the three eye territories: the top-left block is
/// 9x9 modules, the top-right and bottom-left blocks only 8 modules deep
/// on their far side (column and row `n - 8` onward).
fn eye_blocks(n: u32) -> [(u32, u32, u32, u32); 3] {
    [
        (MARGIN, MARGIN, 9 * CELL_SIZE, 9 * CELL_SIZE),
        (MARGIN + (n - 8) * CELL_SIZE, MARGIN, 8 * CELL_SIZE, 9 * CELL_SIZE),
        (MARGIN, MARGIN + (n - 8) * CELL_SIZE, 9 * CELL_SIZE, 8 * CELL_SIZE),
    ]
}

fn tiny_png() -> Vec<u8> {
    use std::io::Cursor;
    let img = image::RgbaImage::from_pixel(12, 12, Rgba([20, 120, 220, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

#[test]
fn test_rendering_is_deterministic() {
    let style = gradient_style(DataStyle::Rounded);
    let first = render("https://example.com/some/path?q=1", &style).unwrap();
    let second = render("https://example.com/some/path?q=1", &style).unwrap();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn test_rendering_with_logo_is_deterministic() {
    let style = QrStyle {
        logo: Some(Logo { image_bytes: tiny_png(), size_percent: 25.0, margin_percent: 10.0 }),
        ..gradient_style(DataStyle::Circle)
    };
    let first = render("https://example.com", &style).unwrap();
    let second = render("https://example.com", &style).unwrap();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test_case(DataStyle::Square)]
#[test_case(DataStyle::Circle)]
#[test_case(DataStyle::Rounded)]
#[test_case(DataStyle::Dots)]
fn test_eye_pixels_invariant_under_data_style(data_style: DataStyle) {
    // Eye regions must render identically whatever the data style or
    // gradient settings are.
    let reference = render("https://example.com", &gradient_style(DataStyle::Square)).unwrap();
    let canvas = render("https://example.com", &gradient_style(data_style)).unwrap();
    let n = ModuleMatrix::from_content("https://example.com").unwrap().width() as u32;

    for (x0, y0, w, h) in eye_blocks(n) {
        for dy in 0..h {
            for dx in 0..w {
                assert_eq!(
                    canvas.get_pixel(x0 + dx, y0 + dy),
                    reference.get_pixel(x0 + dx, y0 + dy),
                    "eye pixel ({}, {})",
                    x0 + dx,
                    y0 + dy
                );
            }
        }
    }
}

#[test]
fn test_eye_modules_never_use_gradient_colors() {
    let style = gradient_style(DataStyle::Dots);
    let canvas = render("https://example.com", &style).unwrap();
    let n = ModuleMatrix::from_content("https://example.com").unwrap().width() as u32;
    for (x0, y0, w, h) in eye_blocks(n) {
        for dy in 0..h {
            for dx in 0..w {
                let p = *canvas.get_pixel(x0 + dx, y0 + dy);
                assert!(p == WHITE || p == BLUE, "unexpected pixel {p:?}");
            }
        }
    }
}

#[test]
fn test_timing_modules_beside_eyes_use_data_paint() {
    // The eye/data frontier sits between columns n-9 and n-8 (rows likewise
    // for the bottom-left block). The dark timing modules at (6, n-9) and
    // (n-9, 6) hug the far eyes and must take the data paint.
    let red = Rgba([200, 0, 0, 255]);
    let style = QrStyle { foreground: red, eye_color: BLUE, ..QrStyle::default() };
    let canvas = render("OK", &style).unwrap();
    let matrix = ModuleMatrix::from_content("OK").unwrap();
    let n = matrix.width();

    assert_eq!(classify(6, n - 9, n, None), ModuleClass::Data);
    assert_eq!(classify(6, n - 8, n, None), ModuleClass::Eye);
    assert_eq!(classify(n - 9, 6, n, None), ModuleClass::Data);
    assert_eq!(classify(n - 8, 6, n, None), ModuleClass::Eye);
    assert_eq!(classify(6, 8, n, None), ModuleClass::Eye);
    assert_eq!(classify(6, 9, n, None), ModuleClass::Data);

    for (row, col) in [(6, n - 9), (n - 9, 6)] {
        assert!(matrix.is_dark(row, col), "module ({row}, {col})");
        let x = MARGIN + col as u32 * CELL_SIZE + CELL_SIZE / 2;
        let y = MARGIN + row as u32 * CELL_SIZE + CELL_SIZE / 2;
        assert_eq!(*canvas.get_pixel(x, y), red, "module ({row}, {col})");
    }
}

#[test]
fn test_logo_exclusion_classifier_sampling() {
    // Pseudo-random in-disk coordinates must classify as logo-excluded
    // unless they fall in an eye block.
    let n = 29usize;
    let radius = logo_exclusion_radius(n, 30.0);
    let center = n as f32 / 2.0;
    let mut seed = 0x2545f491u32;
    let mut sampled = 0;
    while sampled < 64 {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        let row = (seed >> 16) as usize % n;
        let col = (seed >> 4) as usize % n;
        let dr = row as f32 - center;
        let dc = col as f32 - center;
        if (dr * dr + dc * dc).sqrt() >= radius {
            continue;
        }
        sampled += 1;
        let class = classify(row, col, n, Some(radius));
        let eye = classify(row, col, n, None) == ModuleClass::Eye;
        assert_eq!(class, if eye { ModuleClass::Eye } else { ModuleClass::LogoExcluded });
    }
}

#[test]
fn test_logo_affects_only_the_plate_region() {
    // Module painting is independent of the logo outside the plate square:
    // a render with and without the logo differs only inside the plate.
    let content = "https://example.com/long-enough-content-for-version-3";
    let style = QrStyle {
        foreground: Rgba([200, 0, 0, 255]),
        ..QrStyle::default()
    };
    let with_logo = render(
        content,
        &QrStyle {
            logo: Some(Logo { image_bytes: tiny_png(), size_percent: 24.0, margin_percent: 0.0 }),
            ..style.clone()
        },
    )
    .unwrap();
    let without_logo = render(content, &style).unwrap();

    let canvas_size = with_logo.width();
    let plate = (canvas_size as f32 * 24.0 / 100.0).round() as u32;
    let plate_origin = (canvas_size - plate) / 2;
    let plate_range = plate_origin..plate_origin + plate;

    let mut differs_inside = false;
    for y in 0..canvas_size {
        for x in 0..canvas_size {
            let in_plate = plate_range.contains(&x) && plate_range.contains(&y);
            if in_plate {
                differs_inside |= with_logo.get_pixel(x, y) != without_logo.get_pixel(x, y);
            } else {
                assert_eq!(
                    with_logo.get_pixel(x, y),
                    without_logo.get_pixel(x, y),
                    "pixel ({x}, {y}) outside the plate"
                );
            }
        }
    }
    assert!(differs_inside);
}

#[test]
fn test_eye_style_applies_to_eyes() {
    // Circle eyes leave the cell corners unpainted; square data modules
    // don't. Corners of dark eye modules must show background.
    let style = QrStyle {
        eye_style: EyeStyle::Circle,
        eye_color: BLUE,
        ..QrStyle::default()
    };
    let canvas = render("OK", &style).unwrap();
    let matrix = ModuleMatrix::from_content("OK").unwrap();
    // Module (0, 0) is the dark outer ring corner of the top-left finder.
    assert!(matrix.is_dark(0, 0));
    let corner = *canvas.get_pixel(MARGIN, MARGIN);
    assert_eq!(corner, WHITE);
    let center = *canvas.get_pixel(MARGIN + CELL_SIZE / 2, MARGIN + CELL_SIZE / 2);
    assert_eq!(center, BLUE);
}
