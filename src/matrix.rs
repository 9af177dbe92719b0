use qrcode::{EcLevel, QrCode};

use crate::error::{RenderError, RenderResult};

// Module matrix
//------------------------------------------------------------------------------

/// Square boolean module grid for one QR symbol.
///
/// The grid is always built at error correction level H. Shaped modules and
/// logo overlays both eat into the readability margin, and the ~30% recovery
/// capacity of level H is what makes the styled output scannable at all.
#[derive(Debug, Clone)]
pub struct ModuleMatrix {
    n: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    pub fn from_content(content: &str) -> RenderResult<Self> {
        if content.is_empty() {
            return Err(RenderError::EmptyContent);
        }
        let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::H)?;
        let n = code.width();
        let dark = code
            .to_colors()
            .iter()
            .map(|c| *c == qrcode::Color::Dark)
            .collect();
        Ok(Self { n, dark })
    }

    /// Number of modules per side. Odd, and equal to 4 * version + 17.
    pub fn width(&self) -> usize {
        self.n
    }

    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.n && c < self.n, "module coordinate out of range");
        self.dark[r * self.n + c]
    }
}

#[cfg(test)]
mod matrix_tests {
    use super::*;

    #[test]
    fn test_version_1_width() {
        let matrix = ModuleMatrix::from_content("OK").unwrap();
        assert_eq!(matrix.width(), 21);
    }

    #[test]
    fn test_width_formula() {
        let matrix = ModuleMatrix::from_content(&"A".repeat(50)).unwrap();
        let n = matrix.width();
        assert_eq!(n % 2, 1);
        assert_eq!((n - 17) % 4, 0);
    }

    #[test]
    fn test_finder_center_is_dark() {
        // Center of the top-left finder pattern is dark in every symbol.
        let matrix = ModuleMatrix::from_content("https://example.com").unwrap();
        assert!(matrix.is_dark(3, 3));
    }

    #[test]
    fn test_empty_content_rejected() {
        assert!(matches!(
            ModuleMatrix::from_content(""),
            Err(RenderError::EmptyContent)
        ));
    }
}
