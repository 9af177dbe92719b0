// Module classifier
//------------------------------------------------------------------------------

/// Render class of a single module. Eyes are structural and win over logo
/// exclusion unconditionally; data modules inside the logo disk are skipped
/// so nothing is painted under the plate.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ModuleClass {
    Eye,
    LogoExcluded,
    Data,
}

/// Radius of the logo exclusion disk in module units.
///
/// `size_percent` spans the full matrix, so half of it is the radius. The
/// plate itself is square; the circular test deliberately under-covers the
/// plate corners, which level H error correction absorbs.
pub fn logo_exclusion_radius(n: usize, size_percent: f32) -> f32 {
    n as f32 * size_percent / 200.0
}

pub fn classify(row: usize, col: usize, n: usize, logo_radius: Option<f32>) -> ModuleClass {
    if is_eye(row, col, n) {
        return ModuleClass::Eye;
    }
    if let Some(radius) = logo_radius {
        let center = n as f32 / 2.0;
        let dr = row as f32 - center;
        let dc = col as f32 - center;
        if (dr * dr + dc * dc).sqrt() < radius {
            return ModuleClass::LogoExcluded;
        }
    }
    ModuleClass::Data
}

/// A module is eye-class iff it falls in a 9x9 block anchored at one of the
/// three finder corners. QR symbols have no finder at the bottom-right.
fn is_eye(row: usize, col: usize, n: usize) -> bool {
    (row < 9 && col < 9) || (row < 9 && col >= n - 8) || (row >= n - 8 && col < 9)
}
