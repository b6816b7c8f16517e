use crate::foundation::error::{PreviewError, PreviewResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Width of the osu! playfield in osu!pixels.
pub const PLAYFIELD_WIDTH: f64 = 512.0;
/// Height of the osu! playfield in osu!pixels.
pub const PLAYFIELD_HEIGHT: f64 = 384.0;

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque colour from three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour from four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale alpha by `alpha` (clamped to `[0, 1]`, NaN treated as 0).
    pub fn with_alpha_mul(self, alpha: f64) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            a: ((f64::from(self.a) * alpha).round()) as u8,
            ..self
        }
    }

    /// Mix each channel toward black by `amount` in `[0, 1]`.
    pub fn darken(self, amount: f64) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        let ch = |c: u8| (f64::from(c) * k).round() as u8;
        Self {
            r: ch(self.r),
            g: ch(self.g),
            b: ch(self.b),
            a: self.a,
        }
    }
}

impl From<[u8; 3]> for Rgba8 {
    fn from(v: [u8; 3]) -> Self {
        Self::rgb(v[0], v[1], v[2])
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(v: [u8; 4]) -> Self {
        Self::rgba(v[0], v[1], v[2], v[3])
    }
}

/// Combo colours used when a beatmap does not declare its own.
pub const DEFAULT_COMBO_COLOURS: [Rgba8; 4] = [
    Rgba8::rgb(255, 192, 0),
    Rgba8::rgb(0, 202, 0),
    Rgba8::rgb(18, 124, 255),
    Rgba8::rgb(242, 24, 57),
];

/// Pixel dimensions of a raster target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Validated size; both sides must be in `1..=u16::MAX`.
    pub fn new(width: u32, height: u32) -> PreviewResult<Self> {
        if width == 0 || height == 0 {
            return Err(PreviewError::validation("surface width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(PreviewError::validation("surface width/height exceeds u16"));
        }
        Ok(Self { width, height })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
