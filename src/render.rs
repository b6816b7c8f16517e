pub(crate) mod glyphs;
pub(crate) mod painter;
pub(crate) mod playfield;
pub(crate) mod surface;
pub(crate) mod timeline;

use crate::config::PreviewConfig;

#[derive(Clone, Debug)]
/// Read-back pixels of a rendered surface.
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy, as image encoders expect. Fully transparent pixels become zero.
    pub fn unpremultiplied(&self) -> FrameRGBA {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                px.fill(0);
                continue;
            }
            for c in &mut px[..3] {
                let straight = (u16::from(*c) * 255 + a / 2) / a;
                *c = straight.min(255) as u8;
            }
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Transient UI toggles read by the renderers every frame.
pub struct ViewToggles {
    /// Playfield grid overlay.
    pub show_grid: bool,
    /// Timeline zoom factor.
    pub zoom: f64,
    /// Timeline beat-snap divisor.
    pub snap_divisor: u32,
}

impl Default for ViewToggles {
    fn default() -> Self {
        Self {
            show_grid: false,
            zoom: 1.0,
            snap_divisor: 4,
        }
    }
}

impl ViewToggles {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            show_grid: config.show_grid,
            zoom: config.timeline_zoom,
            snap_divisor: config.snap_divisor,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// What a single renderer pass painted.
pub struct FrameStats {
    /// Objects painted normally.
    pub objects_drawn: usize,
    /// Objects painted as a fallback marker because their curve was unusable.
    pub markers: usize,
    /// Objects not painted at all this frame.
    pub skipped: usize,
    /// Follow-point connections painted.
    pub follow_points: usize,
    /// Slider tick dots painted.
    pub ticks: usize,
    /// Slider repeat marks and reverse arrows painted.
    pub repeats: usize,
    /// Timeline gridlines painted.
    pub gridlines: usize,
}

#[cfg(test)]
#[path = "../tests/unit/render/frame.rs"]
mod tests;
