use std::path::Path;

use crate::curve::path::DEFAULT_BEZIER_RESOLUTION;
use crate::foundation::core::{Rgba8, SurfaceSize};
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::visibility::window::{APPROACH_SCALE, HIT_FADE_MS};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Preview configuration; every field has a default.
pub struct PreviewConfig {
    /// Playfield surface width in CSS pixels.
    pub playfield_width: u32,
    /// Playfield surface height in CSS pixels.
    pub playfield_height: u32,
    /// Timeline strip width in CSS pixels.
    pub timeline_width: u32,
    /// Timeline strip height in CSS pixels.
    pub timeline_height: u32,
    /// Device pixel ratio applied to both surfaces.
    pub device_pixel_ratio: f64,
    pub hit_fade_ms: f64,
    pub approach_scale: f64,
    /// Bézier samples per curve piece.
    pub bezier_resolution: usize,
    /// Timeline zoom; 1.0 shows `timeline_base_span_ms` across the strip.
    pub timeline_zoom: f64,
    pub timeline_base_span_ms: f64,
    /// Beat-snap divisor for timeline gridlines.
    pub snap_divisor: u32,
    /// Extra time on each side of the timeline's visible query.
    pub timeline_margin_ms: f64,
    /// Draw the playfield grid.
    pub show_grid: bool,
    /// Transport drift beyond this is corrected from the clock.
    pub reconcile_threshold_ms: f64,
    pub playfield_background: Rgba8,
    pub timeline_background: Rgba8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            playfield_width: 640,
            playfield_height: 480,
            timeline_width: 640,
            timeline_height: 64,
            device_pixel_ratio: 1.0,
            hit_fade_ms: HIT_FADE_MS,
            approach_scale: APPROACH_SCALE,
            bezier_resolution: DEFAULT_BEZIER_RESOLUTION,
            timeline_zoom: 1.0,
            timeline_base_span_ms: 4000.0,
            snap_divisor: 4,
            timeline_margin_ms: 500.0,
            show_grid: false,
            reconcile_threshold_ms: 80.0,
            playfield_background: Rgba8::rgb(16, 16, 24),
            timeline_background: Rgba8::rgb(24, 24, 32),
        }
    }
}

impl PreviewConfig {
    /// Load from a JSON file, apply `MAPVIEW_*` overrides and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> PreviewResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PreviewError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        let mut cfg: Self = serde_json::from_str(&text)?;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Unparseable values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            match raw.trim().parse::<T>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "ignoring unparseable override");
                    None
                }
            }
        }

        if let Some(v) = parsed(&lookup, "MAPVIEW_DPR") {
            self.device_pixel_ratio = v;
        }
        if let Some(v) = parsed(&lookup, "MAPVIEW_BEZIER_RESOLUTION") {
            self.bezier_resolution = v;
        }
        if let Some(v) = parsed(&lookup, "MAPVIEW_SNAP_DIVISOR") {
            self.snap_divisor = v;
        }
        if let Some(v) = parsed(&lookup, "MAPVIEW_TIMELINE_ZOOM") {
            self.timeline_zoom = v;
        }
        if let Some(v) = parsed(&lookup, "MAPVIEW_SHOW_GRID") {
            self.show_grid = v;
        }
        if let Some(v) = parsed(&lookup, "MAPVIEW_RECONCILE_THRESHOLD_MS") {
            self.reconcile_threshold_ms = v;
        }
    }

    pub fn validate(&self) -> PreviewResult<()> {
        self.playfield_size()?;
        self.timeline_size()?;
        if !self.device_pixel_ratio.is_finite()
            || self.device_pixel_ratio <= 0.0
            || self.device_pixel_ratio > 8.0
        {
            return Err(PreviewError::validation(
                "device_pixel_ratio must be in (0, 8]",
            ));
        }
        if !self.hit_fade_ms.is_finite() || self.hit_fade_ms < 0.0 {
            return Err(PreviewError::validation("hit_fade_ms must be >= 0"));
        }
        if !self.approach_scale.is_finite() || self.approach_scale < 0.0 {
            return Err(PreviewError::validation("approach_scale must be >= 0"));
        }
        if !(1..=1024).contains(&self.bezier_resolution) {
            return Err(PreviewError::validation(
                "bezier_resolution must be in [1, 1024]",
            ));
        }
        if !self.timeline_zoom.is_finite() || self.timeline_zoom <= 0.0 {
            return Err(PreviewError::validation("timeline_zoom must be > 0"));
        }
        if !self.timeline_base_span_ms.is_finite() || self.timeline_base_span_ms <= 0.0 {
            return Err(PreviewError::validation(
                "timeline_base_span_ms must be > 0",
            ));
        }
        if !(1..=64).contains(&self.snap_divisor) {
            return Err(PreviewError::validation("snap_divisor must be in [1, 64]"));
        }
        if !self.timeline_margin_ms.is_finite() || self.timeline_margin_ms < 0.0 {
            return Err(PreviewError::validation("timeline_margin_ms must be >= 0"));
        }
        if !self.reconcile_threshold_ms.is_finite() || self.reconcile_threshold_ms < 0.0 {
            return Err(PreviewError::validation(
                "reconcile_threshold_ms must be >= 0",
            ));
        }
        Ok(())
    }

    /// Playfield surface size in device pixels.
    pub fn playfield_size(&self) -> PreviewResult<SurfaceSize> {
        device_size(
            self.playfield_width,
            self.playfield_height,
            self.device_pixel_ratio,
        )
    }

    /// Timeline surface size in device pixels.
    pub fn timeline_size(&self) -> PreviewResult<SurfaceSize> {
        device_size(
            self.timeline_width,
            self.timeline_height,
            self.device_pixel_ratio,
        )
    }

    /// Time span shown across the timeline strip.
    pub fn timeline_span_ms(&self) -> f64 {
        self.timeline_base_span_ms / self.timeline_zoom
    }
}

fn device_size(width: u32, height: u32, dpr: f64) -> PreviewResult<SurfaceSize> {
    let scale = |v: u32| -> PreviewResult<u32> {
        let px = (f64::from(v) * dpr).round();
        if !px.is_finite() || px < 1.0 || px > f64::from(u16::MAX) {
            return Err(PreviewError::validation(format!(
                "surface dimension {v} at ratio {dpr} is out of range"
            )));
        }
        Ok(px as u32)
    };
    SurfaceSize::new(scale(width)?, scale(height)?)
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
