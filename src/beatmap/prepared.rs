use crate::beatmap::combo::{ComboAssignment, assign_combos, combo_colour};
use crate::beatmap::model::{BeatmapMetadata, HitObject};
use crate::config::PreviewConfig;
use crate::curve::path::SliderPath;
use crate::foundation::core::Rgba8;
use crate::foundation::error::PreviewResult;
use crate::foundation::math::EPSILON;
use crate::objects::index::{IndexDiagnostics, ObjectIndex};
use crate::timing::model::TimingModel;
use crate::timing::ticks::slider_tick_times;
use crate::visibility::window::{VisibilityWindow, circle_radius};

/// Everything derived once per beatmap load.
///
/// Slider end times and tick times missing from the input are resolved from the timing
/// model here, so renderers only ever read.
#[derive(Clone, Debug)]
pub struct PreparedBeatmap {
    meta: BeatmapMetadata,
    timing: TimingModel,
    index: ObjectIndex,
    combos: Vec<ComboAssignment>,
    paths: Vec<Option<SliderPath>>,
    window: VisibilityWindow,
    radius: f64,
    markers: usize,
}

impl PreparedBeatmap {
    #[tracing::instrument(skip(meta, config), fields(title = %meta.title, objects = meta.hit_objects.len()))]
    pub fn prepare(mut meta: BeatmapMetadata, config: &PreviewConfig) -> PreviewResult<Self> {
        meta.validate()?;
        config.validate()?;
        let timing = TimingModel::from_beatmap(&meta);
        let slider_multiplier = meta.slider_multiplier;
        let tick_rate = meta.slider_tick_rate;

        let mut paths = Vec::with_capacity(meta.hit_objects.len());
        let mut markers = 0usize;
        for obj in &mut meta.hit_objects {
            let repaired = sanitize_object(obj);
            if !obj.is_slider() {
                paths.push(None);
                continue;
            }
            let path = if repaired {
                markers += 1;
                None
            } else {
                match SliderPath::from_object(obj, config.bezier_resolution) {
                    Ok(path) => Some(path),
                    Err(e) => {
                        markers += 1;
                        tracing::warn!(object = obj.index, error = %e, "slider will be drawn as a marker");
                        None
                    }
                }
            };
            resolve_slider(obj, path.as_ref(), &timing, slider_multiplier, tick_rate);
            paths.push(path);
        }

        let index = ObjectIndex::build(&meta.hit_objects);
        let combos = assign_combos(&meta.hit_objects);
        let window = VisibilityWindow::new(meta.approach_rate)
            .with_hit_fade(config.hit_fade_ms)
            .with_approach_scale(config.approach_scale);
        let radius = circle_radius(meta.circle_size);

        let diag = index.diagnostics();
        tracing::info!(
            objects = diag.objects,
            ticks = diag.ticks,
            repeats = diag.repeats,
            markers,
            "beatmap prepared"
        );

        Ok(Self {
            meta,
            timing,
            index,
            combos,
            paths,
            window,
            radius,
            markers,
        })
    }

    /// Sliders that will be drawn as markers because their data could not be used.
    pub fn markers(&self) -> usize {
        self.markers
    }

    /// Metadata with resolved slider end and tick times.
    pub fn metadata(&self) -> &BeatmapMetadata {
        &self.meta
    }

    pub fn objects(&self) -> &[HitObject] {
        &self.meta.hit_objects
    }

    pub fn timing(&self) -> &TimingModel {
        &self.timing
    }

    pub fn index(&self) -> &ObjectIndex {
        &self.index
    }

    pub fn combos(&self) -> &[ComboAssignment] {
        &self.combos
    }

    /// Curve of object `i`; `None` for non-sliders and sliders whose curve failed to build.
    pub fn path(&self, i: usize) -> Option<&SliderPath> {
        self.paths.get(i).and_then(Option::as_ref)
    }

    pub fn window(&self) -> &VisibilityWindow {
        &self.window
    }

    /// Hit circle radius in osu!pixels.
    pub fn circle_radius(&self) -> f64 {
        self.radius
    }

    /// Resolved combo colour of object `i`.
    pub fn combo_colour(&self, i: usize) -> Rgba8 {
        let assignment = self.combos.get(i).copied().unwrap_or(ComboAssignment {
            colour_index: 0,
            number: 1,
        });
        combo_colour(&self.meta.combo_colours, assignment)
    }

    /// Length of the preview: the audio duration when known, else the end of the last
    /// object's fade.
    pub fn duration_ms(&self) -> f64 {
        match self.meta.audio_duration_ms {
            Some(d) if d.is_finite() && d > 0.0 => d.max(self.meta.content_end_ms()),
            _ => self.meta.content_end_ms() + self.window.hit_fade(),
        }
    }

    pub fn diagnostics(&self) -> IndexDiagnostics {
        self.index.diagnostics()
    }
}

/// Repair per-object data the renderers cannot use. Returns true when a slider lost
/// information it needs for its path and should be drawn as a marker.
fn sanitize_object(obj: &mut HitObject) -> bool {
    if let Some(end) = obj.end_time
        && end < obj.start_time
    {
        tracing::warn!(object = obj.index, end, start = obj.start_time, "end_time before start_time, clamped");
        obj.end_time = Some(obj.start_time);
    }
    let mut broken = false;
    if obj.slides == 0 {
        if obj.is_slider() {
            tracing::warn!(object = obj.index, "slider has zero slides");
            broken = true;
        }
        obj.slides = 1;
    }
    if !obj.length.is_finite() || obj.length < 0.0 {
        if obj.is_slider() {
            tracing::warn!(object = obj.index, length = obj.length, "slider length is unusable");
            broken = true;
        }
        obj.length = 0.0;
    }
    broken
}

fn resolve_slider(
    obj: &mut HitObject,
    path: Option<&SliderPath>,
    timing: &TimingModel,
    slider_multiplier: f64,
    tick_rate: f64,
) {
    if obj.length <= EPSILON
        && let Some(path) = path
    {
        obj.length = path.length();
    }
    if obj.end_time.is_none() {
        let duration = timing
            .slider_duration_ms(obj.length, obj.span_count(), obj.start_time, slider_multiplier)
            .unwrap_or(0.0);
        obj.end_time = Some(obj.start_time + duration);
    }
    if obj.ticks.is_empty() {
        obj.ticks = slider_tick_times(obj, timing, slider_multiplier, tick_rate);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/beatmap/prepared.rs"]
mod tests;
