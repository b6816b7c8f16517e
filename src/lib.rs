//! mapview renders a silent preview of a rhythm-game beatmap.
//!
//! A parsed beatmap is prepared once (timing lookup, object index, slider curves, combo
//! colours) and then painted every frame onto two CPU surfaces: the full playfield and a
//! scrolling timeline strip. Time comes from an independent [`Clock`]; the audio transport is
//! only reconciled against it.
//!
//! - Load a [`BeatmapMetadata`] from JSON
//! - Create a [`PreviewSession`] with an [`AudioTransport`] and a [`TimeSource`]
//! - Drive it from a [`FrameHost`] through a [`PreviewLoop`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod beatmap;
pub(crate) mod clock;
pub(crate) mod config;
pub(crate) mod curve;
pub(crate) mod objects;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod timing;
pub(crate) mod visibility;

pub use crate::foundation::core::{
    Affine, BezPath, DEFAULT_COMBO_COLOURS, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, Point, Rect,
    Rgba8, SurfaceSize, Vec2,
};
pub use crate::foundation::error::{PreviewError, PreviewResult};

pub use crate::beatmap::combo::{ComboAssignment, assign_combos, combo_colour};
pub use crate::beatmap::model::{
    BeatmapMetadata, CurveDescriptor, CurveKind, DifficultyPoint, HitObject, HitObjectKind,
    PathSamples, TimingPoint,
};
pub use crate::beatmap::prepared::PreparedBeatmap;
pub use crate::clock::playback::Clock;
pub use crate::clock::source::{ManualSource, MonotonicSource, TimeSource};
pub use crate::config::PreviewConfig;
pub use crate::curve::path::{DEFAULT_BEZIER_RESOLUTION, FollowSample, SliderPath};
pub use crate::objects::index::{
    Event, EventKind, IndexDiagnostics, ObjectIndex, first_at_least, first_greater,
};
pub use crate::render::playfield::PlayfieldRenderer;
pub use crate::render::surface::Surface;
pub use crate::render::timeline::{MAX_GRIDLINES, TimelineRenderer, snap_denominator};
pub use crate::render::{FrameRGBA, FrameStats, ViewToggles};
pub use crate::session::host::{FrameHandle, FrameHost, ManualFrameHost};
pub use crate::session::preview::{
    FrameOutcome, PreviewEvent, PreviewLoop, PreviewSession, Readouts,
};
pub use crate::session::telemetry::FrameTelemetry;
pub use crate::session::transport::{AudioTransport, SilentTransport};
pub use crate::timing::model::{DEFAULT_VELOCITY, TimingModel};
pub use crate::timing::ticks::slider_tick_times;
pub use crate::visibility::window::{
    APPROACH_SCALE, HIT_BURST_MS, HIT_BURST_SCALE, HIT_FADE_MS, VisibilityWindow, circle_radius,
    fade_in_ms, preempt_ms,
};
