use crate::beatmap::model::BeatmapMetadata;
use crate::beatmap::prepared::PreparedBeatmap;
use crate::clock::playback::Clock;
use crate::clock::source::TimeSource;
use crate::config::PreviewConfig;
use crate::foundation::core::SurfaceSize;
use crate::foundation::error::PreviewResult;
use crate::render::playfield::PlayfieldRenderer;
use crate::render::surface::Surface;
use crate::render::timeline::TimelineRenderer;
use crate::render::{FrameRGBA, FrameStats, ViewToggles};
use crate::session::host::{FrameHandle, FrameHost};
use crate::session::telemetry::FrameTelemetry;
use crate::session::transport::AudioTransport;

/// Lifecycle notifications for the embedding application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewEvent {
    /// The first frame has been scheduled.
    Ready,
    /// Playback reached the end of the track.
    Ended,
    /// The loop stopped; no further frames will run.
    TornDown,
}

/// Values for the host's time/BPM/velocity display.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Readouts {
    pub time_ms: f64,
    pub bpm: f64,
    pub velocity: f64,
    pub playing: bool,
    pub rate: f64,
}

/// Result of one painted frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameOutcome {
    /// The single clock sample both views were drawn at.
    pub time_ms: f64,
    pub playfield: FrameStats,
    pub timeline: FrameStats,
    /// Playback ran off the end during this frame.
    pub ended: bool,
    /// The transport position was corrected to the clock.
    pub reconciled: bool,
}

/// One loaded beatmap with its clock, transport and both render targets.
pub struct PreviewSession<T: AudioTransport, S: TimeSource> {
    beatmap: PreparedBeatmap,
    clock: Clock<S>,
    transport: T,
    playfield: Surface,
    timeline: Surface,
    playfield_renderer: PlayfieldRenderer,
    timeline_renderer: TimelineRenderer,
    toggles: ViewToggles,
    telemetry: FrameTelemetry,
    reconcile_threshold_ms: f64,
}

impl<T: AudioTransport, S: TimeSource> std::fmt::Debug for PreviewSession<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSession")
            .field("title", &self.beatmap.metadata().title)
            .field("time_ms", &self.clock.current_ms())
            .field("playing", &self.clock.is_playing())
            .field("toggles", &self.toggles)
            .finish_non_exhaustive()
    }
}

impl<T: AudioTransport, S: TimeSource> PreviewSession<T, S> {
    /// Prepare `meta` and allocate both surfaces. The clock starts paused at 0.
    #[tracing::instrument(skip_all, fields(title = %meta.title))]
    pub fn new(
        meta: BeatmapMetadata,
        config: &PreviewConfig,
        transport: T,
        source: S,
    ) -> PreviewResult<Self> {
        let beatmap = PreparedBeatmap::prepare(meta, config)?;
        let duration = transport
            .duration_ms()
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or_else(|| beatmap.duration_ms());
        let clock = Clock::new(source, duration);
        let playfield = Surface::new(config.playfield_size()?, config.device_pixel_ratio)?;
        let timeline = Surface::new(config.timeline_size()?, config.device_pixel_ratio)?;
        tracing::info!(duration_ms = duration, "preview session ready");

        Ok(Self {
            beatmap,
            clock,
            transport,
            playfield,
            timeline,
            playfield_renderer: PlayfieldRenderer::from_config(config),
            timeline_renderer: TimelineRenderer::from_config(config),
            toggles: ViewToggles::from_config(config),
            telemetry: FrameTelemetry::default(),
            reconcile_threshold_ms: config.reconcile_threshold_ms,
        })
    }

    pub fn beatmap(&self) -> &PreparedBeatmap {
        &self.beatmap
    }

    pub fn clock(&self) -> &Clock<S> {
        &self.clock
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn toggles(&self) -> &ViewToggles {
        &self.toggles
    }

    /// Toggles are read at the next frame.
    pub fn toggles_mut(&mut self) -> &mut ViewToggles {
        &mut self.toggles
    }

    pub fn telemetry(&self) -> &FrameTelemetry {
        &self.telemetry
    }

    pub fn play(&mut self) -> PreviewResult<()> {
        self.clock.play();
        let at = self.clock.current_ms();
        let started = self
            .transport
            .set_position_ms(at)
            .and_then(|()| self.transport.play());
        if let Err(e) = started {
            self.clock.pause();
            return Err(e);
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        self.transport.pause();
    }

    /// Move both the clock and the transport to `ms` (clamped to the track).
    pub fn seek(&mut self, ms: f64) -> PreviewResult<()> {
        self.clock.seek(ms);
        self.transport.set_position_ms(self.clock.current_ms())
    }

    pub fn set_rate(&mut self, rate: f64) -> PreviewResult<()> {
        self.clock.set_rate(rate)?;
        self.transport.set_rate(rate)
    }

    /// Paint both views at a single clock sample.
    pub fn render_frame(&mut self) -> FrameOutcome {
        let started = self.clock.wall_now_ms();
        let was_playing = self.clock.is_playing();
        let t = self.clock.sample();
        let clock_ended = was_playing && !self.clock.is_playing();
        let transport_ended = self.transport.take_ended();
        if clock_ended && self.transport.is_playing() {
            self.transport.pause();
        }

        let playfield = self
            .playfield_renderer
            .render(&mut self.playfield, &self.beatmap, t, &self.toggles);
        let timeline = self
            .timeline_renderer
            .render(&mut self.timeline, &self.beatmap, t, &self.toggles);
        let reconciled = self.reconcile(t);

        self.telemetry.record(started, self.clock.wall_now_ms());
        FrameOutcome {
            time_ms: t,
            playfield,
            timeline,
            ended: clock_ended || transport_ended,
            reconciled,
        }
    }

    /// Write the clock's time to the transport when they drifted apart while playing.
    pub fn reconcile(&mut self, t: f64) -> bool {
        if !self.clock.is_playing() {
            return false;
        }
        let drift = self.transport.position_ms() - t;
        if drift.abs() <= self.reconcile_threshold_ms {
            return false;
        }
        match self.transport.set_position_ms(t) {
            Ok(()) => {
                tracing::debug!(drift_ms = drift, "transport reconciled to clock");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "transport reconciliation failed");
                false
            }
        }
    }

    pub fn readouts(&self) -> Readouts {
        let t = self.clock.current_ms();
        let timing = self.beatmap.timing();
        Readouts {
            time_ms: t,
            bpm: timing.bpm_at(t),
            velocity: timing.velocity_at(t),
            playing: self.clock.is_playing(),
            rate: self.clock.rate(),
        }
    }

    pub fn playfield_surface(&self) -> &Surface {
        &self.playfield
    }

    pub fn timeline_surface(&self) -> &Surface {
        &self.timeline
    }

    pub fn playfield_frame(&self) -> FrameRGBA {
        self.playfield.frame()
    }

    pub fn timeline_frame(&self) -> FrameRGBA {
        self.timeline.frame()
    }

    /// Follow a host resize; takes effect at the next frame.
    pub fn resize_playfield(&mut self, size: SurfaceSize, device_pixel_ratio: f64) -> PreviewResult<()> {
        self.playfield.resize(size, device_pixel_ratio)
    }

    pub fn resize_timeline(&mut self, size: SurfaceSize, device_pixel_ratio: f64) -> PreviewResult<()> {
        self.timeline.resize(size, device_pixel_ratio)
    }
}

/// Owns a session, its scheduled frame and the active guard.
///
/// Each delivered frame re-registers the next one. After [`PreviewLoop::teardown`] the pending
/// callback is cancelled and any frame that still fires is ignored.
pub struct PreviewLoop<H: FrameHost, T: AudioTransport, S: TimeSource> {
    session: Option<PreviewSession<T, S>>,
    host: H,
    pending: Option<FrameHandle>,
    active: bool,
    events: Vec<PreviewEvent>,
}

impl<H: FrameHost, T: AudioTransport, S: TimeSource> PreviewLoop<H, T, S> {
    pub fn new(session: PreviewSession<T, S>, host: H) -> Self {
        Self {
            session: Some(session),
            host,
            pending: None,
            active: false,
            events: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn session(&self) -> Option<&PreviewSession<T, S>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut PreviewSession<T, S>> {
        self.session.as_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The callback currently registered with the host.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Schedule the first frame and signal readiness. Starting twice does nothing.
    pub fn start(&mut self) {
        if self.active || self.session.is_none() {
            return;
        }
        self.active = true;
        self.pending = Some(self.host.request_frame());
        self.events.push(PreviewEvent::Ready);
    }

    /// Host callback. Stale or post-teardown handles are a silent no-op.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Option<FrameOutcome> {
        if !self.active || self.pending != Some(handle) {
            tracing::debug!(handle = handle.0, "ignoring stale frame");
            return None;
        }
        self.pending = None;
        let session = self.session.as_mut()?;
        let outcome = session.render_frame();
        if outcome.ended {
            self.events.push(PreviewEvent::Ended);
        }
        self.pending = Some(self.host.request_frame());
        Some(outcome)
    }

    /// Cancel the pending frame and drop the session.
    pub fn teardown(&mut self) {
        if !self.active && self.session.is_none() {
            return;
        }
        self.active = false;
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        self.session = None;
        self.events.push(PreviewEvent::TornDown);
        tracing::debug!("preview loop torn down");
    }

    pub fn drain_events(&mut self) -> Vec<PreviewEvent> {
        std::mem::take(&mut self.events)
    }
}

impl<H: FrameHost, T: AudioTransport, S: TimeSource> Drop for PreviewLoop<H, T, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview.rs"]
mod tests;
