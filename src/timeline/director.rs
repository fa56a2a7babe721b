use std::collections::HashMap;
use std::rc::Rc;

use futures::future::join_all;

use crate::{
    foundation::core::Size,
    foundation::error::{StagecraftError, StagecraftResult},
    foundation::events::ListenerId,
    layout::remap::CanvasLayout,
    performer::{Performer, PositionUpdate},
    surface::RenderSurface,
    surface::snapshot::{SnapshotOptions, capture_snapshot},
    timeline::clock::{TimeController, TimelineEvent},
    timeline::frame::{Clock, FrameRequestId, FrameScheduler, MonotonicClock},
    timeline::stage::{Stage, StageAdd},
    timeline::theater::Theater,
};

/// Zero-argument time source that overrides wall-clock accumulation in the tick loop.
pub type ExternalClock = Box<dyn Fn() -> f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShowState {
    Unplayed,
    Playing,
    Paused,
}

/// What a [`Director::seek`] (or [`Director::flush_loads`]) settled.
///
/// Performer seeks are isolated: one failing performer never hides the others.
#[derive(Debug)]
pub struct SeekOutcome {
    /// Project time the performers were sought to.
    pub time: f64,
    /// Performers whose seek resolved.
    pub seeked: Vec<String>,
    /// Performers whose seek failed, with the error.
    pub failed: Vec<(String, StagecraftError)>,
}

impl SeekOutcome {
    /// True when no performer seek failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Whether a performer spanning `[start, end)` shows at `current`.
///
/// Half-open, except exactly at the end of a non-empty project where the window becomes
/// `[start, end]` so the last frame is not empty.
pub fn in_show_time(start: f64, end: f64, current: f64, duration: f64) -> bool {
    if duration > 0.0 && current == duration {
        start <= current && current <= end
    } else {
        start <= current && current < end
    }
}

/// [`in_show_time`] for a performer.
pub fn check_performer_in_show_time(performer: &dyn Performer, current: f64, duration: f64) -> bool {
    in_show_time(performer.start(), performer.end(), current, duration)
}

/// Maps the project clock to stage membership and per-performer playback calls.
///
/// The director owns the roster ([`Theater`]), the visible set ([`Stage`]), the clock
/// ([`TimeController`]) and the canvas layout baseline. Playback is a frame loop: every
/// granted [`FrameScheduler`] request is answered by the host calling
/// [`Director::on_frame`], which runs one tick and asks for the next frame until the end of
/// the project.
pub struct Director {
    theater: Theater,
    stage: Stage,
    timeline: TimeController,
    layout: Rc<CanvasLayout>,
    scheduler: Box<dyn FrameScheduler>,
    clock: Box<dyn Clock>,
    external_clock: Option<ExternalClock>,
    pending_frame: Option<FrameRequestId>,
    last_tick_ms: f64,
    show_states: HashMap<String, ShowState>,
    position_listeners: HashMap<String, ListenerId>,
    deferred_seeks: Vec<String>,
}

impl std::fmt::Debug for Director {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Director")
            .field("theater", &self.theater)
            .field("stage", &self.stage)
            .field("timeline", &self.timeline)
            .field("pending_frame", &self.pending_frame)
            .finish_non_exhaustive()
    }
}

impl Director {
    /// Director drawing into `surface`, ticking on frames granted by `scheduler`.
    pub fn new(surface: Box<dyn RenderSurface>, scheduler: Box<dyn FrameScheduler>) -> Self {
        let layout = Rc::new(CanvasLayout::new(surface.size()));
        Self {
            theater: Theater::new(),
            stage: Stage::new(surface),
            timeline: TimeController::new(),
            layout,
            scheduler,
            clock: Box::new(MonotonicClock::default()),
            external_clock: None,
            pending_frame: None,
            last_tick_ms: 0.0,
            show_states: HashMap::new(),
            position_listeners: HashMap::new(),
            deferred_seeks: Vec::new(),
        }
    }

    /// Replace the wall clock used to measure elapsed time between ticks.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Read playback time from `clock` instead of accumulating wall-clock deltas.
    pub fn set_external_clock(&mut self, clock: Option<ExternalClock>) {
        self.external_clock = clock;
    }

    /// Resolves once the render surface is usable.
    pub async fn ready(&self) -> StagecraftResult<()> {
        self.stage.ready().await
    }

    /// Add `performer` to the roster.
    ///
    /// Grows the duration to cover the performer. If its window contains the current time it
    /// is staged right away and sought to its local time; a performer that is still loading
    /// is shown once its load completes.
    #[tracing::instrument(skip_all)]
    pub async fn hire(&mut self, performer: Box<dyn Performer>) -> StagecraftResult<()> {
        let id = performer.id().to_owned();
        let end = performer.end();
        self.theater.hire(performer)?;
        tracing::debug!(%id, end, "hired");

        if let Some(performer) = self.theater.get(&id) {
            let layout = Rc::clone(&self.layout);
            let listener = performer
                .position_updates()
                .on(Rc::new(move |u: &PositionUpdate| layout.on_position_update(u)));
            self.position_listeners.insert(id.clone(), listener);
        }
        self.show_states.insert(id.clone(), ShowState::Unplayed);
        self.timeline.grow_duration(end);

        let now = self.timeline.current_time();
        let duration = self.timeline.duration();
        let Some(performer) = self.theater.get_mut(&id) else {
            return Ok(());
        };
        if !check_performer_in_show_time(performer, now, duration) {
            return Ok(());
        }
        if self.stage.add(performer) == StageAdd::Attached {
            let local = now - performer.start();
            if let Err(err) = performer.seek(local).await {
                tracing::warn!(%id, error = %err, "seek after hire failed");
            }
        }
        Ok(())
    }

    /// Remove `id` from the stage, the roster and the layout baseline.
    ///
    /// The duration is left alone; call [`Director::recompute_duration`] to shrink it.
    pub fn fire(&mut self, id: &str) -> Option<Box<dyn Performer>> {
        let now = self.timeline.current_time();
        let mut performer = self.theater.fire(id)?;
        if self.stage.contains(id) && self.show_states.get(id) == Some(&ShowState::Playing) {
            performer.pause(now - performer.start());
        }
        self.stage.forget(id);
        if let Some(listener) = self.position_listeners.remove(id) {
            performer.position_updates().off(listener);
        }
        self.layout.forget(id);
        self.show_states.remove(id);
        self.deferred_seeks.retain(|d| d != id);
        tracing::debug!(%id, "fired");
        Some(performer)
    }

    /// Start the tick loop. No-op while playing; rewinds to 0 when sitting on the end.
    pub fn play(&mut self) {
        if self.timeline.is_playing() {
            return;
        }
        if self.timeline.is_at_end() {
            self.timeline.set_time(0.0);
        }
        self.timeline.set_playing(true);
        self.last_tick_ms = self.clock.now_ms();
        tracing::debug!(time = self.timeline.current_time(), "play");
        self.tick();
    }

    /// Stop the tick loop and pause every staged performer. No-op while stopped.
    pub fn pause(&mut self) {
        if !self.timeline.is_playing() {
            return;
        }
        self.cancel_frame();
        self.timeline.set_playing(false);
        self.pause_staged();
        tracing::debug!(time = self.timeline.current_time(), "pause");
    }

    /// Jump to `time_ms` (clamped to the duration) and wait until every visible performer
    /// has settled on its frame.
    ///
    /// Stops playback. Every staged performer is removed and re-evaluated, so only
    /// performers whose window contains the new time end up on stage.
    #[tracing::instrument(skip(self))]
    pub async fn seek(&mut self, time_ms: f64) -> StagecraftResult<SeekOutcome> {
        if !time_ms.is_finite() {
            return Err(StagecraftError::validation(format!(
                "cannot seek to {time_ms}"
            )));
        }
        self.cancel_frame();
        self.timeline.set_playing(false);
        self.deferred_seeks.clear();
        self.unstage_all();

        self.timeline.set_time(time_ms);
        let time = self.timeline.current_time();
        let targets = self.stage_for_seek(time);
        let outcome = self.seek_all(&targets, time).await;
        if !outcome.is_clean() {
            tracing::warn!(failed = outcome.failed.len(), "seek settled with failures");
        }
        Ok(outcome)
    }

    /// Answer a frame request granted by the scheduler.
    pub fn on_frame(&mut self) {
        self.pending_frame = None;
        if self.timeline.is_playing() {
            self.tick();
        }
    }

    /// Show performers whose loads already completed, without blocking.
    ///
    /// While playing they start playing right away; while stopped they are attached and
    /// their seek is deferred to [`Director::flush_loads`]. Returns the loaded ids.
    pub fn poll_loads(&mut self) -> Vec<String> {
        let loaded = self.stage.poll_loaded();
        for id in &loaded {
            self.show_loaded(id);
        }
        loaded
    }

    /// Wait for every pending load, show what is in its window and seek it into place.
    pub async fn flush_loads(&mut self) -> SeekOutcome {
        let loaded = self.stage.settle_loads().await;
        for id in &loaded {
            self.show_loaded(id);
        }
        let ids = std::mem::take(&mut self.deferred_seeks);
        let time = self.timeline.current_time();
        self.seek_all(&ids, time).await
    }

    /// Set the duration to the roster's latest end, shrinking or growing it.
    pub fn recompute_duration(&mut self) -> f64 {
        self.timeline.set_duration(self.theater.max_end());
        self.timeline.duration()
    }

    /// Override the duration. The current time is pulled back inside the new range.
    pub fn set_duration(&mut self, duration_ms: f64) {
        self.timeline.set_duration(duration_ms);
    }

    /// Resize the canvas, remapping performers proportionally when `adapt` is set.
    #[tracing::instrument(skip(self))]
    pub fn resize_canvas(&mut self, next: Size, adapt: bool) -> StagecraftResult<()> {
        self.layout
            .resize_canvas(self.stage.surface_mut(), &mut self.theater, next, adapt)
    }

    /// Capture the current frame as a data URL.
    pub fn snapshot(&mut self, opts: &SnapshotOptions) -> StagecraftResult<String> {
        capture_snapshot(self.stage.surface_mut(), opts)
    }

    /// Current playback time in ms.
    pub fn current_time(&self) -> f64 {
        self.timeline.current_time()
    }

    /// Project duration in ms.
    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    /// Whether the tick loop is running.
    pub fn is_playing(&self) -> bool {
        self.timeline.is_playing()
    }

    /// Whether a frame request is outstanding.
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Staged performer ids in attach order.
    pub fn visible_ids(&self) -> Vec<String> {
        self.stage.visible().to_vec()
    }

    /// Roster.
    pub fn theater(&self) -> &Theater {
        &self.theater
    }

    /// Visible set.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Clock state and its events.
    pub fn timeline(&self) -> &TimeController {
        &self.timeline
    }

    /// Canvas layout baseline.
    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Performer by id.
    pub fn performer(&self, id: &str) -> Option<&dyn Performer> {
        self.theater.get(id)
    }

    /// Mutable performer by id, for edits through its setters.
    pub fn performer_mut(&mut self, id: &str) -> Option<&mut (dyn Performer + 'static)> {
        self.theater.get_mut(id)
    }

    fn tick(&mut self) {
        self.poll_loads();
        let now = self.timeline.current_time();
        self.update_performers(now);

        let wall = self.clock.now_ms();
        let elapsed = (wall - self.last_tick_ms).max(0.0);
        self.last_tick_ms = wall;
        let next = match &self.external_clock {
            Some(external) => external(),
            None => now + elapsed,
        };
        self.timeline.set_time(next);

        let duration = self.timeline.duration();
        if self.timeline.current_time() >= duration {
            self.update_performers(duration);
            self.cancel_frame();
            self.timeline.set_playing(false);
            self.pause_staged();
            self.timeline.events().emit(&TimelineEvent::Ended);
            tracing::debug!(duration, "playback ended");
        } else {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
    }

    /// Roster ids ordered by ascending z-index, hire order within a z bucket.
    fn z_ordered_ids(&self) -> Vec<String> {
        let mut entries: Vec<(i32, String)> = self
            .theater
            .iter()
            .map(|p| (p.z_index(), p.id().to_owned()))
            .collect();
        entries.sort_by_key(|(z, _)| *z);
        entries.into_iter().map(|(_, id)| id).collect()
    }

    fn update_performers(&mut self, time: f64) {
        let duration = self.timeline.duration();
        for id in self.z_ordered_ids() {
            let Some(performer) = self.theater.get_mut(&id) else {
                continue;
            };
            let local = time - performer.start();
            let on_stage = self.stage.contains(&id);
            let state = self
                .show_states
                .entry(id.clone())
                .or_insert(ShowState::Unplayed);

            if check_performer_in_show_time(performer, time, duration) {
                if on_stage {
                    if *state == ShowState::Playing {
                        performer.update(local);
                    } else {
                        performer.play(local);
                        *state = ShowState::Playing;
                    }
                } else if self.stage.add(performer) == StageAdd::Attached {
                    performer.play(local);
                    *state = ShowState::Playing;
                }
            } else if on_stage {
                self.stage.remove(&id);
                performer.pause(local);
                *state = ShowState::Unplayed;
            } else if self.stage.is_pending(&id) {
                self.stage.remove(&id);
            }
        }
    }

    fn pause_staged(&mut self) {
        let now = self.timeline.current_time();
        for performer in self.theater.iter_mut() {
            if !self.stage.contains(performer.id()) {
                continue;
            }
            if let Some(state) = self.show_states.get_mut(performer.id())
                && *state == ShowState::Playing
            {
                performer.pause(now - performer.start());
                *state = ShowState::Paused;
            }
        }
    }

    fn unstage_all(&mut self) {
        let now = self.timeline.current_time();
        for performer in self.theater.iter_mut() {
            let id = performer.id().to_owned();
            if !self.stage.contains(&id) {
                continue;
            }
            if self.show_states.get(&id) == Some(&ShowState::Playing) {
                performer.pause(now - performer.start());
            }
            self.stage.remove(&id);
            self.show_states.insert(id, ShowState::Unplayed);
        }
    }

    /// Stage every performer visible at `time`; returns the ids attached and due a seek.
    fn stage_for_seek(&mut self, time: f64) -> Vec<String> {
        let duration = self.timeline.duration();
        let mut targets = Vec::new();
        for id in self.z_ordered_ids() {
            let Some(performer) = self.theater.get_mut(&id) else {
                continue;
            };
            if check_performer_in_show_time(performer, time, duration) {
                if self.stage.add(performer) == StageAdd::Attached {
                    targets.push(id);
                }
            } else if self.stage.is_pending(&id) {
                self.stage.remove(&id);
            }
        }
        targets
    }

    async fn seek_all(&mut self, ids: &[String], time: f64) -> SeekOutcome {
        let seeks = self
            .theater
            .iter_mut()
            .filter(|p| ids.iter().any(|id| id == p.id()))
            .map(|p| async move {
                let id = p.id().to_owned();
                let local = time - p.start();
                let result = p.seek(local).await;
                (id, result)
            });
        let results = join_all(seeks).await;

        let mut outcome = SeekOutcome {
            time,
            seeked: Vec::new(),
            failed: Vec::new(),
        };
        for (id, result) in results {
            match result {
                Ok(()) => outcome.seeked.push(id),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "performer seek failed");
                    outcome.failed.push((id, err));
                }
            }
        }
        outcome
    }

    fn show_loaded(&mut self, id: &str) {
        let time = self.timeline.current_time();
        let duration = self.timeline.duration();
        let playing = self.timeline.is_playing();
        let Some(performer) = self.theater.get_mut(id) else {
            return;
        };
        if !check_performer_in_show_time(performer, time, duration) {
            return;
        }
        if self.stage.add(performer) != StageAdd::Attached {
            return;
        }
        if playing {
            performer.play(time - performer.start());
            self.show_states.insert(id.to_owned(), ShowState::Playing);
        } else {
            self.show_states.insert(id.to_owned(), ShowState::Unplayed);
            self.deferred_seeks.push(id.to_owned());
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(frame) = self.pending_frame.take() {
            self.scheduler.cancel_frame(frame);
        }
    }
}

impl Drop for Director {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/director.rs"]
mod tests;
