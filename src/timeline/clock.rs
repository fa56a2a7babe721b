use crate::foundation::events::Emitter;

/// Notifications published by [`TimeController`] and the director's tick loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelineEvent {
    /// Current time moved to the given value (ms).
    TimeChanged(f64),
    /// Project duration changed to the given value (ms).
    DurationChanged(f64),
    /// Playback started.
    Playing,
    /// Playback stopped before reaching the end, or was stopped by a seek.
    Paused,
    /// The tick loop reached the end of the project.
    Ended,
}

/// Playback clock state: current time, duration and the playing flag.
///
/// Invariant: `0 <= current_time <= duration`. Every setter reports whether the value
/// actually changed and emits only in that case.
#[derive(Debug, Default)]
pub struct TimeController {
    current_time: f64,
    duration: f64,
    playing: bool,
    events: Emitter<TimelineEvent>,
}

impl TimeController {
    /// Clock at time 0 with an empty duration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback time in ms.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Project duration in ms.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether the tick loop is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True when the clock sits exactly on the end of a non-empty project.
    pub fn is_at_end(&self) -> bool {
        self.duration > 0.0 && self.current_time == self.duration
    }

    /// Event channel.
    pub fn events(&self) -> &Emitter<TimelineEvent> {
        &self.events
    }

    /// Move to `time_ms`, clamped to `[0, duration]`. NaN is treated as 0.
    pub fn set_time(&mut self, time_ms: f64) -> bool {
        let next = if time_ms.is_nan() {
            0.0
        } else {
            time_ms.clamp(0.0, self.duration)
        };
        if next == self.current_time {
            return false;
        }
        self.current_time = next;
        self.events.emit(&TimelineEvent::TimeChanged(next));
        true
    }

    /// Replace the duration; the current time is pulled back inside the new range.
    pub fn set_duration(&mut self, duration_ms: f64) -> bool {
        let next = if duration_ms.is_finite() {
            duration_ms.max(0.0)
        } else {
            0.0
        };
        if next == self.duration {
            return false;
        }
        self.duration = next;
        self.events.emit(&TimelineEvent::DurationChanged(next));
        if self.current_time > next {
            self.set_time(next);
        }
        true
    }

    /// Extend the duration to `end_ms` if it is longer. Never shrinks.
    pub fn grow_duration(&mut self, end_ms: f64) -> bool {
        if end_ms.is_finite() && end_ms > self.duration {
            self.set_duration(end_ms)
        } else {
            false
        }
    }

    /// Flip the playing flag, emitting [`TimelineEvent::Playing`] or
    /// [`TimelineEvent::Paused`] on change.
    pub fn set_playing(&mut self, playing: bool) -> bool {
        if playing == self.playing {
            return false;
        }
        self.playing = playing;
        self.events.emit(if playing {
            &TimelineEvent::Playing
        } else {
            &TimelineEvent::Paused
        });
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/clock.rs"]
mod tests;
