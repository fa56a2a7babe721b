//! Playback orchestration: roster, stage, clock and the director tying them together.

pub(crate) mod clock;
pub(crate) mod director;
pub(crate) mod frame;
pub(crate) mod stage;
pub(crate) mod theater;
