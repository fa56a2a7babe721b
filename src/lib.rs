//! Stagecraft is the playback and animation core of a canvas video editor.
//!
//! It maps one project clock onto a set of time-scoped visual entities (performers: video,
//! image and text) and keeps their render state consistent under play, pause, seek and
//! canvas resize.
//!
//! # Architecture overview
//!
//! 1. **Animation**: `TransformState + PerformerAnimationSpec + local time -> TransformState`
//!    via [`AnimationController`] (enter/exit/loop segments, center-pivot composition).
//! 2. **Roster and stage**: [`Theater`] holds every hired performer, [`Stage`] the subset
//!    attached to the [`RenderSurface`], loading performers that are not ready yet.
//! 3. **Direction**: [`Director`] runs the frame loop, decides which performers are in
//!    their time window and drives their `play`/`update`/`pause`/`seek` calls.
//! 4. **Layout**: [`CanvasLayout`] keeps placement proportional when the canvas is resized.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded**: state is shared through `Rc`/`Cell`, async work is `!Send`
//!   (`LocalBoxFuture`) and driven by the host.
//! - **Never-error animation**: unknown presets, malformed specs and degenerate layouts
//!   degrade to identity instead of failing.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod fixture;
mod foundation;
mod layout;
mod performer;
mod surface;
mod timeline;

pub use animation::controller::{AnimationController, compose, compose_center_pivot};
pub use animation::ease::Ease;
pub use animation::preset::{
    AnimationPreset, SLIDE_DISTANCE_PX, SPIN_DEGREES, SegmentPhase, ZOOM_FACTOR,
};
pub use animation::segment::{AnimationSegment, map_to_segment_time};
pub use animation::spec::{AnimationSegmentSpec, PerformerAnimationSpec};
pub use fixture::{PerformerFixture, StageFixture};
pub use foundation::core::{
    Affine, AnimationLayout, Bounds, LAYOUT_EPSILON, Point, RelativeTransformState, Size,
    TransformState, Vec2,
};
pub use foundation::error::{StagecraftError, StagecraftResult};
pub use foundation::events::{Emitter, Listener, ListenerId};
pub use foundation::guard::{GuardScope, ReentrancyGuard};
pub use layout::remap::{
    CanvasLayout, project_bounds_to_canvas_base, remap_bounds_for_canvas_resize,
};
pub use performer::clip::{ClipPerformer, LoadState};
pub use performer::source::{MediaSource, StaticSource};
pub use performer::{LoadFuture, Performer, PerformerKind, PositionUpdate, SeekFuture};
pub use surface::headless::HeadlessSurface;
pub use surface::snapshot::{
    DEFAULT_SNAPSHOT_MAX_EDGE, SnapshotFormat, SnapshotOptions, capture_snapshot,
    encode_data_url,
};
pub use surface::{FrameRgba, RenderSurface};
pub use timeline::clock::{TimeController, TimelineEvent};
pub use timeline::director::{
    Director, ExternalClock, SeekOutcome, check_performer_in_show_time, in_show_time,
};
pub use timeline::frame::{
    Clock, FrameRequestId, FrameScheduler, ManualClock, ManualFrameScheduler, MonotonicClock,
};
pub use timeline::stage::{Stage, StageAdd, StageEvent};
pub use timeline::theater::{Theater, TheaterEvent};
