pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod handoff;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode, Ramp, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use handoff::{
    ActionSet, Handoff, HandoffEvent, HandoffOutcome, HandoffPhase, HandoffSettings,
    HandoffTimer, IgnoreReason, ReleasePolicy,
};
pub use mixer::{ActionHandle, AnimationMixer};
pub use tracks::{InterpolationMode, KeyframeTrack};
