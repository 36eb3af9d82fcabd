//! # Mutant Stage
//!
//! Behaviour and configuration of an interactive 3D scene: a terrain, an animated
//! character that switches between an idle loop and random one-shot actions, pointer
//! steering of the character's neck and waist, ambient audio, and the lighting,
//! fog and post-processing settings around them.
//!
//! Rendering, audio playback and GUI belong to the host. The crate produces a
//! [`Scene`] of named nodes with transforms and shadow flags, a [`StageSettings`]
//! the host renders with, and the decoded asset bytes.
//!
//! ```rust,ignore
//! use mutant_stage::{Stage, StageSettings, input::Viewport};
//!
//! let mut stage = Stage::new(StageSettings::default(), Viewport::new(1280.0, 720.0));
//! let reader = stage.asset_reader()?;
//! let requests = stage.take_load_requests();
//! let sender = stage.result_sender();
//! std::thread::spawn(move || {
//!     let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//!     rt.block_on(mutant_stage::assets::fetch_all(reader, requests, sender));
//! });
//!
//! loop {
//!     stage.frame(1.0 / 60.0);
//! }
//! ```

pub mod animation;
pub mod assets;
pub mod errors;
pub mod input;
pub mod objects;
pub mod schedule;
pub mod scene;
pub mod settings;
pub mod stage;
pub mod tweaks;

pub use animation::{
    ActionHandle, AnimationAction, AnimationClip, AnimationMixer, Handoff, HandoffOutcome,
    HandoffPhase, LoopMode, ReleasePolicy,
};
pub use assets::{AssetGraph, AssetState, LoadEvent, LoadingManager};
pub use errors::{Result, StageError};
pub use objects::{Ambience, Character, Terrain};
pub use schedule::Scheduler;
pub use scene::{Node, NodeHandle, Scene};
pub use settings::StageSettings;
pub use stage::{FrameStatus, Stage, StageTimer};
pub use tweaks::{TweakPanel, TweakValue};
