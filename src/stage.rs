//! Stage
//!
//! The [`Stage`] wires everything together: it owns the scene graph, the three
//! loaded objects, the loading manager, the timer scheduler, the input bridge and
//! the tweak panel, and exposes the per-frame tick.
//!
//! # Threading
//!
//! All mutation happens on the caller's thread inside [`Stage::frame`],
//! [`Stage::handle_input`] and [`Stage::poll_loads`]. Asset fetching is the only
//! concurrent part: the host runs [`fetch_all`](crate::assets::fetch_all) on any
//! executor with the stage's [`result_sender`](Stage::result_sender), and the
//! stage drains finished loads at the start of each frame.
//!
//! # Frame
//!
//! 1. Apply finished loads.
//! 2. Advance the scheduler and dispatch due timers (auto-switch, hand-off).
//! 3. Until every load has ended, report progress and stop there.
//! 4. Advance the character's animation.

use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::animation::{HandoffOutcome, HandoffTimer};
use crate::assets::{
    AssetKind, AssetReaderVariant, LoadEvent, LoadRequest, LoadResult, LoadingManager, Payload,
};
use crate::errors::Result;
use crate::input::{InputAction, InputBridge, InputEvent, Viewport};
use crate::objects::{Ambience, Character, Terrain};
use crate::schedule::{Scheduler, TimerId, seconds};
use crate::scene::Scene;
use crate::settings::{CameraSettings, StageSettings};
use crate::tweaks::{TweakPanel, TweakValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTimer {
    AutoSwitch,
    Handoff(HandoffTimer),
}

impl From<HandoffTimer> for StageTimer {
    fn from(timer: HandoffTimer) -> Self {
        Self::Handoff(timer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Loading { percent: u32 },
    /// `frame` counts frames since loading completed, starting at 1.
    Running { frame: u64 },
}

/// Perspective camera as the host should set it up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Vertical field of view, degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl CameraState {
    #[must_use]
    pub fn new(settings: &CameraSettings, viewport: Viewport) -> Self {
        Self {
            fov: settings.fov,
            aspect: viewport.aspect(),
            near: settings.near,
            far: settings.far,
            position: settings.position,
        }
    }

    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }
}

pub struct Stage {
    settings: StageSettings,
    scene: Scene,
    terrain: Terrain,
    character: Character,
    ambience: Ambience,
    loading: LoadingManager,
    scheduler: Scheduler<StageTimer>,
    input: InputBridge,
    tweaks: TweakPanel,
    camera: CameraState,
    sender: flume::Sender<LoadResult>,
    results: flume::Receiver<LoadResult>,
    auto_switch: TimerId,
    frame: u64,
}

impl Stage {
    /// Builds the scene and registers the terrain, character and ambience loads.
    ///
    /// Nothing is fetched yet: hand [`take_load_requests`](Self::take_load_requests)
    /// to a fetcher together with [`result_sender`](Self::result_sender).
    #[must_use]
    pub fn new(settings: StageSettings, viewport: Viewport) -> Self {
        let mut scene = Scene::new();
        let terrain = Terrain::new(&mut scene);
        let character = Character::new(&mut scene, settings.character.clone());
        let ambience = Ambience::new(settings.ambience);

        let mut loading = LoadingManager::new();
        loading.register(AssetKind::Terrain, settings.assets.terrain.clone());
        loading.register(AssetKind::Character, settings.assets.character.clone());
        loading.register(AssetKind::Ambience, settings.assets.ambience.clone());

        let mut scheduler = Scheduler::new();
        let auto_switch = scheduler.schedule_repeating(
            seconds(settings.character.switch_interval),
            StageTimer::AutoSwitch,
        );

        let (sender, results) = flume::unbounded();

        Self {
            camera: CameraState::new(&settings.camera, viewport),
            input: InputBridge::new(viewport, settings.gestures),
            tweaks: TweakPanel::for_stage(),
            settings,
            scene,
            terrain,
            character,
            ambience,
            loading,
            scheduler,
            sender,
            results,
            auto_switch,
            frame: 0,
        }
    }

    /// Reader for the configured asset base location.
    pub fn asset_reader(&self) -> Result<AssetReaderVariant> {
        AssetReaderVariant::from_source(&self.settings.assets.base_url)
    }

    pub fn take_load_requests(&mut self) -> Vec<LoadRequest> {
        self.loading.take_requests()
    }

    #[must_use]
    pub fn result_sender(&self) -> flume::Sender<LoadResult> {
        self.sender.clone()
    }

    /// Progress notifications since the last call.
    pub fn take_load_events(&mut self) -> Vec<LoadEvent> {
        self.loading.take_events()
    }

    /// Applies every load result received so far. Returns how many were applied.
    pub fn poll_loads(&mut self) -> usize {
        let results: Vec<LoadResult> = self.results.try_iter().collect();
        let count = results.len();
        for result in results {
            self.apply_load(result);
        }
        count
    }

    fn apply_load(&mut self, result: LoadResult) {
        let failed = match (result.kind, result.outcome) {
            (AssetKind::Terrain, Ok(Payload::Graph(graph))) => {
                self.terrain.on_loaded(&mut self.scene, &graph);
                false
            }
            (AssetKind::Character, Ok(Payload::Graph(graph))) => {
                self.character.on_loaded(&mut self.scene, graph).is_err()
            }
            (AssetKind::Ambience, Ok(Payload::Audio(bytes))) => {
                self.ambience.on_loaded(bytes);
                false
            }
            (kind, Ok(_)) => {
                self.fail_object(kind, "unexpected payload");
                true
            }
            (kind, Err(err)) => {
                log::error!("{kind:?} failed to load: {err}");
                self.fail_object(kind, err.to_string());
                true
            }
        };
        self.loading.complete(result.ticket, failed);
    }

    fn fail_object(&mut self, kind: AssetKind, reason: impl Into<String>) {
        match kind {
            AssetKind::Terrain => self.terrain.on_failed(reason),
            AssetKind::Character => self.character.on_failed(reason),
            AssetKind::Ambience => self.ambience.on_failed(reason),
        }
    }

    /// Routes a host input event. Returns the hand-off outcome when the event asked
    /// for an animation switch.
    pub fn handle_input(&mut self, event: InputEvent, now: Duration) -> Option<HandoffOutcome> {
        match self.input.translate(event, now)? {
            InputAction::Steer(normalized) => {
                self.character.steer(normalized, &mut self.scene);
                None
            }
            InputAction::SwitchAnimation => Some(self.request_switch()),
            InputAction::Resize(viewport) => {
                self.camera.aspect = viewport.aspect();
                None
            }
        }
    }

    pub fn request_switch(&mut self) -> HandoffOutcome {
        self.character.request_switch(&mut self.scheduler)
    }

    /// Per-frame tick; `dt` in seconds.
    pub fn frame(&mut self, dt: f32) -> FrameStatus {
        self.poll_loads();

        self.scheduler.advance(seconds(dt));
        while let Some((_, timer)) = self.scheduler.poll() {
            match timer {
                StageTimer::AutoSwitch => {
                    log::debug!("Auto-switch timer fired");
                    self.character.request_switch(&mut self.scheduler);
                }
                StageTimer::Handoff(timer) => {
                    self.character.on_timer(timer, &mut self.scheduler);
                }
            }
        }

        if !self.loading.is_complete() {
            return FrameStatus::Loading {
                percent: self.loading.percent(),
            };
        }

        self.character.update(dt, &mut self.scene);
        self.frame += 1;
        FrameStatus::Running { frame: self.frame }
    }

    /// Applies a debug-panel edit, see [`TweakPanel::set`].
    pub fn apply_tweak(&mut self, path: &str, value: TweakValue) -> Result<TweakValue> {
        let applied = self.tweaks.set(path, value, &mut self.settings)?;
        self.camera = CameraState::new(&self.settings.camera, self.input.viewport());
        Ok(applied)
    }

    #[must_use]
    pub fn settings(&self) -> &StageSettings {
        &self.settings
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn character(&self) -> &Character {
        &self.character
    }

    #[must_use]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    #[must_use]
    pub fn ambience(&self) -> &Ambience {
        &self.ambience
    }

    #[must_use]
    pub fn loading(&self) -> &LoadingManager {
        &self.loading
    }

    #[must_use]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    #[must_use]
    pub fn tweaks(&self) -> &TweakPanel {
        &self.tweaks
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler<StageTimer> {
        &self.scheduler
    }

    #[must_use]
    pub fn auto_switch_timer(&self) -> TimerId {
        self.auto_switch
    }
}
