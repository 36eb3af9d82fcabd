use glam::{Quat, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::{
    ActionSet, Handoff, HandoffEvent, HandoffOutcome, HandoffPhase, HandoffTimer, IgnoreReason,
};
use crate::assets::{AssetGraph, AssetState};
use crate::errors::Result;
use crate::input::JointAngles;
use crate::schedule::Scheduler;
use crate::scene::{NodeHandle, Scene};
use crate::settings::CharacterSettings;

/// Name of the container node the character asset is instantiated under.
pub const CHARACTER_NODE: &str = "Mutant";

/// What exists once the character asset has loaded.
pub struct CharacterRig {
    pub actions: ActionSet,
    pub neck: Option<NodeHandle>,
    pub waist: Option<NodeHandle>,
}

impl CharacterRig {
    /// Steering only runs when both joints exist.
    #[must_use]
    pub fn joints(&self) -> Option<(NodeHandle, NodeHandle)> {
        self.neck.zip(self.waist)
    }
}

/// The animated character: a looping idle, a pool of one-shot clips it switches
/// into on request, and a neck and waist that follow the pointer.
pub struct Character {
    node: NodeHandle,
    settings: CharacterSettings,
    state: AssetState<CharacterRig>,
    handoff: Handoff,
    rng: StdRng,
    pointer: Option<Vec2>,
}

impl Character {
    pub fn new(scene: &mut Scene, settings: CharacterSettings) -> Self {
        let node = scene.create_node_with_name(CHARACTER_NODE);
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Self {
            node,
            handoff: Handoff::new(settings.handoff()),
            settings,
            state: AssetState::Pending,
            rng,
            pointer: None,
        }
    }

    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    #[must_use]
    pub fn state(&self) -> &AssetState<CharacterRig> {
        &self.state
    }

    #[must_use]
    pub fn rig(&self) -> Option<&CharacterRig> {
        self.state.loaded()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.handoff.is_busy()
    }

    #[must_use]
    pub fn phase(&self) -> HandoffPhase {
        self.handoff.phase()
    }

    #[must_use]
    pub fn handoff(&self) -> &Handoff {
        &self.handoff
    }

    /// Builds the rig from a decoded asset.
    ///
    /// Meshes cast shadows, the root turns to its configured facing, and the clips
    /// are split into idle and pool. A clip set without exactly one idle clip
    /// leaves the character `Failed`.
    pub fn on_loaded(&mut self, scene: &mut Scene, graph: AssetGraph) -> Result<()> {
        scene.instantiate(&graph, self.node);
        scene.traverse_mut(self.node, |_, node| {
            if node.is_mesh() {
                node.cast_shadow = true;
            }
        });
        if let Some(root) = scene.get_node_mut(self.node) {
            root.transform.rotation = Quat::from_rotation_y(self.settings.facing);
        }

        let neck = self.find_bone(scene, &self.settings.neck_bone);
        let waist = self.find_bone(scene, &self.settings.waist_bone);

        let steered = [
            self.settings.neck_bone.as_str(),
            self.settings.waist_bone.as_str(),
        ];
        let clips = graph
            .clips
            .into_iter()
            .map(|clip| {
                if self.settings.exclusive_steering {
                    clip.without_nodes(&steered)
                } else {
                    clip
                }
            })
            .collect();

        match ActionSet::from_clips(clips, &self.settings.idle_clip, scene, self.node) {
            Ok(actions) => {
                log::info!(
                    "Character ready: {} clips in the pool",
                    actions.pool.len()
                );
                self.state = AssetState::Loaded(CharacterRig {
                    actions,
                    neck,
                    waist,
                });
                Ok(())
            }
            Err(err) => {
                log::error!("Character unusable: {err}");
                self.state.fail(err.to_string());
                Err(err)
            }
        }
    }

    pub fn on_failed(&mut self, reason: impl Into<String>) {
        self.state.fail(reason);
    }

    fn find_bone(&self, scene: &Scene, name: &str) -> Option<NodeHandle> {
        let found = scene
            .find_by_name(self.node, name)
            .filter(|&h| scene.get_node(h).is_some_and(|n| n.is_bone()));
        if found.is_none() {
            log::warn!("Bone '{name}' not found, pointer steering disabled");
        }
        found
    }

    /// Asks for a random action. Ignored before load and while a hand-off is busy.
    pub fn request_switch<E>(&mut self, scheduler: &mut Scheduler<E>) -> HandoffOutcome
    where
        E: Clone + From<HandoffTimer>,
    {
        let AssetState::Loaded(rig) = &mut self.state else {
            return HandoffOutcome::Ignored(IgnoreReason::NotReady);
        };
        self.handoff.apply(
            HandoffEvent::SwitchRequested,
            &mut rig.actions,
            &mut self.rng,
            scheduler,
        )
    }

    pub fn on_timer<E>(
        &mut self,
        timer: HandoffTimer,
        scheduler: &mut Scheduler<E>,
    ) -> HandoffOutcome
    where
        E: Clone + From<HandoffTimer>,
    {
        let AssetState::Loaded(rig) = &mut self.state else {
            return HandoffOutcome::Stale;
        };
        self.handoff.apply(
            HandoffEvent::Timer(timer),
            &mut rig.actions,
            &mut self.rng,
            scheduler,
        )
    }

    /// Points neck and waist at `normalized`.
    ///
    /// See [`Viewport::normalize`](crate::input::Viewport::normalize).
    pub fn steer(&mut self, normalized: Vec2, scene: &mut Scene) {
        self.pointer = Some(normalized);
        self.apply_steering(scene);
    }

    /// Current neck and waist angles, if steering is active.
    #[must_use]
    pub fn joint_angles(&self) -> Option<(JointAngles, JointAngles)> {
        let pointer = self.pointer?;
        if self.rig()?.joints().is_none() {
            return None;
        }
        Some((
            JointAngles::from_pointer(pointer, self.settings.neck_limit_degrees),
            JointAngles::from_pointer(pointer, self.settings.waist_limit_degrees),
        ))
    }

    fn apply_steering(&self, scene: &mut Scene) {
        let (Some((neck, waist)), Some((neck_angles, waist_angles))) = (
            self.rig().and_then(CharacterRig::joints),
            self.joint_angles(),
        ) else {
            return;
        };

        for (joint, angles) in [(neck, neck_angles), (waist, waist_angles)] {
            if let Some(node) = scene.get_node_mut(joint) {
                node.transform.set_pitch_yaw(angles.pitch, angles.yaw);
            }
        }
    }

    /// Advances blending by `dt` seconds, then re-applies steering on top.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        let AssetState::Loaded(rig) = &mut self.state else {
            return;
        };
        rig.actions.mixer.update(dt, scene);
        self.apply_steering(scene);
    }
}
