use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::animation::values::WeightedBlend;
use crate::scene::{NodeHandle, Scene, Transform};

new_key_type! {
    /// Handle to an action owned by an [`AnimationMixer`].
    pub struct ActionHandle;
}

/// Per-node blend accumulators for one frame.
#[derive(Default)]
struct NodeBlend {
    position: Option<WeightedBlend<Vec3>>,
    rotation: Option<WeightedBlend<Quat>>,
    scale: Option<WeightedBlend<Vec3>>,
}

impl NodeBlend {
    fn accumulate(&mut self, target: TargetPath, value: TrackValue, weight: f32) {
        match (target, value) {
            (TargetPath::Translation, TrackValue::Vector3(v)) => {
                fold(&mut self.position, v, weight);
            }
            (TargetPath::Scale, TrackValue::Vector3(v)) => fold(&mut self.scale, v, weight),
            (TargetPath::Rotation, TrackValue::Quaternion(q)) => {
                fold(&mut self.rotation, q, weight);
            }
            _ => {}
        }
    }
}

fn fold<T: crate::animation::values::Interpolatable>(
    slot: &mut Option<WeightedBlend<T>>,
    value: T,
    weight: f32,
) {
    match slot {
        Some(blend) => blend.accumulate(value, weight),
        None => *slot = Some(WeightedBlend::new(value, weight)),
    }
}

/// Plays a set of actions against one scene subtree and blends them by weight.
///
/// Properties whose accumulated weight is below 1 are completed from the rest pose
/// recorded when the first clip bound to that node.
#[derive(Default)]
pub struct AnimationMixer {
    actions: SlotMap<ActionHandle, AnimationAction>,
    rest_pose: FxHashMap<NodeHandle, Transform>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: AnimationAction) -> ActionHandle {
        self.actions.insert(action)
    }

    /// Creates a stopped action for `clip`, bound to the nodes under `root`.
    pub fn clip_action(
        &mut self,
        clip: Arc<AnimationClip>,
        scene: &Scene,
        root: NodeHandle,
    ) -> ActionHandle {
        let bindings = Binder::bind(scene, root, &clip);
        for binding in &bindings {
            if let Some(node) = scene.get_node(binding.node) {
                self.rest_pose.entry(binding.node).or_insert(node.transform);
            }
        }

        let mut action = AnimationAction::new(clip);
        action.bindings = bindings;
        self.add_action(action)
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionHandle, &AnimationAction)> {
        self.actions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Fades `from` out and `to` in over `duration` seconds; both keep playing meanwhile.
    ///
    /// With `warp`, the playback rates are ramped so the two clips' cycles line up:
    /// `to` goes from `to_duration / from_duration` to 1, `from` goes from 1 to
    /// `from_duration / to_duration`.
    pub fn crossfade(&mut self, from: ActionHandle, to: ActionHandle, duration: f32, warp: bool) {
        if from == to {
            log::warn!("Crossfade from an action to itself ignored");
            return;
        }
        let (Some(from_duration), Some(to_duration)) = (
            self.actions.get(from).map(|a| a.clip().duration),
            self.actions.get(to).map(|a| a.clip().duration),
        ) else {
            log::warn!("Crossfade between unknown actions ignored");
            return;
        };

        let warp = warp && from_duration > 0.0 && to_duration > 0.0;

        if let Some(action) = self.actions.get_mut(from) {
            action.fade_out(duration);
            if warp {
                action.warp(1.0, from_duration / to_duration, duration);
            }
        }
        if let Some(action) = self.actions.get_mut(to) {
            action.fade_in(duration);
            if warp {
                action.warp(to_duration / from_duration, 1.0, duration);
            }
        }
    }

    /// Advances every action and writes the blended pose into the scene.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in self.actions.values_mut() {
            action.update(dt);
        }
        self.apply(scene);
    }

    fn apply(&mut self, scene: &mut Scene) {
        let mut blends: FxHashMap<NodeHandle, NodeBlend> = FxHashMap::default();

        for action in self.actions.values_mut() {
            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let binding = action.bindings[i];
                if let Some(value) = action.sample_track(binding.track_index) {
                    blends
                        .entry(binding.node)
                        .or_default()
                        .accumulate(binding.target, value, weight);
                }
            }
        }

        for (handle, blend) in blends {
            let rest = self.rest_pose.get(&handle).copied().unwrap_or_default();
            let Some(node) = scene.get_node_mut(handle) else {
                continue;
            };
            if let Some(p) = blend.position {
                node.transform.position = p.resolve(rest.position);
            }
            if let Some(r) = blend.rotation {
                node.transform.rotation = r.resolve(rest.rotation).normalize();
            }
            if let Some(s) = blend.scale {
                node.transform.scale = s.resolve(rest.scale);
            }
        }
    }
}
