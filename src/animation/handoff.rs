//! Idle ⇄ action hand-off.
//!
//! The character rests in a looping idle clip. A switch request picks a random clip
//! from the pool, crossfades idle into it, and schedules a timer that crossfades back
//! to idle shortly before the clip ends:
//!
//! ```text
//!  Idle ──request──▶ TransitioningToAction ──ReturnToIdle──▶ TransitioningToIdle
//!   ▲                                                            │
//!   └──────────────────────── ReverseComplete ───────────────────┘
//! ```
//!
//! Every state change goes through [`Handoff::apply`]. Timer events carry the
//! generation of the run that scheduled them; an event from an older run is stale
//! and has no effect.

use std::sync::Arc;
use std::time::Duration;

use rand::RngExt;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::animation::action::LoopMode;
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::{ActionHandle, AnimationMixer};
use crate::errors::{Result, StageError};
use crate::schedule::{Scheduler, TimerId, seconds};
use crate::scene::{NodeHandle, Scene};

/// When a running hand-off stops rejecting new requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Accept requests as soon as the return crossfade starts, so a new action may
    /// begin while idle is still blending in.
    #[default]
    OnReverseScheduled,
    /// Stay busy until the return crossfade has finished.
    OnReverseComplete,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandoffSettings {
    /// Seconds for idle to fade out and the action to fade in.
    pub blend_in: f32,
    /// Seconds for the action to fade out and idle to fade back in.
    pub blend_out: f32,
    pub warp: bool,
    pub release: ReleasePolicy,
}

impl Default for HandoffSettings {
    fn default() -> Self {
        Self {
            blend_in: 0.25,
            blend_out: 0.25,
            warp: true,
            release: ReleasePolicy::default(),
        }
    }
}

impl HandoffSettings {
    /// Delay from a switch request to the start of the return crossfade.
    #[must_use]
    pub fn return_delay(&self, clip_duration: f32) -> Duration {
        seconds(clip_duration - (self.blend_out + self.blend_in))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandoffPhase {
    #[default]
    Idle,
    /// Blending into the action, then playing it.
    TransitioningToAction { action: ActionHandle },
    TransitioningToIdle { action: ActionHandle },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffTimer {
    ReturnToIdle { generation: u64 },
    ReverseComplete { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffEvent {
    SwitchRequested,
    Timer(HandoffTimer),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Busy,
    EmptyPool,
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffOutcome {
    Started {
        action: ActionHandle,
        return_in: Duration,
    },
    Ignored(IgnoreReason),
    ReturningToIdle {
        action: ActionHandle,
    },
    Settled,
    Stale,
}

/// The mixer together with the idle action and the pool the hand-off picks from.
pub struct ActionSet {
    pub mixer: AnimationMixer,
    pub idle: ActionHandle,
    pub pool: Vec<ActionHandle>,
}

impl ActionSet {
    /// Builds one action per clip. Exactly one clip must be named `idle_name`; it loops
    /// and starts playing. Every other clip goes to the pool, in input order.
    pub fn from_clips(
        clips: Vec<AnimationClip>,
        idle_name: &str,
        scene: &Scene,
        root: NodeHandle,
    ) -> Result<Self> {
        let idle_count = clips.iter().filter(|c| c.name == idle_name).count();
        match idle_count {
            0 => return Err(StageError::MissingClip(idle_name.to_string())),
            1 => {}
            count => {
                return Err(StageError::DuplicateClip {
                    name: idle_name.to_string(),
                    count,
                });
            }
        }

        let mut mixer = AnimationMixer::new();
        let mut idle = None;
        let mut pool = Vec::with_capacity(clips.len() - 1);

        for clip in clips {
            let is_idle = clip.name == idle_name;
            let handle = mixer.clip_action(Arc::new(clip), scene, root);
            if is_idle {
                idle = Some(handle);
            } else {
                pool.push(handle);
            }
        }

        let idle = idle.ok_or_else(|| StageError::MissingClip(idle_name.to_string()))?;
        if let Some(action) = mixer.action_mut(idle) {
            action.set_loop(LoopMode::Loop).play();
        }

        Ok(Self { mixer, idle, pool })
    }

    #[must_use]
    pub fn idle_weight(&self) -> f32 {
        self.mixer
            .action(self.idle)
            .map_or(0.0, |a| a.effective_weight())
    }

    #[must_use]
    pub fn clip_duration(&self, handle: ActionHandle) -> Option<f32> {
        self.mixer.action(handle).map(|a| a.clip().duration)
    }
}

#[derive(Debug, Default)]
pub struct Handoff {
    settings: HandoffSettings,
    phase: HandoffPhase,
    generation: u64,
    pending: Option<TimerId>,
}

impl Handoff {
    #[must_use]
    pub fn new(settings: HandoffSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn phase(&self) -> HandoffPhase {
        self.phase
    }

    #[must_use]
    pub fn settings(&self) -> &HandoffSettings {
        &self.settings
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a switch request would be rejected right now.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        match self.phase {
            HandoffPhase::Idle => false,
            HandoffPhase::TransitioningToAction { .. } => true,
            HandoffPhase::TransitioningToIdle { .. } => {
                self.settings.release == ReleasePolicy::OnReverseComplete
            }
        }
    }

    /// Feeds one event through the state machine.
    pub fn apply<E>(
        &mut self,
        event: HandoffEvent,
        actions: &mut ActionSet,
        rng: &mut StdRng,
        scheduler: &mut Scheduler<E>,
    ) -> HandoffOutcome
    where
        E: Clone + From<HandoffTimer>,
    {
        let outcome = match event {
            HandoffEvent::SwitchRequested => self.start(actions, rng, scheduler),
            HandoffEvent::Timer(HandoffTimer::ReturnToIdle { generation }) => {
                self.return_to_idle(generation, actions, scheduler)
            }
            HandoffEvent::Timer(HandoffTimer::ReverseComplete { generation }) => {
                self.settle(generation)
            }
        };

        match outcome {
            HandoffOutcome::Stale => log::debug!("Stale hand-off timer ignored ({event:?})"),
            HandoffOutcome::Ignored(reason) => log::debug!("Switch request ignored: {reason:?}"),
            _ => log::info!("Hand-off: {:?}", self.phase),
        }
        outcome
    }

    fn start<E>(
        &mut self,
        actions: &mut ActionSet,
        rng: &mut StdRng,
        scheduler: &mut Scheduler<E>,
    ) -> HandoffOutcome
    where
        E: Clone + From<HandoffTimer>,
    {
        if self.is_busy() {
            return HandoffOutcome::Ignored(IgnoreReason::Busy);
        }
        if actions.pool.is_empty() {
            return HandoffOutcome::Ignored(IgnoreReason::EmptyPool);
        }

        let action = actions.pool[rng.random_range(0..actions.pool.len())];
        let Some(duration) = actions.clip_duration(action) else {
            return HandoffOutcome::Ignored(IgnoreReason::EmptyPool);
        };

        if let Some(timer) = self.pending.take() {
            scheduler.cancel(timer);
        }
        self.generation += 1;

        if let Some(a) = actions.mixer.action_mut(action) {
            a.set_loop(LoopMode::Once).reset();
        }
        actions.mixer.crossfade(
            actions.idle,
            action,
            self.settings.blend_in,
            self.settings.warp,
        );

        let return_in = self.settings.return_delay(duration);
        self.pending = Some(scheduler.schedule_once(
            return_in,
            HandoffTimer::ReturnToIdle {
                generation: self.generation,
            }
            .into(),
        ));
        self.phase = HandoffPhase::TransitioningToAction { action };

        HandoffOutcome::Started { action, return_in }
    }

    fn return_to_idle<E>(
        &mut self,
        generation: u64,
        actions: &mut ActionSet,
        scheduler: &mut Scheduler<E>,
    ) -> HandoffOutcome
    where
        E: Clone + From<HandoffTimer>,
    {
        let HandoffPhase::TransitioningToAction { action } = self.phase else {
            return HandoffOutcome::Stale;
        };
        if generation != self.generation {
            return HandoffOutcome::Stale;
        }

        // Idle disabled itself when its fade-out reached zero.
        if let Some(idle) = actions.mixer.action_mut(actions.idle) {
            idle.play();
        }
        actions.mixer.crossfade(
            action,
            actions.idle,
            self.settings.blend_out,
            self.settings.warp,
        );

        self.pending = Some(scheduler.schedule_once(
            seconds(self.settings.blend_out),
            HandoffTimer::ReverseComplete { generation }.into(),
        ));
        self.phase = HandoffPhase::TransitioningToIdle { action };

        HandoffOutcome::ReturningToIdle { action }
    }

    fn settle(&mut self, generation: u64) -> HandoffOutcome {
        if generation != self.generation
            || !matches!(self.phase, HandoffPhase::TransitioningToIdle { .. })
        {
            return HandoffOutcome::Stale;
        }
        self.pending = None;
        self.phase = HandoffPhase::Idle;
        HandoffOutcome::Settled
    }
}
