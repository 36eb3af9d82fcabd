use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
}

/// Linear ramp of a scalar over a fixed duration, used for weight fades and time warps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Ramp {
    #[must_use]
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.elapsed / self.duration)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

/// Playback state of one clip inside a mixer.
///
/// A fresh action is stopped (`enabled == false`, weight 1). [`play`](Self::play)
/// enables it, fades move its weight, warps move its time scale. An action whose
/// fade-out reaches zero disables itself; a `LoopMode::Once` action disables itself
/// at the end of the clip unless `clamp_when_finished` is set, in which case it pauses
/// on its last frame.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
    fade: Option<Ramp>,
    warp: Option<Ramp>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            clamp_when_finished: false,
            paused: false,
            enabled: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
            fade: None,
            warp: None,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    /// Starts (or resumes) contributing to the mixer.
    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.paused = false;
        self
    }

    /// Rewinds to the start and cancels any fade or warp in progress. Weight is untouched.
    pub fn reset(&mut self) -> &mut Self {
        self.paused = false;
        self.enabled = true;
        self.time = 0.0;
        self.stop_fading().stop_warping()
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.weight = 0.0;
        self.fade = Some(Ramp::new(0.0, 1.0, duration));
        self
    }

    /// Fades from the current weight to zero.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Ramp::new(self.weight, 0.0, duration));
        self
    }

    /// Ramps the playback rate from `start` to `end`; `end` becomes the new `time_scale`.
    pub fn warp(&mut self, start: f32, end: f32, duration: f32) -> &mut Self {
        self.warp = Some(Ramp::new(start, end, duration));
        self
    }

    pub fn stop_fading(&mut self) -> &mut Self {
        self.fade = None;
        self
    }

    pub fn stop_warping(&mut self) -> &mut Self {
        self.warp = None;
        self
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    #[must_use]
    pub fn is_warping(&self) -> bool {
        self.warp.is_some()
    }

    /// Weight this action contributes to the blend this frame.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.enabled { self.weight } else { 0.0 }
    }

    #[must_use]
    pub fn effective_time_scale(&self) -> f32 {
        self.warp.map_or(self.time_scale, |w| w.value())
    }

    /// Advances warp and local time by `dt` seconds (only while playing), then the fade.
    pub fn update(&mut self, dt: f32) {
        if self.enabled && !self.paused {
            let scale = self.update_time_scale(dt);
            self.update_time(dt * scale);
        }

        self.update_weight(dt);
    }

    fn update_weight(&mut self, dt: f32) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };
        fade.advance(dt);
        self.weight = fade.value();

        if fade.is_finished() {
            self.fade = None;
            if self.weight <= 0.0 {
                self.enabled = false;
            }
        }
    }

    fn update_time_scale(&mut self, dt: f32) -> f32 {
        let Some(warp) = self.warp.as_mut() else {
            return self.time_scale;
        };
        warp.advance(dt);
        let scale = warp.value();

        if warp.is_finished() {
            self.time_scale = warp.to;
            self.warp = None;
        }
        scale
    }

    fn update_time(&mut self, delta: f32) {
        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += delta;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration || self.time < 0.0 {
                    self.time = self.time.clamp(0.0, duration);
                    if self.clamp_when_finished {
                        self.paused = true;
                    } else {
                        self.enabled = false;
                    }
                }
            }
            LoopMode::Loop => {
                self.time = self.time.rem_euclid(duration);
            }
        }
    }

    /// Gets the value of the specified track at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Quaternion),
        }
    }
}
