use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::schedule::seconds;

/// Double-tap thresholds. Times in seconds, distances in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapSettings {
    /// Longest press that still counts as a tap.
    pub tap_time: f32,
    /// Furthest a pointer may travel between down and up.
    pub tap_movement: f32,
    /// Longest gap between the two taps.
    pub interval: f32,
    /// Furthest apart the two taps may land.
    pub position_threshold: f32,
}

impl Default for TapSettings {
    fn default() -> Self {
        Self {
            tap_time: 0.25,
            tap_movement: 9.0,
            interval: 0.3,
            position_threshold: 10.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct DoubleTapRecognizer {
    settings: TapSettings,
    down: Option<(Vec2, Duration)>,
    last_tap: Option<(Vec2, Duration)>,
}

impl DoubleTapRecognizer {
    #[must_use]
    pub fn new(settings: TapSettings) -> Self {
        Self {
            settings,
            down: None,
            last_tap: None,
        }
    }

    pub fn pointer_down(&mut self, position: Vec2, now: Duration) {
        self.down = Some((position, now));
    }

    /// Returns `true` when this release completes a double tap.
    pub fn pointer_up(&mut self, position: Vec2, now: Duration) -> bool {
        let Some((start, pressed_at)) = self.down.take() else {
            return false;
        };

        let is_tap = now.saturating_sub(pressed_at) <= seconds(self.settings.tap_time)
            && start.distance(position) <= self.settings.tap_movement;
        if !is_tap {
            self.last_tap = None;
            return false;
        }

        if let Some((previous, tapped_at)) = self.last_tap.take() {
            let close_in_time = now.saturating_sub(tapped_at) <= seconds(self.settings.interval);
            let close_in_space = previous.distance(position) <= self.settings.position_threshold;
            if close_in_time && close_in_space {
                return true;
            }
        }

        self.last_tap = Some((position, now));
        false
    }

    pub fn reset(&mut self) {
        self.down = None;
        self.last_tap = None;
    }
}
