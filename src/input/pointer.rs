use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Maps a pixel position (origin top-left, y down) to `[-1, 1]` on both axes
    /// relative to the center. Positions outside the viewport are clamped; an axis
    /// with no extent maps to 0.
    #[must_use]
    pub fn normalize(&self, position: Vec2) -> Vec2 {
        let half = self.center();
        let axis = |p: f32, h: f32| {
            if h > 0.0 {
                ((p - h) / h).clamp(-1.0, 1.0)
            } else {
                0.0
            }
        };
        Vec2::new(axis(position.x, half.x), axis(position.y, half.y))
    }
}

/// Joint rotation derived from the pointer, in radians.
///
/// Pointer right of center yaws positive; pointer above center pitches negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointAngles {
    pub pitch: f32,
    pub yaw: f32,
}

impl JointAngles {
    /// `normalized` as returned by [`Viewport::normalize`]; `limit_degrees` is the
    /// largest deflection the joint may reach on either axis.
    #[must_use]
    pub fn from_pointer(normalized: Vec2, limit_degrees: f32) -> Self {
        let n = normalized.clamp(Vec2::NEG_ONE, Vec2::ONE);
        Self {
            pitch: (n.y * limit_degrees).to_radians(),
            yaw: (n.x * limit_degrees).to_radians(),
        }
    }

    #[must_use]
    pub fn pitch_degrees(&self) -> f32 {
        self.pitch.to_degrees()
    }

    #[must_use]
    pub fn yaw_degrees(&self) -> f32 {
        self.yaw.to_degrees()
    }
}
