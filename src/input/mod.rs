//! Input Bridge
//!
//! Turns raw pointer events from the host into stage actions: pointer movement
//! steers the character's head and waist, a double tap asks for an animation
//! switch. The bridge keeps no device state beyond the viewport size and the
//! tap recognizer.

pub mod gesture;
pub mod pointer;

use std::time::Duration;

use glam::Vec2;

pub use gesture::{DoubleTapRecognizer, TapSettings};
pub use pointer::{JointAngles, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved { position: Vec2 },
    PointerDown { position: Vec2 },
    PointerUp { position: Vec2 },
    /// A double tap already recognized by the host.
    DoubleTap,
    Resized { width: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Normalized pointer position, see [`Viewport::normalize`].
    Steer(Vec2),
    SwitchAnimation,
    Resize(Viewport),
}

#[derive(Debug)]
pub struct InputBridge {
    viewport: Viewport,
    taps: DoubleTapRecognizer,
}

impl InputBridge {
    #[must_use]
    pub fn new(viewport: Viewport, taps: TapSettings) -> Self {
        Self {
            viewport,
            taps: DoubleTapRecognizer::new(taps),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// `now` is the host's monotonic event time.
    pub fn translate(&mut self, event: InputEvent, now: Duration) -> Option<InputAction> {
        match event {
            InputEvent::PointerMoved { position } => {
                Some(InputAction::Steer(self.viewport.normalize(position)))
            }
            InputEvent::PointerDown { position } => {
                self.taps.pointer_down(position, now);
                None
            }
            InputEvent::PointerUp { position } => self
                .taps
                .pointer_up(position, now)
                .then_some(InputAction::SwitchAnimation),
            InputEvent::DoubleTap => Some(InputAction::SwitchAnimation),
            InputEvent::Resized { width, height } => {
                self.viewport = Viewport::new(width, height);
                Some(InputAction::Resize(self.viewport))
            }
        }
    }
}
