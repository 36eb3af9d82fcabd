//! Debug tweak panel.
//!
//! A GUI-independent registry of the live-tweakable settings, grouped in folders.
//! A host GUI lists [`TweakPanel::tweaks`], renders a widget per [`TweakKind`], and
//! routes edits through [`TweakPanel::set`], which validates, clamps and snaps the
//! value before writing it into [`StageSettings`].

use crate::errors::{Result, StageError};
use crate::settings::StageSettings;

/// Smallest gap the camera's far plane keeps above the near plane.
pub const NEAR_FAR_GAP: f32 = 0.1;

/// Range of the XYZ position controls.
const POSITION_RANGE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweakKind {
    Range { min: f32, max: f32, step: Option<f32> },
    Toggle,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweakValue {
    Number(f32),
    Bool(bool),
    /// `0xRRGGBB`
    Color(u32),
}

#[derive(Clone, Copy)]
enum Binding {
    Number {
        get: fn(&StageSettings) -> f32,
        set: fn(&mut StageSettings, f32),
    },
    Bool {
        get: fn(&StageSettings) -> bool,
        set: fn(&mut StageSettings, bool),
    },
    Color {
        get: fn(&StageSettings) -> u32,
        set: fn(&mut StageSettings, u32),
    },
}

#[derive(Clone, Copy)]
pub struct Tweak {
    pub folder: &'static str,
    pub name: &'static str,
    pub kind: TweakKind,
    binding: Binding,
}

impl std::fmt::Debug for Tweak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tweak")
            .field("folder", &self.folder)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Tweak {
    /// `"Folder/name"`
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.folder, self.name)
    }

    fn range(
        folder: &'static str,
        name: &'static str,
        (min, max): (f32, f32),
        step: Option<f32>,
        get: fn(&StageSettings) -> f32,
        set: fn(&mut StageSettings, f32),
    ) -> Self {
        Self {
            folder,
            name,
            kind: TweakKind::Range { min, max, step },
            binding: Binding::Number { get, set },
        }
    }

    fn toggle(
        folder: &'static str,
        name: &'static str,
        get: fn(&StageSettings) -> bool,
        set: fn(&mut StageSettings, bool),
    ) -> Self {
        Self {
            folder,
            name,
            kind: TweakKind::Toggle,
            binding: Binding::Bool { get, set },
        }
    }

    fn color(
        folder: &'static str,
        name: &'static str,
        get: fn(&StageSettings) -> u32,
        set: fn(&mut StageSettings, u32),
    ) -> Self {
        Self {
            folder,
            name,
            kind: TweakKind::Color,
            binding: Binding::Color { get, set },
        }
    }

    #[must_use]
    pub fn get(&self, settings: &StageSettings) -> TweakValue {
        match self.binding {
            Binding::Number { get, .. } => TweakValue::Number(get(settings)),
            Binding::Bool { get, .. } => TweakValue::Bool(get(settings)),
            Binding::Color { get, .. } => TweakValue::Color(get(settings)),
        }
    }

    fn apply(&self, settings: &mut StageSettings, value: TweakValue) -> Result<TweakValue> {
        match (self.binding, value) {
            (Binding::Number { set, .. }, TweakValue::Number(v)) => {
                set(settings, self.constrain(v));
            }
            (Binding::Bool { set, .. }, TweakValue::Bool(v)) => set(settings, v),
            (Binding::Color { set, .. }, TweakValue::Color(v)) => set(settings, v & 0x00ff_ffff),
            (binding, _) => {
                return Err(StageError::TweakTypeMismatch {
                    path: self.path(),
                    expected: match binding {
                        Binding::Number { .. } => "number",
                        Binding::Bool { .. } => "bool",
                        Binding::Color { .. } => "color",
                    },
                });
            }
        }
        Ok(self.get(settings))
    }

    /// Snaps to a multiple of the step, then clamps into the range.
    fn constrain(&self, value: f32) -> f32 {
        let TweakKind::Range { min, max, step } = self.kind else {
            return value;
        };
        let snapped = match step {
            Some(step) if step > 0.0 => (value / step).round() * step,
            _ => value,
        };
        snapped.clamp(min, max)
    }
}

/// `range!(folder, name, (min, max), step, field.path)` binds a number field.
macro_rules! range {
    ($folder:expr, $name:expr, $range:expr, $step:expr, $($field:ident).+ $(,)?) => {
        Tweak::range($folder, $name, $range, $step, |s| s.$($field).+, |s, v| {
            s.$($field).+ = v;
        })
    };
}

macro_rules! toggle {
    ($folder:expr, $name:expr, $($field:ident).+ $(,)?) => {
        Tweak::toggle($folder, $name, |s| s.$($field).+, |s, v| s.$($field).+ = v)
    };
}

macro_rules! color {
    ($folder:expr, $name:expr, $($field:ident).+ $(,)?) => {
        Tweak::color($folder, $name, |s| s.$($field).+, |s, v| s.$($field).+ = v)
    };
}

fn set_near(s: &mut StageSettings, near: f32) {
    s.camera.near = near;
    s.camera.far = s.camera.far.max(near + NEAR_FAR_GAP);
}

fn set_far(s: &mut StageSettings, far: f32) {
    s.camera.far = far;
    let near = s.camera.near;
    set_near(s, near);
}

#[derive(Debug, Clone)]
pub struct TweakPanel {
    tweaks: Vec<Tweak>,
}

impl TweakPanel {
    /// The stage's controls: Camera, Postprocessing, Fog, Directional Light and
    /// Hemisphere Light.
    #[must_use]
    pub fn for_stage() -> Self {
        let p = (-POSITION_RANGE, POSITION_RANGE);
        let tweaks = vec![
            range!("Camera", "fov", (1.0, 180.0), None, camera.fov),
            Tweak::range("Camera", "near", (0.1, 50.0), Some(0.1), |s| s.camera.near, set_near),
            Tweak::range("Camera", "far", (0.1, 50.0), Some(0.1), |s| s.camera.far, set_far),
            range!("Camera", "position.x", p, None, camera.position.x),
            range!("Camera", "position.y", p, None, camera.position.y),
            range!("Camera", "position.z", p, None, camera.position.z),
            toggle!("Postprocessing", "grayscale", film.grayscale),
            range!("Postprocessing", "noise intensity", (0.0, 1.0), None, film.noise_intensity),
            range!(
                "Postprocessing",
                "scanline intensity",
                (0.0, 1.0),
                None,
                film.scanline_intensity,
            ),
            range!("Postprocessing", "scanline count", (0.0, 1000.0), None, film.scanline_count),
            color!("Fog", "color", fog.color),
            range!("Fog", "density", (0.0, 2.0), Some(0.01), fog.density),
            color!("Directional Light", "color", directional_light.color),
            range!(
                "Directional Light",
                "intensity",
                (0.0, 2.0),
                Some(0.01),
                directional_light.intensity,
            ),
            range!("Directional Light", "position.x", p, None, directional_light.position.x),
            range!("Directional Light", "position.y", p, None, directional_light.position.y),
            range!("Directional Light", "position.z", p, None, directional_light.position.z),
            range!("Directional Light", "target.x", p, None, directional_light.target.x),
            range!("Directional Light", "target.y", p, None, directional_light.target.y),
            range!("Directional Light", "target.z", p, None, directional_light.target.z),
            color!("Hemisphere Light", "sky color", hemisphere_light.sky_color),
            color!("Hemisphere Light", "ground color", hemisphere_light.ground_color),
            range!(
                "Hemisphere Light",
                "intensity",
                (0.0, 2.0),
                Some(0.01),
                hemisphere_light.intensity,
            ),
        ];
        Self { tweaks }
    }

    #[must_use]
    pub fn tweaks(&self) -> &[Tweak] {
        &self.tweaks
    }

    /// Folder names in registration order.
    #[must_use]
    pub fn folders(&self) -> Vec<&'static str> {
        let mut folders: Vec<&'static str> = Vec::new();
        for tweak in &self.tweaks {
            if !folders.contains(&tweak.folder) {
                folders.push(tweak.folder);
            }
        }
        folders
    }

    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Tweak> {
        let (folder, name) = path.split_once('/')?;
        self.tweaks
            .iter()
            .find(|t| t.folder == folder && t.name == name)
    }

    pub fn get(&self, path: &str, settings: &StageSettings) -> Result<TweakValue> {
        self.find(path)
            .map(|t| t.get(settings))
            .ok_or_else(|| StageError::UnknownTweak(path.to_string()))
    }

    /// Applies `value` and returns what was actually stored.
    pub fn set(
        &self,
        path: &str,
        value: TweakValue,
        settings: &mut StageSettings,
    ) -> Result<TweakValue> {
        let tweak = self
            .find(path)
            .ok_or_else(|| StageError::UnknownTweak(path.to_string()))?;
        let applied = tweak.apply(settings, value)?;
        log::debug!("Tweak {path} = {applied:?}");
        Ok(applied)
    }
}

/// Formats `0xRRGGBB` as `#rrggbb`.
#[must_use]
pub fn format_color(color: u32) -> String {
    format!("#{:06x}", color & 0x00ff_ffff)
}

/// Parses `#rrggbb` or `0xrrggbb`.
#[must_use]
pub fn parse_color(text: &str) -> Option<u32> {
    let hex = text
        .strip_prefix('#')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
