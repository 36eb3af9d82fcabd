//! Stage configuration.
//!
//! Every group deserializes with `#[serde(default)]`, so a settings file only
//! needs the values it overrides. Colors are `0xRRGGBB`.

use std::f32::consts::PI;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::{HandoffSettings, ReleasePolicy};
use crate::errors::Result;
use crate::input::TapSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StageSettings {
    pub assets: AssetSettings,
    pub renderer: RendererSettings,
    pub camera: CameraSettings,
    pub orbit: OrbitSettings,
    pub fog: FogSettings,
    pub film: FilmSettings,
    pub directional_light: DirectionalLightSettings,
    pub hemisphere_light: HemisphereLightSettings,
    pub ambience: AmbienceSettings,
    pub character: CharacterSettings,
    pub gestures: TapSettings,
}

impl StageSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Where assets come from. `base_url` is a directory path or an `http(s)://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub base_url: String,
    pub terrain: String,
    pub character: String,
    pub ambience: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            base_url: "./assets/".to_string(),
            terrain: "terrain/terrain.glb".to_string(),
            character: "mutant/mutant.glb".to_string(),
            ambience: "sounds/ambience.ogg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    None,
    Linear,
    #[default]
    Reinhard,
    AcesFilmic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub clear_color: u32,
    pub antialias: bool,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub shadows: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            clear_color: 0x00e0_e0ce,
            antialias: true,
            tone_mapping: ToneMapping::Reinhard,
            exposure: 2.3,
            shadows: true,
        }
    }
}

/// Perspective camera. `fov` is vertical, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 51.0,
            near: 0.01,
            far: 1000.0,
            position: Vec3::new(8.0, 0.9, 8.4),
        }
    }
}

/// Orbit controller limits. Angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub damping: bool,
    pub zoom: bool,
    pub pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_polar_angle: f32,
    pub min_azimuth_angle: f32,
    pub max_azimuth_angle: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            damping: true,
            zoom: true,
            pan: false,
            min_distance: 5.0,
            max_distance: 10.0,
            max_polar_angle: 29.0 * PI / 60.0,
            min_azimuth_angle: 0.0,
            max_azimuth_angle: PI / 2.0,
        }
    }
}

/// Exponential-squared fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    pub color: u32,
    pub density: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            color: RendererSettings::default().clear_color,
            density: 0.025,
        }
    }
}

/// Film grain / scanline post-processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmSettings {
    pub noise_intensity: f32,
    pub scanline_intensity: f32,
    pub scanline_count: f32,
    pub grayscale: bool,
}

impl Default for FilmSettings {
    fn default() -> Self {
        Self {
            noise_intensity: 0.09,
            scanline_intensity: 0.025,
            scanline_count: 648.0,
            grayscale: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightSettings {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
}

impl Default for DirectionalLightSettings {
    fn default() -> Self {
        Self {
            color: 0x00ff_ffff,
            intensity: 1.0,
            position: Vec3::new(10.0, 10.0, 20.0),
            target: Vec3::ZERO,
            cast_shadow: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HemisphereLightSettings {
    pub sky_color: u32,
    pub ground_color: u32,
    pub intensity: f32,
}

impl Default for HemisphereLightSettings {
    fn default() -> Self {
        Self {
            sky_color: 0x00ff_eeb1,
            ground_color: 0x0008_0820,
            intensity: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbienceSettings {
    pub looping: bool,
    pub volume: f32,
}

impl Default for AmbienceSettings {
    fn default() -> Self {
        Self {
            looping: true,
            volume: 0.7,
        }
    }
}

/// The animated character: rig names, steering limits and hand-off timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    pub idle_clip: String,
    pub neck_bone: String,
    pub neck_limit_degrees: f32,
    pub waist_bone: String,
    pub waist_limit_degrees: f32,
    /// Seconds.
    pub blend_in: f32,
    /// Seconds.
    pub blend_out: f32,
    /// Seconds between automatic switch requests.
    pub switch_interval: f32,
    /// Yaw of the character root, radians.
    pub facing: f32,
    pub warp: bool,
    /// Strip clip tracks that drive the steered joints.
    pub exclusive_steering: bool,
    pub release: ReleasePolicy,
    /// Fixed seed for clip selection; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            idle_clip: "Idle".to_string(),
            neck_bone: "MutantNeck".to_string(),
            neck_limit_degrees: 60.0,
            waist_bone: "MutantSpine".to_string(),
            waist_limit_degrees: 40.0,
            blend_in: 0.25,
            blend_out: 0.25,
            switch_interval: 120.0,
            facing: PI / 3.0,
            warp: true,
            exclusive_steering: true,
            release: ReleasePolicy::OnReverseScheduled,
            seed: None,
        }
    }
}

impl CharacterSettings {
    #[must_use]
    pub fn handoff(&self) -> HandoffSettings {
        HandoffSettings {
            blend_in: self.blend_in,
            blend_out: self.blend_out,
            warp: self.warp,
            release: self.release,
        }
    }
}
