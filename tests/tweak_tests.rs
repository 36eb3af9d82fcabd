//! Debug Panel Tests
//!
//! Tests for:
//! - Folder layout and path lookup
//! - Range clamping and step snapping
//! - Camera near/far coupling
//! - Type mismatches and unknown paths
//! - Color formatting and parsing

use mutant_stage::errors::StageError;
use mutant_stage::settings::StageSettings;
use mutant_stage::tweaks::{
    NEAR_FAR_GAP, TweakKind, TweakPanel, TweakValue, format_color, parse_color,
};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn number(value: TweakValue) -> f32 {
    match value {
        TweakValue::Number(v) => v,
        other => panic!("expected a number, got {other:?}"),
    }
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn folders_in_registration_order() {
    let panel = TweakPanel::for_stage();
    assert_eq!(
        panel.folders(),
        vec![
            "Camera",
            "Postprocessing",
            "Fog",
            "Directional Light",
            "Hemisphere Light"
        ]
    );
}

#[test]
fn every_path_resolves_to_its_tweak() {
    let panel = TweakPanel::for_stage();
    for tweak in panel.tweaks() {
        let found = panel.find(&tweak.path()).unwrap();
        assert_eq!(found.folder, tweak.folder);
        assert_eq!(found.name, tweak.name);
    }
    assert!(panel.find("Camera").is_none());
}

#[test]
fn reads_current_settings() {
    let panel = TweakPanel::for_stage();
    let settings = StageSettings::default();

    assert!(approx(number(panel.get("Camera/fov", &settings).unwrap()), 51.0));
    assert_eq!(
        panel.get("Postprocessing/grayscale", &settings).unwrap(),
        TweakValue::Bool(false)
    );
    assert_eq!(
        panel.get("Hemisphere Light/sky color", &settings).unwrap(),
        TweakValue::Color(0x00ff_eeb1)
    );
}

#[test]
fn every_tweak_writes_its_own_field() {
    let panel = TweakPanel::for_stage();

    for tweak in panel.tweaks() {
        let mut settings = StageSettings::default();
        let path = tweak.path();
        let value = match tweak.kind {
            TweakKind::Range { min, max, .. } => TweakValue::Number(min + (max - min) * 0.75),
            TweakKind::Toggle => TweakValue::Bool(true),
            TweakKind::Color => TweakValue::Color(0x0012_3456),
        };

        let applied = panel.set(&path, value, &mut settings).unwrap();
        assert_eq!(panel.get(&path, &settings).unwrap(), applied);
        assert_ne!(settings, StageSettings::default(), "{path} changed nothing");
    }
}

// ============================================================================
// Ranges
// ============================================================================

#[test]
fn range_values_are_clamped() {
    let panel = TweakPanel::for_stage();
    let mut settings = StageSettings::default();

    let applied = panel
        .set("Camera/fov", TweakValue::Number(500.0), &mut settings)
        .unwrap();
    assert!(approx(number(applied), 180.0));
    assert!(approx(settings.camera.fov, 180.0));

    panel
        .set("Fog/density", TweakValue::Number(-1.0), &mut settings)
        .unwrap();
    assert!(approx(settings.fog.density, 0.0));

    panel
        .set("Directional Light/position.y", TweakValue::Number(25.0), &mut settings)
        .unwrap();
    assert!(approx(settings.directional_light.position.y, 10.0));
}

#[test]
fn stepped_values_snap() {
    let panel = TweakPanel::for_stage();
    let mut settings = StageSettings::default();

    panel
        .set("Fog/density", TweakValue::Number(0.0349), &mut settings)
        .unwrap();
    assert!(approx(settings.fog.density, 0.03));

    let tweak = panel.find("Fog/density").unwrap();
    assert_eq!(
        tweak.kind,
        TweakKind::Range {
            min: 0.0,
            max: 2.0,
            step: Some(0.01),
        }
    );
}

#[test]
fn far_never_drops_below_near() {
    let panel = TweakPanel::for_stage();
    let mut settings = StageSettings::default();

    panel
        .set("Camera/near", TweakValue::Number(5.0), &mut settings)
        .unwrap();
    panel
        .set("Camera/far", TweakValue::Number(1.0), &mut settings)
        .unwrap();
    assert!(approx(settings.camera.near, 5.0));
    assert!(approx(settings.camera.far, 5.0 + NEAR_FAR_GAP));

    // Raising near past far pushes far along.
    panel
        .set("Camera/far", TweakValue::Number(20.0), &mut settings)
        .unwrap();
    panel
        .set("Camera/near", TweakValue::Number(30.0), &mut settings)
        .unwrap();
    assert!(approx(settings.camera.near, 30.0));
    assert!(settings.camera.far >= settings.camera.near + NEAR_FAR_GAP - EPSILON);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn wrong_value_kind_is_rejected() {
    let panel = TweakPanel::for_stage();
    let mut settings = StageSettings::default();

    let result = panel.set("Postprocessing/grayscale", TweakValue::Number(1.0), &mut settings);
    assert!(matches!(
        result,
        Err(StageError::TweakTypeMismatch { expected: "bool", .. })
    ));
    assert!(!settings.film.grayscale);
}

#[test]
fn unknown_path_is_rejected() {
    let panel = TweakPanel::for_stage();
    let mut settings = StageSettings::default();

    let result = panel.set("Camera/zoom", TweakValue::Number(2.0), &mut settings);
    assert!(matches!(result, Err(StageError::UnknownTweak(path)) if path == "Camera/zoom"));
    assert_eq!(settings, StageSettings::default());
}

#[test]
fn colors_are_masked_to_rgb() {
    let panel = TweakPanel::for_stage();
    let mut settings = StageSettings::default();

    panel
        .set("Fog/color", TweakValue::Color(0xff12_3456), &mut settings)
        .unwrap();
    assert_eq!(settings.fog.color, 0x0012_3456);
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn color_text_conversion() {
    assert_eq!(format_color(0x00e0_e0ce), "#e0e0ce");
    assert_eq!(format_color(0x0000_0820), "#000820");

    assert_eq!(parse_color("#ffeeb1"), Some(0x00ff_eeb1));
    assert_eq!(parse_color("0x080820"), Some(0x0008_0820));
    assert_eq!(parse_color("ffeeb1"), None);
    assert_eq!(parse_color("#fff"), None);
    assert_eq!(parse_color("#+12345"), None);
}
