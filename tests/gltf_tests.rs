//! glTF Decoding Tests
//!
//! Tests for:
//! - Node names, hierarchy and local transforms
//! - Bone / mesh classification and the roughness texture
//! - Translation channels becoming clips
//! - Cubic-spline rotations, step scales and channels without a target node
//! - External buffers read next to the .gltf
//! - Instantiating a decoded graph into a scene

#![cfg(feature = "gltf")]

use base64::Engine;
use glam::{Quat, Vec3};

use mutant_stage::animation::{InterpolationMode, TargetPath, TrackData};
use mutant_stage::assets::AssetReaderVariant;
use mutant_stage::assets::loaders::{load_gltf, parse_gltf};
use mutant_stage::scene::{MeshInfo, NodeKind, Scene};

const EPSILON: f32 = 1e-5;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn approx_quat(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - EPSILON
}

/// A skinned two-bone rig with one mesh and a one-second "Idle" clip that lifts the
/// hips from y=0 to y=2. Buffer: times `[0, 1]` then two `VEC3` translations.
const RIG_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [{ "nodes": [0] }],
    "nodes": [
        { "name": "Mutant", "children": [1, 3] },
        { "name": "MutantHips", "children": [2], "translation": [0.0, 1.0, 0.0] },
        { "name": "MutantNeck", "scale": [2.0, 2.0, 2.0] },
        { "mesh": 0, "skin": 0 }
    ],
    "skins": [{ "joints": [1, 2] }],
    "meshes": [{ "primitives": [{ "attributes": {}, "material": 0 }] }],
    "materials": [{
        "pbrMetallicRoughness": { "metallicRoughnessTexture": { "index": 0 } }
    }],
    "textures": [{ "source": 0 }],
    "images": [{ "uri": "roughness.png" }],
    "buffers": [{
        "byteLength": 32,
        "uri": "data:application/octet-stream;base64,AAAAAAAAgD8AAAAAAAAAAAAAAAAAAAAAAAAAQAAAAAA="
    }],
    "bufferViews": [
        { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
        { "buffer": 0, "byteOffset": 8, "byteLength": 24 }
    ],
    "accessors": [
        { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR",
          "min": [0.0], "max": [1.0] },
        { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" }
    ],
    "animations": [{
        "name": "Idle",
        "channels": [{ "sampler": 0, "target": { "node": 1, "path": "translation" } }],
        "samplers": [{ "input": 0, "output": 1, "interpolation": "LINEAR" }]
    }]
}"#;

/// A "Headbang" clip on a neck bone: a CUBICSPLINE rotation from identity to
/// 1 rad about Z, a STEP scale from 1 to 2, and a scale channel with no target
/// node. Buffer: times `[0, 1]`, six `VEC4` (in-tangent, value, out-tangent per
/// key), then two `VEC3` scales.
const MOTION_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [{ "nodes": [0] }],
    "nodes": [
        { "name": "Mutant", "children": [1] },
        { "name": "MutantNeck" }
    ],
    "buffers": [{ "byteLength": 128, "uri": "BUFFER_URI" }],
    "bufferViews": [
        { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
        { "buffer": 0, "byteOffset": 8, "byteLength": 96 },
        { "buffer": 0, "byteOffset": 104, "byteLength": 24 }
    ],
    "accessors": [
        { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR",
          "min": [0.0], "max": [1.0] },
        { "bufferView": 1, "componentType": 5126, "count": 6, "type": "VEC4" },
        { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
    ],
    "animations": [{
        "name": "Headbang",
        "channels": [
            { "sampler": 0, "target": { "node": 1, "path": "rotation" } },
            { "sampler": 1, "target": { "node": 1, "path": "scale" } },
            { "sampler": 1, "target": { "path": "scale" } }
        ],
        "samplers": [
            { "input": 0, "output": 1, "interpolation": "CUBICSPLINE" },
            { "input": 0, "output": 2, "interpolation": "STEP" }
        ]
    }]
}"#;

fn motion_gltf(buffer_uri: &str) -> String {
    MOTION_GLTF.replace("BUFFER_URI", buffer_uri)
}

fn motion_data_uri() -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(motion_buffer());
    format!("data:application/octet-stream;base64,{payload}")
}

fn motion_buffer() -> Vec<u8> {
    let half = 0.5_f32;
    let mut floats: Vec<f32> = vec![0.0, 1.0];
    floats.extend([0.0; 4]);
    floats.extend([0.0, 0.0, 0.0, 1.0]);
    floats.extend([0.0; 8]);
    floats.extend([0.0, 0.0, half.sin(), half.cos()]);
    floats.extend([0.0; 4]);
    floats.extend([1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("mutant_stage_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================================
// Nodes
// ============================================================================

#[test]
fn nodes_keep_names_and_hierarchy() {
    let graph = parse_gltf(RIG_GLTF.as_bytes()).unwrap();

    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(graph.nodes[0].name, "Mutant");
    assert_eq!(graph.nodes[0].parent, None);
    assert_eq!(graph.nodes[1].parent, Some(0));
    assert_eq!(graph.nodes[2].parent, Some(1));
    assert_eq!(graph.nodes[3].parent, Some(0));

    // Unnamed nodes get an index-based name.
    assert_eq!(graph.nodes[3].name, "Node_3");
    assert_eq!(graph.find_node("MutantNeck"), Some(2));
}

#[test]
fn node_transforms_are_decoded() {
    let graph = parse_gltf(RIG_GLTF.as_bytes()).unwrap();

    assert!(approx_vec3(graph.nodes[1].transform.position, Vec3::Y));
    assert!(approx_vec3(graph.nodes[2].transform.scale, Vec3::splat(2.0)));
    assert!(approx_vec3(graph.nodes[0].transform.scale, Vec3::ONE));
}

#[test]
fn joints_are_bones_and_meshes_carry_roughness() {
    let graph = parse_gltf(RIG_GLTF.as_bytes()).unwrap();

    assert_eq!(graph.nodes[0].kind, NodeKind::Group);
    assert_eq!(graph.nodes[1].kind, NodeKind::Bone);
    assert_eq!(graph.nodes[2].kind, NodeKind::Bone);
    assert_eq!(
        graph.nodes[3].kind,
        NodeKind::Mesh(MeshInfo {
            roughness_map: Some(0),
        })
    );
    assert_eq!(graph.mesh_count(), 1);
}

// ============================================================================
// Animations
// ============================================================================

#[test]
fn translation_channel_becomes_a_clip() {
    let graph = parse_gltf(RIG_GLTF.as_bytes()).unwrap();

    assert_eq!(graph.clips.len(), 1);
    let clip = &graph.clips[0];
    assert_eq!(clip.name, "Idle");
    assert!((clip.duration - 1.0).abs() < EPSILON);
    assert_eq!(clip.tracks.len(), 1);

    let track = &clip.tracks[0];
    assert_eq!(track.meta.node_name, "MutantHips");
    assert_eq!(track.meta.target, TargetPath::Translation);

    let TrackData::Vector3(keys) = &track.data else {
        panic!("translation track should hold vectors");
    };
    assert!(approx_vec3(keys.sample(0.5).unwrap(), Vec3::Y));
    assert!(approx_vec3(keys.sample(1.0).unwrap(), Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn cubic_spline_rotation_keeps_only_the_values() {
    let graph = parse_gltf(motion_gltf(&motion_data_uri()).as_bytes()).unwrap();
    let clip = &graph.clips[0];
    assert_eq!(clip.name, "Headbang");

    let rotation = clip
        .tracks
        .iter()
        .find(|t| t.meta.target == TargetPath::Rotation)
        .unwrap();
    assert_eq!(rotation.meta.node_name, "MutantNeck");

    let TrackData::Quaternion(keys) = &rotation.data else {
        panic!("rotation track should hold quaternions");
    };
    // Tangents are dropped: two keys, not six.
    assert_eq!(keys.values.len(), 2);
    assert_eq!(keys.times, vec![0.0, 1.0]);
    assert!(approx_quat(keys.values[0], Quat::IDENTITY));
    assert!(approx_quat(keys.values[1], Quat::from_rotation_z(1.0)));
    assert!(approx_quat(keys.sample(0.5).unwrap(), Quat::from_rotation_z(0.5)));
}

#[test]
fn step_scale_holds_until_the_next_key() {
    let graph = parse_gltf(motion_gltf(&motion_data_uri()).as_bytes()).unwrap();
    let scale = graph.clips[0]
        .tracks
        .iter()
        .find(|t| t.meta.target == TargetPath::Scale)
        .unwrap();

    let TrackData::Vector3(keys) = &scale.data else {
        panic!("scale track should hold vectors");
    };
    assert_eq!(keys.interpolation, InterpolationMode::Step);
    assert!(approx_vec3(keys.sample(0.0).unwrap(), Vec3::ONE));
    assert!(approx_vec3(keys.sample(0.99).unwrap(), Vec3::ONE));
    assert!(approx_vec3(keys.sample(1.0).unwrap(), Vec3::splat(2.0)));
}

#[test]
fn channel_without_target_node_is_skipped() {
    let graph = parse_gltf(motion_gltf(&motion_data_uri()).as_bytes()).unwrap();
    let clip = &graph.clips[0];

    // Three channels in the file, two usable tracks.
    assert_eq!(clip.tracks.len(), 2);
    assert!(clip.tracks.iter().all(|t| t.meta.node_name == "MutantNeck"));
    assert!((clip.duration - 1.0).abs() < EPSILON);
}

#[tokio::test]
async fn external_buffer_is_read_next_to_the_gltf() {
    let dir = scratch_dir("gltf_bin");
    std::fs::create_dir_all(dir.join("models")).unwrap();
    std::fs::write(dir.join("models/motion.gltf"), motion_gltf("motion.bin")).unwrap();
    std::fs::write(dir.join("models/motion.bin"), motion_buffer()).unwrap();

    let reader = AssetReaderVariant::from_source(dir.to_str().unwrap()).unwrap();
    let graph = load_gltf(&reader, "models/motion.gltf").await.unwrap();

    assert_eq!(graph.find_node("MutantNeck"), Some(1));
    let clip = &graph.clips[0];
    assert_eq!(clip.tracks.len(), 2);
    let TrackData::Quaternion(keys) = &clip.tracks[0].data else {
        panic!("first track should be the rotation");
    };
    assert!(approx_quat(keys.sample(1.0).unwrap(), Quat::from_rotation_z(1.0)));
}

#[tokio::test]
async fn missing_external_buffer_is_an_error() {
    let dir = scratch_dir("gltf_no_bin");
    std::fs::write(dir.join("motion.gltf"), motion_gltf("motion.bin")).unwrap();

    let reader = AssetReaderVariant::from_source(dir.to_str().unwrap()).unwrap();
    assert!(load_gltf(&reader, "motion.gltf").await.is_err());
}

#[test]
fn garbage_is_an_error() {
    assert!(parse_gltf(b"not a model").is_err());
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn graph_instantiates_under_a_parent() {
    let graph = parse_gltf(RIG_GLTF.as_bytes()).unwrap();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Stage");

    let handles = scene.instantiate(&graph, root);
    assert_eq!(handles.len(), 4);

    let mutant = scene.find_by_name(root, "Mutant").unwrap();
    assert_eq!(scene.get_node(mutant).unwrap().parent(), Some(root));

    let neck = scene.find_by_name(root, "MutantNeck").unwrap();
    let hips = scene.find_by_name(root, "MutantHips").unwrap();
    assert_eq!(scene.get_node(neck).unwrap().parent(), Some(hips));
    assert!(scene.get_node(neck).unwrap().is_bone());
}
