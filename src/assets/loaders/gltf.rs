//! glTF / GLB decoding into an [`AssetGraph`].
//!
//! Only what the stage needs is read: node names, hierarchy and TRS, which nodes
//! are skin joints or meshes (plus the mesh's roughness texture), and the
//! translation / rotation / scale animation channels. Geometry and materials stay
//! with the host renderer.

use base64::Engine;
use glam::{Quat, Vec3};
use rustc_hash::FxHashSet;

use crate::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use crate::assets::graph::{AssetGraph, AssetNode};
use crate::assets::io::{AssetReaderVariant, resolve_sibling};
use crate::errors::{Result, StageError};
use crate::scene::{MeshInfo, NodeKind, Transform};

/// Reads `uri` and any external buffers it references, then decodes it.
pub async fn load_gltf(reader: &AssetReaderVariant, uri: &str) -> Result<AssetGraph> {
    let bytes = reader.read_bytes(uri).await?;
    let gltf = gltf::Gltf::from_slice_without_validation(&bytes)?;

    let mut buffers = Vec::with_capacity(gltf.buffers().len());
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Uri(buffer_uri) if !buffer_uri.starts_with("data:") => {
                reader.read_bytes(&resolve_sibling(uri, buffer_uri)).await?
            }
            source => embedded_buffer(&gltf, source)?,
        };
        buffers.push(data);
    }

    build_graph(&gltf, &buffers)
}

/// Decodes a self-contained asset: GLB, or glTF whose buffers are data URIs.
pub fn parse_gltf(bytes: &[u8]) -> Result<AssetGraph> {
    let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;
    let buffers = gltf
        .buffers()
        .map(|buffer| embedded_buffer(&gltf, buffer.source()))
        .collect::<Result<Vec<_>>>()?;
    build_graph(&gltf, &buffers)
}

fn embedded_buffer(gltf: &gltf::Gltf, source: gltf::buffer::Source<'_>) -> Result<Vec<u8>> {
    match source {
        gltf::buffer::Source::Bin => gltf
            .blob
            .clone()
            .ok_or_else(|| StageError::GltfError("Missing GLB binary chunk".to_string())),
        gltf::buffer::Source::Uri(uri) => decode_data_uri(uri),
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let Some((_, payload)) = uri.split_once(";base64,") else {
        return Err(StageError::GltfError(format!(
            "External buffer '{uri}' needs a reader"
        )));
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|err| StageError::GltfError(format!("Bad data URI: {err}")))
}

fn node_name(node: &gltf::Node<'_>) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

fn mesh_info(mesh: &gltf::Mesh<'_>) -> MeshInfo {
    let roughness_map = mesh.primitives().find_map(|primitive| {
        primitive
            .material()
            .pbr_metallic_roughness()
            .metallic_roughness_texture()
            .map(|info| info.texture().index())
    });
    MeshInfo { roughness_map }
}

/// Builds the graph from a parsed document and its resolved buffers.
pub fn build_graph(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<AssetGraph> {
    let joints: FxHashSet<usize> = gltf
        .skins()
        .flat_map(|skin| skin.joints().map(|joint| joint.index()).collect::<Vec<_>>())
        .collect();

    let mut parents = vec![None; gltf.nodes().len()];
    for node in gltf.nodes() {
        for child in node.children() {
            if let Some(slot) = parents.get_mut(child.index()) {
                *slot = Some(node.index());
            }
        }
    }

    let nodes = gltf
        .nodes()
        .map(|node| {
            let kind = if joints.contains(&node.index()) {
                NodeKind::Bone
            } else if let Some(mesh) = node.mesh() {
                NodeKind::Mesh(mesh_info(&mesh))
            } else {
                NodeKind::Group
            };

            let (t, r, s) = node.transform().decomposed();
            AssetNode::new(node_name(&node), parents[node.index()], kind).with_transform(
                Transform::from_trs(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s)),
            )
        })
        .collect();

    Ok(AssetGraph {
        nodes,
        clips: load_animations(gltf, buffers),
    })
}

/// Cubic-spline outputs store `[in_tangent, value, out_tangent]` per key; keep the values.
fn keyframe_values<T>(values: impl Iterator<Item = T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.skip(1).step_by(3).collect()
    } else {
        values.collect()
    }
}

fn keyframe_track<T: crate::animation::values::Interpolatable>(
    mut times: Vec<f32>,
    mut values: Vec<T>,
    interpolation: InterpolationMode,
) -> KeyframeTrack<T> {
    let len = times.len().min(values.len());
    times.truncate(len);
    values.truncate(len);
    KeyframeTrack::new(times, values, interpolation)
}

fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Vec<AnimationClip> {
    use gltf::animation::util::ReadOutputs;

    let mut clips = Vec::new();

    for anim in gltf.animations() {
        let clip_name = anim
            .name()
            .map_or_else(|| format!("anim_{}", anim.index()), str::to_string);
        let mut tracks = Vec::new();

        for channel in anim.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let Some(target_node) = channel.target().node() else {
                log::debug!("Clip '{clip_name}': channel without a target node skipped");
                continue;
            };
            let node_name = node_name(&target_node);

            let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs())
            else {
                log::warn!("Clip '{clip_name}': unreadable channel for '{node_name}', skipped");
                continue;
            };
            let times: Vec<f32> = inputs.collect();

            let (interpolation, cubic) = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => (InterpolationMode::Linear, false),
                gltf::animation::Interpolation::Step => (InterpolationMode::Step, false),
                gltf::animation::Interpolation::CubicSpline => (InterpolationMode::Linear, true),
            };

            let (target, data) = match outputs {
                ReadOutputs::Translations(iter) => (
                    TargetPath::Translation,
                    TrackData::Vector3(keyframe_track(
                        times,
                        keyframe_values(iter.map(Vec3::from_array), cubic),
                        interpolation,
                    )),
                ),
                ReadOutputs::Rotations(iter) => (
                    TargetPath::Rotation,
                    TrackData::Quaternion(keyframe_track(
                        times,
                        keyframe_values(iter.into_f32().map(Quat::from_array), cubic),
                        interpolation,
                    )),
                ),
                ReadOutputs::Scales(iter) => (
                    TargetPath::Scale,
                    TrackData::Vector3(keyframe_track(
                        times,
                        keyframe_values(iter.map(Vec3::from_array), cubic),
                        interpolation,
                    )),
                ),
                ReadOutputs::MorphTargetWeights(_) => {
                    log::debug!("Clip '{clip_name}': morph weights on '{node_name}' skipped");
                    continue;
                }
            };

            tracks.push(Track {
                meta: TrackMeta { node_name, target },
                data,
            });
        }

        clips.push(AnimationClip::new(clip_name, tracks));
    }

    clips
}
