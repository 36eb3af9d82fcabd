//! Scene Graph
//!
//! A deliberately small scene graph: named nodes with a TRS transform, a kind
//! (group, mesh or bone) and shadow flags. The host rendering engine owns the
//! actual drawables; objects in this crate only hold [`NodeHandle`]s into a
//! [`Scene`] and write transforms and flags through it.

pub mod node;
pub mod scene;
pub mod transform;

pub use node::{MeshInfo, Node, NodeKind};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Opaque handle to a node stored in a [`Scene`].
    pub struct NodeHandle;
}
