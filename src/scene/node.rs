use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// Material facts the stage cares about for a mesh node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshInfo {
    /// Index of the roughness (metallic-roughness) texture, if any.
    pub roughness_map: Option<usize>,
}

/// What a node represents in the loaded asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Group,
    Mesh(MeshInfo),
    /// A skin joint.
    Bone,
}

/// A scene node.
///
/// # Hierarchy
///
/// - `parent`: Optional handle to parent node (None for root nodes)
/// - `children`: List of child node handles
///
/// Use [`Scene::attach`](crate::scene::Scene::attach) to keep both sides in sync.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub kind: NodeKind,

    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    #[inline]
    #[must_use]
    pub fn is_bone(&self) -> bool {
        matches!(self.kind, NodeKind::Bone)
    }
}
