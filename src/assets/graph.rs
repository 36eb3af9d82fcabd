use crate::animation::AnimationClip;
use crate::scene::{NodeKind, Transform};

/// A node of a decoded asset. `parent` indexes into [`AssetGraph::nodes`].
#[derive(Debug, Clone)]
pub struct AssetNode {
    pub name: String,
    pub parent: Option<usize>,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl AssetNode {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            parent,
            transform: Transform::IDENTITY,
            kind,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Engine-neutral result of decoding a model: its node hierarchy and clips.
///
/// Instantiated into a [`Scene`](crate::scene::Scene) with
/// [`Scene::instantiate`](crate::scene::Scene::instantiate).
#[derive(Debug, Clone, Default)]
pub struct AssetGraph {
    pub nodes: Vec<AssetNode>,
    pub clips: Vec<AnimationClip>,
}

impl AssetGraph {
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Mesh(_)))
            .count()
    }
}
