use crate::assets::{AssetGraph, AssetState};
use crate::scene::{NodeHandle, NodeKind, Scene};

pub const TERRAIN_NODE: &str = "Terrain";

/// Static environment. Its meshes receive shadows and render without a roughness map.
pub struct Terrain {
    node: NodeHandle,
    state: AssetState<usize>,
}

impl Terrain {
    pub fn new(scene: &mut Scene) -> Self {
        Self {
            node: scene.create_node_with_name(TERRAIN_NODE),
            state: AssetState::Pending,
        }
    }

    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    /// Loaded state carries the number of nodes instantiated.
    #[must_use]
    pub fn state(&self) -> &AssetState<usize> {
        &self.state
    }

    pub fn on_loaded(&mut self, scene: &mut Scene, graph: &AssetGraph) {
        let handles = scene.instantiate(graph, self.node);
        scene.traverse_mut(self.node, |_, node| {
            if let NodeKind::Mesh(mesh) = &mut node.kind {
                node.receive_shadow = true;
                mesh.roughness_map = None;
            }
        });
        log::info!("Terrain ready: {} nodes", handles.len());
        self.state = AssetState::Loaded(handles.len());
    }

    pub fn on_failed(&mut self, reason: impl Into<String>) {
        self.state.fail(reason);
    }
}
