use slotmap::SlotMap;

use crate::assets::AssetGraph;
use crate::scene::node::Node;
use crate::scene::NodeHandle;

/// Scene graph container.
///
/// Pure data: nodes live in a `SlotMap` and refer to each other by handle.
/// Handles of removed nodes simply stop resolving.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node as a new root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    /// Re-parents `child` under `parent`, detaching it from its previous parent
    /// (or from the root list).
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p) {
                n.children.retain(|&c| c != child);
            }
        } else {
            self.root_nodes.retain(|&r| r != child);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first search for a node named `name` in the subtree rooted at `root`
    /// (the root included).
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name == name {
            return Some(root);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_by_name(child, name))
    }

    /// Collects `root` and all of its descendants in depth-first pre-order.
    #[must_use]
    pub fn subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Visits every node of the subtree rooted at `root` mutably.
    pub fn traverse_mut(&mut self, root: NodeHandle, mut f: impl FnMut(NodeHandle, &mut Node)) {
        for handle in self.subtree(root) {
            if let Some(node) = self.nodes.get_mut(handle) {
                f(handle, node);
            }
        }
    }

    /// Copies the nodes of a loaded asset into the scene under `parent`.
    ///
    /// Asset nodes without a parent become children of `parent`. Returns the new
    /// handles, index-aligned with `graph.nodes`.
    pub fn instantiate(&mut self, graph: &AssetGraph, parent: NodeHandle) -> Vec<NodeHandle> {
        let handles: Vec<NodeHandle> = graph
            .nodes
            .iter()
            .map(|asset_node| {
                let mut node = Node::with_name(asset_node.name.clone());
                node.transform = asset_node.transform;
                node.kind = asset_node.kind.clone();
                self.add_node(node)
            })
            .collect();

        for (index, asset_node) in graph.nodes.iter().enumerate() {
            let target = asset_node
                .parent
                .and_then(|p| handles.get(p).copied())
                .unwrap_or(parent);
            self.attach(handles[index], target);
        }

        handles
    }
}
