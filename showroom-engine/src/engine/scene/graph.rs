use std::collections::HashMap;

use bevy::math::Affine3A;
use bevy::prelude::*;

use super::error::SceneError;
use crate::engine::render::materials::MaterialId;

/// Stable handle of a node inside the [`SceneGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub glow: bool,
    pub material: Option<MaterialId>,
    /// Half extents of the node's box geometry. Nodes without geometry are
    /// pure grouping nodes and are never drawn or hit.
    pub half_extents: Option<Vec3>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            visible: true,
            glow: false,
            material: None,
            half_extents: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_geometry(mut self, half_extents: Vec3, material: MaterialId) -> Self {
        self.half_extents = Some(half_extents);
        self.material = Some(material);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_mesh(&self) -> bool {
        self.half_extents.is_some()
    }
}

/// Flat arena of scene nodes keyed by [`NodeId`], with a name index built as
/// nodes are added. Parents always precede their children in the arena.
#[derive(Resource, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
    by_name: HashMap<String, NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent`. The first node registered under a name
    /// owns that name for lookups.
    pub fn add_node(
        &mut self,
        mut node: SceneNode,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        if let Some(parent) = parent {
            if parent.index() >= self.nodes.len() {
                return Err(SceneError::UnknownParentId(parent));
            }
        }

        let id = NodeId(self.nodes.len() as u32);
        node.parent = parent;
        node.children.clear();
        self.by_name.entry(node.name.clone()).or_insert(id);
        self.nodes.push(node);

        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.roots.push(id),
        }

        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.index())
    }

    /// Every node id in arena order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// The node itself followed by each ancestor up to its root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.get(id).map(|_| id),
        }
    }

    /// Walk from `node` towards the root and return the first node named `name`.
    pub fn ancestor_match(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.ancestors(node)
            .find(|id| self.nodes[id.index()].name == name)
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    pub fn ancestor_match_id(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Depth-first pre-order traversal, children in insertion order.
    pub fn traverse(&self, mut visit: impl FnMut(NodeId, &SceneNode)) {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            visit(id, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Local transforms composed from the root down to `id`.
    pub fn world_affine(&self, id: NodeId) -> Affine3A {
        let chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.iter().rev().fold(Affine3A::IDENTITY, |world, node| {
            world * self.nodes[node.index()].transform.compute_affine()
        })
    }

    /// A node is drawn and hit only if it and all its ancestors are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.ancestors(id).all(|node| self.nodes[node.index()].visible)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_glow(&mut self, id: NodeId, glow: bool) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.glow = glow;
                true
            }
            None => false,
        }
    }

    pub fn is_glow(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| node.glow)
    }

    pub fn material(&self, id: NodeId) -> Option<MaterialId> {
        self.get(id).and_then(|node| node.material)
    }

    pub(crate) fn set_material(&mut self, id: NodeId, material: Option<MaterialId>) {
        if let Some(node) = self.get_mut(id) {
            node.material = material;
        }
    }
}

pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.nodes[current.index()].parent;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SceneGraph, NodeId, NodeId, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(SceneNode::new("showroom"), None).unwrap();
        let board = graph
            .add_node(
                SceneNode::new("billboard_signup")
                    .with_transform(Transform::from_xyz(10.0, 0.0, 0.0)),
                Some(root),
            )
            .unwrap();
        let frame = graph
            .add_node(
                SceneNode::new("billboard_frame")
                    .with_transform(Transform::from_xyz(0.0, 2.0, 0.0)),
                Some(board),
            )
            .unwrap();
        let floor = graph.add_node(SceneNode::new("floor"), Some(root)).unwrap();
        (graph, root, board, frame, floor)
    }

    #[test]
    fn lookup_by_name_returns_first_registration() {
        let (mut graph, root, board, _, _) = sample();
        graph.add_node(SceneNode::new("billboard_signup"), Some(root)).unwrap();

        assert_eq!(graph.lookup_by_name("billboard_signup"), Some(board));
        assert_eq!(graph.lookup_by_name("missing"), None);
    }

    #[test]
    fn ancestor_match_includes_the_node_itself() {
        let (graph, root, board, frame, floor) = sample();

        assert_eq!(graph.ancestor_match(frame, "billboard_signup"), Some(board));
        assert_eq!(graph.ancestor_match(board, "billboard_signup"), Some(board));
        assert_eq!(graph.ancestor_match(frame, "showroom"), Some(root));
        assert_eq!(graph.ancestor_match(floor, "billboard_signup"), None);
        assert!(graph.ancestor_match_id(frame, root));
        assert!(!graph.ancestor_match_id(board, frame));
    }

    #[test]
    fn traverse_visits_parents_before_children_in_order() {
        let (graph, root, board, frame, floor) = sample();
        let mut order = Vec::new();
        graph.traverse(|id, _| order.push(id));

        assert_eq!(order, vec![root, board, frame, floor]);
    }

    #[test]
    fn world_affine_composes_parent_chain() {
        let (graph, _, _, frame, _) = sample();
        let world = graph.world_affine(frame);

        assert_eq!(world.transform_point3(Vec3::ZERO), Vec3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let (mut graph, _, board, frame, floor) = sample();
        graph.set_visible(board, false);

        assert!(!graph.is_effectively_visible(frame));
        assert!(graph.is_effectively_visible(floor));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let (mut graph, ..) = sample();
        let foreign = NodeId(99);

        assert_eq!(
            graph.add_node(SceneNode::new("orphan"), Some(foreign)),
            Err(SceneError::UnknownParentId(foreign))
        );
    }

    #[test]
    fn setters_ignore_unknown_ids() {
        let (mut graph, ..) = sample();
        let foreign = NodeId(42);

        assert!(!graph.set_visible(foreign, false));
        assert!(!graph.set_glow(foreign, true));
        assert!(!graph.is_effectively_visible(foreign));
        assert_eq!(graph.material(foreign), None);
    }
}
