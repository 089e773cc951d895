use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoNodeReferences};
use petgraph::Directed;
use petgraph::Direction::{Incoming, Outgoing};
use serde::{Deserialize, Serialize};

use crate::{metadata::Metadata, DefaultNodeShape, DisplayNode, DropPosition, Edge, Node};

type OutlineGraph<N, D> = StableGraph<Node<N, D>, Edge, Directed>;

/// Where a dragged node would land relative to the drop target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSlot {
    pub target: NodeIndex,
    pub position: DropPosition,
}

/// Wrapper around [`petgraph::stable_graph::StableGraph`] which keeps the
/// outline shape of the document: a single root, every other node reachable
/// through exactly one incoming edge, and each edge carrying its child's
/// position among the siblings.
///
/// The tree is rebuilt wholesale when the outline text is re-parsed; nodes
/// carry stable string ids so state keyed on ids (like recorded sibling
/// orders) survives the rebuild. The id lookup table gives O(1) resolution
/// without a full-tree search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree<N = (), D = DefaultNodeShape>
where
    N: Clone,
    D: DisplayNode<N>,
{
    g: OutlineGraph<N, D>,
    root: NodeIndex,
    ids: HashMap<String, NodeIndex>,

    /// Bumped on every structural or arrangement-relevant change; layouts
    /// re-run when the revision they applied no longer matches.
    revision: u64,

    selected_nodes: Vec<NodeIndex>,
    dragged_node: Option<NodeIndex>,
    hovered_node: Option<NodeIndex>,
    drop_target: Option<DropSlot>,

    bounds: Rect,
}

impl<N, D> Tree<N, D>
where
    N: Clone,
    D: DisplayNode<N>,
{
    pub fn new(root: Node<N, D>) -> Self {
        let mut g = OutlineGraph::default();
        let root_id = root.id().to_owned();
        let idx = g.add_node(root);
        g[idx].set_index(idx);

        let mut ids = HashMap::new();
        ids.insert(root_id, idx);

        Self {
            g,
            root: idx,
            ids,
            revision: 0,
            selected_nodes: Vec::default(),
            dragged_node: Option::default(),
            hovered_node: Option::default(),
            drop_target: Option::default(),
            bounds: Rect::from_min_max(Pos2::ZERO, Pos2::ZERO),
        }
    }

    /// Appends `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, node: Node<N, D>) -> NodeIndex {
        debug_assert!(
            !self.ids.contains_key(node.id()),
            "duplicate node id `{}`",
            node.id()
        );

        let position = self.g.edges_directed(parent, Outgoing).count();
        let id = node.id().to_owned();

        let idx = self.g.add_node(node);
        self.g[idx].set_index(idx);
        self.g.add_edge(parent, idx, Edge::new(position));
        self.ids.insert(id, idx);
        self.revision += 1;

        idx
    }

    pub fn g(&self) -> &OutlineGraph<N, D> {
        &self.g
    }

    pub fn g_mut(&mut self) -> &mut OutlineGraph<N, D> {
        &mut self.g
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node<N, D>> {
        self.g.node_weight(idx)
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut Node<N, D>> {
        self.g.node_weight_mut(idx)
    }

    /// Resolves a stable node id to the index valid for the current tree.
    pub fn node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    /// Provides iterator over all nodes and their indices.
    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeIndex, &Node<N, D>)> {
        self.g.node_references()
    }

    /// The parent of `idx`, `None` for the root.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.g.edges_directed(idx, Incoming).next().map(|e| e.source())
    }

    /// Children of `idx` ordered by their sibling positions.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<(usize, NodeIndex)> = self
            .g
            .edges_directed(idx, Outgoing)
            .map(|e| (e.weight().position(), e.target()))
            .collect();
        out.sort_by_key(|(position, _)| *position);
        out.into_iter().map(|(_, child)| child).collect()
    }

    /// Ids of the children of `idx`, in sibling order.
    pub fn child_ids(&self, idx: NodeIndex) -> Vec<String> {
        self.children(idx)
            .into_iter()
            .filter_map(|c| self.node(c).map(|n| n.id().to_owned()))
            .collect()
    }

    /// Writes `sequence` back as the sibling positions of `parent`'s children.
    pub(crate) fn set_child_sequence(&mut self, parent: NodeIndex, sequence: &[NodeIndex]) {
        for (position, &child) in sequence.iter().enumerate() {
            if let Some(e) = self.g.find_edge(parent, child) {
                self.g[e].set_position(position);
            }
        }
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Forces layouts to recompute node positions on the next frame.
    pub fn bump_revision(&mut self) {
        self.revision += 1;
    }

    /// The direction along which `idx` and its siblings are arranged on the
    /// canvas. `exclude` ignores a node (the one currently being dragged)
    /// whose position is transient.
    pub fn sibling_axis(&self, idx: NodeIndex, exclude: Option<NodeIndex>) -> Vec2 {
        let Some(parent) = self.parent(idx) else {
            return Vec2::DOWN;
        };
        let mut siblings = self.children(parent);
        if let Some(excluded) = exclude {
            siblings.retain(|&s| s != excluded);
        }
        let Some(i) = siblings.iter().position(|&s| s == idx) else {
            return Vec2::DOWN;
        };

        let loc = |s: NodeIndex| self.node(s).map(Node::location);
        let here = loc(idx).unwrap_or_default();
        let prev = i.checked_sub(1).and_then(|j| siblings.get(j).copied()).and_then(loc);
        let next = siblings.get(i + 1).copied().and_then(loc);

        let dir = match (prev, next) {
            (Some(p), Some(n)) => n - p,
            (Some(p), None) => here - p,
            (None, Some(n)) => n - here,
            (None, None) => Vec2::ZERO,
        };
        if dir.length() > f32::EPSILON {
            dir.normalized()
        } else {
            Vec2::DOWN
        }
    }

    /// Finds node by position. Can be optimized by using a spatial index like quad-tree if needed.
    pub fn node_by_screen_pos(&self, meta: &Metadata, screen_pos: Pos2) -> Option<NodeIndex> {
        let pos_in_canvas = meta.screen_to_canvas_pos(screen_pos);
        for (idx, node) in self.nodes_iter() {
            if node.display().is_inside(pos_in_canvas) {
                return Some(idx);
            }
        }
        None
    }

    /// Same as [`Self::node_by_screen_pos`], skipping `exclude` — the dragged
    /// node follows the pointer and would otherwise always win the hit-test.
    pub fn node_by_screen_pos_excluding(
        &self,
        meta: &Metadata,
        screen_pos: Pos2,
        exclude: NodeIndex,
    ) -> Option<NodeIndex> {
        let pos_in_canvas = meta.screen_to_canvas_pos(screen_pos);
        for (idx, node) in self.nodes_iter() {
            if idx != exclude && node.display().is_inside(pos_in_canvas) {
                return Some(idx);
            }
        }
        None
    }

    pub fn selected_nodes(&self) -> &[NodeIndex] {
        &self.selected_nodes
    }

    pub fn set_selected_nodes(&mut self, nodes: Vec<NodeIndex>) {
        self.selected_nodes = nodes;
    }

    pub fn dragged_node(&self) -> Option<NodeIndex> {
        self.dragged_node
    }

    pub fn set_dragged_node(&mut self, node: Option<NodeIndex>) {
        self.dragged_node = node;
    }

    pub fn hovered_node(&self) -> Option<NodeIndex> {
        self.hovered_node
    }

    pub fn set_hovered_node(&mut self, node: Option<NodeIndex>) {
        self.hovered_node = node;
    }

    pub fn drop_target(&self) -> Option<DropSlot> {
        self.drop_target
    }

    pub fn set_drop_target(&mut self, slot: Option<DropSlot>) {
        self.drop_target = slot;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }
}
