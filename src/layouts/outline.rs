use egui::Pos2;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::{
    layouts::{Layout, LayoutState},
    DisplayNode, Tree,
};

/// Orientation of the outline layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Levels grow to the right, siblings stack downward — the classic mind map.
    #[default]
    LeftRight,
    /// Levels grow downward (top-down tree).
    TopDown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// Tree revision the current node positions were computed for. Positions
    /// are recomputed whenever the tree moves past it.
    pub applied_revision: Option<u64>,
    /// Distance between levels.
    pub level_dist: f32,
    /// Distance between sibling lanes.
    pub lane_dist: f32,
    /// Center a parent across the span of its children.
    pub center_parent: bool,
    /// Layout orientation.
    pub orientation: Orientation,
}

impl Default for State {
    fn default() -> Self {
        Self {
            applied_revision: None,
            level_dist: 120.0,
            lane_dist: 40.0,
            center_parent: true,
            orientation: Orientation::LeftRight,
        }
    }
}

impl LayoutState for State {}

/// Arranges the tree by walking it pre-order and assigning every leaf the
/// next free lane; parents sit at their first child's lane or centered across
/// the span. Sibling lanes follow the ordered child sequences, so the visible
/// arrangement is exactly the recorded sibling order.
#[derive(Debug, Default)]
pub struct Outline {
    state: State,
}

impl Layout<State> for Outline {
    fn next<N, D>(&mut self, tree: &mut Tree<N, D>, _: &egui::Ui)
    where
        N: Clone,
        D: DisplayNode<N>,
    {
        if self.state.applied_revision == Some(tree.revision()) {
            return;
        }
        arrange(tree, &self.state);
        self.state.applied_revision = Some(tree.revision());
    }

    fn state(&self) -> State {
        self.state.clone()
    }

    fn from_state(state: State) -> impl Layout<State> {
        Outline { state }
    }
}

pub(crate) fn arrange<N, D>(tree: &mut Tree<N, D>, state: &State)
where
    N: Clone,
    D: DisplayNode<N>,
{
    let mut next_lane = 0usize;
    let root = tree.root();
    place(tree, root, 0, &mut next_lane, state);
}

/// Returns the (first, last) lane span of the subtree under `idx`.
fn place<N, D>(
    tree: &mut Tree<N, D>,
    idx: NodeIndex,
    level: usize,
    next_lane: &mut usize,
    state: &State,
) -> (usize, usize)
where
    N: Clone,
    D: DisplayNode<N>,
{
    let children = tree.children(idx);

    let (first, last) = if children.is_empty() {
        let lane = *next_lane;
        *next_lane += 1;
        (lane, lane)
    } else {
        let mut first = usize::MAX;
        let mut last = 0;
        for child in children {
            let (f, l) = place(tree, child, level + 1, next_lane, state);
            first = first.min(f);
            last = last.max(l);
        }
        (first, last)
    };

    let lane = if state.center_parent {
        (first + last) / 2
    } else {
        first
    };
    let (x, y) = match state.orientation {
        Orientation::LeftRight => (
            (level as f32) * state.level_dist,
            (lane as f32) * state.lane_dist,
        ),
        Orientation::TopDown => (
            (lane as f32) * state.lane_dist,
            (level as f32) * state.level_dist,
        ),
    };
    if let Some(n) = tree.node_mut(idx) {
        n.set_location(Pos2::new(x, y));
    }

    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_outline, reorder, DropPosition, SiblingOrders};

    #[test]
    fn lanes_follow_sibling_order() {
        let mut tree = parse_outline("Root\n  A\n  B\n  C\n").unwrap();
        arrange(&mut tree, &State::default());

        let y = |id: &str| tree.node(tree.node_by_id(id).unwrap()).unwrap().location().y;
        assert!(y("root/a") < y("root/b"));
        assert!(y("root/b") < y("root/c"));
    }

    #[test]
    fn rearranging_after_reorder_moves_lanes() {
        let mut tree = parse_outline("Root\n  A\n  B\n  C\n").unwrap();
        let mut orders = SiblingOrders::new();
        reorder(&mut tree, &mut orders, "root/c", "root/a", DropPosition::Before).unwrap();
        arrange(&mut tree, &State::default());

        let y = |id: &str| tree.node(tree.node_by_id(id).unwrap()).unwrap().location().y;
        assert!(y("root/c") < y("root/a"));
        assert!(y("root/a") < y("root/b"));
    }

    #[test]
    fn levels_grow_along_the_orientation() {
        let mut tree = parse_outline("Root\n  A\n    B\n").unwrap();
        arrange(&mut tree, &State::default());

        let x = |id: &str| tree.node(tree.node_by_id(id).unwrap()).unwrap().location().x;
        assert!(x("root") < x("root/a"));
        assert!(x("root/a") < x("root/a/b"));

        let state = State {
            orientation: Orientation::TopDown,
            ..State::default()
        };
        arrange(&mut tree, &state);
        let y = |id: &str| tree.node(tree.node_by_id(id).unwrap()).unwrap().location().y;
        assert!(y("root") < y("root/a"));
    }

    #[test]
    fn parent_is_centered_across_children() {
        let mut tree = parse_outline("Root\n  A\n  B\n  C\n").unwrap();
        arrange(&mut tree, &State::default());

        let loc = |id: &str| tree.node(tree.node_by_id(id).unwrap()).unwrap().location();
        assert_eq!(loc("root").y, loc("root/b").y);
    }
}
