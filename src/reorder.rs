use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{DisplayNode, SiblingOrders, Tree};

/// Which side of the drop target the dragged node lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropPosition {
    Before,
    After,
}

/// Why a drop was refused.
///
/// All of these occur routinely while dragging (gestures pass over non-sibling
/// nodes all the time), so refusing is a conditional no-op: the tree and the
/// recorded orders are guaranteed untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("cannot drop a node onto itself")]
    SelfDrop,
    #[error("unknown node id `{0}`")]
    UnknownNode(String),
    #[error("`{dragged}` and `{target}` do not share a parent")]
    NotSiblings { dragged: String, target: String },
}

/// Outcome of a successful reorder. The caller owes a re-render and a dirty
/// mark to its persistence layer; nothing is saved here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reordered {
    pub parent_id: String,
    /// The parent's full child sequence after the move.
    pub sequence: Vec<String>,
}

/// Moves `dragged_id` next to `target_id` among their shared parent's
/// children and records the resulting sequence as that parent's sibling
/// order.
///
/// Only sibling moves are supported: when the two nodes live under different
/// parents (or either is the root) the call refuses without mutating
/// anything. Re-parenting by drag-and-drop is deliberately not a thing.
///
/// # Errors
///
/// [`ReorderError`] for self-drops, unresolved ids and non-sibling pairs; the
/// tree and the orders are untouched in every error case.
pub fn reorder<N, D>(
    tree: &mut Tree<N, D>,
    orders: &mut SiblingOrders,
    dragged_id: &str,
    target_id: &str,
    position: DropPosition,
) -> Result<Reordered, ReorderError>
where
    N: Clone,
    D: DisplayNode<N>,
{
    if dragged_id == target_id {
        return Err(ReorderError::SelfDrop);
    }

    let dragged = tree
        .node_by_id(dragged_id)
        .ok_or_else(|| ReorderError::UnknownNode(dragged_id.to_owned()))?;
    let target = tree
        .node_by_id(target_id)
        .ok_or_else(|| ReorderError::UnknownNode(target_id.to_owned()))?;

    let dragged_parent = tree.parent(dragged);
    let target_parent = tree.parent(target);
    let parent = match (dragged_parent, target_parent) {
        (Some(a), Some(b)) if a == b => a,
        _ => {
            let parent_id = |p: Option<petgraph::stable_graph::NodeIndex>| {
                p.and_then(|idx| tree.node(idx).map(|n| n.id().to_owned()))
            };
            debug!(
                dragged = dragged_id,
                target = target_id,
                dragged_parent = ?parent_id(dragged_parent),
                target_parent = ?parent_id(target_parent),
                "refusing non-sibling drop"
            );
            return Err(ReorderError::NotSiblings {
                dragged: dragged_id.to_owned(),
                target: target_id.to_owned(),
            });
        }
    };

    // Index arithmetic happens after removal; dropping before the immediate
    // next sibling must still land the node right before its old position.
    let mut sequence = tree.children(parent);
    sequence.retain(|&c| c != dragged);
    match sequence.iter().position(|&c| c == target) {
        Some(i) => {
            let at = match position {
                DropPosition::Before => i,
                DropPosition::After => i + 1,
            };
            sequence.insert(at, dragged);
        }
        None => {
            debug!(target = target_id, "drop target left the sibling sequence, appending");
            sequence.push(dragged);
        }
    }
    tree.set_child_sequence(parent, &sequence);

    let parent_id = tree
        .node(parent)
        .map_or_else(String::new, |n| n.id().to_owned());
    let sequence: Vec<String> = sequence
        .iter()
        .filter_map(|&c| tree.node(c).map(|n| n.id().to_owned()))
        .collect();
    orders.record(&parent_id, &sequence);
    trace!(parent = %parent_id, ?sequence, "recorded sibling order");

    Ok(Reordered {
        parent_id,
        sequence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    fn sample() -> (Tree, SiblingOrders) {
        let mut tree: Tree = Tree::new(Node::new("p", "P", ()));
        let p = tree.root();
        tree.add_child(p, Node::new("x", "X", ()));
        tree.add_child(p, Node::new("y", "Y", ()));
        tree.add_child(p, Node::new("z", "Z", ()));
        let q = tree.add_child(p, Node::new("q", "Q", ()));
        tree.add_child(q, Node::new("w", "W", ()));
        (tree, SiblingOrders::new())
    }

    #[test]
    fn drop_last_before_first() {
        let (mut tree, mut orders) = sample();
        let res = reorder(&mut tree, &mut orders, "z", "x", DropPosition::Before).unwrap();
        assert_eq!(res.sequence, ["z", "x", "y", "q"]);
        assert_eq!(tree.child_ids(tree.root()), ["z", "x", "y", "q"]);
    }

    #[test]
    fn drop_first_after_last() {
        let (mut tree, mut orders) = sample();
        let res = reorder(&mut tree, &mut orders, "x", "z", DropPosition::After).unwrap();
        assert_eq!(res.sequence, ["y", "z", "x", "q"]);
    }

    #[test]
    fn drop_before_immediate_next_sibling_keeps_position() {
        let (mut tree, mut orders) = sample();
        let res = reorder(&mut tree, &mut orders, "x", "y", DropPosition::Before).unwrap();
        assert_eq!(res.sequence, ["x", "y", "z", "q"]);
    }

    #[test]
    fn cross_parent_drop_is_refused_without_mutation() {
        let (mut tree, mut orders) = sample();
        let err = reorder(&mut tree, &mut orders, "x", "w", DropPosition::Before).unwrap_err();
        assert_eq!(
            err,
            ReorderError::NotSiblings {
                dragged: "x".to_owned(),
                target: "w".to_owned(),
            }
        );
        assert_eq!(tree.child_ids(tree.root()), ["x", "y", "z", "q"]);
        assert!(orders.is_empty());
    }

    #[test]
    fn self_drop_is_refused() {
        let (mut tree, mut orders) = sample();
        let err = reorder(&mut tree, &mut orders, "x", "x", DropPosition::After).unwrap_err();
        assert_eq!(err, ReorderError::SelfDrop);
        assert!(orders.is_empty());
    }

    #[test]
    fn root_cannot_take_part_in_a_move() {
        let (mut tree, mut orders) = sample();
        assert!(matches!(
            reorder(&mut tree, &mut orders, "p", "x", DropPosition::Before),
            Err(ReorderError::NotSiblings { .. })
        ));
        assert!(matches!(
            reorder(&mut tree, &mut orders, "x", "p", DropPosition::Before),
            Err(ReorderError::NotSiblings { .. })
        ));
    }

    #[test]
    fn unknown_ids_are_refused() {
        let (mut tree, mut orders) = sample();
        assert_eq!(
            reorder(&mut tree, &mut orders, "nope", "x", DropPosition::Before).unwrap_err(),
            ReorderError::UnknownNode("nope".to_owned())
        );
        assert_eq!(
            reorder(&mut tree, &mut orders, "x", "nope", DropPosition::Before).unwrap_err(),
            ReorderError::UnknownNode("nope".to_owned())
        );
    }

    #[test]
    fn successful_reorder_records_full_parent_entry() {
        let (mut tree, mut orders) = sample();
        reorder(&mut tree, &mut orders, "z", "x", DropPosition::Before).unwrap();
        assert_eq!(orders.rank("p", "z"), Some(0));
        assert_eq!(orders.rank("p", "x"), Some(1));
        assert_eq!(orders.rank("p", "y"), Some(2));
        assert_eq!(orders.rank("p", "q"), Some(3));
    }
}
