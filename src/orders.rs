use std::collections::BTreeMap;

use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{DisplayNode, Tree};

/// Plain nested form of the recorded orders: parent id → child id → rank.
/// This is the shape project files carry (conventionally under a
/// `customOrders` field), so it must stay free of non-serializable state.
pub type OrderMap = BTreeMap<String, BTreeMap<String, usize>>;

/// Per-parent sibling order overrides.
///
/// The outline text implies an order of its own; once the user drags siblings
/// around, the chosen order is not recoverable from the text anymore. The
/// overrides recorded here are keyed on stable node ids, so they survive the
/// tree being torn down and rebuilt from a fresh parse, and re-applying them
/// is idempotent.
///
/// Ranks are a hint, not a constraint: a child missing from its parent's
/// entry is legal and sorts after all ranked children, keeping its relative
/// order among the other unranked ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiblingOrders {
    ranks: OrderMap,
}

impl SiblingOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn rank(&self, parent_id: &str, child_id: &str) -> Option<usize> {
        self.ranks.get(parent_id)?.get(child_id).copied()
    }

    /// Overwrites the entry for `parent_id` with ranks derived from
    /// `sequence`. A full replacement, never a merge: stale ranks for
    /// children no longer present must not linger.
    pub fn record(&mut self, parent_id: &str, sequence: &[String]) {
        let entry = sequence
            .iter()
            .enumerate()
            .map(|(rank, id)| (id.clone(), rank))
            .collect();
        self.ranks.insert(parent_id.to_owned(), entry);
    }

    /// Re-sorts the children of `parent` according to the recorded ranks.
    ///
    /// Ranked children come first, by rank ascending; unranked children keep
    /// their current relative order behind them. A parent without an entry is
    /// left untouched.
    pub fn apply_parent<N, D>(&self, tree: &mut Tree<N, D>, parent: NodeIndex)
    where
        N: Clone,
        D: DisplayNode<N>,
    {
        let Some(parent_id) = tree.node(parent).map(|n| n.id().to_owned()) else {
            return;
        };
        let Some(entry) = self.ranks.get(&parent_id) else {
            return;
        };

        let mut sequence = tree.children(parent);
        if sequence.len() < 2 {
            return;
        }
        // sort_by_key is stable, which is what keeps unranked children in place
        sequence.sort_by_key(|&child| {
            tree.node(child)
                .and_then(|n| entry.get(n.id()).copied())
                .unwrap_or(usize::MAX)
        });
        tree.set_child_sequence(parent, &sequence);
    }

    /// Applies the recorded orders at every parent, pre-order from the root.
    ///
    /// Each parent's sort is independent; the fixed traversal order exists
    /// for reproducibility.
    pub fn apply_tree<N, D>(&self, tree: &mut Tree<N, D>)
    where
        N: Clone,
        D: DisplayNode<N>,
    {
        let mut stack = vec![tree.root()];
        while let Some(idx) = stack.pop() {
            self.apply_parent(tree, idx);
            let mut children = tree.children(idx);
            children.reverse();
            stack.append(&mut children);
        }
    }

    /// Deep copy of the recorded orders; the caller can mutate the result
    /// without affecting this instance.
    pub fn export(&self) -> OrderMap {
        self.ranks.clone()
    }

    /// Replaces the whole map and immediately re-applies it to `tree`, so the
    /// currently loaded tree reflects the imported order without a separate
    /// render trigger.
    pub fn import<N, D>(&mut self, map: OrderMap, tree: &mut Tree<N, D>)
    where
        N: Clone,
        D: DisplayNode<N>,
    {
        self.ranks = map;
        self.apply_tree(tree);
    }

    /// Defensive variant of [`Self::import`] for untyped data coming out of a
    /// project file: anything that is not an object of objects of
    /// non-negative integers is ignored as a whole, keeping the previous map
    /// unchanged. Returns whether the import happened.
    pub fn import_value<N, D>(&mut self, value: &serde_json::Value, tree: &mut Tree<N, D>) -> bool
    where
        N: Clone,
        D: DisplayNode<N>,
    {
        let Some(parents) = value.as_object() else {
            debug!("ignoring order import: not an object");
            return false;
        };

        let mut map = OrderMap::new();
        for (parent_id, entry) in parents {
            let Some(entry) = entry.as_object() else {
                debug!(parent = %parent_id, "ignoring order import: entry is not an object");
                return false;
            };
            let mut ranks = BTreeMap::new();
            for (child_id, rank) in entry {
                let Some(rank) = rank.as_u64() else {
                    debug!(
                        parent = %parent_id,
                        child = %child_id,
                        "ignoring order import: rank is not a non-negative integer"
                    );
                    return false;
                };
                ranks.insert(child_id.clone(), rank as usize);
            }
            map.insert(parent_id.clone(), ranks);
        }

        self.import(map, tree);
        true
    }
}
