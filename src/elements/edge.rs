use serde::{Deserialize, Serialize};

/// The parent→child link of the outline tree.
///
/// Carries the child's position among its siblings; petgraph does not preserve
/// a meaningful neighbor order, so the position on the edge is the single
/// source of truth for the sibling sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    position: usize,
}

impl Edge {
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}
