use egui::{Color32, Pos2};
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::{DefaultNodeShape, DisplayNode};

/// Stores properties of a [`Node`] which are exposed to display implementations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeProps<N: Clone> {
    pub payload: N,
    pub label: String,
    pub location: Pos2,
    pub selected: bool,
    pub dragged: bool,
    pub hovered: bool,
    pub color: Option<Color32>,
}

/// A single item of the outline tree.
///
/// Carries a stable string id derived from the outline content, so the "same"
/// semantic item keeps its id when the tree is rebuilt from a fresh parse. The
/// petgraph index is assigned by [`crate::Tree`] on insertion and is only valid
/// for the current tree revision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node<N, D = DefaultNodeShape>
where
    N: Clone,
    D: DisplayNode<N>,
{
    id: String,
    index: Option<NodeIndex>,

    display: D,

    props: NodeProps<N>,
}

impl<N, D> Node<N, D>
where
    N: Clone,
    D: DisplayNode<N>,
{
    pub fn new(id: impl Into<String>, label: impl Into<String>, payload: N) -> Self {
        let props = NodeProps {
            payload,
            label: label.into(),
            location: Pos2::default(),
            selected: false,
            dragged: false,
            hovered: false,
            color: None,
        };

        let display = D::from(props.clone());
        Self {
            id: id.into(),
            index: None,

            display,

            props,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    #[allow(clippy::missing_panics_doc)] // set on insertion into the tree
    pub fn index(&self) -> NodeIndex {
        self.index.unwrap()
    }

    pub(crate) fn set_index(&mut self, index: NodeIndex) {
        self.index = Some(index);
    }

    pub fn props(&self) -> &NodeProps<N> {
        &self.props
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Pushes the current props into the display implementation.
    pub(crate) fn sync_display(&mut self) {
        let props = self.props.clone();
        self.display.update(&props);
    }

    pub fn payload(&self) -> &N {
        &self.props.payload
    }

    pub fn payload_mut(&mut self) -> &mut N {
        &mut self.props.payload
    }

    pub fn label(&self) -> &str {
        &self.props.label
    }

    pub fn set_label(&mut self, label: String) {
        self.props.label = label;
    }

    pub fn location(&self) -> Pos2 {
        self.props.location
    }

    pub fn set_location(&mut self, loc: Pos2) {
        self.props.location = loc;
    }

    pub fn selected(&self) -> bool {
        self.props.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.props.selected = selected;
    }

    pub fn dragged(&self) -> bool {
        self.props.dragged
    }

    pub fn set_dragged(&mut self, dragged: bool) {
        self.props.dragged = dragged;
    }

    pub fn hovered(&self) -> bool {
        self.props.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.props.hovered = hovered;
    }

    pub fn color(&self) -> Option<Color32> {
        self.props.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.props.color = Some(color);
    }
}
