//! Interactive mind map editor widget for [`egui`](https://github.com/emilk/egui).
//!
//! The crate owns the in-memory outline [`Tree`], the drag-and-drop sibling
//! re-ordering protocol and the durable per-parent order overrides
//! ([`SiblingOrders`]); how nodes look is delegated to [`DisplayNode`]
//! implementations and how the document is stored is left to the application,
//! which talks to the widget through [`events`] and the
//! [`SiblingOrders::export`] / [`SiblingOrders::import`] boundary.

mod draw;
mod elements;
mod metadata;
mod orders;
mod outline;
mod reorder;
mod settings;
mod tree;
mod tree_view;

#[cfg(feature = "events")]
pub mod events;
pub mod layouts;

pub use draw::{DefaultNodeShape, DisplayNode, DrawContext};
pub use elements::{Edge, Node, NodeProps};
pub use metadata::{reset_metadata, Metadata};
pub use orders::{OrderMap, SiblingOrders};
pub use outline::{parse_outline, OutlineError};
pub use reorder::{reorder, DropPosition, ReorderError, Reordered};
pub use settings::{SettingsInteraction, SettingsNavigation, SettingsStyle};
pub use tree::{DropSlot, Tree};
pub use tree_view::{get_metrics, reset, DefaultTreeView, TreeView};
