mod layout;
pub mod outline;

pub use layout::{reset_layout, Layout, LayoutState};
pub use outline::{Orientation, Outline};
