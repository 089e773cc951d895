use egui::util::id_type_map::SerializableAny;
use std::fmt::Debug;

use crate::{DisplayNode, Tree};

const KEY_PREFIX: &str = "egui_mindmap_layout";

fn get_id(id: Option<String>) -> egui::Id {
    egui::Id::new(format!("{KEY_PREFIX}_{}", id.unwrap_or_default()))
}

pub trait LayoutState: SerializableAny + Default + Debug {
    fn load(ui: &egui::Ui, id: Option<String>) -> Self {
        ui.data_mut(|data| data.get_persisted::<Self>(get_id(id)).unwrap_or_default())
    }

    fn save(self, ui: &mut egui::Ui, id: Option<String>) {
        ui.data_mut(|data| {
            data.insert_persisted(get_id(id), self);
        });
    }
}

pub trait Layout<S>: Default
where
    S: LayoutState,
{
    /// Creates a layout from the given state. State is loaded and saved on every frame.
    fn from_state(state: S) -> impl Layout<S>;

    /// Called on every frame. It should update node locations.
    fn next<N, D>(&mut self, tree: &mut Tree<N, D>, ui: &egui::Ui)
    where
        N: Clone,
        D: DisplayNode<N>;

    /// Returns the current state of the layout.
    fn state(&self) -> S;
}

/// Resets [`Layout`] state, causing a full re-layout on the next frame.
pub fn reset_layout<S: LayoutState>(ui: &mut egui::Ui, id: Option<String>) {
    S::default().save(ui, id);
}
