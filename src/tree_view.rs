use std::marker::PhantomData;

use egui::{CursorIcon, Pos2, Rect, Response, Sense, Ui, Vec2, Widget};
use instant::Instant;
use petgraph::stable_graph::NodeIndex;

use crate::{
    draw::drawer::{DrawContext, Drawer},
    layouts::{self, Layout, LayoutState},
    metadata::{reset_metadata, Metadata},
    reorder::reorder,
    settings::{SettingsInteraction, SettingsNavigation, SettingsStyle},
    tree::DropSlot,
    DefaultNodeShape, DisplayNode, DropPosition, SiblingOrders, Tree,
};

#[cfg(feature = "events")]
use crate::events::{
    Event, EventSink, PayloadNodeClick, PayloadNodeDeselect, PayloadNodeDoubleClick,
    PayloadNodeDragEnd, PayloadNodeDragStart, PayloadNodeHoverEnter, PayloadNodeHoverLeave,
    PayloadNodeMove, PayloadNodeReorder, PayloadNodeSelect, PayloadPan, PayloadZoom,
};

/// Padding used when computing tree bounds from node locations.
const BOUNDS_PAD: f32 = 25.0;

pub type DefaultTreeView<'a> =
    TreeView<'a, (), DefaultNodeShape, layouts::outline::State, layouts::Outline>;

// Effective interaction flags after applying master->child rules.
#[derive(Clone, Copy, Debug, Default)]
struct EffectiveInteraction {
    dragging: bool,
    hover: bool,
    node_clicking: bool,
    node_selection: bool,
}

/// Widget for visualizing and editing an outline [`Tree`].
///
/// It implements [`egui::Widget`] and can be used like any other widget.
///
/// The widget keeps the tree and the [`SiblingOrders`] it is given in sync:
/// dropping a dragged node onto a sibling re-orders the two within their
/// shared parent and records the new sequence in the orders, so the chosen
/// arrangement survives re-parses of the outline text. Dropping anywhere else
/// abandons the gesture without touching either structure.
///
/// When any interaction or node property change occurs, the widget sends an
/// [`Event`] to the sink provided via `with_event_sink`. Client code can use
/// this to modify external state — marking the open project dirty on
/// `NodeReorder` is the typical example. Navigation actions (zoom & pan, fit
/// to screen) do not produce document changes.
pub struct TreeView<
    'a,
    N = (),
    D = DefaultNodeShape,
    S = layouts::outline::State,
    L = layouts::Outline,
> where
    N: Clone,
    D: DisplayNode<N>,
    S: LayoutState,
    L: Layout<S>,
{
    tree: &'a mut Tree<N, D>,
    orders: &'a mut SiblingOrders,

    settings_interaction: SettingsInteraction,
    settings_navigation: SettingsNavigation,
    settings_style: SettingsStyle,

    custom_id: Option<String>,

    #[cfg(feature = "events")]
    events_sink: Option<&'a dyn EventSink>,

    _marker: PhantomData<(S, L)>,
}

impl<N, D, S, L> Widget for &mut TreeView<'_, N, D, S, L>
where
    N: Clone,
    D: DisplayNode<N>,
    S: LayoutState,
    L: Layout<S>,
{
    fn ui(self, ui: &mut Ui) -> Response {
        // Measure layout step time
        let t0 = Instant::now();
        self.sync_layout(ui);
        let step_ms = t0.elapsed().as_secs_f32() * 1000.0;

        // Compute effective interactions once per frame
        let eff = self.effective();

        let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());

        let mut meta = Metadata::new(self.custom_id.clone()).load(ui);
        self.sync_state(&mut meta);

        // Hover detection happens as early as possible using current input state
        self.handle_hover(ui, &resp, &mut meta, eff);
        self.handle_fit_to_screen(&resp, &mut meta);

        // Handle node drag before navigation so pan doesn't kick in on the first
        // frame when starting a node drag.
        self.handle_drag(&resp, &mut meta, eff);

        self.handle_navigation(ui, &resp, &mut meta, eff);
        self.handle_click(&resp, &meta, eff);

        // Measure draw time (exclude layout step): start after layout, stop after draw
        let t_draw0 = Instant::now();
        // Draw-time metadata adjusted to screen coordinates by adding the widget's top-left offset.
        let mut meta_draw = meta.clone();
        meta_draw.pan += resp.rect.left_top().to_vec2();

        Drawer::new(
            self.tree,
            &DrawContext {
                ctx: ui.ctx(),
                painter: &painter,
                meta: &meta_draw,
                style: &self.settings_style,
            },
        )
        .draw();
        let draw_ms = t_draw0.elapsed().as_secs_f32() * 1000.0;

        meta.last_step_time_ms = step_ms;
        meta.last_draw_time_ms = draw_ms;
        meta.first_frame = false;

        meta.save(ui);

        ui.ctx().request_repaint();

        resp
    }
}

// Constructor and lifetime-bound methods
impl<'a, N, D, S, L> TreeView<'a, N, D, S, L>
where
    N: Clone,
    D: DisplayNode<N>,
    S: LayoutState,
    L: Layout<S>,
{
    /// Creates a new `TreeView` widget over the tree and its recorded sibling
    /// orders, with default navigation and interaction settings.
    pub fn new(tree: &'a mut Tree<N, D>, orders: &'a mut SiblingOrders) -> Self {
        Self {
            tree,
            orders,

            settings_style: SettingsStyle::default(),
            settings_interaction: SettingsInteraction::default(),
            settings_navigation: SettingsNavigation::default(),

            custom_id: None,

            #[cfg(feature = "events")]
            events_sink: Option::default(),

            _marker: PhantomData,
        }
    }

    #[cfg(feature = "events")]
    /// Supply a sink that will receive interaction events.
    /// Works with `crossbeam::channel::Sender<Event>`, [`crate::events::FnSink`]
    /// wrapped closures, or custom implementations.
    pub fn with_event_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.events_sink = Some(sink);
        self
    }
}

impl<N, D, S, L> TreeView<'_, N, D, S, L>
where
    N: Clone,
    D: DisplayNode<N>,
    S: LayoutState,
    L: Layout<S>,
{
    /// Makes widget interactive according to the provided settings.
    pub fn with_interactions(mut self, settings_interaction: &SettingsInteraction) -> Self {
        self.settings_interaction = settings_interaction.clone();
        self
    }

    /// Modifies default behaviour of navigation settings.
    pub fn with_navigations(mut self, settings_navigation: &SettingsNavigation) -> Self {
        self.settings_navigation = settings_navigation.clone();
        self
    }

    /// Modifies default style settings.
    pub fn with_styles(mut self, settings_style: &SettingsStyle) -> Self {
        self.settings_style = settings_style.clone();
        self
    }

    /// Sets a custom unique ID for this widget instance. Useful when you have
    /// multiple tree views in the same UI and want to keep their state
    /// (layout, metadata) separate.
    pub fn with_id(mut self, custom_id: Option<String>) -> Self {
        self.custom_id = custom_id;
        self
    }

    /// Compute effective interactions, honoring master->child rules:
    /// - Dragging enabled implies node click + hover are enabled.
    /// - Selection enabled implies node click + hover enabled.
    fn effective(&self) -> EffectiveInteraction {
        let si = &self.settings_interaction;

        let mut eff = EffectiveInteraction {
            dragging: si.dragging_enabled,
            hover: si.hover_enabled,
            node_clicking: si.node_clicking_enabled,
            node_selection: si.node_selection_enabled,
        };

        if eff.dragging {
            eff.node_clicking = true;
            eff.hover = true;
        }
        if eff.node_selection {
            eff.node_clicking = true;
            eff.hover = true;
        }

        eff
    }

    fn sync_layout(&mut self, ui: &mut Ui) {
        let id = self.custom_id.clone();

        let state = S::load(ui, id.clone());

        let mut layout = L::from_state(state);
        layout.next(self.tree, ui);
        let new_state = layout.state();

        new_state.save(ui, id);
    }

    fn sync_state(&mut self, meta: &mut Metadata) {
        let mut selected_nodes = Vec::new();
        let mut dragged = None;

        meta.reset_bounds();
        self.tree.nodes_iter().for_each(|(idx, n)| {
            if n.dragged() {
                dragged = Some(idx);
            }
            if n.selected() {
                selected_nodes.push(idx);
            }

            meta.process_bounds(n.location(), BOUNDS_PAD);
        });

        self.tree.set_selected_nodes(selected_nodes);
        self.tree.set_dragged_node(dragged);
        self.tree.set_bounds(meta.tree_bounds());
    }

    fn handle_hover(
        &mut self,
        ui: &Ui,
        resp: &Response,
        meta: &mut Metadata,
        eff: EffectiveInteraction,
    ) {
        if self.tree.dragged_node().is_some() {
            ui.output_mut(|o| o.cursor_icon = CursorIcon::PointingHand);
        }

        if !eff.hover {
            return;
        }

        // Convert to widget-local coordinates for hit-testing.
        let hovered_now = resp
            .hover_pos()
            .and_then(|pos| self.tree.node_by_screen_pos(meta, self.local_pos(resp, pos)));

        if hovered_now.is_some() {
            ui.output_mut(|o| o.cursor_icon = CursorIcon::PointingHand);
        }

        let prev = self.tree.hovered_node();
        if hovered_now != prev {
            if let Some(prev_idx) = prev {
                #[cfg(feature = "events")]
                self.publish_event(Event::NodeHoverLeave(PayloadNodeHoverLeave {
                    id: self.node_id(prev_idx),
                }));
                if let Some(n) = self.tree.node_mut(prev_idx) {
                    n.set_hovered(false);
                }
            }
            if let Some(cur_idx) = hovered_now {
                #[cfg(feature = "events")]
                self.publish_event(Event::NodeHoverEnter(PayloadNodeHoverEnter {
                    id: self.node_id(cur_idx),
                }));
                if let Some(n) = self.tree.node_mut(cur_idx) {
                    n.set_hovered(true);
                }
            }
            self.tree.set_hovered_node(hovered_now);
        }
    }

    /// Fits the tree to the screen if it is the first frame or
    /// fit to screen setting is enabled;
    fn handle_fit_to_screen(&self, r: &Response, meta: &mut Metadata) {
        if !(meta.first_frame || self.settings_navigation.fit_to_screen_enabled) {
            return;
        }

        // Use a local rect (origin at 0,0) for fit-to-screen calculations.
        let local_rect = Rect::from_min_size(Pos2::ZERO, r.rect.size());
        self.fit_to_screen(&local_rect, meta);
    }

    /// The three-phase drag gesture: pointer-down over a node begins it, the
    /// node then follows the pointer while the non-self node underneath
    /// becomes the drop target, and release over a target commits the move
    /// through [`reorder`]. Whatever happens, drag-end clears every visual
    /// affordance and snaps positions back to the computed arrangement.
    fn handle_drag(&mut self, resp: &Response, meta: &mut Metadata, eff: EffectiveInteraction) {
        if !eff.dragging {
            return;
        }

        let pointer = resp.hover_pos().map(|pos| self.local_pos(resp, pos));
        let node_under_pointer = pointer.and_then(|pos| self.tree.node_by_screen_pos(meta, pos));

        // Immediately mark a node as dragged on pointer-down over it.
        if resp.is_pointer_button_down_on() && self.tree.dragged_node().is_none() {
            if let Some(idx) = node_under_pointer {
                self.set_drag_start(idx);
                self.tree.set_dragged_node(Some(idx));
            }
        }

        // Hover phase: the dragged node follows the pointer and the drop slot
        // underneath is tracked for the commit and the visual indicator.
        if let Some(dragged) = self.tree.dragged_node() {
            if resp.dragged()
                && (resp.drag_delta().x.abs() > 0. || resp.drag_delta().y.abs() > 0.)
            {
                let delta_in_canvas_coords = resp.drag_delta() / meta.zoom;
                self.move_node(dragged, delta_in_canvas_coords);
            }

            // compensate movement of the node which is not caused by dragging
            if let Some(pointer_pos) = pointer {
                if let Some(node) = self.tree.node(dragged) {
                    let node_pos = node.location().to_vec2() * meta.zoom + meta.pan;
                    let delta = pointer_pos.to_vec2() - node_pos;
                    self.move_node(dragged, delta / meta.zoom);
                }
            }

            let slot = pointer
                .and_then(|pos| self.tree.node_by_screen_pos_excluding(meta, pos, dragged))
                .map(|target| DropSlot {
                    target,
                    position: self.drop_intent(meta, resp, target),
                });
            self.tree.set_drop_target(slot);
        }

        // Commit phase.
        if (resp.drag_stopped() || !resp.is_pointer_button_down_on())
            && self.tree.dragged_node().is_some()
        {
            let dragged = self.tree.dragged_node().unwrap();

            if let Some(slot) = self.tree.drop_target() {
                let dragged_id = self.node_id(dragged);
                let target_id = self.node_id(slot.target);
                if let Ok(res) =
                    reorder(self.tree, self.orders, &dragged_id, &target_id, slot.position)
                {
                    #[cfg(feature = "events")]
                    self.publish_event(Event::NodeReorder(PayloadNodeReorder {
                        dragged: dragged_id,
                        target: target_id,
                        parent: res.parent_id.clone(),
                        position: slot.position,
                        sequence: res.sequence.clone(),
                    }));
                    #[cfg(not(feature = "events"))]
                    let _ = res;
                }
            }

            // Cleared unconditionally, whether or not a drop landed.
            self.set_drag_end(dragged);
            self.tree.set_dragged_node(None);
            self.tree.set_drop_target(None);
            self.tree.bump_revision();
        }
    }

    /// Before/After intent of the pointer relative to the drop target,
    /// measured along the axis its siblings are arranged on.
    fn drop_intent(&self, meta: &Metadata, resp: &Response, target: NodeIndex) -> DropPosition {
        let Some(pointer) = resp.hover_pos() else {
            return DropPosition::After;
        };
        let pointer_canvas = meta.screen_to_canvas_pos(self.local_pos(resp, pointer));

        let axis = self.tree.sibling_axis(target, self.tree.dragged_node());
        let target_pos = self
            .tree
            .node(target)
            .map_or(Pos2::ZERO, crate::Node::location);

        if (pointer_canvas - target_pos).dot(axis) < 0.0 {
            DropPosition::Before
        } else {
            DropPosition::After
        }
    }

    fn handle_click(&mut self, resp: &Response, meta: &Metadata, eff: EffectiveInteraction) {
        if !resp.clicked() && !resp.double_clicked() {
            return;
        }

        if !(eff.node_clicking || eff.node_selection) {
            return;
        }

        let Some(cursor_pos) = resp.hover_pos() else {
            return;
        };
        let found_node = self
            .tree
            .node_by_screen_pos(meta, self.local_pos(resp, cursor_pos));
        let Some(idx) = found_node else {
            // click on empty space
            if eff.node_selection {
                self.deselect_all_nodes();
            }
            return;
        };

        // first click of double click is handled as a single click first
        if resp.double_clicked() {
            self.set_node_double_clicked(idx);
            return;
        }

        if eff.node_clicking {
            self.set_node_clicked(idx);
        }

        if !eff.node_selection {
            return;
        }

        if self.tree.node(idx).is_some_and(crate::Node::selected) {
            self.deselect_node(idx);
            return;
        }

        self.deselect_all_nodes();
        self.select_node(idx);
    }

    fn handle_navigation(
        &self,
        ui: &Ui,
        resp: &Response,
        meta: &mut Metadata,
        eff: EffectiveInteraction,
    ) {
        self.handle_zoom(ui, resp, meta);
        self.handle_pan(resp, meta, eff);
    }

    fn handle_zoom(&self, ui: &Ui, resp: &Response, meta: &mut Metadata) {
        if !self.settings_navigation.zoom_and_pan_enabled {
            return;
        }

        ui.input(|i| {
            let delta = i.zoom_delta();
            if delta == 1. {
                return;
            }

            let step = self.settings_navigation.zoom_speed * (delta - 1.).signum();
            let local_center = i.pointer.hover_pos().map(|p| self.local_pos(resp, p));
            let local_rect = Rect::from_min_size(Pos2::ZERO, resp.rect.size());
            self.zoom(&local_rect, step, local_center, meta);
        });
    }

    fn handle_pan(&self, resp: &Response, meta: &mut Metadata, _eff: EffectiveInteraction) {
        if !self.settings_navigation.zoom_and_pan_enabled {
            return;
        }

        if resp.dragged()
            && self.tree.dragged_node().is_none()
            && (resp.drag_delta().x.abs() > 0. || resp.drag_delta().y.abs() > 0.)
        {
            let new_pan = meta.pan + resp.drag_delta();
            self.set_pan(new_pan, meta);
        }
    }

    /// Convert a screen-space position to widget-local position
    fn local_pos(&self, resp: &Response, p: Pos2) -> Pos2 {
        (p - resp.rect.left_top()).to_pos2()
    }

    fn fit_to_screen(&self, rect: &Rect, meta: &mut Metadata) {
        let raw_bounds = meta.tree_bounds();
        let (mut min, mut max) = (raw_bounds.min, raw_bounds.max);
        let invalid_bounds = !min.x.is_finite()
            || !min.y.is_finite()
            || !max.x.is_finite()
            || !max.y.is_finite()
            || min.x > max.x
            || min.y > max.y;
        if invalid_bounds {
            min = Pos2::new(-0.5, -0.5);
            max = Pos2::new(0.5, 0.5);
        }
        let mut diag: Vec2 = max - min;
        if !diag.x.is_finite() || !diag.y.is_finite() || diag.x <= 0.0 || diag.y <= 0.0 {
            diag = Vec2::new(1., 1.);
        }
        let tree_size = diag * (1. + self.settings_navigation.fit_to_screen_padding);
        let (width, height) = (tree_size.x.max(1e-3), tree_size.y.max(1e-3));
        let canvas_size = rect.size();
        let zoom_x = (canvas_size.x / width).abs();
        let zoom_y = (canvas_size.y / height).abs();
        let mut new_zoom = zoom_x.min(zoom_y);
        if !new_zoom.is_finite() || new_zoom <= 0.0 {
            new_zoom = 1.0;
        }
        let zoom_delta = new_zoom / meta.zoom - 1.0;
        self.zoom(rect, zoom_delta, None, meta);
        let tree_center = (min.to_vec2() + max.to_vec2()) / 2.0;
        let new_pan = rect.center().to_vec2() - tree_center * new_zoom;
        self.set_pan(new_pan, meta);
    }

    /// Zooms by the given delta, compensating with pan to keep the zoom center in place.
    fn zoom(&self, rect: &Rect, delta: f32, zoom_center: Option<Pos2>, meta: &mut Metadata) {
        let center_pos = zoom_center.unwrap_or(rect.center()).to_vec2();
        let canvas_center_pos = (center_pos - meta.pan) / meta.zoom;
        let factor = 1. + delta;
        let new_zoom = meta.zoom * factor;

        let pan_delta = canvas_center_pos * meta.zoom - canvas_center_pos * new_zoom;
        let new_pan = meta.pan + pan_delta;

        self.set_pan(new_pan, meta);
        self.set_zoom(new_zoom, meta);
    }

    fn select_node(&mut self, idx: NodeIndex) {
        if let Some(n) = self.tree.node_mut(idx) {
            n.set_selected(true);
        }

        #[cfg(feature = "events")]
        self.publish_event(Event::NodeSelect(PayloadNodeSelect {
            id: self.node_id(idx),
        }));
    }

    fn deselect_node(&mut self, idx: NodeIndex) {
        if let Some(n) = self.tree.node_mut(idx) {
            n.set_selected(false);
        }

        #[cfg(feature = "events")]
        self.publish_event(Event::NodeDeselect(PayloadNodeDeselect {
            id: self.node_id(idx),
        }));
    }

    fn deselect_all_nodes(&mut self) {
        let selected_nodes = self.tree.selected_nodes().to_vec();
        for idx in selected_nodes {
            self.deselect_node(idx);
        }
    }

    #[allow(unused_variables, clippy::unused_self)]
    fn set_node_clicked(&self, idx: NodeIndex) {
        #[cfg(feature = "events")]
        self.publish_event(Event::NodeClick(PayloadNodeClick {
            id: self.node_id(idx),
        }));
    }

    #[allow(unused_variables, clippy::unused_self)]
    fn set_node_double_clicked(&self, idx: NodeIndex) {
        #[cfg(feature = "events")]
        self.publish_event(Event::NodeDoubleClick(PayloadNodeDoubleClick {
            id: self.node_id(idx),
        }));
    }

    fn move_node(&mut self, idx: NodeIndex, delta: Vec2) {
        let Some(n) = self.tree.node_mut(idx) else {
            return;
        };
        let new_loc = n.location() + delta;
        n.set_location(new_loc);

        #[cfg(feature = "events")]
        self.publish_event(Event::NodeMove(PayloadNodeMove {
            id: self.node_id(idx),
            diff: delta.into(),
            new_pos: [new_loc.x, new_loc.y],
        }));
    }

    fn set_drag_start(&mut self, idx: NodeIndex) {
        if let Some(n) = self.tree.node_mut(idx) {
            n.set_dragged(true);
        }

        #[cfg(feature = "events")]
        self.publish_event(Event::NodeDragStart(PayloadNodeDragStart {
            id: self.node_id(idx),
        }));
    }

    fn set_drag_end(&mut self, idx: NodeIndex) {
        if let Some(n) = self.tree.node_mut(idx) {
            n.set_dragged(false);
        }

        #[cfg(feature = "events")]
        self.publish_event(Event::NodeDragEnd(PayloadNodeDragEnd {
            id: self.node_id(idx),
        }));
    }

    #[allow(unused_variables, clippy::unused_self)]
    fn set_pan(&self, new_pan: Vec2, meta: &mut Metadata) {
        let diff = new_pan - meta.pan;
        if diff == Vec2::ZERO {
            return;
        }

        meta.pan = new_pan;

        #[cfg(feature = "events")]
        self.publish_event(Event::Pan(PayloadPan {
            diff: diff.into(),
            new_pan: new_pan.into(),
        }));
    }

    #[allow(unused_variables, clippy::unused_self)]
    fn set_zoom(&self, new_zoom: f32, meta: &mut Metadata) {
        let diff = new_zoom - meta.zoom;
        if diff == 0. {
            return;
        }

        meta.zoom = new_zoom;

        #[cfg(feature = "events")]
        self.publish_event(Event::Zoom(PayloadZoom { diff, new_zoom }));
    }

    fn node_id(&self, idx: NodeIndex) -> String {
        self.tree
            .node(idx)
            .map_or_else(String::new, |n| n.id().to_owned())
    }

    #[cfg(feature = "events")]
    fn publish_event(&self, event: Event) {
        if let Some(sink) = self.events_sink {
            sink.send(event);
        }
    }
}

/// Helper to reset both [`Metadata`] and [`Layout`] cache. Can be useful when
/// you want to change the layout in runtime.
pub fn reset<S: LayoutState>(ui: &mut Ui, id: Option<String>) {
    reset_metadata(ui, id.clone());
    layouts::reset_layout::<S>(ui, id);
}

/// Returns the latest per-frame performance metrics stored in metadata.
pub fn get_metrics(ui: &Ui, id: Option<String>) -> (f32, f32) {
    let m = Metadata::new(id).load(ui);
    (m.last_step_time_ms, m.last_draw_time_ms)
}
