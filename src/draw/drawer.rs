use egui::{Context, Painter, Shape, Stroke, Vec2};
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::{metadata::Metadata, settings::SettingsStyle, DisplayNode, DropPosition, Tree};

/// Contains all the data about current widget state which is needed for drawing.
pub struct DrawContext<'a> {
    pub ctx: &'a Context,
    pub painter: &'a Painter,
    pub meta: &'a Metadata,
    pub style: &'a SettingsStyle,
}

/// Paints connections first, then the drop indicator, then node shapes on top.
pub(crate) struct Drawer<'a, 'b, N, D>
where
    N: Clone,
    D: DisplayNode<N>,
{
    tree: &'a mut Tree<N, D>,
    ctx: &'a DrawContext<'b>,
}

impl<'a, 'b, N, D> Drawer<'a, 'b, N, D>
where
    N: Clone,
    D: DisplayNode<N>,
{
    pub fn new(tree: &'a mut Tree<N, D>, ctx: &'a DrawContext<'b>) -> Self {
        Drawer { tree, ctx }
    }

    pub fn draw(mut self) {
        self.sync_displays();
        self.draw_connections();
        self.draw_drop_indicator();
        self.draw_nodes();
    }

    fn sync_displays(&mut self) {
        let indices: Vec<NodeIndex> = self.tree.g().node_indices().collect();
        for idx in indices {
            if let Some(n) = self.tree.node_mut(idx) {
                n.sync_display();
            }
        }
    }

    fn draw_connections(&mut self) {
        let links: Vec<(NodeIndex, NodeIndex)> = self
            .tree
            .g()
            .edge_references()
            .map(|e| (e.source(), e.target()))
            .collect();

        let color = self
            .ctx
            .ctx
            .style()
            .visuals
            .widgets
            .noninteractive
            .fg_stroke
            .color;
        let stroke = Stroke::new(
            self.ctx.meta.canvas_to_screen_size(self.ctx.style.connection_width),
            color,
        );

        for (parent, child) in links {
            let (Some(p), Some(c)) = (self.tree.node(parent), self.tree.node(child)) else {
                continue;
            };
            let dir = c.location() - p.location();
            if dir == Vec2::ZERO {
                continue;
            }
            let start = p.display().closest_boundary_point(dir);
            let end = c.display().closest_boundary_point(-dir);
            self.ctx.painter.line_segment(
                [
                    self.ctx.meta.canvas_to_screen_pos(start),
                    self.ctx.meta.canvas_to_screen_pos(end),
                ],
                stroke,
            );
        }
    }

    /// Marks the slot a dragged node would land in: a short segment on the
    /// before/after side of the drop target, along the sibling axis.
    fn draw_drop_indicator(&mut self) {
        let Some(slot) = self.tree.drop_target() else {
            return;
        };
        let Some(target) = self.tree.node(slot.target) else {
            return;
        };

        let axis = self.tree.sibling_axis(slot.target, self.tree.dragged_node());
        let side = match slot.position {
            DropPosition::Before => -1.0,
            DropPosition::After => 1.0,
        };
        let center = target.location() + axis * side * 14.0;
        let perp = axis.rot90() * 10.0;

        let stroke = self.ctx.ctx.style().visuals.selection.stroke;
        self.ctx.painter.line_segment(
            [
                self.ctx.meta.canvas_to_screen_pos(center - perp),
                self.ctx.meta.canvas_to_screen_pos(center + perp),
            ],
            Stroke::new(self.ctx.meta.canvas_to_screen_size(stroke.width), stroke.color),
        );
    }

    fn draw_nodes(&mut self) {
        let indices: Vec<NodeIndex> = self.tree.g().node_indices().collect();
        for idx in indices {
            let Some(n) = self.tree.node_mut(idx) else {
                continue;
            };
            let shapes: Vec<Shape> = n.display_mut().shapes(self.ctx);
            for s in shapes {
                self.ctx.painter.add(s);
            }
        }
    }
}
