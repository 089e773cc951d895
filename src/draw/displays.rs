use egui::{Pos2, Shape, Vec2};

use crate::{draw::drawer::DrawContext, NodeProps};

/// Visual representation of a node — the seam between the tree widget and the
/// rendering layer. The widget only relies on hit-testing and boundary points;
/// everything painted on screen can be swapped out by implementing this trait.
pub trait DisplayNode<N>: Clone + From<NodeProps<N>>
where
    N: Clone,
{
    /// Checks if the provided `pos` (canvas coordinates) is inside the shape.
    ///
    /// Used to bind pointer events to the drawn node.
    fn is_inside(&self, pos: Pos2) -> bool;

    /// Returns the closest point on the shape boundary in the direction of `dir`.
    ///
    /// * `dir` - direction pointing from the shape center to the required boundary point.
    ///
    /// Used to snap connection ends to the node.
    fn closest_boundary_point(&self, dir: Vec2) -> Pos2;

    /// Draws shapes of the node.
    ///
    /// Use `ctx.meta` to properly scale and translate the shape.
    fn shapes(&mut self, ctx: &DrawContext) -> Vec<Shape>;

    /// Is called on every frame. Update the display with the latest node properties.
    fn update(&mut self, state: &NodeProps<N>);
}
