mod default_node;
mod displays;
pub(crate) mod drawer;

pub use default_node::DefaultNodeShape;
pub use displays::DisplayNode;
pub use drawer::DrawContext;
