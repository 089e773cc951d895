mod event;
mod sink;

pub use event::{
    Event, PayloadNodeClick, PayloadNodeDeselect, PayloadNodeDoubleClick, PayloadNodeDragEnd,
    PayloadNodeDragStart, PayloadNodeHoverEnter, PayloadNodeHoverLeave, PayloadNodeMove,
    PayloadNodeReorder, PayloadNodeSelect, PayloadPan, PayloadZoom,
};

pub use sink::{EventSink, FnSink};
