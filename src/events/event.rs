use serde::{Deserialize, Serialize};

use crate::DropPosition;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDragStart {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDragEnd {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeHoverEnter {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeHoverLeave {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeSelect {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDeselect {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeClick {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDoubleClick {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeMove {
    pub id: String,
    pub diff: [f32; 2],
    pub new_pos: [f32; 2],
}

/// A sibling move went through; the payload carries everything a subscriber
/// needs to persist the change (project managers typically mark the document
/// dirty on this one).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeReorder {
    pub dragged: String,
    pub target: String,
    pub parent: String,
    pub position: DropPosition,
    /// The parent's full child sequence after the move.
    pub sequence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadPan {
    pub diff: [f32; 2],
    pub new_pan: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadZoom {
    pub diff: f32,
    pub new_zoom: f32,
}

/// Change which occurred in the widget as a result of user interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    NodeDragStart(PayloadNodeDragStart),
    NodeDragEnd(PayloadNodeDragEnd),
    NodeHoverEnter(PayloadNodeHoverEnter),
    NodeHoverLeave(PayloadNodeHoverLeave),
    NodeSelect(PayloadNodeSelect),
    NodeDeselect(PayloadNodeDeselect),
    NodeClick(PayloadNodeClick),
    NodeDoubleClick(PayloadNodeDoubleClick),
    NodeMove(PayloadNodeMove),
    NodeReorder(PayloadNodeReorder),
    Pan(PayloadPan),
    Zoom(PayloadZoom),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_contract_pan() {
        let event = Event::Pan(PayloadPan {
            diff: [1.0, 2.0],
            new_pan: [3.0, 4.0],
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"Pan":{"diff":[1.0,2.0],"new_pan":[3.0,4.0]}}"#);

        let event: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(
            event,
            Event::Pan(PayloadPan {
                diff: [1.0, 2.0],
                new_pan: [3.0, 4.0],
            })
        );
    }

    #[test]
    fn test_contract_node_reorder() {
        let event = Event::NodeReorder(PayloadNodeReorder {
            dragged: "z".to_owned(),
            target: "x".to_owned(),
            parent: "p".to_owned(),
            position: DropPosition::Before,
            sequence: vec!["z".to_owned(), "x".to_owned(), "y".to_owned()],
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"NodeReorder":{"dragged":"z","target":"x","parent":"p","position":"Before","sequence":["z","x","y"]}}"#
        );

        let event2: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event2, event);
    }
}
