use egui_mindmap::{parse_outline, reorder, DropPosition, Node, OrderMap, SiblingOrders, Tree};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct TestPayload {
    value: i32,
    kind: String,
}

#[test]
fn test_serialize_deserialize_node() {
    let payload = TestPayload {
        value: 42,
        kind: "A".to_string(),
    };
    let node: Node<TestPayload> = Node::new("a", "A", payload.clone());
    let json = serde_json::to_string(&node).expect("serialize node");

    let node2: Node<TestPayload> = serde_json::from_str(&json).expect("deserialize node");

    assert_eq!(node2.id(), node.id());
    assert_eq!(node2.label(), node.label());
    assert_eq!(node2.location(), node.location());
    assert_eq!(node2.payload(), node.payload());
    assert_eq!(node2.selected(), node.selected());
    assert_eq!(node2.dragged(), node.dragged());
    assert_eq!(node2.hovered(), node.hovered());
}

#[test]
fn test_serialize_deserialize_tree() {
    let tree = parse_outline("Trip\n  Packing\n    Tent\n  Route\n").expect("parse");
    let json = serde_json::to_string(&tree).expect("serialize tree");
    let tree2: Tree = serde_json::from_str(&json).expect("deserialize tree");

    assert_eq!(tree2.node_count(), tree.node_count());
    assert_eq!(
        tree2.node(tree2.root()).expect("root exists").id(),
        tree.node(tree.root()).expect("root exists").id()
    );
    assert_eq!(tree2.child_ids(tree2.root()), tree.child_ids(tree.root()));

    let packing = tree2.node_by_id("trip/packing").expect("id survives");
    assert_eq!(tree2.child_ids(packing), ["trip/packing/tent"]);
}

#[test]
fn test_orders_round_trip_as_plain_nested_data() {
    let mut tree = parse_outline("P\n  X\n  Y\n  Z\n").expect("parse");
    let mut orders = SiblingOrders::new();
    reorder(&mut tree, &mut orders, "p/z", "p/x", DropPosition::Before).expect("reorder");

    // what a project file would carry
    let json = serde_json::to_string(&orders).expect("serialize orders");
    assert_eq!(json, r#"{"p":{"p/x":1,"p/y":2,"p/z":0}}"#);

    let restored: SiblingOrders = serde_json::from_str(&json).expect("deserialize orders");
    assert_eq!(restored, orders);

    // the exported plain map round-trips the same way
    let exported: OrderMap = orders.export();
    let json2 = serde_json::to_string(&exported).expect("serialize map");
    assert_eq!(json, json2);
}
