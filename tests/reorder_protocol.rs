use egui_mindmap::{parse_outline, reorder, DropPosition, ReorderError, SiblingOrders, Tree};

fn pxyz() -> Tree {
    parse_outline("P\n  X\n  Y\n  Z\n").unwrap()
}

fn child_ids(tree: &Tree) -> Vec<String> {
    tree.child_ids(tree.root())
}

#[test]
fn dropping_last_before_first_yields_z_x_y() {
    let mut tree = pxyz();
    let mut orders = SiblingOrders::new();

    reorder(&mut tree, &mut orders, "p/z", "p/x", DropPosition::Before).unwrap();

    assert_eq!(child_ids(&tree), ["p/z", "p/x", "p/y"]);
}

#[test]
fn dropping_first_after_last_yields_y_z_x() {
    let mut tree = pxyz();
    let mut orders = SiblingOrders::new();

    reorder(&mut tree, &mut orders, "p/x", "p/z", DropPosition::After).unwrap();

    assert_eq!(child_ids(&tree), ["p/y", "p/z", "p/x"]);
}

#[test]
fn cross_parent_drop_changes_nothing() {
    let mut tree = parse_outline("P\n  X\n  Y\n  Q\n    W\n").unwrap();
    let mut orders = SiblingOrders::new();
    orders.record("p", &["p/y".to_owned(), "p/x".to_owned(), "p/q".to_owned()]);
    orders.apply_tree(&mut tree);
    let exported_before = orders.export();
    let children_before = child_ids(&tree);

    let err = reorder(&mut tree, &mut orders, "p/x", "p/q/w", DropPosition::Before).unwrap_err();

    assert!(matches!(err, ReorderError::NotSiblings { .. }));
    assert_eq!(child_ids(&tree), children_before);
    assert_eq!(orders.export(), exported_before);
}

#[test]
fn moves_mutate_the_tree_iff_the_nodes_are_siblings() {
    let mut tree = parse_outline("R\n  A\n    A1\n    A2\n  B\n    B1\n").unwrap();
    let mut orders = SiblingOrders::new();

    // siblings: mutates
    assert!(reorder(&mut tree, &mut orders, "r/a/a2", "r/a/a1", DropPosition::Before).is_ok());
    let a = tree.node_by_id("r/a").unwrap();
    assert_eq!(tree.child_ids(a), ["r/a/a2", "r/a/a1"]);

    // different parents: refused, nothing moves
    let before: Vec<String> = tree.child_ids(tree.root());
    assert!(reorder(&mut tree, &mut orders, "r/a/a1", "r/b/b1", DropPosition::After).is_err());
    assert_eq!(tree.child_ids(tree.root()), before);
    assert_eq!(tree.child_ids(a), ["r/a/a2", "r/a/a1"]);
}

#[test]
fn successful_reorders_preserve_node_and_child_counts() {
    let mut tree = parse_outline("P\n  X\n  Y\n  Z\n  Q\n    W\n").unwrap();
    let mut orders = SiblingOrders::new();
    let nodes_before = tree.node_count();
    let children_before = tree.children(tree.root()).len();

    reorder(&mut tree, &mut orders, "p/q", "p/x", DropPosition::Before).unwrap();
    reorder(&mut tree, &mut orders, "p/y", "p/z", DropPosition::After).unwrap();

    assert_eq!(tree.node_count(), nodes_before);
    assert_eq!(tree.children(tree.root()).len(), children_before);
}

#[test]
fn applying_orders_twice_matches_applying_once() {
    let mut tree = pxyz();
    let mut orders = SiblingOrders::new();
    reorder(&mut tree, &mut orders, "p/z", "p/x", DropPosition::Before).unwrap();

    let mut rebuilt = pxyz();
    orders.apply_tree(&mut rebuilt);
    let once = rebuilt.child_ids(rebuilt.root());
    orders.apply_tree(&mut rebuilt);

    assert_eq!(rebuilt.child_ids(rebuilt.root()), once);
    assert_eq!(once, ["p/z", "p/x", "p/y"]);
}

#[test]
fn unranked_children_keep_their_relative_order() {
    // children [y, z, x, m]; only x and z carry ranks
    let mut tree = parse_outline("P\n  Y\n  Z\n  X\n  M\n").unwrap();
    let mut orders = SiblingOrders::new();
    let map = serde_json::json!({"p": {"p/x": 0, "p/z": 1}});
    assert!(orders.import_value(&map, &mut tree));

    // ranked first by rank, unranked behind in their old order: y before m
    assert_eq!(child_ids(&tree), ["p/x", "p/z", "p/y", "p/m"]);
}

#[test]
fn orders_recorded_against_one_parse_reapply_against_a_rebuild() {
    let text = "Trip\n  Packing\n    Tent\n    Stove\n    Food\n  Route\n";
    let mut tree = parse_outline(text).unwrap();
    let mut orders = SiblingOrders::new();

    reorder(
        &mut tree,
        &mut orders,
        "trip/packing/food",
        "trip/packing/tent",
        DropPosition::Before,
    )
    .unwrap();

    // the document is re-parsed, the old tree is gone
    let mut rebuilt = parse_outline(text).unwrap();
    orders.apply_tree(&mut rebuilt);

    let packing = rebuilt.node_by_id("trip/packing").unwrap();
    assert_eq!(
        rebuilt.child_ids(packing),
        ["trip/packing/food", "trip/packing/tent", "trip/packing/stove"]
    );
}

#[test]
fn import_of_export_leaves_ordering_unchanged() {
    let mut tree = pxyz();
    let mut orders = SiblingOrders::new();
    reorder(&mut tree, &mut orders, "p/y", "p/x", DropPosition::Before).unwrap();

    let exported = orders.export();
    orders.import(exported.clone(), &mut tree);

    assert_eq!(orders.export(), exported);
    assert_eq!(child_ids(&tree), ["p/y", "p/x", "p/z"]);
}

#[test]
fn malformed_import_keeps_the_map_byte_for_byte() {
    let mut tree = pxyz();
    let mut orders = SiblingOrders::new();
    reorder(&mut tree, &mut orders, "p/z", "p/y", DropPosition::Before).unwrap();

    let before = serde_json::to_string(&orders).unwrap();
    assert!(!orders.import_value(&serde_json::json!("not an object"), &mut tree));
    let after = serde_json::to_string(&orders).unwrap();

    assert_eq!(before, after);
}
