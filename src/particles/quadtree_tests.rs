use crate::assert_float_eq;
use crate::particles::{Point, Quad, QuadTree};

#[test]
fn test_quad_contains_closed_edges() {
    let quad = Quad::new(0.0, 0.0, 100.0, 50.0);
    assert!(quad.contains(Point::new(50.0, 25.0)));
    // Containment is closed on every edge.
    assert!(quad.contains(Point::new(0.0, 0.0)));
    assert!(quad.contains(Point::new(100.0, 50.0)));
    assert!(!quad.contains(Point::new(100.1, 25.0)));
    assert!(!quad.contains(Point::new(50.0, -0.1)));
}

#[test]
fn test_quad_intersects() {
    let quad = Quad::new(0.0, 0.0, 100.0, 100.0);
    assert!(quad.intersects(&Quad::new(50.0, 50.0, 100.0, 100.0)));
    // Touching edges count as intersecting.
    assert!(quad.intersects(&Quad::new(100.0, 0.0, 10.0, 10.0)));
    assert!(!quad.intersects(&Quad::new(200.0, 200.0, 10.0, 10.0)));
}

#[test]
fn test_overscanned_region() {
    let view = Quad::new(0.0, 0.0, 100.0, 50.0);
    let bounds = view.overscanned(20.0);
    // Both axes scale by the view width; the result is a centered square.
    assert_float_eq(bounds.x, -1000.0, 1e-12, None);
    assert_float_eq(bounds.y, -1000.0, 1e-12, None);
    assert_float_eq(bounds.width, 2000.0, 1e-12, None);
    assert_float_eq(bounds.height, 2000.0, 1e-12, None);
}

#[test]
fn test_insert_within_capacity() {
    let mut tree = QuadTree::new(Quad::new(0.0, 0.0, 100.0, 100.0), 2);
    assert!(tree.insert(Point::new(10.0, 10.0)));
    assert!(tree.insert(Point::new(90.0, 90.0)));
    assert!(!tree.divided, "Tree should not subdivide below capacity");
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_insert_outside_root_fails_without_mutation() {
    let mut tree = QuadTree::new(Quad::new(0.0, 0.0, 100.0, 100.0), 2);
    tree.insert(Point::new(10.0, 10.0));
    let before = tree.clone();

    assert!(!tree.insert(Point::new(-1.0, 10.0)));
    assert!(!tree.insert(Point::new(10.0, 101.0)));
    assert_eq!(tree, before, "Failed insertion must leave the tree structurally unchanged");
}

#[test]
fn test_subdivision_tiles_parent() {
    let mut tree = QuadTree::new(Quad::new(0.0, 0.0, 100.0, 80.0), 1);
    tree.insert(Point::new(10.0, 10.0));
    tree.insert(Point::new(90.0, 70.0));
    assert!(tree.divided);

    let ne = tree.ne.as_ref().unwrap().boundary;
    let nw = tree.nw.as_ref().unwrap().boundary;
    let se = tree.se.as_ref().unwrap().boundary;
    let sw = tree.sw.as_ref().unwrap().boundary;

    // Each child is exactly a quarter of the parent area.
    for child in [&ne, &nw, &se, &sw] {
        assert_float_eq(child.width, 50.0, 1e-12, None);
        assert_float_eq(child.height, 40.0, 1e-12, None);
    }
    // The four children meet at the parent's geometric center with no gap
    // and no overlap at the nominal level.
    assert_float_eq(nw.x, 0.0, 1e-12, None);
    assert_float_eq(nw.y, 0.0, 1e-12, None);
    assert_float_eq(ne.x, 50.0, 1e-12, None);
    assert_float_eq(ne.y, 0.0, 1e-12, None);
    assert_float_eq(sw.x, 0.0, 1e-12, None);
    assert_float_eq(sw.y, 40.0, 1e-12, None);
    assert_float_eq(se.x, 50.0, 1e-12, None);
    assert_float_eq(se.y, 40.0, 1e-12, None);
}

fn assert_capacity_invariant(node: &QuadTree) {
    assert!(
        node.points.len() <= node.capacity,
        "Node holds {} points with capacity {}",
        node.points.len(),
        node.capacity
    );
    for child in [&node.ne, &node.nw, &node.se, &node.sw] {
        if let Some(child) = child {
            assert_capacity_invariant(child);
        }
    }
}

#[test]
fn test_capacity_never_exceeded() {
    let mut tree = QuadTree::new(Quad::new(0.0, 0.0, 100.0, 100.0), 2);
    // A deterministic scatter that forces several levels of subdivision.
    for i in 0..50 {
        let x = (i as f64 * 37.0) % 100.0;
        let y = (i as f64 * 53.0) % 100.0;
        assert!(tree.insert(Point::new(x, y)));
    }
    assert_eq!(tree.len(), 50);
    assert_capacity_invariant(&tree);
}

#[test]
fn test_midline_tie_breaks_to_ne() {
    let mut tree = QuadTree::new(Quad::new(0.0, 0.0, 100.0, 100.0), 1);
    tree.insert(Point::new(10.0, 10.0));
    // Exactly on the shared corner of all four quadrants: with closed
    // containment more than one child accepts it, and the NE-first insertion
    // order resolves the tie.
    assert!(tree.insert(Point::new(50.0, 50.0)));
    assert_eq!(tree.ne.as_ref().unwrap().len(), 1);
    assert_eq!(tree.nw.as_ref().unwrap().len(), 0);
    assert_eq!(tree.se.as_ref().unwrap().len(), 0);
    assert_eq!(tree.sw.as_ref().unwrap().len(), 0);
}

#[test]
fn test_build_skips_out_of_bounds_points() {
    let points = vec![
        Point::new(10.0, 10.0),
        Point::new(90.0, 90.0),
        Point::new(150.0, 10.0), // outside
        Point::new(-5.0, -5.0),  // outside
    ];
    let tree = QuadTree::build(Quad::new(0.0, 0.0, 100.0, 100.0), 2, points);
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_query_range() {
    let points: Vec<Point> = (0..10)
        .map(|i| Point::new(i as f64 * 10.0, i as f64 * 10.0))
        .collect();
    let tree = QuadTree::build(Quad::new(0.0, 0.0, 100.0, 100.0), 2, points);

    let mut found = Vec::new();
    tree.query(&Quad::new(0.0, 0.0, 45.0, 45.0), &mut found);
    // Points on the diagonal at 0, 10, 20, 30, 40.
    assert_eq!(found.len(), 5);
    for point in &found {
        assert!(point.x <= 45.0 && point.y <= 45.0);
    }

    let mut none = Vec::new();
    tree.query(&Quad::new(200.0, 200.0, 10.0, 10.0), &mut none);
    assert!(none.is_empty());
}

#[test]
fn test_boundaries_collect_every_node() {
    let mut tree = QuadTree::new(Quad::new(0.0, 0.0, 100.0, 100.0), 1);
    tree.insert(Point::new(10.0, 10.0));
    let mut regions = Vec::new();
    tree.boundaries(&mut regions);
    assert_eq!(regions.len(), 1, "An undivided root contributes one region");

    tree.insert(Point::new(90.0, 90.0));
    regions.clear();
    tree.boundaries(&mut regions);
    assert_eq!(regions.len(), 5, "Root plus four children after subdivision");
}
