//! Property-based tests for the geometric primitives and the object-map
//! filtering helper, using the `proptest` crate.

use proptest::prelude::*;

use draft_types::{hit_node, hit_segment, CanvasObject, ObjectId, ObjectMap, Vec2};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary coordinate in a reasonable floating-point range.
fn arb_coord() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0
}

fn arb_point() -> impl Strategy<Value = (f64, f64)> {
    (arb_coord(), arb_coord())
}

/// A polyline scratch map: `n` nodes, `n-1` lines, one path over all of
/// them, plus one stray node outside the path.
fn scratch_map(coords: &[(f64, f64)]) -> (ObjectMap, ObjectId, ObjectId) {
    let mut map = ObjectMap::new();
    let mut points = Vec::new();
    for &(x, y) in coords {
        let id = ObjectId::next();
        map.insert(CanvasObject::Node {
            id,
            guide: false,
            point: Vec2::new(x, y),
        });
        points.push(id);
    }
    let mut lines = Vec::new();
    for pair in points.windows(2) {
        let id = ObjectId::next();
        map.insert(CanvasObject::Line {
            id,
            guide: false,
            point1: pair[0],
            point2: pair[1],
        });
        lines.push(id);
    }
    let path_id = ObjectId::next();
    map.insert(CanvasObject::Path {
        id: path_id,
        guide: false,
        points,
        lines,
    });
    let stray = ObjectId::next();
    map.insert(CanvasObject::Node {
        id: stray,
        guide: false,
        point: Vec2::ZERO,
    });
    (map, path_id, stray)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Filtering to a path root is idempotent and drops the stray node.
    #[test]
    fn retain_reachable_is_idempotent(
        coords in prop::collection::vec(arb_point(), 1..6)
    ) {
        let (mut map, path_id, stray) = scratch_map(&coords);
        map.retain_reachable(&[path_id]);
        prop_assert!(!map.contains(stray));
        prop_assert!(map.validate().is_ok());

        let once = map.clone();
        map.retain_reachable(&[path_id]);
        prop_assert_eq!(once, map);
    }

    /// A node always hits itself and never hits a probe further than `tol`.
    #[test]
    fn hit_node_respects_the_radius(
        (px, py) in arb_point(),
        (dx, dy) in arb_point(),
        tol in 0.1f64..50.0,
    ) {
        let p = Vec2::new(px, py);
        prop_assert!(hit_node(p, tol, p));

        // Margin keeps the probe clear of float rounding at the rim.
        let offset = Vec2::new(dx, dy);
        if offset.length() > tol * 1.001 {
            prop_assert!(!hit_node(p, tol, p + offset));
        }
    }

    /// Points sampled on a segment's interior always hit it.
    #[test]
    fn hit_segment_accepts_interior_points(
        (ax, ay) in arb_point(),
        (bx, by) in arb_point(),
        t in 0.0f64..1.0,
        tol in 1.0f64..20.0,
    ) {
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        prop_assume!((b - a).length_squared() >= 1e-2);
        let q = a + (b - a) * t;
        prop_assert!(hit_segment(a, b, tol, q));
    }

    /// Probes displaced perpendicularly past `tol` never hit.
    #[test]
    fn hit_segment_rejects_far_probes(
        (ax, ay) in arb_point(),
        (bx, by) in arb_point(),
        t in 0.0f64..1.0,
        tol in 1.0f64..20.0,
        over in 1.01f64..4.0,
    ) {
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        let d = b - a;
        prop_assume!(d.length_squared() >= 1e-2);
        let normal = Vec2::new(-d.y, d.x) / d.length();
        let q = a + d * t + normal * (tol * over);
        prop_assert!(!hit_segment(a, b, tol, q));
    }
}
