//! Lowering of geometric constraints to a scalar equation system.
//!
//! Each constraint is lowered to zero or more `Equation` records over the
//! coordinates of the points it references. `Node` coordinates become solver
//! variables, allocated a column in first-encounter order during the
//! constraint walk; `FixedNode` coordinates are folded in as constants.
//! Residual and Jacobian evaluation dispatch over the record kind.

use std::collections::HashMap;

use draft_types::{CanvasObject, Constraint, ObjectId, ObjectMap, Vec2};

/// Coordinate axis of a point-like object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// One scalar operand of an equation: either a solver column or a constant
/// coordinate of a fixed point. Jacobian writes against `Fixed` are dropped.
#[derive(Debug, Clone, Copy)]
enum VarRef {
    Free(usize),
    Fixed(f64),
}

/// Both coordinates of a referenced point.
#[derive(Debug, Clone, Copy)]
struct PointRef {
    x: VarRef,
    y: VarRef,
}

/// A single scalar equation with analytic residual and gradient.
#[derive(Debug, Clone, Copy)]
enum Equation {
    /// (p2 - p1) . (p4 - p3) = 0
    Dot {
        p1: PointRef,
        p2: PointRef,
        p3: PointRef,
        p4: PointRef,
    },
    /// p1.x - p2.x = 0
    DeltaX { p1: PointRef, p2: PointRef },
    /// p1.y - p2.y = 0
    DeltaY { p1: PointRef, p2: PointRef },
    /// |p2 - p1|^2 - d^2 = 0
    DistanceSq { p1: PointRef, p2: PointRef, d: f64 },
    /// (p2 - p1) x (p - p1) = 0, i.e. p is collinear with p1, p2
    PointOnLine {
        p: PointRef,
        p1: PointRef,
        p2: PointRef,
    },
}

/// The assembled system: variable table, starting values, equations.
#[derive(Debug, Default)]
pub struct EquationSystem {
    /// Column index -> owning object coordinate, in first-encounter order.
    columns: Vec<(ObjectId, Axis)>,
    /// Starting value of each column.
    start: Vec<f64>,
    equations: Vec<Equation>,
}

impl EquationSystem {
    /// Walk `constraints` and lower each to equations over interned
    /// variables. Constraints whose referents are missing or of the wrong
    /// kind are skipped; `Parallel` lowers to nothing.
    pub fn build(objects: &ObjectMap, constraints: &[Constraint]) -> Self {
        let mut builder = Builder {
            objects,
            system: EquationSystem::default(),
            interned: HashMap::new(),
        };
        for constraint in constraints {
            builder.lower(constraint);
        }
        builder.system
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn equation_count(&self) -> usize {
        self.equations.len()
    }

    /// Starting values of all columns, cloneable into the iteration vector.
    pub fn start_values(&self) -> &[f64] {
        &self.start
    }

    /// Evaluate every residual at the starting values.
    pub fn residuals_at_start(&self) -> Vec<f64> {
        self.equations
            .iter()
            .map(|eq| eq.residual(&self.start))
            .collect()
    }

    /// Residual of equation `row` at `x`.
    pub fn residual(&self, row: usize, x: &[f64]) -> f64 {
        self.equations[row].residual(x)
    }

    /// Accumulate the gradient of equation `row` at `x` into `out`, which
    /// must be zeroed by the caller and have `column_count()` entries.
    pub fn gradient(&self, row: usize, x: &[f64], out: &mut [f64]) {
        self.equations[row].gradient(x, out);
    }

    /// Copy solved column values back into the owning free nodes.
    pub fn write_back(&self, x: &[f64], objects: &mut ObjectMap) {
        for (col, (id, axis)) in self.columns.iter().enumerate() {
            if let Some(mut p) = objects.point_of(*id) {
                match axis {
                    Axis::X => p.x = x[col],
                    Axis::Y => p.y = x[col],
                }
                objects.set_node_point(*id, p);
            }
        }
    }
}

struct Builder<'a> {
    objects: &'a ObjectMap,
    system: EquationSystem,
    interned: HashMap<(ObjectId, Axis), usize>,
}

impl Builder<'_> {
    fn lower(&mut self, constraint: &Constraint) {
        match constraint {
            Constraint::Perpendicular { line1, line2 } => {
                let Some((p1, p2)) = self.line(*line1) else {
                    return;
                };
                let Some((p3, p4)) = self.line(*line2) else {
                    return;
                };
                self.system.equations.push(Equation::Dot { p1, p2, p3, p4 });
            }
            // No equation yet: the constraint is stored and serialized but
            // does not participate in the solve.
            Constraint::Parallel { .. } => {}
            Constraint::Coincident { object1, object2 } => {
                self.lower_coincident(*object1, *object2);
            }
            Constraint::Horizontal { line } => {
                if let Some((p1, p2)) = self.line(*line) {
                    self.system.equations.push(Equation::DeltaY { p1, p2 });
                }
            }
            Constraint::Vertical { line } => {
                if let Some((p1, p2)) = self.line(*line) {
                    self.system.equations.push(Equation::DeltaX { p1, p2 });
                }
            }
            Constraint::Distance { object1, object2, d } => {
                let pair = match object2 {
                    Some(second) => match (self.point(*object1), self.point(*second)) {
                        (Some(a), Some(b)) => Some((a, b)),
                        _ => None,
                    },
                    None => self.line(*object1),
                };
                if let Some((p1, p2)) = pair {
                    self.system
                        .equations
                        .push(Equation::DistanceSq { p1, p2, d: *d });
                }
            }
        }
    }

    /// (point, point) lowers to per-axis deltas; (point, line) in either
    /// operand order lowers to the collinearity cross product.
    fn lower_coincident(&mut self, a: ObjectId, b: ObjectId) {
        let a_is_point = self.is_point(a);
        let b_is_point = self.is_point(b);
        match (a_is_point, b_is_point) {
            (true, true) => {
                let (Some(p1), Some(p2)) = (self.point(a), self.point(b)) else {
                    return;
                };
                self.system.equations.push(Equation::DeltaX { p1, p2 });
                self.system.equations.push(Equation::DeltaY { p1, p2 });
            }
            (true, false) => {
                let (Some(p), Some((p1, p2))) = (self.point(a), self.line(b)) else {
                    return;
                };
                self.system.equations.push(Equation::PointOnLine { p, p1, p2 });
            }
            (false, true) => {
                let (Some(p), Some((p1, p2))) = (self.point(b), self.line(a)) else {
                    return;
                };
                self.system.equations.push(Equation::PointOnLine { p, p1, p2 });
            }
            (false, false) => {}
        }
    }

    fn is_point(&self, id: ObjectId) -> bool {
        self.objects.get(id).is_some_and(|o| o.is_point_like())
    }

    /// Intern both coordinates of a point-like object. Free nodes allocate
    /// columns on first encounter; fixed nodes fold to constants.
    fn point(&mut self, id: ObjectId) -> Option<PointRef> {
        match self.objects.get(id) {
            Some(CanvasObject::Node { point, .. }) => {
                let point = *point;
                Some(PointRef {
                    x: self.column(id, Axis::X, point.x),
                    y: self.column(id, Axis::Y, point.y),
                })
            }
            Some(CanvasObject::FixedNode { point, .. }) => Some(PointRef {
                x: VarRef::Fixed(point.x),
                y: VarRef::Fixed(point.y),
            }),
            _ => None,
        }
    }

    fn line(&mut self, id: ObjectId) -> Option<(PointRef, PointRef)> {
        let (a, b) = self.objects.line_endpoints(id)?;
        Some((self.point(a)?, self.point(b)?))
    }

    fn column(&mut self, id: ObjectId, axis: Axis, value: f64) -> VarRef {
        let system = &mut self.system;
        let col = *self.interned.entry((id, axis)).or_insert_with(|| {
            system.columns.push((id, axis));
            system.start.push(value);
            system.columns.len() - 1
        });
        VarRef::Free(col)
    }
}

fn value(x: &[f64], v: VarRef) -> f64 {
    match v {
        VarRef::Free(col) => x[col],
        VarRef::Fixed(c) => c,
    }
}

fn point_at(x: &[f64], p: PointRef) -> Vec2 {
    Vec2::new(value(x, p.x), value(x, p.y))
}

/// Accumulate a partial derivative; writes against fixed coordinates drop.
fn add(out: &mut [f64], v: VarRef, g: f64) {
    if let VarRef::Free(col) = v {
        out[col] += g;
    }
}

impl Equation {
    fn residual(&self, x: &[f64]) -> f64 {
        match *self {
            Equation::Dot { p1, p2, p3, p4 } => {
                let u = point_at(x, p2) - point_at(x, p1);
                let v = point_at(x, p4) - point_at(x, p3);
                u.dot(&v)
            }
            Equation::DeltaX { p1, p2 } => value(x, p1.x) - value(x, p2.x),
            Equation::DeltaY { p1, p2 } => value(x, p1.y) - value(x, p2.y),
            Equation::DistanceSq { p1, p2, d } => {
                (point_at(x, p2) - point_at(x, p1)).length_squared() - d * d
            }
            Equation::PointOnLine { p, p1, p2 } => {
                let a = point_at(x, p1);
                (point_at(x, p2) - a).cross(&(point_at(x, p) - a))
            }
        }
    }

    fn gradient(&self, x: &[f64], out: &mut [f64]) {
        match *self {
            Equation::Dot { p1, p2, p3, p4 } => {
                let u = point_at(x, p2) - point_at(x, p1);
                let v = point_at(x, p4) - point_at(x, p3);
                add(out, p1.x, -v.x);
                add(out, p1.y, -v.y);
                add(out, p2.x, v.x);
                add(out, p2.y, v.y);
                add(out, p3.x, -u.x);
                add(out, p3.y, -u.y);
                add(out, p4.x, u.x);
                add(out, p4.y, u.y);
            }
            Equation::DeltaX { p1, p2 } => {
                add(out, p1.x, 1.0);
                add(out, p2.x, -1.0);
            }
            Equation::DeltaY { p1, p2 } => {
                add(out, p1.y, 1.0);
                add(out, p2.y, -1.0);
            }
            Equation::DistanceSq { p1, p2, .. } => {
                let u = point_at(x, p2) - point_at(x, p1);
                add(out, p1.x, -2.0 * u.x);
                add(out, p1.y, -2.0 * u.y);
                add(out, p2.x, 2.0 * u.x);
                add(out, p2.y, 2.0 * u.y);
            }
            Equation::PointOnLine { p, p1, p2 } => {
                // r = (x2-x1)(py-y1) - (y2-y1)(px-x1)
                let a = point_at(x, p1);
                let b = point_at(x, p2);
                let q = point_at(x, p);
                add(out, p1.x, b.y - q.y);
                add(out, p1.y, q.x - b.x);
                add(out, p2.x, q.y - a.y);
                add(out, p2.y, a.x - q.x);
                add(out, p.x, a.y - b.y);
                add(out, p.y, b.x - a.x);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(objects: Vec<CanvasObject>) -> ObjectMap {
        let mut map = ObjectMap::new();
        for o in objects {
            map.insert(o);
        }
        map
    }

    fn node(id: u64, x: f64, y: f64) -> CanvasObject {
        CanvasObject::Node {
            id: ObjectId(id),
            guide: false,
            point: Vec2::new(x, y),
        }
    }

    fn fixed(id: u64, x: f64, y: f64) -> CanvasObject {
        CanvasObject::FixedNode {
            id: ObjectId(id),
            guide: false,
            point: Vec2::new(x, y),
        }
    }

    fn line(id: u64, a: u64, b: u64) -> CanvasObject {
        CanvasObject::Line {
            id: ObjectId(id),
            guide: false,
            point1: ObjectId(a),
            point2: ObjectId(b),
        }
    }

    #[test]
    fn columns_allocate_in_first_encounter_order() {
        let map = map_with(vec![
            node(1, 0.0, 0.0),
            node(2, 100.0, 5.0),
            line(3, 1, 2),
        ]);
        let system = EquationSystem::build(
            &map,
            &[Constraint::Horizontal { line: ObjectId(3) }],
        );
        assert_eq!(system.column_count(), 4);
        assert_eq!(system.start_values(), &[0.0, 0.0, 100.0, 5.0]);
        assert_eq!(system.equation_count(), 1);
    }

    #[test]
    fn shared_endpoint_interned_once() {
        // Two lines through a shared corner node.
        let map = map_with(vec![
            node(1, 0.0, 0.0),
            node(2, 10.0, 0.0),
            node(3, 10.0, 10.0),
            line(4, 1, 2),
            line(5, 2, 3),
        ]);
        let system = EquationSystem::build(
            &map,
            &[Constraint::Perpendicular {
                line1: ObjectId(4),
                line2: ObjectId(5),
            }],
        );
        assert_eq!(system.column_count(), 6);
    }

    #[test]
    fn fixed_nodes_take_no_columns() {
        let map = map_with(vec![
            fixed(1, 0.0, 0.0),
            node(2, 3.0, 4.0),
            line(3, 1, 2),
        ]);
        let system = EquationSystem::build(
            &map,
            &[Constraint::Distance {
                object1: ObjectId(3),
                object2: None,
                d: 10.0,
            }],
        );
        assert_eq!(system.column_count(), 2);
        assert_eq!(system.residuals_at_start(), vec![25.0 - 100.0]);
    }

    #[test]
    fn parallel_lowers_to_nothing() {
        let map = map_with(vec![
            node(1, 0.0, 0.0),
            node(2, 10.0, 0.0),
            node(3, 0.0, 5.0),
            node(4, 7.0, 8.0),
            line(5, 1, 2),
            line(6, 3, 4),
        ]);
        let system = EquationSystem::build(
            &map,
            &[Constraint::Parallel {
                line1: ObjectId(5),
                line2: ObjectId(6),
            }],
        );
        assert_eq!(system.equation_count(), 0);
        assert_eq!(system.column_count(), 0);
    }

    #[test]
    fn missing_referents_are_skipped() {
        let map = map_with(vec![node(1, 0.0, 0.0)]);
        let system = EquationSystem::build(
            &map,
            &[
                Constraint::Horizontal { line: ObjectId(99) },
                Constraint::Coincident {
                    object1: ObjectId(1),
                    object2: ObjectId(98),
                },
            ],
        );
        assert_eq!(system.equation_count(), 0);
    }

    #[test]
    fn gradients_match_finite_differences() {
        let map = map_with(vec![
            node(1, 0.3, -1.2),
            node(2, 4.1, 2.7),
            node(3, -2.0, 5.0),
            node(4, 6.0, -3.5),
            line(5, 1, 2),
            line(6, 3, 4),
        ]);
        let constraints = vec![
            Constraint::Perpendicular {
                line1: ObjectId(5),
                line2: ObjectId(6),
            },
            Constraint::Distance {
                object1: ObjectId(1),
                object2: Some(ObjectId(3)),
                d: 4.0,
            },
            Constraint::Coincident {
                object1: ObjectId(4),
                object2: ObjectId(5),
            },
        ];
        let system = EquationSystem::build(&map, &constraints);
        let x: Vec<f64> = system.start_values().to_vec();
        let h = 1e-7;

        for row in 0..system.equation_count() {
            let mut analytic = vec![0.0; system.column_count()];
            system.gradient(row, &x, &mut analytic);
            for col in 0..system.column_count() {
                let mut bumped = x.clone();
                bumped[col] += h;
                let numeric = (system.residual(row, &bumped) - system.residual(row, &x)) / h;
                assert!(
                    (numeric - analytic[col]).abs() < 1e-4,
                    "row {row} col {col}: analytic {} vs numeric {}",
                    analytic[col],
                    numeric
                );
            }
        }
    }
}
