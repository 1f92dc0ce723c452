pub mod newton;
pub mod system;

pub use newton::{solve, solve_with, SolveOptions, SolveSummary};
pub use system::EquationSystem;

use draft_types::{Constraint, ObjectMap};

/// Evaluate every scalar residual of `constraints` at the current object
/// coordinates, in equation order. Constraints that do not resolve (missing
/// or mistyped referents, or the parallel stub) contribute nothing.
pub fn residuals(objects: &ObjectMap, constraints: &[Constraint]) -> Vec<f64> {
    let system = EquationSystem::build(objects, constraints);
    system.residuals_at_start()
}
