//! Damped Newton iteration over the assembled equation system.
//!
//! Each iteration evaluates the negated residual vector and the rectangular
//! Jacobian, then takes the minimum-norm least-squares step obtained from an
//! SVD pseudoinverse. Over- and under-constrained systems both degrade
//! gracefully: extra rows are satisfied in the least-squares sense, extra
//! columns receive the minimum-norm update.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use draft_types::{Constraint, ObjectMap};

use crate::system::EquationSystem;

/// Singular values below this (relative) threshold are treated as zero when
/// applying the pseudoinverse.
const PINV_EPS: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Upper bound on Newton iterations.
    pub max_iterations: usize,
    /// Stop once the infinity norm of the step falls below this. Zero
    /// disables the early exit and always runs `max_iterations`.
    pub step_tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            step_tolerance: 1e-9,
        }
    }
}

/// What a solve did, for logging and tests.
#[derive(Debug, Clone)]
pub struct SolveSummary {
    pub variables: usize,
    pub equations: usize,
    pub iterations: usize,
    /// Infinity norm of the last Newton step taken.
    pub last_step: f64,
}

/// Re-solve the whole system and write solved coordinates back into the free
/// nodes. Divergence is not detected: after the iteration budget, whatever
/// the parameter vector contains is written back.
pub fn solve(objects: &mut ObjectMap, constraints: &[Constraint]) -> SolveSummary {
    solve_with(objects, constraints, &SolveOptions::default())
}

pub fn solve_with(
    objects: &mut ObjectMap,
    constraints: &[Constraint],
    options: &SolveOptions,
) -> SolveSummary {
    let system = EquationSystem::build(objects, constraints);
    let n = system.column_count();
    let m = system.equation_count();

    let mut summary = SolveSummary {
        variables: n,
        equations: m,
        iterations: 0,
        last_step: 0.0,
    };
    if n == 0 || m == 0 {
        return summary;
    }

    let mut x: Vec<f64> = system.start_values().to_vec();
    let mut row = vec![0.0; n];

    for iteration in 0..options.max_iterations {
        let mut f = DVector::zeros(m);
        let mut jacobian = DMatrix::zeros(m, n);
        for i in 0..m {
            f[i] = -system.residual(i, &x);
            row.iter_mut().for_each(|g| *g = 0.0);
            system.gradient(i, &x, &mut row);
            for (j, g) in row.iter().enumerate() {
                jacobian[(i, j)] = *g;
            }
        }

        let svd = jacobian.svd(true, true);
        let step = match svd.solve(&f, PINV_EPS) {
            Ok(step) => step,
            Err(reason) => {
                debug!(iteration, reason, "pseudoinverse solve failed, stopping");
                break;
            }
        };

        for (value, delta) in x.iter_mut().zip(step.iter()) {
            *value += delta;
        }
        summary.iterations = iteration + 1;
        summary.last_step = step.amax();
        if options.step_tolerance > 0.0 && summary.last_step < options.step_tolerance {
            break;
        }
    }

    system.write_back(&x, objects);
    debug!(
        variables = summary.variables,
        equations = summary.equations,
        iterations = summary.iterations,
        last_step = summary.last_step,
        "constraint solve finished"
    );
    summary
}
