//! Selection of a cost-optimal basis of rotations.
//!
//! Given a list of rotations to apply, one can either materialize the key material of each of
//! them, or materialize a smaller basis and apply several rotations in a row. The first option is
//! the fastest, the second one the lightest. This module finds the best trade-off for a given
//! pair of [`CostWeights`] by building a 0-1 program ([`BasisModelBuilder`]), handing it to a
//! [`Solver`], and reading back a [`Solution`].
//!
//! # Example
//!
//! ```rust
//! use rotation_basis::basis::find_optimal_basis;
//! // Rotations by 1, 2 and 3 slots of a vector of 8 slots, key material is expensive
//! let solution = find_optimal_basis(&[1, 2, 3], 8, 0.5, 10.0).unwrap();
//! assert_eq!(solution.rotations(), &[1, 2]);
//! assert_eq!(solution.reconstructions(), &[vec![1], vec![2], vec![1, 2]]);
//! assert_eq!(solution.objective(), 22.0);
//! ```
use crate::config::BasisSelectionConfig;
use crate::errors::Error;
use std::time::Instant;
use tracing::{debug, instrument};

pub use model::*;
pub use parameters::*;
pub use search::*;
pub use solution::*;
pub use solver::*;

mod model;
mod parameters;
mod search;
mod solution;
mod solver;

/// Find the best basis to reconstruct `rotations` using candidates in `-(n - 1)..=(n - 1)`, with
/// the built-in [`SubsetSearchSolver`].
pub fn find_optimal_basis(
    rotations: &[i64],
    n: usize,
    latency_weight: f64,
    key_material_weight: f64,
) -> Result<Solution, Error> {
    find_optimal_basis_with(
        &SubsetSearchSolver::default(),
        rotations,
        RotationBound(n),
        CostWeights::new(latency_weight, key_material_weight),
    )
}

/// Find the best basis to reconstruct `rotations` with the given solver.
///
/// The solver is called exactly once, its failures are reported as [`Error::Solver`] and never
/// retried.
pub fn find_optimal_basis_with<S>(
    solver: &S,
    rotations: &[i64],
    bound: RotationBound,
    weights: CostWeights,
) -> Result<Solution, Error>
where
    S: Solver + ?Sized,
{
    let model = BasisModelBuilder::new(rotations, bound, weights).build()?;
    solve_model(solver, &model)
}

/// Find the best basis to reconstruct `rotations` as described by a configuration.
pub fn select_basis(rotations: &[i64], config: &BasisSelectionConfig) -> Result<Solution, Error> {
    let model = BasisModelBuilder::new(rotations, config.bound, config.weights)
        .exclude_zero_candidate(config.exclude_zero_candidate)
        .build()?;
    solve_model(&SubsetSearchSolver::new(config.search.clone()), &model)
}

#[instrument(
    level = "debug",
    skip_all,
    fields(
        variables = model.variable_count(),
        constraints = model.constraints().len()
    )
)]
fn solve_model<S>(solver: &S, model: &BasisSelectionModel) -> Result<Solution, Error>
where
    S: Solver + ?Sized,
{
    let start = Instant::now();
    let output = solver.solve(model);
    let solve_time = start.elapsed();
    debug!(status = ?output.status, ?solve_time, "Solver returned");
    extract_solution(model, output, solve_time)
}
