use super::model::BasisSelectionModel;
use super::solver::{SolveStatus, SolverOutput};
use crate::errors::{Error, SolverError};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// An optimal (or feasible) rotation basis for a list of target rotations.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution {
    objective: f64,
    rotations: Vec<i64>,
    reconstructions: Vec<Vec<i64>>,
    solve_time: Duration,
}

impl Solution {
    /// Return the weighted cost of the basis.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Return the rotations to materialize, in increasing order.
    pub fn rotations(&self) -> &[i64] {
        &self.rotations
    }

    /// Return, for each target in input order, the materialized rotations composing it.
    pub fn reconstructions(&self) -> &[Vec<i64>] {
        &self.reconstructions
    }

    /// Return the wall-clock time spent in the solver.
    pub fn solve_time(&self) -> Duration {
        self.solve_time
    }
}

/// Turn the output of a solver into a [`Solution`].
///
/// Fails if the status is not a success, or if the assignment does not satisfy the model: every
/// reconstruction must sum to its target, and only use materialized rotations.
pub(crate) fn extract_solution(
    model: &BasisSelectionModel,
    output: SolverOutput,
    solve_time: Duration,
) -> Result<Solution, Error> {
    let SolverOutput { status, assignment } = output;
    if !status.is_success() {
        return Err(SolverError { status }.into());
    }
    model.check(&assignment)?;

    let rotations = model
        .candidates()
        .iter()
        .enumerate()
        .filter(|&(candidate_index, _)| assignment.value(model.choose_variable(candidate_index)))
        .map(|(_, &candidate)| candidate)
        .collect();
    let reconstructions = (0..model.targets().len())
        .map(|target| {
            model
                .representation_terms(target)
                .iter()
                .filter(|&&(_, var)| assignment.value(var))
                .map(|&(candidate, _)| candidate)
                .collect()
        })
        .collect();
    let objective = model.evaluate_objective(&assignment);

    debug!(
        ?status,
        objective,
        ?solve_time,
        "Extracted rotation basis"
    );
    if status == SolveStatus::Feasible {
        debug!("Rotation basis is not proven optimal");
    }

    Ok(Solution {
        objective,
        rotations,
        reconstructions,
        solve_time,
    })
}
