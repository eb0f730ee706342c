use super::model::{BasisSelectionModel, VariableIndex};
use serde::{Deserialize, Serialize};

/// The status reported by a [`Solver`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// The assignment is proven optimal.
    Optimal,
    /// The assignment satisfies the model but may not be optimal.
    Feasible,
    /// The model has no solution.
    Infeasible,
    /// The solver failed, the assignment is meaningless.
    Error,
}

impl SolveStatus {
    /// Return whether an assignment returned with this status can be used.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }
}

/// A value for each boolean variable of a model, indexed by [`VariableIndex`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment(Vec<bool>);

impl Assignment {
    /// Create an assignment of `len` variables, all unset.
    pub fn unset(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// Create an assignment for every variable of `model`, all unset.
    pub fn for_model(model: &BasisSelectionModel) -> Self {
        Self::unset(model.variable_count())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the value of a variable, variables outside of the assignment are unset.
    pub fn value(&self, index: VariableIndex) -> bool {
        self.0.get(index.0).copied().unwrap_or(false)
    }

    /// # Panics
    ///
    /// Panics if `index` is outside of the assignment.
    pub fn set(&mut self, index: VariableIndex, value: bool) {
        self.0[index.0] = value;
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for Assignment {
    fn from(values: Vec<bool>) -> Self {
        Self(values)
    }
}

/// What a [`Solver`] returns for a model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverOutput {
    pub status: SolveStatus,
    pub assignment: Assignment,
}

impl SolverOutput {
    pub fn new(status: SolveStatus, assignment: Assignment) -> Self {
        Self { status, assignment }
    }

    /// An output carrying a failure status and no assignment.
    pub fn failure(status: SolveStatus) -> Self {
        debug_assert!(!status.is_success());
        Self::new(status, Assignment::default())
    }
}

/// The capability of solving a [`BasisSelectionModel`].
///
/// Implementors receive the model once, block until they are done, and report a status with an
/// assignment of every variable of the model. Only [`SolveStatus::Optimal`] and
/// [`SolveStatus::Feasible`] outputs are read.
///
/// The trait is implemented for closures, which is convenient to plug an external engine or a
/// stub:
///
/// ```rust
/// use rotation_basis::basis::{
///     find_optimal_basis_with, BasisSelectionModel, CostWeights, RotationBound, SolveStatus,
///     SolverOutput,
/// };
/// use rotation_basis::Error;
///
/// let infeasible = |_: &BasisSelectionModel| SolverOutput::failure(SolveStatus::Infeasible);
/// let res = find_optimal_basis_with(&infeasible, &[1], RotationBound(2), CostWeights::default());
/// assert!(matches!(res, Err(Error::Solver(err)) if err.status() == SolveStatus::Infeasible));
/// ```
pub trait Solver {
    fn solve(&self, model: &BasisSelectionModel) -> SolverOutput;
}

impl<F> Solver for F
where
    F: Fn(&BasisSelectionModel) -> SolverOutput,
{
    fn solve(&self, model: &BasisSelectionModel) -> SolverOutput {
        self(model)
    }
}
