use super::parameters::{CostWeights, RotationBound};
use super::solver::Assignment;
use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The index of a boolean variable in a [`BasisSelectionModel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariableIndex(pub usize);

/// What a variable of the model stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VariableKind {
    /// Set iff the rotation by `candidate` is materialized.
    Choose { candidate: i64 },
    /// Set iff the rotation by `candidate` is used to reconstruct the target of index `target`.
    Represent { target: usize, candidate: i64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    name: String,
    kind: VariableKind,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstraintSense {
    LessOrEqual,
    Equal,
}

impl Display for ConstraintSense {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LessOrEqual => write!(f, "<="),
            Self::Equal => write!(f, "=="),
        }
    }
}

/// A constraint `sum(coefficient * variable) <sense> rhs` over boolean variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearConstraint {
    name: String,
    terms: Vec<(VariableIndex, i64)>,
    sense: ConstraintSense,
    rhs: i64,
}

impl LinearConstraint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terms(&self) -> &[(VariableIndex, i64)] {
        &self.terms
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// Evaluate the left hand side of the constraint.
    ///
    /// The assignment must have a value for every variable of the constraint.
    pub fn lhs(&self, assignment: &Assignment) -> i128 {
        self.terms
            .iter()
            .filter(|(var, _)| assignment.value(*var))
            .map(|&(_, coefficient)| i128::from(coefficient))
            .sum()
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        let lhs = self.lhs(assignment);
        let rhs = i128::from(self.rhs);
        match self.sense {
            ConstraintSense::LessOrEqual => lhs <= rhs,
            ConstraintSense::Equal => lhs == rhs,
        }
    }
}

/// A 0-1 program selecting which rotations to materialize, and how to combine them, in order to
/// reconstruct a list of target rotations.
///
/// With $C$ the candidate rotations and $t\_i$ the targets, the model has variables
/// $\mathrm{choose}\_j$ and $\mathrm{rep}\_{i,j}$ for $j \in C$ and solves:
/// $$
///     \min\ w\_k \sum\_j \mathrm{choose}\_j + w\_l \sum\_{i,j} \mathrm{rep}\_{i,j}
/// $$
/// subject to $\mathrm{rep}\_{i,j} \leq \mathrm{choose}\_j$ and
/// $\sum\_j j \cdot \mathrm{rep}\_{i,j} = t\_i$.
///
/// The model is exposed both in a generic form ([`variables`](Self::variables),
/// [`constraints`](Self::constraints), [`objective`](Self::objective)) for general purpose
/// solvers, and through its structure (candidates, targets, and the adjacency between them) for
/// solvers specialized to this problem.
#[derive(Clone, Debug)]
pub struct BasisSelectionModel {
    candidates: Vec<i64>,
    targets: Vec<i64>,
    weights: CostWeights,
    variables: Vec<Variable>,
    // choose variable of each candidate, indexed like candidates
    choose: Vec<VariableIndex>,
    // representation variables using each candidate, indexed like candidates
    candidate_users: Vec<Vec<VariableIndex>>,
    // (candidate, representation variable) pairs of each target, in candidate order
    target_terms: Vec<Vec<(i64, VariableIndex)>>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<(VariableIndex, f64)>,
}

impl BasisSelectionModel {
    /// Return the candidate rotations, in enumeration order.
    pub fn candidates(&self) -> &[i64] {
        &self.candidates
    }

    /// Return the target rotations, in input order.
    pub fn targets(&self) -> &[i64] {
        &self.targets
    }

    pub fn weights(&self) -> CostWeights {
        self.weights
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variable(&self, index: VariableIndex) -> &Variable {
        &self.variables[index.0]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Return the terms of the objective to minimize, as `(variable, weight)` pairs.
    pub fn objective(&self) -> &[(VariableIndex, f64)] {
        &self.objective
    }

    /// Return the choose variable of the candidate at `candidate_index` in
    /// [`candidates`](Self::candidates).
    pub fn choose_variable(&self, candidate_index: usize) -> VariableIndex {
        self.choose[candidate_index]
    }

    /// Return the representation variables of all targets for the candidate at
    /// `candidate_index`, in target order.
    pub fn candidate_users(&self, candidate_index: usize) -> &[VariableIndex] {
        &self.candidate_users[candidate_index]
    }

    /// Return the `(candidate, representation variable)` pairs of the target at `target_index`,
    /// in candidate order.
    pub fn representation_terms(&self, target_index: usize) -> &[(i64, VariableIndex)] {
        &self.target_terms[target_index]
    }

    /// Return the objective value of an assignment.
    pub fn evaluate_objective(&self, assignment: &Assignment) -> f64 {
        self.objective
            .iter()
            .filter(|(var, _)| assignment.value(*var))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Check that an assignment gives a value to every variable and satisfies every constraint.
    pub fn check(&self, assignment: &Assignment) -> Result<(), Error> {
        if assignment.len() != self.variable_count() {
            return Err(Error::MalformedAssignment {
                expected: self.variable_count(),
                found: assignment.len(),
            });
        }
        match self
            .constraints
            .iter()
            .find(|constraint| !constraint.is_satisfied_by(assignment))
        {
            Some(constraint) => Err(Error::ConstraintViolation(format!(
                "{} evaluates to {}, expected {} {}",
                constraint.name(),
                constraint.lhs(assignment),
                constraint.sense(),
                constraint.rhs()
            ))),
            None => Ok(()),
        }
    }
}

/// Build a [`BasisSelectionModel`] from a list of target rotations.
///
/// # Example
///
/// ```rust
/// use rotation_basis::basis::{BasisModelBuilder, CostWeights, RotationBound};
/// let model = BasisModelBuilder::new(&[3, 5], RotationBound(4), CostWeights::default())
///     .build()
///     .unwrap();
/// // Candidates are -3..=3
/// assert_eq!(model.candidates(), &[-3, -2, -1, 0, 1, 2, 3]);
/// // One choose variable per candidate, one representation variable per (target, candidate)
/// assert_eq!(model.variable_count(), 7 + 2 * 7);
/// // One dominance constraint per representation variable, one reconstruction per target
/// assert_eq!(model.constraints().len(), 2 * 7 + 2);
/// ```
#[derive(Clone, Debug)]
pub struct BasisModelBuilder<'a> {
    rotations: &'a [i64],
    bound: RotationBound,
    weights: CostWeights,
    exclude_zero_candidate: bool,
}

impl<'a> BasisModelBuilder<'a> {
    pub fn new(rotations: &'a [i64], bound: RotationBound, weights: CostWeights) -> Self {
        Self {
            rotations,
            bound,
            weights,
            exclude_zero_candidate: false,
        }
    }

    /// Remove the rotation by `0` from the candidates.
    ///
    /// A rotation by zero never helps reconstructing a target, but the model does not forbid
    /// materializing it. It is kept by default.
    pub fn exclude_zero_candidate(mut self, exclude: bool) -> Self {
        self.exclude_zero_candidate = exclude;
        self
    }

    pub fn build(self) -> Result<BasisSelectionModel, Error> {
        self.bound.validate()?;
        self.weights.validate()?;

        let candidates: Vec<i64> = self
            .bound
            .candidates()
            .filter(|&candidate| !(self.exclude_zero_candidate && candidate == 0))
            .collect();
        let targets = self.rotations.to_vec();

        let mut variables = Vec::with_capacity(candidates.len() * (targets.len() + 1));
        let mut new_variable = |name: String, kind: VariableKind| {
            variables.push(Variable { name, kind });
            VariableIndex(variables.len() - 1)
        };

        let choose: Vec<VariableIndex> = candidates
            .iter()
            .map(|&candidate| {
                new_variable(
                    format!("rot_{candidate}"),
                    VariableKind::Choose { candidate },
                )
            })
            .collect();

        let mut candidate_users = vec![Vec::with_capacity(targets.len()); candidates.len()];
        let mut target_terms = Vec::with_capacity(targets.len());
        for target in 0..targets.len() {
            let mut terms = Vec::with_capacity(candidates.len());
            for (candidate_index, &candidate) in candidates.iter().enumerate() {
                let var = new_variable(
                    format!("rep_{target}_{candidate}"),
                    VariableKind::Represent { target, candidate },
                );
                candidate_users[candidate_index].push(var);
                terms.push((candidate, var));
            }
            target_terms.push(terms);
        }

        let mut constraints = Vec::with_capacity(candidates.len() * targets.len() + targets.len());
        // A rotation can only be used if it is materialized, the converse is not required
        for (candidate_index, users) in candidate_users.iter().enumerate() {
            let candidate = candidates[candidate_index];
            let choose_var = choose[candidate_index];
            for (target, &rep_var) in users.iter().enumerate() {
                constraints.push(LinearConstraint {
                    name: format!("select_{target}_{candidate}"),
                    terms: vec![(rep_var, 1), (choose_var, -1)],
                    sense: ConstraintSense::LessOrEqual,
                    rhs: 0,
                });
            }
        }
        for (target, terms) in target_terms.iter().enumerate() {
            constraints.push(LinearConstraint {
                name: format!("reconstruct_{target}"),
                terms: terms
                    .iter()
                    .map(|&(candidate, var)| (var, candidate))
                    .collect(),
                sense: ConstraintSense::Equal,
                rhs: targets[target],
            });
        }

        let objective = choose
            .iter()
            .map(|&var| (var, self.weights.key_material))
            .chain(
                target_terms
                    .iter()
                    .flatten()
                    .map(|&(_, var)| (var, self.weights.latency)),
            )
            .collect();

        Ok(BasisSelectionModel {
            candidates,
            targets,
            weights: self.weights,
            variables,
            choose,
            candidate_users,
            target_terms,
            constraints,
            objective,
        })
    }
}
