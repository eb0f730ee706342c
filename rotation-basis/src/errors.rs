use crate::basis::SolveStatus;
use std::fmt::{Display, Formatter};

/// The solver did not return a usable assignment.
///
/// Carries the raw status reported by the solver. Nothing is retried: the caller is expected to
/// adjust the inputs (e.g. widen the rotation bound) and call again.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolverError {
    pub(crate) status: SolveStatus,
}

impl SolverError {
    pub fn status(&self) -> SolveStatus {
        self.status
    }
}

impl Display for SolverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unexpected solver status: {:?}", self.status)
    }
}

impl std::error::Error for SolverError {}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The solver reported a status without a usable assignment.
    Solver(SolverError),
    /// The rotation bound must be at least one.
    InvalidBound(usize),
    /// A cost weight is negative, infinite or NaN.
    InvalidWeight {
        name: &'static str,
        value: f64,
    },
    /// The solver returned an assignment whose size does not match the model.
    MalformedAssignment {
        expected: usize,
        found: usize,
    },
    /// The solver returned an assignment which does not satisfy a constraint of the model.
    ConstraintViolation(String),
    /// A configuration could not be read or parsed.
    Config(String),
}

impl From<SolverError> for Error {
    fn from(value: SolverError) -> Self {
        Self::Solver(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solver(err) => write!(f, "{err}"),
            Self::InvalidBound(bound) => {
                write!(f, "Rotation bound must be positive, got {bound}")
            }
            Self::InvalidWeight { name, value } => {
                write!(
                    f,
                    "The {name} weight must be a finite non-negative number, got {value}"
                )
            }
            Self::MalformedAssignment { expected, found } => {
                write!(
                    f,
                    "Solver assignment has {found} values but the model has {expected} variables"
                )
            }
            Self::ConstraintViolation(msg) => {
                write!(f, "Solver assignment violates the model: {msg}")
            }
            Self::Config(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
