//! Cost-optimal rotation bases.
//!
//! This crate provides two related tools to reduce the number of rotation keys needed by a
//! homomorphic computation while keeping the number of applied rotations low:
//!
//! * [`sdr`] decomposes a rotation amount into signed powers of two (its non-adjacent form), the
//!   classic way to reach any rotation from a logarithmic number of keys,
//! * [`basis`] selects, for an arbitrary list of required rotations, the basis of rotations to
//!   materialize which minimizes a weighted sum of key material and latency.
//!
//! Selections can be described in a Toml file, see [`config`].

pub mod basis;
pub mod config;
pub mod errors;
pub mod sdr;

pub use basis::{find_optimal_basis, find_optimal_basis_with, select_basis, Solution};
pub use errors::{Error, SolverError};
