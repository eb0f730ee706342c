//! Configuration of a rotation basis selection.
//! Provide mechanism to load it from a Toml file

use crate::basis::{CostWeights, RotationBound};
use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Knobs of the built-in [`SubsetSearchSolver`](crate::basis::SubsetSearchSolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Stop the search after this many milliseconds and return the best basis found so far.
    /// No limit when unset.
    pub time_limit_ms: Option<u64>,
    /// Largest basis explored by the exhaustive search
    /// Capped to 64 rotations
    pub max_basis_size: usize,
}

impl SearchConfig {
    pub const MAX_BASIS_SIZE: usize = 64;

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: None,
            max_basis_size: Self::MAX_BASIS_SIZE,
        }
    }
}

/// Everything needed to select a rotation basis, apart from the targets.
///
/// # Example
///
/// ```rust
/// use rotation_basis::config::BasisSelectionConfig;
/// let config = BasisSelectionConfig::from_toml_str(
///     r#"
///     bound = 16
///     exclude_zero_candidate = true
///
///     [weights]
///     latency = 0.5
///     key_material = 10.0
///
///     [search]
///     time_limit_ms = 5000
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.bound.0, 16);
/// assert_eq!(config.weights.key_material, 10.0);
/// assert_eq!(config.search.max_basis_size, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisSelectionConfig {
    /// Candidate rotations are taken in `-(bound - 1)..=(bound - 1)`
    pub bound: RotationBound,
    #[serde(default)]
    pub weights: CostWeights,
    /// Drop the rotation by zero from the candidates
    #[serde(default)]
    pub exclude_zero_candidate: bool,
    #[serde(default)]
    pub search: SearchConfig,
}

impl BasisSelectionConfig {
    pub fn new(bound: RotationBound, weights: CostWeights) -> Self {
        Self {
            bound,
            weights,
            exclude_zero_candidate: false,
            search: SearchConfig::default(),
        }
    }

    /// Provide Serde mechanisms from TOML file
    pub fn from_toml(file: impl AsRef<Path>) -> Result<Self, Error> {
        let file = file.as_ref();
        let file_str = std::fs::read_to_string(file)
            .map_err(|err| Error::Config(format!("`{}`: {err}", file.display())))?;
        Self::from_toml_str(&file_str)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content)?;
        config.bound.validate()?;
        config.weights.validate()?;
        Ok(config)
    }
}
