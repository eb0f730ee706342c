//! New-types giving a meaning to the raw inputs of a basis selection.

use crate::errors::Error;
use serde::{Deserialize, Serialize};

/// The bound $N$ of the candidate range: rotations by $j$ with $-(N-1) \leq j \leq N-1$ may be
/// materialized.
///
/// For rotations of a vector of $N$ slots, these are all the distinct rotation amounts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RotationBound(pub usize);

impl RotationBound {
    /// Return the candidate rotations in enumeration order, i.e. increasing.
    ///
    /// Bounds beyond the `i64` range are clamped to $-(2^{63}-1) \leq j \leq 2^{63}-1$; such bounds
    /// are rejected when building a model anyway.
    pub fn candidates(&self) -> impl DoubleEndedIterator<Item = i64> {
        let max = i64::try_from(self.0.saturating_sub(1)).unwrap_or(i64::MAX);
        -max..=max
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.0 == 0 || self.0 > i64::MAX as usize / 2 {
            return Err(Error::InvalidBound(self.0));
        }
        Ok(())
    }
}

/// The weights scalarizing the two costs of a basis.
///
/// * `latency` multiplies the total number of rotations applied across all reconstructions,
/// * `key_material` multiplies the number of distinct materialized rotations.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    pub latency: f64,
    pub key_material: f64,
}

impl CostWeights {
    pub fn new(latency: f64, key_material: f64) -> Self {
        Self {
            latency,
            key_material,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        for (name, value) in [("latency", self.latency), ("key material", self.key_material)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

impl Default for CostWeights {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}
