//! Style mappings: allocations of a fund across benchmark factors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Date, FactorName, PrimitivesError};

/// Weights assigning a fund's behavior to a basket of benchmark factors.
///
/// Each weight lies in [0, 1]. Mappings produced by the regression engine
/// also sum to one; externally supplied mappings are checked with
/// [`StyleMapping::is_normalized`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<FactorName, f64>", into = "BTreeMap<FactorName, f64>")]
pub struct StyleMapping {
    weights: BTreeMap<FactorName, f64>,
}

impl StyleMapping {
    /// Create a mapping from (factor, weight) pairs.
    ///
    /// # Errors
    /// Returns `PrimitivesError::InvalidWeight` if a weight is not finite or
    /// lies outside [0, 1].
    pub fn new<N, I>(weights: I) -> Result<Self, PrimitivesError>
    where
        N: Into<FactorName>,
        I: IntoIterator<Item = (N, f64)>,
    {
        let mut map = BTreeMap::new();
        for (name, weight) in weights {
            let name = name.into();
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(PrimitivesError::InvalidWeight { factor: name.0, weight });
            }
            map.insert(name, weight);
        }
        Ok(Self { weights: map })
    }

    /// Weight for a factor, or 0 if the factor is not in the mapping.
    #[must_use]
    pub fn weight(&self, factor: &str) -> f64 {
        self.get(factor).unwrap_or(0.0)
    }

    /// Weight for a factor, if present.
    #[must_use]
    pub fn get(&self, factor: &str) -> Option<f64> {
        self.weights.get(factor).copied()
    }

    /// Weights in the order of the given factor names, 0 for absent factors.
    #[must_use]
    pub fn weights_for(&self, factors: &[FactorName]) -> Vec<f64> {
        factors.iter().map(|f| self.weights.get(f).copied().unwrap_or(0.0)).collect()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Whether the weights sum to one within `tolerance`.
    #[must_use]
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        !self.weights.is_empty() && (self.total() - 1.0).abs() <= tolerance
    }

    /// Number of factors in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over (factor, weight) pairs in factor-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&FactorName, f64)> + '_ {
        self.weights.iter().map(|(name, w)| (name, *w))
    }
}

impl TryFrom<BTreeMap<FactorName, f64>> for StyleMapping {
    type Error = PrimitivesError;

    fn try_from(weights: BTreeMap<FactorName, f64>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<StyleMapping> for BTreeMap<FactorName, f64> {
    fn from(mapping: StyleMapping) -> Self {
        mapping.weights
    }
}

/// A mapping that is valid over the half-open interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// First date the mapping applies.
    pub start: Date,
    /// First date the mapping no longer applies.
    pub end: Date,
    /// The allocation.
    pub mapping: StyleMapping,
}

impl MappingRecord {
    /// Create a new mapping record.
    #[must_use]
    pub const fn new(start: Date, end: Date, mapping: StyleMapping) -> Self {
        Self { start, end, mapping }
    }

    /// Whether the record applies on `as_of`.
    #[must_use]
    pub fn covers(&self, as_of: Date) -> bool {
        self.start <= as_of && as_of < self.end
    }
}

/// Find the mapping in force on `as_of`. The last covering record wins.
#[must_use]
pub fn resolve_mapping(records: &[MappingRecord], as_of: Date) -> Option<&StyleMapping> {
    records.iter().rev().find(|r| r.covers(as_of)).map(|r| &r.mapping)
}
