//! Chemistry helpers for sizing polymer chains.
//!
//! The structure builder is told how many repeat units make up one chain. That
//! number is derived from the requested molecular weight and the exact mass of the
//! repeat unit. Masses come from a [`MassCalculator`]; the production one is
//! [`Rdkit`], which asks RDKit for `ExactMolWt`.

pub mod rdkit;

pub use rdkit::{Rdkit, exact_mass};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MassError {
    #[error("SMILES string is empty")]
    Empty,
    #[error("RDKit could not parse the SMILES string")]
    Unparsable,
    #[error("RDKit call failed: {0}")]
    Toolkit(String),
}

/// Source of monoisotopic molecular masses.
pub trait MassCalculator: Send + Sync {
    /// Exact mass in g/mol of the molecule written as `smiles`. Wildcard (`*`)
    /// atoms weigh nothing.
    fn exact_mass(&self, smiles: &str) -> Result<f64, MassError>;
}

/// Number of whole repeat units of mass `repeat_unit_mass` that fit in a chain of
/// `target_mass`.
///
/// Returns `None` when the repeat unit has no mass (for example a SMILES made of
/// wildcards only), since no finite chain length exists.
pub fn chain_length(target_mass: f64, repeat_unit_mass: f64) -> Option<usize> {
    if repeat_unit_mass.is_nan() || repeat_unit_mass <= 0.0 {
        return None;
    }
    if !target_mass.is_finite() || target_mass < 0.0 {
        return None;
    }
    Some((target_mass / repeat_unit_mass).floor() as usize)
}
