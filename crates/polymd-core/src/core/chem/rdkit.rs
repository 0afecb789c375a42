use super::{MassCalculator, MassError};
use pyo3::prelude::*;
use tracing::{debug, trace};

/// Exact masses from RDKit, through the Python interpreter embedded in this
/// process. RDKit must be importable from that interpreter.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rdkit;

impl From<PyErr> for MassError {
    fn from(err: PyErr) -> Self {
        MassError::Toolkit(err.to_string())
    }
}

impl MassCalculator for Rdkit {
    fn exact_mass(&self, smiles: &str) -> Result<f64, MassError> {
        let smiles = smiles.trim();
        if smiles.is_empty() {
            return Err(MassError::Empty);
        }

        Python::with_gil(|py| {
            // Parse failures are returned as errors; RDKit's own stderr report is noise.
            py.import("rdkit.RDLogger")?
                .call_method1("DisableLog", ("rdApp.error",))?;

            let chem = py.import("rdkit.Chem")?;
            let descriptors = py.import("rdkit.Chem.Descriptors")?;

            let mol = chem.call_method1("MolFromSmiles", (smiles,))?;
            if mol.is_none() {
                debug!("RDKit rejected SMILES '{}'.", smiles);
                return Err(MassError::Unparsable);
            }
            let mass: f64 = descriptors.call_method1("ExactMolWt", (mol,))?.extract()?;
            trace!("ExactMolWt('{}') = {}", smiles, mass);
            Ok(mass)
        })
    }
}

/// Exact mass of `smiles` as computed by [`Rdkit`].
pub fn exact_mass(smiles: &str) -> Result<f64, MassError> {
    Rdkit.exact_mass(smiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_smiles_never_reaches_python() {
        assert_eq!(exact_mass(""), Err(MassError::Empty));
        assert_eq!(exact_mass("   "), Err(MassError::Empty));
    }

    #[test]
    #[ignore = "needs a Python environment with RDKit installed"]
    fn polyethylene_repeat_unit_mass() {
        let mass = exact_mass("*CC*").unwrap();
        assert!((mass - 28.0313).abs() < 1e-3);
    }

    #[test]
    #[ignore = "needs a Python environment with RDKit installed"]
    fn wildcards_and_charges_follow_rdkit() {
        assert_eq!(exact_mass("**").unwrap(), 0.0);
        let cation = exact_mass("[NH4+]").unwrap();
        assert!((cation - 18.0338).abs() < 1e-3);
    }

    #[test]
    #[ignore = "needs a Python environment with RDKit installed"]
    fn malformed_smiles_is_unparsable() {
        assert_eq!(exact_mass("*C(C*"), Err(MassError::Unparsable));
        assert_eq!(exact_mass("*CX*"), Err(MassError::Unparsable));
    }
}
