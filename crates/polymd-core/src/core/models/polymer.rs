/// One polymer sample to prepare.
#[derive(Debug, Clone, PartialEq)]
pub struct PolymerSpec {
    /// Label used for the output directory and job name.
    pub name: String,
    /// Repeat unit with `*` marking the two connection points, e.g. `*CC(*)C`.
    pub smiles: String,
    /// Target molecular weight of one chain, in g/mol.
    pub molecular_weight: f64,
    /// Total number of atoms in the simulation box.
    pub total_atoms: u64,
    /// Initial packing density, in g/cm^3.
    pub density: f64,
}

impl PolymerSpec {
    /// Default sample label for a repeat unit: the SMILES itself, with path
    /// separators (stereo bonds `/` and `\`) replaced so it is a valid directory name.
    pub fn default_name(smiles: &str) -> String {
        smiles.trim().replace(['/', '\\'], "_")
    }
}

/// Options passed to the structure builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub forcefield: String,
    /// End group capping both chain ends.
    pub terminator: String,
    /// Stem of the builder's output files (`<prefix>.esh`, `<prefix>.data`).
    pub output_prefix: String,
    /// Remove builder intermediates once the data file has been normalized.
    pub cleanup: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            forcefield: "opls-aa".to_string(),
            terminator: "*[H]".to_string(),
            output_prefix: "system".to_string(),
            cleanup: true,
        }
    }
}

impl BuildOptions {
    pub fn setup_file_name(&self) -> String {
        format!("{}.esh", self.output_prefix)
    }

    pub fn data_file_name(&self) -> String {
        format!("{}.data", self.output_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_keeps_plain_smiles() {
        assert_eq!(PolymerSpec::default_name("*CC(*)c1ccccc1"), "*CC(*)c1ccccc1");
    }

    #[test]
    fn default_name_replaces_path_separators() {
        assert_eq!(PolymerSpec::default_name(" *C/C=C\\C* "), "*C_C=C_C*");
    }

    #[test]
    fn build_options_derive_file_names_from_prefix() {
        let build = BuildOptions {
            output_prefix: "melt".to_string(),
            ..BuildOptions::default()
        };
        assert_eq!(build.setup_file_name(), "melt.esh");
        assert_eq!(build.data_file_name(), "melt.data");
        assert!(BuildOptions::default().cleanup);
    }
}
