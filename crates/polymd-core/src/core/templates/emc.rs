use super::{format_float, render_to_path};
use crate::core::models::polymer::{BuildOptions, PolymerSpec};
use std::io::{self, Write};
use std::path::Path;

const SHEBANG: &str = "#!/usr/bin/env emc_setup.pl";
const REPEAT_UNIT_GROUP: &str = "RU";
const TERMINATOR_GROUP: &str = "terminator";
const CLUSTER_NAME: &str = "poly";

/// Writes the EMC setup script describing a linear homopolymer melt.
///
/// The repeat unit connects head (`RU:2`) to tail, and each chain of
/// `chain_length` units is capped at both ends by the terminator group.
pub fn write_setup(
    polymer: &PolymerSpec,
    build: &BuildOptions,
    chain_length: usize,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer, "{}", SHEBANG)?;
    writeln!(writer, "ITEM OPTIONS")?;
    writeln!(writer, "replace true")?;
    writeln!(writer, "field {}", build.forcefield)?;
    writeln!(writer, "density {}", format_float(polymer.density))?;
    writeln!(writer, "ntotal {}", polymer.total_atoms)?;
    writeln!(writer, "ITEM END")?;
    writeln!(writer)?;

    writeln!(writer, "ITEM GROUPS")?;
    writeln!(
        writer,
        "{} {},1,{}:2",
        REPEAT_UNIT_GROUP, polymer.smiles, REPEAT_UNIT_GROUP
    )?;
    writeln!(
        writer,
        "{} {},1,{g}:1,1,{g}:2",
        TERMINATOR_GROUP,
        build.terminator,
        g = REPEAT_UNIT_GROUP
    )?;
    writeln!(writer, "ITEM END")?;
    writeln!(writer)?;

    writeln!(writer, "ITEM CLUSTERS")?;
    writeln!(writer, "{} alternate 1", CLUSTER_NAME)?;
    writeln!(writer, "ITEM END")?;
    writeln!(writer)?;

    writeln!(writer, "ITEM POLYMERS")?;
    writeln!(writer, "{}", CLUSTER_NAME)?;
    writeln!(
        writer,
        "1 {},{},{},2",
        REPEAT_UNIT_GROUP, chain_length, TERMINATOR_GROUP
    )?;
    writeln!(writer, "ITEM END")?;
    Ok(())
}

pub fn write_setup_to_path<P: AsRef<Path>>(
    polymer: &PolymerSpec,
    build: &BuildOptions,
    chain_length: usize,
    path: P,
) -> io::Result<()> {
    render_to_path(path, |w| write_setup(polymer, build, chain_length, w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polypropylene() -> PolymerSpec {
        PolymerSpec {
            name: "pp".to_string(),
            smiles: "*CC(*)C".to_string(),
            molecular_weight: 10000.0,
            total_atoms: 3000,
            density: 0.5,
        }
    }

    #[test]
    fn setup_script_matches_expected_layout() {
        let mut out = Vec::new();
        write_setup(&polypropylene(), &BuildOptions::default(), 237, &mut out).unwrap();

        let expected = "\
#!/usr/bin/env emc_setup.pl
ITEM OPTIONS
replace true
field opls-aa
density 0.5
ntotal 3000
ITEM END

ITEM GROUPS
RU *CC(*)C,1,RU:2
terminator *[H],1,RU:1,1,RU:2
ITEM END

ITEM CLUSTERS
poly alternate 1
ITEM END

ITEM POLYMERS
poly
1 RU,237,terminator,2
ITEM END
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn custom_forcefield_and_terminator_are_used() {
        let build = BuildOptions {
            forcefield: "pcff".to_string(),
            terminator: "*C".to_string(),
            ..BuildOptions::default()
        };
        let mut polymer = polypropylene();
        polymer.density = 1.0;

        let mut out = Vec::new();
        write_setup(&polymer, &build, 10, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("field pcff\n"));
        assert!(text.contains("density 1.0\n"));
        assert!(text.contains("terminator *C,1,RU:1,1,RU:2\n"));
    }
}
