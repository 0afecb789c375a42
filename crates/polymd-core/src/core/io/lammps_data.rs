use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const MASSES_MARKER: &str = "Masses";
const ATOMS_MARKER: &str = "Atoms";
const BONDS_MARKER: &str = "Bonds";
const BONDED_KEYWORDS: [&str; 4] = ["bond", "angle", "dihedral", "improper"];
const ATOM_TYPES_KEYWORD: &str = "atom types";
const ATOM_RECORD_MIN_TOKENS: usize = 7;

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: DataFileParseErrorKind,
    },
    #[error("Atom on line {line} refers to type '{type_id}', which has no entry in the Masses section")]
    UnknownAtomType { line: usize, type_id: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataFileParseErrorKind {
    #[error("Masses entry needs a type id and a mass (found {found} field(s))")]
    ShortMassRecord { found: usize },
    #[error("Atoms entry needs id, molecule, type, charge and x/y/z (found {found} field(s))")]
    ShortAtomRecord { found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MassRecord {
    pub type_id: String,
    /// Kept as written; identical strings mark equivalent types.
    pub mass: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomRecord {
    pub line: usize,
    pub atom_id: String,
    pub molecule_id: String,
    pub type_id: String,
    pub charge: String,
    pub position: [String; 3],
    pub trailing: Vec<String>,
}

/// The parts of a builder-generated data file that survive normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFileSections {
    /// Header lines up to and including the `Masses` marker, without bonded counts.
    pub header_lines: Vec<String>,
    pub masses: Vec<MassRecord>,
    pub atoms: Vec<AtomRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Masses,
    Atoms,
}

/// Mapping from original atom types to canonical, mass-deduplicated types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRemap {
    canonical_masses: Vec<String>,
    mapping: HashMap<String, usize>,
}

impl TypeRemap {
    /// Assigns canonical ids (1-based) to distinct mass strings in order of first
    /// appearance and maps every original type id onto them.
    pub fn from_masses(masses: &[MassRecord]) -> Self {
        let mut remap = Self::default();
        let mut index_of_mass: HashMap<&str, usize> = HashMap::new();

        for record in masses {
            let canonical = match index_of_mass.get(record.mass.as_str()) {
                Some(&id) => id,
                None => {
                    remap.canonical_masses.push(record.mass.clone());
                    let id = remap.canonical_masses.len();
                    index_of_mass.insert(record.mass.as_str(), id);
                    id
                }
            };
            remap.mapping.insert(record.type_id.clone(), canonical);
        }
        remap
    }

    pub fn canonical_count(&self) -> usize {
        self.canonical_masses.len()
    }

    pub fn canonical_type(&self, original_type: &str) -> Option<usize> {
        self.mapping.get(original_type).copied()
    }

    /// Canonical `(id, mass)` pairs in id order.
    pub fn canonical_masses(&self) -> impl Iterator<Item = (usize, &str)> {
        self.canonical_masses
            .iter()
            .enumerate()
            .map(|(i, mass)| (i + 1, mass.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub original_types: usize,
    pub canonical_types: usize,
    pub atoms: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    MassesMarker,
    AtomsMarker,
    BondsMarker,
    Content,
}

fn classify(line: &str) -> LineKind {
    match line.split_whitespace().next() {
        None => LineKind::Blank,
        Some(MASSES_MARKER) => LineKind::MassesMarker,
        Some(ATOMS_MARKER) => LineKind::AtomsMarker,
        Some(BONDS_MARKER) => LineKind::BondsMarker,
        Some(_) => LineKind::Content,
    }
}

fn is_bonded_count_line(line: &str) -> bool {
    BONDED_KEYWORDS.iter().any(|keyword| line.contains(keyword))
}

pub struct LammpsDataFile;

impl LammpsDataFile {
    /// Splits a data file into header, mass and atom buckets.
    ///
    /// Scanning stops at the `Bonds` marker; bonds, angles, dihedrals and impropers
    /// never reach the buckets. Missing markers leave the later buckets empty.
    pub fn parse(reader: &mut impl BufRead) -> Result<DataFileSections, DataFileError> {
        let mut sections = DataFileSections::default();
        let mut section = Section::Header;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match (section, classify(&line)) {
                (_, LineKind::BondsMarker) => {
                    debug!(
                        "Reached '{}' on line {}, dropping the rest of the file.",
                        BONDS_MARKER, line_num
                    );
                    break;
                }
                (_, LineKind::AtomsMarker) => section = Section::Atoms,
                (Section::Header, LineKind::MassesMarker) => {
                    sections.header_lines.push(line);
                    section = Section::Masses;
                }
                (Section::Header, _) => {
                    if !is_bonded_count_line(&line) {
                        sections.header_lines.push(line);
                    }
                }
                (_, LineKind::Blank) => {}
                (Section::Masses, _) => {
                    let fields: Vec<&str> = line.split_whitespace().collect();
                    if fields.len() < 2 {
                        return Err(DataFileError::Parse {
                            line: line_num,
                            kind: DataFileParseErrorKind::ShortMassRecord {
                                found: fields.len(),
                            },
                        });
                    }
                    sections.masses.push(MassRecord {
                        type_id: fields[0].to_string(),
                        mass: fields[1].to_string(),
                    });
                }
                (Section::Atoms, _) => {
                    let fields: Vec<&str> = line.split_whitespace().collect();
                    if fields.len() < ATOM_RECORD_MIN_TOKENS {
                        return Err(DataFileError::Parse {
                            line: line_num,
                            kind: DataFileParseErrorKind::ShortAtomRecord {
                                found: fields.len(),
                            },
                        });
                    }
                    sections.atoms.push(AtomRecord {
                        line: line_num,
                        atom_id: fields[0].to_string(),
                        molecule_id: fields[1].to_string(),
                        type_id: fields[2].to_string(),
                        charge: fields[3].to_string(),
                        position: [
                            fields[4].to_string(),
                            fields[5].to_string(),
                            fields[6].to_string(),
                        ],
                        trailing: fields[7..].iter().map(|s| s.to_string()).collect(),
                    });
                }
            }
        }

        if sections.masses.is_empty() || sections.atoms.is_empty() {
            warn!(
                "Data file has {} mass entries and {} atoms; the '{}' or '{}' section may be missing.",
                sections.masses.len(),
                sections.atoms.len(),
                MASSES_MARKER,
                ATOMS_MARKER
            );
        }
        Ok(sections)
    }

    /// Writes the reduced file: header, canonical masses and retyped, neutral atoms.
    pub fn write_normalized(
        sections: &DataFileSections,
        remap: &TypeRemap,
        writer: &mut impl Write,
    ) -> Result<(), DataFileError> {
        for line in &sections.header_lines {
            if line.contains(ATOM_TYPES_KEYWORD) {
                writeln!(writer, "{:>12}  {}", remap.canonical_count(), ATOM_TYPES_KEYWORD)?;
            } else {
                writeln!(writer, "{}", line)?;
            }
        }
        writeln!(writer)?;

        for (id, mass) in remap.canonical_masses() {
            writeln!(writer, "{:>8} {:>10}", id, mass)?;
        }
        writeln!(writer)?;
        writeln!(writer, "{}", ATOMS_MARKER)?;
        writeln!(writer)?;

        for atom in &sections.atoms {
            let atom_type = remap.canonical_type(&atom.type_id).ok_or_else(|| {
                DataFileError::UnknownAtomType {
                    line: atom.line,
                    type_id: atom.type_id.clone(),
                }
            })?;
            write!(
                writer,
                "{:>8} {:>7} {:>3} {:>7} {:>14} {:>14} {:>14}",
                atom.atom_id,
                atom.molecule_id,
                atom_type,
                0,
                atom.position[0],
                atom.position[1],
                atom.position[2]
            )?;
            for token in &atom.trailing {
                write!(writer, " {}", token)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Reads a builder data file from `reader` and writes its normalized form.
    pub fn normalize(
        reader: &mut impl BufRead,
        writer: &mut impl Write,
    ) -> Result<NormalizeSummary, DataFileError> {
        let sections = Self::parse(reader)?;
        let remap = TypeRemap::from_masses(&sections.masses);
        Self::write_normalized(&sections, &remap, writer)?;
        writer.flush()?;

        Ok(NormalizeSummary {
            original_types: sections.masses.len(),
            canonical_types: remap.canonical_count(),
            atoms: sections.atoms.len(),
        })
    }

    /// Normalizes `source` into `target`. Both may be the same file: the source
    /// is fully read before the target is truncated.
    pub fn normalize_path<P: AsRef<Path>, Q: AsRef<Path>>(
        source: P,
        target: Q,
    ) -> Result<NormalizeSummary, DataFileError> {
        let sections = {
            let file = File::open(source)?;
            Self::parse(&mut BufReader::new(file))?
        };
        let remap = TypeRemap::from_masses(&sections.masses);

        // Render first so a missing type never leaves a truncated file behind.
        let mut rendered = Vec::new();
        Self::write_normalized(&sections, &remap, &mut rendered)?;

        let mut writer = BufWriter::new(File::create(target)?);
        writer.write_all(&rendered)?;
        writer.flush()?;

        Ok(NormalizeSummary {
            original_types: sections.masses.len(),
            canonical_types: remap.canonical_count(),
            atoms: sections.atoms.len(),
        })
    }

    pub fn normalize_in_place<P: AsRef<Path>>(path: P) -> Result<NormalizeSummary, DataFileError> {
        Self::normalize_path(path.as_ref(), path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    const BUILDER_OUTPUT: &str = "\
LAMMPS data file generated by the structure builder

        4  atoms
        2  bonds
        1  angles
        0  dihedrals
        0  impropers

        3  atom types
        2  bond types
        1  angle types

  -10.0 10.0 xlo xhi
  -10.0 10.0 ylo yhi
  -10.0 10.0 zlo zhi

Masses

         1    12.01100  # c
         2     1.00800  # hc
         3    12.01100  # ca

Atoms  # full

       1       1   1 -0.1200 0.000 0.000 0.000 # c
       2       1   3  0.0500 1.400 0.000 0.000 # ca
       3       1   2  0.0600 -0.500 0.900 0.000 # hc

       4       1   2  0.0600 -0.500 -0.900 0.000 # hc

Bonds

       1       1       1       2
       2       2       1       3

Angles

       1       1       3       1       2
";

    fn normalize_str(input: &str) -> String {
        let mut output = Vec::new();
        LammpsDataFile::normalize(&mut Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn atom_lines(output: &str) -> Vec<Vec<String>> {
        output
            .lines()
            .skip_while(|line| line.trim() != "Atoms")
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn concrete_scenario_merges_types_sharing_a_mass() {
        let input = "\
header

Masses

1 C
2 H
3 C

Atoms

1 1 1 0.5 0 0 0
2 1 3 -0.2 1 0 0
";
        let output = normalize_str(input);

        let masses: Vec<&str> = output
            .lines()
            .skip_while(|line| line.trim() != "Masses")
            .skip(1)
            .take_while(|line| line.trim() != "Atoms")
            .filter(|line| !line.trim().is_empty())
            .collect();
        assert_eq!(masses, vec!["       1          C", "       2          H"]);

        let atoms = atom_lines(&output);
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0], vec!["1", "1", "1", "0", "0", "0", "0"]);
        assert_eq!(atoms[1], vec!["2", "1", "1", "0", "1", "0", "0"]);
    }

    #[test]
    fn atoms_sharing_a_mass_receive_the_same_canonical_type() {
        let output = normalize_str(BUILDER_OUTPUT);
        let atoms = atom_lines(&output);

        assert_eq!(atoms[0][2], "1");
        assert_eq!(atoms[1][2], "1");
        assert_eq!(atoms[2][2], "2");
        assert_eq!(atoms[3][2], "2");
    }

    #[test]
    fn header_atom_type_count_is_rewritten_to_canonical_count() {
        let output = normalize_str(BUILDER_OUTPUT);
        let type_lines: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("atom types"))
            .collect();
        assert_eq!(type_lines, vec!["           2  atom types"]);
    }

    #[test]
    fn canonical_mass_lines_match_distinct_masses() {
        let mut reader = Cursor::new(BUILDER_OUTPUT);
        let sections = LammpsDataFile::parse(&mut reader).unwrap();
        let remap = TypeRemap::from_masses(&sections.masses);

        assert_eq!(sections.masses.len(), 3);
        assert_eq!(remap.canonical_count(), 2);
        assert_eq!(
            remap.canonical_masses().collect::<Vec<_>>(),
            vec![(1, "12.01100"), (2, "1.00800")]
        );
        assert_eq!(remap.canonical_type("3"), Some(1));
        assert_eq!(remap.canonical_type("4"), None);
    }

    #[test]
    fn every_charge_is_zeroed() {
        let output = normalize_str(BUILDER_OUTPUT);
        for atom in atom_lines(&output) {
            assert_eq!(atom[3], "0");
        }
    }

    #[test]
    fn bonded_sections_and_counts_are_dropped() {
        let output = normalize_str(BUILDER_OUTPUT);

        for forbidden in [
            "Bonds",
            "Angles",
            "bonds",
            "angles",
            "dihedrals",
            "impropers",
            "bond types",
        ] {
            assert!(!output.contains(forbidden), "output still contains '{forbidden}'");
        }
        assert!(!output.contains("       1       1       1       2"));
        assert!(output.contains("        4  atoms"));
        assert!(output.contains("xlo xhi"));
    }

    #[test]
    fn output_layout_is_header_masses_then_atoms() {
        let output = normalize_str(BUILDER_OUTPUT);
        let lines: Vec<&str> = output.lines().collect();

        let masses_at = lines.iter().position(|l| *l == "Masses").unwrap();
        assert_eq!(lines[masses_at + 1], "");
        assert_eq!(lines[masses_at + 2], "       1   12.01100");
        assert_eq!(lines[masses_at + 3], "       2    1.00800");
        assert_eq!(lines[masses_at + 4], "");
        assert_eq!(lines[masses_at + 5], "Atoms");
        assert_eq!(lines[masses_at + 6], "");
        assert_eq!(
            lines[masses_at + 7],
            "       1       1   1       0          0.000          0.000          0.000 # c"
        );
        assert_eq!(lines.len(), masses_at + 11);
    }

    #[test]
    fn second_pass_cannot_recover_the_builder_type_table() {
        // Normalization is one-shot: the merged types are gone after the first pass.
        let once = normalize_str(BUILDER_OUTPUT);
        let mut twice = Vec::new();
        let summary =
            LammpsDataFile::normalize(&mut Cursor::new(once.as_str()), &mut twice).unwrap();

        assert_eq!(
            summary,
            NormalizeSummary {
                original_types: 2,
                canonical_types: 2,
                atoms: 4,
            }
        );
        assert_ne!(once, BUILDER_OUTPUT);
        assert!(!once.contains("3    12.01100"));
    }

    #[test]
    fn blank_lines_inside_sections_are_ignored() {
        let mut reader = Cursor::new(BUILDER_OUTPUT);
        let sections = LammpsDataFile::parse(&mut reader).unwrap();
        assert_eq!(sections.atoms.len(), 4);
        assert_eq!(sections.atoms[3].atom_id, "4");
        assert_eq!(sections.atoms[3].line, 29);
    }

    #[test]
    fn missing_markers_produce_an_empty_atoms_section() {
        let output = normalize_str("just a title\n   12  atom types\n");
        assert_eq!(output, "just a title\n           0  atom types\n\n\nAtoms\n\n");
    }

    #[test]
    fn unknown_atom_type_is_an_error() {
        let input = "Masses\n\n1 12.0\n\nAtoms\n\n1 1 7 0.0 0 0 0\n";
        let mut output = Vec::new();
        let err = LammpsDataFile::normalize(&mut Cursor::new(input), &mut output).unwrap_err();
        assert!(matches!(
            err,
            DataFileError::UnknownAtomType { line: 7, ref type_id } if type_id == "7"
        ));
    }

    #[test]
    fn short_records_are_parse_errors() {
        let short_atom = "Masses\n1 12.0\nAtoms\n1 1 1 0.0 0 0\n";
        let err = LammpsDataFile::parse(&mut Cursor::new(short_atom)).unwrap_err();
        assert!(matches!(
            err,
            DataFileError::Parse {
                line: 4,
                kind: DataFileParseErrorKind::ShortAtomRecord { found: 6 }
            }
        ));

        let short_mass = "Masses\n1\n";
        let err = LammpsDataFile::parse(&mut Cursor::new(short_mass)).unwrap_err();
        assert!(matches!(
            err,
            DataFileError::Parse {
                line: 2,
                kind: DataFileParseErrorKind::ShortMassRecord { found: 1 }
            }
        ));
    }

    #[test]
    fn normalize_in_place_overwrites_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("system.data");
        fs::write(&path, BUILDER_OUTPUT).unwrap();

        let summary = LammpsDataFile::normalize_in_place(&path).unwrap();
        assert_eq!(
            summary,
            NormalizeSummary {
                original_types: 3,
                canonical_types: 2,
                atoms: 4
            }
        );

        let rewritten = fs::read_to_string(&path).unwrap();
        assert_eq!(rewritten, normalize_str(BUILDER_OUTPUT));
    }

    #[test]
    fn failed_normalization_leaves_the_source_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("system.data");
        let broken = "Masses\n1 12.0\nAtoms\n1 1 9 0.0 0 0 0\n";
        fs::write(&path, broken).unwrap();

        assert!(LammpsDataFile::normalize_in_place(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = LammpsDataFile::normalize_in_place(dir.path().join("absent.data")).unwrap_err();
        assert!(matches!(err, DataFileError::Io(_)));
    }
}
