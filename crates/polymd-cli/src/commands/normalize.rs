use crate::cli::NormalizeArgs;
use crate::error::{CliError, Result};
use polymd::core::io::lammps_data::{DataFileError, LammpsDataFile};
use tracing::info;

pub async fn run(args: NormalizeArgs) -> Result<()> {
    let target = args.output.as_deref().unwrap_or(&args.input);
    info!("Normalizing {:?} into {:?}", &args.input, target);

    let summary = LammpsDataFile::normalize_path(&args.input, target).map_err(|e| match e {
        DataFileError::Io(io) => CliError::Io(io),
        other => CliError::FileParsing {
            path: args.input.clone(),
            source: other.into(),
        },
    })?;

    println!(
        "✓ {} atoms; {} atom types reduced to {}. Written to {}",
        summary.atoms,
        summary.original_types,
        summary.canonical_types,
        target.display()
    );
    Ok(())
}
