use crate::cli::MassArgs;
use crate::error::{CliError, Result};
use polymd::core::chem::{MassCalculator, Rdkit, chain_length};

pub async fn run(args: MassArgs) -> Result<()> {
    let report = mass_report(&args, &Rdkit)?;
    println!("{}", report);
    Ok(())
}

fn mass_report(args: &MassArgs, masses: &dyn MassCalculator) -> Result<String> {
    let mass = masses.exact_mass(&args.smiles).map_err(|e| {
        CliError::Argument(format!("Invalid SMILES '{}': {}", args.smiles, e))
    })?;
    let mut report = format!("Repeat unit {}: exact mass {:.4} g/mol", args.smiles, mass);

    if let Some(target) = args.target_mw {
        let units = chain_length(target, mass).ok_or_else(|| {
            CliError::Argument(format!(
                "No chain length for target {} with repeat unit mass {}",
                target, mass
            ))
        })?;
        report.push_str(&format!("\nChain of {} g/mol: {} repeat units", target, units));
    }
    Ok(report)
}
