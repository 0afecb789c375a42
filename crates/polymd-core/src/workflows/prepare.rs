use crate::core::chem::{MassCalculator, Rdkit, chain_length};
use crate::core::io::lammps_data::{LammpsDataFile, NormalizeSummary};
use crate::core::models::polymer::PolymerSpec;
use crate::core::templates::{emc, lammps, pbs};
use crate::engine::config::{PrepareConfig, validate_polymer};
use crate::engine::error::EngineError;
use crate::engine::external::{ToolOutcome, run_tool};
use crate::engine::progress::{Progress, ProgressReporter, Stage};
use crate::engine::workspace::{BUILD_SCRIPT_FILE_NAME, cleanup_intermediates, ensure_dir};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Files and figures produced for one prepared sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSample {
    pub name: String,
    pub output_dir: PathBuf,
    /// Exact mass of the repeat unit, in g/mol.
    pub repeat_unit_mass: f64,
    /// Repeat units per chain.
    pub chain_length: usize,
    pub data_file: PathBuf,
    pub normalize: NormalizeSummary,
    /// Builder intermediates deleted after normalization. Empty when cleanup is off.
    pub removed_intermediates: Vec<PathBuf>,
    pub settings_file: PathBuf,
    pub input_file: PathBuf,
    pub job_script: PathBuf,
}

fn render_err(path: &Path) -> impl FnOnce(std::io::Error) -> EngineError + '_ {
    move |source| EngineError::Render {
        path: path.to_path_buf(),
        source,
    }
}

/// Prepares one sample, with repeat-unit masses from RDKit.
pub fn run(
    polymer: &PolymerSpec,
    config: &PrepareConfig,
    reporter: &ProgressReporter,
) -> Result<PreparedSample, EngineError> {
    run_with(polymer, config, &Rdkit, reporter)
}

#[instrument(skip_all, name = "prepare_workflow", fields(sample = %polymer.name))]
pub fn run_with(
    polymer: &PolymerSpec,
    config: &PrepareConfig,
    masses: &dyn MassCalculator,
    reporter: &ProgressReporter,
) -> Result<PreparedSample, EngineError> {
    let enter = |stage: Stage| {
        reporter.report(Progress::StageStart {
            sample: polymer.name.clone(),
            stage,
        })
    };

    validate_polymer(polymer)?;
    let output_dir = config.sample_dir(&polymer.name);
    ensure_dir(&output_dir)?;

    // === Phase 1: Chain length and builder setup ===
    enter(Stage::Setup);
    let repeat_unit_mass = masses
        .exact_mass(&polymer.smiles)
        .map_err(|source| EngineError::Mass {
            smiles: polymer.smiles.clone(),
            source,
        })?;
    let chain_length = chain_length(polymer.molecular_weight, repeat_unit_mass).ok_or_else(|| {
        EngineError::ChainLength {
            smiles: polymer.smiles.clone(),
        }
    })?;
    if chain_length == 0 {
        warn!(
            "Target weight {} is below one repeat unit ({:.4}); the chains will hold no repeat units.",
            polymer.molecular_weight, repeat_unit_mass
        );
        reporter.report(Progress::Message(format!(
            "{}: target weight is below one repeat unit",
            polymer.name
        )));
    }
    info!(
        "Repeat unit mass {:.4} g/mol gives {} units per chain.",
        repeat_unit_mass, chain_length
    );

    let setup_name = config.build.setup_file_name();
    let setup_path = output_dir.join(&setup_name);
    emc::write_setup_to_path(polymer, &config.build, chain_length, &setup_path)
        .map_err(render_err(&setup_path))?;

    // === Phase 2: Structure builder ===
    let tolerate = |tool: &str, outcome: ToolOutcome| {
        if !outcome.is_success() {
            reporter.report(Progress::Message(format!(
                "{}: {} {}",
                polymer.name,
                tool,
                outcome.describe()
            )));
        }
    };

    enter(Stage::BuilderSetup);
    let outcome = run_tool(
        "builder setup",
        &config.tools.emc_setup,
        &[setup_name.as_str()],
        &output_dir,
        config.tools.strict,
    )?;
    tolerate("builder setup", outcome);

    enter(Stage::BuilderRun);
    let outcome = run_tool(
        "builder",
        &config.tools.emc_exec,
        &[BUILD_SCRIPT_FILE_NAME],
        &output_dir,
        config.tools.strict,
    )?;
    tolerate("builder", outcome);

    // === Phase 3: Data file normalization ===
    enter(Stage::Normalize);
    let data_file = output_dir.join(config.build.data_file_name());
    let normalize =
        LammpsDataFile::normalize_in_place(&data_file).map_err(|source| EngineError::DataFile {
            path: data_file.clone(),
            source,
        })?;
    info!(
        "Normalized {} atoms: {} atom types reduced to {}.",
        normalize.atoms, normalize.original_types, normalize.canonical_types
    );

    // === Phase 4: Cleanup ===
    let removed_intermediates = if config.build.cleanup {
        enter(Stage::Cleanup);
        cleanup_intermediates(&output_dir)
    } else {
        Vec::new()
    };

    // === Phase 5: MD inputs and job script ===
    enter(Stage::SimulationInputs);
    let settings_file = output_dir.join(lammps::SETTINGS_FILE_NAME);
    lammps::write_settings_to_path(&config.simulation, &settings_file)
        .map_err(render_err(&settings_file))?;
    let input_file = output_dir.join(lammps::INPUT_FILE_NAME);
    lammps::write_input_to_path(&config.simulation, &input_file)
        .map_err(render_err(&input_file))?;

    enter(Stage::JobScript);
    let job_script = output_dir.join(pbs::JOB_SCRIPT_FILE_NAME);
    pbs::write_job_script_to_path(
        &config.job,
        &polymer.name,
        lammps::INPUT_FILE_NAME,
        &job_script,
    )
    .map_err(render_err(&job_script))?;

    info!("Sample '{}' prepared in {:?}.", polymer.name, output_dir);
    Ok(PreparedSample {
        name: polymer.name.clone(),
        output_dir,
        repeat_unit_mass,
        chain_length,
        data_file,
        normalize,
        removed_intermediates,
        settings_file,
        input_file,
        job_script,
    })
}
