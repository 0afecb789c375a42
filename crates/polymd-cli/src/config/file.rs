use crate::error::{CliError, Result};
use polymd::core::models::polymer::PolymerSpec;
use polymd::core::models::simulation::EquilibrationStage;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBuildConfig {
    pub forcefield: Option<String>,
    pub terminator: Option<String>,
    pub output_prefix: Option<String>,
    pub cleanup: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileToolsConfig {
    pub emc_setup: Option<String>,
    pub emc_exec: Option<String>,
    pub strict: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSimulationConfig {
    pub t_init: Option<f64>,
    pub t_final: Option<f64>,
    pub t_interval: Option<f64>,
    pub production_steps: Option<u64>,
    pub potential: Option<String>,
    pub pair_style: Option<String>,
    pub elements: Option<String>,
    pub protocol: Option<Vec<EquilibrationStage>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileJobConfig {
    pub project: Option<String>,
    pub queue: Option<String>,
    pub nodes: Option<u32>,
    pub ppn: Option<u32>,
    pub walltime: Option<String>,
    pub lammps_exec: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePolymerConfig {
    pub name: Option<String>,
    pub smiles: String,
    pub molecular_weight: f64,
    pub total_atoms: u64,
    pub density: f64,
}

impl From<FilePolymerConfig> for PolymerSpec {
    fn from(p: FilePolymerConfig) -> Self {
        let name = p
            .name
            .unwrap_or_else(|| PolymerSpec::default_name(&p.smiles));
        Self {
            name,
            smiles: p.smiles,
            molecular_weight: p.molecular_weight,
            total_atoms: p.total_atoms,
            density: p.density,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub output_root: Option<PathBuf>,
    pub build: Option<FileBuildConfig>,
    pub tools: Option<FileToolsConfig>,
    pub simulation: Option<FileSimulationConfig>,
    pub job: Option<FileJobConfig>,
    #[serde(default)]
    pub polymers: Vec<FilePolymerConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
