use super::config::ConfigError;
use crate::core::chem::MassError;
use crate::core::io::lammps_data::DataFileError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to compute the mass of repeat unit '{smiles}': {source}")]
    Mass {
        smiles: String,
        #[source]
        source: MassError,
    },

    #[error("Repeat unit '{smiles}' has no mass, so no chain length can be derived")]
    ChainLength { smiles: String },

    #[error("Failed to prepare directory '{path}': {source}", path = path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to normalize data file '{path}': {source}", path = path.display())]
    DataFile {
        path: PathBuf,
        #[source]
        source: DataFileError,
    },

    #[error("External tool '{tool}' failed: {reason}")]
    ExternalTool { tool: String, reason: String },
}
