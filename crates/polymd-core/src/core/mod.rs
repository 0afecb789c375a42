//! # Core Module
//!
//! Stateless building blocks used by the preparation workflows.
//!
//! - **Chemistry** ([`chem`]) - Repeat-unit exact mass through RDKit and chain length
//! - **File I/O** ([`io`]) - Reading and normalizing LAMMPS data files
//! - **Data Model** ([`models`]) - Polymer, simulation and job descriptions
//! - **Rendering** ([`templates`]) - EMC setup, LAMMPS input and PBS job script writers

pub mod chem;
pub mod io;
pub mod models;
pub mod templates;
