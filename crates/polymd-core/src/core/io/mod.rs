//! Input/output for the structure files exchanged with external programs.
//!
//! The structure builder emits a LAMMPS data file with one atom type per chemical
//! environment; [`lammps_data`] collapses those types and strips the bonded sections
//! before the file is handed to the MD engine.

pub mod lammps_data;
