//! # polymd Core Library
//!
//! Input generation and data-file post-processing for high-throughput polymer
//! molecular dynamics. The library prepares everything an MD campaign needs for a
//! single polymer (structure-builder setup, MD engine scripts, job scripts), drives
//! the external structure builder, and normalizes the data file it produces.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless helpers: SMILES exact masses, the
//!   LAMMPS data-file normalizer, and the text renderers for every generated file.
//!
//! - **[`engine`]: The Plumbing.** Configuration types and builders, the error type,
//!   progress reporting, invocation of the external tools and output-directory
//!   housekeeping.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into the
//!   complete per-polymer preparation procedure and its batch variant.
//!
//! Nothing in this crate performs a simulation; it only writes inputs for programs
//! that do.

pub mod core;
pub mod engine;
pub mod workflows;
