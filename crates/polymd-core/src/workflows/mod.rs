//! # Workflows Module
//!
//! Top-level entry points that turn polymer descriptions into ready-to-submit MD
//! run directories.
//!
//! - **Prepare Workflow** ([`prepare`]) - One sample: builder setup, structure
//!   build, data file normalization, cleanup, MD inputs and job script.
//! - **Batch Workflow** ([`batch`]) - Many samples sharing one configuration, each
//!   in its own directory, optionally in parallel. A failing sample does not stop
//!   the others.

pub mod batch;
pub mod prepare;
