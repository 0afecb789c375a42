//! # Engine Module
//!
//! Everything the workflows need besides the pure renderers in [`crate::core`].
//!
//! - **Configuration** ([`config`]) - Validated preparation settings and their builder
//! - **External Tools** ([`external`]) - Running the structure builder with a best-effort or strict policy
//! - **Workspace** ([`workspace`]) - Output directories and removal of builder intermediates
//! - **Progress Monitoring** ([`progress`]) - Stage and batch progress events for front-ends
//! - **Error Handling** ([`error`]) - The error type returned by workflows

pub mod config;
pub mod error;
pub mod external;
pub mod progress;
pub mod workspace;
