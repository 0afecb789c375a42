//! Plain descriptions of what to build and how to run it.
//!
//! These types carry no behavior beyond defaults; the renderers in
//! [`crate::core::templates`] turn them into files and the builders in
//! [`crate::engine::config`] validate them.

pub mod job;
pub mod polymer;
pub mod simulation;
