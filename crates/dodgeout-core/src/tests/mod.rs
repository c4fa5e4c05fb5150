//! Test module for determinism and integration tests.
//!
//! - **Determinism tests**: same seed and inputs produce identical runs
//! - **Integration tests**: the full substep pipeline through [`GameSpace`](crate::simulation::GameSpace)
//! - **Helper functions**: utilities for test setup
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of a run
//! - `helpers.rs`: Test setup utilities and factory functions

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
