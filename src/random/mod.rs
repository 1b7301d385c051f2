//! Random integer sources for stochastic filters.
//!
//! Scatter draws through the [`RandomSource`] trait. [`ChaChaSource`] is
//! the production implementation; [`ScriptedSource`] replays a recorded
//! sequence for reference tests.

mod source;

pub use source::{ChaChaSource, RandomSource, ScriptedSource, DEFAULT_FIXED_SEED};
