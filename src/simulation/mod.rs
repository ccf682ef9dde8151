//! Monte Carlo play of a game under per-seat policies.
//!
//! The engine repeats the stage game for a configured number of
//! iterations, batching the hot loop so that progress callbacks,
//! cooperative cancellation, and convergence detection only pay their
//! cost at batch boundaries. Runs are reproducible whenever a seed is
//! pinned, and every run records the seed it actually played under.

mod config;
mod convergence;
mod engine;
mod result;

pub use config::*;
pub use convergence::*;
pub use engine::*;
pub use result::*;
