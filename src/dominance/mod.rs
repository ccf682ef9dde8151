//! Dominance structure of a game: which strategies beat which, and
//! what survives iterated elimination of strictly dominated strategies.
//!
//! Checks run over the full cross-product of opponent strategies, so
//! they are exact rather than sampled. Elimination is simultaneous
//! within a round and therefore order-independent.

mod analyzer;
mod elimination;

pub use analyzer::*;
pub use elimination::*;
