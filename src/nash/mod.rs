//! Nash equilibrium solving, validation, and recommendation.
//!
//! Pure equilibria come from an exhaustive profile scan at any player
//! count. Mixed equilibria are two-player only: closed-form for 2x2,
//! support enumeration above that. Degenerate games are a result
//! ("nothing found"), never an error. Validation re-derives everything
//! from the payoff matrix so it can vet candidates from any source,
//! including simulation output.

mod equilibrium;
mod mixed;
mod pure;
mod recommend;
mod solver;
mod stability;
mod validation;

pub use equilibrium::*;
pub use mixed::*;
pub use pure::*;
pub use recommend::*;
pub use solver::*;
pub use stability::*;
pub use validation::*;
