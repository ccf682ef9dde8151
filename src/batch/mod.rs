//! Parameter sweeps over simulation settings.
//!
//! A sweep crosses every variation's candidate values into a grid of
//! runs, addresses each varied field through its dotted serde path,
//! and plays the runs either sequentially or fanned out across cores.
//! Failures are captured per run, and the summary ranks runs by how
//! confidently their empirical play matches a computed equilibrium.

mod result;
mod runner;
mod variation;

pub use result::*;
pub use runner::*;
pub use variation::*;
