//! Game-theoretic analysis of finite normal-form games.
//!
//! The crate is organized leaf-first:
//!
//! - `game` — immutable payoff-matrix model, player policies, classic fixtures
//! - `dominance` — strict/weak dominance detection and iterated elimination
//! - `nash` — pure and mixed equilibrium solving, validation, recommendation
//! - `simulation` — Monte Carlo engine with convergence detection
//! - `batch` — parameter sweeps across simulation configurations
//! - `dto` — serde-facing mirrors of results for export
//!
//! Analysis components borrow the matrix immutably and return fresh values;
//! nothing in the crate owns network, disk, or process-global state.

pub mod batch;
#[cfg(feature = "cli")]
pub mod cli;
pub mod dominance;
pub mod dto;
pub mod error;
pub mod game;
pub mod nash;
pub mod simulation;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Payoffs, expected values, and deviation margins.
pub type Utility = f64;
/// Mixing weights, sampling draws, and progress fractions.
pub type Probability = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for tests and benchmarks.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// NUMERICAL TOLERANCES
// ============================================================================
/// Margin below which a payoff difference counts as a tie.
/// Equilibrium and dominance checks treat gains within this band as noise.
pub const TOLERANCE: Utility = 1e-6;
/// Accepted deviation of a mixed policy's probability mass from 1.
/// Vectors outside this band fail fast instead of being renormalized.
pub const POLICY_TOLERANCE: Probability = 1e-3;
/// Probability mass shifted between support strategies when probing
/// an equilibrium's robustness to small perturbations.
pub const PERTURBATION: Probability = 0.05;

// ============================================================================
// QUALITY SCORING
// ============================================================================
/// Normalized payoff variance below this is a low-risk equilibrium.
pub const RISK_LOW: Utility = 0.05;
/// Normalized payoff variance below this (and above `RISK_LOW`) is medium.
pub const RISK_MEDIUM: Utility = 0.25;
/// Stability below this draws a warning during validation.
pub const LOW_STABILITY: Utility = 0.1;
/// Efficiency below this draws a warning during validation.
pub const LOW_EFFICIENCY: Utility = 0.5;
/// Fairness below this draws a warning during validation.
pub const LOW_FAIRNESS: Utility = 0.5;

// ============================================================================
// SIMULATION DEFAULTS
// ============================================================================
/// Iterations per run when the caller does not specify.
pub const DEFAULT_ITERATIONS: usize = 10_000;
/// Iterations per batch between progress/cancellation checks.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;
/// Sliding-window length for convergence detection.
pub const DEFAULT_WINDOW: usize = 100;
/// Maximum window divergence below which a run has converged.
pub const DEFAULT_CONVERGENCE_TOLERANCE: Utility = 0.01;
/// Interval between progress log messages during a simulation run.
pub const PROGRESS_LOG_INTERVAL: std::time::Duration = std::time::Duration::from_secs(10);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Writes DEBUG level to file and INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
