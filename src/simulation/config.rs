use crate::error::*;
use crate::game::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// What a convergence check watches between windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Per-player relative strategy frequencies.
    StrategyFrequency,
    /// Per-player variance of realized payoffs.
    PayoffVariance,
    /// A function registered on the detector at construction.
    Custom,
}

/// Stationarity detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    pub enabled: bool,
    /// Maximum window divergence still counting as stationary.
    pub tolerance: Utility,
    /// Length of each comparison window, in iterations.
    pub window: usize,
    pub metric: Metric,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance: DEFAULT_CONVERGENCE_TOLERANCE,
            window: DEFAULT_WINDOW,
            metric: Metric::StrategyFrequency,
        }
    }
}

/// Everything one simulation run needs beyond the game itself.
///
/// The whole struct is serde-addressable so batch sweeps can overwrite
/// any field through a dotted path ("iterations",
/// "convergence.tolerance", "policies.1", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub iterations: usize,
    /// Iterations between progress, cancellation, and convergence checks.
    pub batch_size: usize,
    /// Fixed seed for reproducibility; drawn fresh and recorded when absent.
    pub seed: Option<u64>,
    /// One policy per seat, in player order.
    pub policies: Vec<PlayerPolicy>,
    pub convergence: ConvergenceConfig,
    /// Attach equilibrium and dominance analysis to the result.
    pub analysis: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            policies: Vec::new(),
            convergence: ConvergenceConfig::default(),
            analysis: false,
        }
    }
}

impl SimulationParams {
    /// Defaults with every seat mixing uniformly over the game.
    pub fn uniform(game: &PayoffMatrix) -> Self {
        Self {
            policies: vec![PlayerPolicy::uniform(game); game.players()],
            ..Self::default()
        }
    }

    /// Fail fast before a run starts: configuration errors are scoped
    /// to this run and never poison the engine.
    pub fn validate(&self, game: &PayoffMatrix) -> Result<(), GameError> {
        if self.iterations == 0 {
            return Err(GameError::ZeroIterations);
        }
        if self.batch_size == 0 {
            return Err(GameError::InvalidParameter {
                path: "batch_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.policies.len() != game.players() {
            return Err(GameError::InvalidParameter {
                path: "policies".to_string(),
                reason: format!(
                    "expected {} policies, found {}",
                    game.players(),
                    self.policies.len()
                ),
            });
        }
        for (seat, policy) in self.policies.iter().enumerate() {
            policy.validate(game, seat)?;
        }
        if self.convergence.enabled {
            if self.convergence.window == 0 {
                return Err(GameError::InvalidParameter {
                    path: "convergence.window".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            if self.convergence.tolerance < 0. {
                return Err(GameError::InvalidParameter {
                    path: "convergence.tolerance".to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
        }
        Ok(())
    }
}
