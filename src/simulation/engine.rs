use crate::dominance::*;
use crate::error::*;
use crate::game::*;
use crate::nash::*;
use crate::simulation::*;
use crate::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Instant;

/// Cooperative cancellation handle. Clones share one flag, so an owner
/// can hand a token to an engine (or to many) and flip it from any
/// thread; the engine notices at the next batch boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Re-arm a token that already fired.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Plays a game repeatedly under per-seat policies and accumulates the
/// run into a SimulationResult. Iterations are grouped into batches;
/// progress reporting, cancellation, and convergence checks all happen
/// on batch boundaries so the hot loop stays branch-light.
pub struct SimulationEngine {
    game: PayoffMatrix,
    params: SimulationParams,
    custom: Option<MetricFn>,
    detector: ConvergenceDetector,
    token: CancelToken,
    status: RunStatus,
    runs: Vec<SimulationResult>,
}

impl SimulationEngine {
    pub fn new(game: PayoffMatrix, params: SimulationParams) -> Self {
        Self {
            detector: ConvergenceDetector::new(params.convergence.clone()),
            custom: None,
            token: CancelToken::new(),
            status: RunStatus::Idle,
            runs: Vec::new(),
            params,
            game,
        }
    }

    /// Share a caller-owned token instead of the engine's private one.
    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = token;
        self
    }

    /// Register the function behind Metric::Custom.
    pub fn with_custom_metric(mut self, custom: MetricFn) -> Self {
        self.custom = Some(custom);
        self.detector = ConvergenceDetector::with_custom(self.params.convergence.clone(), custom);
        self
    }

    pub fn game(&self) -> &PayoffMatrix {
        &self.game
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Completed runs, oldest first.
    pub fn runs(&self) -> &[SimulationResult] {
        &self.runs
    }

    /// Swap in new parameters between runs. Accumulated run history is
    /// kept; only reset discards it. Validation happens on the next
    /// run, not here.
    pub fn update_configuration(&mut self, params: SimulationParams) {
        self.detector = match self.custom {
            Some(custom) => ConvergenceDetector::with_custom(params.convergence.clone(), custom),
            None => ConvergenceDetector::new(params.convergence.clone()),
        };
        self.params = params;
    }

    /// Drop all accumulated runs, re-arm the token, return to Idle.
    pub fn reset(&mut self) {
        self.runs.clear();
        self.token.clear();
        self.status = RunStatus::Idle;
    }

    pub fn run(&mut self) -> Result<SimulationResult, GameError> {
        self.run_with(|_| {})
    }

    /// Run with a progress callback, invoked once per finished batch
    /// with the fraction of the iteration budget spent so far.
    pub fn run_with(
        &mut self,
        mut on_progress: impl FnMut(Probability),
    ) -> Result<SimulationResult, GameError> {
        if let Err(e) = self.params.validate(&self.game) {
            self.status = RunStatus::Failed;
            log::warn!("simulation rejected: {}", e);
            return Err(e);
        }
        let seed = self.params.seed.unwrap_or_else(rand::random);
        let ref mut rng = SmallRng::seed_from_u64(seed);
        let total = self.params.iterations;
        let batch = self.params.batch_size;
        let clock = Instant::now();
        let mut checkpoint = Instant::now();
        let mut outcome = RunStatus::Completed;
        let mut previous: Option<Vec<usize>> = None;
        let mut result = SimulationResult::fresh(&self.game, total, seed);
        self.status = RunStatus::Running;
        log::debug!("simulating {} iterations under seed {}", total, seed);
        while result.iterations < total {
            let quota = batch.min(total - result.iterations);
            for _ in 0..quota {
                let profile = (0..self.game.players())
                    .map(|seat| {
                        self.params.policies[seat].sample(
                            &self.game,
                            seat,
                            previous.as_deref(),
                            &result.frequencies,
                            rng,
                        )
                    })
                    .collect::<Vec<usize>>();
                let payoffs = self.game.cell(&profile).to_vec();
                result.record(profile.clone(), payoffs);
                previous = Some(profile);
            }
            on_progress(result.iterations as Probability / total as Probability);
            if checkpoint.elapsed() >= PROGRESS_LOG_INTERVAL {
                checkpoint = Instant::now();
                log::info!(
                    "simulated {} / {} iterations ({:>5.1}%)",
                    result.iterations,
                    total,
                    100. * result.iterations as Probability / total as Probability
                );
            }
            if self.token.cancelled() {
                outcome = RunStatus::Cancelled;
                log::info!("simulation cancelled after {} iterations", result.iterations);
                break;
            }
            if self.detector.converged(&self.game, &result.history) {
                outcome = RunStatus::Converged;
                result.converged_at = Some(result.iterations);
                log::info!("simulation stationary after {} iterations", result.iterations);
                break;
            }
        }
        result.finalize(outcome, clock.elapsed());
        if self.params.analysis {
            result.equilibrium = recommend(&self.game).into_iter().next().map(|r| r.equilibrium);
            result.dominance = Some(analyze(&self.game));
        }
        self.status = result.status;
        self.runs.push(result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(game: &PayoffMatrix) -> SimulationParams {
        SimulationParams {
            iterations: 500,
            batch_size: 50,
            seed: Some(42),
            convergence: ConvergenceConfig {
                enabled: false,
                ..ConvergenceConfig::default()
            },
            ..SimulationParams::uniform(game)
        }
    }

    #[test]
    fn determinism() {
        let game = matching_pennies();
        let mut a = SimulationEngine::new(game.clone(), quick(&game));
        let mut b = SimulationEngine::new(game.clone(), quick(&game));
        let left = a.run().unwrap();
        let right = b.run().unwrap();
        assert_eq!(left.outcomes, right.outcomes);
        assert_eq!(left.frequencies, right.frequencies);
        assert_eq!(left.history, right.history);
    }

    #[test]
    fn reseeded() {
        let game = matching_pennies();
        let mut a = SimulationEngine::new(game.clone(), quick(&game));
        let mut b = SimulationEngine::new(
            game.clone(),
            SimulationParams {
                seed: Some(43),
                ..quick(&game)
            },
        );
        assert_ne!(a.run().unwrap().history, b.run().unwrap().history);
    }

    #[test]
    fn stationarity() {
        let game = prisoners_dilemma();
        let params = SimulationParams {
            iterations: 1_000,
            batch_size: 100,
            seed: Some(1),
            policies: vec![PlayerPolicy::Pure(1), PlayerPolicy::Pure(1)],
            convergence: ConvergenceConfig {
                window: 50,
                ..ConvergenceConfig::default()
            },
            ..SimulationParams::default()
        };
        let mut engine = SimulationEngine::new(game, params);
        let result = engine.run().unwrap();
        // constant play satisfies the detector at the first boundary
        // where two full windows exist
        assert_eq!(result.status, RunStatus::Converged);
        assert_eq!(result.converged_at, Some(100));
        assert_eq!(result.iterations, 100);
        assert_eq!(result.expected_payoffs, vec![1., 1.]);
        assert_eq!(engine.status(), RunStatus::Converged);
    }

    #[test]
    fn exhaustion() {
        let game = matching_pennies();
        let mut engine = SimulationEngine::new(game.clone(), quick(&game));
        let result = engine.run().unwrap();
        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.iterations, 500);
        assert_eq!(result.converged_at, None);
    }

    #[test]
    fn interrupted() {
        let game = matching_pennies();
        let mut engine = SimulationEngine::new(game.clone(), quick(&game));
        engine.token().cancel();
        let result = engine.run().unwrap();
        // the flag is noticed at the first batch boundary
        assert_eq!(result.status, RunStatus::Cancelled);
        assert_eq!(result.iterations, 50);
    }

    #[test]
    fn rejection() {
        let game = prisoners_dilemma();
        let params = SimulationParams {
            policies: vec![PlayerPolicy::Pure(0)],
            ..SimulationParams::default()
        };
        let mut engine = SimulationEngine::new(game, params);
        assert!(matches!(
            engine.run(),
            Err(GameError::InvalidParameter { .. })
        ));
        assert_eq!(engine.status(), RunStatus::Failed);
        assert!(engine.runs().is_empty());
    }

    #[test]
    fn accumulation() {
        let game = prisoners_dilemma();
        let mut engine = SimulationEngine::new(game.clone(), quick(&game));
        engine.run().unwrap();
        engine.update_configuration(SimulationParams {
            seed: Some(99),
            ..quick(&game)
        });
        engine.run().unwrap();
        assert_eq!(engine.runs().len(), 2);
        assert_eq!(engine.runs()[1].seed, 99);
        engine.reset();
        assert!(engine.runs().is_empty());
        assert_eq!(engine.status(), RunStatus::Idle);
    }

    #[test]
    fn reciprocity() {
        // tit for tat opens with the first strategy, then mirrors the
        // defector forever
        let game = prisoners_dilemma();
        let params = SimulationParams {
            iterations: 50,
            batch_size: 10,
            seed: Some(3),
            policies: vec![
                PlayerPolicy::Adaptive {
                    kind: AdaptiveKind::TitForTat,
                    forgiveness: 0.,
                    noise: 0.,
                },
                PlayerPolicy::Pure(1),
            ],
            convergence: ConvergenceConfig {
                enabled: false,
                ..ConvergenceConfig::default()
            },
            ..SimulationParams::default()
        };
        let result = SimulationEngine::new(game, params).run().unwrap();
        assert_eq!(result.outcomes.get(&vec![0, 1]), Some(&1));
        assert_eq!(result.outcomes.get(&vec![1, 1]), Some(&49));
    }

    #[test]
    fn exploitation() {
        // best response learns the opponent's habit and defects on it
        let game = prisoners_dilemma();
        let params = SimulationParams {
            iterations: 100,
            batch_size: 20,
            seed: Some(5),
            policies: vec![
                PlayerPolicy::Adaptive {
                    kind: AdaptiveKind::BestResponse,
                    forgiveness: 0.,
                    noise: 0.,
                },
                PlayerPolicy::Pure(0),
            ],
            convergence: ConvergenceConfig {
                enabled: false,
                ..ConvergenceConfig::default()
            },
            ..SimulationParams::default()
        };
        let result = SimulationEngine::new(game, params).run().unwrap();
        assert_eq!(result.outcomes.get(&vec![1, 0]), Some(&100));
        assert_eq!(result.expected_payoffs, vec![5., 0.]);
    }

    #[test]
    fn ticking() {
        let game = matching_pennies();
        let mut engine = SimulationEngine::new(game.clone(), quick(&game));
        let mut reports = Vec::new();
        engine.run_with(|p| reports.push(p)).unwrap();
        assert_eq!(reports.len(), 10);
        assert!(reports.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(reports.last(), Some(&1.));
    }

    #[test]
    fn annotated() {
        let game = prisoners_dilemma();
        let params = SimulationParams {
            analysis: true,
            ..quick(&game)
        };
        let result = SimulationEngine::new(game, params).run().unwrap();
        let equilibrium = result.equilibrium.as_ref().unwrap();
        assert_eq!(equilibrium.profile, Profile::Pure(vec![1, 1]));
        let report = result.dominance.as_ref().unwrap();
        assert_eq!(report.strictly_dominant.len(), 2);
    }
}
