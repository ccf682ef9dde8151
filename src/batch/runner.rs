use crate::batch::*;
use crate::game::*;
use crate::simulation::*;
use crate::*;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Instant;

/// Drives a parameter sweep: one simulation per combination, each in
/// its own slot so results line up with combination order no matter
/// how execution is scheduled.
pub struct BatchRunner {
    game: PayoffMatrix,
    config: BatchConfig,
    token: CancelToken,
}

impl BatchRunner {
    pub fn new(game: PayoffMatrix, config: BatchConfig) -> Self {
        Self {
            game,
            config,
            token: CancelToken::new(),
        }
    }

    /// Share a caller-owned token; cancelling it stops every engine in
    /// the sweep at its next batch boundary.
    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn run(&self) -> BatchResult {
        self.run_with(|_| {}, |_| {})
    }

    /// Run the sweep. As each run finishes, `on_run` receives it and
    /// `on_progress` receives the completed share of the sweep. Under
    /// parallel execution both fire in completion order, not
    /// combination order.
    pub fn run_with(
        &self,
        on_progress: impl Fn(Probability) + Sync,
        on_run: impl Fn(&BatchRun) + Sync,
    ) -> BatchResult {
        let clock = Instant::now();
        let combos = self.config.combinations();
        let total = combos.len();
        let done = AtomicUsize::new(0);
        log::info!(
            "sweeping {} combinations over {} varied parameters",
            total,
            self.config.variations.len()
        );
        let observe = |run: &BatchRun| {
            on_run(run);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            on_progress(finished as Probability / total as Probability);
        };
        let runs = match self.config.parallel {
            true => self.fan_out(&combos, &observe),
            false => combos
                .iter()
                .enumerate()
                .map(|(i, choice)| self.execute(i, choice, &observe))
                .collect(),
        };
        BatchResult::summarize(&self.game, self.config.clone(), runs, clock.elapsed())
    }

    fn execute(
        &self,
        index: usize,
        choice: &[usize],
        on_run: &(impl Fn(&BatchRun) + Sync),
    ) -> BatchRun {
        let settings = self.config.settings(choice);
        let outcome = self.config.materialize(choice).and_then(|params| {
            SimulationEngine::new(self.game.clone(), params)
                .with_token(self.token.clone())
                .run()
        });
        if let Err(ref e) = outcome {
            log::warn!("run {} quarantined: {}", index, e);
        }
        let run = BatchRun {
            index,
            choice: choice.to_vec(),
            settings,
            outcome,
            confidence: None,
        };
        on_run(&run);
        run
    }

    #[cfg(feature = "parallel")]
    fn fan_out(
        &self,
        combos: &[Vec<usize>],
        on_run: &(impl Fn(&BatchRun) + Sync),
    ) -> Vec<BatchRun> {
        use rayon::prelude::*;
        log::debug!("fanning out across {} cores", num_cpus::get());
        combos
            .par_iter()
            .enumerate()
            .map(|(i, choice)| self.execute(i, choice, on_run))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn fan_out(
        &self,
        combos: &[Vec<usize>],
        on_run: &(impl Fn(&BatchRun) + Sync),
    ) -> Vec<BatchRun> {
        log::warn!("parallel sweep requested without the parallel feature; running sequentially");
        combos
            .iter()
            .enumerate()
            .map(|(i, choice)| self.execute(i, choice, on_run))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn quick(game: &PayoffMatrix) -> SimulationParams {
        SimulationParams {
            iterations: 200,
            batch_size: 50,
            seed: Some(9),
            convergence: ConvergenceConfig {
                enabled: false,
                ..ConvergenceConfig::default()
            },
            ..SimulationParams::uniform(game)
        }
    }

    #[test]
    fn grid() {
        let game = prisoners_dilemma();
        let config = BatchConfig::new(quick(&game))
            .vary("seed", vec![json!(1), json!(2), json!(3)])
            .vary("iterations", vec![json!(100), json!(200)]);
        let summary = BatchRunner::new(game, config).run();
        assert_eq!(summary.runs.len(), 6);
        assert!(summary.runs.iter().all(|r| r.outcome.is_ok()));
        assert!(summary.runs.iter().enumerate().all(|(i, r)| r.index == i));
        // row-major: the second variation spins fastest
        assert_eq!(
            summary.runs[4].settings,
            vec![
                ("seed".to_string(), json!(3)),
                ("iterations".to_string(), json!(100)),
            ]
        );
        assert_eq!(summary.completed, 6);
    }

    #[test]
    fn quarantine() {
        let game = prisoners_dilemma();
        let config =
            BatchConfig::new(quick(&game)).vary("iterations", vec![json!(100), json!(0)]);
        let summary = BatchRunner::new(game, config).run();
        assert_eq!(summary.runs.len(), 2);
        assert!(summary.runs[0].outcome.is_ok());
        assert_eq!(
            summary.runs[1].outcome,
            Err(GameError::ZeroIterations)
        );
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn parity() {
        let game = matching_pennies();
        let vary = |parallel| {
            BatchConfig::new(quick(&game))
                .vary("iterations", vec![json!(50), json!(100)])
                .parallel(parallel)
        };
        let forked = BatchRunner::new(game.clone(), vary(true)).run();
        let serial = BatchRunner::new(game.clone(), vary(false)).run();
        for (a, b) in forked.runs.iter().zip(serial.runs.iter()) {
            let a = a.outcome.as_ref().unwrap();
            let b = b.outcome.as_ref().unwrap();
            assert_eq!(a.outcomes, b.outcomes);
            assert_eq!(a.frequencies, b.frequencies);
        }
    }

    #[test]
    fn observer() {
        let game = prisoners_dilemma();
        let config = BatchConfig::new(quick(&game))
            .vary("seed", vec![json!(1), json!(2), json!(3)])
            .parallel(true);
        let seen = Mutex::new(Vec::new());
        let fractions = Mutex::new(Vec::new());
        BatchRunner::new(game, config).run_with(
            |overall| fractions.lock().unwrap().push(overall),
            |run| seen.lock().unwrap().push(run.index),
        );
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2]);
        // one tick per run; completion order may scramble them
        let mut fractions = fractions.into_inner().unwrap();
        fractions.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(fractions, vec![1. / 3., 2. / 3., 1.]);
    }

    #[test]
    fn halted() {
        let game = matching_pennies();
        let config = BatchConfig::new(quick(&game)).vary("seed", vec![json!(1), json!(2)]);
        let runner = BatchRunner::new(game, config);
        runner.token().cancel();
        let summary = runner.run();
        assert_eq!(summary.cancelled, 2);
        assert_eq!(summary.completed, 0);
        assert!(summary
            .results()
            .all(|r| r.status == RunStatus::Cancelled && r.iterations == 50));
    }
}
