use crate::batch::*;
use crate::error::*;
use crate::game::*;
use crate::nash::*;
use crate::simulation::*;
use crate::*;
use std::time::Duration;

/// One cell of a sweep: which combination it was and how it went.
/// Failures stay inside their cell; a bad combination never takes the
/// rest of the batch down with it.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    pub index: usize,
    /// Value index chosen per variation, one digit per swept path.
    pub choice: Vec<usize>,
    pub settings: Vec<(String, serde_json::Value)>,
    pub outcome: Result<SimulationResult, GameError>,
    /// Filled in during summary; None for failed runs.
    pub confidence: Option<Probability>,
}

impl std::fmt::Display for BatchRun {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "run {:>3}", self.index)?;
        for (path, value) in &self.settings {
            write!(f, " · {}={}", path, value)?;
        }
        match &self.outcome {
            Ok(result) => {
                write!(f, " · {}", result.status)?;
                if let Some(confidence) = self.confidence {
                    write!(f, " · confidence {:.3}", confidence)?;
                }
                Ok(())
            }
            Err(e) => write!(f, " · failed: {}", e),
        }
    }
}

/// How confidently a run's empirical play points at an equilibrium:
/// one minus the distance to the nearest computed equilibrium mixture.
/// Falls back to the modal outcome share when the solver found nothing
/// to compare against.
pub fn confidence(
    game: &PayoffMatrix,
    candidates: &[NashEquilibrium],
    result: &SimulationResult,
) -> Probability {
    let empirical = result.empirical();
    candidates
        .iter()
        .map(|equilibrium| {
            let mixture = equilibrium.mixture(game.len());
            empirical
                .iter()
                .flatten()
                .zip(mixture.iter().flatten())
                .map(|(a, b)| (a - b).abs())
                .fold(0., Utility::max)
        })
        .min_by(|a, b| a.total_cmp(b))
        .map(|distance| 1. - distance)
        .or_else(|| result.modal().map(|(_, share)| share))
        .unwrap_or(0.)
        .clamp(0., 1.)
}

/// Mean confidence observed at each candidate value of one swept
/// parameter, aggregated over every combination that used it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEffect {
    pub path: String,
    pub response: Vec<(serde_json::Value, Probability)>,
}

/// The whole sweep: every run in combination order plus summary
/// statistics over the ones that finished.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub config: BatchConfig,
    pub runs: Vec<BatchRun>,
    pub elapsed: Duration,
    pub completed: usize,
    pub cancelled: usize,
    pub failed: usize,
    /// Run index with the highest confidence, first on ties.
    pub best: Option<usize>,
    pub worst: Option<usize>,
    pub effects: Vec<ParameterEffect>,
}

impl BatchResult {
    pub fn summarize(
        game: &PayoffMatrix,
        config: BatchConfig,
        mut runs: Vec<BatchRun>,
        elapsed: Duration,
    ) -> Self {
        let candidates = find_all(game);
        for run in runs.iter_mut() {
            run.confidence = run
                .outcome
                .as_ref()
                .ok()
                .map(|result| confidence(game, &candidates, result));
        }
        Self {
            completed: runs
                .iter()
                .filter(|r| {
                    matches!(
                        &r.outcome,
                        Ok(result) if matches!(
                            result.status,
                            RunStatus::Completed | RunStatus::Converged
                        )
                    )
                })
                .count(),
            cancelled: runs
                .iter()
                .filter(|r| matches!(&r.outcome, Ok(result) if result.status == RunStatus::Cancelled))
                .count(),
            failed: runs.iter().filter(|r| r.outcome.is_err()).count(),
            best: Self::extremum(&runs, |a, b| a > b),
            worst: Self::extremum(&runs, |a, b| a < b),
            effects: Self::effects(&config, &runs),
            config,
            runs,
            elapsed,
        }
    }

    /// Successful results, in combination order.
    pub fn results(&self) -> impl Iterator<Item = &SimulationResult> {
        self.runs.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    /// Share of runs that finished, converged or exhausted, out of all runs.
    pub fn convergence_rate(&self) -> Probability {
        match self.runs.len() {
            0 => 0.,
            n => self.completed as Probability / n as Probability,
        }
    }

    /// Mean iterations actually played per surviving run; early
    /// convergence pulls this under what was requested.
    pub fn average_iterations(&self) -> Probability {
        let counts = self.results().map(|r| r.iterations).collect::<Vec<_>>();
        match counts.is_empty() {
            true => 0.,
            false => counts.iter().sum::<usize>() as Probability / counts.len() as Probability,
        }
    }

    /// Mean wall clock per surviving run.
    pub fn average_duration(&self) -> Duration {
        let durations = self.results().map(|r| r.elapsed).collect::<Vec<_>>();
        match durations.is_empty() {
            true => Duration::ZERO,
            false => durations.iter().sum::<Duration>() / durations.len() as u32,
        }
    }

    fn extremum(runs: &[BatchRun], better: fn(Probability, Probability) -> bool) -> Option<usize> {
        let mut found: Option<(usize, Probability)> = None;
        for run in runs {
            if let Some(confidence) = run.confidence {
                match found {
                    Some((_, incumbent)) if !better(confidence, incumbent) => {}
                    _ => found = Some((run.index, confidence)),
                }
            }
        }
        found.map(|(index, _)| index)
    }

    fn effects(config: &BatchConfig, runs: &[BatchRun]) -> Vec<ParameterEffect> {
        config
            .variations
            .iter()
            .enumerate()
            .map(|(position, variation)| ParameterEffect {
                path: variation.path.clone(),
                response: variation
                    .values
                    .iter()
                    .enumerate()
                    .map(|(candidate, value)| {
                        let scores = runs
                            .iter()
                            .filter(|r| r.choice.get(position) == Some(&candidate))
                            .filter_map(|r| r.confidence)
                            .collect::<Vec<Probability>>();
                        let mean = match scores.is_empty() {
                            true => 0.,
                            false => scores.iter().sum::<Probability>() / scores.len() as Probability,
                        };
                        (value.clone(), mean)
                    })
                    .collect(),
            })
            .collect()
    }
}

impl std::fmt::Display for BatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "sweep of {} runs in {:.1?} · {} completed · {} cancelled · {} failed",
            self.runs.len(),
            self.elapsed,
            self.completed,
            self.cancelled,
            self.failed
        )?;
        writeln!(
            f,
            "convergence rate {:.2} · {:.0} iterations and {:.1?} per run",
            self.convergence_rate(),
            self.average_iterations(),
            self.average_duration()
        )?;
        for run in &self.runs {
            writeln!(f, "{}", run)?;
        }
        if let Some(best) = self.best {
            writeln!(f, "best  · {}", self.runs[best])?;
        }
        if let Some(worst) = self.worst {
            writeln!(f, "worst · {}", self.runs[worst])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(
        game: &PayoffMatrix,
        index: usize,
        choice: Vec<usize>,
        profiles: &[Vec<usize>],
    ) -> BatchRun {
        let mut result = SimulationResult::fresh(game, profiles.len(), 0);
        for profile in profiles {
            result.record(profile.clone(), game.cell(profile).to_vec());
        }
        result.finalize(RunStatus::Completed, Duration::ZERO);
        BatchRun {
            index,
            choice,
            settings: Vec::new(),
            outcome: Ok(result),
            confidence: None,
        }
    }

    #[test]
    fn certainty() {
        let game = prisoners_dilemma();
        let candidates = find_all(&game);
        let settled = played(&game, 0, vec![], &vec![vec![1, 1]; 10]);
        let torn = played(&game, 1, vec![], &[vec![0, 0], vec![1, 1]]);
        let settled = confidence(&game, &candidates, settled.outcome.as_ref().unwrap());
        let torn = confidence(&game, &candidates, torn.outcome.as_ref().unwrap());
        assert_eq!(settled, 1.);
        assert_eq!(torn, 0.5);
    }

    #[test]
    fn fallback() {
        let game = prisoners_dilemma();
        let run = played(&game, 0, vec![], &vec![vec![0, 1]; 4]);
        // no equilibria to compare against: modal share stands in
        assert_eq!(confidence(&game, &[], run.outcome.as_ref().unwrap()), 1.);
        let empty = SimulationResult::fresh(&game, 0, 0);
        assert_eq!(confidence(&game, &[], &empty), 0.);
    }

    #[test]
    fn bookends() {
        let game = prisoners_dilemma();
        let runs = vec![
            played(&game, 0, vec![], &vec![vec![1, 1]; 10]),
            played(&game, 1, vec![], &[vec![0, 0], vec![1, 1]]),
            BatchRun {
                index: 2,
                choice: vec![],
                settings: Vec::new(),
                outcome: Err(GameError::ZeroIterations),
                confidence: None,
            },
        ];
        let config = BatchConfig::new(SimulationParams::uniform(&game));
        let summary = BatchResult::summarize(&game, config, runs, Duration::ZERO);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.best, Some(0));
        assert_eq!(summary.worst, Some(1));
        assert_eq!(summary.runs[2].confidence, None);
    }

    #[test]
    fn aggregates() {
        let game = prisoners_dilemma();
        let runs = vec![
            played(&game, 0, vec![], &vec![vec![1, 1]; 10]),
            played(&game, 1, vec![], &vec![vec![1, 1]; 30]),
            BatchRun {
                index: 2,
                choice: vec![],
                settings: Vec::new(),
                outcome: Err(GameError::ZeroIterations),
                confidence: None,
            },
        ];
        let config = BatchConfig::new(SimulationParams::uniform(&game));
        let summary = BatchResult::summarize(&game, config, runs, Duration::ZERO);
        assert_eq!(summary.convergence_rate(), 2. / 3.);
        // the failed run contributes nothing to the iteration mean
        assert_eq!(summary.average_iterations(), 20.);
        assert_eq!(summary.average_duration(), Duration::ZERO);
    }

    #[test]
    fn sensitivity() {
        let game = prisoners_dilemma();
        let config = BatchConfig::new(SimulationParams::uniform(&game)).vary(
            "seed",
            vec![serde_json::json!(1), serde_json::json!(2)],
        );
        let runs = vec![
            played(&game, 0, vec![0], &vec![vec![1, 1]; 10]),
            played(&game, 1, vec![1], &[vec![0, 0], vec![1, 1]]),
        ];
        let summary = BatchResult::summarize(&game, config, runs, Duration::ZERO);
        assert_eq!(summary.effects.len(), 1);
        assert_eq!(summary.effects[0].path, "seed");
        assert_eq!(summary.effects[0].response[0].1, 1.);
        assert_eq!(summary.effects[0].response[1].1, 0.5);
    }
}
