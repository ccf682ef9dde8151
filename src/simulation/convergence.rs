use crate::game::*;
use crate::simulation::*;
use crate::*;

/// One realized iteration: who played what and what it paid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub iteration: usize,
    pub strategies: Vec<usize>,
    pub payoffs: Vec<Utility>,
}

/// User-supplied divergence between two equally sized windows of play.
pub type MetricFn = fn(&PayoffMatrix, &[ProfileRecord], &[ProfileRecord]) -> Utility;

/// Decides when a run has settled by comparing the most recent window
/// of iterations against the window before it. Verdicts are always
/// recomputed from the history handed in; nothing is cached, so a
/// rewound or extended history cannot disagree with itself.
#[derive(Clone)]
pub struct ConvergenceDetector {
    config: ConvergenceConfig,
    custom: Option<MetricFn>,
}

impl ConvergenceDetector {
    pub fn new(config: ConvergenceConfig) -> Self {
        if config.enabled && config.metric == Metric::Custom {
            log::warn!("custom convergence metric without a registered function never converges");
        }
        Self {
            config,
            custom: None,
        }
    }

    pub fn with_custom(config: ConvergenceConfig, custom: MetricFn) -> Self {
        Self {
            config,
            custom: Some(custom),
        }
    }

    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }

    /// Divergence between the two most recent windows. None until the
    /// history covers two full windows, so a run can never be declared
    /// stationary on its opening noise.
    pub fn divergence(
        &self,
        game: &PayoffMatrix,
        history: &[ProfileRecord],
    ) -> Option<Utility> {
        let w = self.config.window;
        if !self.config.enabled || w == 0 || history.len() < 2 * w {
            return None;
        }
        let recent = &history[history.len() - w..];
        let previous = &history[history.len() - 2 * w..history.len() - w];
        match self.config.metric {
            Metric::StrategyFrequency => Some(Self::frequency_shift(game, previous, recent)),
            Metric::PayoffVariance => Some(Self::variance_shift(game, previous, recent)),
            Metric::Custom => self.custom.map(|f| f(game, previous, recent)),
        }
    }

    pub fn converged(&self, game: &PayoffMatrix, history: &[ProfileRecord]) -> bool {
        match self.divergence(game, history) {
            Some(divergence) => divergence < self.config.tolerance,
            None => false,
        }
    }

    /// Relative strategy frequencies per seat over a window.
    pub fn frequencies(game: &PayoffMatrix, window: &[ProfileRecord]) -> Vec<Vec<Probability>> {
        let mut counts = vec![vec![0.; game.len()]; game.players()];
        for record in window {
            for (seat, strategy) in record.strategies.iter().enumerate() {
                counts[seat][*strategy] += 1.;
            }
        }
        counts
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|n| n / window.len().max(1) as Probability)
                    .collect()
            })
            .collect()
    }

    fn frequency_shift(
        game: &PayoffMatrix,
        previous: &[ProfileRecord],
        recent: &[ProfileRecord],
    ) -> Utility {
        let old = Self::frequencies(game, previous);
        let new = Self::frequencies(game, recent);
        old.iter()
            .flatten()
            .zip(new.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0., Utility::max)
    }

    fn variance_shift(
        game: &PayoffMatrix,
        previous: &[ProfileRecord],
        recent: &[ProfileRecord],
    ) -> Utility {
        (0..game.players())
            .map(|seat| {
                (Self::variance(previous, seat) - Self::variance(recent, seat)).abs()
            })
            .fold(0., Utility::max)
    }

    fn variance(window: &[ProfileRecord], seat: usize) -> Utility {
        let n = window.len().max(1) as Utility;
        let mean = window.iter().map(|r| r.payoffs[seat]).sum::<Utility>() / n;
        window
            .iter()
            .map(|r| (r.payoffs[seat] - mean).powi(2))
            .sum::<Utility>()
            / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(game: &PayoffMatrix, profiles: &[Vec<usize>]) -> Vec<ProfileRecord> {
        profiles
            .iter()
            .enumerate()
            .map(|(iteration, strategies)| ProfileRecord {
                iteration,
                strategies: strategies.clone(),
                payoffs: game.cell(strategies).to_vec(),
            })
            .collect()
    }

    fn trigger(
        detector: &ConvergenceDetector,
        game: &PayoffMatrix,
        history: &[ProfileRecord],
    ) -> Option<usize> {
        (0..=history.len()).find(|i| detector.converged(game, &history[..*i]))
    }

    #[test]
    fn warmup() {
        let game = prisoners_dilemma();
        let config = ConvergenceConfig {
            window: 10,
            ..ConvergenceConfig::default()
        };
        let detector = ConvergenceDetector::new(config);
        let history = replay(&game, &vec![vec![1, 1]; 19]);
        // one iteration short of two full windows
        assert_eq!(detector.divergence(&game, &history), None);
        assert!(!detector.converged(&game, &history));
    }

    #[test]
    fn stationary() {
        let game = prisoners_dilemma();
        let config = ConvergenceConfig {
            window: 10,
            ..ConvergenceConfig::default()
        };
        let detector = ConvergenceDetector::new(config);
        let history = replay(&game, &vec![vec![1, 1]; 20]);
        assert_eq!(detector.divergence(&game, &history), Some(0.));
        assert!(detector.converged(&game, &history));
    }

    #[test]
    fn drifting() {
        let game = matching_pennies();
        let config = ConvergenceConfig {
            window: 10,
            ..ConvergenceConfig::default()
        };
        let detector = ConvergenceDetector::new(config);
        let mut profiles = vec![vec![0, 0]; 10];
        profiles.extend(vec![vec![1, 1]; 10]);
        let history = replay(&game, &profiles);
        // frequencies flip entirely between the two windows
        assert_eq!(detector.divergence(&game, &history), Some(1.));
        assert!(!detector.converged(&game, &history));
    }

    #[test]
    fn earliest() {
        let game = prisoners_dilemma();
        let history = replay(&game, &vec![vec![0, 1]; 100]);
        let narrow = ConvergenceDetector::new(ConvergenceConfig {
            window: 10,
            ..ConvergenceConfig::default()
        });
        let wide = ConvergenceDetector::new(ConvergenceConfig {
            window: 25,
            ..ConvergenceConfig::default()
        });
        // a detector can only fire once both its windows are full
        assert_eq!(trigger(&narrow, &game, &history), Some(20));
        assert_eq!(trigger(&wide, &game, &history), Some(50));
    }

    #[test]
    fn disabled() {
        let game = prisoners_dilemma();
        let config = ConvergenceConfig {
            enabled: false,
            window: 5,
            ..ConvergenceConfig::default()
        };
        let detector = ConvergenceDetector::new(config);
        let history = replay(&game, &vec![vec![1, 1]; 50]);
        assert_eq!(detector.divergence(&game, &history), None);
        assert!(!detector.converged(&game, &history));
    }

    #[test]
    fn variance_watch() {
        let game = matching_pennies();
        let config = ConvergenceConfig {
            window: 10,
            metric: Metric::PayoffVariance,
            ..ConvergenceConfig::default()
        };
        let detector = ConvergenceDetector::new(config);
        // alternating wins in both windows: variance steady at 1
        let mut profiles = Vec::new();
        for i in 0..20 {
            profiles.push(vec![i % 2, 0]);
        }
        let steady = replay(&game, &profiles);
        assert_eq!(detector.divergence(&game, &steady), Some(0.));
        // flat first window, alternating second: variance jumps 0 to 1
        let mut profiles = vec![vec![0, 0]; 10];
        for i in 0..10 {
            profiles.push(vec![i % 2, 0]);
        }
        let jumpy = replay(&game, &profiles);
        assert_eq!(detector.divergence(&game, &jumpy), Some(1.));
        assert!(!detector.converged(&game, &jumpy));
    }

    #[test]
    fn custom_hook() {
        let game = prisoners_dilemma();
        let config = ConvergenceConfig {
            window: 5,
            metric: Metric::Custom,
            ..ConvergenceConfig::default()
        };
        let history = replay(&game, &vec![vec![0, 0]; 10]);
        let settled = ConvergenceDetector::with_custom(config.clone(), |_, _, _| 0.);
        assert!(settled.converged(&game, &history));
        let restless = ConvergenceDetector::with_custom(config.clone(), |_, _, _| 1.);
        assert!(!restless.converged(&game, &history));
        // metric selected but no function registered
        let unwired = ConvergenceDetector::new(config);
        assert!(!unwired.converged(&game, &history));
    }
}
