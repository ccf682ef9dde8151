use crate::dominance::*;
use crate::game::*;
use crate::nash::*;
use crate::simulation::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Lifecycle of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Idle,
    Running,
    /// Stopped early because play went stationary.
    Converged,
    /// Ran out its full iteration budget.
    Completed,
    Cancelled,
    Failed,
}

impl RunStatus {
    pub fn terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Running)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Converged => write!(f, "converged"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Everything observed over one run. Accumulated incrementally while
/// the engine plays, then frozen by finalize.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub status: RunStatus,
    /// Iteration budget the run was asked for.
    pub requested: usize,
    /// Iterations actually played.
    pub iterations: usize,
    /// Seed the run was played under, recorded even when auto-drawn.
    pub seed: u64,
    /// Count of each realized pure profile.
    pub outcomes: BTreeMap<Vec<usize>, u64>,
    /// Per seat, how often each strategy was played.
    pub frequencies: Vec<Vec<u64>>,
    /// Mean realized payoff per seat. Holds running totals until finalize.
    pub expected_payoffs: Vec<Utility>,
    pub history: Vec<ProfileRecord>,
    /// Iteration count at which stationarity was declared.
    pub converged_at: Option<usize>,
    pub elapsed: Duration,
    /// Top recommendation for the game, when analysis was requested.
    pub equilibrium: Option<NashEquilibrium>,
    pub dominance: Option<DominanceReport>,
}

impl SimulationResult {
    pub fn fresh(game: &PayoffMatrix, requested: usize, seed: u64) -> Self {
        Self {
            status: RunStatus::Running,
            requested,
            iterations: 0,
            seed,
            outcomes: BTreeMap::new(),
            frequencies: vec![vec![0; game.len()]; game.players()],
            expected_payoffs: vec![0.; game.players()],
            history: Vec::new(),
            converged_at: None,
            elapsed: Duration::ZERO,
            equilibrium: None,
            dominance: None,
        }
    }

    pub(crate) fn record(&mut self, strategies: Vec<usize>, payoffs: Vec<Utility>) {
        *self.outcomes.entry(strategies.clone()).or_insert(0) += 1;
        for (seat, strategy) in strategies.iter().enumerate() {
            self.frequencies[seat][*strategy] += 1;
        }
        for (total, payoff) in self.expected_payoffs.iter_mut().zip(payoffs.iter()) {
            *total += payoff;
        }
        self.history.push(ProfileRecord {
            iteration: self.iterations,
            strategies,
            payoffs,
        });
        self.iterations += 1;
    }

    pub(crate) fn finalize(&mut self, status: RunStatus, elapsed: Duration) {
        let n = self.iterations.max(1) as Utility;
        for total in self.expected_payoffs.iter_mut() {
            *total /= n;
        }
        self.status = status;
        self.elapsed = elapsed;
    }

    /// Empirical mixture: strategy frequencies normalized per seat.
    pub fn empirical(&self) -> Vec<Vec<Probability>> {
        let n = self.iterations.max(1) as Probability;
        self.frequencies
            .iter()
            .map(|row| row.iter().map(|count| *count as Probability / n).collect())
            .collect()
    }

    /// Most frequent outcome and the share of play it claimed.
    pub fn modal(&self) -> Option<(Vec<usize>, Probability)> {
        let n = self.iterations.max(1) as Probability;
        self.outcomes
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(profile, count)| (profile.clone(), *count as Probability / n))
    }

    /// Largest gap between empirical play and the attached equilibrium.
    pub fn alignment(&self) -> Option<Utility> {
        let equilibrium = self.equilibrium.as_ref()?;
        let n = self.frequencies.first()?.len();
        let mixture = equilibrium.mixture(n);
        Some(
            self.empirical()
                .iter()
                .flatten()
                .zip(mixture.iter().flatten())
                .map(|(a, b)| (a - b).abs())
                .fold(0., Utility::max),
        )
    }
}

impl std::fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} · {}/{} iterations · seed {}",
            self.status, self.iterations, self.requested, self.seed
        )?;
        if let Some(at) = self.converged_at {
            write!(f, " · stationary at {}", at)?;
        }
        for (seat, (row, ev)) in self
            .empirical()
            .iter()
            .zip(self.expected_payoffs.iter())
            .enumerate()
        {
            write!(f, "\nP{} ", seat + 1)?;
            for share in row {
                write!(f, "{:>7.3}", share)?;
            }
            write!(f, " · ev {:+.3}", ev)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bookkeeping() {
        let game = prisoners_dilemma();
        let mut result = SimulationResult::fresh(&game, 4, 0);
        result.record(vec![1, 1], game.cell(&[1, 1]).to_vec());
        result.record(vec![1, 1], game.cell(&[1, 1]).to_vec());
        result.record(vec![0, 1], game.cell(&[0, 1]).to_vec());
        result.record(vec![1, 1], game.cell(&[1, 1]).to_vec());
        result.finalize(RunStatus::Completed, Duration::ZERO);
        assert_eq!(result.iterations, 4);
        assert_eq!(result.outcomes.get(&vec![1, 1]), Some(&3));
        assert_eq!(result.frequencies, vec![vec![1, 3], vec![0, 4]]);
        // three mutual defections at 1 plus one sucker round at 0
        assert_eq!(result.expected_payoffs, vec![0.75, 2.]);
        assert_eq!(result.modal(), Some((vec![1, 1], 0.75)));
    }

    #[test]
    fn terminality() {
        assert!(!RunStatus::Idle.terminal());
        assert!(!RunStatus::Running.terminal());
        assert!(RunStatus::Converged.terminal());
        assert!(RunStatus::Cancelled.terminal());
        assert!(RunStatus::Failed.terminal());
    }

    #[test]
    fn agreement() {
        let game = prisoners_dilemma();
        let mut result = SimulationResult::fresh(&game, 2, 0);
        result.record(vec![1, 1], game.cell(&[1, 1]).to_vec());
        result.record(vec![1, 1], game.cell(&[1, 1]).to_vec());
        result.finalize(RunStatus::Completed, Duration::ZERO);
        result.equilibrium = find_pure(&game).into_iter().next();
        assert_eq!(result.alignment(), Some(0.));
    }
}
