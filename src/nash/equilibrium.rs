use crate::game::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Where the players stand at equilibrium: either a concrete strategy
/// per player, or a distribution per player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Profile {
    Pure(Vec<usize>),
    Mixed(Vec<Vec<Probability>>),
}

/// A Nash equilibrium: no player can gain by deviating unilaterally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NashEquilibrium {
    pub profile: Profile,
    /// Expected payoff per player at the equilibrium.
    pub payoffs: Vec<Utility>,
    /// Normalized deviation margin in [0, 1]; 0 for knife-edge mixtures.
    pub stability: Utility,
    /// Every unilateral deviation strictly loses.
    pub strict: bool,
}

impl NashEquilibrium {
    pub fn is_pure(&self) -> bool {
        matches!(self.profile, Profile::Pure(_))
    }
    pub fn is_mixed(&self) -> bool {
        matches!(self.profile, Profile::Mixed(_))
    }

    /// The equilibrium as per-player distributions, one-hot when pure.
    pub fn mixture(&self, n: usize) -> Vec<Vec<Probability>> {
        match &self.profile {
            Profile::Mixed(mixture) => mixture.clone(),
            Profile::Pure(indices) => indices
                .iter()
                .map(|i| {
                    let mut weights = vec![0.; n];
                    weights[*i] = 1.;
                    weights
                })
                .collect(),
        }
    }

    /// Per-player strategy indices carrying probability mass.
    pub fn support(&self) -> Vec<Vec<usize>> {
        match &self.profile {
            Profile::Pure(indices) => indices.iter().map(|i| vec![*i]).collect(),
            Profile::Mixed(mixture) => mixture
                .iter()
                .map(|weights| {
                    weights
                        .iter()
                        .enumerate()
                        .filter(|(_, w)| **w > TOLERANCE)
                        .map(|(i, _)| i)
                        .collect()
                })
                .collect(),
        }
    }

    /// Human-readable summary against a game's strategy names.
    pub fn label(&self, game: &PayoffMatrix) -> String {
        match &self.profile {
            Profile::Pure(indices) => format!("pure {}", game.label(indices)),
            Profile::Mixed(mixture) => {
                let seats = mixture
                    .iter()
                    .map(|weights| {
                        weights
                            .iter()
                            .enumerate()
                            .filter(|(_, w)| **w > TOLERANCE)
                            .map(|(i, w)| format!("{:.0}% {}", w * 100., game.strategy(i).name))
                            .collect::<Vec<_>>()
                            .join(" / ")
                    })
                    .collect::<Vec<_>>();
                format!("mixed ({})", seats.join("; "))
            }
        }
    }
}

impl std::fmt::Display for NashEquilibrium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match (&self.profile, self.strict) {
            (Profile::Pure(_), true) => "pure strict",
            (Profile::Pure(_), false) => "pure",
            (Profile::Mixed(_), _) => "mixed",
        };
        let payoffs = self
            .payoffs
            .iter()
            .map(|u| format!("{:+.2}", u))
            .collect::<Vec<_>>();
        write!(
            f,
            "{} equilibrium · payoffs [{}] · stability {:.2}",
            kind,
            payoffs.join(", "),
            self.stability
        )
    }
}
