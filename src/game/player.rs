use super::*;
use crate::error::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// How an adaptive player reacts to what it has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdaptiveKind {
    /// Repeat the opponent's previous move. Opens with strategy 0.
    TitForTat,
    /// Best pure reply to the opponents' empirical strategy frequencies.
    BestResponse,
}

/// A player's decision rule, fixed for the lifetime of a run.
///
/// This is a closed set: every way a seat can act is one of these
/// variants, and all of them resolve through the single [`sample`]
/// operation. Mixed weights are taken at face value after validation;
/// they are never renormalized.
///
/// [`sample`]: PlayerPolicy::sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerPolicy {
    /// Always play one strategy index.
    Pure(usize),
    /// Draw from a fixed distribution over all strategies.
    Mixed(Vec<Probability>),
    /// React to the opponents' observed play.
    Adaptive {
        kind: AdaptiveKind,
        /// Chance of playing strategy 0 instead of retaliating.
        forgiveness: Probability,
        /// Chance of replacing the intended move with a uniform draw.
        noise: Probability,
    },
}

impl PlayerPolicy {
    /// Uniform distribution over all of a game's strategies.
    pub fn uniform(game: &PayoffMatrix) -> Self {
        Self::Mixed(vec![1. / game.len() as Probability; game.len()])
    }

    /// Check that this policy can produce draws for the given game.
    pub fn validate(&self, game: &PayoffMatrix, seat: usize) -> Result<(), GameError> {
        let n = game.len();
        match self {
            Self::Pure(index) => match *index < n {
                true => Ok(()),
                false => Err(GameError::InvalidPolicy {
                    player: seat,
                    reason: format!("strategy index {} out of range 0..{}", index, n),
                }),
            },
            Self::Mixed(weights) => {
                if weights.len() != n {
                    return Err(GameError::InvalidPolicy {
                        player: seat,
                        reason: format!("expected {} weights, found {}", n, weights.len()),
                    });
                }
                if weights.iter().any(|w| *w < 0.) {
                    return Err(GameError::InvalidPolicy {
                        player: seat,
                        reason: "negative weight".to_string(),
                    });
                }
                let mass = weights.iter().sum::<Probability>();
                match (mass - 1.).abs() <= POLICY_TOLERANCE {
                    true => Ok(()),
                    false => Err(GameError::InvalidPolicy {
                        player: seat,
                        reason: format!("weights sum to {}, expected 1", mass),
                    }),
                }
            }
            Self::Adaptive {
                forgiveness, noise, ..
            } => {
                for (name, value) in [("forgiveness", forgiveness), ("noise", noise)] {
                    if !(0. ..=1.).contains(value) {
                        return Err(GameError::InvalidPolicy {
                            player: seat,
                            reason: format!("{} {} outside [0, 1]", name, value),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Resolve this policy into a concrete strategy index for one iteration.
    ///
    /// `previous` is the full profile of the last iteration, if any;
    /// `counts` are cumulative per-seat draw counts over the run so far.
    pub fn sample(
        &self,
        game: &PayoffMatrix,
        seat: usize,
        previous: Option<&[usize]>,
        counts: &[Vec<u64>],
        rng: &mut impl rand::Rng,
    ) -> usize {
        match self {
            Self::Pure(index) => *index,
            Self::Mixed(weights) => cumulative(weights, rng.random::<Probability>()),
            Self::Adaptive {
                kind,
                forgiveness,
                noise,
            } => {
                let intended = match kind {
                    AdaptiveKind::TitForTat => {
                        let opponent = (seat + 1) % game.players();
                        let echoed = previous.map(|p| p[opponent]).unwrap_or(0);
                        match echoed != 0 && rng.random::<Probability>() < *forgiveness {
                            true => 0,
                            false => echoed,
                        }
                    }
                    AdaptiveKind::BestResponse => {
                        let mixture = (0..game.players())
                            .map(|s| empirical(&counts[s], game.len()))
                            .collect::<Vec<_>>();
                        game.respond(seat, &mixture).0
                    }
                };
                match rng.random::<Probability>() < *noise {
                    true => rng.random_range(0..game.len()),
                    false => intended,
                }
            }
        }
    }
}

/// Inverse-CDF lookup: walk the cumulative mass until the roll falls
/// inside a bucket. Floating-point residue falls to the last index.
fn cumulative(weights: &[Probability], roll: Probability) -> usize {
    let mut mass = 0.;
    for (index, weight) in weights.iter().enumerate() {
        mass += weight;
        if roll < mass {
            return index;
        }
    }
    weights.len() - 1
}

/// Observed strategy frequencies, uniform until the first draw lands.
fn empirical(counts: &[u64], n: usize) -> Vec<Probability> {
    let total = counts.iter().sum::<u64>();
    match total {
        0 => vec![1. / n as Probability; n],
        _ => counts
            .iter()
            .map(|c| *c as Probability / total as Probability)
            .collect(),
    }
}
