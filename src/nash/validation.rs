use super::*;
use crate::game::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Payoff volatility a player signs up for by following the equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

/// Machine-readable finding with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
}

impl Diagnostic {
    fn new(code: &str, message: String) -> Self {
        Self {
            code: code.to_string(),
            message,
        }
    }
}

/// How firmly the equilibrium holds together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityAnalysis {
    /// Normalized deviation margin in [0, 1].
    pub score: Utility,
    /// Raw payoff margin separating the best outside deviation.
    pub margin: Utility,
    /// Share of small perturbations the equilibrium absorbs.
    pub robustness: Probability,
}

/// Welfare-economic readout of an equilibrium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Sum of all players' expected payoffs.
    pub social_welfare: Utility,
    /// Welfare relative to the best any pure profile attains.
    pub efficiency: Utility,
    /// One minus the normalized payoff variance across players.
    pub fairness: Utility,
    /// Average share of the strategy space players must randomize over.
    pub complexity: Probability,
    pub risk: RiskProfile,
}

/// Outcome of re-checking an equilibrium from scratch.
///
/// Built fresh per call and never cached, so the verdict always
/// reflects the exact game and candidate handed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumValidation {
    pub valid: bool,
    pub stability: StabilityAnalysis,
    pub quality: QualityMetrics,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Re-verify a candidate equilibrium and grade its quality.
///
/// The deviation check is independent of however the candidate was
/// found: it replays every unilateral pure deviation and fails on any
/// gain above [`TOLERANCE`].
pub fn validate(game: &PayoffMatrix, equilibrium: &NashEquilibrium) -> EquilibriumValidation {
    let mixture = equilibrium.mixture(game.len());
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for (seat, weights) in mixture.iter().enumerate() {
        let mass = weights.iter().sum::<Probability>();
        let sane = weights.iter().all(|w| (-TOLERANCE..=1. + TOLERANCE).contains(w));
        if (mass - 1.).abs() > POLICY_TOLERANCE || !sane {
            errors.push(Diagnostic::new(
                "invalid_probabilities",
                format!("player {} weights sum to {:.4}", seat, mass),
            ));
        }
    }
    let best = gain(game, &mixture);
    if best > TOLERANCE {
        errors.push(Diagnostic::new(
            "profitable_deviation",
            format!("a unilateral deviation gains {:.6}", best),
        ));
    }
    let stability = StabilityAnalysis {
        score: stability(game, &mixture),
        margin: margin(game, &mixture),
        robustness: robustness(game, &mixture),
    };
    let quality = grade(game, equilibrium, &mixture);
    if stability.score < LOW_STABILITY {
        warnings.push(Diagnostic::new(
            "low_stability",
            format!("deviation margin {:.4} is thin", stability.margin),
        ));
    }
    if quality.efficiency < LOW_EFFICIENCY {
        warnings.push(Diagnostic::new(
            "inefficient_outcome",
            format!(
                "welfare {:.2} falls short of what coordination could reach",
                quality.social_welfare
            ),
        ));
    }
    if quality.fairness < LOW_FAIRNESS {
        warnings.push(Diagnostic::new(
            "unequal_payoffs",
            "the equilibrium splits payoffs lopsidedly".to_string(),
        ));
    }
    EquilibriumValidation {
        valid: errors.is_empty(),
        stability,
        quality,
        errors,
        warnings,
    }
}

/// Share of small mixture perturbations under which no player's
/// normalized deviation gain exceeds the perturbation itself.
pub fn robustness(game: &PayoffMatrix, mixture: &[Vec<Probability>]) -> Probability {
    let spread = game.spread();
    if spread <= TOLERANCE {
        return 1.;
    }
    let mut probes = 0;
    let mut held = 0;
    for seat in 0..game.players() {
        for from in 0..game.len() {
            if mixture[seat][from] < PERTURBATION {
                continue;
            }
            for to in (0..game.len()).filter(|t| *t != from) {
                let mut perturbed = mixture.to_vec();
                perturbed[seat][from] -= PERTURBATION;
                perturbed[seat][to] += PERTURBATION;
                probes += 1;
                if gain(game, &perturbed) / spread <= PERTURBATION {
                    held += 1;
                }
            }
        }
    }
    match probes {
        0 => 1.,
        _ => held as Probability / probes as Probability,
    }
}

fn grade(
    game: &PayoffMatrix,
    equilibrium: &NashEquilibrium,
    mixture: &[Vec<Probability>],
) -> QualityMetrics {
    // grade what the mixture actually earns, not what the candidate claims
    let values = game.expected(mixture);
    let social_welfare = values.iter().sum::<Utility>();
    let best = game
        .profiles()
        .map(|p| game.welfare(&p))
        .fold(Utility::NEG_INFINITY, Utility::max);
    let worst = game
        .profiles()
        .map(|p| game.welfare(&p))
        .fold(Utility::INFINITY, Utility::min);
    // ratio form only makes sense against a positive ceiling; zero-sum
    // and all-negative games fall back to min-max normalization
    let efficiency = if best > TOLERANCE {
        (social_welfare / best).clamp(0., 1.)
    } else if best - worst > TOLERANCE {
        ((social_welfare - worst) / (best - worst)).clamp(0., 1.)
    } else {
        1.
    };
    let mean = social_welfare / game.players() as Utility;
    let variance = values
        .iter()
        .map(|u| (u - mean).powi(2))
        .sum::<Utility>()
        / game.players() as Utility;
    let spread = game.spread();
    let fairness = match spread > TOLERANCE {
        true => (1. - variance / spread.powi(2)).clamp(0., 1.),
        false => 1.,
    };
    let complexity = equilibrium
        .support()
        .iter()
        .map(|s| s.len() as Probability / game.len() as Probability)
        .sum::<Probability>()
        / game.players() as Probability;
    let risk = risk(game, mixture, spread);
    QualityMetrics {
        social_welfare,
        efficiency,
        fairness,
        complexity,
        risk,
    }
}

/// Classify by the variance of realized payoffs under the equilibrium's
/// play distribution, normalized by the squared payoff spread.
fn risk(game: &PayoffMatrix, mixture: &[Vec<Probability>], spread: Utility) -> RiskProfile {
    if spread <= TOLERANCE {
        return RiskProfile::Low;
    }
    let values = game.expected(mixture);
    let mut variance = 0.;
    for seat in 0..game.players() {
        let mut second = 0.;
        for profile in game.profiles() {
            let weight = profile
                .iter()
                .enumerate()
                .map(|(s, d)| mixture[s][*d])
                .product::<Probability>();
            second += weight * game.payoff(&profile, seat).powi(2);
        }
        variance += second - values[seat].powi(2);
    }
    let normalized = (variance / game.players() as Utility) / spread.powi(2);
    match normalized {
        v if v < RISK_LOW => RiskProfile::Low,
        v if v < RISK_MEDIUM => RiskProfile::Medium,
        _ => RiskProfile::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certified() {
        let game = prisoners_dilemma();
        let eq = find_pure(&game).remove(0);
        let verdict = validate(&game, &eq);
        assert!(verdict.valid);
        assert!(verdict.errors.is_empty());
        assert!((verdict.quality.social_welfare - 2.).abs() < TOLERANCE);
        assert!((verdict.quality.efficiency - 1. / 3.).abs() < TOLERANCE);
        assert!((verdict.quality.fairness - 1.).abs() < TOLERANCE);
        assert!((verdict.quality.complexity - 0.5).abs() < TOLERANCE);
        assert_eq!(verdict.quality.risk, RiskProfile::Low);
    }

    #[test]
    fn rejection() {
        let game = prisoners_dilemma();
        let fake = NashEquilibrium {
            profile: Profile::Pure(vec![0, 0]),
            payoffs: vec![3., 3.],
            stability: 1.,
            strict: true,
        };
        let verdict = validate(&game, &fake);
        assert!(!verdict.valid);
        assert!(verdict.errors.iter().any(|e| e.code == "profitable_deviation"));
    }

    #[test]
    fn malformed() {
        let game = matching_pennies();
        let lopsided = NashEquilibrium {
            profile: Profile::Mixed(vec![vec![0.4, 0.4], vec![0.5, 0.5]]),
            payoffs: vec![0., 0.],
            stability: 0.,
            strict: false,
        };
        let verdict = validate(&game, &lopsided);
        assert!(!verdict.valid);
        assert!(verdict.errors.iter().any(|e| e.code == "invalid_probabilities"));
    }

    #[test]
    fn warned() {
        // mutual defection is valid yet inefficient
        let game = prisoners_dilemma();
        let eq = find_pure(&game).remove(0);
        let verdict = validate(&game, &eq);
        assert!(verdict.valid);
        assert!(verdict.warnings.iter().any(|w| w.code == "inefficient_outcome"));
    }

    #[test]
    fn volatility() {
        // the matching-pennies mixture swings a full unit either way
        let game = matching_pennies();
        let eq = find_mixed(&game).unwrap();
        let verdict = validate(&game, &eq);
        assert!(verdict.valid);
        assert_eq!(verdict.quality.risk, RiskProfile::High);
        assert!((verdict.quality.complexity - 1.).abs() < TOLERANCE);
    }

    #[test]
    fn sturdiness() {
        // a strictly dominant equilibrium shrugs off small perturbations
        let game = prisoners_dilemma();
        let defection = vec![vec![0., 1.], vec![0., 1.]];
        assert!((robustness(&game, &defection) - 1.).abs() < TOLERANCE);
    }
}
