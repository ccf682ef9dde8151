use crate::game::*;
use crate::*;

/// Expected payoff to `seat` from deviating to the pure strategy `alt`
/// while everyone else keeps their mixture.
pub fn deviation(
    game: &PayoffMatrix,
    mixture: &[Vec<Probability>],
    seat: usize,
    alt: usize,
) -> Utility {
    let mut probe = mixture.to_vec();
    let mut pure = vec![0.; game.len()];
    pure[alt] = 1.;
    probe[seat] = pure;
    game.expected(&probe)[seat]
}

/// Largest profit any player can extract by a unilateral pure deviation.
/// Non-positive (up to numerical noise) at a Nash equilibrium.
pub fn gain(game: &PayoffMatrix, mixture: &[Vec<Probability>]) -> Utility {
    let values = game.expected(mixture);
    let mut best = Utility::NEG_INFINITY;
    for seat in 0..game.players() {
        for alt in 0..game.len() {
            best = best.max(deviation(game, mixture, seat, alt) - values[seat]);
        }
    }
    best
}

/// Smallest margin, across players, by which stepping outside the
/// support underperforms the equilibrium payoff. On-support deviations
/// tie by construction and are not counted; a mixture with full support
/// everywhere has no outside options and margins at zero.
pub fn margin(game: &PayoffMatrix, mixture: &[Vec<Probability>]) -> Utility {
    let values = game.expected(mixture);
    let mut tightest = Utility::INFINITY;
    for seat in 0..game.players() {
        for alt in 0..game.len() {
            if mixture[seat][alt] > TOLERANCE {
                continue;
            }
            tightest = tightest.min(values[seat] - deviation(game, mixture, seat, alt));
        }
    }
    match tightest.is_finite() {
        true => tightest,
        false => 0.,
    }
}

/// Deviation margin normalized by the game's payoff spread and clamped
/// to [0, 1]. Games with a flat payoff landscape score 0.
pub fn stability(game: &PayoffMatrix, mixture: &[Vec<Probability>]) -> Utility {
    let spread = game.spread();
    if spread <= TOLERANCE {
        return 0.;
    }
    (margin(game, mixture) / spread).clamp(0., 1.)
}
