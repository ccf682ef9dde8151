use super::*;
use crate::game::*;
use crate::*;

/// Pivot threshold below which a linear system counts as singular.
const SINGULAR: f64 = 1e-12;

/// Search for a mixed Nash equilibrium of a two-player game.
///
/// 2x2 games are solved in closed form from the indifference
/// conditions. Larger games go through support enumeration: candidate
/// supports in ascending size, a linear indifference system per pair,
/// first consistent solution wins. Degenerate games (zero denominator,
/// off-range or negative probabilities everywhere) yield `None` rather
/// than an error. Games beyond two players are out of scope and also
/// yield `None`.
pub fn find_mixed(game: &PayoffMatrix) -> Option<NashEquilibrium> {
    if game.players() != 2 {
        log::debug!(
            "mixed solving covers two players; {} requested",
            game.players()
        );
        return None;
    }
    match game.len() {
        2 => algebraic(game),
        _ => enumerate(game),
    }
}

/// Closed-form 2x2 indifference: each side mixes so the *other* side
/// is exactly indifferent between its two strategies.
fn algebraic(game: &PayoffMatrix) -> Option<NashEquilibrium> {
    let a = |i: usize, j: usize| game.payoff(&[i, j], 0);
    let b = |i: usize, j: usize| game.payoff(&[i, j], 1);
    let denom_p = b(0, 0) - b(0, 1) - b(1, 0) + b(1, 1);
    let denom_q = a(0, 0) - a(0, 1) - a(1, 0) + a(1, 1);
    if denom_p.abs() < TOLERANCE || denom_q.abs() < TOLERANCE {
        log::debug!("degenerate 2x2 game: indifference denominator vanishes");
        return None;
    }
    let p = (b(1, 1) - b(1, 0)) / denom_p;
    let q = (a(1, 1) - a(0, 1)) / denom_q;
    for weight in [p, q] {
        if !(0.0..=1.0).contains(&weight) {
            return None;
        }
        // a boundary weight is a pure profile wearing a mixed costume
        if weight < TOLERANCE || weight > 1. - TOLERANCE {
            return None;
        }
    }
    Some(build(game, vec![vec![p, 1. - p], vec![q, 1. - q]]))
}

/// Support enumeration for two-player games beyond 2x2.
fn enumerate(game: &PayoffMatrix) -> Option<NashEquilibrium> {
    let supports = supports(game.len());
    let mut pairs = Vec::new();
    for (i, s0) in supports.iter().enumerate() {
        for (j, s1) in supports.iter().enumerate() {
            pairs.push((s0.len() + s1.len(), i, j));
        }
    }
    pairs.sort();
    for (_, i, j) in pairs {
        if let Some(mixture) = indifferent(game, &supports[i], &supports[j]) {
            if gain(game, &mixture) <= TOLERANCE {
                return Some(build(game, mixture));
            }
        }
    }
    None
}

/// All strategy subsets of size two or more, ascending in size then
/// lexicographic. Singletons are pure profiles and belong to the pure
/// scan instead.
fn supports(n: usize) -> Vec<Vec<usize>> {
    let mut all = (0u32..(1 << n))
        .map(|bits| {
            (0..n)
                .filter(|i| bits & (1 << i) != 0)
                .collect::<Vec<usize>>()
        })
        .filter(|set| set.len() >= 2)
        .collect::<Vec<_>>();
    all.sort_by(|x, y| x.len().cmp(&y.len()).then_with(|| x.cmp(y)));
    all
}

/// Solve the indifference system for a support pair.
///
/// Unknowns are the row weights, the column weights, and one utility
/// per player. Equations force each side indifferent across its own
/// support and both weight vectors onto the simplex. Returns `None`
/// when the system is singular or any weight lands negative.
fn indifferent(
    game: &PayoffMatrix,
    s0: &[usize],
    s1: &[usize],
) -> Option<Vec<Vec<Probability>>> {
    let (n0, n1) = (s0.len(), s1.len());
    let m = n0 + n1 + 2;
    let mut lhs = vec![vec![0.; m]; m];
    let mut rhs = vec![0.; m];
    let mut row = 0;
    for &j in s1 {
        for (k, &i) in s0.iter().enumerate() {
            lhs[row][k] = game.payoff(&[i, j], 1);
        }
        lhs[row][n0 + n1 + 1] = -1.;
        row += 1;
    }
    for &i in s0 {
        for (k, &j) in s1.iter().enumerate() {
            lhs[row][n0 + k] = game.payoff(&[i, j], 0);
        }
        lhs[row][n0 + n1] = -1.;
        row += 1;
    }
    for k in 0..n0 {
        lhs[row][k] = 1.;
    }
    rhs[row] = 1.;
    row += 1;
    for k in 0..n1 {
        lhs[row][n0 + k] = 1.;
    }
    rhs[row] = 1.;
    let solution = solve(lhs, rhs)?;
    let mut mixture = vec![vec![0.; game.len()], vec![0.; game.len()]];
    for (k, &i) in s0.iter().enumerate() {
        mixture[0][i] = solution[k];
    }
    for (k, &j) in s1.iter().enumerate() {
        mixture[1][j] = solution[n0 + k];
    }
    for weights in mixture.iter_mut() {
        for w in weights.iter_mut() {
            if *w < -TOLERANCE {
                return None;
            }
            *w = w.max(0.);
        }
        let mass = weights.iter().sum::<Probability>();
        if (mass - 1.).abs() > POLICY_TOLERANCE {
            return None;
        }
        for w in weights.iter_mut() {
            *w /= mass;
        }
    }
    Some(mixture)
}

/// Gaussian elimination with partial pivoting over a square system.
fn solve(mut lhs: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let m = rhs.len();
    for col in 0..m {
        let pivot = (col..m).max_by(|x, y| {
            lhs[*x][col]
                .abs()
                .partial_cmp(&lhs[*y][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if lhs[pivot][col].abs() < SINGULAR {
            return None;
        }
        lhs.swap(col, pivot);
        rhs.swap(col, pivot);
        for row in (col + 1)..m {
            let factor = lhs[row][col] / lhs[col][col];
            if factor == 0. {
                continue;
            }
            for k in col..m {
                lhs[row][k] -= factor * lhs[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }
    let mut solution = vec![0.; m];
    for row in (0..m).rev() {
        let mut acc = rhs[row];
        for k in (row + 1)..m {
            acc -= lhs[row][k] * solution[k];
        }
        solution[row] = acc / lhs[row][row];
    }
    Some(solution)
}

fn build(game: &PayoffMatrix, mixture: Vec<Vec<Probability>>) -> NashEquilibrium {
    let payoffs = game.expected(&mixture);
    let stability = stability(game, &mixture);
    NashEquilibrium {
        profile: Profile::Mixed(mixture),
        payoffs,
        stability,
        strict: false,
    }
}
