use super::*;
use crate::game::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Strength of a dominance relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominanceKind {
    /// Better against every opponent combination.
    Strict,
    /// Never worse, better against at least one combination.
    Weak,
}

/// A strategy that dominates every alternative available to its player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dominance {
    pub player: usize,
    pub strategy: usize,
    pub kind: DominanceKind,
    /// The alternatives it beats, in index order.
    pub dominated: Vec<usize>,
}

/// A strategy beaten by a sibling strategy of the same player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dominated {
    pub player: usize,
    pub strategy: usize,
    /// The sibling that beats it.
    pub by: usize,
    pub kind: DominanceKind,
}

/// Full dominance structure of a game.
#[derive(Debug, Clone, PartialEq)]
pub struct DominanceReport {
    pub strictly_dominant: Vec<Dominance>,
    pub weakly_dominant: Vec<Dominance>,
    pub strictly_dominated: Vec<Dominated>,
    pub weakly_dominated: Vec<Dominated>,
    pub rounds: Vec<EliminationRound>,
    /// Per-player strategy indices that survive iterated elimination.
    pub survivors: Vec<Vec<usize>>,
    /// The game restricted to the survivors, when they are shared
    /// across players and still form a valid game.
    pub reduced: Option<PayoffMatrix>,
}

/// Does strategy `a` dominate strategy `b` for `player`?
///
/// Payoffs are compared pointwise over the full cross-product of the
/// opponents' strategies; differences within [`TOLERANCE`] are ties.
pub fn compare(
    game: &PayoffMatrix,
    player: usize,
    a: usize,
    b: usize,
) -> Option<DominanceKind> {
    let mut strict = true;
    let mut better = false;
    for mut profile in game.profiles().filter(|p| p[player] == 0) {
        profile[player] = a;
        let ua = game.payoff(&profile, player);
        profile[player] = b;
        let ub = game.payoff(&profile, player);
        let diff = ua - ub;
        if diff < -TOLERANCE {
            return None;
        }
        if diff <= TOLERANCE {
            strict = false;
        } else {
            better = true;
        }
    }
    match (strict, better) {
        (true, _) => Some(DominanceKind::Strict),
        (false, true) => Some(DominanceKind::Weak),
        (false, false) => None,
    }
}

/// Classify one strategy's dominance over all of its alternatives.
///
/// `Strict` means it strictly beats every alternative; `Weak` means it
/// at least weakly beats every alternative. A strategy that only beats
/// some alternatives is not dominant and yields `None`.
pub fn check(game: &PayoffMatrix, player: usize, strategy: usize) -> Option<Dominance> {
    let mut beaten = Vec::new();
    let mut strict = true;
    for other in (0..game.len()).filter(|t| *t != strategy) {
        match compare(game, player, strategy, other) {
            Some(DominanceKind::Strict) => beaten.push(other),
            Some(DominanceKind::Weak) => {
                strict = false;
                beaten.push(other);
            }
            None => return None,
        }
    }
    Some(Dominance {
        player,
        strategy,
        kind: match strict {
            true => DominanceKind::Strict,
            false => DominanceKind::Weak,
        },
        dominated: beaten,
    })
}

/// Analyze the whole game: dominant and dominated strategies per player,
/// iterated elimination of strictly dominated strategies, and the
/// reduced game when one exists.
pub fn analyze(game: &PayoffMatrix) -> DominanceReport {
    let mut report = DominanceReport {
        strictly_dominant: Vec::new(),
        weakly_dominant: Vec::new(),
        strictly_dominated: Vec::new(),
        weakly_dominated: Vec::new(),
        rounds: Vec::new(),
        survivors: Vec::new(),
        reduced: None,
    };
    for player in 0..game.players() {
        for strategy in 0..game.len() {
            if let Some(dominance) = check(game, player, strategy) {
                match dominance.kind {
                    DominanceKind::Strict => report.strictly_dominant.push(dominance),
                    DominanceKind::Weak => report.weakly_dominant.push(dominance),
                }
            }
            if let Some(dominated) = beaten_by(game, player, strategy) {
                match dominated.kind {
                    DominanceKind::Strict => report.strictly_dominated.push(dominated),
                    DominanceKind::Weak => report.weakly_dominated.push(dominated),
                }
            }
        }
    }
    let (rounds, survivors) = eliminate(game);
    report.reduced = reduced(game, &survivors);
    report.rounds = rounds;
    report.survivors = survivors;
    report
}

/// The strongest way this strategy loses to a sibling, if it does.
fn beaten_by(game: &PayoffMatrix, player: usize, strategy: usize) -> Option<Dominated> {
    let mut weakly: Option<usize> = None;
    for other in (0..game.len()).filter(|s| *s != strategy) {
        match compare(game, player, other, strategy) {
            Some(DominanceKind::Strict) => {
                return Some(Dominated {
                    player,
                    strategy,
                    by: other,
                    kind: DominanceKind::Strict,
                });
            }
            Some(DominanceKind::Weak) => weakly = weakly.or(Some(other)),
            None => {}
        }
    }
    weakly.map(|by| Dominated {
        player,
        strategy,
        by,
        kind: DominanceKind::Weak,
    })
}

/// Shared-survivor restriction, when elimination actually removed
/// something and left a game worth returning.
fn reduced(game: &PayoffMatrix, survivors: &[Vec<usize>]) -> Option<PayoffMatrix> {
    let shared = survivors.first()?;
    if !survivors.iter().all(|s| s == shared) {
        return None;
    }
    if shared.len() == game.len() {
        return None;
    }
    game.restrict(shared).ok()
}

impl std::fmt::Display for DominanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for d in self.strictly_dominant.iter() {
            writeln!(f, "P{} strictly dominant: strategy {}", d.player + 1, d.strategy)?;
        }
        for d in self.weakly_dominant.iter() {
            writeln!(f, "P{} weakly dominant: strategy {}", d.player + 1, d.strategy)?;
        }
        for round in self.rounds.iter() {
            let removals = round
                .eliminated
                .iter()
                .map(|e| format!("P{}:{}", e.player + 1, e.strategy))
                .collect::<Vec<_>>();
            writeln!(f, "round {}: eliminated {}", round.round, removals.join(", "))?;
        }
        if self.rounds.is_empty() {
            writeln!(f, "no strategies eliminated")?;
        }
        Ok(())
    }
}
