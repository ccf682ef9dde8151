use super::*;
use crate::game::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// One simultaneous round of iterated elimination.
///
/// Every removal in a round is justified against the survivor sets as
/// they stood when the round began, so the order strategies are visited
/// in cannot change the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationRound {
    pub round: usize,
    pub eliminated: Vec<Dominated>,
    /// Per-player survivor sets after this round's removals.
    pub survivors: Vec<Vec<usize>>,
}

/// Iterated elimination of strictly dominated strategies.
///
/// Returns the explainable round-by-round trace and the final survivor
/// sets. Weak dominance never feeds elimination; removing weakly
/// dominated strategies can delete equilibria.
pub fn eliminate(game: &PayoffMatrix) -> (Vec<EliminationRound>, Vec<Vec<usize>>) {
    let mut survivors: Vec<Vec<usize>> = vec![(0..game.len()).collect(); game.players()];
    let mut rounds = Vec::new();
    loop {
        let mut eliminated = Vec::new();
        for player in 0..game.players() {
            for &strategy in survivors[player].iter() {
                let dominator = survivors[player]
                    .iter()
                    .filter(|s| **s != strategy)
                    .find(|s| beats(game, player, **s, strategy, &survivors));
                if let Some(&by) = dominator {
                    eliminated.push(Dominated {
                        player,
                        strategy,
                        by,
                        kind: DominanceKind::Strict,
                    });
                }
            }
        }
        if eliminated.is_empty() {
            break;
        }
        for player in 0..game.players() {
            let removing = eliminated
                .iter()
                .filter(|e| e.player == player)
                .count();
            if removing >= survivors[player].len() {
                log::warn!(
                    "elimination would leave player {} with no strategies; halting",
                    player
                );
                return (rounds, survivors);
            }
        }
        for e in eliminated.iter() {
            survivors[e.player].retain(|s| *s != e.strategy);
        }
        let round = rounds.len() + 1;
        log::debug!(
            "elimination round {}: removed {} strategies",
            round,
            eliminated.len()
        );
        rounds.push(EliminationRound {
            round,
            eliminated,
            survivors: survivors.clone(),
        });
    }
    (rounds, survivors)
}

/// Strict dominance of `a` over `b` restricted to the opponents'
/// surviving strategies.
fn beats(
    game: &PayoffMatrix,
    player: usize,
    a: usize,
    b: usize,
    survivors: &[Vec<usize>],
) -> bool {
    let radices = survivors
        .iter()
        .enumerate()
        .map(|(seat, set)| match seat == player {
            true => 1,
            false => set.len(),
        })
        .collect::<Vec<_>>();
    Odometer::new(radices).all(|digits| {
        let mut profile = digits
            .iter()
            .enumerate()
            .map(|(seat, d)| match seat == player {
                true => 0,
                false => survivors[seat][*d],
            })
            .collect::<Vec<_>>();
        profile[player] = a;
        let ua = game.payoff(&profile, player);
        profile[player] = b;
        let ub = game.payoff(&profile, player);
        ua - ub > TOLERANCE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse() {
        // both prisoners lose cooperation in a single simultaneous round
        let (rounds, survivors) = eliminate(&prisoners_dilemma());
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].eliminated.len(), 2);
        assert_eq!(survivors, vec![vec![1], vec![1]]);
    }

    #[test]
    fn cascade() {
        // strategy 1 beats 2 outright; 0 beats 1 only once 2 is gone
        let strategies = (0..3).map(Strategy::indexed).collect::<Vec<_>>();
        let a = [[4., 3., 0.], [3., 2., 5.], [1., 0., 1.]];
        let cells = (0..3)
            .flat_map(|i| (0..3).map(move |j| vec![a[i][j], a[j][i]]))
            .collect::<Vec<_>>();
        let game = PayoffMatrix::new(2, strategies, cells).unwrap();
        let (rounds, survivors) = eliminate(&game);
        assert_eq!(rounds.len(), 2);
        assert_eq!(survivors, vec![vec![0], vec![0]]);
        assert!(rounds[0].eliminated.iter().all(|e| e.strategy == 2));
        assert!(rounds[1].eliminated.iter().all(|e| e.strategy == 1));
    }

    #[test]
    fn reduction() {
        // matching pennies with a throwaway third strategy for each side
        let strategies = (0..3).map(Strategy::indexed).collect::<Vec<_>>();
        let a = [[1., -1., 5.], [-1., 1., 5.], [-9., -9., -9.]];
        let b = [[-1., 1., -9.], [1., -1., -9.], [5., 5., -9.]];
        let cells = (0..3)
            .flat_map(|i| (0..3).map(move |j| vec![a[i][j], b[i][j]]))
            .collect::<Vec<_>>();
        let game = PayoffMatrix::new(2, strategies, cells).unwrap();
        let report = analyze(&game);
        assert_eq!(report.rounds.len(), 1);
        assert_eq!(report.survivors, vec![vec![0, 1], vec![0, 1]]);
        let reduced = report.reduced.unwrap();
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced.payoff(&[0, 0], 0), 1.);
        assert!(reduced.zero_sum());
    }

    #[test]
    fn stationary() {
        let (rounds, survivors) = eliminate(&rock_paper_scissors());
        assert!(rounds.is_empty());
        assert_eq!(survivors, vec![vec![0, 1, 2], vec![0, 1, 2]]);
    }
}
