//! Canonical two-player games used as fixtures throughout tests,
//! benchmarks, and the command line.

use super::*;
use crate::Utility;

#[rustfmt::skip]
pub fn prisoners_dilemma() -> PayoffMatrix {
    let strategies = vec![
        Strategy::new(0, "Cooperate", "C", "Stay silent and hope the other does too"),
        Strategy::new(1, "Defect",    "D", "Confess and sell the other out"),
    ];
    let rows = vec![
        vec![vec![3., 3.], vec![0., 5.]],
        vec![vec![5., 0.], vec![1., 1.]],
    ];
    PayoffMatrix::bimatrix(strategies, rows).expect("prisoner's dilemma is well formed")
}

#[rustfmt::skip]
pub fn matching_pennies() -> PayoffMatrix {
    let strategies = vec![
        Strategy::named(0, "Heads"),
        Strategy::named(1, "Tails"),
    ];
    let rows = vec![
        vec![vec![ 1., -1.], vec![-1.,  1.]],
        vec![vec![-1.,  1.], vec![ 1., -1.]],
    ];
    PayoffMatrix::bimatrix(strategies, rows).expect("matching pennies is well formed")
}

#[rustfmt::skip]
pub fn stag_hunt() -> PayoffMatrix {
    let strategies = vec![
        Strategy::named(0, "Stag"),
        Strategy::named(1, "Hare"),
    ];
    let rows = vec![
        vec![vec![4., 4.], vec![0., 3.]],
        vec![vec![3., 0.], vec![2., 2.]],
    ];
    PayoffMatrix::bimatrix(strategies, rows).expect("stag hunt is well formed")
}

#[rustfmt::skip]
pub fn chicken() -> PayoffMatrix {
    let strategies = vec![
        Strategy::new(0, "Swerve",   "S", "Chicken out"),
        Strategy::new(1, "Straight", "T", "Hold the line"),
    ];
    let rows = vec![
        vec![vec![  0.,   0.], vec![ -1.,   1.]],
        vec![vec![  1.,  -1.], vec![-10., -10.]],
    ];
    PayoffMatrix::bimatrix(strategies, rows).expect("chicken is well formed")
}

#[rustfmt::skip]
pub fn battle_of_the_sexes() -> PayoffMatrix {
    let strategies = vec![
        Strategy::named(0, "Opera"),
        Strategy::named(1, "Football"),
    ];
    let rows = vec![
        vec![vec![2., 1.], vec![0., 0.]],
        vec![vec![0., 0.], vec![1., 2.]],
    ];
    PayoffMatrix::bimatrix(strategies, rows).expect("battle of the sexes is well formed")
}

#[rustfmt::skip]
pub fn coordination() -> PayoffMatrix {
    let strategies = vec![
        Strategy::named(0, "Alpha"),
        Strategy::named(1, "Beta"),
    ];
    let rows = vec![
        vec![vec![2., 2.], vec![0., 0.]],
        vec![vec![0., 0.], vec![1., 1.]],
    ];
    PayoffMatrix::bimatrix(strategies, rows).expect("coordination is well formed")
}

#[rustfmt::skip]
pub fn rock_paper_scissors() -> PayoffMatrix {
    const W: Utility = 1.;
    let strategies = vec![
        Strategy::named(0, "Rock"),
        Strategy::named(1, "Paper"),
        Strategy::named(2, "Scissors"),
    ];
    let rows = vec![
        vec![vec![0., 0.], vec![-W,  W], vec![ W, -W]],
        vec![vec![ W, -W], vec![0., 0.], vec![-W,  W]],
        vec![vec![-W,  W], vec![ W, -W], vec![0., 0.]],
    ];
    PayoffMatrix::bimatrix(strategies, rows).expect("rock paper scissors is well formed")
}

/// Fixture by name, for the command line.
pub fn by_name(name: &str) -> Option<PayoffMatrix> {
    match name {
        "pd" | "prisoners-dilemma" => Some(prisoners_dilemma()),
        "mp" | "matching-pennies" => Some(matching_pennies()),
        "stag" | "stag-hunt" => Some(stag_hunt()),
        "chicken" => Some(chicken()),
        "bos" | "battle-of-the-sexes" => Some(battle_of_the_sexes()),
        "coordination" => Some(coordination()),
        "rps" | "rock-paper-scissors" => Some(rock_paper_scissors()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures() {
        for name in ["pd", "mp", "stag", "chicken", "bos", "coordination", "rps"] {
            let game = by_name(name).unwrap();
            assert!(game.len() >= 2);
            assert_eq!(game.players(), 2);
        }
        assert!(by_name("poker").is_none());
    }

    #[test]
    fn temptation() {
        let game = prisoners_dilemma();
        // T > R > P > S ordering that makes a dilemma
        let t = game.payoff(&[1, 0], 0);
        let r = game.payoff(&[0, 0], 0);
        let p = game.payoff(&[1, 1], 0);
        let s = game.payoff(&[0, 1], 0);
        assert!(t > r && r > p && p > s);
    }
}
