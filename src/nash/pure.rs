use super::*;
use crate::game::*;
use crate::*;

/// Exhaustive scan for pure Nash equilibria.
///
/// Every strategy profile is tested against every unilateral pure
/// deviation, for any number of players. Ties within [`TOLERANCE`]
/// keep a profile in equilibrium but mark it non-strict.
pub fn find_pure(game: &PayoffMatrix) -> Vec<NashEquilibrium> {
    game.profiles()
        .filter_map(|profile| classify(game, &profile))
        .collect()
}

fn classify(game: &PayoffMatrix, profile: &[usize]) -> Option<NashEquilibrium> {
    let mut strict = true;
    for seat in 0..game.players() {
        let current = game.payoff(profile, seat);
        for alt in (0..game.len()).filter(|a| *a != profile[seat]) {
            let mut deviated = profile.to_vec();
            deviated[seat] = alt;
            let diff = game.payoff(&deviated, seat) - current;
            if diff > TOLERANCE {
                return None;
            }
            if diff.abs() <= TOLERANCE {
                strict = false;
            }
        }
    }
    let equilibrium = NashEquilibrium {
        profile: Profile::Pure(profile.to_vec()),
        payoffs: game.cell(profile).to_vec(),
        stability: 0.,
        strict,
    };
    let stability = stability(game, &equilibrium.mixture(game.len()));
    Some(NashEquilibrium {
        stability,
        ..equilibrium
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dilemma() {
        let found = find_pure(&prisoners_dilemma());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].profile, Profile::Pure(vec![1, 1]));
        assert_eq!(found[0].payoffs, vec![1., 1.]);
        assert!(found[0].strict);
        assert!((found[0].stability - 0.2).abs() < TOLERANCE);
    }

    #[test]
    fn hunt() {
        let found = find_pure(&stag_hunt());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|eq| eq.strict));
        assert_eq!(found[0].profile, Profile::Pure(vec![0, 0]));
        assert_eq!(found[1].profile, Profile::Pure(vec![1, 1]));
    }

    #[test]
    fn pennies() {
        assert!(find_pure(&matching_pennies()).is_empty());
        assert!(find_pure(&rock_paper_scissors()).is_empty());
    }

    #[test]
    fn plateau() {
        // each seat's payoff depends only on the opponent: everything ties, nothing is strict
        let strategies = (0..2).map(Strategy::indexed).collect::<Vec<_>>();
        let rows = vec![
            vec![vec![1., 1.], vec![0., 1.]],
            vec![vec![1., 0.], vec![0., 0.]],
        ];
        let game = PayoffMatrix::bimatrix(strategies, rows).unwrap();
        let found = find_pure(&game);
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|eq| !eq.strict));
    }

    #[test]
    fn oracle() {
        // every returned profile survives a direct deviation scan, and
        // every omitted profile is refuted by one
        for _ in 0..20 {
            let game = PayoffMatrix::random();
            let found = find_pure(&game)
                .into_iter()
                .map(|eq| match eq.profile {
                    Profile::Pure(p) => p,
                    Profile::Mixed(_) => unreachable!(),
                })
                .collect::<Vec<_>>();
            for profile in game.profiles() {
                let refuted = (0..game.players()).any(|seat| {
                    (0..game.len()).any(|alt| {
                        let mut deviated = profile.clone();
                        deviated[seat] = alt;
                        game.payoff(&deviated, seat) > game.payoff(&profile, seat) + TOLERANCE
                    })
                });
                assert_eq!(found.contains(&profile), !refuted);
            }
        }
    }

    #[test]
    fn triadic() {
        // three-player coordination: all-same profiles are equilibria
        let strategies = (0..2).map(Strategy::indexed).collect::<Vec<_>>();
        let cells = Odometer::new(vec![2; 3])
            .map(|p| match p.iter().all(|d| *d == p[0]) {
                true => vec![1.; 3],
                false => vec![0.; 3],
            })
            .collect::<Vec<_>>();
        let game = PayoffMatrix::new(3, strategies, cells).unwrap();
        let found = find_pure(&game);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].profile, Profile::Pure(vec![0, 0, 0]));
        assert_eq!(found[1].profile, Profile::Pure(vec![1, 1, 1]));
        assert!(found.iter().all(|eq| eq.strict));
    }
}
