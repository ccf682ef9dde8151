use super::*;
use crate::game::*;

/// Every equilibrium the solvers can reach: all pure equilibria, plus
/// the first mixed equilibrium of a two-player game when one exists.
///
/// Degenerate games may hold equilibria beyond these; exhausting them
/// is out of scope, and callers get whatever the scan found, possibly
/// nothing.
pub fn find_all(game: &PayoffMatrix) -> Vec<NashEquilibrium> {
    let mut found = find_pure(game);
    if let Some(mixed) = find_mixed(game) {
        // a mixture whose support collapsed to singletons is one of the
        // pure profiles already listed
        if mixed.support().iter().any(|s| s.len() > 1) {
            found.push(mixed);
        }
    }
    log::debug!("found {} equilibria", found.len());
    found
}

/// [`find_all`] with a fresh validation verdict attached to each result.
pub fn find_validated(
    game: &PayoffMatrix,
) -> Vec<(NashEquilibrium, EquilibriumValidation)> {
    find_all(game)
        .into_iter()
        .map(|eq| {
            let verdict = validate(game, &eq);
            (eq, verdict)
        })
        .collect()
}
