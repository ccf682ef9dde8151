use super::*;
use crate::game::*;
use crate::*;

/// An equilibrium with its verdict, composite score, and the reasoning
/// a caller can surface verbatim.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub equilibrium: NashEquilibrium,
    pub validation: EquilibriumValidation,
    /// stability × efficiency, in [0, 1].
    pub score: Utility,
    pub rationale: String,
}

/// Rank every equilibrium by how defensible it is to actually play.
///
/// Score is stability × efficiency, descending; ties go to the simpler
/// equilibrium (smaller support). The sort is stable, so equal
/// candidates keep solver discovery order.
pub fn recommend(game: &PayoffMatrix) -> Vec<Recommendation> {
    let mut recommendations = find_validated(game)
        .into_iter()
        .map(|(equilibrium, validation)| {
            let score = equilibrium.stability * validation.quality.efficiency;
            let rationale = rationale(game, &equilibrium, &validation);
            Recommendation {
                equilibrium,
                validation,
                score,
                rationale,
            }
        })
        .collect::<Vec<_>>();
    recommendations.sort_by(|x, y| {
        y.score
            .partial_cmp(&x.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                x.validation
                    .quality
                    .complexity
                    .partial_cmp(&y.validation.quality.complexity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
    recommendations
}

fn rationale(
    game: &PayoffMatrix,
    equilibrium: &NashEquilibrium,
    validation: &EquilibriumValidation,
) -> String {
    let anchor = match (equilibrium.is_pure(), equilibrium.strict) {
        (true, true) => "strict: every deviation strictly loses",
        (true, false) => "weak: some deviations merely tie",
        (false, _) => "players must randomize exactly to keep each other indifferent",
    };
    format!(
        "{} · {} · stability {:.2}, efficiency {:.2}, fairness {:.2}",
        equilibrium.label(game),
        anchor,
        equilibrium.stability,
        validation.quality.efficiency,
        validation.quality.fairness,
    )
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3}] {}", self.score, self.rationale)
    }
}
