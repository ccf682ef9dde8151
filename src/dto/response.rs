use crate::batch::*;
use crate::dominance::*;
use crate::game::*;
use crate::nash::*;
use crate::simulation::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEquilibrium {
    pub kind: String,
    /// Strategy index per seat, for pure equilibria only.
    pub pure: Option<Vec<usize>>,
    /// Weight vector per seat, for mixed equilibria only.
    pub mixed: Option<Vec<Vec<Probability>>>,
    pub payoffs: Vec<Utility>,
    pub stability: Utility,
    pub strict: bool,
}

impl From<&NashEquilibrium> for ApiEquilibrium {
    fn from(equilibrium: &NashEquilibrium) -> Self {
        let (kind, pure, mixed) = match &equilibrium.profile {
            Profile::Pure(strategies) => ("pure", Some(strategies.clone()), None),
            Profile::Mixed(weights) => ("mixed", None, Some(weights.clone())),
        };
        Self {
            kind: kind.to_string(),
            pure,
            mixed,
            payoffs: equilibrium.payoffs.clone(),
            stability: equilibrium.stability,
            strict: equilibrium.strict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiValidation {
    pub valid: bool,
    pub stability: Utility,
    pub margin: Utility,
    pub robustness: Probability,
    pub social_welfare: Utility,
    pub efficiency: Utility,
    pub fairness: Utility,
    pub complexity: Probability,
    pub risk: String,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl From<&EquilibriumValidation> for ApiValidation {
    fn from(validation: &EquilibriumValidation) -> Self {
        Self {
            valid: validation.valid,
            stability: validation.stability.score,
            margin: validation.stability.margin,
            robustness: validation.stability.robustness,
            social_welfare: validation.quality.social_welfare,
            efficiency: validation.quality.efficiency,
            fairness: validation.quality.fairness,
            complexity: validation.quality.complexity,
            risk: match validation.quality.risk {
                RiskProfile::Low => "low",
                RiskProfile::Medium => "medium",
                RiskProfile::High => "high",
            }
            .to_string(),
            errors: validation.errors.clone(),
            warnings: validation.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRecommendation {
    pub equilibrium: ApiEquilibrium,
    pub validation: ApiValidation,
    pub score: Utility,
    pub rationale: String,
}

impl From<&Recommendation> for ApiRecommendation {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            equilibrium: ApiEquilibrium::from(&recommendation.equilibrium),
            validation: ApiValidation::from(&recommendation.validation),
            score: recommendation.score,
            rationale: recommendation.rationale.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDominance {
    pub rounds: usize,
    pub strictly_dominant: Vec<String>,
    pub strictly_dominated: Vec<String>,
    pub weakly_dominant: Vec<String>,
    pub weakly_dominated: Vec<String>,
    /// Strategy indices surviving iterated elimination, per seat.
    pub survivors: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSimulation {
    pub status: String,
    pub requested: usize,
    pub iterations: usize,
    pub seed: u64,
    pub elapsed_ms: u64,
    /// Profile counts keyed "i:j:..", one strategy index per seat.
    pub outcomes: BTreeMap<String, u64>,
    pub frequencies: Vec<Vec<u64>>,
    pub empirical: Vec<Vec<Probability>>,
    pub expected_payoffs: Vec<Utility>,
    pub converged_at: Option<usize>,
    pub equilibrium: Option<ApiEquilibrium>,
    /// Largest gap between empirical play and the attached equilibrium.
    pub alignment: Option<Utility>,
}

impl From<&SimulationResult> for ApiSimulation {
    fn from(result: &SimulationResult) -> Self {
        Self {
            status: result.status.to_string(),
            requested: result.requested,
            iterations: result.iterations,
            seed: result.seed,
            elapsed_ms: result.elapsed.as_millis() as u64,
            outcomes: result
                .outcomes
                .iter()
                .map(|(profile, count)| {
                    (
                        profile
                            .iter()
                            .map(|s| s.to_string())
                            .collect::<Vec<String>>()
                            .join(":"),
                        *count,
                    )
                })
                .collect(),
            frequencies: result.frequencies.clone(),
            empirical: result.empirical(),
            expected_payoffs: result.expected_payoffs.clone(),
            converged_at: result.converged_at,
            equilibrium: result.equilibrium.as_ref().map(ApiEquilibrium::from),
            alignment: result.alignment(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiBatchRun {
    pub index: usize,
    pub settings: BTreeMap<String, serde_json::Value>,
    pub confidence: Option<Probability>,
    pub error: Option<String>,
    pub result: Option<ApiSimulation>,
}

impl From<&BatchRun> for ApiBatchRun {
    fn from(run: &BatchRun) -> Self {
        Self {
            index: run.index,
            settings: run.settings.iter().cloned().collect(),
            confidence: run.confidence,
            error: run.outcome.as_ref().err().map(|e| e.to_string()),
            result: run.outcome.as_ref().ok().map(ApiSimulation::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiBatch {
    pub total: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
    pub best: Option<usize>,
    pub worst: Option<usize>,
    pub runs: Vec<ApiBatchRun>,
    /// Mean confidence per candidate value of each swept path.
    pub effects: Vec<(String, Vec<(serde_json::Value, Probability)>)>,
}

impl From<&BatchResult> for ApiBatch {
    fn from(result: &BatchResult) -> Self {
        Self {
            total: result.runs.len(),
            completed: result.completed,
            cancelled: result.cancelled,
            failed: result.failed,
            elapsed_ms: result.elapsed.as_millis() as u64,
            best: result.best,
            worst: result.worst,
            runs: result.runs.iter().map(ApiBatchRun::from).collect(),
            effects: result
                .effects
                .iter()
                .map(|e| (e.path.clone(), e.response.clone()))
                .collect(),
        }
    }
}

impl From<&DominanceReport> for ApiDominance {
    fn from(report: &DominanceReport) -> Self {
        Self {
            rounds: report.rounds.len(),
            strictly_dominant: Self::tag(&report.strictly_dominant),
            weakly_dominant: Self::tag(&report.weakly_dominant),
            strictly_dominated: report
                .strictly_dominated
                .iter()
                .map(|d| format!("P{}:{}", d.player + 1, d.strategy))
                .collect(),
            weakly_dominated: report
                .weakly_dominated
                .iter()
                .map(|d| format!("P{}:{}", d.player + 1, d.strategy))
                .collect(),
            survivors: report.survivors.clone(),
        }
    }
}

impl ApiDominance {
    fn tag(findings: &[Dominance]) -> Vec<String> {
        findings
            .iter()
            .map(|d| format!("P{}:{}", d.player + 1, d.strategy))
            .collect()
    }
}
