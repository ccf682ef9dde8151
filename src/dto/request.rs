use crate::batch::*;
use crate::error::*;
use crate::game::*;
use crate::simulation::*;
use serde::Deserialize;
use serde::Serialize;

/// Wire form of a game: strategy names plus a flat payoff tensor in
/// row-major profile order, one utility per player in every cell.
/// Construction invariants are enforced on conversion, so a malformed
/// request surfaces the same error a malformed matrix would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiGame {
    pub players: usize,
    pub strategies: Vec<String>,
    pub payoffs: Vec<Vec<f64>>,
}

impl TryFrom<ApiGame> for PayoffMatrix {
    type Error = GameError;
    fn try_from(api: ApiGame) -> Result<Self, Self::Error> {
        PayoffMatrix::new(
            api.players,
            api.strategies
                .iter()
                .enumerate()
                .map(|(id, name)| Strategy::named(id, name))
                .collect(),
            api.payoffs,
        )
    }
}

impl From<&PayoffMatrix> for ApiGame {
    fn from(game: &PayoffMatrix) -> Self {
        Self {
            players: game.players(),
            strategies: game.strategies().iter().map(|s| s.name.clone()).collect(),
            payoffs: game.profiles().map(|p| game.cell(&p).to_vec()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeGame {
    pub game: ApiGame,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSimulation {
    pub game: ApiGame,
    #[serde(default)]
    pub params: SimulationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunBatch {
    pub game: ApiGame,
    #[serde(default)]
    pub batch: BatchConfig,
}
