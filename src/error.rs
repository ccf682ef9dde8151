use std::fmt;

/// Structural and configuration failures.
///
/// Structural variants surface at construction time and make the whole
/// analysis unusable. Configuration variants are scoped to a single
/// simulation run and leave sibling runs in a batch untouched. Degenerate
/// games (no solvable equilibrium) are deliberately *not* an error; solvers
/// report them as an empty or `None` result.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// A game needs at least two strategies per player.
    InsufficientStrategies { found: usize },
    /// The payoff tensor is empty or does not match the strategy space.
    EmptyPayoffMatrix { found: usize, expected: usize },
    /// A payoff cell does not carry one utility per player.
    MalformedCell { cell: usize, found: usize, expected: usize },
    /// A player's policy cannot produce draws for this game.
    InvalidPolicy { player: usize, reason: String },
    /// A run was requested with zero iterations.
    ZeroIterations,
    /// A batch variation addresses a parameter that does not exist.
    UnknownParameter { path: String },
    /// A batch variation carries a value the parameter cannot take.
    InvalidParameter { path: String, reason: String },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameError::InsufficientStrategies { found } => {
                write!(f, "Insufficient strategies: need at least 2, found {}", found)
            }
            GameError::EmptyPayoffMatrix { found, expected } => {
                write!(f, "Empty payoff matrix: expected {} cells, found {}", expected, found)
            }
            GameError::MalformedCell { cell, found, expected } => {
                write!(f, "Malformed cell {}: expected {} payoffs, found {}", cell, expected, found)
            }
            GameError::InvalidPolicy { player, reason } => {
                write!(f, "Invalid policy for player {}: {}", player, reason)
            }
            GameError::ZeroIterations => {
                write!(f, "Zero iterations: a run must simulate at least one profile")
            }
            GameError::UnknownParameter { path } => {
                write!(f, "Unknown parameter: no such path '{}'", path)
            }
            GameError::InvalidParameter { path, reason } => {
                write!(f, "Invalid parameter at '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for GameError {}
