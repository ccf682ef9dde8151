use serde::Deserialize;
use serde::Serialize;

/// A named pure strategy, shared across all players of a game.
///
/// The `id` is stable across matrix reductions so that an eliminated
/// strategy in a reduced game still names its original position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: usize,
    pub name: String,
    pub short: String,
    pub description: String,
}

impl Strategy {
    pub fn new(id: usize, name: &str, short: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            short: short.to_string(),
            description: description.to_string(),
        }
    }

    /// Named strategy whose short label is its leading character.
    pub fn named(id: usize, name: &str) -> Self {
        let short = name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| id.to_string());
        Self {
            id,
            name: name.to_string(),
            short,
            description: String::new(),
        }
    }

    /// Placeholder strategy "S1", "S2", ... for games given as bare payoffs.
    pub fn indexed(id: usize) -> Self {
        Self {
            id,
            name: format!("S{}", id + 1),
            short: format!("S{}", id + 1),
            description: String::new(),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
