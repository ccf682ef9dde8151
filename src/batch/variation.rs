use crate::error::*;
use crate::game::*;
use crate::simulation::*;
use serde::Deserialize;
use serde::Serialize;

/// One swept parameter: a dotted path into SimulationParams and the
/// candidate values to try there.
///
/// Paths address the serialized form, so "iterations",
/// "convergence.tolerance", and "policies.1" are all reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub path: String,
    pub values: Vec<serde_json::Value>,
}

impl Variation {
    pub fn new(path: &str, values: Vec<serde_json::Value>) -> Self {
        Self {
            path: path.to_string(),
            values,
        }
    }
}

/// A parameter sweep: base settings plus the variations crossed over
/// them. Every combination of variation values becomes one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub base: SimulationParams,
    pub variations: Vec<Variation>,
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            base: SimulationParams::default(),
            variations: Vec::new(),
            parallel: false,
        }
    }
}

impl BatchConfig {
    pub fn new(base: SimulationParams) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    pub fn vary(mut self, path: &str, values: Vec<serde_json::Value>) -> Self {
        self.variations.push(Variation::new(path, values));
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Size of the full cross product.
    pub fn total_runs(&self) -> usize {
        self.variations.iter().map(|v| v.values.len()).product()
    }

    /// Every combination of value indices, one digit per variation,
    /// in row-major order. A sweep with no variations is a single run
    /// of the base settings.
    pub fn combinations(&self) -> Vec<Vec<usize>> {
        Odometer::new(self.variations.iter().map(|v| v.values.len()).collect()).collect()
    }

    /// The (path, value) pairs a given combination selects.
    pub fn settings(&self, choice: &[usize]) -> Vec<(String, serde_json::Value)> {
        self.variations
            .iter()
            .zip(choice.iter())
            .map(|(v, i)| (v.path.clone(), v.values[*i].clone()))
            .collect()
    }

    /// Concrete parameters for one combination: the base settings with
    /// each variation's chosen value written over them.
    pub fn materialize(&self, choice: &[usize]) -> Result<SimulationParams, GameError> {
        let mut params = self.base.clone();
        for (variation, pick) in self.variations.iter().zip(choice.iter()) {
            let value = variation
                .values
                .get(*pick)
                .cloned()
                .ok_or_else(|| GameError::InvalidParameter {
                    path: variation.path.clone(),
                    reason: format!("no candidate value at index {}", pick),
                })?;
            let mut json =
                serde_json::to_value(&params).map_err(|e| GameError::InvalidParameter {
                    path: variation.path.clone(),
                    reason: e.to_string(),
                })?;
            place(&mut json, &variation.path, value)?;
            params = serde_json::from_value(json).map_err(|e| GameError::InvalidParameter {
                path: variation.path.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(params)
    }
}

/// Walk a dotted path through a JSON tree and overwrite the leaf.
/// Object segments are key lookups, array segments are indices.
fn place(
    root: &mut serde_json::Value,
    path: &str,
    value: serde_json::Value,
) -> Result<(), GameError> {
    let mut node = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let child = match node {
            serde_json::Value::Object(map) => map.get_mut(segment),
            serde_json::Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i)),
            _ => None,
        };
        match (child, segments.peek()) {
            (Some(next), Some(_)) => node = next,
            (Some(leaf), None) => {
                *leaf = value;
                return Ok(());
            }
            (None, _) => {
                return Err(GameError::UnknownParameter {
                    path: path.to_string(),
                });
            }
        }
    }
    Err(GameError::UnknownParameter {
        path: path.to_string(),
    })
}
