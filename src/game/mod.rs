//! Immutable model of a finite normal-form game.
//!
//! A game is a payoff tensor over a shared strategy set, validated once
//! at construction. Everything downstream (dominance, equilibria,
//! simulation) borrows the matrix and never mutates it. Player behavior
//! lives in [`PlayerPolicy`], a closed set of decision rules resolved
//! through a single sampling operation.

mod classic;
mod matrix;
mod odometer;
mod player;
mod strategy;

pub use classic::*;
pub use matrix::*;
pub use odometer::*;
pub use player::*;
pub use strategy::*;
