//! Interactive analysis shell over a loaded game.

mod query;
mod shell;

pub use query::*;
pub use shell::*;
