//! Interactive Analysis Binary
//!
//! Launches the analysis shell, optionally preloading a game given as
//! a classic fixture name or a JSON file path.

use equilibria::*;

fn main() {
    log();
    cli::CLI::new().run();
}
