use super::query::Query;
use crate::batch::*;
use crate::dominance::*;
use crate::dto::*;
use crate::game::*;
use crate::nash::*;
use crate::simulation::*;
use clap::Parser;
use colored::Colorize;
use std::io::Write;

/// Interactive shell over one loaded game at a time.
pub struct CLI(PayoffMatrix);

impl CLI {
    /// Start on the game named or pathed by the first CLI argument,
    /// falling back to the prisoner's dilemma.
    pub fn new() -> Self {
        match std::env::args().nth(1) {
            Some(source) => match Self::fetch(&source) {
                Ok(game) => Self(game),
                Err(e) => {
                    log::warn!("could not load {}: {}", source, e);
                    Self(prisoners_dilemma())
                }
            },
            None => Self(prisoners_dilemma()),
        }
    }

    pub fn run(&mut self) {
        log::info!("launching analysis shell");
        println!(
            "{}",
            "commands: matrix · load · dominance · equilibria · recommend · simulate · sweep · quit"
                .dimmed()
        );
        loop {
            print!("> ");
            let ref mut input = String::new();
            std::io::stdout().flush().unwrap();
            std::io::stdin().read_line(input).unwrap();
            match input.trim() {
                "quit" => break,
                "exit" => break,
                _ => match self.handle(input) {
                    Err(e) => eprintln!("{} {}", "handle error:".red(), e),
                    Ok(_) => continue,
                },
            }
        }
    }

    fn handle(&mut self, input: &str) -> anyhow::Result<()> {
        match Query::try_parse_from(std::iter::once("> ").chain(input.split_whitespace()))? {
            Query::Matrix => Ok(println!("{}", self.0)),
            Query::Load { source } => {
                self.0 = Self::fetch(&source)?;
                Ok(println!("{} {}", "loaded".green(), source))
            }
            Query::Dominance => Ok(println!("{}", analyze(&self.0))),
            Query::Equilibria => Ok(println!(
                "{}",
                match find_all(&self.0) {
                    found if found.is_empty() =>
                        "no equilibria found within tolerance".yellow().to_string(),
                    found => found
                        .iter()
                        .enumerate()
                        .map(|(i, eq)| format!(
                            "{:>2}. {:<24} {}",
                            i + 1,
                            eq.label(&self.0).bold(),
                            eq
                        ))
                        .collect::<Vec<String>>()
                        .join("\n"),
                }
            )),
            Query::Recommend => Ok(println!(
                "{}",
                recommend(&self.0)
                    .iter()
                    .enumerate()
                    .map(|(i, r)| format!("{:>2}. {}", i + 1, r))
                    .collect::<Vec<String>>()
                    .join("\n")
            )),
            Query::Simulate { iterations, seed } => {
                let params = SimulationParams {
                    iterations: iterations.unwrap_or(crate::DEFAULT_ITERATIONS),
                    seed,
                    analysis: true,
                    ..SimulationParams::uniform(&self.0)
                };
                let result = SimulationEngine::new(self.0.clone(), params).run()?;
                println!("{}", result);
                if let Some(gap) = result.alignment() {
                    println!("equilibrium alignment gap {:.3}", gap);
                }
                Ok(())
            }
            Query::Sweep { runs, iterations } => {
                let config = BatchConfig::new(SimulationParams {
                    iterations,
                    ..SimulationParams::uniform(&self.0)
                })
                .vary(
                    "seed",
                    (1..=runs as u64).map(|s| serde_json::json!(s)).collect(),
                )
                .parallel(true);
                Ok(println!("{}", BatchRunner::new(self.0.clone(), config).run()))
            }
        }
    }

    /// A classic fixture by name, or a JSON game file by path.
    fn fetch(source: &str) -> anyhow::Result<PayoffMatrix> {
        match by_name(source) {
            Some(game) => Ok(game),
            None => {
                let text = std::fs::read_to_string(source)?;
                let api = serde_json::from_str::<ApiGame>(&text)?;
                Ok(PayoffMatrix::try_from(api)?)
            }
        }
    }
}
