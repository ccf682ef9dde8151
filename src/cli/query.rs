use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub enum Query {
    #[command(about = "Show the payoff matrix of the loaded game", alias = "mat")]
    Matrix,
    #[command(
        about = "Load a classic game by name or a JSON game file by path",
        alias = "ld"
    )]
    Load {
        #[arg(required = true)]
        source: String,
    },
    #[command(
        about = "Dominance structure and iterated elimination",
        alias = "dom"
    )]
    Dominance,
    #[command(about = "All pure and mixed Nash equilibria", alias = "eq")]
    Equilibria,
    #[command(
        about = "Equilibria validated and ranked by stability and efficiency",
        alias = "rec"
    )]
    Recommend,
    #[command(
        about = "Monte Carlo run under uniform mixed policies",
        alias = "sim"
    )]
    Simulate {
        iterations: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    #[command(
        about = "Sweep seeds in parallel and rank runs by equilibrium confidence",
        alias = "swp"
    )]
    Sweep {
        #[arg(long, default_value_t = 4)]
        runs: usize,
        #[arg(long, default_value_t = 2_000)]
        iterations: usize,
    },
}
