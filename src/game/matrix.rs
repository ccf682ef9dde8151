use super::*;
use crate::error::*;
use crate::*;

/// Immutable payoff tensor of a finite normal-form game.
///
/// Strategies are shared across all players. Cells are stored flat in
/// row-major order, player 0's strategy varying slowest, so the profile
/// `[i, j, ..]` lands at index `i * n^(p-1) + j * n^(p-2) + ..`. Each cell
/// holds exactly one utility per player. All invariants are enforced at
/// construction; every accessor afterwards is infallible.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffMatrix {
    players: usize,
    strategies: Vec<Strategy>,
    cells: Vec<Vec<Utility>>,
    symmetric: bool,
}

impl PayoffMatrix {
    /// Validate and build from a flat row-major payoff tensor.
    pub fn new(
        players: usize,
        strategies: Vec<Strategy>,
        cells: Vec<Vec<Utility>>,
    ) -> Result<Self, GameError> {
        let n = strategies.len();
        if n < 2 {
            return Err(GameError::InsufficientStrategies { found: n });
        }
        if players < 2 {
            return Err(GameError::InvalidParameter {
                path: "players".to_string(),
                reason: format!("need at least 2 players, got {}", players),
            });
        }
        let expected = n.pow(players as u32);
        if cells.len() != expected {
            return Err(GameError::EmptyPayoffMatrix {
                found: cells.len(),
                expected,
            });
        }
        for (i, cell) in cells.iter().enumerate() {
            if cell.len() != players {
                return Err(GameError::MalformedCell {
                    cell: i,
                    found: cell.len(),
                    expected: players,
                });
            }
        }
        let symmetric = Self::detect(players, n, &cells);
        Ok(Self {
            players,
            strategies,
            cells,
            symmetric,
        })
    }

    /// Validate and build a two-player game from a nested `[row][col]` grid.
    pub fn bimatrix(
        strategies: Vec<Strategy>,
        rows: Vec<Vec<Vec<Utility>>>,
    ) -> Result<Self, GameError> {
        let n = strategies.len();
        if n < 2 {
            return Err(GameError::InsufficientStrategies { found: n });
        }
        if rows.len() != n {
            return Err(GameError::EmptyPayoffMatrix {
                found: rows.len(),
                expected: n,
            });
        }
        for row in rows.iter() {
            if row.len() != n {
                return Err(GameError::EmptyPayoffMatrix {
                    found: row.len(),
                    expected: n,
                });
            }
        }
        let cells = rows.into_iter().flatten().collect::<Vec<_>>();
        Self::new(2, strategies, cells)
    }

    /// Reduce the game to a shared subset of strategy indices.
    ///
    /// Cell values are carried over unchanged; strategy ids keep naming
    /// their position in the original game.
    pub fn restrict(&self, keep: &[usize]) -> Result<Self, GameError> {
        if keep.len() < 2 {
            return Err(GameError::InsufficientStrategies { found: keep.len() });
        }
        let strategies = keep
            .iter()
            .map(|i| self.strategies[*i].clone())
            .collect::<Vec<_>>();
        let cells = Odometer::new(vec![keep.len(); self.players])
            .map(|reduced| {
                reduced
                    .iter()
                    .map(|digit| keep[*digit])
                    .collect::<Vec<_>>()
            })
            .map(|original| self.cell(&original).to_vec())
            .collect::<Vec<_>>();
        Self::new(self.players, strategies, cells)
    }

    pub fn players(&self) -> usize {
        self.players
    }
    /// Number of strategies available to each player.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }
    pub fn is_empty(&self) -> bool {
        false
    }
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }
    pub fn strategy(&self, index: usize) -> &Strategy {
        &self.strategies[index]
    }
    /// Payoffs mirror each other across the diagonal (two-player only).
    pub fn symmetric(&self) -> bool {
        self.symmetric
    }
    /// Every cell's payoffs cancel out.
    pub fn zero_sum(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.iter().sum::<Utility>().abs() < TOLERANCE)
    }

    /// Flat index of a strategy profile.
    pub fn index(&self, profile: &[usize]) -> usize {
        profile
            .iter()
            .fold(0, |index, digit| index * self.len() + digit)
    }
    /// Payoff vector at a profile, one utility per player.
    pub fn cell(&self, profile: &[usize]) -> &[Utility] {
        &self.cells[self.index(profile)]
    }
    /// Payoff to one player at a profile.
    pub fn payoff(&self, profile: &[usize], player: usize) -> Utility {
        self.cells[self.index(profile)][player]
    }
    /// Sum of all players' payoffs at a profile.
    pub fn welfare(&self, profile: &[usize]) -> Utility {
        self.cell(profile).iter().sum()
    }
    /// Every pure strategy profile, row-major.
    pub fn profiles(&self) -> Odometer {
        Odometer::new(vec![self.len(); self.players])
    }
    /// Width of the payoff range across all cells and players.
    pub fn spread(&self) -> Utility {
        let lo = self
            .cells
            .iter()
            .flatten()
            .fold(Utility::INFINITY, |a, b| a.min(*b));
        let hi = self
            .cells
            .iter()
            .flatten()
            .fold(Utility::NEG_INFINITY, |a, b| a.max(*b));
        hi - lo
    }

    /// Expected payoff per player under independent mixed strategies.
    pub fn expected(&self, mixture: &[Vec<Probability>]) -> Vec<Utility> {
        let mut values = vec![0.; self.players];
        for profile in self.profiles() {
            let weight = profile
                .iter()
                .enumerate()
                .map(|(seat, digit)| mixture[seat][*digit])
                .product::<Probability>();
            if weight == 0. {
                continue;
            }
            for (seat, value) in values.iter_mut().enumerate() {
                *value += weight * self.payoff(&profile, seat);
            }
        }
        values
    }

    /// Best pure reply for one seat against the others' mixtures.
    /// The seat's own mixture is ignored.
    pub fn respond(&self, seat: usize, mixture: &[Vec<Probability>]) -> (usize, Utility) {
        let mut best = (0, Utility::NEG_INFINITY);
        let mut probe = mixture.to_vec();
        for candidate in 0..self.len() {
            let mut pure = vec![0.; self.len()];
            pure[candidate] = 1.;
            probe[seat] = pure;
            let value = self.expected(&probe)[seat];
            if value > best.1 {
                best = (candidate, value);
            }
        }
        best
    }

    /// Human-readable profile label, e.g. `(Cooperate, Defect)`.
    pub fn label(&self, profile: &[usize]) -> String {
        let names = profile
            .iter()
            .map(|digit| self.strategies[*digit].name.as_str())
            .collect::<Vec<_>>();
        format!("({})", names.join(", "))
    }

    fn detect(players: usize, n: usize, cells: &[Vec<Utility>]) -> bool {
        players == 2
            && (0..n).all(|i| {
                (0..n).all(|j| {
                    let ab = &cells[i * n + j];
                    let ba = &cells[j * n + i];
                    (ab[0] - ba[1]).abs() < TOLERANCE && (ab[1] - ba[0]).abs() < TOLERANCE
                })
            })
    }
}

fn pretty(x: Utility) -> String {
    if (x - x.round()).abs() < 1e-9 {
        format!("{}", x.round() as i64)
    } else {
        format!("{:.2}", x)
    }
}

impl std::fmt::Display for PayoffMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const W: usize = 12;
        if self.players != 2 {
            for profile in self.profiles() {
                let payoffs = self
                    .cell(&profile)
                    .iter()
                    .map(|x| pretty(*x))
                    .collect::<Vec<_>>();
                writeln!(f, "{} → [{}]", self.label(&profile), payoffs.join(", "))?;
            }
            return Ok(());
        }
        let bar = "─".repeat(W);
        let top = std::iter::repeat_n(bar.as_str(), self.len() + 1).collect::<Vec<_>>();
        writeln!(f, "┌{}┐", top.join("┬"))?;
        write!(f, "│{:^W$}│", "")?;
        for strategy in self.strategies.iter() {
            write!(f, "{:^W$}│", strategy.short)?;
        }
        writeln!(f)?;
        writeln!(f, "├{}┤", top.join("┼"))?;
        for (i, strategy) in self.strategies.iter().enumerate() {
            write!(f, "│{:^W$}│", strategy.short)?;
            for j in 0..self.len() {
                let cell = self.cell(&[i, j]);
                let text = format!("{}, {}", pretty(cell[0]), pretty(cell[1]));
                write!(f, "{:^W$}│", text)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "└{}┘", top.join("┴"))?;
        Ok(())
    }
}

impl Arbitrary for PayoffMatrix {
    fn random() -> Self {
        use rand::Rng;
        let ref mut rng = rand::rng();
        let n = 3;
        let strategies = (0..n).map(Strategy::indexed).collect::<Vec<_>>();
        let cells = (0..n * n)
            .map(|_| {
                vec![
                    rng.random_range(-9..=9) as Utility,
                    rng.random_range(-9..=9) as Utility,
                ]
            })
            .collect::<Vec<_>>();
        Self::new(2, strategies, cells).expect("random matrix is well formed")
    }
}
