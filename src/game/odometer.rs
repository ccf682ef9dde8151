/// Mixed-radix counter over per-digit cardinalities.
///
/// Yields every assignment in row-major order, last digit varying fastest,
/// so the k-th yielded vector maps to flat index k under the usual
/// stride layout. Degenerate inputs are well-defined: an empty radix list
/// yields exactly one empty assignment, and any zero radix yields nothing.
#[derive(Debug, Clone)]
pub struct Odometer {
    radices: Vec<usize>,
    state: Vec<usize>,
    done: bool,
}

impl Odometer {
    pub fn new(radices: Vec<usize>) -> Self {
        let done = radices.iter().any(|r| *r == 0);
        let state = vec![0; radices.len()];
        Self { radices, state, done }
    }

    /// Number of assignments this counter will yield.
    pub fn size(&self) -> usize {
        match self.done {
            true => 0,
            false => self.radices.iter().product(),
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.state.clone();
        for digit in (0..self.state.len()).rev() {
            self.state[digit] += 1;
            if self.state[digit] < self.radices[digit] {
                return Some(current);
            }
            self.state[digit] = 0;
        }
        self.done = true;
        Some(current)
    }
}
