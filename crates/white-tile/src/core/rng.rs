//! Column sources for tile generation.

/// Supplies the active column for each newly generated tile.
pub trait RandomSource {
    /// Return a column in `[0, columns)`. `columns` is at least 1.
    fn next_column(&mut self, columns: usize) -> usize;
}

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic and fast; the browser bridge seeds it from the clock.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, upper_bound).
    pub fn next_int(&mut self, upper_bound: u64) -> u64 {
        self.next_u64() % upper_bound
    }
}

impl RandomSource for Rng {
    fn next_column(&mut self, columns: usize) -> usize {
        self.next_int(columns as u64) as usize
    }
}

/// Replays a fixed list of columns, cycling when exhausted.
/// Used for scripted runs and reproducible tests.
#[derive(Debug, Clone)]
pub struct FixedColumns {
    columns: Vec<usize>,
    cursor: usize,
}

impl FixedColumns {
    pub fn new(columns: impl Into<Vec<usize>>) -> Self {
        let columns = columns.into();
        assert!(!columns.is_empty(), "FixedColumns needs at least one column");
        Self { columns, cursor: 0 }
    }
}

impl RandomSource for FixedColumns {
    fn next_column(&mut self, columns: usize) -> usize {
        let column = self.columns[self.cursor % self.columns.len()];
        self.cursor += 1;
        column % columns
    }
}
