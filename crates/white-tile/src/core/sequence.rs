//! Append-only, lazily generated stream of tiles.
//!
//! Tile `i` is the row that sits at the bottom of the screen when the offset
//! floor equals `i`. Index 0 is the neutral start row; every later tile has one
//! active column drawn from the injected [`RandomSource`].

use super::rng::RandomSource;

/// Which column of a row must be tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveColumn {
    /// The all-safe row shown below the first colored tile.
    Start,
    Column(usize),
}

impl ActiveColumn {
    /// The active column, if this is a regular row.
    pub fn column(self) -> Option<usize> {
        match self {
            ActiveColumn::Start => None,
            ActiveColumn::Column(c) => Some(c),
        }
    }
}

/// One row of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    active: ActiveColumn,
    tapped: Option<usize>,
}

impl Tile {
    fn new(active: ActiveColumn) -> Self {
        Self { active, tapped: None }
    }

    pub fn active(&self) -> ActiveColumn {
        self.active
    }

    pub fn is_start(&self) -> bool {
        self.active == ActiveColumn::Start
    }

    /// True when `column` is this row's colored tile.
    pub fn accepts(&self, column: usize) -> bool {
        self.active == ActiveColumn::Column(column)
    }

    pub fn tapped(&self) -> Option<usize> {
        self.tapped
    }

    pub fn is_tapped(&self) -> bool {
        self.tapped.is_some()
    }

    /// Record a tap. Write-once: returns false and keeps the first tap if the
    /// tile was already tapped.
    pub fn tap(&mut self, column: usize) -> bool {
        if self.tapped.is_some() {
            return false;
        }
        self.tapped = Some(column);
        true
    }
}

/// Infinite tile sequence, materialized up to the highest index queried.
#[derive(Debug, Clone)]
pub struct TileSequence<R> {
    tiles: Vec<Tile>,
    columns: usize,
    rng: R,
}

impl<R: RandomSource> TileSequence<R> {
    pub fn new(columns: usize, rng: R) -> Self {
        assert!(columns >= 1, "a tile sequence needs at least one column");
        Self {
            tiles: vec![Tile::new(ActiveColumn::Start)],
            columns,
            rng,
        }
    }

    /// Tile at `index`, generating every missing tile up to it first.
    pub fn get(&mut self, index: usize) -> &Tile {
        self.extend_to(index);
        &self.tiles[index]
    }

    /// Mutable tile at `index`. Only `tapped` can change through the handle.
    pub fn get_mut(&mut self, index: usize) -> &mut Tile {
        self.extend_to(index);
        &mut self.tiles[index]
    }

    /// Already generated tile, without extending the sequence.
    pub fn peek(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Number of tiles generated so far.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Never true: the start row always exists.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Discard every tile and reseed the start row. The random source keeps
    /// its state, so the next run draws fresh columns.
    pub fn reset(&mut self) {
        self.tiles.clear();
        self.tiles.push(Tile::new(ActiveColumn::Start));
    }

    fn extend_to(&mut self, index: usize) {
        while self.tiles.len() <= index {
            let column = self.rng.next_column(self.columns);
            debug_assert!(column < self.columns);
            self.tiles.push(Tile::new(ActiveColumn::Column(column)));
        }
    }
}
