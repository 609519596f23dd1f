use glam::Vec2;

/// Board area in pixels, used to turn pointer positions into grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Vec2,
}

/// A pointer position resolved against the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Vertical position in row heights from the top of the board.
    pub y_rows: f64,
    pub column: usize,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    /// Resolve `pos` (pixels, origin top-left). `None` outside the board.
    pub fn locate(&self, pos: Vec2, rows: usize, columns: usize) -> Option<GridPoint> {
        if rows == 0 || columns == 0 || self.size.x <= 0.0 || self.size.y <= 0.0 {
            return None;
        }
        if pos.x < 0.0 || pos.y < 0.0 || pos.x >= self.size.x || pos.y >= self.size.y {
            return None;
        }
        let cell = self.size / Vec2::new(columns as f32, rows as f32);
        let column = ((pos.x / cell.x) as usize).min(columns - 1);
        Some(GridPoint {
            y_rows: f64::from(pos.y) / f64::from(cell.y),
            column,
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(400.0, 600.0)
    }
}
