use serde::Serialize;

/// High-level phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Waiting for the player to tap the start tile.
    #[default]
    Idle,
    /// Scrolling; taps are scored.
    Running,
    /// A fault or miss happened; waiting for the host's effect to finish.
    Stopped,
    /// Run over until `reset`.
    Ended,
}

impl GameState {
    /// Numeric code used across the wasm boundary.
    pub fn code(self) -> u32 {
        match self {
            GameState::Idle => 0,
            GameState::Running => 1,
            GameState::Stopped => 2,
            GameState::Ended => 3,
        }
    }
}

/// How a tap was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Outside the grid, out of order, already tapped, or not accepting input.
    Ignored,
    /// The start tile was tapped; the run is now scrolling.
    Started,
    /// A colored tile was tapped in order (any cell in god mode).
    Hit,
    /// A white cell was tapped; the run stopped.
    Fault,
}
