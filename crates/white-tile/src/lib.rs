pub mod api;
pub mod core;
pub mod systems;
pub mod bridge;
pub mod input;
pub mod extensions;
pub mod highscore;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, GameConfig};
pub use api::host::RenderHost;
pub use api::types::{GameState, TapOutcome};
pub use core::game::{GameCore, START_TILE};
pub use core::offset::{Completed, TimeOffset};
pub use core::rng::{FixedColumns, RandomSource, Rng};
pub use core::sequence::{ActiveColumn, Tile, TileSequence};
pub use core::speedup::Speedup;
pub use core::time::{Clock, ManualClock};
pub use systems::rows::{RowSlot, RowWindow};
pub use input::pointer::{GridPoint, Viewport};
pub use bridge::protocol::{CommandBuffer, CommandRecord, HostCommand, PROTOCOL_VERSION};
pub use highscore::{
    HighscoreEntry, HighscoreSubmitter, Leaderboard, MemoryNameStore, MemoryScoreStore,
    NameStore, ScoreStore, StoreError, SubmitOutcome,
};

pub use extensions::{Easing, lerp, ease};
