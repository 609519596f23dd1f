pub mod identity;
pub mod store;
pub mod submitter;

pub use identity::{MemoryNameStore, NameStore};
pub use store::{HighscoreEntry, MemoryScoreStore, ScoreStore, StoreError};
pub use submitter::{HighscoreSubmitter, Leaderboard, SubmitOutcome};
