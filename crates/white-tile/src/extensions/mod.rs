// extensions/mod.rs
//
// Optional building blocks that the core systems compose.
// Kept free of game state so they can be tested in isolation.

pub mod easing;

pub use easing::{Easing, lerp, ease};
