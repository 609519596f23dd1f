pub mod game;
pub mod offset;
pub mod rng;
pub mod sequence;
pub mod speedup;
pub mod time;
