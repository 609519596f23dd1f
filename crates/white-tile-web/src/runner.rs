use glam::Vec2;
use white_tile::{
    CommandBuffer, GameConfig, GameCore, HighscoreSubmitter, Leaderboard, NameStore, Rng,
    TapOutcome, Viewport,
};

use crate::clock::PerformanceClock;

/// Owns the game core and the command buffer JavaScript reads each frame.
///
/// Commands pushed by input handlers between frames are kept until the frame
/// after JavaScript has seen them.
pub struct GameRunner {
    core: GameCore<PerformanceClock, Rng>,
    commands: CommandBuffer,
    /// Records already published by the previous `tick`.
    published: usize,
    viewport: Viewport,
}

impl GameRunner {
    pub fn new(
        config: GameConfig,
        seed: u64,
        names: Box<dyn NameStore>,
        highscores: Option<HighscoreSubmitter>,
    ) -> Self {
        let mut core = GameCore::new(config, PerformanceClock::new(), Rng::new(seed))
            .with_names(names);
        if let Some(highscores) = highscores {
            core = core.with_highscores(highscores);
        }
        Self {
            core,
            commands: CommandBuffer::with_capacity(256),
            published: 0,
            viewport: Viewport::default(),
        }
    }

    /// Paint the first board. Call once after construction.
    pub fn init(&mut self) {
        self.core.reset(&mut self.commands);
    }

    /// Run one frame.
    pub fn tick(&mut self) {
        self.commands.consume(self.published);
        self.core.refresh(&mut self.commands);
        self.published = self.commands.len();
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> TapOutcome {
        let viewport = self.viewport;
        self.core
            .pointer_down(Vec2::new(x, y), &viewport, &mut self.commands)
    }

    pub fn tap(&mut self, slot: usize, column: usize) -> TapOutcome {
        self.core.tap(slot, column, &mut self.commands)
    }

    pub fn effect_done(&mut self) {
        self.core.effect_finished(&mut self.commands);
    }

    pub fn restart(&mut self) {
        self.core.reset(&mut self.commands);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn set_name(&mut self, name: &str) {
        self.core.set_player_name(name, &mut self.commands);
    }

    pub fn saved_name(&self) -> Option<String> {
        self.core.player_name()
    }

    /// Leaderboard handle, usable after the runner is released.
    pub fn leaderboard(&self) -> Option<Leaderboard> {
        self.core.leaderboard()
    }

    pub fn score(&self) -> u32 {
        self.core.score()
    }

    pub fn state_code(&self) -> u32 {
        self.core.state().code()
    }

    pub fn commands_ptr(&self) -> *const f32 {
        self.commands.as_ptr()
    }

    pub fn commands_len(&self) -> u32 {
        self.commands.len() as u32
    }
}
