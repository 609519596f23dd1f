//! The game state machine.
//!
//! `GameCore` owns the tile stream, the scroll offset and the row window. The
//! host drives it: taps arrive through [`GameCore::tap`] or
//! [`GameCore::pointer_down`] as they happen, [`GameCore::refresh`] runs once
//! per frame, and [`GameCore::effect_finished`] reports that a fault or miss
//! animation is over.

use glam::Vec2;
use log::{debug, info, trace};

use crate::api::config::GameConfig;
use crate::api::host::RenderHost;
use crate::api::types::{GameState, TapOutcome};
use crate::extensions::easing::Easing;
use crate::highscore::{HighscoreSubmitter, Leaderboard, MemoryNameStore, NameStore};
use crate::input::pointer::Viewport;
use crate::systems::rows::RowWindow;

use super::offset::TimeOffset;
use super::rng::RandomSource;
use super::sequence::TileSequence;
use super::speedup::Speedup;
use super::time::Clock;

/// Index of the first colored tile; tapping it starts a run.
pub const START_TILE: usize = 1;

/// Completion token of a scroll segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SegmentDone;

/// Effect the host is playing while the run is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Fault,
    Miss,
}

pub struct GameCore<C, R> {
    config: GameConfig,
    clock: C,
    tiles: TileSequence<R>,
    offset: TimeOffset<SegmentDone>,
    rows: RowWindow,
    speedup: Speedup,
    state: GameState,
    score: u32,
    pending_effect: Option<Effect>,
    start_label: Option<(usize, usize)>,
    names: Box<dyn NameStore>,
    highscores: Option<HighscoreSubmitter>,
    shown_highscore: Option<u32>,
}

impl<C: Clock, R: RandomSource> GameCore<C, R> {
    /// Create a game in `Idle`. Call [`GameCore::reset`] before the first
    /// frame to paint the board.
    pub fn new(config: GameConfig, clock: C, rng: R) -> Self {
        let tiles = TileSequence::new(config.columns, rng);
        let rows = RowWindow::new(config.rows);
        let speedup = speedup_for(&config);
        Self {
            config,
            clock,
            tiles,
            offset: TimeOffset::new(0.0),
            rows,
            speedup,
            state: GameState::Idle,
            score: 0,
            pending_effect: None,
            start_label: None,
            names: Box::new(MemoryNameStore::new()),
            highscores: None,
            shown_highscore: None,
        }
    }

    pub fn with_highscores(mut self, highscores: HighscoreSubmitter) -> Self {
        self.highscores = Some(highscores);
        self
    }

    /// Where the player name is remembered. Defaults to memory only.
    pub fn with_names(mut self, names: Box<dyn NameStore>) -> Self {
        self.names = names;
        self
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Offset computed by the most recent frame or tap.
    pub fn offset(&self) -> f64 {
        self.offset.last().max(0.0)
    }

    pub fn tiles(&self) -> &TileSequence<R> {
        &self.tiles
    }

    pub fn rows(&self) -> &RowWindow {
        &self.rows
    }

    pub fn speedup(&self) -> &Speedup {
        &self.speedup
    }

    pub fn highscores(&self) -> Option<&HighscoreSubmitter> {
        self.highscores.as_ref()
    }

    /// Live leaderboard of `leaderboard_size` entries, if a backend is set.
    pub fn leaderboard(&self) -> Option<Leaderboard> {
        let size = self.config.leaderboard_size;
        self.highscores.as_ref().map(|h| h.leaderboard(size))
    }

    /// Saved player name, if it is not blank.
    pub fn player_name(&self) -> Option<String> {
        self.names
            .saved_name()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Start over: fresh tiles, offset 0, score 0, clean board, `Idle`.
    pub fn reset<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        self.offset.reset(0.0);
        self.speedup = speedup_for(&self.config);
        self.state = GameState::Idle;
        self.score = 0;
        self.pending_effect = None;

        self.tiles.reset();
        for index in 0..self.config.pregenerated_tiles.max(START_TILE + 1) {
            self.tiles.get(index);
        }

        self.rows.reset(host);
        host.clear_marks();
        host.hide_end_screen();

        if let Some(highscores) = &mut self.highscores {
            highscores.begin_run();
        }
        self.shown_highscore = None;
        host.set_stored_highscore(None);

        self.hide_start_label(host);
        let slot = self.rows.slot_for_tile(START_TILE);
        if let Some(column) = self.tiles.get(START_TILE).active().column() {
            host.set_start_label(slot, column, true);
            self.start_label = Some((slot, column));
        }

        host.set_score_text(0);
        self.refresh(host);
        info!("new run ready");
    }

    /// Tap the cell at `column` of row slot `slot`.
    pub fn tap<H: RenderHost + ?Sized>(
        &mut self,
        slot: usize,
        column: usize,
        host: &mut H,
    ) -> TapOutcome {
        if slot >= self.rows.slot_count() || column >= self.config.columns {
            trace!("tap outside the grid: slot {} column {}", slot, column);
            return TapOutcome::Ignored;
        }
        let now = self.clock.now_ms();
        let offset = self.offset.get(now).max(0.0);
        self.resolve_tap(slot, column, offset, now, host)
    }

    /// Tap at a pixel position inside `viewport`.
    pub fn pointer_down<H: RenderHost + ?Sized>(
        &mut self,
        pos: Vec2,
        viewport: &Viewport,
        host: &mut H,
    ) -> TapOutcome {
        let Some(point) = viewport.locate(pos, self.config.rows, self.config.columns) else {
            trace!("pointer outside the board: {:?}", pos);
            return TapOutcome::Ignored;
        };
        let now = self.clock.now_ms();
        let offset = self.offset.get(now).max(0.0);
        let Some(slot) = self.rows.slot_at(offset, point.y_rows) else {
            return TapOutcome::Ignored;
        };
        self.resolve_tap(slot, point.column, offset, now, host)
    }

    fn resolve_tap<H: RenderHost + ?Sized>(
        &mut self,
        slot: usize,
        column: usize,
        offset: f64,
        now: f64,
        host: &mut H,
    ) -> TapOutcome {
        let index = self.rows.tile_index_for_slot(slot, offset.floor() as usize);
        match self.state {
            GameState::Idle => self.tap_idle(index, column, offset, now, host),
            GameState::Running => self.tap_running(slot, index, column, offset, now, host),
            GameState::Stopped | GameState::Ended => {
                trace!("tap ignored while {:?}", self.state);
                TapOutcome::Ignored
            }
        }
    }

    fn tap_idle<H: RenderHost + ?Sized>(
        &mut self,
        index: usize,
        column: usize,
        offset: f64,
        now: f64,
        host: &mut H,
    ) -> TapOutcome {
        if index != START_TILE || !self.tiles.get(START_TILE).accepts(column) {
            trace!("waiting for the start tile, got tile {} column {}", index, column);
            return TapOutcome::Ignored;
        }
        self.tiles.get_mut(START_TILE).tap(column);
        self.hide_start_label(host);
        self.score = 1;
        host.set_score_text(self.score);

        self.state = GameState::Running;
        self.offset.set(
            now,
            self.speedup.target(),
            self.speedup.duration_ms(),
            self.config.scroll_easing,
            Some(SegmentDone),
        );
        self.rows.refresh(offset, &mut self.tiles, host);
        info!("run started");
        TapOutcome::Started
    }

    fn tap_running<H: RenderHost + ?Sized>(
        &mut self,
        slot: usize,
        index: usize,
        column: usize,
        offset: f64,
        now: f64,
        host: &mut H,
    ) -> TapOutcome {
        let god_mode = self.config.god_mode;
        let tile = *self.tiles.get(index);
        if tile.is_tapped() {
            trace!("tile {} already tapped", index);
            return TapOutcome::Ignored;
        }
        if !god_mode && !tile.accepts(column) {
            self.stop(Effect::Fault, now);
            host.play_fault_blink(slot, column);
            info!("wrong cell: tile {} column {}, score {}", index, column, self.score);
            return TapOutcome::Fault;
        }
        if !god_mode && index > 0 {
            let previous = self.tiles.get(index - 1);
            if !previous.is_start() && !previous.is_tapped() {
                trace!("tile {} tapped before tile {}", index, index - 1);
                return TapOutcome::Ignored;
            }
        }

        self.tiles.get_mut(index).tap(column);
        self.score += 1;
        host.set_score_text(self.score);
        self.rows.refresh(offset, &mut self.tiles, host);
        TapOutcome::Hit
    }

    /// Advance one frame: re-arm the scroll schedule, reconcile the rows, and
    /// check for a row that scrolled away untapped.
    pub fn refresh<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        let now = self.clock.now_ms();
        let mut offset = self.offset.get(now);

        if let Some(done) = self.offset.take_completed() {
            if self.state == GameState::Running {
                self.speedup.advance();
                self.offset.set(
                    done.at_ms,
                    self.speedup.target(),
                    self.speedup.duration_ms(),
                    self.config.scroll_easing,
                    Some(SegmentDone),
                );
                offset = self.offset.get(now);
                debug!(
                    "segment {} done, now {:.2} rows/s",
                    self.speedup.segments(),
                    self.speedup.rows_per_second()
                );
            }
        }

        let offset = offset.max(0.0);
        self.rows.refresh(offset, &mut self.tiles, host);

        if self.state == GameState::Running && !self.config.god_mode {
            self.check_missed(offset, now, host);
        }

        self.forward_stored_highscore(host);
    }

    fn check_missed<H: RenderHost + ?Sized>(&mut self, offset: f64, now: f64, host: &mut H) {
        let floor = offset.floor() as usize;
        if floor <= 1 {
            return;
        }
        let missed = floor - 1;
        let tile = *self.tiles.get(missed);
        if tile.is_tapped() {
            return;
        }
        self.stop(Effect::Miss, now);
        self.offset.set(
            now,
            (floor - 2) as f64,
            self.config.rewind_ms,
            Easing::BackOut,
            None,
        );
        let column = tile.active().column().unwrap_or(0);
        host.play_miss_settle(self.rows.slot_for_tile(missed), column);
        info!("missed tile {}, score {}", missed, self.score);
    }

    /// The host finished playing the fault or miss effect. Ends the run once.
    pub fn effect_finished<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        if self.state != GameState::Stopped {
            return;
        }
        let Some(effect) = self.pending_effect.take() else {
            return;
        };
        self.state = GameState::Ended;
        host.show_end_screen(self.score);
        info!("run ended after {:?} with score {}", effect, self.score);
        self.submit_highscore();
        self.forward_stored_highscore(host);
    }

    /// Remember the player's name; after a finished run also submit its score.
    pub fn set_player_name<H: RenderHost + ?Sized>(&mut self, name: &str, host: &mut H) {
        self.names.save_name(name.trim());
        if self.state == GameState::Ended {
            self.submit_highscore();
        }
        self.forward_stored_highscore(host);
    }

    fn submit_highscore(&mut self) {
        let Some(highscores) = &mut self.highscores else {
            trace!("no highscore backend, score not submitted");
            return;
        };
        let name = self.names.saved_name().unwrap_or_default();
        highscores.submit(&name, self.score);
    }

    fn stop(&mut self, effect: Effect, now: f64) {
        self.offset.halt(now);
        self.state = GameState::Stopped;
        self.pending_effect = Some(effect);
    }

    fn hide_start_label<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        if let Some((slot, column)) = self.start_label.take() {
            host.set_start_label(slot, column, false);
        }
    }

    fn forward_stored_highscore<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        let stored = self.highscores.as_ref().and_then(|h| h.stored_score());
        if stored != self.shown_highscore {
            self.shown_highscore = stored;
            host.set_stored_highscore(stored);
        }
    }
}

fn speedup_for(config: &GameConfig) -> Speedup {
    Speedup::new(
        config.rows_per_segment,
        config.initial_duration_ms,
        config.speedup_factor,
    )
}
