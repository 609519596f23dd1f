//! Contract between the game core and whatever draws it.
//!
//! The core never touches a DOM or a GPU: it reports visual changes through
//! this trait, and the host reports back when a fault/miss effect has finished
//! playing by calling `GameCore::effect_finished`.
//!
//! `slot` is a physical row slot in `[0, rows + 1)`, `column` is in
//! `[0, columns)`.

pub trait RenderHost {
    /// Highlight the colored tile of a row.
    fn set_active(&mut self, slot: usize, column: usize);
    fn clear_active(&mut self, slot: usize, column: usize);

    /// Paint a whole row as the neutral start row.
    fn set_start_row(&mut self, slot: usize);
    fn clear_start_row(&mut self, slot: usize);

    /// Mark a cell as tapped.
    fn set_tapped(&mut self, slot: usize, column: usize);
    fn clear_tapped(&mut self, slot: usize, column: usize);

    /// Position a row. `top` is the row's top edge in row heights from the
    /// top of the screen; it can be negative for the row entering the screen.
    fn place_row(&mut self, _slot: usize, _top: f64) {}

    /// Show or hide the "Start" label on the first colored tile.
    fn set_start_label(&mut self, _slot: usize, _column: usize, _visible: bool) {}

    fn set_score_text(&mut self, score: u32);

    /// Blink the wrongly tapped cell. Call `GameCore::effect_finished` when done.
    fn play_fault_blink(&mut self, slot: usize, column: usize);

    /// Blink the missed tile while the rows settle back. Call
    /// `GameCore::effect_finished` when done.
    fn play_miss_settle(&mut self, slot: usize, column: usize);

    /// Remove fault/miss marks left by a previous run.
    fn clear_marks(&mut self) {}

    fn show_end_screen(&mut self, score: u32);
    fn hide_end_screen(&mut self) {}

    /// The player's stored best score, read back after a submission.
    fn set_stored_highscore(&mut self, _score: Option<u32>) {}
}
