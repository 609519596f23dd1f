//! Physical row slots and their binding to tiles.
//!
//! The screen keeps `rows + 1` slots. Tile `t` is always drawn in slot
//! `t % slots`, so scrolling only rebinds a slot when its tile leaves through
//! the bottom and a new one enters at the top.

use crate::api::host::RenderHost;
use crate::core::rng::RandomSource;
use crate::core::sequence::{ActiveColumn, TileSequence};

/// What a slot currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowSlot {
    pub tile_index: Option<usize>,
    pub active: Option<ActiveColumn>,
    pub tapped: Option<usize>,
    pub top: Option<f64>,
}

/// Maps the scroll offset onto row slots and reconciles their visuals.
#[derive(Debug, Clone)]
pub struct RowWindow {
    visible_rows: usize,
    slots: Vec<RowSlot>,
}

impl RowWindow {
    pub fn new(visible_rows: usize) -> Self {
        assert!(visible_rows >= 1, "at least one visible row");
        Self {
            visible_rows,
            slots: vec![RowSlot::default(); visible_rows + 1],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, slot: usize) -> Option<&RowSlot> {
        self.slots.get(slot)
    }

    /// Slot that tile `index` is drawn in.
    pub fn slot_for_tile(&self, index: usize) -> usize {
        index % self.slot_count()
    }

    /// Tile shown in `slot` when the bottom row holds tile `floor`.
    pub fn tile_index_for_slot(&self, slot: usize, floor: usize) -> usize {
        let len = self.slot_count();
        floor + (slot + len - floor % len) % len
    }

    /// Top edge of the row at bottom position `position`, in row heights from
    /// the top of the screen.
    pub fn row_top(&self, position: usize, fraction: f64) -> f64 {
        self.visible_rows as f64 - 1.0 - position as f64 + fraction
    }

    /// Slot under the vertical position `y_rows` (row heights from the top).
    pub fn slot_at(&self, offset: f64, y_rows: f64) -> Option<usize> {
        let offset = offset.max(0.0);
        let floor = offset.floor();
        let fraction = offset - floor;
        let position = (self.visible_rows as f64 + fraction - y_rows).ceil() - 1.0;
        if position < 0.0 || position >= self.slot_count() as f64 {
            return None;
        }
        let floor = floor as usize;
        Some((floor + position as usize) % self.slot_count())
    }

    /// Bind every slot to its tile for `offset` and emit what changed.
    pub fn refresh<R, H>(&mut self, offset: f64, tiles: &mut TileSequence<R>, host: &mut H)
    where
        R: RandomSource,
        H: RenderHost + ?Sized,
    {
        let offset = offset.max(0.0);
        let floor = offset.floor() as usize;
        let fraction = offset - floor as f64;

        for position in 0..self.slot_count() {
            let index = floor + position;
            let slot = self.slot_for_tile(index);
            let tile = *tiles.get(index);
            let top = self.row_top(position, fraction);
            let shown = &mut self.slots[slot];

            if shown.active != Some(tile.active()) {
                if let Some(old) = shown.active {
                    clear_active(host, slot, old);
                }
                match tile.active() {
                    ActiveColumn::Start => host.set_start_row(slot),
                    ActiveColumn::Column(column) => host.set_active(slot, column),
                }
                shown.active = Some(tile.active());
            }

            if shown.tapped != tile.tapped() {
                if let Some(old) = shown.tapped {
                    host.clear_tapped(slot, old);
                }
                if let Some(column) = tile.tapped() {
                    host.set_tapped(slot, column);
                }
                shown.tapped = tile.tapped();
            }

            if shown.top != Some(top) {
                host.place_row(slot, top);
                shown.top = Some(top);
            }

            shown.tile_index = Some(index);
        }
    }

    /// Clear every displayed class and forget the bindings.
    pub fn reset<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        for (slot, shown) in self.slots.iter_mut().enumerate() {
            if let Some(active) = shown.active {
                clear_active(host, slot, active);
            }
            if let Some(column) = shown.tapped {
                host.clear_tapped(slot, column);
            }
            *shown = RowSlot::default();
        }
    }
}

fn clear_active<H: RenderHost + ?Sized>(host: &mut H, slot: usize, active: ActiveColumn) {
    match active {
        ActiveColumn::Start => host.clear_start_row(slot),
        ActiveColumn::Column(column) => host.clear_active(slot, column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::protocol::{CommandBuffer, HostCommand};
    use crate::core::rng::FixedColumns;

    fn sequence() -> TileSequence<FixedColumns> {
        TileSequence::new(4, FixedColumns::new(vec![1, 2, 3, 3, 2]))
    }

    #[test]
    fn tile_for_slot_inverts_slot_for_tile() {
        let window = RowWindow::new(4);
        for floor in 0..20 {
            for index in floor..floor + window.slot_count() {
                let slot = window.slot_for_tile(index);
                assert_eq!(window.tile_index_for_slot(slot, floor), index);
            }
        }
    }

    #[test]
    fn first_refresh_paints_every_slot() {
        let mut window = RowWindow::new(4);
        let mut tiles = sequence();
        let mut host = CommandBuffer::without_placement();
        window.refresh(0.0, &mut tiles, &mut host);
        assert_eq!(
            host.commands(),
            vec![
                HostCommand::SetStartRow { slot: 0 },
                HostCommand::SetActive { slot: 1, column: 1 },
                HostCommand::SetActive { slot: 2, column: 2 },
                HostCommand::SetActive { slot: 3, column: 3 },
                HostCommand::SetActive { slot: 4, column: 3 },
            ]
        );
    }

    #[test]
    fn unchanged_frame_emits_nothing() {
        let mut window = RowWindow::new(4);
        let mut tiles = sequence();
        let mut host = CommandBuffer::new();
        window.refresh(0.5, &mut tiles, &mut host);
        host.clear();
        window.refresh(0.5, &mut tiles, &mut host);
        assert!(host.is_empty());
    }

    #[test]
    fn scrolling_rebinds_only_the_recycled_slot() {
        let mut window = RowWindow::new(4);
        let mut tiles = sequence();
        let mut host = CommandBuffer::without_placement();
        window.refresh(0.0, &mut tiles, &mut host);
        host.clear();
        // Tile 0 leaves, tile 5 (column 2) enters in slot 0.
        window.refresh(1.0, &mut tiles, &mut host);
        assert_eq!(
            host.commands(),
            vec![
                HostCommand::ClearStartRow { slot: 0 },
                HostCommand::SetActive { slot: 0, column: 2 },
            ]
        );
        assert_eq!(window.slot(0).and_then(|s| s.tile_index), Some(5));
    }

    #[test]
    fn taps_are_reconciled() {
        let mut window = RowWindow::new(4);
        let mut tiles = sequence();
        let mut host = CommandBuffer::without_placement();
        window.refresh(0.0, &mut tiles, &mut host);
        host.clear();
        tiles.get_mut(1).tap(1);
        window.refresh(0.0, &mut tiles, &mut host);
        assert_eq!(host.commands(), vec![HostCommand::SetTapped { slot: 1, column: 1 }]);
    }

    #[test]
    fn rows_move_with_the_fraction() {
        let mut window = RowWindow::new(4);
        let mut tiles = sequence();
        let mut host = CommandBuffer::new();
        window.refresh(0.25, &mut tiles, &mut host);
        let tops: Vec<(usize, f64)> = host
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                HostCommand::PlaceRow { slot, top } => Some((slot, top)),
                _ => None,
            })
            .collect();
        assert_eq!(
            tops,
            vec![(0, 3.25), (1, 2.25), (2, 1.25), (3, 0.25), (4, -0.75)]
        );
    }

    #[test]
    fn slot_at_matches_placement() {
        let window = RowWindow::new(4);
        // Bottom row spans [3.25, 4.25) at offset 0.25.
        assert_eq!(window.slot_at(0.25, 3.5), Some(0));
        assert_eq!(window.slot_at(0.25, 3.0), Some(1));
        assert_eq!(window.slot_at(0.25, 0.1), Some(4));
        assert_eq!(window.slot_at(7.0, 3.5), Some(2));
        assert_eq!(window.slot_at(0.0, 4.5), None);
    }

    #[test]
    fn reset_clears_displayed_classes() {
        let mut window = RowWindow::new(4);
        let mut tiles = sequence();
        let mut host = CommandBuffer::without_placement();
        window.refresh(0.0, &mut tiles, &mut host);
        tiles.get_mut(1).tap(1);
        window.refresh(0.0, &mut tiles, &mut host);
        host.clear();
        window.reset(&mut host);
        let commands = host.commands();
        assert!(commands.contains(&HostCommand::ClearStartRow { slot: 0 }));
        assert!(commands.contains(&HostCommand::ClearTapped { slot: 1, column: 1 }));
        assert_eq!(commands.len(), 6);
        assert_eq!(window.slot(1), Some(&RowSlot::default()));
    }
}
