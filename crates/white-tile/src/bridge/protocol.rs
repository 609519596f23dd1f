//! Host command wire format.
//! Must stay in sync with the JavaScript reader in the web shell.
//!
//! Every command is one record of 4 floats:
//! ```text
//! [kind, a, b, c]
//! ```
//! `a` is usually the row slot, `b` the column, `c` a value. Records are read
//! once per frame through `get_commands_ptr()` / `get_commands_len()` and the
//! buffer is cleared before the next frame.

use bytemuck::{Pod, Zeroable};

use crate::api::host::RenderHost;

/// Protocol version reported to the host.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per command record.
pub const COMMAND_FLOATS: usize = 4;

/// Command kinds.
pub const KIND_SET_ACTIVE: f32 = 1.0;
pub const KIND_CLEAR_ACTIVE: f32 = 2.0;
pub const KIND_SET_START_ROW: f32 = 3.0;
pub const KIND_CLEAR_START_ROW: f32 = 4.0;
pub const KIND_SET_TAPPED: f32 = 5.0;
pub const KIND_CLEAR_TAPPED: f32 = 6.0;
pub const KIND_PLACE_ROW: f32 = 7.0;
pub const KIND_START_LABEL: f32 = 8.0;
pub const KIND_SCORE: f32 = 9.0;
pub const KIND_FAULT_BLINK: f32 = 10.0;
pub const KIND_MISS_SETTLE: f32 = 11.0;
pub const KIND_CLEAR_MARKS: f32 = 12.0;
pub const KIND_SHOW_END: f32 = 13.0;
pub const KIND_HIDE_END: f32 = 14.0;
pub const KIND_STORED_HIGHSCORE: f32 = 15.0;

/// One encoded command.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CommandRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl CommandRecord {
    fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// Decoded form of a [`CommandRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCommand {
    SetActive { slot: usize, column: usize },
    ClearActive { slot: usize, column: usize },
    SetStartRow { slot: usize },
    ClearStartRow { slot: usize },
    SetTapped { slot: usize, column: usize },
    ClearTapped { slot: usize, column: usize },
    PlaceRow { slot: usize, top: f64 },
    StartLabel { slot: usize, column: usize, visible: bool },
    Score(u32),
    FaultBlink { slot: usize, column: usize },
    MissSettle { slot: usize, column: usize },
    ClearMarks,
    ShowEnd { score: u32 },
    HideEnd,
    StoredHighscore(Option<u32>),
}

impl HostCommand {
    pub fn encode(self) -> CommandRecord {
        let cell = |kind: f32, slot: usize, column: usize| {
            CommandRecord::new(kind, slot as f32, column as f32, 0.0)
        };
        let value = |kind: f32, c: f32| CommandRecord::new(kind, 0.0, 0.0, c);
        match self {
            HostCommand::SetActive { slot, column } => cell(KIND_SET_ACTIVE, slot, column),
            HostCommand::ClearActive { slot, column } => cell(KIND_CLEAR_ACTIVE, slot, column),
            HostCommand::SetStartRow { slot } => cell(KIND_SET_START_ROW, slot, 0),
            HostCommand::ClearStartRow { slot } => cell(KIND_CLEAR_START_ROW, slot, 0),
            HostCommand::SetTapped { slot, column } => cell(KIND_SET_TAPPED, slot, column),
            HostCommand::ClearTapped { slot, column } => cell(KIND_CLEAR_TAPPED, slot, column),
            HostCommand::PlaceRow { slot, top } => {
                CommandRecord::new(KIND_PLACE_ROW, slot as f32, 0.0, top as f32)
            }
            HostCommand::StartLabel { slot, column, visible } => {
                let flag = if visible { 1.0 } else { 0.0 };
                CommandRecord::new(KIND_START_LABEL, slot as f32, column as f32, flag)
            }
            HostCommand::Score(score) => value(KIND_SCORE, score as f32),
            HostCommand::FaultBlink { slot, column } => cell(KIND_FAULT_BLINK, slot, column),
            HostCommand::MissSettle { slot, column } => cell(KIND_MISS_SETTLE, slot, column),
            HostCommand::ClearMarks => value(KIND_CLEAR_MARKS, 0.0),
            HostCommand::ShowEnd { score } => value(KIND_SHOW_END, score as f32),
            HostCommand::HideEnd => value(KIND_HIDE_END, 0.0),
            // -1 encodes "nothing stored".
            HostCommand::StoredHighscore(score) => {
                value(KIND_STORED_HIGHSCORE, score.map(|s| s as f32).unwrap_or(-1.0))
            }
        }
    }

    pub fn decode(record: CommandRecord) -> Option<Self> {
        let (slot, column) = (record.a as usize, record.b as usize);
        let command = match record.kind {
            k if k == KIND_SET_ACTIVE => HostCommand::SetActive { slot, column },
            k if k == KIND_CLEAR_ACTIVE => HostCommand::ClearActive { slot, column },
            k if k == KIND_SET_START_ROW => HostCommand::SetStartRow { slot },
            k if k == KIND_CLEAR_START_ROW => HostCommand::ClearStartRow { slot },
            k if k == KIND_SET_TAPPED => HostCommand::SetTapped { slot, column },
            k if k == KIND_CLEAR_TAPPED => HostCommand::ClearTapped { slot, column },
            k if k == KIND_PLACE_ROW => HostCommand::PlaceRow { slot, top: record.c as f64 },
            k if k == KIND_START_LABEL => {
                HostCommand::StartLabel { slot, column, visible: record.c != 0.0 }
            }
            k if k == KIND_SCORE => HostCommand::Score(record.c as u32),
            k if k == KIND_FAULT_BLINK => HostCommand::FaultBlink { slot, column },
            k if k == KIND_MISS_SETTLE => HostCommand::MissSettle { slot, column },
            k if k == KIND_CLEAR_MARKS => HostCommand::ClearMarks,
            k if k == KIND_SHOW_END => HostCommand::ShowEnd { score: record.c as u32 },
            k if k == KIND_HIDE_END => HostCommand::HideEnd,
            k if k == KIND_STORED_HIGHSCORE => {
                HostCommand::StoredHighscore((record.c >= 0.0).then_some(record.c as u32))
            }
            _ => return None,
        };
        Some(command)
    }
}

/// Frame-scoped list of host commands.
///
/// Implements [`RenderHost`] by recording; the web bridge exposes the raw
/// floats to JavaScript, tests inspect the decoded commands.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    records: Vec<CommandRecord>,
    /// Suppress `PlaceRow` records (tests that only care about state changes).
    skip_placement: bool,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            skip_placement: false,
        }
    }

    /// A buffer that drops row placement records.
    pub fn without_placement() -> Self {
        Self {
            skip_placement: true,
            ..Self::new()
        }
    }

    pub fn push(&mut self, command: HostCommand) {
        if self.skip_placement && matches!(command, HostCommand::PlaceRow { .. }) {
            return;
        }
        self.records.push(command.encode());
    }

    /// Decoded commands in emission order.
    pub fn commands(&self) -> Vec<HostCommand> {
        self.records.iter().filter_map(|r| HostCommand::decode(*r)).collect()
    }

    /// Decoded commands, clearing the buffer.
    pub fn drain(&mut self) -> Vec<HostCommand> {
        let commands = self.commands();
        self.clear();
        commands
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Drop the first `count` records, keeping anything pushed after them.
    pub fn consume(&mut self, count: usize) {
        let count = count.min(self.records.len());
        self.records.drain(..count);
    }

    /// Records as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.records)
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.as_floats().as_ptr()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RenderHost for CommandBuffer {
    fn set_active(&mut self, slot: usize, column: usize) {
        self.push(HostCommand::SetActive { slot, column });
    }

    fn clear_active(&mut self, slot: usize, column: usize) {
        self.push(HostCommand::ClearActive { slot, column });
    }

    fn set_start_row(&mut self, slot: usize) {
        self.push(HostCommand::SetStartRow { slot });
    }

    fn clear_start_row(&mut self, slot: usize) {
        self.push(HostCommand::ClearStartRow { slot });
    }

    fn set_tapped(&mut self, slot: usize, column: usize) {
        self.push(HostCommand::SetTapped { slot, column });
    }

    fn clear_tapped(&mut self, slot: usize, column: usize) {
        self.push(HostCommand::ClearTapped { slot, column });
    }

    fn place_row(&mut self, slot: usize, top: f64) {
        self.push(HostCommand::PlaceRow { slot, top });
    }

    fn set_start_label(&mut self, slot: usize, column: usize, visible: bool) {
        self.push(HostCommand::StartLabel { slot, column, visible });
    }

    fn set_score_text(&mut self, score: u32) {
        self.push(HostCommand::Score(score));
    }

    fn play_fault_blink(&mut self, slot: usize, column: usize) {
        self.push(HostCommand::FaultBlink { slot, column });
    }

    fn play_miss_settle(&mut self, slot: usize, column: usize) {
        self.push(HostCommand::MissSettle { slot, column });
    }

    fn clear_marks(&mut self) {
        self.push(HostCommand::ClearMarks);
    }

    fn show_end_screen(&mut self, score: u32) {
        self.push(HostCommand::ShowEnd { score });
    }

    fn hide_end_screen(&mut self) {
        self.push(HostCommand::HideEnd);
    }

    fn set_stored_highscore(&mut self, score: Option<u32>) {
        self.push(HostCommand::StoredHighscore(score));
    }
}
