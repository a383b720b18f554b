//! Row cascade state machine
//!
//! After a landing (or a finished explosion) the field is settled in steps:
//! remove marked rows, let clusters fall, re-weld, and if that produced new
//! full rows wait a short debounce, clear them and go around again.

use log::debug;
use serde::Serialize;

use blockweld_core::{Field, SimulationConfig};
use blockweld_types::{BlockColor, ClearedCell, GameEvent, GridPos};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeState {
    NotCascading,
    Cascading,
    WaitingToClearLine { elapsed: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cascade {
    state: CascadeState,
    cycles: u32,
    rows_cleared: u32,
    cleared_by_color: [u32; BlockColor::COUNT],
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Cascade {
    pub fn new() -> Self {
        Self {
            state: CascadeState::NotCascading,
            cycles: 0,
            rows_cleared: 0,
            cleared_by_color: [0; BlockColor::COUNT],
        }
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    pub fn is_cascading(&self) -> bool {
        self.state != CascadeState::NotCascading
    }

    /// Extra rows cleared by the cascade currently running (or the last one).
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Rows cleared since the level started.
    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    /// Cleared sub-cells per colour, for flying-block bookkeeping.
    pub fn cleared_by_color(&self) -> &[u32; BlockColor::COUNT] {
        &self.cleared_by_color
    }

    /// Clear the rows that are full right now and start settling.
    pub fn begin(&mut self, field: &mut Field, events: &mut Vec<GameEvent>) {
        let rows = field.full_rows();
        self.clear(field, rows, events);
        self.resume();
    }

    /// Start settling without clearing anything first.
    pub fn resume(&mut self) {
        self.cycles = 0;
        self.state = CascadeState::Cascading;
    }

    pub fn update(
        &mut self,
        field: &mut Field,
        dt: f32,
        config: &SimulationConfig,
        clears_rows: bool,
        events: &mut Vec<GameEvent>,
    ) {
        match self.state {
            CascadeState::NotCascading => {}
            CascadeState::Cascading => self.settle(field, clears_rows, events),
            CascadeState::WaitingToClearLine { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed < config.clear_line_debounce {
                    self.state = CascadeState::WaitingToClearLine { elapsed };
                    return;
                }
                let rows = field.full_rows();
                self.clear(field, rows, events);
                self.cycles += 1;
                debug!("cascade level {}", self.cycles);
                events.push(GameEvent::Cascade { level: self.cycles });
                self.state = CascadeState::Cascading;
            }
        }
    }

    fn settle(&mut self, field: &mut Field, clears_rows: bool, events: &mut Vec<GameEvent>) {
        field.manage_welds();
        let removed = field.remove_cleared_rows();
        if let Some(&lowest) = removed.iter().min() {
            events.push(GameEvent::RowsRemoved {
                rows: removed.clone(),
            });
            let bounced = grounded_gray_cells(field, lowest);
            if !bounced.is_empty() {
                events.push(GameEvent::BlocksBounced { cells: bounced });
            }
        }
        field.apply_gravity();
        field.manage_welds();

        if clears_rows && !field.full_rows().is_empty() {
            self.state = CascadeState::WaitingToClearLine { elapsed: 0.0 };
        } else {
            field.manage_welds();
            self.state = CascadeState::NotCascading;
        }
    }

    fn clear(&mut self, field: &mut Field, rows: Vec<i32>, events: &mut Vec<GameEvent>) {
        if rows.is_empty() {
            return;
        }
        let cells: Vec<ClearedCell> = field.clear_rows(&rows);
        for cell in &cells {
            self.cleared_by_color[cell.color.index()] += 1;
        }
        self.rows_cleared += rows.len() as u32;
        debug!("cleared rows {:?}", rows);
        events.push(GameEvent::RowsCleared { rows, cells });
    }
}

/// Gray cells at or above `from_row` that rest on something after a removal.
fn grounded_gray_cells(field: &Field, from_row: i32) -> Vec<GridPos> {
    let mut out = Vec::new();
    for row in field.window_rows().filter(|r| *r >= from_row) {
        for col in 0..field.columns() as i32 {
            let pos = GridPos::new(col, row);
            let gray = field.cell(pos).is_some_and(|c| c.has_gray());
            if gray && !field.is_block_structure_floating(pos) {
                out.push(pos);
            }
        }
    }
    out
}
