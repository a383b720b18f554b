//! Explosion resolution engine
//!
//! Detonations do not clear their footprint at once. Area blasts grow one ring
//! per step; row bombs send two laser cursors along their row. Every bomb
//! sub-cell removed on the way starts its own detonation. All active
//! detonations live in one collection that is advanced in place every frame.

use log::{debug, trace};

use crate::config::SimulationConfig;
use crate::grid::{Field, SubCell};
use crate::types::{DetonationKind, Direction, GameEvent, GridPos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserPhase {
    /// Skipping empty cells.
    FreeSpace,
    /// Cutting an occupied cell.
    Cutting,
    Done,
}

/// One direction of a row bomb's sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaserCursor {
    pub col: i32,
    pub dir: i32,
    pub phase: LaserPhase,
    timer: f32,
}

impl LaserCursor {
    fn new(col: i32, dir: i32) -> Self {
        Self {
            col,
            dir,
            phase: LaserPhase::FreeSpace,
            timer: 0.0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == LaserPhase::Done
    }

    fn advance(&mut self, field: &mut Field, row: i32, dt: f32, config: &SimulationConfig, out: &mut Erasure) {
        if self.is_done() {
            return;
        }
        self.timer += dt;
        loop {
            if self.col < 0 || self.col >= field.columns() as i32 {
                self.phase = LaserPhase::Done;
                self.timer = 0.0;
                return;
            }
            let pos = GridPos::new(self.col, row);
            // Re-read every step: a chain may have changed the cell.
            let occupied = field
                .cell(pos)
                .is_some_and(|c| c.any(|s| s.is_destructible()));
            let (phase, cost) = if occupied {
                (LaserPhase::Cutting, config.laser_cut_interval)
            } else {
                (LaserPhase::FreeSpace, 1.0 / config.laser_free_speed.max(f32::EPSILON))
            };
            self.phase = phase;
            if self.timer < cost {
                return;
            }
            self.timer -= cost;
            if occupied {
                out.erase(field, pos);
            }
            self.col += self.dir;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Blast {
    Area { elapsed: f32, next_step: i32 },
    Laser {
        impacted: bool,
        left: LaserCursor,
        right: LaserCursor,
    },
}

/// One active detonation.
#[derive(Debug, Clone, PartialEq)]
pub struct Detonation {
    pub kind: DetonationKind,
    /// Bottom-left cell of the footprint.
    pub origin: GridPos,
    /// Footprint size in cells (columns, rows).
    pub size: (i32, i32),
    blast: Blast,
    finished: bool,
}

impl Detonation {
    fn new(kind: DetonationKind, origin: GridPos, size: (i32, i32)) -> Self {
        let blast = match kind {
            DetonationKind::Row => Blast::Laser {
                impacted: false,
                left: LaserCursor::new(origin.col - 1, -1),
                right: LaserCursor::new(origin.col + size.0.max(1), 1),
            },
            _ => Blast::Area {
                elapsed: 0.0,
                next_step: 0,
            },
        };
        Self {
            kind,
            origin,
            size: (size.0.max(1), size.1.max(1)),
            blast,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current reach of an area blast (`None` for lasers).
    pub fn reach(&self) -> Option<i32> {
        match self.blast {
            Blast::Area { next_step, .. } => Some(next_step - 1),
            Blast::Laser { .. } => None,
        }
    }

    pub fn laser_cursors(&self) -> Option<(LaserCursor, LaserCursor)> {
        match self.blast {
            Blast::Laser { left, right, .. } => Some((left, right)),
            Blast::Area { .. } => None,
        }
    }

    /// Whether a cell `dx`, `dy` outside the footprint is inside the blast at
    /// reach `d`. Corner-exclusive blasts leave out the outermost corners.
    fn covers(&self, dx: i32, dy: i32, d: i32) -> bool {
        if dx.max(dy) > d {
            return false;
        }
        self.kind.corner_inclusive() || d == 0 || !(dx == d && dy == d)
    }

    /// Cells newly covered when the reach grows to `d`.
    fn ring(&self, d: i32) -> Vec<GridPos> {
        let (w, h) = self.size;
        let min = self.origin.offset(-d, -d);
        let max = self.origin.offset(w - 1 + d, h - 1 + d);
        let mut cells = Vec::new();
        for row in min.row..=max.row {
            for col in min.col..=max.col {
                let dx = (self.origin.col - col).max(col - (self.origin.col + w - 1)).max(0);
                let dy = (self.origin.row - row).max(row - (self.origin.row + h - 1)).max(0);
                if self.covers(dx, dy, d) && !(d > 0 && self.covers(dx, dy, d - 1)) {
                    cells.push(GridPos::new(col, row));
                }
            }
        }
        cells
    }

    fn update(&mut self, field: &mut Field, dt: f32, config: &SimulationConfig, out: &mut Erasure) {
        if self.finished {
            return;
        }
        let max_reach = self.kind.max_reach();
        let row = self.origin.row;
        match &mut self.blast {
            Blast::Area { elapsed, next_step } => {
                *elapsed += dt;
                let reach = ((*elapsed * config.explosion_speed).floor() as i32).min(max_reach);
                let mut steps = Vec::new();
                while *next_step <= reach {
                    steps.push(*next_step);
                    *next_step += 1;
                }
                let done = *next_step > max_reach;
                for d in steps {
                    for pos in self.ring(d) {
                        out.erase(field, pos);
                    }
                }
                self.finished = done;
            }
            Blast::Laser {
                impacted,
                left,
                right,
            } => {
                if !*impacted {
                    *impacted = true;
                    for col in 0..self.size.0 {
                        out.erase(field, self.origin.offset(col, 0));
                    }
                    out.erase(field, self.origin.step(Direction::S));
                }
                left.advance(field, row, dt, config, out);
                right.advance(field, row, dt, config, out);
                if left.is_done() && right.is_done() {
                    self.finished = true;
                    out.finished_rows.push(row);
                }
            }
        }
    }
}

/// Bookkeeping collected while erasing cells during one update.
#[derive(Debug, Default)]
struct Erasure {
    destroyed: Vec<GridPos>,
    chained: Vec<(DetonationKind, GridPos)>,
    finished_rows: Vec<i32>,
}

impl Erasure {
    fn erase(&mut self, field: &mut Field, pos: GridPos) {
        if pos.row < field.lowest_visible_row() as i32 {
            return;
        }
        let removed = field.take_destructible(pos);
        if removed.is_empty() {
            return;
        }
        for sub in &removed {
            if let Some(kind) = sub.kind.detonation() {
                self.chained.push((kind, pos));
            }
        }
        self.destroyed.push(pos);
    }
}

/// Every detonation currently resolving in the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldExplosions {
    active: Vec<Detonation>,
}

impl FieldExplosions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn detonations(&self) -> &[Detonation] {
        &self.active
    }

    /// Start a detonation with an explicit footprint.
    pub fn detonate(
        &mut self,
        kind: DetonationKind,
        origin: GridPos,
        size: (i32, i32),
        events: &mut Vec<GameEvent>,
    ) {
        debug!("{} detonation at ({}, {})", kind.as_str(), origin.col, origin.row);
        events.push(GameEvent::BombDetonated { kind, pos: origin });
        self.active.push(Detonation::new(kind, origin, size));
    }

    /// Consume the bomb sub-cell at `pos` and start its detonation.
    ///
    /// Returns `false` if there is no bomb there.
    pub fn detonate_bomb_at(&mut self, field: &mut Field, pos: GridPos, events: &mut Vec<GameEvent>) -> bool {
        let Some(cell) = field.cell_mut(pos) else {
            return false;
        };
        let Some(slot) = (0..2).find(|&s| cell.sub[s].kind.is_bomb()) else {
            return false;
        };
        let kind = cell.sub[slot].kind;
        cell.sub[slot] = SubCell::EMPTY;
        match kind.detonation() {
            Some(det) => {
                self.detonate(det, pos, (1, 1), events);
                true
            }
            None => false,
        }
    }

    /// Advance every detonation. Returns `true` once none remain.
    ///
    /// Bombs caught by a blast start within the same call and run their
    /// zero-length first step at once, so their footprint is punched before
    /// the frame ends.
    pub fn update(
        &mut self,
        field: &mut Field,
        dt: f32,
        config: &SimulationConfig,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let mut out = Erasure::default();
        for det in self.active.iter_mut() {
            det.update(field, dt, config, &mut out);
        }
        let mut chained = Self::flush(field, &mut out, events);

        // Every pass consumes bomb sub-cells, so the chain runs dry.
        while !chained.is_empty() {
            let mut out = Erasure::default();
            for (kind, pos) in chained {
                self.detonate(kind, pos, (1, 1), events);
                if let Some(det) = self.active.last_mut() {
                    det.update(field, 0.0, config, &mut out);
                }
            }
            chained = Self::flush(field, &mut out, events);
        }

        self.active.retain(|d| !d.is_finished());
        self.active.is_empty()
    }

    /// Report destroyed cells, clear finished laser rows and hand back the
    /// bombs caught on the way.
    fn flush(
        field: &mut Field,
        out: &mut Erasure,
        events: &mut Vec<GameEvent>,
    ) -> Vec<(DetonationKind, GridPos)> {
        if !out.destroyed.is_empty() {
            trace!("explosions destroyed {} cell(s)", out.destroyed.len());
            events.push(GameEvent::CellsDestroyed {
                cells: std::mem::take(&mut out.destroyed),
            });
        }

        for row in out.finished_rows.drain(..) {
            if !field.is_in_window(row) || field.row_has(row, |s| s.kind.is_asteroid()) {
                debug!("laser row {} kept", row);
                continue;
            }
            let cells = field.clear_rows(&[row]);
            events.push(GameEvent::RowsCleared {
                rows: vec![row],
                cells,
            });
        }

        std::mem::take(&mut out.chained)
    }
}
