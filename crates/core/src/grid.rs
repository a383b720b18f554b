//! Field module - the dual-sub-cell grid
//!
//! The field is a `columns x rows` grid stored as a flat, row-major vector
//! (`row * columns + col`) with row 0 at the bottom. Every cell has exactly two
//! sub-cell slots so that two complementary triangles can share one cell.
//!
//! The field only stores and answers questions about blocks. It never
//! advances game state on its own; the engines in [`crate::weld`],
//! [`crate::gravity`] and [`crate::explosions`] and the orchestrator do that.

use std::ops::Range;

use arrayvec::ArrayVec;
use log::{debug, trace};

use crate::config::SimulationConfig;
use crate::level::LevelError;
use crate::types::{
    BlockColor, BlockKind, ClearedCell, Direction, Fill, GridPos, Vec2, LEVEL_OWNER,
    MAX_NUM_COLUMNS, MAX_NUM_ROWS,
};

/// Spawn id of the piece a block came from (`LEVEL_OWNER` for level blocks).
pub type PieceId = u32;

/// A weld link: one of the eight neighbours, or the shared diagonal between
/// two complementary halves of the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeldLink {
    Neighbor(Direction),
    Diagonal,
}

impl WeldLink {
    pub const ALL: [WeldLink; 9] = [
        WeldLink::Neighbor(Direction::N),
        WeldLink::Neighbor(Direction::NE),
        WeldLink::Neighbor(Direction::E),
        WeldLink::Neighbor(Direction::SE),
        WeldLink::Neighbor(Direction::S),
        WeldLink::Neighbor(Direction::SW),
        WeldLink::Neighbor(Direction::W),
        WeldLink::Neighbor(Direction::NW),
        WeldLink::Diagonal,
    ];

    pub fn index(self) -> usize {
        match self {
            WeldLink::Neighbor(dir) => dir as usize,
            WeldLink::Diagonal => 8,
        }
    }

    pub fn bit(self) -> u16 {
        1 << self.index()
    }

    /// The link the other end uses to point back.
    pub fn opposite(self) -> WeldLink {
        match self {
            WeldLink::Neighbor(dir) => WeldLink::Neighbor(dir.opposite()),
            WeldLink::Diagonal => WeldLink::Diagonal,
        }
    }
}

/// Weld bitmask plus a per-link appear/disappear animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeldSet {
    bits: u16,
    phases: [f32; 9],
}

impl WeldSet {
    pub const NONE: WeldSet = WeldSet {
        bits: 0,
        phases: [0.0; 9],
    };

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn has(&self, link: WeldLink) -> bool {
        self.bits & link.bit() != 0
    }

    pub fn set(&mut self, link: WeldLink, on: bool) {
        if on {
            self.bits |= link.bit();
        } else {
            self.bits &= !link.bit();
        }
    }

    /// Replace the link bits, keeping animation phases.
    pub fn set_bits(&mut self, bits: u16) {
        self.bits = bits & 0x1ff;
    }

    pub fn links(&self) -> impl Iterator<Item = WeldLink> + '_ {
        WeldLink::ALL.into_iter().filter(move |l| self.has(*l))
    }

    pub fn phase(&self, link: WeldLink) -> f32 {
        self.phases[link.index()]
    }

    pub fn set_phase(&mut self, link: WeldLink, phase: f32) {
        self.phases[link.index()] = phase.clamp(0.0, 1.0);
    }

    /// Animate every phase towards 1 (linked) or 0 (unlinked).
    pub fn advance(&mut self, dt: f32, speed: f32) {
        let step = dt * speed;
        for link in WeldLink::ALL {
            let i = link.index();
            let target = if self.has(link) { 1.0 } else { 0.0 };
            let p = self.phases[i];
            self.phases[i] = if p < target {
                (p + step).min(target)
            } else {
                (p - step).max(target)
            };
        }
    }

    pub fn settle(&mut self) {
        for link in WeldLink::ALL {
            self.phases[link.index()] = if self.has(link) { 1.0 } else { 0.0 };
        }
    }

    /// Union of two halves' outward links for a merged cube.
    ///
    /// Phases come from `first` where it has the link, else from `second`.
    pub fn merged(first: &WeldSet, second: &WeldSet) -> WeldSet {
        let mut out = WeldSet {
            bits: (first.bits | second.bits) & !WeldLink::Diagonal.bit(),
            phases: [0.0; 9],
        };
        for link in WeldLink::ALL {
            let i = link.index();
            out.phases[i] = if first.has(link) {
                first.phases[i]
            } else if second.has(link) {
                second.phases[i]
            } else {
                first.phases[i].max(second.phases[i])
            };
        }
        out
    }
}

/// One of the two slots of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubCell {
    pub fill: Fill,
    pub kind: BlockKind,
    pub color: BlockColor,
    pub owner: PieceId,
    /// Gray blocks are inert: they never weld and gravity skips them.
    pub gray: bool,
    pub welds: WeldSet,
    /// Visual position (bottom-left corner, cell units); animates towards the grid.
    pub position: Vec2,
}

impl SubCell {
    pub const EMPTY: SubCell = SubCell {
        fill: Fill::Empty,
        kind: BlockKind::None,
        color: BlockColor::None,
        owner: LEVEL_OWNER,
        gray: false,
        welds: WeldSet::NONE,
        position: Vec2::ZERO,
    };

    /// Colored building block; halves get the `HalfTriangle` kind.
    pub fn block(fill: Fill, color: BlockColor, owner: PieceId) -> Self {
        let kind = if fill.is_half() {
            BlockKind::HalfTriangle
        } else {
            BlockKind::Full
        };
        SubCell {
            fill,
            kind,
            color,
            owner,
            ..SubCell::EMPTY
        }
    }

    pub fn gray_block(fill: Fill) -> Self {
        SubCell {
            gray: true,
            ..SubCell::block(fill, BlockColor::None, LEVEL_OWNER)
        }
    }

    pub fn bomb(kind: BlockKind, owner: PieceId) -> Self {
        debug_assert!(kind.is_bomb());
        SubCell {
            fill: Fill::Full,
            kind,
            owner,
            ..SubCell::EMPTY
        }
    }

    pub fn asteroid(kind: BlockKind, owner: PieceId) -> Self {
        debug_assert!(kind.is_asteroid());
        SubCell {
            fill: Fill::Full,
            kind,
            owner,
            ..SubCell::EMPTY
        }
    }

    pub fn cleared_marker() -> Self {
        SubCell {
            fill: Fill::Full,
            kind: BlockKind::ClearedRow,
            ..SubCell::EMPTY
        }
    }

    /// Same sub-cell with its visual position snapped to `pos`.
    pub fn at(mut self, pos: GridPos) -> Self {
        self.position = pos.to_vec2();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fill.is_empty()
    }

    /// Removable by explosions. Asteroids are indestructible and cleared-row
    /// markers are left for row removal.
    pub fn is_destructible(&self) -> bool {
        !self.is_empty() && !self.kind.is_asteroid() && self.kind != BlockKind::ClearedRow
    }

    /// Block identity, ignoring visual animation state.
    pub fn same_block(&self, other: &SubCell) -> bool {
        self.fill == other.fill
            && self.kind == other.kind
            && self.color == other.color
            && self.owner == other.owner
            && self.gray == other.gray
            && self.welds.bits() == other.welds.bits()
    }
}

impl Default for SubCell {
    fn default() -> Self {
        SubCell::EMPTY
    }
}

/// A grid cell: two sub-cell slots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cell {
    pub sub: [SubCell; 2],
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        sub: [SubCell::EMPTY, SubCell::EMPTY],
    };

    pub fn single(sub: SubCell) -> Self {
        Cell {
            sub: [sub, SubCell::EMPTY],
        }
    }

    /// Combined fill of both slots (two complementary halves read as `Full`).
    pub fn fill(&self) -> Fill {
        self.sub[0].fill.combine(self.sub[1].fill)
    }

    pub fn is_empty(&self) -> bool {
        self.sub[0].is_empty() && self.sub[1].is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.fill() == Fill::Full
    }

    /// Slot whose sub-cell covers `side` (a cardinal side or a corner).
    pub fn slot_filling(&self, side: Direction) -> Option<usize> {
        (0..2).find(|&s| self.sub[s].fill.fills_side(side))
    }

    /// Slot that can take a sub-cell with `fill`, if any.
    pub fn free_slot(&self, fill: Fill) -> Option<usize> {
        if fill.is_empty() {
            return None;
        }
        match (self.sub[0].is_empty(), self.sub[1].is_empty()) {
            (true, true) => Some(0),
            (true, false) if fill.is_complementary(self.sub[1].fill) => Some(0),
            (false, true) if fill.is_complementary(self.sub[0].fill) => Some(1),
            _ => None,
        }
    }

    pub fn occupied(&self) -> impl Iterator<Item = (usize, &SubCell)> + '_ {
        self.sub.iter().enumerate().filter(|(_, s)| !s.is_empty())
    }

    pub fn any(&self, pred: impl Fn(&SubCell) -> bool) -> bool {
        self.sub.iter().any(|s| !s.is_empty() && pred(s))
    }

    pub fn has_gray(&self) -> bool {
        self.any(|s| s.gray)
    }

    pub fn is_cleared_marker(&self) -> bool {
        self.sub[0].kind == BlockKind::ClearedRow
    }

    /// Whether this position counts towards a full row.
    ///
    /// Level bombs and asteroids never complete a row.
    pub fn counts_for_row(&self) -> bool {
        self.is_full()
            && !self.any(|s| {
                s.kind == BlockKind::LevelBomb
                    || s.kind.is_asteroid()
                    || s.kind == BlockKind::ClearedRow
            })
    }

    pub fn same_blocks(&self, other: &Cell) -> bool {
        self.sub[0].same_block(&other.sub[0]) && self.sub[1].same_block(&other.sub[1])
    }
}

/// Address of one sub-cell slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubCellRef {
    pub pos: GridPos,
    pub slot: usize,
}

impl SubCellRef {
    pub fn new(pos: GridPos, slot: usize) -> Self {
        Self { pos, slot }
    }
}

/// The playfield.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    columns: usize,
    rows: usize,
    visible_rows: usize,
    lowest_visible_row: usize,
    cells: Vec<Cell>,
    blueprint: Option<Vec<Fill>>,
    previous_grid: Option<Vec<Cell>>,
    initial_level_blocks: usize,
}

impl Field {
    /// Create an empty field. Dimensions are clamped to the supported range.
    pub fn new(columns: usize, rows: usize, visible_rows: usize) -> Self {
        let columns = columns.clamp(1, MAX_NUM_COLUMNS);
        let rows = rows.clamp(1, MAX_NUM_ROWS);
        let visible_rows = visible_rows.clamp(1, rows);
        Self {
            columns,
            rows,
            visible_rows,
            lowest_visible_row: 0,
            cells: vec![Cell::EMPTY; columns * rows],
            blueprint: None,
            previous_grid: None,
            initial_level_blocks: 0,
        }
    }

    /// Build a field from an ASCII picture, first string = top row.
    ///
    /// Legend: `.` empty, `r g b y p o` colored blocks, `X` gray block,
    /// `*` point bomb, `=` row bomb, `L` level bomb, `A` big asteroid,
    /// `M` big asteroid main cell, `a` small asteroid, `-` cleared-row marker.
    pub fn from_ascii(rows: &[&str]) -> Result<Field, LevelError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 || height == 0 || width > MAX_NUM_COLUMNS || height > MAX_NUM_ROWS {
            return Err(LevelError::BadDimensions {
                columns: width,
                rows: height,
            });
        }
        let mut field = Field::new(width, height, height);
        field.fill_from_ascii(rows)?;
        field.initial_level_blocks = field.level_block_count();
        Ok(field)
    }

    /// Paint ASCII rows onto the bottom of the field (last string = row 0).
    pub(crate) fn fill_from_ascii<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<(), LevelError> {
        if rows.len() > self.rows {
            return Err(LevelError::TooManyRows {
                found: rows.len(),
                rows: self.rows,
            });
        }
        for (i, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let row = rows.len() - 1 - i;
            let found = line.chars().count();
            if found != self.columns {
                return Err(LevelError::RowWidth {
                    row,
                    expected: self.columns,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let pos = GridPos::new(col as i32, row as i32);
                let sub = match ascii_sub_cell(ch) {
                    Some(sub) => sub,
                    None => return Err(LevelError::UnknownCell { ch, row, col }),
                };
                if let Some(idx) = self.index(pos) {
                    self.cells[idx] = if sub.is_empty() {
                        Cell::EMPTY
                    } else {
                        Cell::single(sub.at(pos))
                    };
                }
            }
        }
        Ok(())
    }

    /// Render as ASCII (first string = top row).
    ///
    /// Half cells render as `/` or `\` along their hypotenuse, nested pairs as `#`.
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.rows as i32)
            .rev()
            .map(|row| {
                (0..self.columns as i32)
                    .map(|col| match self.cell(GridPos::new(col, row)) {
                        Some(cell) => ascii_char(cell),
                        None => '?',
                    })
                    .collect()
            })
            .collect()
    }

    #[inline(always)]
    pub fn index(&self, pos: GridPos) -> Option<usize> {
        if pos.col < 0
            || pos.row < 0
            || pos.col >= self.columns as i32
            || pos.row >= self.rows as i32
        {
            return None;
        }
        Some(pos.row as usize * self.columns + pos.col as usize)
    }

    pub fn pos_of(&self, index: usize) -> GridPos {
        GridPos::new(
            (index % self.columns) as i32,
            (index / self.columns) as i32,
        )
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn lowest_visible_row(&self) -> usize {
        self.lowest_visible_row
    }

    /// First row above the visible window.
    pub fn top_visible_row(&self) -> usize {
        (self.lowest_visible_row + self.visible_rows).min(self.rows)
    }

    pub fn window_rows(&self) -> Range<i32> {
        self.lowest_visible_row as i32..self.top_visible_row() as i32
    }

    pub fn is_in_window(&self, row: i32) -> bool {
        self.window_rows().contains(&row)
    }

    /// Scroll the window. Clamped so the window stays inside the grid.
    pub fn set_lowest_visible_row(&mut self, row: usize) {
        let max = self.rows.saturating_sub(self.visible_rows);
        self.lowest_visible_row = row.min(max);
        debug!("visible window now starts at row {}", self.lowest_visible_row);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    pub fn sub_cell(&self, r: SubCellRef) -> Option<&SubCell> {
        self.cell(r.pos).and_then(|c| c.sub.get(r.slot))
    }

    pub fn sub_cell_mut(&mut self, r: SubCellRef) -> Option<&mut SubCell> {
        self.cell_mut(r.pos).and_then(|c| c.sub.get_mut(r.slot))
    }

    /// Flat index of a sub-cell slot (`cell index * 2 + slot`).
    pub fn slot_index(&self, r: SubCellRef) -> Option<usize> {
        if r.slot > 1 {
            return None;
        }
        self.index(r.pos).map(|i| i * 2 + r.slot)
    }

    /// Put a sub-cell into the compatible free slot of `pos`.
    ///
    /// Returns `false` if out of bounds or the cell has no room for this fill.
    pub fn place(&mut self, pos: GridPos, sub: SubCell) -> bool {
        let Some(cell) = self.cell_mut(pos) else {
            return false;
        };
        match cell.free_slot(sub.fill) {
            Some(slot) => {
                cell.sub[slot] = sub;
                true
            }
            None => false,
        }
    }

    /// Remove and return the whole cell at `pos`.
    pub fn take_cell(&mut self, pos: GridPos) -> Cell {
        let taken = match self.cell_mut(pos) {
            Some(cell) => std::mem::replace(cell, Cell::EMPTY),
            None => return Cell::EMPTY,
        };
        if !taken.is_empty() {
            self.detach_welds_into(pos);
        }
        taken
    }

    /// Remove every destructible sub-cell at `pos`, leaving asteroids in place.
    pub fn take_destructible(&mut self, pos: GridPos) -> ArrayVec<SubCell, 2> {
        let mut removed = ArrayVec::new();
        let Some(cell) = self.cell_mut(pos) else {
            return removed;
        };
        for slot in 0..2 {
            if cell.sub[slot].is_destructible() {
                removed.push(std::mem::replace(&mut cell.sub[slot], SubCell::EMPTY));
            }
        }
        if !removed.is_empty() {
            self.detach_welds_into(pos);
        }
        removed
    }

    /// Number of non-empty cells.
    pub fn occupied_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_row_full(&self, row: i32) -> bool {
        if row < 0 || row >= self.rows as i32 {
            return false;
        }
        let start = row as usize * self.columns;
        self.cells[start..start + self.columns]
            .iter()
            .all(Cell::counts_for_row)
    }

    /// Full rows inside the visible window, bottom to top.
    pub fn full_rows(&self) -> Vec<i32> {
        self.window_rows().filter(|&r| self.is_row_full(r)).collect()
    }

    pub fn row_has(&self, row: i32, pred: impl Fn(&SubCell) -> bool) -> bool {
        (0..self.columns as i32).any(|col| {
            self.cell(GridPos::new(col, row))
                .is_some_and(|c| c.any(&pred))
        })
    }

    /// Replace every cell of the given rows with a cleared-row marker.
    ///
    /// Returns the removed sub-cells in row order for flying-block effects.
    pub fn clear_rows(&mut self, rows: &[i32]) -> Vec<ClearedCell> {
        let mut cleared = Vec::new();
        for &row in rows {
            if row < 0 || row >= self.rows as i32 {
                continue;
            }
            for col in 0..self.columns as i32 {
                let pos = GridPos::new(col, row);
                let cell = self.take_cell(pos);
                for (_, sub) in cell.occupied() {
                    if sub.kind == BlockKind::ClearedRow {
                        continue;
                    }
                    cleared.push(ClearedCell {
                        pos,
                        fill: sub.fill,
                        color: sub.color,
                        gray: sub.gray,
                        position: sub.position,
                    });
                }
                if let Some(c) = self.cell_mut(pos) {
                    *c = Cell::single(SubCell::cleared_marker().at(pos));
                }
            }
            trace!("row {} marked cleared", row);
        }
        cleared
    }

    fn is_cleared_row(&self, row: usize) -> bool {
        let start = row * self.columns;
        self.cells[start..start + self.columns]
            .iter()
            .all(Cell::is_cleared_marker)
    }

    /// Compact away every fully cleared row at or above the window bottom.
    ///
    /// Rows above a removed row shift down by one per removed row; new rows at
    /// the top are empty. Returns the removed row indices, bottom to top.
    pub fn remove_cleared_rows(&mut self) -> Vec<i32> {
        let width = self.columns;
        let mut removed = Vec::new();
        let mut write = self.lowest_visible_row;

        for read in self.lowest_visible_row..self.rows {
            if self.is_cleared_row(read) {
                removed.push(read as i32);
            } else {
                if write != read {
                    let src = read * width;
                    self.cells.copy_within(src..src + width, write * width);
                }
                write += 1;
            }
        }

        for cell in &mut self.cells[write * width..] {
            *cell = Cell::EMPTY;
        }

        if !removed.is_empty() {
            debug!("removed {} cleared row(s): {:?}", removed.len(), removed);
        }
        removed
    }

    pub fn has_previous_grid(&self) -> bool {
        self.previous_grid.is_some()
    }

    /// Keep a copy of the grid for a single undo.
    pub fn save_previous_grid(&mut self) {
        self.previous_grid = Some(self.cells.clone());
    }

    /// Restore (and consume) the saved grid. Returns `false` if none was saved.
    pub fn restore_previous_grid(&mut self) -> bool {
        match self.previous_grid.take() {
            Some(cells) => {
                self.cells = cells;
                true
            }
            None => false,
        }
    }

    pub fn discard_previous_grid(&mut self) {
        self.previous_grid = None;
    }

    /// Compare block layout with another field, ignoring animation state.
    pub fn layout_eq(&self, other: &Field) -> bool {
        self.columns == other.columns
            && self.rows == other.rows
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a.same_blocks(b))
    }

    pub fn blueprint(&self) -> Option<&[Fill]> {
        self.blueprint.as_deref()
    }

    pub fn set_blueprint(&mut self, blueprint: Option<Vec<Fill>>) {
        self.blueprint = blueprint.filter(|b| b.len() == self.cells.len());
    }

    pub fn blueprint_fill(&self, pos: GridPos) -> Fill {
        match (self.blueprint.as_ref(), self.index(pos)) {
            (Some(bp), Some(i)) => bp[i],
            _ => Fill::Empty,
        }
    }

    /// Advance weld phases and pull visual positions towards their cells.
    pub fn advance_visuals(&mut self, dt: f32, config: &SimulationConfig) {
        let columns = self.columns;
        let max_step = dt * config.block_fall_anim_speed;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let target = Vec2::new((i % columns) as f32, (i / columns) as f32);
            for sub in cell.sub.iter_mut().filter(|s| !s.is_empty()) {
                sub.welds.advance(dt, config.weld_anim_speed);
                sub.position = sub.position.approach(target, max_step);
            }
        }
    }

    /// Snap all animation state to its resting value.
    pub fn settle_visuals(&mut self) {
        let columns = self.columns;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let target = Vec2::new((i % columns) as f32, (i / columns) as f32);
            for sub in cell.sub.iter_mut().filter(|s| !s.is_empty()) {
                sub.welds.settle();
                sub.position = target;
            }
        }
    }

    /// Position of the big asteroid's main cell, if any.
    pub fn asteroid_main_pos(&self) -> Option<GridPos> {
        self.cells
            .iter()
            .position(|c| c.any(|s| s.kind == BlockKind::BigAsteroidMain))
            .map(|i| self.pos_of(i))
    }

    /// Remaining building blocks (gray included) authored by the level.
    pub fn level_block_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|c| c.sub.iter())
            .filter(|s| s.kind.is_block() && s.owner == LEVEL_OWNER)
            .count()
    }

    /// Level blocks present when the level was loaded.
    pub fn initial_level_blocks(&self) -> usize {
        self.initial_level_blocks
    }

    pub(crate) fn set_initial_level_blocks(&mut self, count: usize) {
        self.initial_level_blocks = count;
    }
}

fn ascii_sub_cell(ch: char) -> Option<SubCell> {
    let sub = match ch {
        '.' | ' ' => SubCell::EMPTY,
        'X' => SubCell::gray_block(Fill::Full),
        '*' => SubCell::bomb(BlockKind::PointBomb, LEVEL_OWNER),
        '=' => SubCell::bomb(BlockKind::RowBomb, LEVEL_OWNER),
        'L' => SubCell::bomb(BlockKind::LevelBomb, LEVEL_OWNER),
        'A' => SubCell::asteroid(BlockKind::BigAsteroid, LEVEL_OWNER),
        'M' => SubCell::asteroid(BlockKind::BigAsteroidMain, LEVEL_OWNER),
        'a' => SubCell::asteroid(BlockKind::SmallAsteroid, LEVEL_OWNER),
        '-' => SubCell::cleared_marker(),
        c => SubCell::block(Fill::Full, BlockColor::from_char(c)?, LEVEL_OWNER),
    };
    Some(sub)
}

fn ascii_char(cell: &Cell) -> char {
    if cell.is_empty() {
        return '.';
    }
    let first = cell.occupied().map(|(_, s)| *s).next().unwrap_or(SubCell::EMPTY);
    if cell.sub[0].fill.is_half() && cell.sub[1].fill.is_half() {
        return '#';
    }
    if first.fill.is_half() {
        return match first.fill {
            Fill::LowerLeft | Fill::UpperRight => '/',
            _ => '\\',
        };
    }
    match first.kind {
        BlockKind::PointBomb => '*',
        BlockKind::RowBomb => '=',
        BlockKind::LevelBomb => 'L',
        BlockKind::BigAsteroid => 'A',
        BlockKind::BigAsteroidMain => 'M',
        BlockKind::SmallAsteroid => 'a',
        BlockKind::ClearedRow => '-',
        _ if first.gray => 'X',
        _ => first.color.as_char(),
    }
}
