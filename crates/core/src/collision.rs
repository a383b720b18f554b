//! Collision detection between a shape and the field.
//!
//! A shape is a [`PieceBlocks`] placed with its `(0, 0)` cell at an integer
//! origin. Side walls, the top of the grid and every row below the visible
//! window always collide.
//!
//! Half cells intersect through four 6x6 tables indexed by
//! `[existing fill][moving fill]`, one per [`ScanDirection`]. Two
//! complementary halves share a cell when placed statically. While scanning,
//! a moving half that fills the trailing side of the motion can slide into
//! the nest but not past it (`NextWillBe`); any other complementary pair cuts
//! through (`Yes`), except on the first step of a scan where the piece is
//! leaving a nest it already sits in.

use log::trace;

use crate::grid::Field;
use crate::pieces::PieceBlocks;
use crate::types::{
    Direction, Fill, GridPos, Intersection, ScanDirection, Vec2, MAX_NUM_COLUMNS, MAX_NUM_ROWS,
    PIECE_GRID_MAX,
};

const N: Intersection = Intersection::No;
const Y: Intersection = Intersection::Yes;
const W: Intersection = Intersection::NextWillBe;

// Rows: existing fill, columns: moving fill.
// Order: Empty, Full, LowerLeft, LowerRight, UpperLeft, UpperRight.
type Table = [[Intersection; 6]; 6];

pub const INTERSECT_STATIC: Table = [
    [N, N, N, N, N, N],
    [N, Y, Y, Y, Y, Y],
    [N, Y, Y, Y, Y, N],
    [N, Y, Y, Y, N, Y],
    [N, Y, Y, N, Y, Y],
    [N, Y, N, Y, Y, Y],
];

pub const INTERSECT_DOWN: Table = [
    [N, N, N, N, N, N],
    [N, Y, Y, Y, Y, Y],
    [N, Y, Y, Y, Y, W],
    [N, Y, Y, Y, W, Y],
    [N, Y, Y, Y, Y, Y],
    [N, Y, Y, Y, Y, Y],
];

pub const INTERSECT_LEFT: Table = [
    [N, N, N, N, N, N],
    [N, Y, Y, Y, Y, Y],
    [N, Y, Y, Y, Y, W],
    [N, Y, Y, Y, Y, Y],
    [N, Y, Y, W, Y, Y],
    [N, Y, Y, Y, Y, Y],
];

pub const INTERSECT_RIGHT: Table = [
    [N, N, N, N, N, N],
    [N, Y, Y, Y, Y, Y],
    [N, Y, Y, Y, Y, Y],
    [N, Y, Y, Y, W, Y],
    [N, Y, Y, Y, Y, Y],
    [N, Y, W, Y, Y, Y],
];

fn table(scan: ScanDirection) -> &'static Table {
    match scan {
        ScanDirection::Down => &INTERSECT_DOWN,
        ScanDirection::Left => &INTERSECT_LEFT,
        ScanDirection::Right => &INTERSECT_RIGHT,
        ScanDirection::Static => &INTERSECT_STATIC,
    }
}

/// Intersection of a moving fill with the (combined) fill already in a cell.
pub fn sub_cells_intersect(
    existing: Fill,
    moving: Fill,
    scan: ScanDirection,
    is_scan_start: bool,
) -> Intersection {
    let result = table(scan)[existing.index()][moving.index()];
    if is_scan_start && result == Intersection::Yes && existing.is_complementary(moving) {
        return Intersection::No;
    }
    result
}

/// Every colliding world cell of one placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collision {
    pub points: Vec<GridPos>,
    pub is_collision: bool,
    /// No collision here, but one more step along the scan collides.
    pub next_will_be: bool,
}

impl Collision {
    pub fn intersection(&self) -> Intersection {
        if self.is_collision {
            Intersection::Yes
        } else if self.next_will_be {
            Intersection::NextWillBe
        } else {
            Intersection::No
        }
    }
}

impl Field {
    /// Probe one world cell against a moving fill.
    fn intersect_at(&self, pos: GridPos, moving: Fill, scan: ScanDirection, is_scan_start: bool) -> Intersection {
        if moving.is_empty() {
            return Intersection::No;
        }
        if pos.row < self.lowest_visible_row() as i32 {
            return Intersection::Yes;
        }
        match self.cell(pos) {
            Some(cell) => sub_cells_intersect(cell.fill(), moving, scan, is_scan_start),
            None => Intersection::Yes,
        }
    }

    pub fn check_collision(
        &self,
        shape: &PieceBlocks<'_>,
        pos: GridPos,
        scan: ScanDirection,
        is_scan_start: bool,
    ) -> Collision {
        let mut out = Collision::default();
        for (col, row, fill) in shape.cells() {
            let world = pos.offset(col, row);
            match self.intersect_at(world, fill, scan, is_scan_start) {
                Intersection::Yes => {
                    out.is_collision = true;
                    out.points.push(world);
                }
                Intersection::NextWillBe => out.next_will_be = true,
                Intersection::No => {}
            }
        }
        out
    }

    /// Static placement test.
    pub fn collides(&self, shape: &PieceBlocks<'_>, pos: GridPos) -> bool {
        shape
            .cells()
            .any(|(col, row, fill)| {
                self.intersect_at(pos.offset(col, row), fill, ScanDirection::Static, false)
                    == Intersection::Yes
            })
    }

    /// Lowest origin row reachable by moving straight down from `pos`.
    ///
    /// `None` if the shape already collides at `pos`.
    pub fn detect_collision_down(&self, shape: &PieceBlocks<'_>, pos: GridPos) -> Option<i32> {
        for step in 0..(MAX_NUM_ROWS + PIECE_GRID_MAX) as i32 {
            let p = pos.offset(0, -step);
            match self.scan_hits(shape, p, ScanDirection::Down, step == 0) {
                Intersection::Yes if step == 0 => return None,
                Intersection::Yes => return Some(p.row + 1),
                Intersection::NextWillBe => return Some(p.row),
                Intersection::No => {}
            }
        }
        trace!("down scan exhausted from {:?}", pos);
        None
    }

    /// First colliding origin column to the left of `pos`.
    ///
    /// The shape may occupy every column strictly greater than the result.
    pub fn detect_collision_left(&self, shape: &PieceBlocks<'_>, pos: GridPos) -> Option<i32> {
        self.detect_collision_sideways(shape, pos, ScanDirection::Left, -1)
    }

    /// First colliding origin column to the right of `pos`.
    pub fn detect_collision_right(&self, shape: &PieceBlocks<'_>, pos: GridPos) -> Option<i32> {
        self.detect_collision_sideways(shape, pos, ScanDirection::Right, 1)
    }

    fn detect_collision_sideways(
        &self,
        shape: &PieceBlocks<'_>,
        pos: GridPos,
        scan: ScanDirection,
        dc: i32,
    ) -> Option<i32> {
        for step in 0..(MAX_NUM_COLUMNS + PIECE_GRID_MAX + 1) as i32 {
            let p = pos.offset(dc * step, 0);
            match self.scan_hits(shape, p, scan, step == 0) {
                Intersection::Yes if step == 0 => return None,
                Intersection::Yes => return Some(p.col),
                Intersection::NextWillBe => return Some(p.col + dc),
                Intersection::No => {}
            }
        }
        None
    }

    fn scan_hits(
        &self,
        shape: &PieceBlocks<'_>,
        pos: GridPos,
        scan: ScanDirection,
        is_scan_start: bool,
    ) -> Intersection {
        let mut result = Intersection::No;
        for (col, row, fill) in shape.cells() {
            match self.intersect_at(pos.offset(col, row), fill, scan, is_scan_start) {
                Intersection::Yes => return Intersection::Yes,
                Intersection::NextWillBe => result = Intersection::NextWillBe,
                Intersection::No => {}
            }
        }
        result
    }

    /// Nearest free origin walking from `pos` towards `dir`, at most `max` steps.
    pub fn detect_free_space(
        &self,
        shape: &PieceBlocks<'_>,
        pos: GridPos,
        dir: Direction,
        max: i32,
    ) -> Option<GridPos> {
        let (dc, dr) = dir.delta();
        (1..=max.max(0))
            .map(|k| pos.offset(dc * k, dr * k))
            .find(|p| !self.collides(shape, *p))
    }

    pub fn detect_free_space_up(&self, shape: &PieceBlocks<'_>, pos: GridPos, max: i32) -> Option<GridPos> {
        self.detect_free_space(shape, pos, Direction::N, max)
    }

    pub fn detect_free_space_down(&self, shape: &PieceBlocks<'_>, pos: GridPos, max: i32) -> Option<GridPos> {
        self.detect_free_space(shape, pos, Direction::S, max)
    }

    pub fn detect_free_space_left(&self, shape: &PieceBlocks<'_>, pos: GridPos, max: i32) -> Option<GridPos> {
        self.detect_free_space(shape, pos, Direction::W, max)
    }

    pub fn detect_free_space_right(&self, shape: &PieceBlocks<'_>, pos: GridPos, max: i32) -> Option<GridPos> {
        self.detect_free_space(shape, pos, Direction::E, max)
    }

    /// Occupied or out-of-window cells in the inclusive rectangle `min..=max`.
    pub fn occupied_area(&self, min: GridPos, max: GridPos) -> usize {
        let mut count = 0;
        for row in min.row..=max.row {
            for col in min.col..=max.col {
                let pos = GridPos::new(col, row);
                let blocked = row < self.lowest_visible_row() as i32
                    || self.cell(pos).map_or(true, |c| !c.is_empty());
                if blocked {
                    count += 1;
                }
            }
        }
        count
    }

    /// Cardinal side of the shape that the collision points sit on.
    ///
    /// Compares the centroid of the collision points with the centroid of the
    /// shape cells; an exact tie falls back to the occupied area of each half
    /// of the shape's bounding box (preferring S, W, E, N).
    pub fn dominant_collision_direction(
        &self,
        shape: &PieceBlocks<'_>,
        pos: GridPos,
        collision: &Collision,
    ) -> Direction {
        let hit = centroid(collision.points.iter().copied());
        let body = centroid(shape.cells().map(|(c, r, _)| pos.offset(c, r)));
        let (dx, dy) = (hit.x - body.x, hit.y - body.y);
        const EPS: f32 = 1e-4;

        if dx.abs() > dy.abs() + EPS {
            return if dx > 0.0 { Direction::E } else { Direction::W };
        }
        if dy.abs() > dx.abs() + EPS {
            return if dy > 0.0 { Direction::N } else { Direction::S };
        }

        let Some(ext) = shape.extent() else {
            return Direction::S;
        };
        let min = pos.offset(ext.min_col, ext.min_row);
        let max = pos.offset(ext.max_col, ext.max_row);
        let half_h = (max.row - min.row + 2) / 2;
        let half_w = (max.col - min.col + 2) / 2;
        let strips = [
            (Direction::S, min, GridPos::new(max.col, min.row + half_h - 1)),
            (Direction::W, min, GridPos::new(min.col + half_w - 1, max.row)),
            (Direction::E, GridPos::new(max.col - half_w + 1, min.row), max),
            (Direction::N, GridPos::new(min.col, max.row - half_h + 1), max),
        ];
        let mut best = (Direction::S, 0usize);
        for (dir, lo, hi) in strips {
            let area = self.occupied_area(lo, hi);
            if area > best.1 {
                best = (dir, area);
            }
        }
        best.0
    }

    /// Wall-kick for a freshly rotated shape.
    ///
    /// Returns the origin to use, or `None` when the rotation is rejected:
    /// the shift needed exceeds `max_adjust`, or a half of the shape would
    /// end up nested against a half already in the field.
    pub fn resolve_rotation(
        &self,
        shape: &PieceBlocks<'_>,
        pos: GridPos,
        max_adjust: i32,
    ) -> Option<GridPos> {
        let collision = self.check_collision(shape, pos, ScanDirection::Static, false);
        let target = if collision.is_collision {
            let dir = self.dominant_collision_direction(shape, pos, &collision);
            let kicked = self.detect_free_space(shape, pos, dir.opposite(), max_adjust)?;
            trace!("rotation kicked {:?} -> {:?} (hit {:?})", pos, kicked, dir);
            kicked
        } else {
            pos
        };
        if self.is_tilted_nest(shape, target) {
            trace!("rotation rejected: tilted nest at {:?}", target);
            return None;
        }
        Some(target)
    }

    fn is_tilted_nest(&self, shape: &PieceBlocks<'_>, pos: GridPos) -> bool {
        shape.cells().any(|(c, r, fill)| {
            fill.is_half()
                && self
                    .cell(pos.offset(c, r))
                    .is_some_and(|cell| !cell.is_empty())
        })
    }

    /// Bomb cells directly beneath the bottom edge of a landing shape.
    pub fn detect_impacted_bombs(&self, shape: &PieceBlocks<'_>, pos: GridPos) -> Vec<GridPos> {
        let mut out = Vec::new();
        for (col, row, fill) in shape.cells() {
            if !fill.fills_side(Direction::S) || shape.get(col, row - 1).fills_side(Direction::N) {
                continue;
            }
            let below = pos.offset(col, row - 1);
            if !self.is_in_window(below.row) {
                continue;
            }
            let hit = self
                .cell(below)
                .is_some_and(|cell| cell.any(|s| s.kind.is_bomb()));
            if hit && !out.contains(&below) {
                out.push(below);
            }
        }
        out
    }
}

fn centroid(points: impl Iterator<Item = GridPos>) -> Vec2 {
    let (mut sum, mut n) = (Vec2::ZERO, 0usize);
    for p in points {
        sum = sum + p.center();
        n += 1;
    }
    if n == 0 {
        return Vec2::ZERO;
    }
    Vec2::new(sum.x / n as f32, sum.y / n as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceBlocks;

    const HALVES: [Fill; 4] = [Fill::LowerLeft, Fill::LowerRight, Fill::UpperLeft, Fill::UpperRight];

    #[test]
    fn test_tables_empty_and_full() {
        for scan in [ScanDirection::Down, ScanDirection::Left, ScanDirection::Right, ScanDirection::Static] {
            for f in Fill::ALL {
                assert_eq!(sub_cells_intersect(Fill::Empty, f, scan, false), Intersection::No);
                assert_eq!(sub_cells_intersect(f, Fill::Empty, scan, false), Intersection::No);
                if !f.is_empty() {
                    assert_eq!(sub_cells_intersect(Fill::Full, f, scan, false), Intersection::Yes);
                    assert_eq!(sub_cells_intersect(f, Fill::Full, scan, false), Intersection::Yes);
                }
            }
        }
    }

    #[test]
    fn test_complementary_pairs_follow_trailing_side() {
        for scan in [ScanDirection::Down, ScanDirection::Left, ScanDirection::Right] {
            let trailing = scan.trailing_side().unwrap();
            for existing in HALVES {
                let moving = existing.complement();
                let expected = if moving.fills_side(trailing) {
                    Intersection::NextWillBe
                } else {
                    Intersection::Yes
                };
                assert_eq!(sub_cells_intersect(existing, moving, scan, false), expected);
                let start = sub_cells_intersect(existing, moving, scan, true);
                assert_ne!(start, Intersection::Yes);
            }
        }
    }

    #[test]
    fn test_overlapping_halves_always_collide() {
        for scan in [ScanDirection::Down, ScanDirection::Left, ScanDirection::Right, ScanDirection::Static] {
            for a in HALVES {
                for b in HALVES.iter().copied().filter(|b| !a.is_complementary(*b)) {
                    assert_eq!(sub_cells_intersect(a, b, scan, true), Intersection::Yes);
                }
            }
        }
    }

    #[test]
    fn test_down_scan_lands_on_floor_and_blocks() {
        let field = Field::from_ascii(&["....", "....", "....", "..r.", "...."]).unwrap();
        let fills = [Fill::Full];
        let dot = PieceBlocks::new(&fills, 1, 1);
        assert_eq!(field.detect_collision_down(&dot, GridPos::new(0, 4)), Some(0));
        assert_eq!(field.detect_collision_down(&dot, GridPos::new(2, 4)), Some(2));
        assert_eq!(field.detect_collision_down(&dot, GridPos::new(2, 1)), None);
    }

    #[test]
    fn test_half_nests_into_complementary_half() {
        let mut field = Field::new(3, 4, 4);
        field.place(GridPos::new(1, 0), crate::grid::SubCell::block(Fill::LowerLeft, crate::types::BlockColor::Red, 1));
        let ur = [Fill::UpperRight];
        let piece = PieceBlocks::new(&ur, 1, 1);
        assert_eq!(field.detect_collision_down(&piece, GridPos::new(1, 3)), Some(0));

        let lr = [Fill::LowerRight];
        let piece = PieceBlocks::new(&lr, 1, 1);
        assert_eq!(field.detect_collision_down(&piece, GridPos::new(1, 3)), Some(1));
    }

    #[test]
    fn test_sideways_boundaries() {
        let field = Field::from_ascii(&["r....g"]).unwrap();
        let fills = [Fill::Full];
        let dot = PieceBlocks::new(&fills, 1, 1);
        assert_eq!(field.detect_collision_left(&dot, GridPos::new(3, 0)), Some(0));
        assert_eq!(field.detect_collision_right(&dot, GridPos::new(3, 0)), Some(5));
        assert_eq!(field.detect_collision_left(&dot, GridPos::new(0, 0)), None);
    }

    #[test]
    fn test_rows_below_window_collide() {
        let mut field = Field::new(4, 6, 4);
        field.set_lowest_visible_row(2);
        let fills = [Fill::Full];
        let dot = PieceBlocks::new(&fills, 1, 1);
        assert!(field.collides(&dot, GridPos::new(0, 1)));
        assert!(!field.collides(&dot, GridPos::new(0, 2)));
        assert_eq!(field.detect_collision_down(&dot, GridPos::new(0, 5)), Some(2));
    }

    #[test]
    fn test_occupied_area_counts_walls() {
        let field = Field::from_ascii(&["r..", "gg."]).unwrap();
        assert_eq!(field.occupied_area(GridPos::new(0, 0), GridPos::new(2, 1)), 3);
        assert_eq!(field.occupied_area(GridPos::new(-1, 0), GridPos::new(-1, 1)), 2);
    }

    #[test]
    fn test_impacted_bombs_under_bottom_edge() {
        let field = Field::from_ascii(&["....", "*.=."]).unwrap();
        let fills = [Fill::Full, Fill::Full, Fill::Full, Fill::Empty];
        let shape = PieceBlocks::new(&fills, 4, 1);
        let hits = field.detect_impacted_bombs(&shape, GridPos::new(0, 1));
        assert_eq!(hits, vec![GridPos::new(0, 0), GridPos::new(2, 0)]);
    }
}
