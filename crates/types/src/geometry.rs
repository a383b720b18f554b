//! Grid coordinates, continuous positions and the eight neighbour directions.
//!
//! Row 0 is the bottom of the field and rows grow upwards, so `Direction::N`
//! has a delta of `(0, +1)`.

use std::ops::{Add, Sub};

/// Integer cell coordinate (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Neighbouring position one step in `dir`.
    pub fn step(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        Self::new(self.col + dc, self.row + dr)
    }

    pub fn offset(self, dc: i32, dr: i32) -> Self {
        Self::new(self.col + dc, self.row + dr)
    }

    /// Cell center in continuous field coordinates.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.col as f32 + 0.5, self.row as f32 + 0.5)
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.col as f32, self.row as f32)
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.col + rhs.col, self.row + rhs.row)
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.col - rhs.col, self.row - rhs.row)
    }
}

/// Continuous position in cell units (x = column, y = row).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Move towards `target` by at most `max_step`, snapping when close enough.
    pub fn approach(self, target: Vec2, max_step: f32) -> Vec2 {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_step || dist <= f32::EPSILON {
            target
        } else {
            let k = max_step / dist;
            Vec2::new(self.x + delta.x * k, self.y + delta.y * k)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// The eight neighbour directions, clockwise from north.
///
/// The discriminant doubles as the weld bit index (see `WeldSet` in core).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub const CARDINAL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub const CORNERS: [Direction; 4] =
        [Direction::NE, Direction::SE, Direction::SW, Direction::NW];

    /// (column, row) step for this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::N => (0, 1),
            Direction::NE => (1, 1),
            Direction::E => (1, 0),
            Direction::SE => (1, -1),
            Direction::S => (0, -1),
            Direction::SW => (-1, -1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        Direction::ALL[(self as usize + 4) % 8]
    }

    pub fn is_cardinal(self) -> bool {
        (self as usize) % 2 == 0
    }

    /// Two cardinal sides that meet at a corner direction (vertical first).
    ///
    /// Cardinal directions return themselves twice.
    pub fn corner_sides(self) -> (Direction, Direction) {
        match self {
            Direction::NE => (Direction::N, Direction::E),
            Direction::SE => (Direction::S, Direction::E),
            Direction::SW => (Direction::S, Direction::W),
            Direction::NW => (Direction::N, Direction::W),
            cardinal => (cardinal, cardinal),
        }
    }

    pub fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::N => "n",
            Direction::NE => "ne",
            Direction::E => "e",
            Direction::SE => "se",
            Direction::S => "s",
            Direction::SW => "sw",
            Direction::W => "w",
            Direction::NW => "nw",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dc, dr) = dir.delta();
            let (oc, or) = dir.opposite().delta();
            assert_eq!((dc + oc, dr + or), (0, 0));
        }
    }

    #[test]
    fn test_corner_sides() {
        assert_eq!(Direction::NE.corner_sides(), (Direction::N, Direction::E));
        assert_eq!(Direction::SW.corner_sides(), (Direction::S, Direction::W));
        assert!(Direction::CARDINAL.iter().all(|d| d.is_cardinal()));
        assert!(Direction::CORNERS.iter().all(|d| !d.is_cardinal()));
    }

    #[test]
    fn test_vec2_approach_snaps() {
        let p = Vec2::new(0.0, 5.0);
        let t = Vec2::new(0.0, 3.0);
        assert_eq!(p.approach(t, 0.5), Vec2::new(0.0, 4.5));
        assert_eq!(p.approach(t, 10.0), t);
    }
}
