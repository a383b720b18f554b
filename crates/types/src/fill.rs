//! Sub-cell fill shapes.
//!
//! A half fill is named after the corner holding its right angle:
//! `LowerLeft` covers the bottom and left sides of the cell, and so on.
//! Two complementary halves (`LowerLeft`/`UpperRight`, `LowerRight`/`UpperLeft`)
//! share one cell and together behave as `Full`.

use crate::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Fill {
    #[default]
    Empty,
    Full,
    LowerLeft,
    LowerRight,
    UpperLeft,
    UpperRight,
}

impl Fill {
    pub const ALL: [Fill; 6] = [
        Fill::Empty,
        Fill::Full,
        Fill::LowerLeft,
        Fill::LowerRight,
        Fill::UpperLeft,
        Fill::UpperRight,
    ];

    /// Index into the 6x6 intersection tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_empty(self) -> bool {
        self == Fill::Empty
    }

    pub fn is_half(self) -> bool {
        matches!(
            self,
            Fill::LowerLeft | Fill::LowerRight | Fill::UpperLeft | Fill::UpperRight
        )
    }

    /// Whether this fill covers the given cardinal side of its cell.
    ///
    /// Corner directions are answered through [`Fill::fills_corner`].
    pub fn fills_side(self, side: Direction) -> bool {
        if !side.is_cardinal() {
            return self.fills_corner(side);
        }
        match self {
            Fill::Empty => false,
            Fill::Full => true,
            Fill::LowerLeft => matches!(side, Direction::S | Direction::W),
            Fill::LowerRight => matches!(side, Direction::S | Direction::E),
            Fill::UpperLeft => matches!(side, Direction::N | Direction::W),
            Fill::UpperRight => matches!(side, Direction::N | Direction::E),
        }
    }

    /// A corner is filled when both sides meeting at it are filled.
    pub fn fills_corner(self, corner: Direction) -> bool {
        let (a, b) = corner.corner_sides();
        self.fills_side(a) && self.fills_side(b)
    }

    pub fn complement(self) -> Fill {
        match self {
            Fill::Empty => Fill::Full,
            Fill::Full => Fill::Empty,
            Fill::LowerLeft => Fill::UpperRight,
            Fill::UpperRight => Fill::LowerLeft,
            Fill::LowerRight => Fill::UpperLeft,
            Fill::UpperLeft => Fill::LowerRight,
        }
    }

    pub fn is_complementary(self, other: Fill) -> bool {
        self.is_half() && other == self.complement()
    }

    /// Fill of a cell holding both `self` and `other`.
    pub fn combine(self, other: Fill) -> Fill {
        match (self, other) {
            (Fill::Empty, f) | (f, Fill::Empty) => f,
            (a, b) if a.is_complementary(b) => Fill::Full,
            // Overlapping halves never coexist in a valid grid; treat as solid.
            _ => Fill::Full,
        }
    }

    pub fn rotate_cw(self) -> Fill {
        match self {
            Fill::LowerLeft => Fill::UpperLeft,
            Fill::UpperLeft => Fill::UpperRight,
            Fill::UpperRight => Fill::LowerRight,
            Fill::LowerRight => Fill::LowerLeft,
            other => other,
        }
    }

    pub fn rotate_ccw(self) -> Fill {
        match self {
            Fill::LowerLeft => Fill::LowerRight,
            Fill::LowerRight => Fill::UpperRight,
            Fill::UpperRight => Fill::UpperLeft,
            Fill::UpperLeft => Fill::LowerLeft,
            other => other,
        }
    }

    /// Fraction of the cell area covered.
    pub fn area(self) -> f32 {
        match self {
            Fill::Empty => 0.0,
            Fill::Full => 1.0,
            _ => 0.5,
        }
    }
}

/// Direction a shape is being moved in while probing for collisions.
///
/// `Static` checks a placement without motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanDirection {
    Down,
    Left,
    Right,
    Static,
}

impl ScanDirection {
    /// Side of the moving sub-cell that trails the motion.
    pub fn trailing_side(self) -> Option<Direction> {
        match self {
            ScanDirection::Down => Some(Direction::N),
            ScanDirection::Left => Some(Direction::E),
            ScanDirection::Right => Some(Direction::W),
            ScanDirection::Static => None,
        }
    }
}

/// Outcome of probing one sub-cell pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intersection {
    No,
    Yes,
    /// Free now, but one more step in the scan direction collides.
    NextWillBe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halves_cover_two_sides() {
        for fill in Fill::ALL.iter().copied().filter(|f| f.is_half()) {
            let sides = Direction::CARDINAL
                .iter()
                .filter(|s| fill.fills_side(**s))
                .count();
            assert_eq!(sides, 2, "{:?}", fill);
            let corners = Direction::CORNERS
                .iter()
                .filter(|c| fill.fills_corner(**c))
                .count();
            assert_eq!(corners, 1, "{:?}", fill);
        }
    }

    #[test]
    fn test_complement_partitions_sides() {
        for fill in [Fill::LowerLeft, Fill::LowerRight, Fill::UpperLeft, Fill::UpperRight] {
            let other = fill.complement();
            assert!(fill.is_complementary(other));
            for side in Direction::CARDINAL {
                assert_ne!(fill.fills_side(side), other.fills_side(side));
            }
            assert_eq!(fill.combine(other), Fill::Full);
        }
    }

    #[test]
    fn test_rotation_cycle() {
        let mut fill = Fill::LowerLeft;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(fill);
            assert_eq!(fill.rotate_cw().rotate_ccw(), fill);
            fill = fill.rotate_cw();
        }
        assert_eq!(fill, Fill::LowerLeft);
        assert_eq!(
            seen,
            vec![Fill::LowerLeft, Fill::UpperLeft, Fill::UpperRight, Fill::LowerRight]
        );
        assert_eq!(Fill::Full.rotate_cw(), Fill::Full);
    }
}
