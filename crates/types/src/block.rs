//! Block kinds, colors, piece kinds and rotations.

/// What a sub-cell is, independent of its fill shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockKind {
    #[default]
    None,
    Full,
    PointBomb,
    RowBomb,
    LevelBomb,
    BigAsteroid,
    BigAsteroidMain,
    SmallAsteroid,
    HalfTriangle,
    /// Marker left behind by a cleared row until the row is removed.
    ClearedRow,
}

impl BlockKind {
    pub fn is_bomb(self) -> bool {
        self.detonation().is_some()
    }

    /// Detonation started when a bomb of this kind goes off.
    pub fn detonation(self) -> Option<DetonationKind> {
        match self {
            BlockKind::PointBomb => Some(DetonationKind::Point),
            BlockKind::RowBomb => Some(DetonationKind::Row),
            BlockKind::LevelBomb => Some(DetonationKind::Level),
            _ => None,
        }
    }

    pub fn is_asteroid(self) -> bool {
        matches!(
            self,
            BlockKind::BigAsteroid | BlockKind::BigAsteroidMain | BlockKind::SmallAsteroid
        )
    }

    /// Ordinary colored building blocks.
    pub fn is_block(self) -> bool {
        matches!(self, BlockKind::Full | BlockKind::HalfTriangle)
    }
}

/// Block palette. `None` marks colorless cells (bombs, asteroids, markers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockColor {
    #[default]
    None,
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl BlockColor {
    pub const PALETTE: [BlockColor; 6] = [
        BlockColor::Red,
        BlockColor::Green,
        BlockColor::Blue,
        BlockColor::Yellow,
        BlockColor::Purple,
        BlockColor::Orange,
    ];

    /// Number of colors including `None`, for per-color tallies.
    pub const COUNT: usize = 7;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'r' => Some(BlockColor::Red),
            'g' => Some(BlockColor::Green),
            'b' => Some(BlockColor::Blue),
            'y' => Some(BlockColor::Yellow),
            'p' => Some(BlockColor::Purple),
            'o' => Some(BlockColor::Orange),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            BlockColor::None => '?',
            BlockColor::Red => 'r',
            BlockColor::Green => 'g',
            BlockColor::Blue => 'b',
            BlockColor::Yellow => 'y',
            BlockColor::Purple => 'p',
            BlockColor::Orange => 'o',
        }
    }
}

/// Explosion behaviour of a detonating bomb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DetonationKind {
    /// Single-cell bomb, grows a corner-exclusive ring.
    Point,
    /// 2x2 bomb piece, corner-inclusive.
    Big,
    /// Level-placed bomb, corner-inclusive, short reach.
    Level,
    /// Laser that sweeps its whole row.
    Row,
}

impl DetonationKind {
    /// Maximum ring distance for area detonations (0 for the row laser).
    pub fn max_reach(self) -> i32 {
        match self {
            DetonationKind::Point => crate::POINT_BOMB_REACH,
            DetonationKind::Big => crate::BIG_BOMB_REACH,
            DetonationKind::Level => crate::LEVEL_BOMB_REACH,
            DetonationKind::Row => 0,
        }
    }

    pub fn corner_inclusive(self) -> bool {
        matches!(self, DetonationKind::Big | DetonationKind::Level)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetonationKind::Point => "point",
            DetonationKind::Big => "big",
            DetonationKind::Level => "level",
            DetonationKind::Row => "row",
        }
    }
}

/// Shapes available to levels.
///
/// The seven classic tetrominoes, a single block, three triangle pieces and
/// three bomb pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
    Dot,
    Wedge,
    Ramp,
    Roof,
    PointBomb,
    BigBomb,
    RowBomb,
}

impl PieceKind {
    pub const ALL: [PieceKind; 14] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::Dot,
        PieceKind::Wedge,
        PieceKind::Ramp,
        PieceKind::Roof,
        PieceKind::PointBomb,
        PieceKind::BigBomb,
        PieceKind::RowBomb,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockweld_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_str("Row_Bomb"), Some(PieceKind::RowBomb));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        PieceKind::ALL.iter().copied().find(|k| k.as_str() == lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::Dot => "dot",
            PieceKind::Wedge => "wedge",
            PieceKind::Ramp => "ramp",
            PieceKind::Roof => "roof",
            PieceKind::PointBomb => "point_bomb",
            PieceKind::BigBomb => "big_bomb",
            PieceKind::RowBomb => "row_bomb",
        }
    }

    pub fn detonation(&self) -> Option<DetonationKind> {
        match self {
            PieceKind::PointBomb => Some(DetonationKind::Point),
            PieceKind::BigBomb => Some(DetonationKind::Big),
            PieceKind::RowBomb => Some(DetonationKind::Row),
            _ => None,
        }
    }
}

/// Piece rotation, clockwise from the spawn orientation.
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::North, Rotation::East, Rotation::South, Rotation::West];

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockweld_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Number of clockwise quarter turns from North.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Win condition of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Objective {
    /// Remove every level-authored block.
    #[default]
    Clear,
    /// Fill the blueprint; rows are never cleared.
    Build,
    /// Get the asteroid's main cell down to the bottom visible row.
    BringDownAsteroid,
}

impl Objective {
    pub fn clears_rows(self) -> bool {
        !matches!(self, Objective::Build)
    }
}
