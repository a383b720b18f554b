//! Pieces module - shape tables and the immutable shape view
//!
//! Every piece kind is a data record built once from a static table: a square
//! fill grid for each of the four rotations, a click grid twice as fine for
//! tap hit-testing, a color and a couple of traits. Shapes are read through
//! [`PieceBlocks`], the same view gravity uses for extracted clusters.

use crate::grid::{PieceId, SubCell};
use crate::types::{
    BlockColor, BlockKind, DetonationKind, Fill, PieceKind, Rotation, Vec2, CLICK_GRID_SCALE,
    PIECE_GRID_MAX,
};

/// Immutable view of a fill grid, row 0 at the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceBlocks<'a> {
    fills: &'a [Fill],
    width: usize,
    height: usize,
}

/// Inclusive bounds of the non-empty cells of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub min_col: i32,
    pub max_col: i32,
    pub min_row: i32,
    pub max_row: i32,
}

impl Extent {
    pub fn width(&self) -> i32 {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> i32 {
        self.max_row - self.min_row + 1
    }
}

impl<'a> PieceBlocks<'a> {
    pub fn new(fills: &'a [Fill], width: usize, height: usize) -> Self {
        debug_assert_eq!(fills.len(), width * height);
        Self {
            fills,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill at a local cell, `Empty` outside the grid.
    pub fn get(&self, col: i32, row: i32) -> Fill {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return Fill::Empty;
        }
        self.fills
            .get(row as usize * self.width + col as usize)
            .copied()
            .unwrap_or(Fill::Empty)
    }

    /// Non-empty cells as `(col, row, fill)`.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Fill)> + 'a {
        let width = self.width;
        self.fills
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_empty())
            .map(move |(i, f)| ((i % width) as i32, (i / width) as i32, *f))
    }

    pub fn is_empty(&self) -> bool {
        self.fills.iter().all(|f| f.is_empty())
    }

    pub fn extent(&self) -> Option<Extent> {
        let mut cells = self.cells();
        let (c, r, _) = cells.next()?;
        let mut ext = Extent {
            min_col: c,
            max_col: c,
            min_row: r,
            max_row: r,
        };
        for (c, r, _) in cells {
            ext.min_col = ext.min_col.min(c);
            ext.max_col = ext.max_col.max(c);
            ext.min_row = ext.min_row.min(r);
            ext.max_row = ext.max_row.max(r);
        }
        Some(ext)
    }

    pub fn empty_rows_above(&self) -> i32 {
        match self.extent() {
            Some(ext) => self.height as i32 - 1 - ext.max_row,
            None => self.height as i32,
        }
    }

    pub fn empty_rows_below(&self) -> i32 {
        self.extent().map_or(self.height as i32, |ext| ext.min_row)
    }
}

/// Index into a [`PieceCatalog`].
pub type PieceTypeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct PieceType {
    pub id: PieceTypeId,
    pub kind: PieceKind,
    pub color: BlockColor,
    /// Side of the square fill grid.
    pub size: usize,
    rotations: [Vec<Fill>; 4],
    clicks: [Vec<bool>; 4],
    pub detonation: Option<DetonationKind>,
    pub can_rotate: bool,
}

impl PieceType {
    fn from_table(id: PieceTypeId, kind: PieceKind) -> Self {
        let rows = shape_rows(kind);
        let size = rows.len();
        debug_assert!(size <= PIECE_GRID_MAX);

        let mut north = vec![Fill::Empty; size * size];
        for (i, line) in rows.iter().enumerate() {
            let row = size - 1 - i;
            for (col, ch) in line.chars().enumerate() {
                north[row * size + col] = shape_fill(ch);
            }
        }
        let east = rotate_grid(&north, size);
        let south = rotate_grid(&east, size);
        let west = rotate_grid(&south, size);
        let rotations = [north, east, south, west];
        let clicks = [
            click_grid(&rotations[0], size),
            click_grid(&rotations[1], size),
            click_grid(&rotations[2], size),
            click_grid(&rotations[3], size),
        ];
        let detonation = kind.detonation();

        PieceType {
            id,
            kind,
            color: piece_color(kind),
            size,
            rotations,
            clicks,
            detonation,
            can_rotate: detonation.is_none() && kind != PieceKind::O,
        }
    }

    pub fn blocks(&self, rotation: Rotation) -> PieceBlocks<'_> {
        PieceBlocks::new(&self.rotations[rotation.index()], self.size, self.size)
    }

    pub fn is_bomb(&self) -> bool {
        self.detonation.is_some()
    }

    /// Hit-test a point in piece-local cell units against the click grid.
    pub fn click_hit(&self, rotation: Rotation, local: Vec2) -> bool {
        let scale = CLICK_GRID_SCALE as f32;
        let n = self.size * CLICK_GRID_SCALE;
        let (x, y) = ((local.x * scale).floor(), (local.y * scale).floor());
        if x < 0.0 || y < 0.0 || x >= n as f32 || y >= n as f32 {
            return false;
        }
        self.clicks[rotation.index()][y as usize * n + x as usize]
    }

    /// Sub-cell this piece leaves in the field for one of its fills.
    pub fn sub_cell(&self, fill: Fill, owner: PieceId) -> SubCell {
        match self.detonation {
            Some(DetonationKind::Row) => SubCell::bomb(BlockKind::RowBomb, owner),
            Some(_) => SubCell::bomb(BlockKind::PointBomb, owner),
            None => SubCell::block(fill, self.color, owner),
        }
    }
}

/// Every piece type a level can use, built once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceCatalog {
    types: Vec<PieceType>,
}

impl PieceCatalog {
    pub fn standard() -> Self {
        Self::with_kinds(&PieceKind::ALL)
    }

    pub fn with_kinds(kinds: &[PieceKind]) -> Self {
        let mut types = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if types.iter().any(|t: &PieceType| t.kind == kind) {
                continue;
            }
            types.push(PieceType::from_table(types.len(), kind));
        }
        Self { types }
    }

    pub fn get(&self, id: PieceTypeId) -> Option<&PieceType> {
        self.types.get(id)
    }

    pub fn find(&self, kind: PieceKind) -> Option<PieceTypeId> {
        self.types.iter().position(|t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceType> {
        self.types.iter()
    }
}

// Shape rows, top row first: `#` full, `a` lower-left, `b` lower-right,
// `c` upper-left, `d` upper-right, `.` empty.
fn shape_rows(kind: PieceKind) -> &'static [&'static str] {
    match kind {
        PieceKind::I => &["....", "####", "....", "...."],
        PieceKind::O => &["##", "##"],
        PieceKind::T => &[".#.", "###", "..."],
        PieceKind::S => &[".##", "##.", "..."],
        PieceKind::Z => &["##.", ".##", "..."],
        PieceKind::J => &["#..", "###", "..."],
        PieceKind::L => &["..#", "###", "..."],
        PieceKind::Dot => &["#"],
        PieceKind::Wedge => &["b"],
        PieceKind::Ramp => &["b.", "##"],
        PieceKind::Roof => &["...", "b#a", "..."],
        PieceKind::PointBomb => &["#"],
        PieceKind::BigBomb => &["##", "##"],
        PieceKind::RowBomb => &["#"],
    }
}

fn shape_fill(ch: char) -> Fill {
    match ch {
        '#' => Fill::Full,
        'a' => Fill::LowerLeft,
        'b' => Fill::LowerRight,
        'c' => Fill::UpperLeft,
        'd' => Fill::UpperRight,
        _ => Fill::Empty,
    }
}

fn piece_color(kind: PieceKind) -> BlockColor {
    match kind {
        PieceKind::I | PieceKind::J => BlockColor::Blue,
        PieceKind::O => BlockColor::Yellow,
        PieceKind::T | PieceKind::Ramp => BlockColor::Purple,
        PieceKind::S | PieceKind::Wedge => BlockColor::Green,
        PieceKind::Z | PieceKind::Dot => BlockColor::Red,
        PieceKind::L | PieceKind::Roof => BlockColor::Orange,
        PieceKind::PointBomb | PieceKind::BigBomb | PieceKind::RowBomb => BlockColor::None,
    }
}

/// Quarter turn clockwise: local `(c, r)` moves to `(r, n - 1 - c)`.
fn rotate_grid(src: &[Fill], n: usize) -> Vec<Fill> {
    let mut out = vec![Fill::Empty; n * n];
    for r in 0..n {
        for c in 0..n {
            let (nc, nr) = (r, n - 1 - c);
            out[nr * n + nc] = src[r * n + c].rotate_cw();
        }
    }
    out
}

fn click_grid(fills: &[Fill], n: usize) -> Vec<bool> {
    let m = n * CLICK_GRID_SCALE;
    let mut out = vec![false; m * m];
    for y in 0..m {
        for x in 0..m {
            let fill = fills[(y / CLICK_GRID_SCALE) * n + x / CLICK_GRID_SCALE];
            let q = CLICK_GRID_SCALE as f32;
            let lx = ((x % CLICK_GRID_SCALE) as f32 + 0.5) / q;
            let ly = ((y % CLICK_GRID_SCALE) as f32 + 0.5) / q;
            out[y * m + x] = match fill {
                Fill::Empty => false,
                Fill::Full => true,
                Fill::LowerLeft => lx + ly <= 1.0,
                Fill::UpperRight => lx + ly >= 1.0,
                Fill::LowerRight => ly <= lx,
                Fill::UpperLeft => ly >= lx,
            };
        }
    }
    out
}
