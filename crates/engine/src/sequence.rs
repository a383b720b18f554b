//! Deterministic piece sequence
//!
//! The level's opening list is handed out first; after that every piece is a
//! seeded draw from the level's piece pool. Draws are addressed by cursor, so
//! rewinding the cursor (undo) replays exactly the same pieces.

use blockweld_core::PieceTypeId;

/// 32-bit LCG stream keyed by one sequence cursor.
///
/// Each cursor gets its own short-lived stream, so a draw never depends on
/// how many draws came before it.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    const MUL: u32 = 1_664_525;
    const INC: u32 = 1_013_904_223;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Stream for the draw at `cursor` of a level seeded with `seed`.
    pub fn for_cursor(seed: u32, cursor: u32) -> Self {
        let mut rng = Self::new(seed ^ cursor.wrapping_mul(0x9E37_79B9));
        // The first output still tracks the key bits closely.
        rng.next_u32();
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(Self::MUL).wrapping_add(Self::INC);
        self.state
    }

    /// Index into a pool of `len` entries, taken from the high bits.
    pub fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((u64::from(self.next_u32()) * len as u64) >> 32) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSequence {
    opening: Vec<PieceTypeId>,
    pool: Vec<PieceTypeId>,
    seed: u32,
}

impl PieceSequence {
    pub fn new(opening: Vec<PieceTypeId>, pool: Vec<PieceTypeId>, seed: u64) -> Self {
        Self {
            opening,
            pool,
            seed: (seed ^ (seed >> 32)) as u32,
        }
    }

    /// Piece handed out at `cursor`.
    pub fn piece_at(&self, cursor: u32) -> PieceTypeId {
        if let Some(id) = self.opening.get(cursor as usize) {
            return *id;
        }
        if self.pool.is_empty() {
            return 0;
        }
        let mut rng = SimpleRng::for_cursor(self.seed, cursor);
        self.pool[rng.pick(self.pool.len())]
    }
}
