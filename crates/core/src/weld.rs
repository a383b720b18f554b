//! Weld engine - adjacency links between same-colored blocks
//!
//! Welds are stored per sub-cell as a bitmask ([`WeldSet`]). They are derived
//! from the grid contents after every mutation that can change adjacency and
//! are the only connectivity information gravity uses.

use log::trace;

use crate::grid::{Field, SubCell, SubCellRef, WeldLink, WeldSet};
use crate::types::{BlockColor, BlockKind, Direction, Fill, GridPos};

/// Whether two sub-cells may be welded together.
///
/// Both must be non-gray; either ordinary blocks of the same color, or parts
/// of the same big asteroid.
pub fn weld_compatible(a: &SubCell, b: &SubCell) -> bool {
    if a.is_empty() || b.is_empty() || a.gray || b.gray {
        return false;
    }
    if a.kind.is_block() && b.kind.is_block() {
        return a.color != BlockColor::None && a.color == b.color;
    }
    is_big_asteroid(a.kind) && is_big_asteroid(b.kind) && a.owner == b.owner
}

fn is_big_asteroid(kind: BlockKind) -> bool {
    matches!(kind, BlockKind::BigAsteroid | BlockKind::BigAsteroidMain)
}

impl Field {
    /// Sub-cell on the other end of `link`, if one is there to receive it.
    pub fn weld_target(&self, from: SubCellRef, link: WeldLink) -> Option<SubCellRef> {
        match link {
            WeldLink::Diagonal => {
                let cell = self.cell(from.pos)?;
                let other = 1 - from.slot.min(1);
                let (a, b) = (&cell.sub[from.slot.min(1)], &cell.sub[other]);
                (!b.is_empty() && a.fill.is_complementary(b.fill))
                    .then_some(SubCellRef::new(from.pos, other))
            }
            WeldLink::Neighbor(dir) => {
                let pos = from.pos.step(dir);
                let slot = self.cell(pos)?.slot_filling(dir.opposite())?;
                Some(SubCellRef::new(pos, slot))
            }
        }
    }

    /// Whether `from` and the target of `link` both hold the link.
    pub fn is_welded(&self, from: SubCellRef, link: WeldLink) -> bool {
        let Some(sub) = self.sub_cell(from) else {
            return false;
        };
        if !sub.welds.has(link) {
            return false;
        }
        self.weld_target(from, link)
            .and_then(|t| self.sub_cell(t))
            .is_some_and(|t| t.welds.has(link.opposite()))
    }

    /// Recompute welds over the visible window plus one margin row below.
    pub fn manage_welds(&mut self) {
        let first_row = (self.lowest_visible_row() as i32 - 1).max(0);
        let last_row = self.top_visible_row() as i32 - 1;
        if last_row < first_row {
            return;
        }

        let merged = self.merge_triangle_pairs(first_row, last_row);
        let mut bits = self.form_welds(first_row, last_row);
        let retired = self.retire_redundant_corners(first_row, last_row, &mut bits);

        for row in first_row..=last_row {
            for col in 0..self.columns() as i32 {
                let pos = GridPos::new(col, row);
                for slot in 0..2 {
                    let r = SubCellRef::new(pos, slot);
                    let Some(i) = self.slot_index(r) else { continue };
                    if let Some(sub) = self.sub_cell_mut(r) {
                        if sub.is_empty() {
                            sub.welds = WeldSet::NONE;
                        } else {
                            sub.welds.set_bits(bits[i]);
                        }
                    }
                }
            }
        }

        // Links from the row under the margin into it are stale now.
        let below = first_row - 1;
        if below >= 0 {
            for col in 0..self.columns() as i32 {
                if let Some(cell) = self.cell_mut(GridPos::new(col, below)) {
                    for sub in cell.sub.iter_mut() {
                        for dir in [Direction::N, Direction::NE, Direction::NW] {
                            sub.welds.set(WeldLink::Neighbor(dir), false);
                        }
                    }
                }
            }
        }

        if merged > 0 || retired > 0 {
            trace!("welds: merged {} triangle pair(s), retired {} corner(s)", merged, retired);
        }
    }

    /// Collapse diagonally welded complementary halves into one full sub-cell.
    fn merge_triangle_pairs(&mut self, first_row: i32, last_row: i32) -> usize {
        let mut merged = 0;
        for row in first_row..=last_row {
            for col in 0..self.columns() as i32 {
                let Some(cell) = self.cell_mut(GridPos::new(col, row)) else {
                    continue;
                };
                let [a, b] = cell.sub;
                let mergeable = a.kind == BlockKind::HalfTriangle
                    && b.kind == BlockKind::HalfTriangle
                    && a.fill.is_complementary(b.fill)
                    && a.welds.has(WeldLink::Diagonal)
                    && b.welds.has(WeldLink::Diagonal)
                    && weld_compatible(&a, &b);
                if !mergeable {
                    continue;
                }
                cell.sub[0] = SubCell {
                    fill: Fill::Full,
                    kind: BlockKind::Full,
                    welds: WeldSet::merged(&a.welds, &b.welds),
                    ..a
                };
                cell.sub[1] = SubCell::EMPTY;
                merged += 1;
            }
        }
        merged
    }

    fn form_welds(&self, first_row: i32, last_row: i32) -> Vec<u16> {
        let mut bits = vec![0u16; self.cells().len() * 2];
        let in_range = |p: GridPos| p.row >= first_row && p.row <= last_row;

        for row in first_row..=last_row {
            for col in 0..self.columns() as i32 {
                let pos = GridPos::new(col, row);
                let Some(cell) = self.cell(pos) else { continue };
                for (slot, sub) in cell.occupied() {
                    let from = SubCellRef::new(pos, slot);
                    let Some(i) = self.slot_index(from) else { continue };

                    for dir in Direction::ALL {
                        if !sub.fill.fills_side(dir) || !in_range(pos.step(dir)) {
                            continue;
                        }
                        let link = WeldLink::Neighbor(dir);
                        let compatible = self
                            .weld_target(from, link)
                            .and_then(|t| self.sub_cell(t))
                            .is_some_and(|t| weld_compatible(sub, t));
                        if compatible {
                            bits[i] |= link.bit();
                        }
                    }

                    let diagonal = self
                        .weld_target(from, WeldLink::Diagonal)
                        .and_then(|t| self.sub_cell(t))
                        .is_some_and(|t| weld_compatible(sub, t));
                    if diagonal {
                        bits[i] |= WeldLink::Diagonal.bit();
                    }
                }
            }
        }
        bits
    }

    /// Drop corner links already covered by an L-shaped path of side links.
    fn retire_redundant_corners(&self, first_row: i32, last_row: i32, bits: &mut [u16]) -> usize {
        let snapshot = bits.to_vec();
        let has = |r: SubCellRef, link: WeldLink| {
            self.slot_index(r)
                .is_some_and(|i| snapshot[i] & link.bit() != 0)
        };
        let via = |from: SubCellRef, first: Direction, second: Direction| {
            if !has(from, WeldLink::Neighbor(first)) {
                return None;
            }
            let mid = self.weld_target(from, WeldLink::Neighbor(first))?;
            if !has(mid, WeldLink::Neighbor(second)) {
                return None;
            }
            self.weld_target(mid, WeldLink::Neighbor(second))
        };

        let mut retired = 0;
        for row in first_row..=last_row {
            for col in 0..self.columns() as i32 {
                for slot in 0..2 {
                    let from = SubCellRef::new(GridPos::new(col, row), slot);
                    for corner in Direction::CORNERS {
                        let link = WeldLink::Neighbor(corner);
                        if !has(from, link) {
                            continue;
                        }
                        let Some(target) = self.weld_target(from, link) else {
                            continue;
                        };
                        let (v, h) = corner.corner_sides();
                        let redundant =
                            via(from, v, h) == Some(target) || via(from, h, v) == Some(target);
                        if !redundant {
                            continue;
                        }
                        if let Some(i) = self.slot_index(from) {
                            bits[i] &= !link.bit();
                        }
                        if let Some(j) = self.slot_index(target) {
                            bits[j] &= !link.opposite().bit();
                        }
                        retired += 1;
                    }
                }
            }
        }
        retired
    }

    /// Remove links that point into `pos` but no longer have a partner there.
    pub(crate) fn detach_welds_into(&mut self, pos: GridPos) {
        for dir in Direction::ALL {
            let npos = pos.step(dir);
            let back = WeldLink::Neighbor(dir.opposite());
            for slot in 0..2 {
                let r = SubCellRef::new(npos, slot);
                let holds = self.sub_cell(r).is_some_and(|s| s.welds.has(back));
                if !holds {
                    continue;
                }
                let partnered = self
                    .weld_target(r, back)
                    .and_then(|t| self.sub_cell(t))
                    .is_some_and(|t| t.welds.has(back.opposite()));
                if !partnered {
                    if let Some(sub) = self.sub_cell_mut(r) {
                        sub.welds.set(back, false);
                    }
                }
            }
        }
        if let Some(cell) = self.cell_mut(pos) {
            for slot in 0..2 {
                let other_empty = cell.sub[1 - slot].is_empty();
                let sub = &mut cell.sub[slot];
                if sub.is_empty() {
                    sub.welds = WeldSet::NONE;
                } else if other_empty {
                    sub.welds.set(WeldLink::Diagonal, false);
                }
            }
        }
    }
}
