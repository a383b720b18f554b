//! Gravity engine - drop disconnected clusters
//!
//! A cluster is every sub-cell reachable through weld links. Clusters are
//! extracted into a temporary bounding-box shape, dropped with the regular
//! downward collision scan and re-inserted. Gray level blocks never move.
//! Bombs pulled down by gravity never detonate.

use log::debug;

use crate::grid::{Field, SubCell, SubCellRef};
use crate::pieces::PieceBlocks;
use crate::types::{BlockKind, Direction, Fill, GridPos};

/// Epoch-stamped visit flags, one per sub-cell slot.
///
/// Bumping the epoch clears every flag without touching the arrays.
#[derive(Debug, Clone, Default)]
pub struct VisitMarks {
    epoch: u32,
    found: Vec<u32>,
    tried: Vec<u32>,
}

impl VisitMarks {
    pub fn new(slots: usize) -> Self {
        Self {
            epoch: 1,
            found: vec![0; slots],
            tried: vec![0; slots],
        }
    }

    /// Start a new pass.
    pub fn next_pass(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.found.fill(0);
            self.tried.fill(0);
            self.epoch = 1;
        }
    }

    pub fn is_found(&self, i: usize) -> bool {
        self.found.get(i) == Some(&self.epoch)
    }

    pub fn mark_found(&mut self, i: usize) {
        if let Some(v) = self.found.get_mut(i) {
            *v = self.epoch;
        }
    }

    pub fn is_tried(&self, i: usize) -> bool {
        self.tried.get(i) == Some(&self.epoch)
    }

    pub fn mark_tried(&mut self, i: usize) {
        if let Some(v) = self.tried.get_mut(i) {
            *v = self.epoch;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GravityReport {
    pub passes: usize,
    pub moved_clusters: usize,
    pub moved_cells: usize,
}

impl GravityReport {
    pub fn moved(&self) -> bool {
        self.moved_clusters > 0
    }
}

fn falls(sub: &SubCell) -> bool {
    !sub.is_empty() && !sub.gray && sub.kind != BlockKind::ClearedRow
}

impl Field {
    /// Drop every unsupported cluster until nothing moves.
    pub fn apply_gravity(&mut self) -> GravityReport {
        let mut marks = VisitMarks::new(self.cells().len() * 2);
        let mut report = GravityReport::default();
        let cap = self.cells().len().max(1);

        for _ in 0..cap {
            let moved_ltr = self.gravity_pass(&mut marks, true, &mut report);
            let moved_rtl = self.gravity_pass(&mut marks, false, &mut report);
            if !moved_ltr && !moved_rtl {
                break;
            }
        }

        if report.moved() {
            debug!(
                "gravity: {} cluster(s), {} sub-cell(s) moved in {} pass(es)",
                report.moved_clusters, report.moved_cells, report.passes
            );
        }
        report
    }

    fn gravity_pass(&mut self, marks: &mut VisitMarks, left_to_right: bool, report: &mut GravityReport) -> bool {
        marks.next_pass();
        report.passes += 1;
        let columns = self.columns() as i32;
        let mut moved = false;

        for row in self.window_rows() {
            for i in 0..columns {
                let col = if left_to_right { i } else { columns - 1 - i };
                for slot in 0..2 {
                    let start = SubCellRef::new(GridPos::new(col, row), slot);
                    let Some(idx) = self.slot_index(start) else { continue };
                    if marks.is_found(idx) || marks.is_tried(idx) {
                        continue;
                    }
                    if !self.sub_cell(start).is_some_and(falls) {
                        continue;
                    }
                    let cluster = self.collect_cluster(start, marks);
                    let (distance, landed) = self.drop_cluster(&cluster);
                    for r in &landed {
                        if let Some(i) = self.slot_index(*r) {
                            marks.mark_tried(i);
                        }
                    }
                    if distance > 0 {
                        moved = true;
                        report.moved_clusters += 1;
                        report.moved_cells += cluster.len();
                    }
                }
            }
        }
        moved
    }

    /// Flood-fill through reciprocal weld links from `start`.
    pub fn collect_cluster(&self, start: SubCellRef, marks: &mut VisitMarks) -> Vec<SubCellRef> {
        let mut cluster = Vec::new();
        let mut stack = vec![start];
        if let Some(i) = self.slot_index(start) {
            marks.mark_found(i);
        }

        while let Some(r) = stack.pop() {
            cluster.push(r);
            let Some(sub) = self.sub_cell(r) else { continue };
            for link in sub.welds.links() {
                let Some(target) = self.weld_target(r, link) else {
                    continue;
                };
                let Some(ti) = self.slot_index(target) else {
                    continue;
                };
                if marks.is_found(ti) {
                    continue;
                }
                let reciprocal = self
                    .sub_cell(target)
                    .is_some_and(|t| falls(t) && t.welds.has(link.opposite()));
                if reciprocal {
                    marks.mark_found(ti);
                    stack.push(target);
                }
            }
        }
        cluster
    }

    /// Drop one cluster as far as it goes.
    ///
    /// Returns the distance fallen and the cluster's final sub-cell refs.
    fn drop_cluster(&mut self, cluster: &[SubCellRef]) -> (i32, Vec<SubCellRef>) {
        let Some(first) = cluster.first() else {
            return (0, Vec::new());
        };
        let (mut min, mut max) = (first.pos, first.pos);
        for r in cluster {
            min = GridPos::new(min.col.min(r.pos.col), min.row.min(r.pos.row));
            max = GridPos::new(max.col.max(r.pos.col), max.row.max(r.pos.row));
        }
        let width = (max.col - min.col + 1) as usize;
        let height = (max.row - min.row + 1) as usize;

        let mut fills = vec![Fill::Empty; width * height];
        let mut extracted: Vec<(SubCellRef, SubCell)> = Vec::with_capacity(cluster.len());
        for r in cluster {
            let Some(sub) = self.sub_cell_mut(*r) else { continue };
            let taken = std::mem::replace(sub, SubCell::EMPTY);
            let local = r.pos - min;
            let i = local.row as usize * width + local.col as usize;
            fills[i] = fills[i].combine(taken.fill);
            extracted.push((*r, taken));
        }

        let shape = PieceBlocks::new(&fills, width, height);
        let distance = self
            .detect_collision_down(&shape, min)
            .map_or(0, |landing| (min.row - landing).max(0));

        if distance == 0 {
            self.restore_cluster(&extracted);
            return (0, cluster.to_vec());
        }

        let mut landed = Vec::with_capacity(extracted.len());
        for (r, sub) in &extracted {
            let pos = r.pos.offset(0, -distance);
            let slot = self.cell(pos).and_then(|c| c.free_slot(sub.fill));
            match slot {
                Some(slot) => {
                    if let Some(dst) = self.sub_cell_mut(SubCellRef::new(pos, slot)) {
                        *dst = *sub;
                    }
                    landed.push(SubCellRef::new(pos, slot));
                }
                None => {
                    debug_assert!(false, "cluster landing slot taken at {:?}", pos);
                    for placed in &landed {
                        if let Some(dst) = self.sub_cell_mut(*placed) {
                            *dst = SubCell::EMPTY;
                        }
                    }
                    self.restore_cluster(&extracted);
                    return (0, cluster.to_vec());
                }
            }
        }
        (distance, landed)
    }

    fn restore_cluster(&mut self, extracted: &[(SubCellRef, SubCell)]) {
        for (r, sub) in extracted {
            if let Some(dst) = self.sub_cell_mut(*r) {
                *dst = *sub;
            }
        }
    }

    /// Whether the gray structure containing `pos` hangs without support.
    ///
    /// A structure is grounded when any member sits on the bottom window row or
    /// directly on top of a non-gray block. Cells without gray blocks are never
    /// floating.
    pub fn is_block_structure_floating(&self, pos: GridPos) -> bool {
        let is_gray = |p: GridPos| self.cell(p).is_some_and(|c| c.has_gray());
        if !is_gray(pos) || !self.is_in_window(pos.row) {
            return false;
        }
        let lowest = self.lowest_visible_row() as i32;
        let mut seen = vec![false; self.cells().len()];
        let mut stack = vec![pos];
        if let Some(i) = self.index(pos) {
            seen[i] = true;
        }

        while let Some(p) = stack.pop() {
            if p.row == lowest {
                return false;
            }
            let below = p.step(Direction::S);
            let on_block = self
                .cell(below)
                .is_some_and(|c| !c.is_empty() && !c.has_gray() && !c.is_cleared_marker());
            if on_block {
                return false;
            }
            for dir in Direction::CARDINAL {
                let n = p.step(dir);
                if !self.is_in_window(n.row) || !is_gray(n) {
                    continue;
                }
                if let Some(i) = self.index(n) {
                    if !seen[i] {
                        seen[i] = true;
                        stack.push(n);
                    }
                }
            }
        }
        true
    }
}
