use serde::Serialize;

use crate::grid::Field;

/// Serializable view of a field for observers and tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSnapshot {
    pub columns: usize,
    pub rows: usize,
    pub visible_rows: usize,
    pub lowest_visible_row: usize,
    /// ASCII picture, top row first.
    pub grid: Vec<String>,
    pub occupied: usize,
    pub welded_sub_cells: usize,
}

impl From<&Field> for FieldSnapshot {
    fn from(field: &Field) -> Self {
        let welded_sub_cells = field
            .cells()
            .iter()
            .flat_map(|c| c.sub.iter())
            .filter(|s| !s.is_empty() && !s.welds.is_empty())
            .count();
        Self {
            columns: field.columns(),
            rows: field.rows(),
            visible_rows: field.visible_rows(),
            lowest_visible_row: field.lowest_visible_row(),
            grid: field.to_ascii(),
            occupied: field.occupied_cell_count(),
            welded_sub_cells,
        }
    }
}

impl FieldSnapshot {
    /// Rows of the visible window only, top row first.
    pub fn visible_grid(&self) -> &[String] {
        let top = (self.lowest_visible_row + self.visible_rows).min(self.rows);
        let start = self.rows - top;
        let end = self.rows - self.lowest_visible_row;
        &self.grid[start..end]
    }
}
