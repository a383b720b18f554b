//! Level data and objectives.
//!
//! The core consumes an already-built [`LevelData`] value once at level start.
//! Grid and blueprint pictures are lists of strings, top row first, in the
//! legend of [`Field::from_ascii`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::grid::Field;
use crate::types::{Fill, Objective, PieceKind, MAX_NUM_COLUMNS, MAX_NUM_ROWS};

fn default_moves() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub columns: usize,
    pub rows: usize,
    /// Height of the playable window; the whole grid when absent.
    #[serde(default)]
    pub visible_rows: Option<usize>,
    #[serde(default)]
    pub lowest_visible_row: usize,
    /// Initial blocks, bottom-aligned. Mutually exclusive with `blueprint`.
    #[serde(default)]
    pub grid: Vec<String>,
    /// Target pattern for build levels (`#` filled, `.` empty), bottom-aligned.
    #[serde(default)]
    pub blueprint: Vec<String>,
    pub pieces: Vec<PieceKind>,
    /// Fixed pieces handed out before seeded draws start.
    #[serde(default)]
    pub opening: Vec<PieceKind>,
    #[serde(default)]
    pub objective: Objective,
    #[serde(default = "default_moves")]
    pub moves: u32,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("unsupported field size {columns}x{rows}")]
    BadDimensions { columns: usize, rows: usize },
    #[error("visible window {lowest}+{visible} does not fit {rows} rows")]
    BadWindow {
        lowest: usize,
        visible: usize,
        rows: usize,
    },
    #[error("a level has either an initial grid or a blueprint, not both")]
    GridAndBlueprint,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{found} picture rows do not fit {rows} field rows")]
    TooManyRows { found: usize, rows: usize },
    #[error("unknown cell '{ch}' at row {row}, column {col}")]
    UnknownCell { ch: char, row: usize, col: usize },
    #[error("level has no usable pieces")]
    NoPieces,
    #[error("build objective needs a blueprint")]
    MissingBlueprint,
    #[error("asteroid objective needs an asteroid main cell")]
    MissingAsteroid,
    #[error("invalid simulation config: {0}")]
    Config(#[from] ConfigError),
}

impl LevelData {
    pub fn visible_rows(&self) -> usize {
        self.visible_rows.unwrap_or(self.rows)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.columns == 0
            || self.rows == 0
            || self.columns > MAX_NUM_COLUMNS
            || self.rows > MAX_NUM_ROWS
        {
            return Err(LevelError::BadDimensions {
                columns: self.columns,
                rows: self.rows,
            });
        }
        let visible = self.visible_rows();
        if visible == 0 || self.lowest_visible_row + visible > self.rows {
            return Err(LevelError::BadWindow {
                lowest: self.lowest_visible_row,
                visible,
                rows: self.rows,
            });
        }
        if !self.grid.is_empty() && !self.blueprint.is_empty() {
            return Err(LevelError::GridAndBlueprint);
        }
        if self.pieces.is_empty() {
            return Err(LevelError::NoPieces);
        }
        if self.objective == Objective::Build && self.blueprint.is_empty() {
            return Err(LevelError::MissingBlueprint);
        }
        if self.objective == Objective::BringDownAsteroid
            && !self.grid.iter().any(|row| row.contains('M'))
        {
            return Err(LevelError::MissingAsteroid);
        }
        Ok(())
    }
}

/// Objective status for HUD and level-end checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectiveProgress {
    pub done: u32,
    pub total: u32,
    pub completed: bool,
}

impl Field {
    /// Build the field described by a level.
    pub fn from_level(level: &LevelData) -> Result<Field, LevelError> {
        level.validate()?;
        let mut field = Field::new(level.columns, level.rows, level.visible_rows());
        field.set_lowest_visible_row(level.lowest_visible_row);
        field.fill_from_ascii(&level.grid)?;
        if !level.blueprint.is_empty() {
            field.set_blueprint(Some(parse_blueprint(level)?));
        }
        field.settle_visuals();
        field.set_initial_level_blocks(field.level_block_count());
        Ok(field)
    }

    pub fn objective_progress(&self, objective: Objective) -> ObjectiveProgress {
        match objective {
            Objective::Clear => {
                let total = self.initial_level_blocks();
                let remaining = self.level_block_count().min(total);
                ObjectiveProgress {
                    done: (total - remaining) as u32,
                    total: total as u32,
                    completed: total > 0 && remaining == 0,
                }
            }
            Objective::Build => {
                let Some(blueprint) = self.blueprint() else {
                    return ObjectiveProgress {
                        done: 0,
                        total: 0,
                        completed: false,
                    };
                };
                let mut total = 0;
                let mut done = 0;
                for (i, target) in blueprint.iter().enumerate() {
                    if *target != Fill::Full {
                        continue;
                    }
                    total += 1;
                    let cell = &self.cells()[i];
                    if cell.is_full() && !cell.is_cleared_marker() {
                        done += 1;
                    }
                }
                ObjectiveProgress {
                    done,
                    total,
                    completed: total > 0 && done == total,
                }
            }
            Objective::BringDownAsteroid => {
                let down = self
                    .asteroid_main_pos()
                    .is_some_and(|p| p.row <= self.lowest_visible_row() as i32);
                ObjectiveProgress {
                    done: down as u32,
                    total: 1,
                    completed: down,
                }
            }
        }
    }
}

fn parse_blueprint(level: &LevelData) -> Result<Vec<Fill>, LevelError> {
    let (columns, rows) = (level.columns, level.rows);
    if level.blueprint.len() > rows {
        return Err(LevelError::TooManyRows {
            found: level.blueprint.len(),
            rows,
        });
    }
    let mut fills = vec![Fill::Empty; columns * rows];
    for (i, line) in level.blueprint.iter().enumerate() {
        let row = level.blueprint.len() - 1 - i;
        let found = line.chars().count();
        if found != columns {
            return Err(LevelError::RowWidth {
                row,
                expected: columns,
                found,
            });
        }
        for (col, ch) in line.chars().enumerate() {
            fills[row * columns + col] = match ch {
                '#' => Fill::Full,
                '.' | ' ' => Fill::Empty,
                ch => return Err(LevelError::UnknownCell { ch, row, col }),
            };
        }
    }
    Ok(fills)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridPos;

    fn level(grid: &[&str]) -> LevelData {
        LevelData {
            name: "test".into(),
            columns: grid.first().map_or(4, |r| r.len()),
            rows: 6,
            visible_rows: None,
            lowest_visible_row: 0,
            grid: grid.iter().map(|s| s.to_string()).collect(),
            blueprint: Vec::new(),
            pieces: vec![PieceKind::T],
            opening: Vec::new(),
            objective: Objective::Clear,
            moves: 10,
            seed: 1,
        }
    }

    #[test]
    fn test_grid_is_bottom_aligned() {
        let field = Field::from_level(&level(&["r...", "XXgg"])).unwrap();
        assert_eq!(field.rows(), 6);
        assert_eq!(field.to_ascii()[4], "r...");
        assert_eq!(field.to_ascii()[5], "XXgg");
        assert_eq!(field.initial_level_blocks(), 5);
    }

    #[test]
    fn test_validation_errors() {
        let mut l = level(&["r..."]);
        l.pieces.clear();
        assert_eq!(Field::from_level(&l), Err(LevelError::NoPieces));

        let mut l = level(&["r..."]);
        l.blueprint = vec!["####".into()];
        assert_eq!(Field::from_level(&l), Err(LevelError::GridAndBlueprint));

        let mut l = level(&["r..."]);
        l.visible_rows = Some(4);
        l.lowest_visible_row = 3;
        assert!(matches!(Field::from_level(&l), Err(LevelError::BadWindow { .. })));

        let mut l = level(&["r..."]);
        l.objective = Objective::BringDownAsteroid;
        assert_eq!(Field::from_level(&l), Err(LevelError::MissingAsteroid));
    }

    #[test]
    fn test_clear_progress() {
        let mut field = Field::from_level(&level(&["rr..", "gg.."])).unwrap();
        let p = field.objective_progress(Objective::Clear);
        assert_eq!((p.done, p.total, p.completed), (0, 4, false));
        field.clear_rows(&[0, 1]);
        field.remove_cleared_rows();
        let p = field.objective_progress(Objective::Clear);
        assert_eq!((p.done, p.total, p.completed), (4, 4, true));
    }

    #[test]
    fn test_build_progress() {
        let mut l = level(&[]);
        l.columns = 3;
        l.objective = Objective::Build;
        l.blueprint = vec!["#..".into(), "###".into()];
        let mut field = Field::from_level(&l).unwrap();
        assert_eq!(field.blueprint_fill(GridPos::new(0, 1)), Fill::Full);
        assert_eq!(field.objective_progress(Objective::Build).total, 4);
        for col in 0..3 {
            field.place(
                GridPos::new(col, 0),
                crate::grid::SubCell::block(Fill::Full, crate::types::BlockColor::Red, 1),
            );
        }
        let p = field.objective_progress(Objective::Build);
        assert_eq!((p.done, p.completed), (3, false));
    }

    #[test]
    fn test_asteroid_progress() {
        let mut l = level(&["..A.", "..M.", "....", "rrrr"]);
        l.objective = Objective::BringDownAsteroid;
        let mut field = Field::from_level(&l).unwrap();
        assert_eq!(field.asteroid_main_pos(), Some(GridPos::new(2, 2)));
        assert!(!field.objective_progress(Objective::BringDownAsteroid).completed);
        field.clear_rows(&[0]);
        field.remove_cleared_rows();
        field.manage_welds();
        field.apply_gravity();
        assert_eq!(field.asteroid_main_pos(), Some(GridPos::new(2, 0)));
        assert!(field.objective_progress(Objective::BringDownAsteroid).completed);
    }

    #[test]
    fn test_level_json() {
        let json = r#"{
            "columns": 4, "rows": 8, "visible_rows": 6,
            "grid": ["r..r"], "pieces": ["t", "ramp", "row_bomb"],
            "objective": "clear"
        }"#;
        let data: LevelData = serde_json::from_str(json).unwrap();
        assert_eq!(data.moves, 30);
        assert_eq!(data.pieces[1], PieceKind::Ramp);
        let field = Field::from_level(&data).unwrap();
        assert_eq!(field.visible_rows(), 6);
    }
}
