//! Game logic orchestrator
//!
//! Owns the field and every engine, spawns pieces, turns input into piece
//! motion and runs the landing pipeline: place, weld, detonate or cascade,
//! then advance to the next move. Nothing here touches rendering or I/O;
//! observers read [`GameEvent`]s and [`GameSnapshot`]s.

use std::collections::VecDeque;

use log::{debug, info, trace, warn};
use thiserror::Error;

use blockweld_core::{
    Extent, Field, FieldExplosions, LevelData, LevelError, ObjectiveProgress, PieceCatalog,
    PieceId, PieceType, PieceTypeId, SimulationConfig,
};
use blockweld_types::{
    DetonationKind, FrameResult, GameEvent, GridPos, InputCommand, Objective, PieceKind,
    Rotation, SpawnReason, SwipeDirection, Vec2, UPCOMING_PIECES,
};

use crate::cascade::{Cascade, CascadeState};
use crate::falling::{FallingPiece, FallingState};
use crate::history::{MoveData, MoveHistory};
use crate::place::{validate_placement, DropPlacements, PlaceError, Placement, PlacementProvider};
use crate::sequence::PieceSequence;
use crate::snapshot::GameSnapshot;

/// Which engine owns the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicState {
    /// Falling piece, spawning and cascades.
    LogicUpdate,
    /// Detonations resolving; no piece is active.
    FieldExplosions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The piece does not fit at its spawn position.
    #[error("no room to spawn {kind:?}")]
    GameOver { kind: PieceKind },
    #[error("piece type {0} is not in the catalog")]
    UnknownPiece(PieceTypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("nothing to undo")]
    UndoUnavailable,
    #[error("no active piece")]
    NoActivePiece,
    #[error("game is not playable")]
    NotPlayable,
}

pub struct GameLogic {
    field: Field,
    catalog: PieceCatalog,
    sequence: PieceSequence,
    history: MoveHistory,
    objective: Objective,
    config: SimulationConfig,
    state: LogicState,
    cascade: Cascade,
    explosions: FieldExplosions,
    falling: Option<FallingPiece>,
    pending_spawn: Option<SpawnReason>,
    next_piece_id: PieceId,
    moves_left: u32,
    paused: bool,
    outcome: Option<FrameResult>,
    input: VecDeque<InputCommand>,
    events: Vec<GameEvent>,
    provider: Box<dyn PlacementProvider>,
    placements: Vec<Placement>,
}

impl GameLogic {
    pub fn new(level: &LevelData, config: SimulationConfig) -> Result<Self, LevelError> {
        config.validate()?;
        let mut field = Field::from_level(level)?;
        field.manage_welds();
        field.settle_visuals();

        let kinds: Vec<PieceKind> = level.pieces.iter().chain(&level.opening).copied().collect();
        let catalog = PieceCatalog::with_kinds(&kinds);
        let ids = |list: &[PieceKind]| -> Vec<PieceTypeId> {
            list.iter().filter_map(|k| catalog.find(*k)).collect()
        };
        let sequence = PieceSequence::new(ids(&level.opening), ids(&level.pieces), level.seed);
        let history = MoveHistory::new(MoveData::first(&sequence));

        info!(
            "level '{}' {}x{} ({:?}, {} moves)",
            level.name, level.columns, level.rows, level.objective, level.moves
        );

        Ok(Self {
            field,
            catalog,
            sequence,
            history,
            objective: level.objective,
            config,
            state: LogicState::LogicUpdate,
            cascade: Cascade::new(),
            explosions: FieldExplosions::new(),
            falling: None,
            pending_spawn: Some(SpawnReason::LevelStart),
            // Owner 0 is reserved for level blocks.
            next_piece_id: 1,
            moves_left: level.moves,
            paused: false,
            outcome: None,
            input: VecDeque::new(),
            events: Vec::new(),
            provider: Box::new(DropPlacements),
            placements: Vec::new(),
        })
    }

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> FrameResult {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        self.handle_input();
        if !self.paused && self.outcome.is_none() {
            self.step(dt);
        }
        self.field.advance_visuals(dt, &self.config);
        self.outcome.unwrap_or(FrameResult::Running)
    }

    fn step(&mut self, dt: f32) {
        match self.state {
            LogicState::FieldExplosions => {
                let done = self
                    .explosions
                    .update(&mut self.field, dt, &self.config, &mut self.events);
                if done {
                    // Laser rows are marked cleared; the cascade removes them.
                    debug!("explosions finished");
                    self.state = LogicState::LogicUpdate;
                    self.cascade.resume();
                }
            }
            LogicState::LogicUpdate => {
                if self.cascade.is_cascading() {
                    self.cascade.update(
                        &mut self.field,
                        dt,
                        &self.config,
                        self.objective.clears_rows(),
                        &mut self.events,
                    );
                } else if let Some(reason) = self.pending_spawn {
                    self.start_move(reason);
                } else {
                    self.step_falling(dt);
                }
            }
        }
    }

    fn start_move(&mut self, reason: SpawnReason) {
        if let Some(end) = self.check_level_end() {
            info!("level finished: {:?}", end);
            self.pending_spawn = None;
            self.outcome = Some(end);
            return;
        }
        if let Err(err) = self.spawn_piece(reason) {
            info!("game over: {}", err);
            self.pending_spawn = None;
            self.outcome = Some(FrameResult::GameOver);
        }
    }

    fn check_level_end(&self) -> Option<FrameResult> {
        if self.field.objective_progress(self.objective).completed {
            return Some(FrameResult::LevelCompleted);
        }
        if self.moves_left == 0 {
            return Some(FrameResult::OutOfMoves);
        }
        None
    }

    /// Put the current move's piece into the field.
    ///
    /// A switched-in piece keeps the outgoing piece's position; every other
    /// spawn starts centred just below the top of the window.
    pub fn spawn_piece(&mut self, reason: SpawnReason) -> Result<(), SpawnError> {
        let carried = match reason {
            SpawnReason::Switch => self.falling.as_ref().map(|f| f.position),
            _ => None,
        };
        if reason == SpawnReason::NewMove {
            self.history.begin_move(&self.sequence);
        }

        let type_id = self.history.current().piece;
        let Some(piece) = self.catalog.get(type_id) else {
            return Err(SpawnError::UnknownPiece(type_id));
        };
        let shape = piece.blocks(Rotation::North);
        let Some(ext) = shape.extent() else {
            return Err(SpawnError::UnknownPiece(type_id));
        };
        let origin = match carried {
            Some(p) => GridPos::new(p.x.round() as i32, p.y.ceil() as i32),
            None => spawn_origin(&self.field, &ext),
        };
        if self.field.collides(&shape, origin) {
            return Err(SpawnError::GameOver { kind: piece.kind });
        }
        let Some(ghost_row) = self.field.detect_collision_down(&shape, origin) else {
            return Err(SpawnError::GameOver { kind: piece.kind });
        };

        let id = self.next_piece_id;
        self.next_piece_id += 1;
        let mut falling = FallingPiece::new(id, type_id, piece.kind, origin, ghost_row);
        if let Some(p) = carried {
            falling.position.y = p.y.max(ghost_row as f32);
            falling.refresh_state();
        }

        debug!(
            "spawn {} #{} at ({}, {}) ghost {} ({:?})",
            piece.kind.as_str(),
            id,
            origin.col,
            origin.row,
            ghost_row,
            reason
        );
        self.events.push(GameEvent::PieceSpawned {
            piece_id: id,
            kind: piece.kind,
            reason,
        });
        self.placements = self.provider.placements(&self.field, piece);
        self.falling = Some(falling);
        self.pending_spawn = None;
        Ok(())
    }

    fn step_falling(&mut self, dt: f32) {
        let Some(f) = self.falling.as_mut() else {
            return;
        };
        f.advance(dt, self.config.fall_speed, self.config.drag_fall_speed);
        if f.state == FallingState::Landing && f.landing_timer >= self.config.landing_timeout {
            self.land_piece();
        }
    }

    fn is_playable(&self) -> bool {
        self.outcome.is_none() && !self.paused
    }

    fn active(&self) -> Option<(&FallingPiece, &PieceType)> {
        let f = self.falling.as_ref()?;
        let piece = self.catalog.get(f.piece_type)?;
        Some((f, piece))
    }

    pub fn push_input(&mut self, command: InputCommand) {
        self.input.push_back(command);
    }

    /// Apply the oldest buffered command, if any.
    pub fn handle_input(&mut self) {
        let Some(command) = self.input.pop_front() else {
            return;
        };
        if self.paused && command != InputCommand::Pause {
            trace!("ignored {} while paused", command.as_str());
            return;
        }
        match command {
            InputCommand::DragTo { x, y } => {
                self.set_column(x);
                self.set_row(y);
            }
            InputCommand::Tap => {
                self.tap();
            }
            InputCommand::TapAt { x, y } => {
                if let Some(placement) = self.placement_at(Vec2::new(x, y)) {
                    if let Err(err) = self.apply_placement(placement) {
                        debug!("tap-to-place rejected: {} ({})", err, err.code());
                    }
                }
            }
            InputCommand::Swipe(SwipeDirection::Left) => {
                self.switch_piece(0);
            }
            InputCommand::Swipe(SwipeDirection::Right) => {
                self.switch_piece(1);
            }
            InputCommand::Swipe(SwipeDirection::Down) => {
                self.drop_piece();
            }
            InputCommand::Swipe(SwipeDirection::Up) => {}
            InputCommand::Undo => {
                if let Err(err) = self.undo_move() {
                    debug!("undo rejected: {}", err);
                }
            }
            InputCommand::Pause => {
                self.paused = !self.paused;
                info!("{}", if self.paused { "paused" } else { "resumed" });
            }
        }
    }

    /// Drag the piece towards column `x`, stopping at the first obstacle.
    pub fn set_column(&mut self, x: f32) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some((f, piece)) = self.active() else {
            return false;
        };
        let shape = piece.blocks(f.rotation);
        let col = f.col();
        let target = x.round() as i32;
        if target == col {
            return false;
        }

        let rows = [f.row(), f.floor_row()];
        let mut new_col = target;
        for row in rows {
            let from = GridPos::new(col, row);
            let limit = if target < col {
                self.field.detect_collision_left(&shape, from).map(|c| c + 1)
            } else {
                self.field.detect_collision_right(&shape, from).map(|c| c - 1)
            };
            let Some(limit) = limit else {
                return false;
            };
            new_col = if target < col {
                new_col.max(limit)
            } else {
                new_col.min(limit)
            };
        }
        if new_col == col {
            return false;
        }
        let ghost = self
            .field
            .detect_collision_down(&shape, GridPos::new(new_col, f.row()));

        let Some(f) = self.falling.as_mut() else {
            return false;
        };
        f.position.x = new_col as f32;
        if let Some(ghost) = ghost {
            f.ghost_row = ghost;
        }
        f.refresh_state();
        trace!("piece #{} column {} -> {}", f.id, col, new_col);
        true
    }

    /// Drag the piece down towards row `y`. Upward drags are ignored.
    pub fn set_row(&mut self, y: f32) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some(f) = self.falling.as_mut() else {
            return false;
        };
        let target = y.max(f.ghost_row as f32);
        if target >= f.position.y {
            return false;
        }
        f.drag_target = Some(target);
        if f.state != FallingState::Landing {
            f.state = FallingState::BeingDraggedDown;
        }
        true
    }

    /// Rotate clockwise with wall kicks.
    pub fn rotate(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some((f, piece)) = self.active() else {
            return false;
        };
        if !piece.can_rotate {
            return false;
        }
        let rotation = f.rotation.rotate_cw();
        let shape = piece.blocks(rotation);
        let Some(origin) = self.field.resolve_rotation(
            &shape,
            f.origin(),
            self.config.max_rotate_adjustment,
        ) else {
            trace!("rotation of #{} rejected", f.id);
            return false;
        };
        let ghost = self.field.detect_collision_down(&shape, origin);

        let Some(f) = self.falling.as_mut() else {
            return false;
        };
        f.rotation = rotation;
        if origin != f.origin() {
            f.position = origin.to_vec2();
        }
        f.ghost_row = ghost.unwrap_or(origin.row);
        f.refresh_state();
        true
    }

    /// Tap: bombs detonate where they are, everything else rotates.
    pub fn tap(&mut self) -> bool {
        let is_bomb = self.active().is_some_and(|(_, p)| p.is_bomb());
        if is_bomb && self.is_playable() {
            if let Some(f) = self.falling.as_mut() {
                f.position.y = f.position.y.ceil();
            }
            self.land_piece();
            true
        } else {
            self.rotate()
        }
    }

    /// Drop straight onto the ghost row and land immediately.
    pub fn drop_piece(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some(f) = self.falling.as_mut() else {
            return false;
        };
        f.position.y = f.ghost_row as f32;
        f.refresh_state();
        self.land_piece();
        true
    }

    /// Swap the active piece with upcoming slot `slot`.
    pub fn switch_piece(&mut self, slot: usize) -> bool {
        if !self.is_playable() || slot >= UPCOMING_PIECES {
            return false;
        }
        let Some(f) = self.falling.as_ref() else {
            return false;
        };
        let incoming = self.history.current().upcoming[slot];
        let Some(piece) = self.catalog.get(incoming) else {
            return false;
        };
        if self.field.collides(&piece.blocks(Rotation::North), f.origin()) {
            debug!("switch to {} blocked", piece.kind.as_str());
            return false;
        }
        let saved = self.history;
        self.history.record_switch(slot);
        match self.spawn_piece(SpawnReason::Switch) {
            Ok(()) => true,
            Err(err) => {
                warn!("switch failed: {}", err);
                self.history = saved;
                false
            }
        }
    }

    /// Place the active piece and run the landing pipeline.
    fn land_piece(&mut self) {
        let Some(f) = self.falling.take() else {
            return;
        };
        let Some(piece) = self.catalog.get(f.piece_type) else {
            debug_assert!(false, "unknown piece type {} landed", f.piece_type);
            warn!("landing piece with unknown type {}", f.piece_type);
            self.finish_move();
            return;
        };
        let shape = piece.blocks(f.rotation);
        let origin = f.origin();
        let cells: Vec<GridPos> = shape.cells().map(|(c, r, _)| origin.offset(c, r)).collect();

        self.field.save_previous_grid();
        debug!("piece #{} landed at ({}, {})", f.id, origin.col, origin.row);
        self.events.push(GameEvent::PieceLanded {
            piece_id: f.id,
            kind: piece.kind,
            cells: cells.clone(),
        });

        if let Some(kind) = piece.detonation {
            match kind {
                DetonationKind::Row => {
                    let pos = cells.iter().copied().min_by_key(|p| (p.row, p.col)).unwrap_or(origin);
                    self.explosions.detonate(kind, pos, (1, 1), &mut self.events);
                }
                _ => {
                    let ext = shape.extent().unwrap_or(Extent {
                        min_col: 0,
                        max_col: 0,
                        min_row: 0,
                        max_row: 0,
                    });
                    self.explosions.detonate(
                        kind,
                        origin.offset(ext.min_col, ext.min_row),
                        (ext.width(), ext.height()),
                        &mut self.events,
                    );
                }
            }
            self.state = LogicState::FieldExplosions;
        } else {
            for (c, r, fill) in shape.cells() {
                let pos = origin.offset(c, r);
                if !self.field.place(pos, piece.sub_cell(fill, f.id).at(pos)) {
                    warn!("landing cell ({}, {}) already taken", pos.col, pos.row);
                }
            }
            self.field.manage_welds();

            let bombs = self.field.detect_impacted_bombs(&shape, origin);
            if !bombs.is_empty() {
                for pos in bombs {
                    self.explosions
                        .detonate_bomb_at(&mut self.field, pos, &mut self.events);
                }
                self.state = LogicState::FieldExplosions;
            } else if self.objective.clears_rows() && !self.field.full_rows().is_empty() {
                self.cascade.begin(&mut self.field, &mut self.events);
            }
        }
        self.finish_move();
    }

    fn finish_move(&mut self) {
        self.moves_left = self.moves_left.saturating_sub(1);
        self.falling = None;
        self.placements.clear();
        self.pending_spawn = Some(SpawnReason::NewMove);
        let progress = self.objective_progress();
        self.events.push(GameEvent::ObjectiveProgress {
            done: progress.done,
            total: progress.total,
        });
    }

    /// Undo is possible once per move, while a freshly spawned piece is falling.
    pub fn can_undo(&self) -> bool {
        self.is_playable()
            && self.state == LogicState::LogicUpdate
            && !self.cascade.is_cascading()
            && self.pending_spawn.is_none()
            && self.falling.is_some()
            && self.field.has_previous_grid()
            && self.history.can_rewind()
    }

    /// Restore the field and piece queue to the previous move's spawn.
    pub fn undo_move(&mut self) -> Result<(), LogicError> {
        if !self.is_playable() {
            return Err(LogicError::NotPlayable);
        }
        if self.falling.is_none() {
            return Err(LogicError::NoActivePiece);
        }
        if !self.can_undo() {
            return Err(LogicError::UndoUnavailable);
        }
        let undone = self.history.current().move_id;
        self.field.restore_previous_grid();
        self.field.settle_visuals();
        self.history.rewind();
        self.moves_left += 1;
        self.falling = None;
        info!("move {} undone", undone);
        self.events.push(GameEvent::MoveUndone { move_id: undone });

        if let Err(err) = self.spawn_piece(SpawnReason::UndoMove) {
            warn!("respawn after undo failed: {}", err);
            self.outcome = Some(FrameResult::GameOver);
        }
        Ok(())
    }

    pub fn set_placement_provider(&mut self, provider: Box<dyn PlacementProvider>) {
        self.provider = provider;
        if let Some((_, piece)) = self.active() {
            let placements = self.provider.placements(&self.field, piece);
            self.placements = placements;
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Suggested placement whose piece outline contains `point`.
    pub fn placement_at(&self, point: Vec2) -> Option<Placement> {
        let (_, piece) = self.active()?;
        self.placements
            .iter()
            .find(|p| piece.click_hit(p.rotation, point - p.origin().to_vec2()))
            .copied()
    }

    /// Move the active piece into `placement` and land it.
    pub fn apply_placement(&mut self, placement: Placement) -> Result<(), PlaceError> {
        if !self.is_playable() {
            return Err(PlaceError::NotPlayable);
        }
        let Some((_, piece)) = self.active() else {
            return Err(PlaceError::NoActive);
        };
        validate_placement(&self.field, piece, &placement)?;
        let Some(f) = self.falling.as_mut() else {
            return Err(PlaceError::NoActive);
        };
        f.rotation = placement.rotation;
        f.position = placement.origin().to_vec2();
        f.ghost_row = placement.row;
        f.refresh_state();
        self.land_piece();
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    pub fn falling(&self) -> Option<&FallingPiece> {
        self.falling.as_ref()
    }

    pub fn state(&self) -> LogicState {
        self.state
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    pub fn cascade_state(&self) -> CascadeState {
        self.cascade.state()
    }

    pub fn explosions(&self) -> &FieldExplosions {
        &self.explosions
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn objective_progress(&self) -> ObjectiveProgress {
        self.field.objective_progress(self.objective)
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn move_id(&self) -> u32 {
        self.history.current().move_id
    }

    pub fn upcoming(&self) -> [PieceKind; UPCOMING_PIECES] {
        let kind = |id: PieceTypeId| self.catalog.get(id).map_or(PieceKind::Dot, |p| p.kind);
        let up = self.history.current().upcoming;
        [kind(up[0]), kind(up[1])]
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn outcome(&self) -> Option<FrameResult> {
        self.outcome
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::new(self)
    }
}

/// Spawn origin: centred, top filled row just below the top of the window.
fn spawn_origin(field: &Field, ext: &Extent) -> GridPos {
    let col = (field.columns() as i32 - ext.width()) / 2 - ext.min_col;
    let row = field.top_visible_row() as i32 - 1 - ext.max_row;
    GridPos::new(col, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockweld_core::ConfigError;

    fn level(grid: &[&str], pieces: &[PieceKind]) -> LevelData {
        LevelData {
            name: "unit".into(),
            columns: grid.first().map_or(4, |r| r.len()),
            rows: 8,
            visible_rows: None,
            lowest_visible_row: 0,
            grid: grid.iter().map(|s| s.to_string()).collect(),
            blueprint: Vec::new(),
            pieces: pieces.to_vec(),
            opening: Vec::new(),
            objective: Objective::Clear,
            moves: 10,
            seed: 3,
        }
    }

    fn start(level: &LevelData) -> GameLogic {
        let mut logic = GameLogic::new(level, SimulationConfig::default()).unwrap();
        assert_eq!(logic.update(0.0), FrameResult::Running);
        logic
    }

    #[test]
    fn test_first_update_spawns() {
        let logic = start(&level(&["....", "r..r"], &[PieceKind::Dot]));
        let f = logic.falling().unwrap();
        assert_eq!(f.kind, PieceKind::Dot);
        assert_eq!(f.origin(), GridPos::new(1, 7));
        assert_eq!(f.ghost_row, 0);
        assert_eq!(logic.move_id(), 1);
    }

    #[test]
    fn test_stalling_config_is_rejected() {
        let config = SimulationConfig {
            explosion_speed: 0.0,
            ..SimulationConfig::default()
        };
        let result = GameLogic::new(&level(&["r..."], &[PieceKind::Dot]), config);
        assert!(matches!(
            result,
            Err(LevelError::Config(ConfigError::NotPositive("explosion_speed")))
        ));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "unknown piece type"))]
    fn test_unknown_piece_type_still_finishes_move() {
        let mut logic = start(&level(&["....", "r..r"], &[PieceKind::Dot]));
        if let Some(f) = logic.falling.as_mut() {
            f.piece_type = 99;
        }
        logic.land_piece();
        assert!(logic.falling().is_none());
        assert_eq!(logic.pending_spawn, Some(SpawnReason::NewMove));
        assert_eq!(logic.moves_left(), 9);
    }

    #[test]
    fn test_drop_lands_and_spends_a_move() {
        let mut logic = start(&level(&["....", "r..r"], &[PieceKind::Dot]));
        assert!(logic.drop_piece());
        assert!(logic.falling().is_none());
        assert_eq!(logic.moves_left(), 9);
        assert_eq!(logic.field().to_ascii()[7], "rr.r");
        logic.update(0.0);
        assert_eq!(logic.move_id(), 2);
        assert!(logic.falling().is_some());
    }

    #[test]
    fn test_set_column_stops_at_wall_and_blocks() {
        let mut logic = start(&level(&["....", "....", "r..."], &[PieceKind::Dot]));
        assert!(logic.set_column(-5.0));
        assert_eq!(logic.falling().unwrap().col(), 0);
        assert_eq!(logic.falling().unwrap().ghost_row, 1);
        assert!(logic.set_column(9.0));
        assert_eq!(logic.falling().unwrap().col(), 3);
        assert_eq!(logic.falling().unwrap().ghost_row, 0);
    }

    #[test]
    fn test_passive_fall_then_landing_timeout() {
        let mut logic = start(&level(&["....", "r..r"], &[PieceKind::Dot]));
        let mut frames = 0;
        while logic.falling().is_some() {
            logic.update(0.1);
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(logic.field().to_ascii()[7], "rr.r");
    }

    #[test]
    fn test_out_of_moves() {
        let mut l = level(&["....", "r..r"], &[PieceKind::Dot]);
        l.moves = 1;
        let mut logic = start(&l);
        logic.drop_piece();
        assert_eq!(logic.update(0.0), FrameResult::OutOfMoves);
        assert_eq!(logic.update(1.0), FrameResult::OutOfMoves);
    }

    #[test]
    fn test_pause_freezes_fall() {
        let mut logic = start(&level(&["....", "r..r"], &[PieceKind::Dot]));
        logic.push_input(InputCommand::Pause);
        logic.update(0.0);
        assert!(logic.is_paused());
        let y = logic.falling().unwrap().position.y;
        logic.push_input(InputCommand::Swipe(SwipeDirection::Down));
        logic.update(1.0);
        assert_eq!(logic.falling().unwrap().position.y, y);
        logic.push_input(InputCommand::Pause);
        logic.update(0.0);
        assert!(!logic.is_paused());
    }

    #[test]
    fn test_switch_keeps_position() {
        let mut l = level(&["....", "...."], &[PieceKind::Dot]);
        l.opening = vec![PieceKind::Dot, PieceKind::Wedge, PieceKind::Dot];
        let mut logic = start(&l);
        logic.set_column(0.0);
        logic.update(0.5);
        let before = logic.falling().unwrap().position;
        assert!(logic.switch_piece(0));
        let f = logic.falling().unwrap();
        assert_eq!(f.kind, PieceKind::Wedge);
        assert_eq!(f.position, before);
        assert_eq!(logic.upcoming()[0], PieceKind::Dot);
        assert_eq!(logic.move_id(), 1);
    }

    #[test]
    fn test_undo_restores_field_and_piece() {
        let mut logic = start(&level(&["....", "r..r"], &[PieceKind::Dot]));
        assert!(!logic.can_undo());
        let before = logic.field().clone();
        let first_kind = logic.falling().unwrap().kind;
        logic.drop_piece();
        logic.update(0.0);
        assert!(logic.can_undo());

        logic.undo_move().unwrap();
        assert!(logic.field().layout_eq(&before));
        assert_eq!(logic.moves_left(), 10);
        assert_eq!(logic.move_id(), 1);
        assert_eq!(logic.falling().unwrap().kind, first_kind);
        assert_eq!(logic.undo_move(), Err(LogicError::UndoUnavailable));
    }

    #[test]
    fn test_bomb_piece_detonates_on_tap() {
        let mut l = level(&["....", "rrrr", "gggg"], &[PieceKind::PointBomb]);
        l.objective = Objective::Build;
        l.grid.clear();
        l.blueprint = vec!["####".into()];
        let mut logic = start(&l);
        assert!(logic.tap());
        assert_eq!(logic.state(), LogicState::FieldExplosions);
        let events = logic.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::BombDetonated { kind: DetonationKind::Point, .. })));
        for _ in 0..200 {
            logic.update(1.0 / 60.0);
        }
        assert_eq!(logic.state(), LogicState::LogicUpdate);
    }
}
