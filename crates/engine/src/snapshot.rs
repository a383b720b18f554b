//! Serializable view of a running game for observers and the runner report.

use serde::Serialize;

use blockweld_core::{FieldSnapshot, ObjectiveProgress};
use blockweld_types::{FrameResult, PieceKind, Rotation, UPCOMING_PIECES};

use crate::cascade::CascadeState;
use crate::falling::FallingState;
use crate::game_logic::{GameLogic, LogicState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveSnapshot {
    pub id: u32,
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub col: i32,
    pub y: f32,
    pub ghost_row: i32,
    pub state: FallingState,
}

/// Everything an observer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub field: FieldSnapshot,
    pub active: Option<ActiveSnapshot>,
    pub upcoming: [PieceKind; UPCOMING_PIECES],
    pub move_id: u32,
    pub moves_left: u32,
    pub exploding: bool,
    pub cascade: CascadeState,
    pub rows_cleared: u32,
    pub objective: ObjectiveProgress,
    pub can_undo: bool,
    pub paused: bool,
    pub outcome: Option<FrameResult>,
}

impl GameSnapshot {
    pub fn new(logic: &GameLogic) -> Self {
        let active = logic.falling().map(|f| ActiveSnapshot {
            id: f.id,
            kind: f.kind,
            rotation: f.rotation,
            col: f.col(),
            y: f.position.y,
            ghost_row: f.ghost_row,
            state: f.state,
        });
        Self {
            field: FieldSnapshot::from(logic.field()),
            active,
            upcoming: logic.upcoming(),
            move_id: logic.move_id(),
            moves_left: logic.moves_left(),
            exploding: logic.state() == LogicState::FieldExplosions,
            cascade: logic.cascade_state(),
            rows_cleared: logic.cascade().rows_cleared(),
            objective: logic.objective_progress(),
            can_undo: logic.can_undo(),
            paused: logic.is_paused(),
            outcome: logic.outcome(),
        }
    }

    pub fn playable(&self) -> bool {
        self.outcome.is_none() && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockweld_core::{LevelData, SimulationConfig};
    use blockweld_types::Objective;

    #[test]
    fn test_snapshot_serializes() {
        let level = LevelData {
            name: "snap".into(),
            columns: 3,
            rows: 4,
            visible_rows: None,
            lowest_visible_row: 0,
            grid: vec!["r.g".into()],
            blueprint: Vec::new(),
            pieces: vec![PieceKind::Dot],
            opening: Vec::new(),
            objective: Objective::Clear,
            moves: 5,
            seed: 0,
        };
        let mut logic = GameLogic::new(&level, SimulationConfig::default()).unwrap();
        logic.update(0.0);
        let snap = logic.snapshot();
        assert!(snap.playable());
        assert_eq!(snap.active.map(|a| a.kind), Some(PieceKind::Dot));
        assert_eq!(snap.objective.total, 2);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["moves_left"], 5);
        assert_eq!(json["active"]["state"], "falling");
        assert_eq!(json["cascade"], "not_cascading");
        assert_eq!(json["field"]["grid"][3], "r.g");
    }
}
