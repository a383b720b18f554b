//! Game logic tests - full moves through the orchestrator

use blockweld::core::{LevelData, SimulationConfig};
use blockweld::engine::{GameLogic, LogicError, LogicState, Placement};
use blockweld::input::{GestureInterpreter, TouchEvent};
use blockweld::types::{
    FrameResult, GameEvent, GridPos, InputCommand, Objective, PieceKind, Rotation, SwipeDirection,
    Vec2,
};

const DT: f32 = 1.0 / 60.0;

fn level(rows: usize, grid: &[&str], pieces: &[PieceKind]) -> LevelData {
    LevelData {
        name: "test".into(),
        columns: grid.first().map_or(4, |r| r.len()),
        rows,
        visible_rows: None,
        lowest_visible_row: 0,
        grid: grid.iter().map(|s| s.to_string()).collect(),
        blueprint: Vec::new(),
        pieces: pieces.to_vec(),
        opening: Vec::new(),
        objective: Objective::Clear,
        moves: 20,
        seed: 42,
    }
}

fn started(level: &LevelData) -> GameLogic {
    let mut logic = GameLogic::new(level, SimulationConfig::default()).unwrap();
    assert_eq!(logic.update(DT), FrameResult::Running);
    assert!(logic.falling().is_some());
    logic
}

fn run_until_finished(logic: &mut GameLogic, events: &mut Vec<GameEvent>) -> FrameResult {
    for _ in 0..2000 {
        let result = logic.update(DT);
        events.extend(logic.take_events());
        if result.is_finished() {
            return result;
        }
    }
    panic!("level never finished");
}

#[test]
fn test_filling_the_gap_completes_clear_level() {
    let mut logic = started(&level(6, &["rr.r"], &[PieceKind::Dot]));
    assert!(logic.set_column(2.0));
    assert!(logic.drop_piece());

    let mut events = logic.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::RowsCleared { rows, cells } if rows == &vec![0] && cells.len() == 4
    )));
    assert_eq!(run_until_finished(&mut logic, &mut events), FrameResult::LevelCompleted);
    assert!(logic.objective_progress().completed);
}

#[test]
fn test_landing_cascades_twice() {
    let mut logic = started(&level(
        7,
        &[".r.", "g..", ".pp", "b.y", "og."],
        &[PieceKind::Dot],
    ));
    let hole = Placement {
        rotation: Rotation::North,
        col: 2,
        row: 0,
    };
    logic.apply_placement(hole).unwrap();

    let mut events = logic.take_events();
    let result = run_until_finished(&mut logic, &mut events);
    let levels: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Cascade { level } => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(levels, vec![1, 2]);
    assert_eq!(logic.cascade().cycles(), 2);
    assert_eq!(result, FrameResult::LevelCompleted);
}

#[test]
fn test_row_bomb_piece_clears_its_row() {
    let mut logic = started(&level(6, &["rr.rr"], &[PieceKind::RowBomb]));
    assert_eq!(logic.falling().unwrap().origin(), GridPos::new(2, 5));
    assert!(logic.drop_piece());
    assert_eq!(logic.state(), LogicState::FieldExplosions);

    let mut events = logic.take_events();
    assert_eq!(run_until_finished(&mut logic, &mut events), FrameResult::LevelCompleted);
    assert!(events.iter().any(|e| matches!(e, GameEvent::RowsRemoved { rows } if rows == &vec![0])));
}

#[test]
fn test_blocked_spawn_is_game_over() {
    let l = level(3, &["rgb", "...", "..."], &[PieceKind::Dot]);
    let mut logic = GameLogic::new(&l, SimulationConfig::default()).unwrap();
    assert_eq!(logic.update(DT), FrameResult::GameOver);
    assert!(logic.falling().is_none());
    assert_eq!(logic.update(DT), FrameResult::GameOver);
}

#[test]
fn test_undo_round_trip() {
    let mut logic = started(&level(6, &["r...", "rr.r"], &[PieceKind::Dot, PieceKind::Wedge]));
    let before = logic.field().clone();
    let first = logic.falling().unwrap().kind;
    let upcoming = logic.upcoming();

    let placement = logic.placements()[0];
    logic.apply_placement(placement).unwrap();
    logic.update(DT);
    assert!(logic.falling().is_some());
    assert!(logic.can_undo());

    logic.push_input(InputCommand::Undo);
    logic.update(DT);
    assert!(logic.field().layout_eq(&before));
    assert_eq!(logic.falling().unwrap().kind, first);
    assert_eq!(logic.upcoming(), upcoming);
    assert_eq!(logic.moves_left(), 20);
    assert!(logic
        .take_events()
        .iter()
        .any(|e| matches!(e, GameEvent::MoveUndone { move_id: 2 })));

    assert_eq!(logic.undo_move(), Err(LogicError::UndoUnavailable));
}

#[test]
fn test_undo_unavailable_on_first_move() {
    let mut logic = started(&level(6, &["r..."], &[PieceKind::Dot]));
    assert!(!logic.can_undo());
    assert_eq!(logic.undo_move(), Err(LogicError::UndoUnavailable));
}

#[test]
fn test_build_level_never_clears_rows() {
    let mut l = level(6, &[], &[PieceKind::Dot]);
    l.columns = 2;
    l.objective = Objective::Build;
    l.blueprint = vec!["##".into()];
    let mut logic = started(&l);

    assert!(logic.drop_piece());
    logic.update(DT);
    assert!(logic.set_column(1.0));
    assert!(logic.drop_piece());
    let events = logic.take_events();
    assert!(!events.iter().any(|e| matches!(e, GameEvent::RowsCleared { .. })));
    assert_eq!(logic.field().to_ascii()[5], "rr");
    let mut events = Vec::new();
    assert_eq!(run_until_finished(&mut logic, &mut events), FrameResult::LevelCompleted);
}

#[test]
fn test_gestures_drive_the_piece() {
    let mut l = level(8, &["......"], &[PieceKind::T]);
    l.opening = vec![PieceKind::T, PieceKind::Dot];
    let mut logic = started(&l);
    let mut gestures = GestureInterpreter::default();

    gestures.handle(TouchEvent::Begin { pos: Vec2::new(2.0, 5.0), time: 0.0 });
    for command in gestures.handle(TouchEvent::End { pos: Vec2::new(2.0, 5.0), time: 0.1 }) {
        logic.push_input(command);
    }
    logic.update(DT);
    assert_eq!(logic.falling().unwrap().rotation, Rotation::East);

    gestures.handle(TouchEvent::Begin { pos: Vec2::new(3.0, 5.0), time: 1.0 });
    let commands = gestures.handle(TouchEvent::End { pos: Vec2::new(0.0, 5.0), time: 1.1 });
    assert_eq!(commands.as_slice(), &[InputCommand::Swipe(SwipeDirection::Left)]);
    logic.push_input(commands[0]);
    logic.update(DT);
    assert_eq!(logic.falling().unwrap().kind, PieceKind::Dot);
    assert_eq!(logic.upcoming()[0], PieceKind::T);
}

#[test]
fn test_drag_moves_and_lowers_piece() {
    let mut logic = started(&level(10, &["......"], &[PieceKind::Dot]));
    logic.push_input(InputCommand::DragTo { x: 5.0, y: 3.0 });
    logic.update(DT);
    let f = logic.falling().unwrap();
    assert_eq!(f.col(), 5);
    assert!(f.position.y < 9.0);
    for _ in 0..30 {
        logic.update(DT);
    }
    assert!(logic.falling().unwrap().position.y <= 3.0);
}
