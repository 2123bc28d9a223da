//! Integration tests for the game engine: lock sequence, scoring, leveling,
//! game over and snapshot/restore.

use blockfall::core::{base_shape, GameSnapshot, GameState, Piece, SnapshotError};
use blockfall::types::{EngineConfig, GameAction, GameEvent, Phase, PieceKind};

/// Running game whose board and current piece were replaced
fn staged_game(seed: u32, setup: impl FnOnce(&mut GameSnapshot)) -> GameState {
    let mut game = GameState::new(seed);
    game.start();
    let mut snap = game.snapshot();
    setup(&mut snap);
    game.restore(&snap).unwrap();
    game
}

fn fill_row_except(snap: &mut GameSnapshot, y: i8, gaps: &[i8]) {
    for x in 0..snap.board.width() as i8 {
        if !gaps.contains(&x) {
            snap.board.set(x, y, Some(PieceKind::Z));
        }
    }
}

fn vertical_i(x: i8, y: i8) -> Piece {
    Piece {
        kind: PieceKind::I,
        shape: base_shape(PieceKind::I).rotate_cw(),
        x,
        y,
    }
}

#[test]
fn test_game_lifecycle() {
    let mut game = GameState::new(12345);
    assert_eq!(game.phase(), Phase::Ready);

    game.start();
    assert_eq!(game.phase(), Phase::Running);
    assert!(game.current_piece().is_some());
    assert!(game.next_piece().is_some());

    game.apply_action(GameAction::Pause);
    assert_eq!(game.phase(), Phase::Paused);
    game.apply_action(GameAction::Pause);
    assert_eq!(game.phase(), Phase::Running);
}

#[test]
fn test_tetris_awards_1200_at_level_one() {
    let mut game = staged_game(1, |snap| {
        for y in 16..20 {
            fill_row_except(snap, y, &[9]);
        }
        snap.current_piece = Some(vertical_i(9, 0));
    });

    assert!(game.apply_action(GameAction::HardDrop));

    assert_eq!(game.score(), 1200);
    assert_eq!(game.lines(), 4);
    assert_eq!(game.level(), 1);
    assert!(game.board().is_empty());

    let events = game.take_events();
    assert_eq!(
        events[0],
        GameEvent::PieceLocked {
            kind: PieceKind::I,
            lines_cleared: 4
        }
    );
    assert_eq!(events[1], GameEvent::LinesCleared { count: 4, points: 1200 });
}

#[test]
fn test_ten_lines_level_up() {
    let mut game = staged_game(1, |_| {});

    // Clear one line at a time with a vertical I filling a single gap.
    for cleared in 1..=10u32 {
        let level_before = game.level();
        let mut snap = game.snapshot();
        snap.board.clear();
        fill_row_except(&mut snap, 19, &[0]);
        snap.current_piece = Some(vertical_i(0, 0));
        game.restore(&snap).unwrap();

        game.hard_drop();
        assert_eq!(game.lines(), cleared);
        if cleared < 10 {
            assert_eq!(game.level(), level_before);
        }
    }

    assert_eq!(game.level(), 2);
    assert_eq!(game.lines_this_level(), 0);
    assert_eq!(game.fall_interval_ms(), 950);
    // Nine singles at level 1 plus the tenth, still scored at level 1.
    assert_eq!(game.score(), 400);
    assert!(game
        .take_events()
        .contains(&GameEvent::LevelUp { level: 2, fall_interval_ms: 950 }));
}

#[test]
fn test_fall_interval_floor_with_custom_rules() {
    let config = EngineConfig {
        base_fall_ms: 80,
        lines_per_level: 1,
        ..EngineConfig::default()
    };
    let mut game = GameState::with_config(config, 5);
    game.start();

    for _ in 0..3 {
        let mut snap = game.snapshot();
        snap.board.clear();
        fill_row_except(&mut snap, 19, &[0]);
        snap.current_piece = Some(vertical_i(0, 0));
        game.restore(&snap).unwrap();
        game.hard_drop();
    }

    assert_eq!(game.level(), 4);
    assert_eq!(game.fall_interval_ms(), 50);
}

#[test]
fn test_blocked_spawn_is_immediate_game_over() {
    let mut game = GameState::new(77);
    let mut snap = game.snapshot();
    for x in 0..10 {
        snap.board.set(x, 0, Some(PieceKind::T));
    }
    game.restore(&snap).unwrap();
    assert_eq!(game.phase(), Phase::Ready);

    game.start();

    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(game.take_events(), vec![GameEvent::GameOver { score: 0 }]);

    let frozen = game.snapshot();
    for action in [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::Rotate,
        GameAction::Pause,
    ] {
        assert!(!game.apply_action(action), "{:?}", action);
    }
    assert!(!game.tick(60_000));
    assert_eq!(game.snapshot(), frozen);
    assert!(game.take_events().is_empty());
}

#[test]
fn test_game_over_after_stack_reaches_top() {
    let mut game = GameState::new(2024);
    game.start();
    let mut drops = 0;
    while !game.game_over() && drops < 500 {
        game.hard_drop();
        drops += 1;
    }
    assert!(game.game_over());
    assert!(matches!(
        game.take_events().last(),
        Some(GameEvent::GameOver { .. })
    ));

    assert!(game.apply_action(GameAction::NewGame));
    assert_eq!(game.phase(), Phase::Running);
    assert!(game.board().is_empty());
    assert_eq!(game.score(), 0);
}

#[test]
fn test_snapshot_restore_identical_and_same_future() {
    let mut live = staged_game(8080, |snap| {
        fill_row_except(snap, 19, &[4]);
        snap.board.set(1, 18, Some(PieceKind::J));
    });
    live.tick(640);
    assert_eq!(live.fall_accumulator_ms(), 640);

    let json = serde_json::to_string(&live.snapshot()).unwrap();
    let snap: GameSnapshot = serde_json::from_str(&json).unwrap();
    let mut copy = GameState::new(1);
    copy.restore(&snap).unwrap();
    assert_eq!(copy.snapshot(), live.snapshot());

    let script = [
        GameAction::MoveLeft,
        GameAction::Rotate,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::MoveRight,
        GameAction::HardDrop,
    ];
    for action in script {
        live.apply_action(action);
        copy.apply_action(action);
        live.tick(400);
        copy.tick(400);
        assert_eq!(copy.snapshot(), live.snapshot());
    }
    for _ in 0..100 {
        live.tick(16);
        copy.tick(16);
    }
    assert_eq!(copy.snapshot(), live.snapshot());
    assert_eq!(copy.take_events(), live.take_events());
}

#[test]
fn test_gravity_is_time_based() {
    let mut game = GameState::new(3);
    game.start();
    let y0 = game.current_piece().unwrap().y;

    for _ in 0..62 {
        game.tick(16);
    }
    assert_eq!(game.current_piece().unwrap().y, y0);
    game.tick(16);
    assert_eq!(game.current_piece().unwrap().y, y0 + 1);
    assert_eq!(game.fall_accumulator_ms(), 8);
}

#[test]
fn test_restore_rejects_misplaced_pieces() {
    let mut game = staged_game(41, |snap| fill_row_except(snap, 19, &[0]));
    let before = game.snapshot();

    let mut overlapping = before.clone();
    overlapping.current_piece = Some(vertical_i(5, 16));
    assert_eq!(game.restore(&overlapping), Err(SnapshotError::PieceOverlap));

    let mut off_board = before.clone();
    if let Some(piece) = off_board.current_piece.as_mut() {
        piece.x = 125;
    }
    assert_eq!(game.restore(&off_board), Err(SnapshotError::PieceOutOfBounds));

    let mut next_below = before.clone();
    next_below.next_piece = Some(vertical_i(0, 30));
    assert_eq!(game.restore(&next_below), Err(SnapshotError::PieceOutOfBounds));

    assert_eq!(game.snapshot(), before);
    assert!(game.tick(5_000));
}
