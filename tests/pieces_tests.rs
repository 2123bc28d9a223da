//! Piece catalog and rotation tests

use blockfall::core::{base_shape, Piece, PieceRandomizer, Shape};
use blockfall::types::PieceKind;

#[test]
fn test_instantiate_within_bounds_for_every_width() {
    for width in [4u8, 5, 7, 10, 13, 40] {
        for kind in PieceKind::ALL {
            let piece = Piece::instantiate(kind, width);
            assert_eq!(piece.y, 0);
            for (x, y) in piece.cells() {
                assert!(x >= 0 && x < width as i8, "{:?} x={} width={}", kind, x, width);
                assert!(y >= 0);
            }
        }
    }
}

#[test]
fn test_spawn_columns_on_standard_board() {
    let expected = [
        (PieceKind::I, 3),
        (PieceKind::O, 4),
        (PieceKind::T, 4),
        (PieceKind::S, 4),
        (PieceKind::Z, 4),
        (PieceKind::J, 4),
        (PieceKind::L, 4),
    ];
    for (kind, x) in expected {
        assert_eq!(Piece::instantiate(kind, 10).x, x, "{:?}", kind);
    }
}

#[test]
fn test_four_rotations_return_start_shape() {
    for kind in PieceKind::ALL {
        let shape = base_shape(kind);
        let mut rotated = shape;
        let mut distinct = vec![shape];
        for _ in 0..4 {
            rotated = rotated.rotate_cw();
            if !distinct.contains(&rotated) {
                distinct.push(rotated);
            }
        }
        assert_eq!(rotated, shape, "{:?}", kind);
        assert!(distinct.len() <= 4);
        if kind == PieceKind::O {
            assert_eq!(shape.rotate_cw(), shape);
        }
    }
}

#[test]
fn test_rotation_formula() {
    let l = base_shape(PieceKind::L);
    assert_eq!(l.to_rows(), vec![vec![0, 0, 1], vec![1, 1, 1]]);
    assert_eq!(l.rotate_cw().to_rows(), vec![vec![1, 0], vec![1, 0], vec![1, 1]]);

    let i = base_shape(PieceKind::I);
    assert_eq!(i.rotate_cw().to_rows(), vec![vec![1], vec![1], vec![1], vec![1]]);
}

#[test]
fn test_shape_json_validation() {
    let shape: Shape = serde_json::from_str("[[1,1],[1,1]]").unwrap();
    assert_eq!(shape, base_shape(PieceKind::O));

    assert!(serde_json::from_str::<Shape>("[[1,1,1]]").is_err());
    assert!(serde_json::from_str::<Shape>("[[1,1],[1]]").is_err());
    assert!(serde_json::from_str::<Shape>("[]").is_err());
}

#[test]
fn test_piece_colors_match_palette() {
    let hex: Vec<String> = PieceKind::ALL.iter().map(|k| k.color().to_hex()).collect();
    assert_eq!(
        hex,
        vec!["#A2B5C3", "#5D5337", "#193A3E", "#4D757B", "#ADA799", "#7A8B99", "#8C9A7E"]
    );
}

#[test]
fn test_randomizer_is_seed_deterministic() {
    let mut a = PieceRandomizer::new(2718);
    let mut b = PieceRandomizer::new(2718);
    let seq_a: Vec<PieceKind> = (0..50).map(|_| a.draw()).collect();
    let seq_b: Vec<PieceKind> = (0..50).map(|_| b.draw()).collect();
    assert_eq!(seq_a, seq_b);
}
