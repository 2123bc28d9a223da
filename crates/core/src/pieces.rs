//! Pieces module - tetromino catalog, shape matrices and rotation
//!
//! Shapes are small rectangular boolean matrices (at most 4x4). A piece's
//! `(x, y)` is the board position of the matrix's top-left corner.
//!
//! Rotation is a pure 90° clockwise matrix transform. There are no wall
//! kicks: callers reject a rotation whose result does not fit in place.

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::PieceKind;

/// Largest shape edge supported
pub const MAX_SHAPE_DIM: usize = 4;

/// Occupied cells in every tetromino
pub const TETROMINO_CELLS: usize = 4;

/// Offset of a single occupied cell relative to the shape origin: `(col, row)`
pub type MinoOffset = (i8, i8);

/// Occupied-cell offsets of a shape (zero-allocation)
pub type ShapeCells = ArrayVec<MinoOffset, { MAX_SHAPE_DIM * MAX_SHAPE_DIM }>;

/// Shape matrix validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    Empty,
    TooLarge,
    Ragged,
    BadCellCount(usize),
}

impl ShapeError {
    pub fn code(self) -> &'static str {
        match self {
            ShapeError::Empty => "shape_empty",
            ShapeError::TooLarge => "shape_too_large",
            ShapeError::Ragged => "shape_ragged",
            ShapeError::BadCellCount(_) => "shape_cell_count",
        }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Empty => write!(f, "shape has no rows or columns"),
            ShapeError::TooLarge => write!(f, "shape exceeds {0}x{0}", MAX_SHAPE_DIM),
            ShapeError::Ragged => write!(f, "shape rows have different lengths"),
            ShapeError::BadCellCount(n) => {
                write!(f, "shape has {} occupied cells, expected {}", n, TETROMINO_CELLS)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Rectangular occupancy matrix of a piece.
///
/// Serialized as a nested `0`/`1` matrix, e.g. `[[0,1,0],[1,1,1]]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

impl Shape {
    const fn from_bits(rows: u8, cols: u8, bits: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM]) -> Self {
        Self { rows, cols, bits }
    }

    /// Build a shape from `0`/non-zero rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let row_count = rows.len();
        let col_count = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if row_count == 0 || col_count == 0 {
            return Err(ShapeError::Empty);
        }
        if row_count > MAX_SHAPE_DIM || col_count > MAX_SHAPE_DIM {
            return Err(ShapeError::TooLarge);
        }

        let mut bits = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != col_count {
                return Err(ShapeError::Ragged);
            }
            for (j, &v) in row.iter().enumerate() {
                bits[i][j] = v != 0;
            }
        }

        Ok(Self::from_bits(row_count as u8, col_count as u8, bits))
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Whether matrix cell `(row, col)` is occupied (false outside the matrix)
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows as usize && col < self.cols as usize && self.bits[row][col]
    }

    /// Offsets `(col, row)` of every occupied cell, row-major.
    pub fn cells(&self) -> ShapeCells {
        let mut out = ShapeCells::new();
        for i in 0..self.rows as usize {
            for j in 0..self.cols as usize {
                if self.bits[i][j] {
                    out.push((j as i8, i as i8));
                }
            }
        }
        out
    }

    pub fn cell_count(&self) -> usize {
        self.cells().len()
    }

    /// Rotate 90° clockwise: `rotated[j][rows-1-i] = shape[i][j]`.
    ///
    /// A `rows x cols` shape becomes `cols x rows`.
    pub fn rotate_cw(&self) -> Shape {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut bits = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for i in 0..rows {
            for j in 0..cols {
                bits[j][rows - 1 - i] = self.bits[i][j];
            }
        }
        Shape::from_bits(self.cols, self.rows, bits)
    }

    /// Nested `0`/`1` rows (the persisted form).
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows as usize)
            .map(|i| {
                (0..self.cols as usize)
                    .map(|j| u8::from(self.bits[i][j]))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape{:?}", self.to_rows())
    }
}

impl TryFrom<Vec<Vec<u8>>> for Shape {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let shape = Shape::from_rows(&rows)?;
        let count = shape.cell_count();
        if count != TETROMINO_CELLS {
            return Err(ShapeError::BadCellCount(count));
        }
        Ok(shape)
    }
}

impl From<Shape> for Vec<Vec<u8>> {
    fn from(shape: Shape) -> Self {
        shape.to_rows()
    }
}

const X: bool = true;
const O: bool = false;

const I_SHAPE: Shape = Shape::from_bits(1, 4, [[X, X, X, X], [O; 4], [O; 4], [O; 4]]);
const O_SHAPE: Shape = Shape::from_bits(2, 2, [[X, X, O, O], [X, X, O, O], [O; 4], [O; 4]]);
const T_SHAPE: Shape = Shape::from_bits(2, 3, [[O, X, O, O], [X, X, X, O], [O; 4], [O; 4]]);
const S_SHAPE: Shape = Shape::from_bits(2, 3, [[O, X, X, O], [X, X, O, O], [O; 4], [O; 4]]);
const Z_SHAPE: Shape = Shape::from_bits(2, 3, [[X, X, O, O], [O, X, X, O], [O; 4], [O; 4]]);
const J_SHAPE: Shape = Shape::from_bits(2, 3, [[X, O, O, O], [X, X, X, O], [O; 4], [O; 4]]);
const L_SHAPE: Shape = Shape::from_bits(2, 3, [[O, O, X, O], [X, X, X, O], [O; 4], [O; 4]]);

/// Spawn-orientation shape of a piece kind
pub fn base_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::Z => Z_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
    }
}

/// Spawn column for a shape on a board of the given width
pub fn spawn_x(board_width: u8, shape: &Shape) -> i8 {
    (board_width / 2) as i8 - (shape.cols() / 2) as i8
}

/// A piece on (or above) the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Fresh piece of `kind` at the spawn position
    pub fn instantiate(kind: PieceKind, board_width: u8) -> Self {
        let shape = base_shape(kind);
        Self {
            kind,
            shape,
            x: spawn_x(board_width, &shape),
            y: 0,
        }
    }

    /// Same piece moved by `(dx, dy)`
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Same piece at the same position, shape rotated clockwise
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotate_cw(),
            ..*self
        }
    }

    /// Absolute board coordinates `(x, y)` of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .into_iter()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_shapes_have_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(base_shape(kind).cell_count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn t_shape_rows() {
        assert_eq!(base_shape(PieceKind::T).to_rows(), vec![vec![0, 1, 0], vec![1, 1, 1]]);
    }

    #[test]
    fn rotate_t_clockwise() {
        let rotated = base_shape(PieceKind::T).rotate_cw();
        assert_eq!(rotated.rows(), 3);
        assert_eq!(rotated.cols(), 2);
        assert_eq!(rotated.to_rows(), vec![vec![1, 0], vec![1, 1], vec![1, 0]]);
    }

    #[test]
    fn rotate_i_swaps_dimensions() {
        let vertical = base_shape(PieceKind::I).rotate_cw();
        assert_eq!((vertical.rows(), vertical.cols()), (4, 1));
        assert_eq!(vertical.cells().as_slice(), &[(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn spawn_positions_are_centered() {
        assert_eq!(Piece::instantiate(PieceKind::I, 10).x, 3);
        assert_eq!(Piece::instantiate(PieceKind::O, 10).x, 4);
        assert_eq!(Piece::instantiate(PieceKind::T, 10).x, 4);
        assert_eq!(Piece::instantiate(PieceKind::T, 10).y, 0);
    }

    #[test]
    fn shape_from_rows_rejects_bad_input() {
        let empty: [[u8; 0]; 0] = [];
        assert_eq!(Shape::from_rows(&empty), Err(ShapeError::Empty));
        assert_eq!(Shape::from_rows(&[vec![1u8; 5]]), Err(ShapeError::TooLarge));
        assert_eq!(
            Shape::from_rows(&[vec![1u8, 1], vec![1u8]]),
            Err(ShapeError::Ragged)
        );
    }

    #[test]
    fn shape_json_uses_matrix_form() {
        let json = serde_json::to_string(&base_shape(PieceKind::S)).unwrap();
        assert_eq!(json, "[[0,1,1],[1,1,0]]");

        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, base_shape(PieceKind::S));
    }

    #[test]
    fn shape_json_rejects_wrong_cell_count() {
        assert!(serde_json::from_str::<Shape>("[[1,1,1]]").is_err());
        assert!(serde_json::from_str::<Shape>("[[1,1],[1]]").is_err());
    }

    #[test]
    fn piece_cells_are_absolute() {
        let piece = Piece::instantiate(PieceKind::O, 10).shifted(1, 2);
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(5, 2), (6, 2), (5, 3), (6, 3)]);
    }
}
