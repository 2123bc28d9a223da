//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds the
//! kind of the piece that locked there. Storage is a flat row-major vector
//! sized once at construction; dimensions never change afterwards.
//! Coordinates: (x, y) where x grows left to right and y grows downward
//! (row 0 is the top).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pieces::{Piece, Shape};
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, MAX_BOARD_EDGE, MIN_BOARD_EDGE};

/// Board matrix validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    BadHeight(usize),
    BadWidth(usize),
    Ragged { row: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::BadHeight(h) => write!(f, "board height {} out of range", h),
            BoardError::BadWidth(w) => write!(f, "board width {} out of range", w),
            BoardError::Ragged { row } => write!(f, "board row {} has the wrong width", row),
        }
    }
}

impl std::error::Error for BoardError {}

/// The game board using flat vector storage
///
/// Serialized as a list of rows, top row first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    ///
    /// Dimensions are clamped to the supported range.
    pub fn new(width: u8, height: u8) -> Self {
        let width = width.clamp(MIN_BOARD_EDGE, MAX_BOARD_EDGE);
        let height = height.clamp(MIN_BOARD_EDGE, MAX_BOARD_EDGE);
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Build a board from rows (top row first)
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let height = rows.len();
        if !(MIN_BOARD_EDGE as usize..=MAX_BOARD_EDGE as usize).contains(&height) {
            return Err(BoardError::BadHeight(height));
        }
        let width = rows[0].len();
        if !(MIN_BOARD_EDGE as usize..=MAX_BOARD_EDGE as usize).contains(&width) {
            return Err(BoardError::BadWidth(width));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(BoardError::Ragged { row: y });
            }
            cells.extend(row);
        }

        Ok(Self {
            width: width as u8,
            height: height as u8,
            cells,
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Cells of row `y`, left to right
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let width = self.width as usize;
        let start = y * width;
        Some(&self.cells[start..start + width])
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Whether `shape` fits with its top-left corner at `(x, y)`
    ///
    /// Cells above the board (row < 0) only have to respect the side walls;
    /// this is what lets pieces spawn partially hidden.
    pub fn is_valid_placement(&self, shape: &Shape, x: i8, y: i8) -> bool {
        shape.cells().iter().all(|&(dx, dy)| {
            let px = x + dx;
            let py = y + dy;
            if px < 0 || px >= self.width as i8 || py >= self.height as i8 {
                return false;
            }
            py < 0 || !self.is_occupied(px, py)
        })
    }

    /// Whether `piece` fits where it currently is
    pub fn fits(&self, piece: &Piece) -> bool {
        self.is_valid_placement(&piece.shape, piece.x, piece.y)
    }

    /// Write the piece's cells into the board
    ///
    /// Cells above the top row are dropped. Returns how many cells were written.
    pub fn lock_piece(&mut self, piece: &Piece) -> usize {
        let mut written = 0;
        for (x, y) in piece.cells() {
            if y < 0 {
                continue;
            }
            if self.set(x, y, Some(piece.kind)) {
                written += 1;
            }
        }
        written
    }

    /// Remove every full row and return how many were removed
    ///
    /// Rows above a removed row slide down keeping their order; empty rows
    /// enter at the top. Two-pointer compaction, scanning bottom to top.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let mut cleared = 0;
        let mut write_y = self.height as usize;

        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Vacated rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// True when no cell is occupied
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Flat row-major cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert to rows (top first)
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}
