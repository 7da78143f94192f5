//! Board module - manages the game grid
//!
//! The board is a width x height grid (10x20 by default) where each cell is empty (`0`)
//! or holds the color index of the piece that locked there.
//! Uses a flat row-major vector for cache locality.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Rows with negative y lie above the visible board; they are never stored.

use arrayvec::ArrayVec;

use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL};

/// The game board using flat vector storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board with the given dimensions
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY_CELL; width as usize * height as usize],
        }
    }

    /// Create a board from rows (top to bottom).
    ///
    /// Returns `None` when rows are empty or ragged.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let height = u8::try_from(rows.len()).ok()?;
        let width = u8::try_from(rows.first()?.len()).ok()?;
        if width == 0 || rows.iter().any(|row| row.len() != width as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.concat(),
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

    /// Get width of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the board
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
        matches!(self.get(x, y), Some(cell) if cell != EMPTY_CELL)
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8
    }

    /// Whether a single cell at (x, y) blocks a piece.
    ///
    /// Side walls and the floor block. Cells above the top (y < 0) never block.
    #[inline]
    pub fn blocks(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return true;
        }
        y >= 0 && self.is_occupied(x, y)
    }

    /// Check whether `shape` translated to (x, y) hits a wall, the floor or a filled cell
    pub fn collides(&self, shape: &[(i8, i8)], x: i8, y: i8) -> bool {
        shape.iter().any(|&(dx, dy)| self.blocks(x + dx, y + dy))
    }

    /// Write `color` into every cell of `shape` at (x, y).
    ///
    /// Nothing is written if the shape collides. Cells above the top are dropped.
    /// Returns whether the piece was committed.
    pub fn commit(&mut self, shape: &[(i8, i8)], x: i8, y: i8, color: Cell) -> bool {
        if self.collides(shape, x, y) {
            return false;
        }

        for &(dx, dy) in shape {
            if y + dy >= 0 {
                self.set(x + dx, y + dy, color);
            }
        }
        true
    }

    /// Slice of one row, or None if `y` is outside the board
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|&cell| cell != EMPTY_CELL))
    }

    /// All full rows, top to bottom
    pub fn find_full_rows(&self) -> Vec<usize> {
        (0..self.height as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Full rows within `top..=bottom` (clamped to the board), top to bottom.
    ///
    /// A locked piece spans at most four rows, so this never allocates.
    pub fn full_rows_in_span(&self, top: i8, bottom: i8) -> ArrayVec<usize, 4> {
        let mut rows = ArrayVec::new();
        let top = top.max(0) as usize;
        let bottom = bottom.max(-1);
        if bottom < 0 {
            return rows;
        }
        let bottom = (bottom as usize).min(self.height as usize - 1);
        for y in top..=bottom {
            if self.is_row_full(y) && !rows.is_full() {
                rows.push(y);
            }
        }
        rows
    }

    /// Board with the given rows removed.
    ///
    /// Remaining rows keep their order and settle at the bottom; empty rows fill the top.
    /// Indices that are out of range or repeated are ignored.
    pub fn without_rows(&self, rows: &[usize]) -> Board {
        let width = self.width as usize;
        let kept: Vec<&[Cell]> = self
            .rows()
            .enumerate()
            .filter(|(y, _)| !rows.contains(y))
            .map(|(_, row)| row)
            .collect();

        let missing = self.height as usize - kept.len();
        let mut cells = Vec::with_capacity(self.cells.len());
        cells.resize(missing * width, EMPTY_CELL);
        for row in kept {
            cells.extend_from_slice(row);
        }

        Board {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Remove the given rows in place, shifting everything above them down
    pub fn remove_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        *self = self.without_rows(rows);
    }

    /// Number of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != EMPTY_CELL).count()
    }

    /// True when no cell is filled
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == EMPTY_CELL)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy rows into a vector of vectors (top to bottom)
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T_NORTH: [(i8, i8); 4] = [(1, 0), (0, 1), (1, 1), (2, 1)];

    fn fill_row(board: &mut Board, y: i8, color: Cell) {
        for x in 0..board.width() as i8 {
            board.set(x, y, color);
        }
    }

    #[test]
    fn test_board_index_calculation() {
        let board = Board::default();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_collides_walls_and_floor() {
        let board = Board::default();
        assert!(!board.collides(&T_NORTH, 0, 0));
        assert!(board.collides(&T_NORTH, -1, 0));
        assert!(board.collides(&T_NORTH, 8, 0));
        assert!(!board.collides(&T_NORTH, 7, 18));
        assert!(board.collides(&T_NORTH, 7, 19));
    }

    #[test]
    fn test_cells_above_top_pass_freely() {
        let mut board = Board::default();
        fill_row(&mut board, 0, 1);
        board.set(4, 0, EMPTY_CELL);

        // Only the stem at (4, 0) is visible; the bar sits at y = -1.
        let t_south = [(0, 1), (1, 1), (2, 1), (1, 2)];
        assert!(!board.collides(&t_south, 3, -2));
        // Walls still reject cells above the top.
        assert!(board.collides(&t_south, -1, -3));
    }

    #[test]
    fn test_commit_writes_color_and_rejects_overlap() {
        let mut board = Board::default();
        assert!(board.commit(&T_NORTH, 3, 18, 3));
        assert_eq!(board.get(4, 18), Some(3));
        assert_eq!(board.occupied_count(), 4);

        assert!(!board.commit(&T_NORTH, 3, 18, 5));
        assert_eq!(board.occupied_count(), 4);

        // Only the visible row of a piece straddling the top is written.
        assert!(board.commit(&T_NORTH, 3, -1, 5));
        assert_eq!(board.occupied_count(), 7);
        assert_eq!(board.get(4, 0), Some(5));
    }

    #[test]
    fn test_without_rows_compacts() {
        let mut board = Board::default();
        fill_row(&mut board, 19, 1);
        fill_row(&mut board, 17, 2);
        board.set(0, 18, 7);
        board.set(5, 16, 4);

        let full = board.find_full_rows();
        assert_eq!(full, vec![17, 19]);

        let cleared = board.without_rows(&full);
        assert_eq!(cleared.height(), 20);
        assert_eq!(cleared.get(0, 19), Some(7));
        assert_eq!(cleared.get(5, 18), Some(4));
        assert_eq!(cleared.occupied_count(), 2);
        // The source board is untouched.
        assert_eq!(board.occupied_count(), 22);
    }

    #[test]
    fn test_full_rows_in_span() {
        let mut board = Board::default();
        fill_row(&mut board, 18, 1);
        fill_row(&mut board, 19, 1);
        assert_eq!(board.full_rows_in_span(16, 19).as_slice(), &[18, 19]);
        assert_eq!(board.full_rows_in_span(-3, 17).as_slice(), &[] as &[usize]);
        assert_eq!(board.full_rows_in_span(-3, -1).len(), 0);
    }

    #[test]
    fn test_from_rows_roundtrip() {
        let mut rows = vec![vec![0u8; 10]; 20];
        rows[5][3] = 2;
        rows[10][7] = 7;

        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.to_rows(), rows);

        assert!(Board::from_rows(&[vec![0; 3], vec![0; 4]]).is_none());
        assert!(Board::from_rows(&[]).is_none());
    }
}
