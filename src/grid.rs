use std::fmt;

use crate::error::MazeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Wall,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Rectangular cell grid, stored row-major as `cells[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<CellState>>,
}

impl Grid {
    /// A grid with every cell set to `Wall`.
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![CellState::Wall; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Bounds-checked read. Every lookup by rendering and movement goes
    /// through here.
    pub fn cell_at(&self, x: isize, y: isize) -> Result<CellState, MazeError> {
        if !self.in_bounds(x, y) {
            return Err(MazeError::OutOfBounds { x, y });
        }
        Ok(self.cells[y as usize][x as usize])
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        matches!(
            self.cell_at(pos.x as isize, pos.y as isize),
            Ok(CellState::Open)
        )
    }

    pub(crate) fn set(&mut self, pos: Pos, state: CellState) {
        self.cells[pos.y][pos.x] = state;
    }

    pub fn open_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y][x] == CellState::Open {
                    cells.push(Pos { x, y });
                }
            }
        }
        cells
    }

    pub fn count_open(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == CellState::Open)
            .count()
    }
}

impl fmt::Display for Grid {
    /// `#` for walls and a space for open cells, one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let ch = match cell {
                    CellState::Wall => '#',
                    CellState::Open => ' ',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_grid_is_all_wall() {
        let grid = Grid::filled(5, 7);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 7);
        assert!(grid.cell_at(4, 6).is_ok());
        assert!(grid.cell_at(4, 7).is_err());
        assert_eq!(grid.count_open(), 0);
    }

    #[test]
    fn cell_at_rejects_out_of_bounds() {
        let grid = Grid::filled(5, 5);
        assert_eq!(grid.cell_at(0, 0), Ok(CellState::Wall));
        assert_eq!(grid.cell_at(4, 4), Ok(CellState::Wall));
        assert_eq!(
            grid.cell_at(-1, 0),
            Err(MazeError::OutOfBounds { x: -1, y: 0 })
        );
        assert_eq!(
            grid.cell_at(5, 2),
            Err(MazeError::OutOfBounds { x: 5, y: 2 })
        );
        assert_eq!(
            grid.cell_at(2, 5),
            Err(MazeError::OutOfBounds { x: 2, y: 5 })
        );
    }

    #[test]
    fn set_marks_cell_open() {
        let mut grid = Grid::filled(5, 5);
        grid.set(Pos::new(1, 2), CellState::Open);
        assert!(grid.is_open(Pos::new(1, 2)));
        assert!(!grid.is_open(Pos::new(2, 1)));
        assert!(!grid.is_open(Pos::new(9, 9)));
        assert_eq!(grid.open_cells(), vec![Pos::new(1, 2)]);
    }

    #[test]
    fn display_uses_hash_for_walls() {
        let mut grid = Grid::filled(3, 2);
        grid.set(Pos::new(1, 0), CellState::Open);
        assert_eq!(grid.to_string(), "# #\n###\n");
    }
}
