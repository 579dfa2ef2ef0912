use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::{EnvError, Position};

/// Row-major board of cells addressed by `Position`. Row 0 is the bottom row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Grid {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    fn slot(&self, pos: Position) -> Option<usize> {
        (pos.x < self.width && pos.y < self.height).then(|| pos.y * self.width + pos.x)
    }

    /// The cell at `(x, y)`, or `None` off the board.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.slot(Position::new(x, y)).map(|i| &self.cells[i])
    }

    fn slot_or_panic(&self, pos: Position) -> usize {
        self.slot(pos).unwrap_or_else(|| {
            panic!(
                "cell ({}, {}) is off a {}x{} board",
                pos.x, pos.y, self.width, self.height
            )
        })
    }
}

/// Panics when `pos` is off the board.
impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &T {
        &self.cells[self.slot_or_panic(pos)]
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, pos: Position) -> &mut T {
        let i = self.slot_or_panic(pos);
        &mut self.cells[i]
    }
}

/// Prints the grid with the highest `y` row first, so `Up` points up.
impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{cell:>2}")?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Static layout of a level: a square board of `size` cells per side and the
/// set of wall cells. Immutable once built; cheap to share between episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    size: usize,
    walls: BTreeSet<Position>,
}

impl GridGeometry {
    /// Builds a geometry, rejecting an empty board or any wall outside it.
    pub fn new(size: usize, walls: impl IntoIterator<Item = Position>) -> Result<Self, EnvError> {
        if size == 0 {
            return Err(EnvError::Config("grid size must be positive".to_string()));
        }
        let walls: BTreeSet<Position> = walls.into_iter().collect();
        if let Some(wall) = walls.iter().find(|w| w.x >= size || w.y >= size) {
            return Err(EnvError::Config(format!(
                "wall ({}, {}) is outside a {size}x{size} grid",
                wall.x, wall.y
            )));
        }
        Ok(GridGeometry { size, walls })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    #[inline]
    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.contains(&pos)
    }

    /// Wall cells in `(x, y)` order.
    pub fn walls(&self) -> impl Iterator<Item = Position> + '_ {
        self.walls.iter().copied()
    }

    /// An all-zero board matching this geometry, ready for cell codes.
    pub fn blank_board(&self) -> Grid<u8> {
        Grid::filled(self.size, self.size, 0)
    }
}
