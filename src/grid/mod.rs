//! Grid storage shared by the coarse (WFC) and fine (terrain) layers.
//!
//! Coordinates are Euclidean: (0, 0) is the bottom-left cell and y grows
//! upwards, so `North` is `(x, y + 1)`. Neighbour lookups never wrap.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rules::TileId;

/// Error type for grid access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// A cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four edges of a tile, in propagation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        };
        write!(f, "{}", name)
    }
}

/// Dense width x height storage, row-major with row 0 at the bottom
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: usize, height: usize, fill_value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill_value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by calling `f` for every position
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(Position) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(Position::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.y * self.width + pos.x)
    }

    fn out_of_bounds(&self, pos: Position) -> GridError {
        GridError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// Checked access that reports the grid extents on failure
    pub fn cell_at(&self, pos: Position) -> Result<&T, GridError> {
        self.get(pos).ok_or_else(|| self.out_of_bounds(pos))
    }

    pub fn cell_at_mut(&mut self, pos: Position) -> Result<&mut T, GridError> {
        let err = self.out_of_bounds(pos);
        self.get_mut(pos).ok_or(err)
    }

    pub fn set(&mut self, pos: Position, value: T) -> Result<(), GridError> {
        *self.cell_at_mut(pos)? = value;
        Ok(())
    }

    /// Adjacent position in `direction`, `None` past the grid edge
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        if !self.contains(pos) {
            return None;
        }
        let next = match direction {
            Direction::North => Position::new(pos.x, pos.y.checked_add(1)?),
            Direction::East => Position::new(pos.x.checked_add(1)?, pos.y),
            Direction::South => Position::new(pos.x, pos.y.checked_sub(1)?),
            Direction::West => Position::new(pos.x.checked_sub(1)?, pos.y),
        };
        self.contains(next).then_some(next)
    }

    /// All in-bounds neighbours of `pos` with the direction they lie in
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Direction, Position)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(pos, dir).map(|n| (dir, n)))
    }

    /// Cells in storage order (row by row, bottom row first)
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| {
            (Position::new(i % self.width, i / self.width), cell)
        })
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn map<U>(&self, mut f: impl FnMut(Position, &T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.iter().map(|(pos, cell)| f(pos, cell)).collect(),
        }
    }
}

/// One coarse-grid position in a WFC build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    position: Position,
    domain: Vec<TileId>,
    resolved: Option<TileId>,
}

impl Cell {
    pub fn new(position: Position, full_domain: &[TileId]) -> Self {
        Self {
            position,
            domain: full_domain.to_vec(),
            resolved: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn domain(&self) -> &[TileId] {
        &self.domain
    }

    /// Remaining candidate count (not Shannon entropy)
    pub fn entropy(&self) -> usize {
        self.domain.len()
    }

    pub fn is_collapsed(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn resolved(&self) -> Option<TileId> {
        self.resolved
    }

    /// Fix the cell to `tile`. The caller guarantees `tile` is in the domain.
    pub(crate) fn collapse_to(&mut self, tile: TileId) {
        self.domain.clear();
        self.domain.push(tile);
        self.resolved = Some(tile);
    }

    /// Drop candidates failing `keep`; returns how many were removed
    pub(crate) fn retain(&mut self, keep: impl FnMut(&TileId) -> bool) -> usize {
        let before = self.domain.len();
        self.domain.retain(keep);
        before - self.domain.len()
    }
}

/// Coarse grid of WFC cells, every cell starting with its own copy of the full domain
pub fn initialize(width: usize, height: usize, full_domain: &[TileId]) -> Grid<Cell> {
    Grid::from_fn(width, height, |pos| Cell::new(pos, full_domain))
}
