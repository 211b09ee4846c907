//! The sparse grid - only live cells are stored.
//!
//! A coordinate is present if and only if the cell is alive. There are no
//! "dead" markers: absence is the only way a cell is dead, which is also why
//! neighbor lookups outside the domain need no bounds check.

use crate::error::CoreError;
use life_env::Occupancy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default side length of the simulated domain.
pub const DEFAULT_GRID_SIZE: u32 = 100;

/// Largest accepted side length. Stepping visits and persistence allocates
/// `size²` cells, so the domain is kept within a few million of them.
pub const MAX_GRID_SIZE: u32 = 4096;

/// A cell coordinate.
///
/// Any `i32` pair is a valid coordinate; only those inside a
/// [`GridBounds`] are ever produced by stepping or seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate shifted by `(dx, dy)`, or `None` if that leaves `i32`.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Coord> {
        Some(Coord::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

impl From<Coord> for (i32, i32) {
    fn from(c: Coord) -> Self {
        (c.x, c.y)
    }
}

/// The square domain `[0, size) × [0, size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    size: u32,
}

impl GridBounds {
    /// Creates bounds with the given side length.
    ///
    /// # Errors
    /// `CoreError::EmptyDomain` for a side length of 0, and
    /// `CoreError::DomainTooLarge` when the side exceeds [`MAX_GRID_SIZE`].
    pub fn new(size: u32) -> Result<Self, CoreError> {
        if size == 0 {
            return Err(CoreError::EmptyDomain);
        }
        if size > MAX_GRID_SIZE {
            return Err(CoreError::DomainTooLarge(size));
        }
        Ok(Self { size })
    }

    /// Side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of cells in the domain.
    pub fn area(&self) -> u64 {
        self.size as u64 * self.size as u64
    }

    /// True if `coord` lies inside the domain.
    pub fn contains(&self, coord: Coord) -> bool {
        let size = self.size as i64;
        (0..size).contains(&(coord.x as i64)) && (0..size).contains(&(coord.y as i64))
    }

    /// Every coordinate of the domain, x-major.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let size = self.size as i32;
        (0..size).flat_map(move |x| (0..size).map(move |y| Coord::new(x, y)))
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
        }
    }
}

/// Set of live cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Coord>", into = "Vec<Coord>")]
pub struct SparseGrid {
    live: HashSet<Coord>,
}

impl SparseGrid {
    /// Creates an empty grid (every cell dead).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid with the given cells alive.
    pub fn from_cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Coord>,
    {
        Self {
            live: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Marks a cell alive. Returns `false` if it already was.
    pub fn insert(&mut self, coord: Coord) -> bool {
        self.live.insert(coord)
    }

    /// Membership query; O(1) regardless of domain size.
    pub fn is_alive(&self, coord: Coord) -> bool {
        self.live.contains(&coord)
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Iterates over live cells in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.live.iter().copied()
    }

    /// Live cells sorted by `(x, y)`.
    pub fn sorted_cells(&self) -> Vec<Coord> {
        let mut cells: Vec<Coord> = self.live.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    /// Dense projection onto `bounds`; cells outside the domain are dropped.
    pub fn to_occupancy(&self, bounds: &GridBounds) -> Occupancy {
        let mut occupancy = Occupancy::new(bounds.size());
        for coord in self.live.iter().filter(|c| bounds.contains(**c)) {
            occupancy.set_alive(coord.x as u32, coord.y as u32);
        }
        occupancy
    }
}

impl FromIterator<Coord> for SparseGrid {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        Self {
            live: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Coord>> for SparseGrid {
    fn from(cells: Vec<Coord>) -> Self {
        cells.into_iter().collect()
    }
}

impl From<SparseGrid> for Vec<Coord> {
    fn from(grid: SparseGrid) -> Self {
        grid.sorted_cells()
    }
}
