//! Pattern census - clusters live cells and counts recurring shapes.
//!
//! A cluster is a maximal set of live cells connected through the Moore
//! neighborhood. Clusters are compared by shape: translated to the origin
//! and reduced to one canonical orientation out of the eight rotations and
//! reflections, so a horizontal and a vertical blinker count together.

use crate::life_grid::{Coord, SparseGrid};
use std::collections::{HashMap, HashSet, VecDeque};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Shapes that get a readable name instead of a hashed label.
const KNOWN_SHAPES: &[(&str, &[(i32, i32)])] = &[
    ("block", &[(0, 0), (0, 1), (1, 0), (1, 1)]),
    ("blinker", &[(0, 0), (1, 0), (2, 0)]),
    ("beehive", &[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (2, 2)]),
    ("loaf", &[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (3, 2), (2, 3)]),
    ("boat", &[(0, 0), (1, 0), (0, 1), (2, 1), (1, 2)]),
    ("tub", &[(1, 0), (0, 1), (2, 1), (1, 2)]),
    ("glider", &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]),
    ("toad", &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)]),
    ("beacon", &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)]),
];

/// A cluster shape in canonical orientation, anchored at `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shape {
    cells: Vec<Coord>,
}

impl Shape {
    /// Canonicalizes an arbitrary set of cells.
    ///
    /// Works in `i64` so clusters at the edges of the `i32` range are safe.
    /// Offsets wider than `i32` (only possible for disconnected input)
    /// saturate.
    pub fn from_cells<I: IntoIterator<Item = Coord>>(cells: I) -> Self {
        let cells: Vec<(i64, i64)> = cells
            .into_iter()
            .map(|c| (c.x as i64, c.y as i64))
            .collect();
        let canonical = (0..8)
            .map(|orientation| normalize(cells.iter().map(|&c| transform(c, orientation))))
            .min()
            .unwrap_or_default();
        Self { cells: canonical }
    }

    /// Cells of the canonical orientation, sorted.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounding box `(width, height)` of the canonical orientation.
    pub fn extent(&self) -> (u32, u32) {
        let w = self.cells.iter().map(|c| c.x).max().map_or(0, |m| m as u32 + 1);
        let h = self.cells.iter().map(|c| c.y).max().map_or(0, |m| m as u32 + 1);
        (w, h)
    }

    /// Readable name for well-known still lifes, oscillators and spaceships.
    ///
    /// Oscillators and gliders are recognized in the phase listed in
    /// `KNOWN_SHAPES`; other phases fall back to a hashed label.
    pub fn name(&self) -> Option<&'static str> {
        KNOWN_SHAPES.iter().find_map(|(name, cells)| {
            let known = Shape::from_cells(cells.iter().map(|&c| Coord::from(c)));
            (known == *self).then_some(*name)
        })
    }

    /// Label used for object keys: the known name, or
    /// `shape_<cells>c_<w>x<h>_<hash>` for anything else.
    pub fn label(&self) -> String {
        if let Some(name) = self.name() {
            return name.to_string();
        }
        let (w, h) = self.extent();
        format!("shape_{}c_{}x{}_{:08x}", self.len(), w, h, self.fingerprint() as u32)
    }

    /// FNV-1a over the canonical cells; stable across builds and platforms.
    fn fingerprint(&self) -> u64 {
        self.cells
            .iter()
            .flat_map(|c| c.x.to_le_bytes().into_iter().chain(c.y.to_le_bytes()))
            .fold(FNV_OFFSET, |h, b| (h ^ b as u64).wrapping_mul(FNV_PRIME))
    }
}

/// Occurrence counts of every shape in one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Census {
    counts: HashMap<Shape, usize>,
    clusters: usize,
}

impl Census {
    /// Clusters the live cells of `grid` and counts each shape.
    pub fn of(grid: &SparseGrid) -> Self {
        let mut census = Census::default();
        for cluster in clusters(grid) {
            *census.counts.entry(Shape::from_cells(cluster)).or_insert(0) += 1;
            census.clusters += 1;
        }
        census
    }

    /// Total number of clusters.
    pub fn cluster_count(&self) -> usize {
        self.clusters
    }

    /// Number of distinct shapes.
    pub fn distinct_shapes(&self) -> usize {
        self.counts.len()
    }

    /// Occurrences of `shape`.
    pub fn count(&self, shape: &Shape) -> usize {
        self.counts.get(shape).copied().unwrap_or(0)
    }

    /// Occurrences of a named shape (see [`Shape::name`]).
    pub fn count_named(&self, name: &str) -> usize {
        self.counts
            .iter()
            .filter(|(shape, _)| shape.name() == Some(name))
            .map(|(_, &n)| n)
            .sum()
    }

    /// Shapes occurring strictly more than `threshold` times, most frequent
    /// first, ties broken by label.
    pub fn frequent(&self, threshold: usize) -> Vec<(Shape, usize)> {
        let mut frequent: Vec<(Shape, usize)> = self
            .counts
            .iter()
            .filter(|(_, &n)| n > threshold)
            .map(|(shape, &n)| (shape.clone(), n))
            .collect();
        frequent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.label().cmp(&b.0.label())));
        frequent
    }
}

/// Splits the live cells into Moore-connected clusters.
fn clusters(grid: &SparseGrid) -> Vec<Vec<Coord>> {
    let mut seen: HashSet<Coord> = HashSet::with_capacity(grid.len());
    let mut out = Vec::new();

    for start in grid.sorted_cells() {
        if !seen.insert(start) {
            continue;
        }
        let mut cluster = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(n) = cell.offset(dx, dy) else { continue };
                    if grid.is_alive(n) && seen.insert(n) {
                        cluster.push(n);
                        queue.push_back(n);
                    }
                }
            }
        }
        out.push(cluster);
    }
    out
}

/// One of the eight symmetries of the square.
fn transform((x, y): (i64, i64), orientation: u8) -> (i64, i64) {
    match orientation {
        0 => (x, y),
        1 => (-y, x),
        2 => (-x, -y),
        3 => (y, -x),
        4 => (-x, y),
        5 => (y, x),
        6 => (x, -y),
        _ => (-y, -x),
    }
}

/// Translates to the origin and sorts.
fn normalize<I: Iterator<Item = (i64, i64)>>(cells: I) -> Vec<Coord> {
    let cells: Vec<(i64, i64)> = cells.collect();
    let min_x = cells.iter().map(|c| c.0).min().unwrap_or(0);
    let min_y = cells.iter().map(|c| c.1).min().unwrap_or(0);
    let clamp = |v: i64| i32::try_from(v).unwrap_or(i32::MAX);
    let mut out: Vec<Coord> = cells
        .into_iter()
        .map(|(x, y)| Coord::new(clamp(x - min_x), clamp(y - min_y)))
        .collect();
    out.sort_unstable();
    out
}
