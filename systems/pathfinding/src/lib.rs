#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shortest-path, straight-line, and line-of-sight queries over a [`GridMap`].
//!
//! The finder borrows the grid immutably and keeps no state between calls:
//! every A* search allocates its own scratch nodes, so concurrent searches on
//! the same grid never observe each other.

use cavern_core::{CellCoord, GridError, GridMap};

mod astar;
mod line;

/// Stateless path queries against a borrowed grid.
#[derive(Clone, Copy, Debug)]
pub struct PathFinder<'grid> {
    grid: &'grid GridMap,
}

impl<'grid> PathFinder<'grid> {
    /// Creates a finder that reads terrain from the provided grid.
    #[must_use]
    pub const fn new(grid: &'grid GridMap) -> Self {
        Self { grid }
    }

    /// Grid the finder operates on.
    #[must_use]
    pub const fn grid(&self) -> &'grid GridMap {
        self.grid
    }

    /// Runs an A* search from `origin` to `destination`.
    ///
    /// The returned path excludes `origin` and ends with `destination`; it is
    /// empty when both cells coincide. `Ok(None)` means the destination lies
    /// in a region disconnected from the origin (or is itself a wall).
    ///
    /// Diagonal and orthogonal moves are both allowed. The step cost is the
    /// Manhattan distance, so a diagonal step costs two. Frontier cells are
    /// ranked by twice their accumulated cost plus their Manhattan distance
    /// to the destination, which biases the search toward cheap prefixes.
    /// Returned paths are valid but not always the fewest steps.
    pub fn find_path(
        &self,
        origin: CellCoord,
        destination: CellCoord,
    ) -> Result<Option<Vec<CellCoord>>, GridError> {
        self.grid.get(origin).map(|_| ())?;
        self.grid.get(destination).map(|_| ())?;

        let path = astar::search(self.grid, origin, destination);
        match &path {
            Some(steps) => tracing::trace!(
                %origin,
                %destination,
                steps = steps.len(),
                "path found"
            ),
            None => tracing::debug!(%origin, %destination, "no path found"),
        }
        Ok(path)
    }

    /// Samples the straight line from `origin` toward `destination`.
    ///
    /// One cell is sampled per unit step along the normalised direction, for
    /// at most the Manhattan distance between the cells, stopping early once
    /// the destination itself is sampled. The first sample is `origin`.
    /// Samples outside the grid are dropped; walls are not checked. Returns an
    /// empty path when both cells coincide.
    #[must_use]
    pub fn straight_path(&self, origin: CellCoord, destination: CellCoord) -> Vec<CellCoord> {
        let mut path = Vec::new();
        for sample in line::Trace::between(origin, destination) {
            if !self.grid.in_bounds(sample) {
                continue;
            }

            path.push(sample);
            if sample == destination {
                break;
            }
        }
        path
    }

    /// Tests whether the straight line from `origin` to `destination` is free of walls.
    ///
    /// Walks the same samples as [`PathFinder::straight_path`]. Samples outside
    /// the grid are skipped rather than treated as blocking, so a line that
    /// leaves the grid can still be visible. Coinciding cells are visible.
    #[must_use]
    pub fn is_visible(&self, origin: CellCoord, destination: CellCoord) -> bool {
        for sample in line::Trace::between(origin, destination) {
            if !self.grid.in_bounds(sample) {
                continue;
            }

            if self.grid.is_wall(sample) {
                return false;
            }
            if sample == destination {
                break;
            }
        }
        true
    }
}

/// Manhattan distance shared by the A* edge cost and frontier ranking.
#[must_use]
pub fn heuristic(from: CellCoord, to: CellCoord) -> u32 {
    from.manhattan_distance(to)
}
