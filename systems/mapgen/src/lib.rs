#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural cave generation: random wall fill followed by majority-rule smoothing.
//!
//! Only interior cells are touched. The outermost ring keeps whatever state
//! the grid was created with, which for a fresh [`GridMap`] means `Empty`.

use cavern_core::{CellCoord, CellState, GridError, GridMap, MapConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha stream reserved for map generation.
pub const MAP_STREAM: u64 = 0;

/// Seeded cave generator.
#[derive(Clone, Debug)]
pub struct MapGenerator {
    wall_density: u8,
    generations: u32,
    rng: ChaCha8Rng,
}

impl MapGenerator {
    /// Creates a generator drawing from the provided random source.
    #[must_use]
    pub fn new(config: &MapConfig, rng: ChaCha8Rng) -> Self {
        Self {
            wall_density: config.wall_density,
            generations: config.generations,
            rng,
        }
    }

    /// Creates a generator whose randomness is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(config: &MapConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(MAP_STREAM);
        Self::new(config, rng)
    }

    /// Fills the grid randomly and then runs every configured smoothing pass.
    pub fn generate(&mut self, grid: &mut GridMap) -> Result<(), GridError> {
        self.random_fill(grid)?;
        let mut changed = 0;
        for _ in 0..self.generations {
            changed = smooth(grid)?;
        }

        tracing::debug!(
            rows = grid.rows(),
            columns = grid.columns(),
            walls = grid.count(CellState::Wall),
            last_pass_changes = changed,
            "cave generated"
        );
        Ok(())
    }

    /// Turns each interior cell into a wall with probability `wall_density`.
    ///
    /// The draw is uniform over `0..=100`, so a density of 100 still leaves
    /// roughly one cell in a hundred untouched. Cells that lose the draw keep
    /// their current state.
    pub fn random_fill(&mut self, grid: &mut GridMap) -> Result<(), GridError> {
        for cell in interior(grid) {
            if self.rng.gen_range(0..=100u8) < self.wall_density {
                grid.set(cell, CellState::Wall)?;
            }
        }
        Ok(())
    }
}

/// Applies one generation of the majority rule to every interior cell.
///
/// Neighbour counts are read from a snapshot taken before the pass, so the
/// result does not depend on iteration order. Returns the number of cells
/// whose state changed.
pub fn smooth(grid: &mut GridMap) -> Result<usize, GridError> {
    let snapshot = grid.clone();
    let mut changed = 0;

    for cell in interior(&snapshot) {
        let current = snapshot.get(cell)?;
        let mut walls = 0;
        let mut empties = 0;
        for neighbor in snapshot.neighbors8(cell) {
            match snapshot.get(neighbor)? {
                CellState::Wall => walls += 1,
                CellState::Empty => empties += 1,
            }
        }

        let next = majority_rule(current, walls, empties);
        if next != current {
            grid.set(cell, next)?;
            changed += 1;
        }
    }

    Ok(changed)
}

/// Next state of a cell given how many of its neighbours are walls and empty.
///
/// Ties leave the cell unchanged.
#[must_use]
pub fn majority_rule(current: CellState, walls: usize, empties: usize) -> CellState {
    if empties == 0 {
        CellState::Wall
    } else if walls == 0 {
        CellState::Empty
    } else if empties > walls {
        CellState::Empty
    } else if walls > empties {
        CellState::Wall
    } else {
        current
    }
}

fn interior(grid: &GridMap) -> impl Iterator<Item = CellCoord> {
    let last_row = i32::try_from(grid.rows()).unwrap_or(i32::MAX) - 1;
    let last_column = i32::try_from(grid.columns()).unwrap_or(i32::MAX) - 1;
    (1..last_row).flat_map(move |row| (1..last_column).map(move |column| CellCoord::new(row, column)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_matches_majority() {
        assert_eq!(majority_rule(CellState::Empty, 8, 0), CellState::Wall);
        assert_eq!(majority_rule(CellState::Wall, 0, 8), CellState::Empty);
        assert_eq!(majority_rule(CellState::Wall, 3, 5), CellState::Empty);
        assert_eq!(majority_rule(CellState::Empty, 5, 3), CellState::Wall);
    }

    #[test]
    fn rule_ties_keep_current_state() {
        assert_eq!(majority_rule(CellState::Wall, 4, 4), CellState::Wall);
        assert_eq!(majority_rule(CellState::Empty, 4, 4), CellState::Empty);
    }

    #[test]
    fn interior_skips_outer_ring() {
        let grid = GridMap::new(4, 5);
        let cells: Vec<_> = interior(&grid).collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(1, 2),
                CellCoord::new(1, 3),
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
                CellCoord::new(2, 3),
            ]
        );
    }

    #[test]
    fn interior_of_degenerate_grid_is_empty() {
        assert_eq!(interior(&GridMap::new(2, 2)).count(), 0);
        assert_eq!(interior(&GridMap::new(0, 0)).count(), 0);
    }

    #[test]
    fn smoothing_reads_from_snapshot() {
        // Updating in place would clear (1, 1) and (1, 2) before (2, 2) is
        // visited and leave it empty; the snapshot still counts five walls.
        let mut grid = GridMap::new(5, 5);
        for (row, column) in [(1, 1), (1, 2), (2, 3), (3, 1), (3, 2)] {
            grid.set(CellCoord::new(row, column), CellState::Wall)
                .expect("in bounds");
        }

        let changed = smooth(&mut grid).expect("interior cells in bounds");

        assert_eq!(changed, 6);
        assert_eq!(grid.count(CellState::Wall), 1);
        assert_eq!(grid.get(CellCoord::new(2, 2)), Ok(CellState::Wall));
    }

    #[test]
    fn zero_density_fill_leaves_grid_empty() {
        let config = MapConfig {
            rows: 12,
            columns: 12,
            wall_density: 0,
            generations: 0,
        };
        let mut grid = GridMap::new(config.rows, config.columns);
        MapGenerator::from_seed(&config, 7)
            .random_fill(&mut grid)
            .expect("interior cells in bounds");
        assert_eq!(grid.count(CellState::Wall), 0);
    }
}
