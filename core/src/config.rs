//! Tunable parameters of a simulation run.
//!
//! Every section falls back to its default when omitted, so a configuration
//! file only needs to mention the values it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AgentStats, CellCoord, PerceptionRanges};

const DEFAULT_SEED: u64 = 0x5eed_ca7e_2b1d_0001;
const DEFAULT_MAP_SIDE: u32 = 70;
const DEFAULT_WALL_DENSITY: u8 = 50;
const DEFAULT_GENERATIONS: u32 = 10;

/// Complete description of a simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed shared by every random number consumer.
    pub seed: u64,
    /// Map dimensions and generation parameters.
    pub map: MapConfig,
    /// Player placement and statistics.
    pub player: PlayerConfig,
    /// Statistics shared by every monster.
    pub monster: MonsterConfig,
    /// Initial cell of each monster; one monster is spawned per entry.
    pub monster_spawns: Vec<CellCoord>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let map = MapConfig::default();
        let monster_spawns = corner_spawns(map.rows, map.columns);
        Self {
            seed: DEFAULT_SEED,
            map,
            player: PlayerConfig::default(),
            monster: MonsterConfig::default(),
            monster_spawns,
        }
    }
}

impl SimulationConfig {
    /// Checks that the configuration describes a runnable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.rows == 0 || self.map.columns == 0 {
            return Err(ConfigError::EmptyMap);
        }
        if self.map.wall_density > 100 {
            return Err(ConfigError::WallDensity(self.map.wall_density));
        }
        if self.monster.slowness == 0 {
            return Err(ConfigError::ZeroSlowness);
        }

        let spawns = std::iter::once(self.player.spawn).chain(self.monster_spawns.iter().copied());
        for spawn in spawns {
            if !self.map.contains(spawn) {
                return Err(ConfigError::SpawnOutOfBounds {
                    cell: spawn,
                    rows: self.map.rows,
                    columns: self.map.columns,
                });
            }
        }

        Ok(())
    }
}

/// Map dimensions and cellular automaton parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Number of rows in the grid.
    pub rows: u32,
    /// Number of columns in the grid.
    pub columns: u32,
    /// Percentage of interior cells seeded as walls before smoothing.
    pub wall_density: u8,
    /// Number of smoothing passes applied after the random fill.
    pub generations: u32,
}

impl MapConfig {
    fn contains(&self, cell: CellCoord) -> bool {
        u32::try_from(cell.row()).map_or(false, |row| row < self.rows)
            && u32::try_from(cell.column()).map_or(false, |column| column < self.columns)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_MAP_SIDE,
            columns: DEFAULT_MAP_SIDE,
            wall_density: DEFAULT_WALL_DENSITY,
            generations: DEFAULT_GENERATIONS,
        }
    }
}

/// Player placement and statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial cell of the player.
    pub spawn: CellCoord,
    /// Initial combat statistics.
    pub stats: AgentStats,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: CellCoord::new(0, 0),
            stats: AgentStats::new(8, 3, 6),
        }
    }
}

/// Statistics and perception shared by every monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Initial combat statistics.
    pub stats: AgentStats,
    /// Monsters act once every `slowness` ticks.
    pub slowness: u32,
    /// Manhattan range of the smell check.
    pub smell_range: u32,
    /// Manhattan range of the sight check.
    pub sight_range: u32,
}

impl MonsterConfig {
    /// Perception thresholds described by this configuration.
    #[must_use]
    pub const fn perception(&self) -> PerceptionRanges {
        PerceptionRanges {
            smell: self.smell_range,
            sight: self.sight_range,
        }
    }
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            stats: AgentStats::new(12, 2, 4),
            slowness: 2,
            smell_range: 10,
            sight_range: 12,
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One of the map dimensions is zero.
    #[error("map dimensions must be non-zero")]
    EmptyMap,
    /// The wall density is not a percentage.
    #[error("wall density {0} exceeds 100 percent")]
    WallDensity(u8),
    /// Monsters would never act.
    #[error("monster slowness must be at least 1")]
    ZeroSlowness,
    /// An agent would spawn outside the map.
    #[error("spawn cell {cell} lies outside the {rows}x{columns} map")]
    SpawnOutOfBounds {
        /// Offending spawn cell.
        cell: CellCoord,
        /// Number of rows in the map.
        rows: u32,
        /// Number of columns in the map.
        columns: u32,
    },
}

/// The three corners away from the player's default spawn.
fn corner_spawns(rows: u32, columns: u32) -> Vec<CellCoord> {
    let last_row = i32::try_from(rows.saturating_sub(1)).unwrap_or(i32::MAX);
    let last_column = i32::try_from(columns.saturating_sub(1)).unwrap_or(i32::MAX);
    vec![
        CellCoord::new(0, last_column),
        CellCoord::new(last_row, last_column),
        CellCoord::new(last_row, 0),
    ]
}
