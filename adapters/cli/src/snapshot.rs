//! Serializable end-of-run snapshot of the world.

use cavern_core::{CellCoord, CellState, MonsterSnapshot, PlayerSnapshot};
use cavern_world::{query, World};
use serde::{Deserialize, Serialize};

/// Snapshot of the grid and every agent, emitted as JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct WorldSnapshot {
    /// Ticks processed before the snapshot was taken.
    pub(crate) tick: u64,
    /// Number of rows in the grid.
    pub(crate) rows: u32,
    /// Number of columns in the grid.
    pub(crate) columns: u32,
    /// Every wall cell in row-major order.
    pub(crate) walls: Vec<CellCoord>,
    /// Player state at the end of the run.
    pub(crate) player: PlayerSnapshot,
    /// Monster states ordered by identifier.
    pub(crate) monsters: Vec<MonsterSnapshot>,
}

impl WorldSnapshot {
    /// Captures the current state of the world.
    pub(crate) fn capture(world: &World) -> Self {
        let grid = query::grid(world);
        let walls = grid
            .coords()
            .filter(|cell| matches!(grid.get(*cell), Ok(CellState::Wall)))
            .collect();

        Self {
            tick: query::tick_index(world),
            rows: grid.rows(),
            columns: grid.columns(),
            walls,
            player: query::player(world),
            monsters: query::monster_view(world).into_vec(),
        }
    }

    /// Encodes the snapshot as pretty-printed JSON.
    pub(crate) fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
