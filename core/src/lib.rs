#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cavern simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable snapshots and
//! the [`GridMap`], respond with [`Command`] values describing desired
//! mutations, the world executes those commands via its `apply` entry point,
//! and then reports [`Event`] values describing what actually happened.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod grid;

pub use config::{ConfigError, MapConfig, MonsterConfig, PlayerConfig, SimulationConfig};
pub use grid::{CellState, GridError, GridMap, Neighbors};

/// Offsets of the eight cells surrounding a cell, expressed as `(row, column)` deltas.
///
/// The order is part of the contract: neighbour enumeration and therefore A*
/// tie-breaking follow it exactly.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, 1),
    (0, -1),
    (-1, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
];

/// Location of a single grid cell expressed as row and column coordinates.
///
/// Coordinates are signed so that geometric helpers (mirrored flee targets,
/// straight-line samples) can describe positions outside the grid. Whether a
/// coordinate is usable is decided by [`GridMap::in_bounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: i32,
    column: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Returns the coordinate shifted by the provided row and column deltas.
    #[must_use]
    pub const fn offset(self, row_delta: i32, column_delta: i32) -> Self {
        Self::new(self.row + row_delta, self.column + column_delta)
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Computes the Chebyshev distance, the step count under 8-directional movement.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.row
            .abs_diff(other.row)
            .max(self.column.abs_diff(other.column))
    }

    /// Reports whether `other` is one of the eight cells surrounding `self`.
    ///
    /// A cell is never adjacent to itself. This is the melee range check.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        NEIGHBOR_OFFSETS
            .iter()
            .any(|&(row, column)| self.offset(row, column) == other)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Cardinal movement directions available to the player's keyboard steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Row and column delta produced by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }

    /// Cell reached by stepping once from `cell` in this direction.
    #[must_use]
    pub const fn step_from(self, cell: CellCoord) -> CellCoord {
        let (row, column) = self.delta();
        cell.offset(row, column)
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monster#{}", self.0)
    }
}

/// Combat statistics shared by the player and the monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentStats {
    /// Remaining hit points. The agent is defeated once this reaches zero or below.
    pub health: i32,
    /// Flat reduction applied to every incoming attack.
    pub armor: i32,
    /// Inclusive upper bound of the uniform attack roll.
    pub strength: i32,
}

impl AgentStats {
    /// Creates a new set of combat statistics.
    #[must_use]
    pub const fn new(health: i32, armor: i32, strength: i32) -> Self {
        Self {
            health,
            armor,
            strength,
        }
    }

    /// Absorbs an attack roll and returns the damage that got through armor.
    ///
    /// Health is not clamped at zero.
    pub fn defend(&mut self, attack: i32) -> i32 {
        let damage = attack.saturating_sub(self.armor).max(0);
        self.health -= damage;
        damage
    }

    /// Reports whether the agent still has hit points left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Behaviour states of the monster state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Random single-step wandering. Initial state.
    #[default]
    Patrol,
    /// Straight-line approach after seeing a weaker player.
    Search,
    /// A* pursuit after smelling a weaker player.
    Track,
    /// Evasive pathing away from a stronger player.
    Flee,
    /// Melee stance; the monster holds its position.
    Fight,
    /// Terminal state entered once health drops to zero or below.
    Dead,
}

impl BehaviorState {
    /// Reports whether the state is terminal.
    #[must_use]
    pub const fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }
}

/// Smell and sight thresholds used by a monster's perception.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptionRanges {
    /// Manhattan distance within which the player is smelled, walls notwithstanding.
    pub smell: u32,
    /// Manhattan distance within which a visible player is seen.
    pub sight: u32,
}

/// Participants of a melee exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combatant {
    /// The player-controlled agent.
    Player,
    /// A monster identified by its id.
    Monster(MonsterId),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation tick counter.
    Tick,
    /// Requests a single keyboard step of the player.
    ///
    /// Any queued route is discarded before the step is attempted.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the player attack every adjacent living monster.
    PlayerStrike,
    /// Replaces the player's queued route with the provided cells.
    SetPlayerRoute {
        /// Cells to visit in order, excluding the player's current cell.
        path: Vec<CellCoord>,
    },
    /// Moves the player to the next queued route cell, if any.
    AdvancePlayerRoute,
    /// Records the behaviour state selected for a monster.
    SetMonsterState {
        /// Identifier of the monster changing state.
        monster: MonsterId,
        /// State the monster should adopt.
        state: BehaviorState,
    },
    /// Requests a melee attack of the monster against the player.
    MonsterStrike {
        /// Identifier of the attacking monster.
        monster: MonsterId,
    },
    /// Relocates a monster to the provided cell.
    MoveMonster {
        /// Identifier of the monster being moved.
        monster: MonsterId,
        /// Destination cell.
        to: CellCoord,
    },
    /// Closes the monster's update for this tick and advances its turn counter.
    EndMonsterTurn {
        /// Identifier of the monster whose turn ends.
        monster: MonsterId,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick index reached after advancing.
        tick: u64,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Reports that a keyboard step targeted a wall or left the grid.
    PlayerStepRejected {
        /// Direction of the rejected step.
        direction: Direction,
        /// Cell the step would have entered.
        target: CellCoord,
    },
    /// Confirms that a new route was queued for the player.
    PlayerRouteAssigned {
        /// Number of cells queued.
        steps: usize,
    },
    /// Reports that a route did not start next to the player.
    PlayerRouteRejected {
        /// First cell of the rejected route.
        first: CellCoord,
    },
    /// Announces that a monster switched behaviour state.
    MonsterStateChanged {
        /// Identifier of the monster.
        monster: MonsterId,
        /// State before the transition.
        from: BehaviorState,
        /// State after the transition.
        to: BehaviorState,
    },
    /// Confirms that a monster moved between two cells.
    MonsterMoved {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Cell the monster occupied before moving.
        from: CellCoord,
        /// Cell the monster occupies after moving.
        to: CellCoord,
    },
    /// Reports the outcome of a single melee attack.
    AttackResolved {
        /// Agent that rolled the attack.
        attacker: Combatant,
        /// Agent that absorbed the attack.
        defender: Combatant,
        /// Raw attack roll.
        roll: i32,
        /// Damage that got through the defender's armor.
        damage: i32,
    },
    /// Announces that a monster entered the terminal dead state.
    MonsterDied {
        /// Identifier of the monster.
        monster: MonsterId,
    },
    /// Announces that the player's health dropped to zero or below.
    PlayerDefeated,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Current combat statistics.
    pub stats: AgentStats,
    /// Number of route cells still queued.
    pub queued_steps: usize,
}

/// Immutable representation of a single monster's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    /// Unique identifier assigned to the monster.
    pub id: MonsterId,
    /// Cell currently occupied by the monster.
    pub cell: CellCoord,
    /// Current combat statistics.
    pub stats: AgentStats,
    /// Active behaviour state.
    pub state: BehaviorState,
    /// Number of ticks the monster has been updated for.
    pub turn: u64,
    /// The monster only acts on ticks where `turn % slowness == 0`.
    pub slowness: u32,
    /// Smell and sight thresholds.
    pub perception: PerceptionRanges,
}

impl MonsterSnapshot {
    /// Reports whether the monster acts on its current turn.
    #[must_use]
    pub fn acts_this_turn(&self) -> bool {
        self.turn % u64::from(self.slowness.max(1)) == 0
    }
}

/// Read-only snapshot describing all monsters within the cavern.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured monster snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}
