#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Cavern simulation.
//!
//! The world owns the generated terrain, the player, the monsters, and the
//! random source used for attack rolls. Once the grid is handed over it is
//! never mutated again; agents only change through [`apply`].

use std::collections::VecDeque;

use cavern_core::{
    AgentStats, BehaviorState, CellCoord, Combatant, Command, Event, GridError, GridMap,
    MonsterId, PerceptionRanges, SimulationConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// ChaCha stream reserved for combat rolls.
pub const COMBAT_STREAM: u64 = 1;

/// Reasons a world cannot be populated from a configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// An agent would spawn outside the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// More monsters were requested than identifiers can number.
    #[error("monster #{index} exceeds the identifier range")]
    TooManyMonsters {
        /// Position of the first spawn that cannot be numbered.
        index: usize,
    },
}

/// Represents the authoritative Cavern world state.
#[derive(Debug)]
pub struct World {
    grid: GridMap,
    player: Player,
    monsters: Vec<Monster>,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a world over a generated grid, seeding combat from `config.seed`.
    ///
    /// Fails when the player or any monster would spawn outside the grid.
    pub fn new(grid: GridMap, config: &SimulationConfig) -> Result<Self, WorldError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        rng.set_stream(COMBAT_STREAM);
        Self::with_rng(grid, config, rng)
    }

    /// Creates a world that draws attack rolls from the provided random source.
    pub fn with_rng(
        grid: GridMap,
        config: &SimulationConfig,
        rng: ChaCha8Rng,
    ) -> Result<Self, WorldError> {
        grid.get(config.player.spawn).map(|_| ())?;
        let player = Player::spawn(config.player.spawn, config.player.stats);

        let mut monsters = Vec::with_capacity(config.monster_spawns.len());
        for (index, spawn) in config.monster_spawns.iter().copied().enumerate() {
            grid.get(spawn).map(|_| ())?;
            monsters.push(Monster {
                id: monster_id(index)?,
                cell: spawn,
                stats: config.monster.stats,
                state: BehaviorState::default(),
                turn: 0,
                slowness: config.monster.slowness,
                perception: config.monster.perception(),
            });
        }

        Ok(Self {
            grid,
            player,
            monsters,
            rng,
            tick_index: 0,
        })
    }

    fn monster_mut(&mut self, monster_id: MonsterId) -> Option<&mut Monster> {
        self.monsters
            .iter_mut()
            .find(|monster| monster.id == monster_id)
    }

    fn resolve_player_strike(&mut self, out_events: &mut Vec<Event>) {
        let Self {
            player,
            monsters,
            rng,
            ..
        } = self;

        for monster in monsters.iter_mut() {
            if monster.state.is_dead() || !player.cell.is_adjacent(monster.cell) {
                continue;
            }

            let roll = roll_attack(rng, &player.stats);
            let previous_state = monster.state;
            let (damage, died) = monster.defend(roll);
            tracing::debug!(monster = %monster.id, roll, damage, "player strikes");
            out_events.push(Event::AttackResolved {
                attacker: Combatant::Player,
                defender: Combatant::Monster(monster.id),
                roll,
                damage,
            });

            if died {
                tracing::info!(monster = %monster.id, cell = %monster.cell, "monster slain");
                out_events.push(Event::MonsterStateChanged {
                    monster: monster.id,
                    from: previous_state,
                    to: BehaviorState::Dead,
                });
                out_events.push(Event::MonsterDied { monster: monster.id });
            }
        }
    }

    fn resolve_monster_strike(&mut self, monster_id: MonsterId, out_events: &mut Vec<Event>) {
        let Self {
            player,
            monsters,
            rng,
            ..
        } = self;

        let Some(monster) = monsters.iter().find(|monster| monster.id == monster_id) else {
            return;
        };
        if monster.state.is_dead() || !monster.cell.is_adjacent(player.cell) {
            return;
        }

        let roll = roll_attack(rng, &monster.stats);
        let damage = player.stats.defend(roll);
        tracing::debug!(monster = %monster_id, roll, damage, "monster strikes");
        out_events.push(Event::AttackResolved {
            attacker: Combatant::Monster(monster_id),
            defender: Combatant::Player,
            roll,
            damage,
        });

        if !player.stats.is_alive() && !player.defeated {
            player.defeated = true;
            tracing::info!(cell = %player.cell, "player defeated");
            out_events.push(Event::PlayerDefeated);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::StepPlayer { direction } => {
            world.player.route.clear();
            let from = world.player.cell;
            let target = direction.step_from(from);
            if world.grid.is_walkable(target) {
                world.player.cell = target;
                out_events.push(Event::PlayerMoved { from, to: target });
            } else {
                out_events.push(Event::PlayerStepRejected { direction, target });
            }
        }
        Command::PlayerStrike => {
            world.player.route.clear();
            world.resolve_player_strike(out_events);
        }
        Command::SetPlayerRoute { path } => {
            if let Some(first) = path.first().copied() {
                if !world.player.cell.is_adjacent(first) {
                    out_events.push(Event::PlayerRouteRejected { first });
                    return;
                }
            }

            let steps = path.len();
            world.player.route = path.into();
            out_events.push(Event::PlayerRouteAssigned { steps });
        }
        Command::AdvancePlayerRoute => {
            if let Some(next) = world.player.route.pop_front() {
                let from = world.player.cell;
                world.player.cell = next;
                out_events.push(Event::PlayerMoved { from, to: next });
            }
        }
        Command::SetMonsterState { monster, state } => {
            // Only combat may kill a monster, and the dead never change state.
            if state.is_dead() {
                return;
            }
            if let Some(target) = world.monster_mut(monster) {
                if target.state.is_dead() || target.state == state {
                    return;
                }

                let from = target.state;
                target.state = state;
                tracing::debug!(%monster, ?from, to = ?state, "behavior state changed");
                out_events.push(Event::MonsterStateChanged {
                    monster,
                    from,
                    to: state,
                });
            }
        }
        Command::MonsterStrike { monster } => {
            world.resolve_monster_strike(monster, out_events);
        }
        Command::MoveMonster { monster, to } => {
            if !world.grid.in_bounds(to) {
                return;
            }
            if let Some(target) = world.monster_mut(monster) {
                if target.state.is_dead() || target.cell == to {
                    return;
                }

                let from = target.cell;
                target.cell = to;
                out_events.push(Event::MonsterMoved { monster, from, to });
            }
        }
        Command::EndMonsterTurn { monster } => {
            if let Some(target) = world.monster_mut(monster) {
                target.turn = target.turn.saturating_add(1);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use cavern_core::{
        CellCoord, GridMap, MonsterId, MonsterSnapshot, MonsterView, PlayerSnapshot,
    };

    use super::World;

    /// Provides read-only access to the terrain grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            stats: world.player.stats,
            queued_steps: world.player.route.len(),
        }
    }

    /// Cells still queued on the player's route, in visiting order.
    #[must_use]
    pub fn player_route(world: &World) -> Vec<CellCoord> {
        world.player.route.iter().copied().collect()
    }

    /// Captures the state of a single monster.
    #[must_use]
    pub fn monster(world: &World, monster_id: MonsterId) -> Option<MonsterSnapshot> {
        world
            .monsters
            .iter()
            .find(|monster| monster.id == monster_id)
            .map(|monster| monster.snapshot())
    }

    /// Identifiers of every monster in update order.
    #[must_use]
    pub fn monster_ids(world: &World) -> Vec<MonsterId> {
        world.monsters.iter().map(|monster| monster.id).collect()
    }

    /// Captures a read-only view of every monster.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        MonsterView::from_snapshots(
            world
                .monsters
                .iter()
                .map(|monster| monster.snapshot())
                .collect(),
        )
    }
}

#[derive(Clone, Debug)]
struct Player {
    cell: CellCoord,
    stats: AgentStats,
    route: VecDeque<CellCoord>,
    defeated: bool,
}

impl Player {
    fn spawn(cell: CellCoord, stats: AgentStats) -> Self {
        Self {
            cell,
            stats,
            route: VecDeque::new(),
            defeated: !stats.is_alive(),
        }
    }
}

#[derive(Clone, Debug)]
struct Monster {
    id: MonsterId,
    cell: CellCoord,
    stats: AgentStats,
    state: BehaviorState,
    turn: u64,
    slowness: u32,
    perception: PerceptionRanges,
}

impl Monster {
    /// Absorbs an attack and returns the damage taken and whether it was fatal.
    ///
    /// Only the first fatal blow reports a death.
    fn defend(&mut self, attack: i32) -> (i32, bool) {
        let damage = self.stats.defend(attack);
        let died = !self.stats.is_alive() && !self.state.is_dead();
        if died {
            self.state = BehaviorState::Dead;
        }
        (damage, died)
    }

    fn snapshot(&self) -> cavern_core::MonsterSnapshot {
        cavern_core::MonsterSnapshot {
            id: self.id,
            cell: self.cell,
            stats: self.stats,
            state: self.state,
            turn: self.turn,
            slowness: self.slowness,
            perception: self.perception,
        }
    }
}

fn monster_id(index: usize) -> Result<MonsterId, WorldError> {
    u32::try_from(index)
        .map(MonsterId::new)
        .map_err(|_| WorldError::TooManyMonsters { index })
}

fn roll_attack(rng: &mut ChaCha8Rng, stats: &AgentStats) -> i32 {
    rng.gen_range(0..=stats.strength.max(0))
}
