#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver wiring the generator, the world, and the pure systems together.
//!
//! Every tick runs strictly in sequence: advance time, apply the player's
//! inputs and one queued route step, then let each monster act in id order.
//! Commands emitted by one participant are applied before the next one reads
//! the world.

use cavern_core::{Command, ConfigError, Event, GridError, GridMap, SimulationConfig};
use cavern_system_behavior::Behavior;
use cavern_system_mapgen::MapGenerator;
use cavern_system_player_control::{PlayerControl, PlayerInput};
use cavern_world::{self as world, query, World, WorldError};
use thiserror::Error;

/// Failure to set up a simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// The configuration describes an unrunnable simulation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Map generation touched a cell outside the grid.
    #[error("grid access failed: {0}")]
    Grid(#[from] GridError),
    /// The generated world could not be populated.
    #[error("world setup failed: {0}")]
    World(#[from] WorldError),
}

/// Deterministic simulation of one player and a band of monsters.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    behavior: Behavior,
    control: PlayerControl,
    commands: Vec<Command>,
}

impl Simulation {
    /// Generates the map and places every agent described by `config`.
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut grid = GridMap::new(config.map.rows, config.map.columns);
        MapGenerator::from_seed(&config.map, config.seed).generate(&mut grid)?;
        let world = World::new(grid, config)?;

        tracing::info!(
            seed = config.seed,
            rows = config.map.rows,
            columns = config.map.columns,
            monsters = config.monster_spawns.len(),
            "simulation ready"
        );

        Ok(Self {
            world,
            behavior: Behavior::from_seed(config.seed),
            control: PlayerControl,
            commands: Vec::new(),
        })
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Runs one tick, applying `inputs` in order, and records every event.
    ///
    /// A defeated player's inputs are ignored and its route stops advancing.
    pub fn step(&mut self, inputs: &[PlayerInput], out_events: &mut Vec<Event>) {
        world::apply(&mut self.world, Command::Tick, out_events);

        if query::player(&self.world).stats.is_alive() {
            for input in inputs {
                let player = query::player(&self.world);
                self.control
                    .handle(*input, &player, query::grid(&self.world), &mut self.commands);
                self.flush(out_events);
            }
            world::apply(&mut self.world, Command::AdvancePlayerRoute, out_events);
        }

        for monster_id in query::monster_ids(&self.world) {
            let Some(monster) = query::monster(&self.world, monster_id) else {
                continue;
            };
            let player = query::player(&self.world);
            self.behavior.handle(
                &monster,
                &player,
                query::grid(&self.world),
                &mut self.commands,
            );
            self.flush(out_events);
        }
    }

    fn flush(&mut self, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }
}
