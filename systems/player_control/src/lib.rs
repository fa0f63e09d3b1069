#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating player input into world commands.

use cavern_core::{CellCoord, Command, Direction, GridMap, PlayerSnapshot};
use cavern_system_pathfinding::PathFinder;

/// Single player action requested by an adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerInput {
    /// Step one cell in a cardinal direction.
    Step(Direction),
    /// Attack every living monster in the eight surrounding cells.
    Strike,
    /// Plan a route to the target cell and follow it on later ticks.
    RouteTo(CellCoord),
}

/// Stateless system emitting player commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerControl;

impl PlayerControl {
    /// Converts one input into commands, given the player's current state.
    ///
    /// A defeated player produces nothing. Route requests that cannot be
    /// planned are logged and dropped.
    pub fn handle(
        &self,
        input: PlayerInput,
        player: &PlayerSnapshot,
        grid: &GridMap,
        out: &mut Vec<Command>,
    ) {
        if !player.stats.is_alive() {
            return;
        }

        match input {
            PlayerInput::Step(direction) => out.push(Command::StepPlayer { direction }),
            PlayerInput::Strike => out.push(Command::PlayerStrike),
            PlayerInput::RouteTo(target) => {
                match PathFinder::new(grid).find_path(player.cell, target) {
                    Ok(Some(path)) => out.push(Command::SetPlayerRoute { path }),
                    Ok(None) => {
                        tracing::debug!(from = %player.cell, %target, "route target unreachable");
                    }
                    Err(error) => {
                        tracing::warn!(%error, "route target rejected");
                    }
                }
            }
        }
    }
}
