#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster behaviour state machine.
//!
//! Each acting turn a monster senses the player, switches state, strikes if
//! it perceived an adjacent player, and then takes the single step bound to
//! its new state. The system only reads snapshots and emits commands; the
//! world resolves them.

use cavern_core::{BehaviorState, Command, GridMap, MonsterSnapshot, PlayerSnapshot};
use cavern_system_pathfinding::PathFinder;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod perception;
mod steering;

pub use perception::Perception;

/// ChaCha stream reserved for wander and flee draws.
pub const BEHAVIOR_STREAM: u64 = 2;

/// Pure system that turns monster snapshots into behaviour commands.
#[derive(Clone, Debug)]
pub struct Behavior {
    rng: ChaCha8Rng,
}

impl Behavior {
    /// Creates a behaviour system drawing from the provided random source.
    #[must_use]
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Creates a behaviour system whose randomness is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(BEHAVIOR_STREAM);
        Self::new(rng)
    }

    /// Emits the commands for one monster's turn.
    ///
    /// Dead monsters and monsters whose slowness skips this turn only end
    /// their turn, which still advances their turn counter.
    pub fn handle(
        &mut self,
        monster: &MonsterSnapshot,
        player: &PlayerSnapshot,
        grid: &GridMap,
        out: &mut Vec<Command>,
    ) {
        if !monster.state.is_dead() && monster.acts_this_turn() {
            self.act(monster, player, grid, out);
        }
        out.push(Command::EndMonsterTurn {
            monster: monster.id,
        });
    }

    fn act(
        &mut self,
        monster: &MonsterSnapshot,
        player: &PlayerSnapshot,
        grid: &GridMap,
        out: &mut Vec<Command>,
    ) {
        let finder = PathFinder::new(grid);
        let perception = Perception::sense(&finder, monster, player.cell);
        let state = perception.next_state(monster, player);
        tracing::trace!(
            monster = %monster.id,
            smell = perception.smell,
            sight = perception.sight,
            ?state,
            "monster perceives"
        );
        if state != monster.state {
            out.push(Command::SetMonsterState {
                monster: monster.id,
                state,
            });
        }

        if perception.detects() && monster.cell.is_adjacent(player.cell) {
            out.push(Command::MonsterStrike {
                monster: monster.id,
            });
        }

        let destination = match state {
            BehaviorState::Patrol => steering::patrol(&mut self.rng, grid, monster.cell),
            BehaviorState::Search => steering::search(&finder, monster.cell, player.cell),
            BehaviorState::Track => steering::track(&finder, monster.cell, player.cell),
            BehaviorState::Flee => {
                steering::flee(&mut self.rng, &finder, monster.cell, player.cell)
            }
            BehaviorState::Fight | BehaviorState::Dead => None,
        };

        if let Some(to) = destination.filter(|to| *to != monster.cell) {
            tracing::trace!(monster = %monster.id, ?state, from = %monster.cell, %to, "monster steps");
            out.push(Command::MoveMonster {
                monster: monster.id,
                to,
            });
        }
    }
}
