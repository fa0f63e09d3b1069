//! Smell and sight checks that choose a monster's next behaviour state.

use cavern_core::{BehaviorState, CellCoord, MonsterSnapshot, PlayerSnapshot};
use cavern_system_pathfinding::PathFinder;

/// Outcome of a monster sensing the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Perception {
    /// The player is within smell range; walls do not block smell.
    pub smell: bool,
    /// The player is within sight range and on an unobstructed line.
    pub sight: bool,
}

impl Perception {
    /// Senses the player from the monster's cell.
    ///
    /// Line of sight is traced from the player toward the monster.
    #[must_use]
    pub fn sense(finder: &PathFinder<'_>, monster: &MonsterSnapshot, player: CellCoord) -> Self {
        let distance = monster.cell.manhattan_distance(player);
        let smell = distance <= monster.perception.smell;
        let sight = distance <= monster.perception.sight && finder.is_visible(player, monster.cell);
        Self { smell, sight }
    }

    /// Reports whether either sense picked up the player.
    #[must_use]
    pub const fn detects(self) -> bool {
        self.smell || self.sight
    }

    /// State a monster adopts after this perception.
    ///
    /// Smell wins over sight. A monster only hunts a player it strictly
    /// outlasts in health and flees otherwise.
    #[must_use]
    pub fn next_state(self, monster: &MonsterSnapshot, player: &PlayerSnapshot) -> BehaviorState {
        let stronger = monster.stats.health > player.stats.health;
        match (self.smell, self.sight, stronger) {
            (true, _, true) => BehaviorState::Track,
            (false, true, true) => BehaviorState::Search,
            (true, _, false) | (false, true, false) => BehaviorState::Flee,
            (false, false, _) => BehaviorState::Patrol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavern_core::{AgentStats, GridMap, MonsterId, PerceptionRanges};

    fn monster_at(cell: CellCoord, health: i32) -> MonsterSnapshot {
        MonsterSnapshot {
            id: MonsterId::new(0),
            cell,
            stats: AgentStats::new(health, 2, 4),
            state: BehaviorState::Patrol,
            turn: 0,
            slowness: 2,
            perception: PerceptionRanges { smell: 10, sight: 12 },
        }
    }

    fn player_at(cell: CellCoord, health: i32) -> PlayerSnapshot {
        PlayerSnapshot {
            cell,
            stats: AgentStats::new(health, 3, 6),
            queued_steps: 0,
        }
    }

    #[test]
    fn smell_takes_precedence_over_sight() {
        let grid = GridMap::new(10, 10);
        let finder = PathFinder::new(&grid);
        let monster = monster_at(CellCoord::new(0, 0), 12);
        let player = player_at(CellCoord::new(0, 5), 8);

        let perception = Perception::sense(&finder, &monster, player.cell);

        assert_eq!(perception, Perception { smell: true, sight: true });
        assert_eq!(perception.next_state(&monster, &player), BehaviorState::Track);
    }

    #[test]
    fn equal_health_flees() {
        let perception = Perception { smell: false, sight: true };
        let monster = monster_at(CellCoord::new(0, 0), 8);
        let player = player_at(CellCoord::new(0, 1), 8);
        assert_eq!(perception.next_state(&monster, &player), BehaviorState::Flee);
    }

    #[test]
    fn nothing_sensed_patrols() {
        let perception = Perception::default();
        let monster = monster_at(CellCoord::new(0, 0), 30);
        let player = player_at(CellCoord::new(9, 9), 1);
        assert!(!perception.detects());
        assert_eq!(perception.next_state(&monster, &player), BehaviorState::Patrol);
    }
}
