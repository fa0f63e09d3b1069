use cavern_core::{
    AgentStats, BehaviorState, CellCoord, Combatant, Command, Event, GridMap, MonsterId,
    SimulationConfig,
};
use cavern_world::{apply, query, World};

fn duel_config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig {
        seed,
        ..SimulationConfig::default()
    };
    config.map.rows = 5;
    config.map.columns = 5;
    config.player.spawn = CellCoord::new(2, 2);
    config.monster_spawns = vec![CellCoord::new(1, 1)];
    config
}

fn fight(seed: u64, rounds: usize) -> (Vec<Event>, World) {
    let config = duel_config(seed);
    let mut world = World::new(GridMap::new(5, 5), &config).expect("spawns in bounds");
    let monster = MonsterId::new(0);
    let mut events = Vec::new();

    for _ in 0..rounds {
        apply(&mut world, Command::PlayerStrike, &mut events);
        apply(&mut world, Command::MonsterStrike { monster }, &mut events);
    }
    (events, world)
}

#[test]
fn same_seed_rolls_identically() {
    let (first, _) = fight(17, 20);
    let (second, _) = fight(17, 20);
    assert_eq!(first, second);
}

#[test]
fn rolls_stay_within_strength() {
    let config = duel_config(3);
    let (events, _) = fight(3, 30);

    for event in events {
        if let Event::AttackResolved {
            attacker, roll, damage, ..
        } = event
        {
            let strength = match attacker {
                Combatant::Player => config.player.stats.strength,
                Combatant::Monster(_) => config.monster.stats.strength,
            };
            assert!((0..=strength).contains(&roll), "roll {roll} exceeds {strength}");
            assert!(damage >= 0);
        }
    }
}

#[test]
fn duel_ends_with_single_death_notice() {
    let (events, world) = fight(9, 200);
    let monster = MonsterId::new(0);

    let deaths = events
        .iter()
        .filter(|event| matches!(event, Event::MonsterDied { .. }))
        .count();
    let defeats = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerDefeated))
        .count();
    assert!(deaths <= 1);
    assert!(defeats <= 1);

    let snapshot = query::monster(&world, monster).expect("monster exists");
    if deaths == 1 {
        assert_eq!(snapshot.state, BehaviorState::Dead);
        assert!(!snapshot.stats.is_alive());
    }
}

#[test]
fn dead_monster_ignores_orders() {
    let mut config = duel_config(1);
    config.monster.stats = AgentStats::new(1, -5, 4);
    let mut world = World::new(GridMap::new(5, 5), &config).expect("spawns in bounds");
    let monster = MonsterId::new(0);
    let mut events = Vec::new();

    apply(&mut world, Command::PlayerStrike, &mut events);
    events.clear();

    apply(
        &mut world,
        Command::SetMonsterState {
            monster,
            state: BehaviorState::Track,
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::MoveMonster {
            monster,
            to: CellCoord::new(0, 0),
        },
        &mut events,
    );
    apply(&mut world, Command::MonsterStrike { monster }, &mut events);

    assert!(events.is_empty());
    let snapshot = query::monster(&world, monster).expect("monster exists");
    assert_eq!(snapshot.cell, CellCoord::new(1, 1));
    assert_eq!(snapshot.state, BehaviorState::Dead);
}

#[test]
fn monster_view_is_ordered_by_id() {
    let mut config = duel_config(0);
    config.monster_spawns = vec![
        CellCoord::new(0, 0),
        CellCoord::new(4, 4),
        CellCoord::new(0, 4),
    ];
    let world = World::new(GridMap::new(5, 5), &config).expect("spawns in bounds");

    let ids: Vec<_> = query::monster_view(&world)
        .iter()
        .map(|snapshot| snapshot.id)
        .collect();
    assert_eq!(ids, query::monster_ids(&world));
    assert_eq!(ids.len(), 3);
}
