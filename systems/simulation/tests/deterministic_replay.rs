use cavern_core::{
    CellCoord, Direction, Event, MonsterSnapshot, PlayerSnapshot, SimulationConfig,
};
use cavern_system_player_control::PlayerInput;
use cavern_system_simulation::Simulation;
use cavern_world::query;

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    events: Vec<Event>,
    player: PlayerSnapshot,
    monsters: Vec<MonsterSnapshot>,
}

fn config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig {
        seed,
        ..SimulationConfig::default()
    };
    config.map.rows = 24;
    config.map.columns = 24;
    config.monster_spawns = vec![
        CellCoord::new(0, 23),
        CellCoord::new(23, 23),
        CellCoord::new(23, 0),
    ];
    config
}

fn scripted_inputs(tick: usize) -> Vec<PlayerInput> {
    match tick {
        0 => vec![PlayerInput::RouteTo(CellCoord::new(12, 12))],
        5 => vec![PlayerInput::Step(Direction::South)],
        6 | 7 => vec![PlayerInput::Strike],
        9 => vec![
            PlayerInput::Step(Direction::East),
            PlayerInput::RouteTo(CellCoord::new(20, 20)),
        ],
        _ => Vec::new(),
    }
}

fn replay(seed: u64, ticks: usize) -> ReplayOutcome {
    let mut simulation = Simulation::new(&config(seed)).expect("valid configuration");
    let mut events = Vec::new();
    for tick in 0..ticks {
        simulation.step(&scripted_inputs(tick), &mut events);
    }

    ReplayOutcome {
        events,
        player: query::player(simulation.world()),
        monsters: query::monster_view(simulation.world()).into_vec(),
    }
}

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(0x0dd_ba11, 60);
    let second = replay(0x0dd_ba11, 60);

    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn replay_log_starts_with_each_tick() {
    let outcome = replay(77, 10);
    let ticks: Vec<_> = outcome
        .events
        .iter()
        .filter_map(|event| match event {
            Event::TimeAdvanced { tick } => Some(*tick),
            _ => None,
        })
        .collect();

    assert_eq!(ticks, (1..=10).collect::<Vec<u64>>());
    assert_eq!(outcome.events.first(), Some(&Event::TimeAdvanced { tick: 1 }));
}

#[test]
fn different_seeds_diverge() {
    assert_ne!(replay(1, 30), replay(2, 30));
}
