use cavern_core::{CellCoord, CellState, GridMap, MapConfig};
use cavern_system_mapgen::{smooth, MapGenerator};

fn config(rows: u32, columns: u32) -> MapConfig {
    MapConfig {
        rows,
        columns,
        wall_density: 50,
        generations: 10,
    }
}

fn generate(config: &MapConfig, seed: u64) -> GridMap {
    let mut grid = GridMap::new(config.rows, config.columns);
    MapGenerator::from_seed(config, seed)
        .generate(&mut grid)
        .expect("generation stays inside the grid");
    grid
}

#[test]
fn same_seed_produces_same_map() {
    let config = config(30, 40);
    assert_eq!(generate(&config, 42), generate(&config, 42));
}

#[test]
fn different_seeds_produce_different_maps() {
    let config = config(30, 40);
    assert_ne!(generate(&config, 1), generate(&config, 2));
}

#[test]
fn border_ring_is_never_touched() {
    let config = MapConfig {
        wall_density: 100,
        ..config(20, 25)
    };
    let grid = generate(&config, 99);

    for cell in grid.coords() {
        let on_border = cell.row() == 0
            || cell.column() == 0
            || cell.row() == grid.rows() as i32 - 1
            || cell.column() == grid.columns() as i32 - 1;
        if on_border {
            assert_eq!(grid.get(cell), Ok(CellState::Empty), "border cell {cell} changed");
        }
    }
}

#[test]
fn generated_map_mixes_walls_and_floor() {
    let grid = generate(&config(40, 40), 0xdead_beef);
    let walls = grid.count(CellState::Wall);
    assert!(walls > 0);
    assert!(walls < grid.cells().len());
}

#[test]
fn smoothing_is_idempotent_at_quiescence() {
    let mut grid = generate(&config(30, 30), 5);
    let mut passes = 0;
    while smooth(&mut grid).expect("in bounds") > 0 {
        passes += 1;
        assert!(passes < 500, "automaton failed to settle");
    }

    let settled = grid.clone();
    assert_eq!(smooth(&mut grid).expect("in bounds"), 0);
    assert_eq!(grid, settled);
}

#[test]
fn rounded_block_is_already_stable() {
    let mut grid = GridMap::new(8, 8);
    let block = [
        (2, 3),
        (2, 4),
        (3, 2),
        (3, 3),
        (3, 4),
        (3, 5),
        (4, 2),
        (4, 3),
        (4, 4),
        (4, 5),
        (5, 3),
        (5, 4),
    ];
    for (row, column) in block {
        grid.set(CellCoord::new(row, column), CellState::Wall)
            .expect("in bounds");
    }
    let before = grid.clone();

    assert_eq!(smooth(&mut grid).expect("in bounds"), 0);
    assert_eq!(grid, before);
}

#[test]
fn square_block_corners_erode() {
    let mut grid = GridMap::new(8, 8);
    for row in 2..6 {
        for column in 2..6 {
            grid.set(CellCoord::new(row, column), CellState::Wall)
                .expect("in bounds");
        }
    }

    assert_eq!(smooth(&mut grid).expect("in bounds"), 4);
    for corner in [(2, 2), (2, 5), (5, 2), (5, 5)] {
        assert_eq!(
            grid.get(CellCoord::new(corner.0, corner.1)),
            Ok(CellState::Empty)
        );
    }
}

#[test]
fn zero_generations_keep_raw_fill() {
    let raw_config = MapConfig {
        generations: 0,
        ..config(16, 16)
    };
    let raw = generate(&raw_config, 11);

    let mut filled = GridMap::new(16, 16);
    MapGenerator::from_seed(&raw_config, 11)
        .random_fill(&mut filled)
        .expect("in bounds");

    assert_eq!(raw, filled);
}
