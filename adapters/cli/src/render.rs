//! ASCII rendering of the cavern.

use cavern_core::{CellCoord, CellState, GridMap};
use cavern_world::{query, World};

const WALL: char = '#';
const FLOOR: char = '.';
const PLAYER: char = '@';
const MONSTER: char = 'M';
const CORPSE: char = 'x';

/// Renders the bare terrain, one line per row.
pub(crate) fn terrain(grid: &GridMap) -> String {
    frame(grid, |_| None)
}

/// Renders the terrain with every agent drawn on top.
///
/// The player covers monsters and living monsters cover corpses.
pub(crate) fn scene(world: &World) -> String {
    let player = query::player(world);
    let monsters = query::monster_view(world);

    frame(query::grid(world), |cell| {
        if cell == player.cell {
            return Some(PLAYER);
        }
        let mut glyph = None;
        for monster in monsters.iter().filter(|monster| monster.cell == cell) {
            if !monster.state.is_dead() {
                return Some(MONSTER);
            }
            glyph = Some(CORPSE);
        }
        glyph
    })
}

fn frame(grid: &GridMap, overlay: impl Fn(CellCoord) -> Option<char>) -> String {
    let columns = usize::try_from(grid.columns()).unwrap_or(0);
    let rows = usize::try_from(grid.rows()).unwrap_or(0);
    let mut output = String::with_capacity(rows * (columns + 1));

    for cell in grid.coords() {
        let glyph = overlay(cell).unwrap_or(match grid.get(cell) {
            Ok(CellState::Wall) => WALL,
            Ok(CellState::Empty) | Err(_) => FLOOR,
        });
        output.push(glyph);
        if i64::from(cell.column()) == i64::from(grid.columns()) - 1 {
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_marks_walls() {
        let mut grid = GridMap::new(2, 3);
        grid.set(CellCoord::new(0, 1), CellState::Wall)
            .expect("in bounds");
        grid.set(CellCoord::new(1, 2), CellState::Wall)
            .expect("in bounds");

        assert_eq!(terrain(&grid), ".#.\n..#\n");
    }

    #[test]
    fn empty_grid_renders_nothing() {
        assert_eq!(terrain(&GridMap::new(0, 0)), "");
    }
}
