//! Single-step movement routines bound to each behaviour state.

use cavern_core::{CellCoord, GridMap};
use cavern_system_pathfinding::PathFinder;
use glam::IVec2;
use rand::Rng;

/// Number of flee destinations examined before giving up for the turn.
const FLEE_ATTEMPTS: usize = 10;

/// Alignment with the player direction a flee destination must stay under.
const FLEE_ALIGNMENT: f32 = -0.3;

/// Random wander to an adjacent empty cell; staying put is a valid outcome.
pub(crate) fn patrol<R: Rng>(rng: &mut R, grid: &GridMap, monster: CellCoord) -> Option<CellCoord> {
    let row_step = rng.gen_range(-1..=1);
    let column_step = rng.gen_range(-1..=1);
    let next = monster.offset(row_step, column_step);
    grid.is_walkable(next).then_some(next)
}

/// Jumps to the far end of the line traced from the player back to the monster.
pub(crate) fn search(finder: &PathFinder<'_>, monster: CellCoord, player: CellCoord) -> Option<CellCoord> {
    finder.straight_path(player, monster).last().copied()
}

/// First A* step toward the player, never onto the player's cell.
pub(crate) fn track(finder: &PathFinder<'_>, monster: CellCoord, player: CellCoord) -> Option<CellCoord> {
    if monster == player {
        return None;
    }
    let step = first_step(finder, monster, player)?;
    (step != player).then_some(step)
}

/// First A* step toward a cell pointing away from the player.
///
/// The mirrored player position is tried first, then random cells around
/// the monster until [`FLEE_ATTEMPTS`] candidates have been rejected.
pub(crate) fn flee<R: Rng>(
    rng: &mut R,
    finder: &PathFinder<'_>,
    monster: CellCoord,
    player: CellCoord,
) -> Option<CellCoord> {
    if monster == player {
        return None;
    }

    let grid = finder.grid();
    let origin = to_vec(monster);
    let toward_player = to_vec(player) - origin;
    let mut candidate = CellCoord::new(player.row().saturating_neg(), player.column().saturating_neg());

    for _ in 0..FLEE_ATTEMPTS {
        let away = to_vec(candidate) - origin;
        if grid.is_walkable(candidate) && (toward_player.dot(away) as f32) <= FLEE_ALIGNMENT {
            return first_step(finder, monster, candidate);
        }

        let row_step = rng.gen_range(-1..=1);
        let column_step = rng.gen_range(-1..=1);
        candidate = monster.offset(row_step, column_step);
    }

    tracing::trace!(%monster, %player, "no escape cell found");
    None
}

fn first_step(finder: &PathFinder<'_>, from: CellCoord, to: CellCoord) -> Option<CellCoord> {
    match finder.find_path(from, to) {
        Ok(path) => path?.first().copied(),
        Err(error) => {
            tracing::warn!(%error, "path request rejected");
            None
        }
    }
}

fn to_vec(cell: CellCoord) -> IVec2 {
    IVec2::new(cell.row(), cell.column())
}
