//! A* search with per-call scratch nodes.

use std::{cmp::Reverse, collections::BinaryHeap};

use cavern_core::{CellCoord, GridMap};

use crate::heuristic;

/// Search bookkeeping for a single cell, valid for one call only.
#[derive(Clone, Copy, Debug, Default)]
struct PathNode {
    g: u32,
    predecessor: Option<CellCoord>,
    status: NodeStatus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum NodeStatus {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Frontier entry ordered by `f = 2g + manhattan(cell, destination)`, then
/// by insertion order.
///
/// A node's `f` is fixed when it first enters the frontier; a later cheaper
/// `g` only re-parents it. Each cell is therefore pushed exactly once and the
/// heap pops in the same order as a stable sort of the open list would.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f: u32,
    sequence: u64,
    cell: CellCoord,
}

pub(crate) fn search(
    grid: &GridMap,
    origin: CellCoord,
    destination: CellCoord,
) -> Option<Vec<CellCoord>> {
    let width = usize::try_from(grid.columns()).ok()?;
    let mut nodes = vec![PathNode::default(); grid.cells().len()];
    let mut open = BinaryHeap::new();
    let mut sequence: u64 = 0;

    let origin_index = index(width, origin)?;
    nodes[origin_index].status = NodeStatus::Open;
    open.push(Reverse(OpenEntry {
        f: 0,
        sequence,
        cell: origin,
    }));

    while let Some(Reverse(entry)) = open.pop() {
        let current = entry.cell;
        let current_index = index(width, current)?;
        nodes[current_index].status = NodeStatus::Closed;

        if current == destination {
            return Some(reconstruct(&nodes, width, origin, destination));
        }

        let current_g = nodes[current_index].g;
        for neighbor in grid.neighbors8(current) {
            if grid.is_wall(neighbor) {
                continue;
            }
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };

            let tentative = current_g + heuristic(current, neighbor);
            let node = &mut nodes[neighbor_index];
            match node.status {
                NodeStatus::Closed => {}
                NodeStatus::Open => {
                    if node.g > tentative {
                        node.g = tentative;
                        node.predecessor = Some(current);
                    }
                }
                NodeStatus::Unvisited => {
                    node.g = tentative;
                    node.predecessor = Some(current);
                    node.status = NodeStatus::Open;
                    sequence += 1;
                    // `estimate` already carries `g`, so it counts twice in `f`.
                    let estimate = tentative + heuristic(neighbor, destination);
                    open.push(Reverse(OpenEntry {
                        f: tentative + estimate,
                        sequence,
                        cell: neighbor,
                    }));
                }
            }
        }
    }

    None
}

fn reconstruct(
    nodes: &[PathNode],
    width: usize,
    origin: CellCoord,
    destination: CellCoord,
) -> Vec<CellCoord> {
    let mut path = Vec::new();
    let mut current = destination;

    while current != origin {
        path.push(current);
        let Some(previous) = index(width, current)
            .and_then(|offset| nodes.get(offset))
            .and_then(|node| node.predecessor)
        else {
            break;
        };
        current = previous;
    }

    path.reverse();
    path
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavern_core::CellState;

    #[test]
    fn search_to_self_is_empty() {
        let grid = GridMap::new(3, 3);
        let cell = CellCoord::new(1, 1);
        assert_eq!(search(&grid, cell, cell), Some(Vec::new()));
    }

    #[test]
    fn search_prefers_diagonal_on_open_ground() {
        let grid = GridMap::new(5, 5);
        let path = search(&grid, CellCoord::new(0, 0), CellCoord::new(4, 4)).expect("path");
        assert_eq!(
            path,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 2),
                CellCoord::new(3, 3),
                CellCoord::new(4, 4),
            ]
        );
    }

    #[test]
    fn search_returns_none_for_walled_destination() {
        let mut grid = GridMap::new(3, 3);
        grid.set(CellCoord::new(2, 2), CellState::Wall)
            .expect("in bounds");
        assert_eq!(search(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2)), None);
    }

    #[test]
    fn index_is_row_major() {
        assert_eq!(index(4, CellCoord::new(2, 3)), Some(11));
        assert_eq!(index(4, CellCoord::new(-1, 3)), None);
    }
}
