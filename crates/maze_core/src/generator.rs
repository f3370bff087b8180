//! Randomized depth-first maze carving.
//!
//! Classic recursive backtracker with an explicit stack: walk from the entry
//! into a random unvisited neighbour, knocking down the wall between, and
//! back up whenever the current cell has nowhere left to go. Every cell is
//! visited exactly once, so the carved passages form a spanning tree:
//! `width * height - 1` walls removed, fully connected, no loops.

use bevy::log::debug;

use crate::grid::{CellCoord, CellGrid};
use crate::rng::MazeRng;

/// Carve `grid` in place into a perfect maze.
///
/// Expects a freshly constructed grid (all walls up, nothing visited).
/// Degenerate grids (one cell, one row, one column) are handled by the same
/// loop and never error.
pub fn generate(grid: &mut CellGrid, rng: &mut dyn MazeRng) {
    if grid.is_empty() {
        return;
    }

    let entry = grid.entry();
    let mut stack: Vec<CellCoord> = Vec::with_capacity(grid.len());

    if let Some(cell) = grid.get_mut(entry) {
        cell.visited = true;
    }
    stack.push(entry);

    let mut carved = 0usize;

    while let Some(&current) = stack.last() {
        let unvisited: Vec<CellCoord> = grid
            .neighbors(current)
            .into_iter()
            .filter(|&n| grid.get(n).is_some_and(|c| !c.visited))
            .collect();

        if unvisited.is_empty() {
            // Dead end, backtrack.
            stack.pop();
            continue;
        }

        let chosen = unvisited[rng.next_usize_max(unvisited.len())];
        if let Some(cell) = grid.get_mut(chosen) {
            cell.visited = true;
        }
        if grid.remove_wall_between(current, chosen) {
            carved += 1;
        }
        stack.push(chosen);
    }

    debug!(
        "Carved {}x{} maze: {} walls removed",
        grid.width(),
        grid.height(),
        carved
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;
    use crate::rng::tests::ScriptedRng;
    use crate::rng::StdRandom;
    use std::collections::{HashSet, VecDeque};

    /// Count cells reachable from the entry through open walls.
    fn reachable_count(grid: &CellGrid) -> usize {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([grid.entry()]);
        seen.insert(grid.entry());
        while let Some(c) = queue.pop_front() {
            for dir in grid.open_directions(c) {
                if let Some(n) = grid.neighbor(c, dir) {
                    if seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        seen.len()
    }

    #[test]
    fn test_spanning_tree_property() {
        for (w, h, seed) in [(1, 1, 1), (5, 1, 2), (1, 7, 3), (4, 4, 4), (10, 7, 5), (16, 16, 6)] {
            let mut grid = CellGrid::new(w, h);
            let mut rng = StdRandom::from_seed(seed);
            generate(&mut grid, &mut rng);

            assert!(grid.cells().iter().all(|c| c.visited), "{}x{} not fully visited", w, h);
            assert_eq!(grid.removed_wall_count(), w * h - 1, "{}x{} edge count", w, h);
            assert_eq!(reachable_count(&grid), w * h, "{}x{} not connected", w, h);
            assert!(grid.is_symmetric());
        }
    }

    #[test]
    fn test_outer_border_untouched() {
        let mut grid = CellGrid::new(6, 5);
        generate(&mut grid, &mut StdRandom::from_seed(99));

        for cell in grid.cells() {
            let c = cell.coord();
            for dir in Direction::ALL {
                if grid.neighbor(c, dir).is_none() {
                    assert!(cell.has_wall(dir), "border wall removed at {:?} {:?}", c, dir);
                }
            }
        }
    }

    #[test]
    fn test_single_cell_terminates() {
        let mut grid = CellGrid::new(1, 1);
        generate(&mut grid, &mut StdRandom::from_seed(0));
        assert!(grid.cells()[0].visited);
        assert_eq!(grid.removed_wall_count(), 0);
    }

    #[test]
    fn test_one_by_two_has_single_tree() {
        for seed in 0..5 {
            let mut grid = CellGrid::new(1, 2);
            generate(&mut grid, &mut StdRandom::from_seed(seed));
            assert!(!grid.has_wall(CellCoord::new(0, 0), Direction::Bottom));
            assert!(!grid.has_wall(CellCoord::new(0, 1), Direction::Top));
        }
    }

    #[test]
    fn test_same_seed_same_walls() {
        let mut a = CellGrid::new(9, 6);
        let mut b = CellGrid::new(9, 6);
        generate(&mut a, &mut StdRandom::from_seed(2024));
        generate(&mut b, &mut StdRandom::from_seed(2024));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scripted_choices_carve_serpentine() {
        // Always take the first unvisited neighbour: from (0,0) that is
        // Bottom, so a 2x2 grid is carved down, right, up.
        let mut grid = CellGrid::new(2, 2);
        generate(&mut grid, &mut ScriptedRng::new(vec![0]));

        assert!(!grid.has_wall(CellCoord::new(0, 0), Direction::Bottom));
        assert!(!grid.has_wall(CellCoord::new(0, 1), Direction::Right));
        assert!(!grid.has_wall(CellCoord::new(1, 1), Direction::Top));
        assert!(grid.has_wall(CellCoord::new(0, 0), Direction::Right));
    }
}
