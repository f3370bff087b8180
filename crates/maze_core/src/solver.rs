//! Breadth-first solution of a carved maze.
//!
//! BFS from the entry, honouring the wall flags, records a `prev` link on
//! every cell it reaches. Walking those links back from the exit gives the
//! path; a second pass fills in the forward `next` links so downstream code
//! can read a heading without re-walking the grid.
//!
//! The maze is a spanning tree, so the shortest path is also the only path.

use std::collections::VecDeque;

use bevy::log::debug;
use bevy::math::Vec2;

use crate::error::{MazeError, MazeResult};
use crate::grid::{CellCoord, CellGrid};

/// Solve `grid` from `(0, 0)` to `(width - 1, height - 1)`.
///
/// Annotates the grid (`explored`, `prev`, `next`, `on_path`) and returns the
/// path in forward order, entry first. Any previous annotation is cleared
/// first, so solving twice gives the same result.
pub fn solve(grid: &mut CellGrid) -> MazeResult<Vec<CellCoord>> {
    let (width, height) = (grid.width(), grid.height());
    if grid.is_empty() {
        return Err(MazeError::InvalidDimensions { width, height });
    }

    for cell in grid.cells_mut() {
        cell.explored = false;
        cell.on_path = false;
        cell.prev = None;
        cell.next = None;
    }

    let entry = grid.entry();
    let exit = grid.exit();

    let mut queue: VecDeque<CellCoord> = VecDeque::new();
    queue.push_back(entry);

    while let Some(c) = queue.pop_front() {
        if c == exit {
            break;
        }
        let i = grid.index(c);
        if grid.cells()[i].explored {
            continue;
        }

        for dir in grid.open_directions(c) {
            let Some(n) = grid.neighbor(c, dir) else {
                continue;
            };
            let ni = grid.index(n);
            let neighbor = &mut grid.cells_mut()[ni];
            if !neighbor.explored {
                neighbor.prev = Some(c);
                queue.push_back(n);
            }
        }

        grid.cells_mut()[i].explored = true;
    }

    // Walk back from the exit. Bounded by the cell count so a corrupted
    // prev chain can't loop forever.
    let mut path = Vec::new();
    let mut current = exit;
    loop {
        path.push(current);
        if current == entry {
            break;
        }
        if path.len() > grid.len() {
            return Err(MazeError::Unsolvable { width, height });
        }
        match grid.cells()[grid.index(current)].prev {
            Some(p) => current = p,
            None => return Err(MazeError::Unsolvable { width, height }),
        }
    }
    path.reverse();

    for (step, &coord) in path.iter().enumerate() {
        let i = grid.index(coord);
        let cell = &mut grid.cells_mut()[i];
        cell.on_path = true;
        cell.next = path.get(step + 1).copied();
    }
    // Entry has no predecessor on the path.
    let ei = grid.index(entry);
    grid.cells_mut()[ei].prev = None;

    debug!("Solved {}x{} maze: path length {}", width, height, path.len());

    Ok(path)
}

/// Unit vector (grid space, `y` down) from a path cell toward its `next`
/// cell. `None` off the path and at the exit.
pub fn heading(grid: &CellGrid, coord: CellCoord) -> Option<Vec2> {
    let cell = grid.get(coord)?;
    let next = cell.next?;
    let offset = Vec2::new(
        next.x as f32 - coord.x as f32,
        next.y as f32 - coord.y as f32,
    );
    Some(offset.normalize_or_zero())
}
