//! Cell grid storage for maze generation.
//!
//! A `CellGrid` is a dense, row-major array of `Cell`s. Every cell starts
//! with all four walls up; the generator knocks walls down in pairs so both
//! sides of a passage always agree.
//!
//! Links along the solution path (`prev`/`next`) are stored as `CellCoord`s
//! into the grid, so the path is plain data and can't form reference cycles.

use serde::{Deserialize, Serialize};

/// Grid coordinates of a cell. `y` grows downward (row index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// One of the four sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward `y - 1`.
    Top,
    /// Toward `y + 1`.
    Bottom,
    /// Toward `x - 1`.
    Left,
    /// Toward `x + 1`.
    Right,
}

impl Direction {
    /// Neighbour lookup order used by the generator and solver.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Grid offset `(dx, dy)` for one step in this direction.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::Top => (0, -1),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Direction from `from` to an orthogonally adjacent `to`.
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        let dx = to.x as i64 - from.x as i64;
        let dy = to.y as i64 - from.y as i64;
        match (dx, dy) {
            (0, -1) => Some(Direction::Top),
            (0, 1) => Some(Direction::Bottom),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// A single maze cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,

    /// Wall flags, `true` = wall present.
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,

    /// Set by the generator once the cell has been carved into.
    pub visited: bool,
    /// Set by the solver once the cell has been expanded.
    pub explored: bool,
    /// Whether the cell lies on the solution path.
    pub on_path: bool,

    /// BFS parent, then the previous cell on the solution path.
    pub prev: Option<CellCoord>,
    /// Next cell on the solution path. `None` off the path and at the exit.
    pub next: Option<CellCoord>,
}

impl Cell {
    /// A fresh cell with every wall standing.
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            top: true,
            bottom: true,
            left: true,
            right: true,
            visited: false,
            explored: false,
            on_path: false,
            prev: None,
            next: None,
        }
    }

    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }

    pub fn has_wall(&self, dir: Direction) -> bool {
        match dir {
            Direction::Top => self.top,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set_wall(&mut self, dir: Direction, present: bool) {
        match dir {
            Direction::Top => self.top = present,
            Direction::Bottom => self.bottom = present,
            Direction::Left => self.left = present,
            Direction::Right => self.right = present,
        }
    }
}

/// Dense `width × height` grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Create a grid with all walls present.
    ///
    /// Dimensions are validated by `MazeConfig::validate`; a zero dimension
    /// here simply yields an empty grid.
    ///
    /// # Panics
    ///
    /// If `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Flat index of a coordinate. Caller must ensure it is in bounds.
    pub fn index(&self, coord: CellCoord) -> usize {
        coord.y * self.width + coord.x
    }

    pub fn get(&self, coord: CellCoord) -> Option<&Cell> {
        if self.contains(coord) {
            Some(&self.cells[self.index(coord)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        if self.contains(coord) {
            let i = self.index(coord);
            Some(&mut self.cells[i])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Entry cell, always `(0, 0)`.
    pub fn entry(&self) -> CellCoord {
        CellCoord::new(0, 0)
    }

    /// Exit cell, always the bottom-right corner.
    pub fn exit(&self) -> CellCoord {
        CellCoord::new(self.width.saturating_sub(1), self.height.saturating_sub(1))
    }

    /// Bounds-checked neighbour in the given direction.
    pub fn neighbor(&self, coord: CellCoord, dir: Direction) -> Option<CellCoord> {
        let (dx, dy) = dir.offset();
        let nx = coord.x as i64 + dx;
        let ny = coord.y as i64 + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        let n = CellCoord::new(nx as usize, ny as usize);
        self.contains(n).then_some(n)
    }

    /// In-bounds neighbours in top, bottom, left, right order.
    pub fn neighbors(&self, coord: CellCoord) -> Vec<CellCoord> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.neighbor(coord, dir))
            .collect()
    }

    /// Whether the wall on `dir` side of `coord` is standing.
    /// Out-of-bounds coordinates report a wall.
    pub fn has_wall(&self, coord: CellCoord, dir: Direction) -> bool {
        self.get(coord).map_or(true, |c| c.has_wall(dir))
    }

    /// Directions with no wall that lead to an in-bounds neighbour.
    pub fn open_directions(&self, coord: CellCoord) -> Vec<Direction> {
        Direction::ALL
            .iter()
            .copied()
            .filter(|&dir| !self.has_wall(coord, dir) && self.neighbor(coord, dir).is_some())
            .collect()
    }

    /// Knock down the wall between two adjacent cells, on both sides.
    ///
    /// Returns `false` (and changes nothing) if the cells are not adjacent.
    pub fn remove_wall_between(&mut self, a: CellCoord, b: CellCoord) -> bool {
        let Some(dir) = Direction::between(a, b) else {
            return false;
        };
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells[ia].set_wall(dir, false);
        self.cells[ib].set_wall(dir.opposite(), false);
        true
    }

    /// Number of carved internal walls (each passage counted once).
    pub fn removed_wall_count(&self) -> usize {
        let mut count = 0;
        for cell in &self.cells {
            let c = cell.coord();
            if !cell.right && self.neighbor(c, Direction::Right).is_some() {
                count += 1;
            }
            if !cell.bottom && self.neighbor(c, Direction::Bottom).is_some() {
                count += 1;
            }
        }
        count
    }

    /// Both sides of every internal wall agree.
    pub fn is_symmetric(&self) -> bool {
        self.cells.iter().all(|cell| {
            let c = cell.coord();
            Direction::ALL.iter().all(|&dir| match self.neighbor(c, dir) {
                Some(n) => self.has_wall(n, dir.opposite()) == cell.has_wall(dir),
                None => true,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_all_walls() {
        let grid = CellGrid::new(3, 2);
        assert_eq!(grid.len(), 6);
        assert!(grid
            .cells()
            .iter()
            .all(|c| c.top && c.bottom && c.left && c.right && !c.visited));
        assert_eq!(grid.removed_wall_count(), 0);
        assert!(grid.is_symmetric());
    }

    #[test]
    fn test_row_major_layout() {
        let grid = CellGrid::new(4, 3);
        let cell = &grid.cells()[grid.index(CellCoord::new(1, 2))];
        assert_eq!((cell.x, cell.y), (1, 2));
        assert_eq!(grid.index(CellCoord::new(1, 2)), 9);
    }

    #[test]
    fn test_neighbors_bounds_checked() {
        let grid = CellGrid::new(3, 3);
        assert_eq!(
            grid.neighbors(CellCoord::new(0, 0)),
            vec![CellCoord::new(0, 1), CellCoord::new(1, 0)]
        );
        assert_eq!(grid.neighbors(CellCoord::new(1, 1)).len(), 4);
        assert!(grid.neighbor(CellCoord::new(2, 2), Direction::Right).is_none());
    }

    #[test]
    fn test_remove_wall_is_symmetric() {
        let mut grid = CellGrid::new(2, 2);
        assert!(grid.remove_wall_between(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        assert!(!grid.has_wall(CellCoord::new(0, 0), Direction::Right));
        assert!(!grid.has_wall(CellCoord::new(1, 0), Direction::Left));

        assert!(grid.remove_wall_between(CellCoord::new(1, 1), CellCoord::new(1, 0)));
        assert!(!grid.has_wall(CellCoord::new(1, 1), Direction::Top));
        assert!(!grid.has_wall(CellCoord::new(1, 0), Direction::Bottom));

        assert_eq!(grid.removed_wall_count(), 2);
        assert!(grid.is_symmetric());
    }

    #[test]
    fn test_remove_wall_rejects_non_adjacent() {
        let mut grid = CellGrid::new(3, 3);
        assert!(!grid.remove_wall_between(CellCoord::new(0, 0), CellCoord::new(1, 1)));
        assert!(!grid.remove_wall_between(CellCoord::new(0, 0), CellCoord::new(2, 0)));
        assert_eq!(grid.removed_wall_count(), 0);
    }

    #[test]
    fn test_open_directions_ignores_border() {
        let mut grid = CellGrid::new(1, 1);
        // Border walls knocked out by hand still lead nowhere.
        if let Some(cell) = grid.get_mut(CellCoord::new(0, 0)) {
            cell.left = false;
        }
        assert!(grid.open_directions(CellCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn test_direction_between() {
        let a = CellCoord::new(1, 1);
        assert_eq!(Direction::between(a, CellCoord::new(1, 0)), Some(Direction::Top));
        assert_eq!(Direction::between(a, CellCoord::new(2, 1)), Some(Direction::Right));
        assert_eq!(Direction::between(a, a), None);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }
}
