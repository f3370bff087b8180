//! The maze aggregate: one fully built level.
//!
//! `Maze::new` runs the whole pipeline synchronously (carve, solve, lay out
//! tiles) and returns a value that is never mutated afterwards. Gameplay
//! code polls it each tick through plain queries (`distance_to_goal`,
//! `is_near_floor_tile`, ...) instead of registering callbacks.
//!
//! # Example
//!
//! ```ignore
//! use maze_core::{Maze, MazeConfig, StdRandom};
//!
//! let config = MazeConfig::with_size(8, 8);
//! let maze = Maze::new(&config, &mut StdRandom::from_seed(7))?;
//!
//! if maze.goal_reached(player_pos) {
//!     // next level
//! }
//! ```

use bevy::log::info;
use bevy::math::Vec2;

use crate::config::MazeConfig;
use crate::error::{MazeError, MazeResult};
use crate::generator::generate;
use crate::grid::{CellCoord, CellGrid};
use crate::material::{MaterialTable, TileMaterial};
use crate::rng::MazeRng;
use crate::solver::{heading, solve};
use crate::tile::{LayoutConfig, Tile, TileIndex, TileLayoutBuilder};

/// A generated, solved and laid out maze.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: CellGrid,
    path: Vec<CellCoord>,
    goal: Vec2,
    spawn: Vec2,
    tiles: Vec<Tile>,
    floor_tiles: Vec<Tile>,
    tile_index: TileIndex,
    layout: TileLayoutBuilder,
    goal_radius: f32,
    tile_slop: f32,
}

impl Maze {
    /// Build a maze of `config.width × config.height` cells.
    ///
    /// Fails fast on invalid configuration. `MazeError::Unsolvable` means
    /// the generator broke its spanning-tree guarantee.
    pub fn new(config: &MazeConfig, rng: &mut dyn MazeRng) -> MazeResult<Self> {
        config.validate()?;

        let mut grid = CellGrid::new(config.width, config.height);
        generate(&mut grid, rng);
        let path = solve(&mut grid)?;

        let layout = TileLayoutBuilder::new(LayoutConfig::from(config));
        let built = layout.build_tiles(&grid);
        let goal = built.goal.ok_or(MazeError::Unsolvable {
            width: config.width,
            height: config.height,
        })?;
        let floor_tiles = built.floor_tiles();
        let spawn = layout.cell_center(grid.entry());
        let tile_index = TileIndex::new(&built.tiles, config.tile_size);

        info!(
            "Built {}x{} maze: path {} cells, {} tiles ({} floor)",
            config.width,
            config.height,
            path.len(),
            built.tiles.len(),
            floor_tiles.len()
        );

        Ok(Self {
            grid,
            path,
            goal,
            spawn,
            tiles: built.tiles,
            floor_tiles,
            tile_index,
            layout,
            goal_radius: config.goal_radius,
            tile_slop: config.tile_slop,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Solution path, entry first.
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// World position of the goal marker.
    pub fn goal(&self) -> Vec2 {
        self.goal
    }

    /// World position of the entry cell centre.
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Open floor tiles, for spawn sampling.
    pub fn floor_tiles(&self) -> &[Tile] {
        &self.floor_tiles
    }

    /// Tiles whose material is solid according to `materials`.
    pub fn solid_tiles<'a>(
        &'a self,
        materials: &'a MaterialTable,
    ) -> impl Iterator<Item = &'a Tile> + 'a {
        self.tiles.iter().filter(|t| materials.is_solid(t.material))
    }

    pub fn cell_center(&self, coord: CellCoord) -> Vec2 {
        self.layout.cell_center(coord)
    }

    pub fn distance_to_goal(&self, position: Vec2) -> f32 {
        position.distance(self.goal)
    }

    /// Whether `position` is within the configured goal radius.
    pub fn goal_reached(&self, position: Vec2) -> bool {
        self.distance_to_goal(position) <= self.goal_radius
    }

    /// Whether any floor tile centre lies within `radius` of `position`.
    pub fn is_near_floor_tile(&self, position: Vec2, radius: f32) -> bool {
        let r_sq = radius * radius;
        self.floor_tiles
            .iter()
            .any(|t| t.position.distance_squared(position) <= r_sq)
    }

    /// Centre of a uniformly chosen floor tile.
    pub fn random_floor_position(&self, rng: &mut dyn MazeRng) -> Option<Vec2> {
        if self.floor_tiles.is_empty() {
            return None;
        }
        let i = rng.next_usize_max(self.floor_tiles.len());
        self.floor_tiles.get(i).map(|t| t.position)
    }

    /// Tile at `position` with matching `rotation`, within the configured slop.
    pub fn find_tile_at(&self, position: Vec2, rotation: f32) -> Option<&Tile> {
        self.tile_index
            .find(&self.tiles, position, rotation, self.tile_slop)
    }

    /// Material of whatever tile sits at `position`, ignoring rotation.
    pub fn material_at(&self, position: Vec2) -> Option<TileMaterial> {
        self.tile_index
            .get(position)
            .and_then(|i| self.tiles.get(i))
            .map(|t| t.material)
    }

    /// World-space heading from a path cell toward the next one.
    pub fn heading_at(&self, coord: CellCoord) -> Option<Vec2> {
        heading(&self.grid, coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::tests::ScriptedRng;
    use crate::rng::StdRandom;
    use std::collections::HashSet;

    fn build(width: usize, height: usize, seed: u64) -> Maze {
        Maze::new(&MazeConfig::with_size(width, height), &mut StdRandom::from_seed(seed)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut rng = StdRandom::from_seed(0);
        let err = Maze::new(&MazeConfig::with_size(0, 5), &mut rng).unwrap_err();
        assert!(matches!(err, MazeError::InvalidDimensions { .. }));

        let config = MazeConfig {
            cell_size: 2,
            ..Default::default()
        };
        assert!(matches!(
            Maze::new(&config, &mut rng),
            Err(MazeError::EvenCellSize(2))
        ));
    }

    #[test]
    fn test_pipeline_outputs_populated() {
        let maze = build(7, 5, 3);
        assert_eq!(maze.path().first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(maze.path().last(), Some(&CellCoord::new(6, 4)));
        assert_eq!(maze.goal(), maze.cell_center(CellCoord::new(6, 4)));
        assert_eq!(maze.spawn(), Vec2::ZERO);
        assert!(!maze.tiles().is_empty());
        assert!(maze
            .floor_tiles()
            .iter()
            .all(|t| t.material == TileMaterial::Floor));
        assert_eq!(maze.grid().removed_wall_count(), 7 * 5 - 1);
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = build(6, 6, 99);
        let b = build(6, 6, 99);
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.path(), b.path());
        assert_eq!(a.tiles(), b.tiles());
    }

    #[test]
    fn test_tiles_unique_positions() {
        let maze = build(5, 4, 8);
        let keys: HashSet<_> = maze.tiles().iter().map(|t| t.key(1.0)).collect();
        assert_eq!(keys.len(), maze.tiles().len());
    }

    #[test]
    fn test_goal_queries() {
        let maze = build(3, 3, 5);
        let goal = maze.goal();
        assert_eq!(maze.distance_to_goal(goal), 0.0);
        assert!(maze.goal_reached(goal + Vec2::new(0.5, 0.5)));
        assert!(!maze.goal_reached(maze.spawn()));
    }

    #[test]
    fn test_floor_queries() {
        let maze = build(2, 2, 1);
        // Spawn centre is a directional marker; its neighbours are floor.
        assert!(maze.is_near_floor_tile(maze.spawn(), 1.0));
        assert!(!maze.is_near_floor_tile(Vec2::new(-50.0, -50.0), 1.0));

        let mut rng = ScriptedRng::new(vec![0, 3]);
        let first = maze.random_floor_position(&mut rng).unwrap();
        assert_eq!(first, maze.floor_tiles()[0].position);
        let second = maze.random_floor_position(&mut rng).unwrap();
        assert_eq!(maze.material_at(second), Some(TileMaterial::Floor));
    }

    #[test]
    fn test_find_tile_at_corner() {
        let maze = build(2, 2, 4);
        // Top-left corner of the entry cell is always a wall at rotation 0.
        let corner = maze.find_tile_at(Vec2::new(-2.0, -2.0), 0.0).unwrap();
        assert_eq!(corner.material, TileMaterial::Wall);
        assert!(maze.find_tile_at(Vec2::new(-2.0, -2.0), 1.0).is_none());
    }

    #[test]
    fn test_heading_follows_path() {
        let maze = build(4, 4, 12);
        let path = maze.path().to_vec();
        for pair in path.windows(2) {
            let h = maze.heading_at(pair[0]).unwrap();
            let expected = Vec2::new(
                pair[1].x as f32 - pair[0].x as f32,
                pair[1].y as f32 - pair[0].y as f32,
            );
            assert_eq!(h, expected);
        }
        assert!(maze.heading_at(*path.last().unwrap()).is_none());
    }

    #[test]
    fn test_solid_tiles_are_walls() {
        let config = MazeConfig::with_size(3, 3);
        let maze = Maze::new(&config, &mut StdRandom::from_seed(2)).unwrap();
        assert!(maze
            .solid_tiles(&config.materials)
            .all(|t| t.material == TileMaterial::Wall));
    }
}
