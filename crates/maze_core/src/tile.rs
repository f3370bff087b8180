//! Expansion of a solved cell grid into placed world tiles.
//!
//! Each cell becomes a `cell_size × cell_size` floor block ringed by a one
//! tile border. Neighbouring cells share that border, so the grid scale
//! factor is `cell_size + 1` and the shared tiles are placed twice; a final
//! dedup pass keeps the first tile placed at each position.
//!
//! ```text
//!   cell_size = 3, scale = 4
//!
//!   W - - - W        W  corner, always wall
//!   |  . .  |        -  top/bottom run, wall or floor (rotation 0)
//!   | . M . |        |  left/right run, wall or floor (rotation 90°)
//!   |  . .  |        .  floor block
//!   W - - - W        M  marker on path cells (replaces the centre floor)
//! ```
//!
//! Grid `(x, y)` maps to world `(x, y) * scale * tile_size`; the top side of
//! a cell faces world `-y`.

use std::collections::{HashMap, HashSet};
use std::f32::consts::FRAC_PI_2;

use bevy::log::debug;
use bevy::math::Vec2;

use crate::config::MazeConfig;
use crate::error::{MazeError, MazeResult};
use crate::grid::{Cell, CellCoord, CellGrid, Direction};
use crate::material::TileMaterial;

/// A placed unit of world geometry. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub position: Vec2,
    /// Radians. Wall and floor tiles use multiples of 90°.
    pub rotation: f32,
    pub material: TileMaterial,
}

impl Tile {
    pub fn new(position: Vec2, rotation: f32, material: TileMaterial) -> Self {
        Self {
            position,
            rotation,
            material,
        }
    }

    /// World +x rotated into the tile's frame.
    pub fn right(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    pub fn left(&self) -> Vec2 {
        -self.right()
    }

    /// Rotation as a whole number of quarter turns in `0..4`.
    pub fn quarter_turns(&self) -> i32 {
        quarter_turns(self.rotation)
    }

    pub fn key(&self, tile_size: f32) -> TileKey {
        TileKey::from_position(self.position, tile_size)
    }
}

/// Rotation snapped to quarter turns in `0..4`.
pub fn quarter_turns(rotation: f32) -> i32 {
    ((rotation / FRAC_PI_2).round() as i32).rem_euclid(4)
}

/// Tile position rounded to whole tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    pub x: i64,
    pub y: i64,
}

impl TileKey {
    pub fn from_position(position: Vec2, tile_size: f32) -> Self {
        Self {
            x: (position.x / tile_size).round() as i64,
            y: (position.y / tile_size).round() as i64,
        }
    }
}

/// Largest accepted `cell_size`. Keeps tile offsets and counts in range.
pub const MAX_CELL_SIZE: usize = 255;

/// Geometry settings for the layout stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Odd edge length of each cell's floor block, in tiles.
    pub cell_size: usize,
    pub tile_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_size: 3,
            tile_size: 1.0,
        }
    }
}

impl From<&MazeConfig> for LayoutConfig {
    fn from(config: &MazeConfig) -> Self {
        Self {
            cell_size: config.cell_size,
            tile_size: config.tile_size,
        }
    }
}

impl LayoutConfig {
    pub fn scale(&self) -> usize {
        self.cell_size + 1
    }

    /// `cell_size` must be odd and at most `MAX_CELL_SIZE`; `tile_size`
    /// positive and finite.
    pub fn validate(&self) -> MazeResult<()> {
        if self.cell_size % 2 == 0 {
            return Err(MazeError::EvenCellSize(self.cell_size));
        }
        if self.cell_size > MAX_CELL_SIZE {
            return Err(MazeError::CellSizeTooLarge {
                size: self.cell_size,
                max: MAX_CELL_SIZE,
            });
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(MazeError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }
}

/// Output of `TileLayoutBuilder::build_tiles`.
#[derive(Debug, Clone, Default)]
pub struct TileLayout {
    /// Deduplicated tiles in placement order.
    pub tiles: Vec<Tile>,
    /// World position of the goal marker, if a path cell was the exit.
    pub goal: Option<Vec2>,
}

impl TileLayout {
    pub fn floor_tiles(&self) -> Vec<Tile> {
        self.tiles
            .iter()
            .filter(|t| t.material == TileMaterial::Floor)
            .copied()
            .collect()
    }
}

/// Builds the flat tile list for a solved grid.
#[derive(Debug, Clone)]
pub struct TileLayoutBuilder {
    config: LayoutConfig,
}

impl TileLayoutBuilder {
    /// Expects a config that passes `LayoutConfig::validate`.
    pub fn new(config: LayoutConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid layout config: {:?}",
            config
        );
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// World position of a cell's centre tile.
    pub fn cell_center(&self, coord: CellCoord) -> Vec2 {
        let step = self.config.scale() as f32 * self.config.tile_size;
        Vec2::new(coord.x as f32 * step, coord.y as f32 * step)
    }

    /// Place every cell, then dedup shared borders (first placement wins).
    pub fn build_tiles(&self, grid: &CellGrid) -> TileLayout {
        let per_cell = (self.config.scale() + 1).pow(2) + 1;
        let mut placed = Vec::with_capacity(grid.len() * per_cell);
        let mut goal = None;

        for cell in grid.cells() {
            let (tiles, cell_goal) = self.place_cell(cell);
            placed.extend(tiles);
            if cell_goal.is_some() {
                goal = cell_goal;
            }
        }

        let raw = placed.len();
        let tiles = dedup_tiles(placed, self.config.tile_size);
        debug!(
            "Placed {} tiles for {}x{} grid ({} after dedup)",
            raw,
            grid.width(),
            grid.height(),
            tiles.len()
        );

        TileLayout { tiles, goal }
    }

    /// Raw tiles for one cell, before dedup, plus the goal position if this
    /// cell is the end of the solution path.
    pub fn place_cell(&self, cell: &Cell) -> (Vec<Tile>, Option<Vec2>) {
        let ts = self.config.tile_size;
        let center = self.cell_center(cell.coord());
        let inner = (self.config.cell_size / 2) as i64;
        let edge = (self.config.scale() / 2) as i64;
        let at = |dx: i64, dy: i64| center + Vec2::new(dx as f32 * ts, dy as f32 * ts);

        let mut tiles = Vec::new();
        let mut goal = None;

        // 1. Marker on the solution path
        if cell.on_path {
            match cell.next {
                Some(next) => {
                    let offset = self.cell_center(next) - center;
                    let rotation = offset.y.atan2(offset.x) - FRAC_PI_2;
                    tiles.push(Tile::new(center, rotation, TileMaterial::DirectionalMarker));
                }
                None => {
                    tiles.push(Tile::new(center, 0.0, TileMaterial::GoalMarker));
                    goal = Some(center);
                }
            }
        }

        // 2. Floor block
        for dy in -inner..=inner {
            for dx in -inner..=inner {
                tiles.push(Tile::new(at(dx, dy), 0.0, TileMaterial::Floor));
            }
        }

        // 3. Perimeter: corners, then one run per side
        for (dx, dy) in [(-edge, -edge), (edge, -edge), (-edge, edge), (edge, edge)] {
            tiles.push(Tile::new(at(dx, dy), 0.0, TileMaterial::Wall));
        }

        for dir in Direction::ALL {
            let material = if cell.has_wall(dir) {
                TileMaterial::Wall
            } else {
                TileMaterial::Floor
            };
            for along in -inner..=inner {
                let (dx, dy, rotation) = match dir {
                    Direction::Top => (along, -edge, 0.0),
                    Direction::Bottom => (along, edge, 0.0),
                    Direction::Left => (-edge, along, FRAC_PI_2),
                    Direction::Right => (edge, along, FRAC_PI_2),
                };
                tiles.push(Tile::new(at(dx, dy), rotation, material));
            }
        }

        (tiles, goal)
    }
}

/// Remove tiles sharing a rounded position, keeping the first one seen.
///
/// When two cells disagree about a shared border tile the earlier cell's
/// tile is kept regardless of material.
pub fn dedup_tiles(tiles: Vec<Tile>, tile_size: f32) -> Vec<Tile> {
    let mut seen: HashSet<TileKey> = HashSet::with_capacity(tiles.len());
    tiles
        .into_iter()
        .filter(|t| seen.insert(t.key(tile_size)))
        .collect()
}

/// Snap a world point to the centre of the tile containing it, in a frame
/// rotated by `rotation`.
pub fn world_to_tile_pos(world: Vec2, rotation: f32, tile_size: f32) -> Vec2 {
    let local = Vec2::from_angle(-rotation).rotate(world);
    let snapped = (local / tile_size).round() * tile_size;
    Vec2::from_angle(rotation).rotate(snapped)
}

/// Position lookup over a deduplicated tile list.
#[derive(Debug, Clone)]
pub struct TileIndex {
    by_key: HashMap<TileKey, usize>,
    tile_size: f32,
}

impl TileIndex {
    pub fn new(tiles: &[Tile], tile_size: f32) -> Self {
        let mut by_key = HashMap::with_capacity(tiles.len());
        for (i, tile) in tiles.iter().enumerate() {
            by_key.entry(tile.key(tile_size)).or_insert(i);
        }
        Self { by_key, tile_size }
    }

    /// Index of the tile at a rounded position.
    pub fn get(&self, position: Vec2) -> Option<usize> {
        self.by_key
            .get(&TileKey::from_position(position, self.tile_size))
            .copied()
    }

    /// Tile within `slop` of `position` whose rotation matches within `slop`.
    pub fn find<'a>(
        &self,
        tiles: &'a [Tile],
        position: Vec2,
        rotation: f32,
        slop: f32,
    ) -> Option<&'a Tile> {
        let tile = tiles.get(self.get(position)?)?;
        let close = tile.position.distance(position) <= slop;
        (close && angles_match(tile.rotation, rotation, slop)).then_some(tile)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Angles equal modulo a full turn, within `slop` radians.
pub fn angles_match(a: f32, b: f32, slop: f32) -> bool {
    let diff = (a - b).rem_euclid(std::f32::consts::TAU);
    diff <= slop || std::f32::consts::TAU - diff <= slop
}
