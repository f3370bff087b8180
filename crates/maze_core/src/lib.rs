//! Procedural maze levels for a top-down arena.
//!
//! This crate provides:
//! - A rectangular cell grid with per-cell walls
//! - Randomized depth-first maze carving
//! - Breadth-first solving from entry to exit
//! - Tile layout with path markers and a solid perimeter
//! - Merging of collinear tiles into collider segments
//! - A bevy plugin that builds the level at startup

pub mod collider;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod level;
pub mod material;
pub mod maze;
pub mod rng;
pub mod solver;
pub mod tile;

pub use collider::{ColliderMerger, ColliderSegment, StaticBodySink};
pub use config::MazeConfig;
pub use error::{MazeError, MazeResult};
pub use generator::generate;
pub use grid::{Cell, CellCoord, CellGrid, Direction};
pub use level::{load_maze_level, MazeLevel, MazeLevelPlugin, MazeLoadSet};
pub use material::{MaterialProperties, MaterialTable, TileMaterial};
pub use maze::Maze;
pub use rng::{MazeRng, StdRandom};
pub use solver::{heading, solve};
pub use tile::{
    dedup_tiles, world_to_tile_pos, LayoutConfig, Tile, TileIndex, TileKey, TileLayout,
    TileLayoutBuilder,
};
