//! Maze level configuration.
//!
//! One immutable value carries everything the pipeline needs (dimensions,
//! tile scale, material table, collider sizing, seed). It is a bevy
//! `Resource` so the level plugin can pick it up, and it deserializes from
//! JSON with every field optional.
//!
//! ```ignore
//! let config = MazeConfig::load("levels/arena.json")?;
//! let maze = Maze::new(&config, &mut StdRandom::from_seed(config.seed.unwrap_or(0)))?;
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::{MazeError, MazeResult};
use crate::material::MaterialTable;
use crate::tile::LayoutConfig;

/// Configuration for one maze level.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Cells across. Default: 10
    pub width: usize,
    /// Cells down. Default: 10
    pub height: usize,
    /// Edge length, in tiles, of each cell's open floor block. Must be odd.
    /// Default: 3 (grid scale factor 4)
    pub cell_size: usize,
    /// World size of one tile. Default: 1.0
    pub tile_size: f32,
    /// Tolerance for position/rotation tile lookups. Default: 0.01
    pub tile_slop: f32,
    /// Thickness of merged collider segments. Default: 1.0
    pub collider_thickness: f32,
    /// Height of wall bodies in the physics world. Default: 2.0
    pub wall_height: f32,
    /// Distance from the goal that counts as reaching it. Default: 1.0
    pub goal_radius: f32,
    /// Fixed seed, or `None` to seed from the OS.
    pub seed: Option<u64>,
    pub materials: MaterialTable,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_size: 3,
            tile_size: 1.0,
            tile_slop: 0.01,
            collider_thickness: 1.0,
            wall_height: 2.0,
            goal_radius: 1.0,
            seed: None,
            materials: MaterialTable::default(),
        }
    }
}

impl MazeConfig {
    /// Default config with the given dimensions.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> MazeResult<Self> {
        let config: MazeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> MazeResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: MazeConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check construction preconditions.
    pub fn validate(&self) -> MazeResult<()> {
        let bad_dimensions = MazeError::InvalidDimensions {
            width: self.width,
            height: self.height,
        };
        if self.width == 0 || self.height == 0 {
            return Err(bad_dimensions);
        }
        self.layout().validate()?;

        // Raw placement emits one ring square plus a marker per cell.
        let per_cell = (self.scale() + 1).pow(2) + 1;
        self.width
            .checked_mul(self.height)
            .and_then(|cells| cells.checked_mul(per_cell))
            .ok_or(bad_dimensions)?;

        for (name, value) in [
            ("tile_slop", self.tile_slop),
            ("collider_thickness", self.collider_thickness),
            ("wall_height", self.wall_height),
            ("goal_radius", self.goal_radius),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MazeError::InvalidParameter { name, value });
            }
        }

        self.materials.validate()
    }

    /// Grid scale factor: floor block plus one shared wall tile.
    pub fn scale(&self) -> usize {
        self.cell_size + 1
    }

    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig::from(self)
    }
}
