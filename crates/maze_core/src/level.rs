//! Bevy integration: build a maze level at startup.
//!
//! `MazeLevelPlugin` reads the `MazeConfig` resource (inserting the default
//! if the app didn't provide one), runs the whole pipeline once and stores
//! the result in the `MazeLevel` resource. Systems that consume the level
//! (physics registration, visuals) order themselves after `MazeLoadSet`.

use bevy::prelude::*;

use crate::collider::{ColliderMerger, ColliderSegment};
use crate::config::MazeConfig;
use crate::error::MazeResult;
use crate::maze::Maze;
use crate::rng::StdRandom;

/// Set containing the level load system.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MazeLoadSet;

/// The currently loaded level.
#[derive(Resource, Debug, Clone)]
pub struct MazeLevel {
    pub maze: Maze,
    /// Merged colliders, solid and sensor, in merge order.
    pub colliders: Vec<ColliderSegment>,
    /// Seed the level was generated from.
    pub seed: u64,
}

impl MazeLevel {
    /// Run the full pipeline from `seed`.
    pub fn build(config: &MazeConfig, seed: u64) -> MazeResult<Self> {
        let mut rng = StdRandom::from_seed(seed);
        let maze = Maze::new(config, &mut rng)?;
        let colliders = ColliderMerger::from_config(config).merge(maze.tiles());
        Ok(Self {
            maze,
            colliders,
            seed,
        })
    }

    /// Throw the level away and build a fresh one from a new seed.
    ///
    /// On error the current level is left untouched.
    pub fn regenerate(&mut self, config: &MazeConfig, seed: u64) -> MazeResult<()> {
        *self = Self::build(config, seed)?;
        Ok(())
    }

    pub fn solid_colliders(&self) -> impl Iterator<Item = &ColliderSegment> {
        self.colliders.iter().filter(|c| c.solid)
    }
}

pub struct MazeLevelPlugin;

impl Plugin for MazeLevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MazeConfig>()
            .add_systems(Startup, load_maze_level.in_set(MazeLoadSet));
    }
}

/// Build the level from the `MazeConfig` resource and insert `MazeLevel`.
pub fn load_maze_level(world: &mut World) {
    let config = world
        .get_resource::<MazeConfig>()
        .cloned()
        .unwrap_or_default();
    let seed = config
        .seed
        .unwrap_or_else(|| StdRandom::from_entropy().seed());

    info!(
        "Loading {}x{} maze level (seed {})",
        config.width, config.height, seed
    );

    match MazeLevel::build(&config, seed) {
        Ok(level) => {
            info!(
                "Maze level ready: {} tiles, {} colliders ({} solid)",
                level.maze.tiles().len(),
                level.colliders.len(),
                level.solid_colliders().count()
            );
            world.insert_resource(level);
        }
        Err(e) => error!("Failed to build maze level: {}", e),
    }
}
