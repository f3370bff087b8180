//! Merging placed tiles into line collider segments.
//!
//! Registering one physics body per tile swamps the broad phase. Straight
//! walls are made of long runs of identical tiles, so each run collapses to
//! a single segment:
//!
//! 1. Take the next pending tile as the seed.
//! 2. Walk along the seed's local -x axis, consuming pending tiles with the
//!    same material and rotation, then along +x.
//! 3. Emit one segment from half a tile before the leftmost centre to half a
//!    tile past the rightmost centre.
//!
//! Every tile is consumed exactly once, so the segments partition the tiles.
//! Non-solid runs (floor, markers) are merged the same way and handed to the
//! physics side as sensors.
//!
//! ## Usage
//!
//! ```ignore
//! let merger = ColliderMerger::from_config(&config);
//! let segments = merger.merge(maze.tiles());
//! merger.register(&segments, &mut physics_state);
//! ```

use bevy::log::info;
use bevy::math::Vec2;

use crate::config::MazeConfig;
use crate::material::{MaterialTable, TileMaterial};
use crate::tile::{Tile, TileIndex};

/// A merged line-shaped collision primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f32,
    pub material: TileMaterial,
    pub group: u32,
    pub solid: bool,
    /// Number of tiles this segment replaces.
    pub tile_count: usize,
}

impl ColliderSegment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    pub fn center(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Unit vector from `start` to `end`.
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Angle of `direction()` from world +x, in radians.
    pub fn angle(&self) -> f32 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    /// Whether `point` lies on the segment's centre line, within `eps`.
    pub fn covers(&self, point: Vec2, eps: f32) -> bool {
        let d = self.end - self.start;
        let len_sq = d.length_squared();
        if len_sq <= f32::EPSILON {
            return self.start.distance(point) <= eps;
        }
        let t = (point - self.start).dot(d) / len_sq;
        if !(0.0..=1.0).contains(&t) {
            return false;
        }
        (self.start + d * t).distance(point) <= eps
    }
}

/// Receiver for merged segments: the physics collaborator.
pub trait StaticBodySink {
    /// Register a colliding static body for a solid segment.
    fn add_static_body(&mut self, segment: &ColliderSegment);

    /// Register a non-colliding body for a non-solid segment. Ignored by
    /// default.
    fn add_sensor_body(&mut self, _segment: &ColliderSegment) {}
}

/// Collapses runs of collinear same-material tiles into segments.
#[derive(Debug, Clone)]
pub struct ColliderMerger {
    materials: MaterialTable,
    tile_size: f32,
    thickness: f32,
}

impl ColliderMerger {
    pub fn new(materials: MaterialTable, tile_size: f32, thickness: f32) -> Self {
        Self {
            materials,
            tile_size,
            thickness,
        }
    }

    pub fn from_config(config: &MazeConfig) -> Self {
        Self::new(
            config.materials.clone(),
            config.tile_size,
            config.collider_thickness,
        )
    }

    /// Merge `tiles` into segments. Expects deduplicated positions.
    ///
    /// Seeds are taken in input order, so the output is deterministic for a
    /// given tile list.
    pub fn merge(&self, tiles: &[Tile]) -> Vec<ColliderSegment> {
        let index = TileIndex::new(tiles, self.tile_size);
        let mut pending = vec![true; tiles.len()];
        let mut segments = Vec::new();

        for seed_idx in 0..tiles.len() {
            if !pending[seed_idx] {
                continue;
            }
            pending[seed_idx] = false;

            let seed = &tiles[seed_idx];
            let right = seed.right();
            let left = -right;

            let (leftmost, left_count) = self.walk(tiles, &index, &mut pending, seed_idx, left);
            let (rightmost, right_count) = self.walk(tiles, &index, &mut pending, seed_idx, right);

            let half = 0.5 * self.tile_size;
            let props = self.materials.properties(seed.material);
            segments.push(ColliderSegment {
                start: tiles[leftmost].position + left * half,
                end: tiles[rightmost].position + right * half,
                thickness: self.thickness,
                material: seed.material,
                group: props.group,
                solid: props.solid,
                tile_count: 1 + left_count + right_count,
            });
        }

        let solid = segments.iter().filter(|s| s.solid).count();
        info!(
            "Merged {} tiles into {} segments ({} solid)",
            tiles.len(),
            segments.len(),
            solid
        );

        segments
    }

    /// Follow `dir` from the seed while the next tile is pending and matches
    /// the seed's material and rotation. Returns the last matching index and
    /// how many tiles were consumed.
    fn walk(
        &self,
        tiles: &[Tile],
        index: &TileIndex,
        pending: &mut [bool],
        seed_idx: usize,
        dir: Vec2,
    ) -> (usize, usize) {
        let seed = &tiles[seed_idx];
        let mut current = seed_idx;
        let mut consumed = 0;

        while let Some(next) = index.get(tiles[current].position + dir * self.tile_size) {
            let candidate = &tiles[next];
            let matches = pending[next]
                && candidate.material == seed.material
                && candidate.quarter_turns() == seed.quarter_turns();
            if !matches {
                break;
            }
            pending[next] = false;
            consumed += 1;
            current = next;
        }

        (current, consumed)
    }

    /// Hand segments to the physics collaborator. Solid segments become
    /// static bodies, the rest sensors. Returns the number of static bodies.
    pub fn register(&self, segments: &[ColliderSegment], sink: &mut dyn StaticBodySink) -> usize {
        let mut statics = 0;
        for segment in segments {
            if segment.solid {
                sink.add_static_body(segment);
                statics += 1;
            } else {
                sink.add_sensor_body(segment);
            }
        }
        statics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::grid::CellGrid;
    use crate::rng::StdRandom;
    use crate::solver::solve;
    use crate::tile::{LayoutConfig, TileLayoutBuilder};
    use std::f32::consts::FRAC_PI_2;

    fn merger() -> ColliderMerger {
        ColliderMerger::new(MaterialTable::default(), 1.0, 1.0)
    }

    fn wall(x: f32, y: f32, rotation: f32) -> Tile {
        Tile::new(Vec2::new(x, y), rotation, TileMaterial::Wall)
    }

    #[derive(Default)]
    struct RecordingSink {
        statics: Vec<ColliderSegment>,
        sensors: Vec<ColliderSegment>,
    }

    impl StaticBodySink for RecordingSink {
        fn add_static_body(&mut self, segment: &ColliderSegment) {
            self.statics.push(*segment);
        }

        fn add_sensor_body(&mut self, segment: &ColliderSegment) {
            self.sensors.push(*segment);
        }
    }

    #[test]
    fn test_five_collinear_walls_merge_into_one() {
        // Seed in the middle so both walk directions are exercised.
        let mut tiles: Vec<Tile> = [2.0, 0.0, 1.0, 3.0, 4.0]
            .iter()
            .map(|&x| wall(x, 0.0, 0.0))
            .collect();
        // Adjacent tile of a different material continues the line.
        tiles.push(Tile::new(Vec2::new(5.0, 0.0), 0.0, TileMaterial::Floor));

        let segments = merger().merge(&tiles);
        assert_eq!(segments.len(), 2);

        let run = &segments[0];
        assert!(run.solid);
        assert_eq!(run.tile_count, 5);
        assert_eq!(run.start, Vec2::new(-0.5, 0.0));
        assert_eq!(run.end, Vec2::new(4.5, 0.0));
        assert!((run.length() - 5.0).abs() < 1e-6);

        let floor = &segments[1];
        assert!(!floor.solid);
        assert_eq!(floor.material, TileMaterial::Floor);
        assert_eq!(floor.tile_count, 1);
        assert!(!run.covers(Vec2::new(5.0, 0.0), 1e-4));
    }

    #[test]
    fn test_rotation_mismatch_stops_walk() {
        let tiles = vec![
            wall(0.0, 0.0, 0.0),
            wall(1.0, 0.0, 0.0),
            wall(2.0, 0.0, FRAC_PI_2),
        ];
        let segments = merger().merge(&tiles);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].tile_count, 2);
        assert_eq!(segments[1].tile_count, 1);
    }

    #[test]
    fn test_rotated_run_extends_along_local_axis() {
        let tiles: Vec<Tile> = (0..3).map(|y| wall(4.0, y as f32, FRAC_PI_2)).collect();
        let segments = merger().merge(&tiles);
        assert_eq!(segments.len(), 1);

        let s = segments[0];
        assert!((s.start - Vec2::new(4.0, -0.5)).length() < 1e-5);
        assert!((s.end - Vec2::new(4.0, 2.5)).length() < 1e-5);
        assert!((s.angle() - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_gap_splits_run() {
        let tiles = vec![wall(0.0, 0.0, 0.0), wall(1.0, 0.0, 0.0), wall(3.0, 0.0, 0.0)];
        let segments = merger().merge(&tiles);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_maze_coverage_exactly_once() {
        for seed in 0..5 {
            let mut grid = CellGrid::new(6, 5);
            generate(&mut grid, &mut StdRandom::from_seed(seed));
            solve(&mut grid).unwrap();
            let layout = TileLayoutBuilder::new(LayoutConfig::default()).build_tiles(&grid);

            let segments = merger().merge(&layout.tiles);

            // Partition: every tile consumed once.
            let covered: usize = segments.iter().map(|s| s.tile_count).sum();
            assert_eq!(covered, layout.tiles.len());

            // Each solid tile centre lies on exactly one solid segment.
            let solid: Vec<&ColliderSegment> = segments.iter().filter(|s| s.solid).collect();
            for tile in layout.tiles.iter().filter(|t| t.material == TileMaterial::Wall) {
                let hits = solid.iter().filter(|s| s.covers(tile.position, 1e-3)).count();
                assert_eq!(hits, 1, "wall tile at {:?} covered {} times", tile.position, hits);
            }

            // Footprint length matches tile count.
            for s in &segments {
                assert!((s.length() - s.tile_count as f32).abs() < 1e-3);
            }

            // Far fewer bodies than wall tiles.
            let walls = layout.tiles.iter().filter(|t| t.material == TileMaterial::Wall).count();
            assert!(solid.len() < walls);
        }
    }

    #[test]
    fn test_register_routes_by_solidity() {
        let tiles = vec![
            wall(0.0, 0.0, 0.0),
            wall(1.0, 0.0, 0.0),
            Tile::new(Vec2::new(0.0, 2.0), 0.0, TileMaterial::Floor),
            Tile::new(Vec2::new(0.0, 4.0), 0.0, TileMaterial::GoalMarker),
        ];
        let m = merger();
        let segments = m.merge(&tiles);
        let mut sink = RecordingSink::default();

        let statics = m.register(&segments, &mut sink);
        assert_eq!(statics, 1);
        assert_eq!(sink.statics.len(), 1);
        assert_eq!(sink.sensors.len(), 2);
        assert_eq!(sink.statics[0].group, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(merger().merge(&[]).is_empty());
    }
}
