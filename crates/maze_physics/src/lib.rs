//! Rapier physics world for maze levels.
//!
//! Merged collider segments live in the maze plane. The physics world is
//! Y-up, so maze x maps to physics x and maze y maps to physics z. Each
//! segment becomes one fixed body carrying a box `wall_height` tall.

use bevy::prelude::*;
use maze_core::{ColliderMerger, ColliderSegment, MazeConfig, MazeLevel, StaticBodySink};
use rapier3d::prelude as rapier;
use rapier::nalgebra::Vector3;

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PhysicsState::new())
            .init_resource::<MazeConfig>()
            .init_resource::<MazeBodies>()
            .add_systems(
                Update,
                (
                    register_maze_colliders.run_if(resource_exists_and_changed::<MazeLevel>),
                    step_physics,
                )
                    .chain(),
            );
    }
}

#[derive(Resource)]
pub struct PhysicsState {
    pub gravity: Vector3<f32>,
    pub integration_parameters: rapier::IntegrationParameters,
    pub physics_pipeline: rapier::PhysicsPipeline,
    pub island_manager: rapier::IslandManager,
    pub broad_phase: rapier::DefaultBroadPhase,
    pub narrow_phase: rapier::NarrowPhase,
    pub rigid_body_set: rapier::RigidBodySet,
    pub collider_set: rapier::ColliderSet,
    pub impulse_joint_set: rapier::ImpulseJointSet,
    pub multibody_joint_set: rapier::MultibodyJointSet,
    pub ccd_solver: rapier::CCDSolver,
    /// Height of bodies created through `StaticBodySink`.
    pub wall_height: f32,
    /// Bodies added through `StaticBodySink` since the last `take_new_bodies`.
    new_bodies: Vec<rapier::RigidBodyHandle>,
}

impl PhysicsState {
    pub fn new() -> Self {
        Self {
            gravity: Vector3::new(0.0, -9.81, 0.0),
            integration_parameters: rapier::IntegrationParameters::default(),
            physics_pipeline: rapier::PhysicsPipeline::new(),
            island_manager: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            rigid_body_set: rapier::RigidBodySet::new(),
            collider_set: rapier::ColliderSet::new(),
            impulse_joint_set: rapier::ImpulseJointSet::new(),
            multibody_joint_set: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            wall_height: MazeConfig::default().wall_height,
            new_bodies: Vec::new(),
        }
    }

    /// Insert a fixed body for `segment` with a cuboid collider.
    pub fn insert_segment(
        &mut self,
        segment: &ColliderSegment,
        sensor: bool,
    ) -> rapier::RigidBodyHandle {
        let (translation, yaw) = segment_pose(segment, self.wall_height);
        let body = rapier::RigidBodyBuilder::fixed()
            .translation(translation)
            .rotation(Vector3::new(0.0, yaw, 0.0));
        let handle = self.rigid_body_set.insert(body);

        let collider = rapier::ColliderBuilder::cuboid(
            segment.length() * 0.5,
            self.wall_height * 0.5,
            segment.thickness * 0.5,
        )
        .sensor(sensor)
        .collision_groups(segment_groups(segment));
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        handle
    }

    /// Drain the handles recorded by `StaticBodySink` calls.
    pub fn take_new_bodies(&mut self) -> Vec<rapier::RigidBodyHandle> {
        std::mem::take(&mut self.new_bodies)
    }

    /// Remove `handles` and their colliders. Returns how many were present.
    pub fn remove_bodies(&mut self, handles: &[rapier::RigidBodyHandle]) -> usize {
        let mut removed = 0;
        for &handle in handles {
            let body = self.rigid_body_set.remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
            if body.is_some() {
                removed += 1;
            }
        }
        removed
    }
}

impl Default for PhysicsState {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticBodySink for PhysicsState {
    fn add_static_body(&mut self, segment: &ColliderSegment) {
        let handle = self.insert_segment(segment, false);
        self.new_bodies.push(handle);
    }

    fn add_sensor_body(&mut self, segment: &ColliderSegment) {
        let handle = self.insert_segment(segment, true);
        self.new_bodies.push(handle);
    }
}

/// Bodies owned by the current maze level.
#[derive(Resource, Debug, Default)]
pub struct MazeBodies {
    pub handles: Vec<rapier::RigidBodyHandle>,
}

/// Physics-space centre and yaw of a maze-plane segment.
///
/// Yaw turns the body's local +x onto the segment direction mapped into XZ.
pub fn segment_pose(segment: &ColliderSegment, wall_height: f32) -> (Vector3<f32>, f32) {
    let center = segment.center();
    let d = segment.end - segment.start;
    let yaw = (-d.y).atan2(d.x);
    (Vector3::new(center.x, wall_height * 0.5, center.y), yaw)
}

/// Membership is the segment's material group; filter accepts everything.
///
/// Groups past the mask width (rejected by `MaterialTable::validate`) get no
/// membership rather than aliasing another group's bit.
fn segment_groups(segment: &ColliderSegment) -> rapier::InteractionGroups {
    let memberships = 1u32
        .checked_shl(segment.group)
        .map_or(rapier::Group::NONE, rapier::Group::from_bits_truncate);
    rapier::InteractionGroups::new(memberships, rapier::Group::ALL)
}

/// Replace the previous level's bodies with the current `MazeLevel` colliders.
fn register_maze_colliders(
    level: Res<MazeLevel>,
    config: Res<MazeConfig>,
    mut physics: ResMut<PhysicsState>,
    mut bodies: ResMut<MazeBodies>,
) {
    let p = physics.as_mut();

    if !bodies.handles.is_empty() {
        let removed = p.remove_bodies(&bodies.handles);
        debug!("Removed {} bodies from previous maze level", removed);
        bodies.handles.clear();
    }

    p.wall_height = config.wall_height;
    let statics = ColliderMerger::from_config(&config).register(&level.colliders, &mut *p);
    bodies.handles = p.take_new_bodies();

    info!(
        "Registered maze level {}: {} static bodies, {} sensors",
        level.seed,
        statics,
        bodies.handles.len() - statics
    );
}

fn step_physics(mut physics: ResMut<PhysicsState>) {
    let p = physics.as_mut();
    p.physics_pipeline.step(
        &p.gravity,
        &p.integration_parameters,
        &mut p.island_manager,
        &mut p.broad_phase,
        &mut p.narrow_phase,
        &mut p.rigid_body_set,
        &mut p.collider_set,
        &mut p.impulse_joint_set,
        &mut p.multibody_joint_set,
        &mut p.ccd_solver,
        None,
        &(),
        &(),
    );
}
