use bevy::prelude::*;
use maze_core::{MazeConfig, MazeLevel, MazeLevelPlugin, MazeLoadSet, TileMaterial};
use maze_physics::PhysicsPlugin;

fn main() {
    let config = config_from_args();

    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(config)
        .add_plugins(MazeLevelPlugin)
        .add_plugins(PhysicsPlugin)
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
        .add_systems(Startup, (setup, spawn_tile_visuals.after(MazeLoadSet)))
        .run();
}

/// Parse command-line arguments into a config.
///
/// Supported args:
/// - `--config <path>` - Load a JSON config
/// - `--seed <N>` - Override the seed
fn config_from_args() -> MazeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = MazeConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if let Some(path) = args.get(i + 1) {
                    match MazeConfig::load(path) {
                        Ok(loaded) => config = loaded,
                        Err(e) => eprintln!("Warning: failed to load {}: {}", path, e),
                    }
                } else {
                    eprintln!("Warning: --config requires a path argument");
                }
                i += 2;
            }
            "--seed" => {
                match args.get(i + 1).map(|s| s.parse::<u64>()) {
                    Some(Ok(seed)) => config.seed = Some(seed),
                    _ => eprintln!("Warning: --seed requires a number"),
                }
                i += 2;
            }
            other => {
                eprintln!("Warning: unknown argument {}", other);
                i += 1;
            }
        }
    }

    config
}

fn setup(mut commands: Commands, config: Res<MazeConfig>) {
    // Cell centres sit at multiples of the scaled cell size from the origin.
    let step = config.scale() as f32 * config.tile_size;
    let target = Vec3::new(
        config.width.saturating_sub(1) as f32 * step * 0.5,
        0.0,
        config.height.saturating_sub(1) as f32 * step * 0.5,
    );
    let distance = target.x.max(target.z) * 2.5;
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(target + Vec3::new(0.0, distance, distance * 0.3))
            .looking_at(target, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
}

fn tile_color(material: TileMaterial) -> Color {
    match material {
        TileMaterial::Wall => Color::srgb(0.35, 0.35, 0.4),
        TileMaterial::Floor => Color::srgb(0.15, 0.2, 0.15),
        TileMaterial::DirectionalMarker => Color::srgb(0.8, 0.6, 0.2),
        TileMaterial::GoalMarker => Color::srgb(0.9, 0.2, 0.2),
    }
}

/// One cuboid per tile. Maze y maps onto world z.
fn spawn_tile_visuals(
    mut commands: Commands,
    level: Option<Res<MazeLevel>>,
    config: Res<MazeConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(level) = level else {
        warn!("No maze level loaded; nothing to draw");
        return;
    };

    let size = config.tile_size;
    let wall_mesh = meshes.add(Cuboid::new(size, config.wall_height, size));
    let floor_mesh = meshes.add(Cuboid::new(size, 0.1, size));
    let palette: Vec<(TileMaterial, Handle<StandardMaterial>)> = TileMaterial::ALL
        .iter()
        .map(|&m| (m, materials.add(tile_color(m))))
        .collect();

    for tile in level.maze.tiles() {
        let Some((_, material)) = palette.iter().find(|(m, _)| *m == tile.material) else {
            continue;
        };
        let (mesh, height) = if config.materials.is_solid(tile.material) {
            (wall_mesh.clone(), config.wall_height * 0.5)
        } else {
            (floor_mesh.clone(), 0.05)
        };
        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(tile.position.x, height, tile.position.y)
                .with_rotation(Quat::from_rotation_y(-tile.rotation)),
        ));
    }

    debug!("Spawned {} tile visuals", level.maze.tiles().len());
}
