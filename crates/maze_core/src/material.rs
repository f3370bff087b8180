//! Tile material vocabulary and the material → solidity table.
//!
//! The vocabulary is fixed; what each material means to physics lives in a
//! `MaterialTable` carried by `MazeConfig` and handed to the layout and
//! merge stages explicitly.

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, MazeResult};

/// Highest collision group index; groups map onto bits of a `u32` mask.
pub const MAX_GROUP: u32 = 31;

/// Material tag of a placed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileMaterial {
    Wall,
    Floor,
    /// Arrow along the solution path.
    DirectionalMarker,
    /// Marks the exit cell.
    GoalMarker,
}

impl TileMaterial {
    pub const ALL: [TileMaterial; 4] = [
        TileMaterial::Wall,
        TileMaterial::Floor,
        TileMaterial::DirectionalMarker,
        TileMaterial::GoalMarker,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TileMaterial::Wall => "wall",
            TileMaterial::Floor => "floor",
            TileMaterial::DirectionalMarker => "directional_marker",
            TileMaterial::GoalMarker => "goal_marker",
        }
    }

    pub fn is_marker(self) -> bool {
        matches!(
            self,
            TileMaterial::DirectionalMarker | TileMaterial::GoalMarker
        )
    }
}

/// Physical properties of one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Solid materials become colliding static bodies.
    pub solid: bool,
    /// Collision group index (`0..=MAX_GROUP`) for physics filtering.
    pub group: u32,
}

/// Lookup from material to its physical properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialTable {
    pub wall: MaterialProperties,
    pub floor: MaterialProperties,
    pub directional_marker: MaterialProperties,
    pub goal_marker: MaterialProperties,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self {
            wall: MaterialProperties {
                solid: true,
                group: 1,
            },
            floor: MaterialProperties {
                solid: false,
                group: 2,
            },
            directional_marker: MaterialProperties {
                solid: false,
                group: 3,
            },
            goal_marker: MaterialProperties {
                solid: false,
                group: 3,
            },
        }
    }
}

impl MaterialTable {
    pub fn properties(&self, material: TileMaterial) -> MaterialProperties {
        match material {
            TileMaterial::Wall => self.wall,
            TileMaterial::Floor => self.floor,
            TileMaterial::DirectionalMarker => self.directional_marker,
            TileMaterial::GoalMarker => self.goal_marker,
        }
    }

    pub fn is_solid(&self, material: TileMaterial) -> bool {
        self.properties(material).solid
    }

    pub fn group(&self, material: TileMaterial) -> u32 {
        self.properties(material).group
    }

    /// Reject groups that don't fit in a group mask.
    pub fn validate(&self) -> MazeResult<()> {
        for material in TileMaterial::ALL {
            let group = self.group(material);
            if group > MAX_GROUP {
                return Err(MazeError::InvalidGroup { material, group });
            }
        }
        Ok(())
    }
}
