//! Error types for maze construction and configuration loading.

use crate::material::TileMaterial;

/// Errors that can occur while building a maze level.
#[derive(Debug)]
pub enum MazeError {
    /// Width or height is zero.
    InvalidDimensions { width: usize, height: usize },
    /// Cell size must be odd so the floor block has a centre tile.
    EvenCellSize(usize),
    /// Cell size is above the supported maximum.
    CellSizeTooLarge { size: usize, max: usize },
    /// Tile size must be a positive, finite number.
    InvalidTileSize(f32),
    /// A size or distance parameter is negative or not finite.
    InvalidParameter { name: &'static str, value: f32 },
    /// Collision group does not fit in a 32-bit group mask.
    InvalidGroup { material: TileMaterial, group: u32 },
    /// The solver could not reach the exit. The generator guarantees a
    /// spanning tree, so this means an internal invariant was broken.
    Unsolvable { width: usize, height: usize },
    /// File system error while loading configuration
    Io(std::io::Error),
    /// JSON deserialization error
    Json(String),
}

impl std::fmt::Display for MazeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MazeError::InvalidDimensions { width, height } => {
                write!(f, "Invalid maze dimensions: {}x{}", width, height)
            }
            MazeError::EvenCellSize(size) => {
                write!(f, "Cell size must be odd and non-zero, got {}", size)
            }
            MazeError::CellSizeTooLarge { size, max } => {
                write!(f, "Cell size {} exceeds maximum {}", size, max)
            }
            MazeError::InvalidTileSize(size) => {
                write!(f, "Tile size must be positive, got {}", size)
            }
            MazeError::InvalidParameter { name, value } => {
                write!(f, "{} must be finite and non-negative, got {}", name, value)
            }
            MazeError::InvalidGroup { material, group } => write!(
                f,
                "Collision group {} for {} is out of range",
                group,
                material.name()
            ),
            MazeError::Unsolvable { width, height } => write!(
                f,
                "No path from entry to exit in {}x{} maze (generator invariant violated)",
                width, height
            ),
            MazeError::Io(e) => write!(f, "IO error: {}", e),
            MazeError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for MazeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MazeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MazeError {
    fn from(e: std::io::Error) -> Self {
        MazeError::Io(e)
    }
}

impl From<serde_json::Error> for MazeError {
    fn from(e: serde_json::Error) -> Self {
        MazeError::Json(e.to_string())
    }
}

/// Result type for maze operations.
pub type MazeResult<T> = Result<T, MazeError>;
