use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_WIDTH: u32 = 8;
pub const DEFAULT_GRID_HEIGHT: u32 = 8;
/// World units covered by one cell along each axis.
pub const DEFAULT_CELL_SIZE: f32 = 1000.0;
pub const DEFAULT_LAYOUT_SEED: u32 = 0;

/// Length of a connection debug segment, as a fraction of the cell size.
pub const DEBUG_CONNECTION_FRACTION: f32 = 0.4;
/// Length of a blocked-side debug segment, as a fraction of the cell size.
pub const DEBUG_BLOCKED_FRACTION: f32 = 0.2;
/// Height of the debug text anchor above the cell, as a fraction of the cell size.
pub const DEBUG_TEXT_HEIGHT_FRACTION: f32 = 0.2;

/// Fixed parameters of a layout grid. Read once when `LayoutGrid` is built;
/// changing it afterwards does not resize an existing grid.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: u32,
    pub height: u32,
    pub cell_size: f32,
    /// World position of grid cell (0, 0).
    pub origin: Vec3,
    /// Mixed into every cell's unique seed. Two grids with the same seed and
    /// catalog generate identical content.
    pub seed: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            origin: Vec3::ZERO,
            seed: DEFAULT_LAYOUT_SEED,
        }
    }
}

impl LayoutConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"width": 3, "seed": 7}"#).unwrap();
        assert_eq!(config.width, 3);
        assert_eq!(config.height, DEFAULT_GRID_HEIGHT);
        assert_eq!(config.seed, 7);
        assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
    }
}
