//! Blast Arena - A tile-grid bomb arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, bombs, blasts, players, round state)
//! - `settings`: Data-driven round configuration
//! - `error`: Error taxonomy shared by the simulation and setup

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{GridError, PlacementError, SettingsError, SetupError};
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena defaults
    pub const GRID_WIDTH: i32 = 15;
    pub const GRID_HEIGHT: i32 = 13;
    pub const TILE_SIZE: f32 = 48.0;
    /// Upper bound on width * height
    pub const MAX_GRID_CELLS: i32 = 1 << 20;

    /// Bomb fuse in seconds
    pub const FUSE_SECONDS: f32 = 3.0;
    /// Lifetime of a single blast cell in seconds
    pub const EXPLOSION_TTL: f32 = 0.5;

    /// Player defaults
    pub const BASE_MOVE_SPEED: f32 = 128.0; // pixels/s at speed multiplier 1.0
    pub const STARTING_BOMB_CAPACITY: u32 = 1;
    pub const STARTING_BLAST_RANGE: i32 = 1;
    pub const ATTACK_DURATION: f32 = 0.3;

    /// Lane alignment: snap when closer than this to the lane center
    pub const ALIGN_SNAP_DISTANCE: f32 = 5.0;
    /// Lane alignment: ease toward the center when closer than this
    pub const ALIGN_EASE_DISTANCE: f32 = 20.0;
    /// Lane alignment: pixels eased per movement update
    pub const ALIGN_EASE_STEP: f32 = 2.0;

    /// Power-up speed bonus (added to the speed multiplier)
    pub const SPEED_BOOST_STEP: f32 = 0.2;

    /// Layout generation
    pub const BRICK_DENSITY: f64 = 0.4;
    pub const MIN_PLAYERS: usize = 2;
    pub const MAX_PLAYERS: usize = 4;
}

/// Convert a pixel position to the grid cell containing it
#[inline]
pub fn pixel_to_cell(pos: Vec2, tile_size: f32) -> IVec2 {
    (pos / tile_size).floor().as_ivec2()
}

/// Pixel position of a cell's center
#[inline]
pub fn cell_center(cell: IVec2, tile_size: f32) -> Vec2 {
    cell.as_vec2() * tile_size + Vec2::splat(tile_size / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_cell_floors() {
        assert_eq!(pixel_to_cell(Vec2::new(72.0, 72.0), 48.0), IVec2::new(1, 1));
        assert_eq!(pixel_to_cell(Vec2::new(95.9, 48.0), 48.0), IVec2::new(1, 1));
        assert_eq!(pixel_to_cell(Vec2::new(96.0, 47.9), 48.0), IVec2::new(2, 0));
        // Negative pixels land in negative cells, never cell 0
        assert_eq!(pixel_to_cell(Vec2::new(-1.0, 0.0), 48.0), IVec2::new(-1, 0));
    }

    #[test]
    fn test_cell_center_round_trips() {
        let cell = IVec2::new(3, 7);
        let center = cell_center(cell, 48.0);
        assert_eq!(center, Vec2::new(168.0, 360.0));
        assert_eq!(pixel_to_cell(center, 48.0), cell);
    }
}
