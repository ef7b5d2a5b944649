//! Round settings
//!
//! Every design constant a round needs, loadable from JSON. Missing fields
//! fall back to the values in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Round configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Arena width in cells
    pub grid_width: i32,
    /// Arena height in cells
    pub grid_height: i32,
    /// Pixels per cell
    pub tile_size: f32,
    /// Chance that a free interior cell starts as Brick (0.0 - 1.0)
    pub brick_density: f64,
    /// Layout RNG seed
    pub seed: u64,

    // === Bombs ===
    /// Fuse length in seconds
    pub fuse_seconds: f32,
    /// Blast cell lifetime in seconds
    pub explosion_ttl: f32,

    // === Players ===
    /// Players spawned at the arena corners (2 - 4)
    pub player_count: usize,
    /// Pixels per second at speed multiplier 1.0
    pub base_move_speed: f32,
    pub starting_bomb_capacity: u32,
    pub starting_blast_range: i32,
    /// Seconds the attack animation holds
    pub attack_duration: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            tile_size: TILE_SIZE,
            brick_density: BRICK_DENSITY,
            seed: 42,

            fuse_seconds: FUSE_SECONDS,
            explosion_ttl: EXPLOSION_TTL,

            player_count: 2,
            base_move_speed: BASE_MOVE_SPEED,
            starting_bomb_capacity: STARTING_BOMB_CAPACITY,
            starting_blast_range: STARTING_BLAST_RANGE,
            attack_duration: ATTACK_DURATION,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the layout seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of players
    pub fn with_players(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    /// Set the arena size in cells
    pub fn with_grid_size(mut self, width: i32, height: i32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    /// Set the brick density (clamped to 0.0 - 1.0)
    pub fn with_brick_density(mut self, density: f64) -> Self {
        self.brick_density = density.clamp(0.0, 1.0);
        self
    }

    /// Check that the settings describe a playable round
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(SettingsError::Invalid(format!(
                "grid must be at least 3x3, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if i64::from(self.grid_width) * i64::from(self.grid_height) > i64::from(MAX_GRID_CELLS) {
            return Err(SettingsError::Invalid(format!(
                "grid {}x{} exceeds {MAX_GRID_CELLS} cells",
                self.grid_width, self.grid_height
            )));
        }
        if !(self.tile_size > 0.0) {
            return Err(SettingsError::Invalid("tile_size must be positive".into()));
        }
        if !(self.fuse_seconds > 0.0) || !(self.explosion_ttl > 0.0) {
            return Err(SettingsError::Invalid(
                "fuse_seconds and explosion_ttl must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.brick_density) {
            return Err(SettingsError::Invalid(format!(
                "brick_density must be within 0..=1, got {}",
                self.brick_density
            )));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(SettingsError::Invalid(format!(
                "player_count must be {MIN_PLAYERS}..={MAX_PLAYERS}, got {}",
                self.player_count
            )));
        }
        if self.starting_blast_range < 0 || self.base_move_speed < 0.0 {
            return Err(SettingsError::Invalid(
                "blast range and move speed must not be negative".into(),
            ));
        }
        Ok(())
    }
}
