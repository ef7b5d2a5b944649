//! Error types for the arena simulation.
//!
//! Nothing here is fatal to a running round: grid queries clamp instead of
//! failing, and a rejected bomb placement just drops the intent.

use crate::sim::PlayerId;

/// Errors raised by grid queries and setup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A coordinate outside `[0, width) x [0, height)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Border cells are always Solid.
    #[error("border cell ({x}, {y}) cannot be changed")]
    BorderImmutable { x: i32, y: i32 },

    /// Grids need at least one interior cell.
    #[error("grid must be at least 3x3, got {width}x{height}")]
    TooSmall { width: i32, height: i32 },

    /// More cells than [`crate::consts::MAX_GRID_CELLS`].
    #[error("grid {width}x{height} has too many cells")]
    TooLarge { width: i32, height: i32 },
}

/// Reasons a bomb placement intent is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// The target cell holds terrain (or is off the grid).
    #[error("cell is occupied by a block")]
    CellOccupiedByBlock,

    /// Another live bomb already sits on the target cell.
    #[error("cell is occupied by a bomb")]
    CellOccupiedByBomb,

    /// The owner already has `bomb_capacity` bombs armed.
    #[error("bomb capacity exceeded")]
    CapacityExceeded,

    /// Dead players cannot place bombs.
    #[error("player {0} is dead")]
    PlayerDead(PlayerId),

    /// The round has already been decided.
    #[error("round is over")]
    RoundOver,

    /// No player with this id in the round.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

/// Errors loading or validating [`crate::Settings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Errors setting up a round.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Grid(#[from] GridError),

    /// A spawn cell that is not walkable after setup.
    #[error("spawn cell ({x}, {y}) is not walkable")]
    BlockedSpawn { x: i32, y: i32 },

    #[error("round needs between {min} and {max} players, got {got}")]
    PlayerCount { got: usize, min: usize, max: usize },
}
