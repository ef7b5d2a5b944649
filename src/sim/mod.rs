//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `tick`
//! - Seeded RNG only (arena layout)
//! - Stable iteration order (players by id, bombs by placement)
//! - No rendering or platform dependencies

pub mod blast;
pub mod bomb;
pub mod explosion;
pub mod grid;
pub mod player;
pub mod round;
pub mod snapshot;
pub mod tick;

pub use blast::{BLAST_DIRECTIONS, Blast, BlastCell, propagate};
pub use bomb::{Bomb, BombId, BombRegistry, Detonation, PlacementRequest};
pub use explosion::{Explosion, ExplosionRegistry};
pub use grid::{Cell, Grid};
pub use player::{
    AnimationState, Direction, MoveIntent, Player, PlayerController, PlayerId, PowerUpKind,
    align_toward,
};
pub use round::{Kill, RoundOutcome, RoundPhase, RoundResolver};
pub use snapshot::{BombView, ExplosionView, GridView, PlayerView, Snapshot};
pub use tick::{SimEvent, Simulation, TickInput};
