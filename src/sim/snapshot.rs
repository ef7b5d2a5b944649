//! Read-only view of a tick for the renderer
//!
//! Everything a draw layer needs, nothing it could mutate.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::player::{AnimationState, Direction, PlayerId};
use super::round::{RoundOutcome, RoundPhase};
use super::tick::Simulation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridView {
    pub width: i32,
    pub height: i32,
    pub tile_size: f32,
    /// Row-major
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BombView {
    pub cell: IVec2,
    pub owner: PlayerId,
    pub fuse: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub cell: IVec2,
    pub owner: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub position: Vec2,
    pub cell: IVec2,
    pub alive: bool,
    pub facing: Direction,
    pub animation: AnimationState,
    pub score: u32,
    pub active_bombs: usize,
    /// Bombs the player may still place
    pub bombs_available: u32,
}

/// State of the round after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub grid: GridView,
    pub bombs: Vec<BombView>,
    pub explosions: Vec<ExplosionView>,
    pub players: Vec<PlayerView>,
    pub phase: RoundPhase,
    pub outcome: RoundOutcome,
}

impl Snapshot {
    pub fn capture(sim: &Simulation) -> Self {
        let grid = sim.grid();
        let tile_size = grid.tile_size();
        let resolver = sim.resolver();

        Self {
            tick: sim.time_ticks(),
            grid: GridView {
                width: grid.width(),
                height: grid.height(),
                tile_size,
                cells: grid.cells().to_vec(),
            },
            bombs: sim
                .bombs()
                .iter()
                .map(|b| BombView {
                    cell: b.cell,
                    owner: b.owner,
                    fuse: b.fuse,
                })
                .collect(),
            explosions: sim
                .explosions()
                .iter()
                .map(|e| ExplosionView {
                    cell: e.cell,
                    owner: e.owner,
                })
                .collect(),
            players: sim
                .players()
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    position: p.position,
                    cell: p.cell(tile_size),
                    alive: p.alive,
                    facing: p.facing,
                    animation: p.animation,
                    score: resolver.score(p.id),
                    active_bombs: p.active_bombs.len(),
                    bombs_available: p.bombs_available(),
                })
                .collect(),
            phase: resolver.phase(),
            outcome: resolver.outcome(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
