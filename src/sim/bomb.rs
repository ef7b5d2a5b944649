//! Armed bombs and their fuses
//!
//! The registry is the only owner of live bombs. A bomb detonates exactly
//! once, on the tick its fuse runs out, and is removed in that same tick.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::blast::{Blast, propagate};
use super::grid::{Cell, Grid};
use super::player::PlayerId;
use crate::error::PlacementError;

/// Handle to a placed bomb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BombId(pub u32);

/// An armed bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: BombId,
    pub cell: IVec2,
    pub owner: PlayerId,
    pub range: i32,
    /// Seconds until detonation
    pub fuse: f32,
    pub exploded: bool,
}

/// Everything needed to arm a bomb
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest {
    pub cell: IVec2,
    pub owner: PlayerId,
    pub range: i32,
    pub fuse: f32,
    /// How many bombs the owner may have armed at once
    pub capacity: u32,
}

/// A bomb that went off this tick
#[derive(Debug, Clone)]
pub struct Detonation {
    pub bomb: Bomb,
    pub blast: Blast,
}

/// All armed bombs in the round (sorted by id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombRegistry {
    bombs: Vec<Bomb>,
    next_id: u32,
}

impl Default for BombRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BombRegistry {
    pub fn new() -> Self {
        Self {
            bombs: Vec::new(),
            next_id: 1,
        }
    }

    /// Arm a bomb if the cell is free and the owner has capacity left
    pub fn place(&mut self, grid: &Grid, request: PlacementRequest) -> Result<BombId, PlacementError> {
        if grid.get(request.cell) != Some(Cell::Empty) {
            return Err(PlacementError::CellOccupiedByBlock);
        }
        if self.bomb_at(request.cell).is_some() {
            return Err(PlacementError::CellOccupiedByBomb);
        }
        if self.active_count(request.owner) >= request.capacity as usize {
            return Err(PlacementError::CapacityExceeded);
        }

        let id = BombId(self.next_id);
        self.next_id += 1;
        self.bombs.push(Bomb {
            id,
            cell: request.cell,
            owner: request.owner,
            range: request.range,
            fuse: request.fuse,
            exploded: false,
        });

        log::debug!(
            "Player {} armed bomb {:?} at {} (range {}, fuse {:.2}s)",
            request.owner,
            id,
            request.cell,
            request.range,
            request.fuse
        );
        Ok(id)
    }

    /// Burn every fuse by `dt`; detonate and remove the bombs that run out
    pub fn tick(&mut self, dt: f32, grid: &mut Grid) -> Vec<Detonation> {
        let mut detonations = Vec::new();

        for bomb in &mut self.bombs {
            if bomb.exploded {
                continue;
            }
            bomb.fuse -= dt;
            if bomb.fuse <= 0.0 {
                bomb.exploded = true;
                let blast = propagate(grid, bomb.cell, bomb.range, bomb.owner);
                log::debug!(
                    "Bomb {:?} detonated at {} ({} blast cells)",
                    bomb.id,
                    bomb.cell,
                    blast.cells.len()
                );
                detonations.push(Detonation {
                    bomb: bomb.clone(),
                    blast,
                });
            }
        }

        self.bombs.retain(|b| !b.exploded);
        detonations
    }

    /// Live bomb on a cell, if any
    pub fn bomb_at(&self, cell: IVec2) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.cell == cell && !b.exploded)
    }

    /// Live bombs armed by `owner`
    pub fn active_count(&self, owner: PlayerId) -> usize {
        self.bombs
            .iter()
            .filter(|b| b.owner == owner && !b.exploded)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.iter()
    }

    pub fn len(&self) -> usize {
        self.bombs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty()
    }
}
