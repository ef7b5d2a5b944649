//! Live blast cells
//!
//! Overlapping blasts are not merged; each cell ages out on its own.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::blast::BlastCell;
use super::player::PlayerId;

/// A live blast cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub cell: IVec2,
    pub owner: PlayerId,
    /// Seconds until the cell stops being lethal
    pub ttl: f32,
}

/// All live blast cells in the round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionRegistry {
    ttl: f32,
    explosions: Vec<Explosion>,
}

impl ExplosionRegistry {
    pub fn new(ttl: f32) -> Self {
        Self {
            ttl,
            explosions: Vec::new(),
        }
    }

    /// Add a batch of blast cells with a fresh time-to-live
    pub fn spawn(&mut self, cells: impl IntoIterator<Item = BlastCell>) {
        let ttl = self.ttl;
        self.explosions.extend(cells.into_iter().map(|c| Explosion {
            cell: c.cell,
            owner: c.owner,
            ttl,
        }));
    }

    /// Age every blast cell and drop the expired ones
    pub fn tick(&mut self, dt: f32) {
        for explosion in &mut self.explosions {
            explosion.ttl -= dt;
        }
        self.explosions.retain(|e| e.ttl > 0.0);
    }

    /// Owner of every live blast cell at `cell` (may repeat an owner)
    pub fn occupies(&self, cell: IVec2) -> Vec<PlayerId> {
        self.explosions
            .iter()
            .filter(|e| e.cell == cell)
            .map(|e| e.owner)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Explosion> {
        self.explosions.iter()
    }

    pub fn len(&self) -> usize {
        self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }
}
