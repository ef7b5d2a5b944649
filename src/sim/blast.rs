//! Blast propagation
//!
//! A detonation always hits its own cell, then walks outward along each of
//! the four axes independently:
//! - off the grid or into Solid: stop, no blast cell
//! - Brick: blast cell, destroy the brick, stop
//! - Empty / PowerUp: blast cell, keep going until `range` steps

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use super::player::PlayerId;

/// Walk order: right, left, down, up
pub const BLAST_DIRECTIONS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

/// One cell reached by a detonation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastCell {
    pub cell: IVec2,
    pub owner: PlayerId,
}

/// Result of propagating one detonation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blast {
    /// Every cell the blast reached, origin first
    pub cells: Vec<BlastCell>,
    /// Bricks converted to Empty by this blast
    pub destroyed: Vec<IVec2>,
}

/// Propagate a detonation at `origin`, destroying the bricks it reaches
pub fn propagate(grid: &mut Grid, origin: IVec2, range: i32, owner: PlayerId) -> Blast {
    debug_assert!(
        grid.in_bounds(origin),
        "detonation at {origin} is outside the grid"
    );

    let mut blast = Blast::default();
    blast.cells.push(BlastCell { cell: origin, owner });

    for dir in BLAST_DIRECTIONS {
        for step in 1..=range {
            let pos = origin + dir * step;
            let Some(cell) = grid.get(pos) else {
                break;
            };
            match cell {
                Cell::Solid => break,
                Cell::Brick => {
                    blast.cells.push(BlastCell { cell: pos, owner });
                    if grid.destroy_block(pos.x, pos.y) {
                        blast.destroyed.push(pos);
                    }
                    break;
                }
                Cell::Empty | Cell::PowerUp => {
                    blast.cells.push(BlastCell { cell: pos, owner });
                }
            }
        }
    }

    log::trace!(
        "Blast at {} (range {}): {} cells, {} bricks",
        origin,
        range,
        blast.cells.len(),
        blast.destroyed.len()
    );
    blast
}
